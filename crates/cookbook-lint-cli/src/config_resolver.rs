//! Configuration file resolution with global fallback.
//!
//! Resolves the configuration file path using a deterministic priority order:
//!
//! 1. `--config` flag (explicit path)
//! 2. `{cookbook}/cookbook-lint.toml` or `.cookbook-lint.toml`
//! 3. `~/.cookbook-lint/config.toml`, or `$COOKBOOK_LINT_CONFIG_DIR/config.toml`
//! 4. No config found, defaults apply

use anyhow::{Context, Result};
use cookbook_lint_core::Config;
use std::path::{Path, PathBuf};

/// Where the configuration was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Explicitly specified via `--config` flag.
    Explicit(PathBuf),
    /// Found in the cookbook directory.
    Project(PathBuf),
    /// Loaded from the global config directory.
    Global(PathBuf),
    /// No config found; defaults will be used.
    Default,
}

impl ConfigSource {
    /// Returns the resolved path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }

    /// Reads and parses the resolved file, or returns defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(&self) -> Result<Config> {
        let Some(path) = self.path() else {
            tracing::debug!("No configuration file found, using defaults");
            return Ok(Config::default());
        };
        if matches!(self, Self::Global(_)) {
            tracing::info!("Using global config: {}", path.display());
        }
        Config::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))
    }
}

const PROJECT_CONFIG_NAMES: &[&str] = &["cookbook-lint.toml", ".cookbook-lint.toml"];

const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Resolves the configuration file for a cookbook directory.
#[must_use]
pub fn resolve(project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
    resolve_in(project_dir, explicit, global_config_dir())
}

fn resolve_in(
    project_dir: &Path,
    explicit: Option<&Path>,
    global_dir: Option<PathBuf>,
) -> ConfigSource {
    if let Some(p) = explicit {
        return ConfigSource::Explicit(p.to_path_buf());
    }

    if let Some(found) = PROJECT_CONFIG_NAMES
        .iter()
        .map(|name| project_dir.join(name))
        .find(|candidate| candidate.is_file())
    {
        tracing::debug!("Found project config: {}", found.display());
        return ConfigSource::Project(found);
    }

    match global_dir.map(|dir| dir.join(GLOBAL_CONFIG_NAME)) {
        Some(candidate) if candidate.is_file() => {
            tracing::debug!("Found global config: {}", candidate.display());
            ConfigSource::Global(candidate)
        }
        _ => ConfigSource::Default,
    }
}

/// `$COOKBOOK_LINT_CONFIG_DIR`, else `~/.cookbook-lint/`.
#[must_use]
pub fn global_config_dir() -> Option<PathBuf> {
    if let Some(dir) = std::env::var_os("COOKBOOK_LINT_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".cookbook-lint"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn explicit_wins_without_existence_check() {
        let project = TempDir::new().unwrap();
        fs::write(project.path().join("cookbook-lint.toml"), "").unwrap();

        let result = resolve_in(project.path(), Some(Path::new("/nonexistent.toml")), None);
        assert_eq!(result, ConfigSource::Explicit(PathBuf::from("/nonexistent.toml")));
    }

    #[test]
    fn plain_name_preferred_over_dot_prefix() {
        let project = TempDir::new().unwrap();
        fs::write(project.path().join(".cookbook-lint.toml"), "").unwrap();
        assert_eq!(
            resolve_in(project.path(), None, None),
            ConfigSource::Project(project.path().join(".cookbook-lint.toml"))
        );

        fs::write(project.path().join("cookbook-lint.toml"), "").unwrap();
        assert_eq!(
            resolve_in(project.path(), None, None),
            ConfigSource::Project(project.path().join("cookbook-lint.toml"))
        );
    }

    #[test]
    fn global_used_only_without_project_config() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        fs::write(global.path().join("config.toml"), "").unwrap();

        let result = resolve_in(project.path(), None, Some(global.path().to_path_buf()));
        assert_eq!(result, ConfigSource::Global(global.path().join("config.toml")));

        fs::write(project.path().join("cookbook-lint.toml"), "").unwrap();
        let result = resolve_in(project.path(), None, Some(global.path().to_path_buf()));
        assert!(matches!(result, ConfigSource::Project(_)));
    }

    #[test]
    fn empty_global_dir_falls_back_to_defaults() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        let result = resolve_in(project.path(), None, Some(global.path().to_path_buf()));
        assert_eq!(result, ConfigSource::Default);
        assert!(result.path().is_none());
    }

    #[test]
    fn load_reads_resolved_file() {
        let project = TempDir::new().unwrap();
        let path = project.path().join("cookbook-lint.toml");
        fs::write(&path, "preset = \"all\"\ncurrent_year = 2020\n").unwrap();

        let config = ConfigSource::Project(path).load().unwrap();
        assert_eq!(config.preset.as_deref(), Some("all"));
        assert_eq!(config.current_year, Some(2020));

        let config = ConfigSource::Default.load().unwrap();
        assert!(config.preset.is_none());
    }

    #[test]
    fn load_reports_missing_explicit_file() {
        let err = ConfigSource::Explicit(PathBuf::from("/nonexistent/cookbook-lint.toml"))
            .load()
            .unwrap_err();
        assert!(err.to_string().contains("Failed to load config"));
    }
}

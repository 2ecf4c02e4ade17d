//! Configuration types for cookbook-lint.

use crate::types::Severity;
use crate::version::TargetVersion;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Top-level configuration, usually read from `cookbook-lint.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Preset to use ("recommended", "all" or "deprecations").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,

    /// Severity threshold for a failing exit code (default: refactor).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on: Option<Severity>,

    /// Platform version the cookbooks target; gates version-bound rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_version: Option<TargetVersion>,

    /// Year used for copyright ranges. Callers fill it from the clock when
    /// absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_year: Option<i32>,

    /// Analyzer configuration.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Per-rule configurations, keyed by rule name or code.
    #[serde(default)]
    pub rules: HashMap<String, RuleConfig>,
}

impl Config {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Settings for a rule, looked up by name first, then by code.
    #[must_use]
    pub fn rule_config(&self, name: &str, code: &str) -> Option<&RuleConfig> {
        self.rules.get(name).or_else(|| self.rules.get(code))
    }

    /// Checks if a rule is enabled.
    #[must_use]
    pub fn is_rule_enabled(&self, name: &str, code: &str) -> bool {
        self.rule_config(name, code)
            .and_then(|c| c.enabled)
            .unwrap_or(true)
    }

    /// Gets the severity override for a rule.
    #[must_use]
    pub fn rule_severity(&self, name: &str, code: &str) -> Option<Severity> {
        self.rule_config(name, code).and_then(|c| c.severity)
    }

    /// Effective failure threshold.
    #[must_use]
    pub fn fail_on(&self) -> Severity {
        self.fail_on.unwrap_or(Severity::Refactor)
    }
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Root directory; reported paths are relative to it.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Glob patterns to exclude from analysis.
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// Glob patterns to include (if empty, every file the parser accepts).
    #[serde(default)]
    pub include: Vec<String>,

    /// Whether to respect .gitignore files.
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,

    /// Maximum number of parallel file analyses.
    #[serde(default)]
    pub parallelism: Option<usize>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            exclude: default_exclude(),
            include: Vec::new(),
            respect_gitignore: true,
            parallelism: None,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_exclude() -> Vec<String> {
    vec!["**/vendor/**".to_string(), "**/.kitchen/**".to_string()]
}

fn default_true() -> bool {
    true
}

/// Per-rule configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuleConfig {
    /// Whether this rule is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,

    /// Severity override for this rule.
    #[serde(default)]
    pub severity: Option<Severity>,

    /// Rule-specific options as key-value pairs.
    #[serde(flatten)]
    pub options: HashMap<String, toml::Value>,
}

impl RuleConfig {
    /// Gets a string array option, `None` when unset or not an array.
    #[must_use]
    pub fn get_str_array(&self, key: &str) -> Option<Vec<String>> {
        self.options.get(key).and_then(|v| v.as_array()).map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.analyzer.respect_gitignore);
        assert!(config.rules.is_empty());
        assert_eq!(config.fail_on(), Severity::Refactor);
        assert!(config.target_version.is_none());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
preset = "all"
fail_on = "warning"
target_version = "14.3"
current_year = 2024

[analyzer]
root = "./cookbooks"
exclude = ["**/test/fixtures/**"]

[rules.depends-on-poise]
severity = "error"
cookbooks = ["poise", "poise-python"]

[rules.CL005]
enabled = false
"#;

        let config = Config::parse(toml).expect("Failed to parse");
        assert_eq!(config.preset.as_deref(), Some("all"));
        assert_eq!(config.fail_on(), Severity::Warning);
        assert_eq!(config.target_version, Some(TargetVersion::new(14, 3)));
        assert_eq!(config.current_year, Some(2024));
        assert_eq!(config.analyzer.root, PathBuf::from("./cookbooks"));

        assert_eq!(
            config.rule_severity("depends-on-poise", "CL002"),
            Some(Severity::Error)
        );
        let rule_config = config.rule_config("depends-on-poise", "CL002").unwrap();
        assert_eq!(
            rule_config.get_str_array("cookbooks"),
            Some(vec!["poise".to_string(), "poise-python".to_string()])
        );

        assert!(!config.is_rule_enabled("provides-metadata", "CL005"));
        assert!(config.is_rule_enabled("chef-vault-used", "CL004"));
    }

    #[test]
    fn test_default_excludes() {
        let config = Config::parse("[analyzer]\nroot = \".\"\n").unwrap();
        assert_eq!(config.analyzer.exclude, vec!["**/vendor/**", "**/.kitchen/**"]);
    }

    #[test]
    fn test_invalid_severity_is_parse_error() {
        let err = Config::parse("fail_on = \"fatal\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}

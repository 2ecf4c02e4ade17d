//! Rule presets for common configurations.

use crate::{
    ChefSpecLegacyRunner, ChefVaultUsed, CopyrightCommentFormat, DependsOnPoise,
    DeprecatedShelloutMethods, ProvidesMetadata, WindowsRegistryUac,
};
use cookbook_lint_core::{Category, Config, RuleBox};
use std::str::FromStr;

/// Preset configurations for cookbook-lint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// Every rule except the Effortless-specific ones.
    #[default]
    Recommended,
    /// Every built-in rule.
    All,
    /// Only rules for deprecated and removed APIs.
    Deprecations,
}

impl Preset {
    /// Returns the rules for this preset.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        match self {
            Self::Recommended => recommended_rules(),
            Self::All => all_rules(),
            Self::Deprecations => deprecation_rules(),
        }
    }

    /// Preset name as written in configuration.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Recommended => "recommended",
            Self::All => "all",
            Self::Deprecations => "deprecations",
        }
    }
}

/// A preset name that matches no [`Preset`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown preset '{0}' (expected recommended, all or deprecations)")]
pub struct UnknownPresetError(pub String);

impl FromStr for Preset {
    type Err = UnknownPresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recommended" => Ok(Self::Recommended),
            "all" => Ok(Self::All),
            "deprecations" => Ok(Self::Deprecations),
            other => Err(UnknownPresetError(other.to_string())),
        }
    }
}

/// Returns all available rules.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    vec![
        Box::new(ChefSpecLegacyRunner::new()),
        Box::new(DependsOnPoise::new()),
        Box::new(DeprecatedShelloutMethods::new()),
        Box::new(ChefVaultUsed::new()),
        Box::new(ProvidesMetadata::new()),
        Box::new(CopyrightCommentFormat::new()),
        Box::new(WindowsRegistryUac::new()),
    ]
}

/// Returns the recommended set of rules.
///
/// Everything in [`all_rules`] except `chef-vault-used` (CL004), which only
/// matters for cookbooks packaged with Effortless.
#[must_use]
pub fn recommended_rules() -> Vec<RuleBox> {
    all_rules()
        .into_iter()
        .filter(|r| r.category() != Category::Effortless)
        .collect()
}

/// Returns rules for deprecated APIs only.
///
/// Includes:
/// - `chefspec-legacy-runner` (CL001)
/// - `depends-on-poise` (CL002)
/// - `deprecated-shellout-methods` (CL003)
#[must_use]
pub fn deprecation_rules() -> Vec<RuleBox> {
    all_rules()
        .into_iter()
        .filter(|r| r.category() == Category::Deprecations)
        .collect()
}

/// Looks up a built-in rule by name or code.
#[must_use]
pub fn rule_by_name(name_or_code: &str) -> Option<RuleBox> {
    all_rules()
        .into_iter()
        .find(|r| r.name() == name_or_code || r.code() == name_or_code)
}

/// Builds the preset named in `config` with rule options applied.
///
/// # Errors
///
/// Returns [`UnknownPresetError`] when the preset name is unknown.
pub fn rules_from_config(config: &Config) -> Result<Vec<RuleBox>, UnknownPresetError> {
    let preset = match config.preset.as_deref() {
        Some(name) => name.parse::<Preset>()?,
        None => Preset::default(),
    };
    Ok(apply_rule_options(preset.rules(), config))
}

/// Rebuilds rules that take options from their `[rules.<name>]` table.
#[must_use]
pub fn apply_rule_options(rules: Vec<RuleBox>, config: &Config) -> Vec<RuleBox> {
    rules.into_iter().map(|rule| configure(rule, config)).collect()
}

fn configure(rule: RuleBox, config: &Config) -> RuleBox {
    if rule.name() != crate::depends_on_poise::NAME {
        return rule;
    }
    match config.rule_config(crate::depends_on_poise::NAME, crate::depends_on_poise::CODE) {
        Some(rule_config) => {
            tracing::debug!("Applying options to {}", rule.name());
            Box::new(DependsOnPoise::new().configure(rule_config))
        }
        None => rule,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(rules: &[RuleBox]) -> Vec<&'static str> {
        rules.iter().map(|r| r.name()).collect()
    }

    #[test]
    fn test_preset_rules() {
        assert_eq!(Preset::All.rules().len(), 7);
        assert_eq!(Preset::Recommended.rules().len(), 6);
        assert_eq!(
            names(&Preset::Deprecations.rules()),
            vec![
                "chefspec-legacy-runner",
                "depends-on-poise",
                "deprecated-shellout-methods"
            ]
        );
        assert!(!names(&recommended_rules()).contains(&"chef-vault-used"));
    }

    #[test]
    fn test_codes_are_unique() {
        let mut codes: Vec<_> = all_rules().iter().map(|r| r.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes, vec!["CL001", "CL002", "CL003", "CL004", "CL005", "CL006", "CL007"]);
    }

    #[test]
    fn test_rule_by_name() {
        assert_eq!(rule_by_name("CL005").map(|r| r.name()), Some("provides-metadata"));
        assert_eq!(rule_by_name("chef-vault-used").map(|r| r.code()), Some("CL004"));
        assert!(rule_by_name("no-such-rule").is_none());
    }

    #[test]
    fn test_preset_parse() {
        assert_eq!("all".parse::<Preset>(), Ok(Preset::All));
        assert_eq!(Preset::Deprecations.name(), "deprecations");
        assert_eq!(
            "strict".parse::<Preset>(),
            Err(UnknownPresetError("strict".to_string()))
        );
    }

    #[test]
    fn test_rules_from_config() {
        let config = Config::parse("preset = \"all\"\n").unwrap();
        assert_eq!(rules_from_config(&config).unwrap().len(), 7);

        let config = Config::default();
        assert_eq!(rules_from_config(&config).unwrap().len(), 6);

        let config = Config::parse("preset = \"bogus\"\n").unwrap();
        let err = rules_from_config(&config).err().unwrap();
        assert_eq!(err, UnknownPresetError("bogus".to_string()));
        assert!(err.to_string().contains("unknown preset 'bogus'"));
    }
}

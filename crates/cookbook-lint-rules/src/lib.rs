//! # cookbook-lint-rules
//!
//! Built-in lint rules for cookbook-lint.
//!
//! This crate provides the Chef cookbook rules shipped with the linter and
//! the presets that group them.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | CL001 | `chefspec-legacy-runner` | Replaces `ChefSpec::Runner` with `ChefSpec::ServerRunner` |
//! | CL002 | `depends-on-poise` | Forbids `depends` on the Poise cookbooks in `metadata.rb` |
//! | CL003 | `deprecated-shellout-methods` | Replaces `shell_out_*` helpers removed in Chef 15 |
//! | CL004 | `chef-vault-used` | Flags Chef Vault usage in Effortless cookbooks |
//! | CL005 | `provides-metadata` | Removes the unused `provides` metadata method |
//! | CL006 | `copyright-comment-format` | Normalizes copyright header comments |
//! | CL007 | `windows-registry-uac` | Prefers `windows_uac` over UAC registry keys |
//!
//! ## Usage
//!
//! ```ignore
//! use cookbook_lint_core::Analyzer;
//! use cookbook_lint_rules::{ChefSpecLegacyRunner, DependsOnPoise};
//! use cookbook_lint_ruby::RubyParser;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./cookbooks/web")
//!     .parser(RubyParser::new())
//!     .rule(ChefSpecLegacyRunner::new())
//!     .rule(DependsOnPoise::new().disallow(&["poise", "poise-python"]))
//!     .current_year(2024)
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod chef_vault_used;
mod chefspec_legacy_runner;
mod copyright_comment_format;
mod depends_on_poise;
mod deprecated_shellout_methods;
mod presets;
mod provides_metadata;
mod windows_registry_uac;

#[cfg(test)]
mod test_support;

pub use chef_vault_used::ChefVaultUsed;
pub use chefspec_legacy_runner::ChefSpecLegacyRunner;
pub use copyright_comment_format::CopyrightCommentFormat;
pub use depends_on_poise::DependsOnPoise;
pub use deprecated_shellout_methods::DeprecatedShelloutMethods;
pub use presets::{
    all_rules, apply_rule_options, deprecation_rules, recommended_rules, rule_by_name,
    rules_from_config, Preset, UnknownPresetError,
};
pub use provides_metadata::ProvidesMetadata;
pub use windows_registry_uac::WindowsRegistryUac;

/// Re-export core types for convenience.
pub use cookbook_lint_core::{Offense, Rule, Severity};

//! # cookbook-lint-core
//!
//! Core framework for linting Chef cookbooks.
//!
//! This crate provides the language-neutral pieces of the linter:
//!
//! - [`Node`], the closed syntax tree that parsers lower into
//! - [`Rule`] trait and [`RuleRegistry`] for per-node-kind dispatch
//! - [`Evaluator`] for single-pass evaluation with inline suppression
//! - [`corrector::apply`] for applying non-overlapping corrections
//! - [`is_eligible`] version gating against a [`TargetVersion`]
//! - [`Analyzer`] for discovering, linting and correcting many files
//!
//! ## Example
//!
//! ```ignore
//! use cookbook_lint_core::Analyzer;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./cookbooks/apache")
//!     .parser(RubyParser::new())
//!     .rules(recommended_rules())
//!     .current_year(2024)
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! print!("{}", result.format_report());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod ast;
mod config;
mod context;
pub mod corrector;
mod evaluator;
mod parser;
mod registry;
mod rule;
mod types;
mod version;

/// Utility modules for rule implementations.
pub mod utils;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError, FileOutcome, MAX_CORRECTION_PASSES};
pub use ast::{Node, NodeKind, NodeTag, Span, Walk};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use context::{FileContext, FileKind};
pub use corrector::CorrectionError;
pub use evaluator::{Evaluation, Evaluator, RuleEvaluationError};
pub use parser::{SourceParser, SyntaxError};
pub use registry::{DuplicateRuleError, RuleRegistry};
pub use rule::{Category, Rule, RuleBox, RuleContext, RuleError};
pub use types::{
    Correction, FileError, FileErrorKind, LintResult, Location, Offense, OffenseDiagnostic,
    Severity, SeverityCounts, Suggestion,
};
pub use utils::allowance::AllowCheck;
pub use version::{is_eligible, TargetVersion, VersionParseError};

//! Helpers shared by rule unit tests.

use cookbook_lint_core::{Analyzer, FileOutcome, Offense, Rule, TargetVersion};
use cookbook_lint_ruby::RubyParser;
use std::path::Path;

pub(crate) const YEAR: i32 = 2024;

fn lint<R: Rule + 'static>(
    rule: R,
    path: &str,
    source: &str,
    target: Option<TargetVersion>,
) -> FileOutcome {
    let mut builder = Analyzer::builder()
        .root(".")
        .parser(RubyParser::new())
        .rule(rule)
        .current_year(YEAR)
        .autocorrect(true);
    if let Some(target) = target {
        builder = builder.target_version(target);
    }
    let outcome = builder
        .build()
        .expect("analyzer should build")
        .lint_source(Path::new(path), source);
    assert!(outcome.errors.is_empty(), "unexpected errors: {:?}", outcome.errors);
    outcome
}

/// Offenses reported for `source` checked as `path`.
pub(crate) fn check<R: Rule + 'static>(rule: R, path: &str, source: &str) -> Vec<Offense> {
    lint(rule, path, source, None).offenses
}

/// Same as [`check`] with a configured target version.
pub(crate) fn check_targeting<R: Rule + 'static>(
    rule: R,
    target: TargetVersion,
    path: &str,
    source: &str,
) -> Vec<Offense> {
    lint(rule, path, source, Some(target)).offenses
}

/// Source after autocorrect reached a fixed point.
pub(crate) fn correct<R: Rule + 'static>(rule: R, path: &str, source: &str) -> String {
    lint(rule, path, source, None)
        .corrected
        .unwrap_or_else(|| source.to_string())
}

/// Text the offense points at.
pub(crate) fn flagged<'a>(source: &'a str, offense: &Offense) -> &'a str {
    &source[offense.location.offset..offense.location.end()]
}

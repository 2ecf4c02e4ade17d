//! Rule to normalize copyright header comments.
//!
//! # Rationale
//!
//! Copyright headers drift across cookbooks: missing or stale year ranges,
//! old company names, inconsistent punctuation. A single canonical form
//! keeps them greppable and current.
//!
//! # Detected Patterns
//!
//! Any `#` comment containing `# Copyright` whose text after the keyword is
//! not exactly `<range>, <holder>`, where:
//!
//! - `<range>` is `<oldest year>-<current year>`, or just the current year
//!   when the oldest year is the current one or no year is present
//! - `<holder>` is the text after the last year (or after the keyword),
//!   with `Opscode` renamed to `Chef Software` and `Chef, Inc.` variants
//!   rewritten to `Chef Software, Inc.`
//!
//! The current year comes from the analyzer, never from the clock.
//!
//! # Autocorrect
//!
//! Rewrites the comment to `# Copyright:: <range>, <holder>`.
//!
//! # Suppression
//!
//! - `# cookbook-lint: allow(copyright-comment-format)` comment

use cookbook_lint_core::{
    Category, Correction, Node, NodeTag, Offense, Rule, RuleContext, RuleError, Severity,
    Suggestion,
};
use regex::Regex;
use std::sync::LazyLock;

/// Rule code for copyright-comment-format.
pub const CODE: &str = "CL006";

/// Rule name for copyright-comment-format.
pub const NAME: &str = "copyright-comment-format";

const MSG: &str = "Properly format copyrights header comments";

static RE_COPYRIGHT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"# (?:Copyright\W*)(.*)").unwrap());

static RE_YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([0-9]{4})").unwrap());

static RE_HOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:.*[0-9]{4}|Copyright\W*)(?:,)?(?:\s)?(.*)").unwrap());

static RE_CHEF_INC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Chef(?:,)? Inc.*").unwrap());

/// `2015-2024`, or `2024` when the oldest year is the current one.
fn date_range(text: &str, current_year: i32) -> String {
    let oldest = RE_YEAR
        .find_iter(text)
        .filter_map(|m| m.as_str().parse::<i32>().ok())
        .min();
    match oldest {
        Some(year) if year != current_year => format!("{year}-{current_year}"),
        _ => current_year.to_string(),
    }
}

fn holder(text: &str) -> String {
    let raw = RE_HOLDER
        .captures(text)
        .and_then(|c| c.get(1))
        .map_or("", |m| m.as_str());
    let renamed = raw.replace("Opscode", "Chef Software");
    RE_CHEF_INC
        .replace_all(&renamed, "Chef Software, Inc.")
        .into_owned()
}

/// Canonical header for a copyright comment that is not already canonical.
///
/// Returns `None` for comments that are not copyright headers or are
/// already formatted.
fn normalized_header(text: &str, current_year: i32) -> Option<String> {
    if !text.starts_with('#') {
        return None;
    }
    let current = RE_COPYRIGHT.captures(text)?.get(1)?.as_str();
    let expected = format!("{}, {}", date_range(text, current_year), holder(text));
    (current != expected).then(|| format!("# Copyright:: {expected}"))
}

/// Flags copyright headers that are not in canonical form.
#[derive(Debug, Clone, Default)]
pub struct CopyrightCommentFormat;

impl CopyrightCommentFormat {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for CopyrightCommentFormat {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Normalizes copyright header comments"
    }

    fn category(&self) -> Category {
        Category::Style
    }

    fn default_severity(&self) -> Severity {
        Severity::Refactor
    }

    fn node_kinds(&self) -> &'static [NodeTag] {
        &[NodeTag::Comment]
    }

    fn is_autocorrectable(&self) -> bool {
        true
    }

    fn check(&self, ctx: &RuleContext<'_>, node: &Node) -> Result<Vec<Offense>, RuleError> {
        let Some(text) = node.comment_text() else {
            return Ok(Vec::new());
        };
        let Some(header) = normalized_header(text, ctx.file.current_year) else {
            return Ok(Vec::new());
        };

        let fix = Correction::replace(ctx.location(node.span), header.as_str());
        Ok(vec![ctx
            .offense(self, node.span, MSG)
            .with_suggestion(Suggestion::with_fix(format!("Use '{header}'"), fix))])
    }
}

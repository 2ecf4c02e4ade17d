//! Comment-based allowance directives.
//!
//! Supports directives like:
//! ```text
//! # cookbook-lint: allow(chef-vault-used) reason="migrating off vault in Q3"
//! ```
//!
//! A directive applies to its own line (trailing comment) and to the line
//! directly below it.

use std::collections::HashSet;

const DIRECTIVE_PREFIX: &str = "cookbook-lint:";

/// Result of checking for allow directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowCheck {
    /// Rule is not allowed.
    Denied,
    /// Rule is allowed with optional reason.
    Allowed {
        /// The reason provided (if any).
        reason: Option<String>,
    },
}

impl AllowCheck {
    /// Returns true if allowed.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// Returns the reason if allowed.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Allowed { reason } => reason.as_deref(),
            Self::Denied => None,
        }
    }
}

/// Parsed allowance directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowDirective {
    /// Rule names or codes that are allowed; `all` matches every rule.
    pub rules: HashSet<String>,
    /// Optional reason for the allowance.
    pub reason: Option<String>,
}

impl AllowDirective {
    fn matches(&self, rule_name: &str, rule_code: &str) -> bool {
        self.rules.contains("all") || self.rules.contains(rule_name) || self.rules.contains(rule_code)
    }
}

/// Directives of one file, indexed by line.
#[derive(Debug, Clone, Default)]
pub struct AllowIndex {
    // (1-indexed line, directive), ascending by line
    directives: Vec<(usize, AllowDirective)>,
}

impl AllowIndex {
    /// Scans `content` for directives.
    #[must_use]
    pub fn scan(content: &str) -> Self {
        let directives = content
            .lines()
            .enumerate()
            .filter_map(|(i, line)| parse_allow_directive(line).map(|d| (i + 1, d)))
            .collect();
        Self { directives }
    }

    /// Returns true when the file has no directives at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// Checks whether the rule is allowed on `line` (1-indexed).
    #[must_use]
    pub fn check(&self, line: usize, rule_name: &str, rule_code: &str) -> AllowCheck {
        self.directives
            .iter()
            .filter(|(l, _)| *l == line || *l + 1 == line)
            .find(|(_, d)| d.matches(rule_name, rule_code))
            .map_or(AllowCheck::Denied, |(_, d)| AllowCheck::Allowed {
                reason: d.reason.clone(),
            })
    }
}

/// Parses an allowance directive from a source line.
///
/// The directive may be the whole line or a trailing comment.
#[must_use]
pub fn parse_allow_directive(line: &str) -> Option<AllowDirective> {
    let at = line.find(DIRECTIVE_PREFIX)?;
    if !line[..at].trim_end().ends_with('#') {
        return None;
    }

    let directive = line[at + DIRECTIVE_PREFIX.len()..].trim();
    let allow_content = directive.strip_prefix("allow(")?.trim();

    let paren_end = allow_content.find(')')?;
    let rules: HashSet<String> = allow_content[..paren_end]
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if rules.is_empty() {
        return None;
    }

    let rest = allow_content[paren_end + 1..].trim();
    let reason = rest
        .strip_prefix("reason=")
        .map(str::trim)
        .and_then(|r| r.strip_prefix('"'))
        .and_then(|r| r.find('"').map(|end| r[..end].to_string()))
        .filter(|r| !r.trim().is_empty());

    Some(AllowDirective { rules, reason })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_allow_directive() {
        let directive = parse_allow_directive("# cookbook-lint: allow(provides-metadata)").unwrap();
        assert!(directive.rules.contains("provides-metadata"));
        assert!(directive.reason.is_none());
    }

    #[test]
    fn test_parse_allow_directive_with_reason() {
        let directive =
            parse_allow_directive("# cookbook-lint: allow(chef-vault-used) reason=\"legacy nodes\"")
                .unwrap();
        assert!(directive.rules.contains("chef-vault-used"));
        assert_eq!(directive.reason.as_deref(), Some("legacy nodes"));
    }

    #[test]
    fn test_parse_multiple_rules() {
        let directive = parse_allow_directive("  # cookbook-lint: allow(CL001, CL002 , all)").unwrap();
        assert_eq!(directive.rules.len(), 3);
        assert!(directive.rules.contains("CL002"));
    }

    #[test]
    fn test_trailing_comment_directive() {
        let directive =
            parse_allow_directive("provides 'foo' # cookbook-lint: allow(provides-metadata)");
        assert!(directive.is_some());
    }

    #[test]
    fn test_rejects_non_directives() {
        assert!(parse_allow_directive("# just a comment").is_none());
        assert!(parse_allow_directive("# cookbook-lint: allow()").is_none());
        assert!(parse_allow_directive("cookbook-lint: allow(x)").is_none());
    }

    #[test]
    fn test_directive_covers_same_and_next_line() {
        let content = "\
name 'web'
# cookbook-lint: allow(provides-metadata)
provides 'web'
provides 'other'
";
        let index = AllowIndex::scan(content);
        assert!(index.check(2, "provides-metadata", "CL005").is_allowed());
        assert!(index.check(3, "provides-metadata", "CL005").is_allowed());
        assert!(!index.check(4, "provides-metadata", "CL005").is_allowed());
        assert!(!index.check(3, "depends-on-poise", "CL002").is_allowed());
    }

    #[test]
    fn test_directive_by_code_and_all() {
        let content = "depends 'poise' # cookbook-lint: allow(CL002)\n# cookbook-lint: allow(all)\nx\n";
        let index = AllowIndex::scan(content);
        assert!(index.check(1, "depends-on-poise", "CL002").is_allowed());
        assert!(index.check(3, "anything", "CL999").is_allowed());
    }

    #[test]
    fn test_check_allow_with_reason() {
        let content = "# cookbook-lint: allow(chef-vault-used) reason=\"pending migration\"\nrequire 'chef-vault'\n";
        let result = AllowIndex::scan(content).check(2, "chef-vault-used", "CL004");
        assert!(result.is_allowed());
        assert_eq!(result.reason(), Some("pending migration"));
    }

    #[test]
    fn test_check_allow_denied() {
        let index = AllowIndex::scan("require 'chef-vault'\n");
        let result = index.check(1, "chef-vault-used", "CL004");
        assert_eq!(result, AllowCheck::Denied);
        assert_eq!(result.reason(), None);
    }
}

//! Rule trait for defining lint rules.

use crate::ast::{Node, NodeTag, Span};
use crate::context::FileContext;
use crate::types::{Location, Offense, Severity};
use crate::version::TargetVersion;

/// Group a rule belongs to; presets select rules by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Constructs removed or deprecated in newer platform releases.
    Deprecations,
    /// Constructs unsupported by the Effortless packaging pattern.
    Effortless,
    /// Code that a newer built-in feature replaces.
    Modernize,
    /// Code with no effect.
    Redundant,
    /// Formatting and conventions.
    Style,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Deprecations => "deprecations",
            Self::Effortless => "effortless",
            Self::Modernize => "modernize",
            Self::Redundant => "redundant",
            Self::Style => "style",
        };
        f.write_str(s)
    }
}

/// Internal failure of a rule while inspecting a node.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct RuleError(pub String);

impl RuleError {
    /// Creates a rule error from a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// What a rule sees while inspecting one node.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    /// The file being checked.
    pub file: &'a FileContext<'a>,
    ancestors: &'a [&'a Node],
}

impl<'a> RuleContext<'a> {
    /// Creates a context for a node with the given ancestor chain
    /// (outermost first).
    #[must_use]
    pub fn new(file: &'a FileContext<'a>, ancestors: &'a [&'a Node]) -> Self {
        Self { file, ancestors }
    }

    /// Direct parent of the node, `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<&'a Node> {
        self.ancestors.last().copied()
    }

    /// Ancestors from the root down to the parent.
    #[must_use]
    pub fn ancestors(&self) -> &'a [&'a Node] {
        self.ancestors
    }

    /// Source text covered by `span`.
    #[must_use]
    pub fn text(&self, span: Span) -> &'a str {
        self.file.text(span)
    }

    /// Location of `span` in the current file.
    #[must_use]
    pub fn location(&self, span: Span) -> Location {
        self.file.location(span)
    }

    /// Builds an offense for `rule` at `span` with its default severity.
    #[must_use]
    pub fn offense<R: Rule + ?Sized>(&self, rule: &R, span: Span, message: &str) -> Offense {
        Offense::new(
            rule.code(),
            rule.name(),
            rule.default_severity(),
            self.location(span),
            message,
        )
    }
}

/// A lint rule matching nodes of the syntax tree.
///
/// The evaluator walks each document once and hands every node whose tag is
/// listed in [`Rule::node_kinds`] to [`Rule::check`]. Rules are pure: the
/// same node and context must always produce the same offenses.
///
/// # Example
///
/// ```ignore
/// use cookbook_lint_core::{Node, NodeTag, Offense, Rule, RuleContext, RuleError};
///
/// pub struct NoBerkshelfApi;
///
/// impl Rule for NoBerkshelfApi {
///     fn name(&self) -> &'static str { "no-berkshelf-api" }
///     fn code(&self) -> &'static str { "CL100" }
///     fn node_kinds(&self) -> &'static [NodeTag] { &[NodeTag::Call] }
///
///     fn check(&self, ctx: &RuleContext<'_>, node: &Node) -> Result<Vec<Offense>, RuleError> {
///         if node.is_command("berkshelf_api") {
///             return Ok(vec![ctx.offense(self, node.span, "berkshelf_api is gone")]);
///         }
///         Ok(Vec::new())
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "provides-metadata").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "CL005").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the category of this rule.
    fn category(&self) -> Category {
        Category::Style
    }

    /// Returns the default severity for offenses from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    /// Whether this rule requires a reason when using allow directives.
    ///
    /// By default, rules with `Severity::Error` require a reason.
    fn requires_allow_reason(&self) -> bool {
        self.default_severity() == Severity::Error
    }

    /// Node kinds this rule inspects.
    fn node_kinds(&self) -> &'static [NodeTag];

    /// Oldest target version this rule applies to.
    fn minimum_version(&self) -> Option<TargetVersion> {
        None
    }

    /// Whether the rule runs on this file at all.
    fn applies_to(&self, _file: &FileContext<'_>) -> bool {
        true
    }

    /// Whether offenses from this rule carry automatic corrections.
    fn is_autocorrectable(&self) -> bool {
        false
    }

    /// Inspects a node and returns any offenses found.
    ///
    /// # Errors
    ///
    /// Returns a [`RuleError`] when the rule cannot evaluate this node. The
    /// evaluator records the failure and carries on with other nodes.
    fn check(&self, ctx: &RuleContext<'_>, node: &Node) -> Result<Vec<Offense>, RuleError>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::NodeKind;
    use std::path::Path;

    struct TestRule;

    impl Rule for TestRule {
        fn name(&self) -> &'static str {
            "test-rule"
        }
        fn code(&self) -> &'static str {
            "TEST001"
        }
        fn description(&self) -> &'static str {
            "A test rule"
        }
        fn node_kinds(&self) -> &'static [NodeTag] {
            &[NodeTag::Comment]
        }

        fn check(&self, ctx: &RuleContext<'_>, node: &Node) -> Result<Vec<Offense>, RuleError> {
            Ok(vec![ctx.offense(self, node.span, "Test offense")])
        }
    }

    #[test]
    fn test_rule_defaults() {
        let rule = TestRule;
        assert_eq!(rule.name(), "test-rule");
        assert_eq!(rule.code(), "TEST001");
        assert_eq!(rule.default_severity(), Severity::Warning);
        assert_eq!(rule.category(), Category::Style);
        assert!(!rule.requires_allow_reason());
        assert!(rule.minimum_version().is_none());
        assert!(!rule.is_autocorrectable());
    }

    #[test]
    fn test_offense_builder_uses_rule_metadata() {
        let content = "x = 1\n# hi\n";
        let file = FileContext::new(Path::new("a.rb"), content, Path::new("."), 2024);
        let program = Node::leaf(NodeKind::Program, Span::new(0, content.len()));
        let ancestors = [&program];
        let ctx = RuleContext::new(&file, &ancestors);
        let comment = Node::leaf(
            NodeKind::Comment {
                text: "# hi".to_string(),
            },
            Span::new(6, 10),
        );

        let offenses = TestRule.check(&ctx, &comment).unwrap();
        assert_eq!(offenses.len(), 1);
        assert_eq!(offenses[0].code, "TEST001");
        assert_eq!(offenses[0].location.line, 2);
        assert_eq!(ctx.parent().map(Node::tag), Some(NodeTag::Program));
        assert_eq!(ctx.text(comment.span), "# hi");
    }
}

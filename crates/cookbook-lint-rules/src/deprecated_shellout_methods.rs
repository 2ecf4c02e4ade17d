//! Rule to replace the specialized `shell_out_*` helpers.
//!
//! # Rationale
//!
//! Chef Infra Client 14.3 folded the specialized `shell_out` variants into
//! `shell_out` and `shell_out!` with options, and Chef Infra Client 15
//! removed them.
//!
//! # Detected Patterns
//!
//! Calls, with or without a receiver, and bare references to:
//!
//! - `shell_out_compact` / `shell_out_compact!`
//! - `shell_out_compact_timeout` / `shell_out_compact_timeout!`
//! - `shell_out_with_timeout` / `shell_out_with_timeout!`
//! - `shell_out_with_systems_locale` / `shell_out_with_systems_locale!`
//!
//! Only applies when the target version is 14.3 or later.
//!
//! # Autocorrect
//!
//! Renames the method to `shell_out` (or `shell_out!`). The
//! `systems_locale` variants also get `default_env: false`, which is what
//! they did implicitly.
//!
//! # Suppression
//!
//! - `# cookbook-lint: allow(deprecated-shellout-methods)` comment

use cookbook_lint_core::{
    Category, Correction, Node, NodeKind, NodeTag, Offense, Rule, RuleContext, RuleError,
    Severity, Span, Suggestion, TargetVersion,
};

/// Rule code for deprecated-shellout-methods.
pub const CODE: &str = "CL003";

/// Rule name for deprecated-shellout-methods.
pub const NAME: &str = "deprecated-shellout-methods";

const MSG: &str = "Many legacy specialized shell_out methods were replaced in Chef Infra Client 14.3 and removed in Chef Infra Client 15. Use shell_out and any additional options if necessary.";

const DEPRECATED: &[&str] = &[
    "shell_out_compact",
    "shell_out_compact!",
    "shell_out_compact_timeout",
    "shell_out_compact_timeout!",
    "shell_out_with_timeout",
    "shell_out_with_timeout!",
    "shell_out_with_systems_locale",
    "shell_out_with_systems_locale!",
];

const DEFAULT_ENV_OPTION: &str = "default_env: false";

/// Flags the legacy `shell_out_*` helpers.
#[derive(Debug, Clone, Default)]
pub struct DeprecatedShelloutMethods;

impl DeprecatedShelloutMethods {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn corrections(
        ctx: &RuleContext<'_>,
        node: &Node,
        method: &str,
        method_span: Span,
    ) -> Vec<Correction> {
        let replacement = if method.ends_with('!') {
            "shell_out!"
        } else {
            "shell_out"
        };
        let mut fixes = vec![Correction::replace(ctx.location(method_span), replacement)];

        if method.starts_with("shell_out_with_systems_locale") {
            fixes.push(Self::default_env_insertion(ctx, node, method_span));
        }
        fixes
    }

    /// Appends `default_env: false` after the last argument, or opens an
    /// argument list when there is none. A block-pass (`&blk`) must stay
    /// last, so the option goes in front of it.
    fn default_env_insertion(ctx: &RuleContext<'_>, node: &Node, method_span: Span) -> Correction {
        if let Some(last) = node.arguments().last() {
            if is_block_pass(last) {
                return Correction::insert(
                    ctx.location(Span::empty(last.span.start)),
                    format!("{DEFAULT_ENV_OPTION}, "),
                );
            }
            return Correction::insert(
                ctx.location(Span::empty(last.span.end)),
                format!(", {DEFAULT_ENV_OPTION}"),
            );
        }

        // `shell_out_with_systems_locale()` keeps its empty parentheses
        let after = Span::new(method_span.end, node.span.end);
        match ctx.text(after).find('(') {
            Some(i) => Correction::insert(
                ctx.location(Span::empty(after.start + i + 1)),
                DEFAULT_ENV_OPTION,
            ),
            None => Correction::insert(
                ctx.location(Span::empty(method_span.end)),
                format!("({DEFAULT_ENV_OPTION})"),
            ),
        }
    }
}

fn is_block_pass(arg: &Node) -> bool {
    matches!(&arg.kind, NodeKind::Other { kind } if kind == "block_argument")
}

impl Rule for DeprecatedShelloutMethods {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Replaces shell_out helpers removed in Chef Infra Client 15"
    }

    fn category(&self) -> Category {
        Category::Deprecations
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn node_kinds(&self) -> &'static [NodeTag] {
        &[NodeTag::Call]
    }

    fn minimum_version(&self) -> Option<TargetVersion> {
        Some(TargetVersion::new(14, 3))
    }

    fn is_autocorrectable(&self) -> bool {
        true
    }

    fn check(&self, ctx: &RuleContext<'_>, node: &Node) -> Result<Vec<Offense>, RuleError> {
        let (Some(method), Some(method_span)) = (node.method_name(), node.method_span()) else {
            return Ok(Vec::new());
        };
        if !DEPRECATED.contains(&method) {
            return Ok(Vec::new());
        }

        let fixes = Self::corrections(ctx, node, method, method_span);
        Ok(vec![ctx
            .offense(self, node.span, MSG)
            .with_suggestion(Suggestion::with_fixes(
                format!("Replace {method} with shell_out"),
                fixes,
            ))])
    }
}

//! Rule to remove `provides` from cookbook metadata.
//!
//! # Rationale
//!
//! `provides` in `metadata.rb` was never read by Chef Infra Client or the
//! Chef Infra Server. Keeping it suggests a contract that does not exist.
//!
//! # Detected Patterns
//!
//! - `provides 'service[web]'` in `metadata.rb`
//!
//! # Autocorrect
//!
//! Deletes the call along with the whitespace before it.
//!
//! # Suppression
//!
//! - `# cookbook-lint: allow(provides-metadata)` comment

use cookbook_lint_core::utils::range_with_space_to_left;
use cookbook_lint_core::{
    Category, Correction, FileContext, Node, NodeTag, Offense, Rule, RuleContext, RuleError,
    Severity, Suggestion,
};

/// Rule code for provides-metadata.
pub const CODE: &str = "CL005";

/// Rule name for provides-metadata.
pub const NAME: &str = "provides-metadata";

const MSG: &str = "The provides metadata.rb method is not used and is unnecessary in cookbooks.";

/// Flags `provides` in `metadata.rb`.
#[derive(Debug, Clone, Default)]
pub struct ProvidesMetadata;

impl ProvidesMetadata {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Rule for ProvidesMetadata {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Removes the unused provides metadata method"
    }

    fn category(&self) -> Category {
        Category::Redundant
    }

    fn default_severity(&self) -> Severity {
        Severity::Refactor
    }

    fn node_kinds(&self) -> &'static [NodeTag] {
        &[NodeTag::Call]
    }

    fn applies_to(&self, file: &FileContext<'_>) -> bool {
        file.is_metadata()
    }

    fn is_autocorrectable(&self) -> bool {
        true
    }

    fn check(&self, ctx: &RuleContext<'_>, node: &Node) -> Result<Vec<Offense>, RuleError> {
        if node.method_name() != Some("provides") {
            return Ok(Vec::new());
        }

        let removal = range_with_space_to_left(ctx.file.content, node.span);
        let fix = Correction::remove(ctx.location(removal));
        Ok(vec![ctx
            .offense(self, node.span, MSG)
            .with_suggestion(Suggestion::with_fix("Remove provides", fix))])
    }
}

//! Rule to replace the deprecated `ChefSpec::Runner` class.
//!
//! # Rationale
//!
//! `ChefSpec::Runner` was split into `ChefSpec::SoloRunner` and
//! `ChefSpec::ServerRunner`. The old name is gone from current ChefSpec
//! releases, so specs using it fail to load.
//!
//! # Detected Patterns
//!
//! - `ChefSpec::Runner.new`
//! - `ChefSpec::Runner` anywhere a constant can appear
//!
//! A rooted `::ChefSpec::Runner` is not matched.
//!
//! # Autocorrect
//!
//! Rewrites the constant to `ChefSpec::ServerRunner`.
//!
//! # Suppression
//!
//! - `# cookbook-lint: allow(chefspec-legacy-runner)` comment

use cookbook_lint_core::{
    Category, Correction, Node, NodeTag, Offense, Rule, RuleContext, RuleError, Severity,
    Suggestion,
};

/// Rule code for chefspec-legacy-runner.
pub const CODE: &str = "CL001";

/// Rule name for chefspec-legacy-runner.
pub const NAME: &str = "chefspec-legacy-runner";

const MSG: &str =
    "Use ChefSpec::SoloRunner or ChefSpec::ServerRunner instead of the deprecated ChefSpec::Runner.";

const REPLACEMENT: &str = "ChefSpec::ServerRunner";

/// Flags the legacy `ChefSpec::Runner` constant.
#[derive(Debug, Clone)]
pub struct ChefSpecLegacyRunner {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for ChefSpecLegacyRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ChefSpecLegacyRunner {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Warning,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for ChefSpecLegacyRunner {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Replaces the deprecated ChefSpec::Runner with ChefSpec::ServerRunner"
    }

    fn category(&self) -> Category {
        Category::Deprecations
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn node_kinds(&self) -> &'static [NodeTag] {
        &[NodeTag::Const]
    }

    fn is_autocorrectable(&self) -> bool {
        true
    }

    fn check(&self, ctx: &RuleContext<'_>, node: &Node) -> Result<Vec<Offense>, RuleError> {
        if !node.is_const_path(&["ChefSpec", "Runner"]) {
            return Ok(Vec::new());
        }

        let fix = Correction::replace(ctx.location(node.span), REPLACEMENT);
        Ok(vec![ctx
            .offense(self, node.span, MSG)
            .with_suggestion(Suggestion::with_fix(
                format!("Replace with {REPLACEMENT}"),
                fix,
            ))])
    }
}

//! Rule to forbid metadata dependencies on the Poise framework.
//!
//! # Rationale
//!
//! Poise and poise-service are unmaintained and do not work on current Chef
//! Infra Client releases. Custom resources cover everything they provided.
//!
//! # Detected Patterns
//!
//! - `depends 'poise'` in `metadata.rb`
//! - `depends 'poise-service'` in `metadata.rb`
//!
//! Version constraints (`depends 'poise', '~> 2.0'`) are not matched.
//!
//! # Configuration
//!
//! - `cookbooks`: replaces the list of disallowed cookbook names
//!
//! ```toml
//! [rules.depends-on-poise]
//! cookbooks = ["poise", "poise-service", "poise-python"]
//! ```
//!
//! # Suppression
//!
//! - `# cookbook-lint: allow(depends-on-poise)` comment

use cookbook_lint_core::{
    Category, FileContext, Node, NodeTag, Offense, Rule, RuleConfig, RuleContext, RuleError,
    Severity,
};

/// Rule code for depends-on-poise.
pub const CODE: &str = "CL002";

/// Rule name for depends-on-poise.
pub const NAME: &str = "depends-on-poise";

const MSG: &str = "Cookbooks should not depend on the deprecated Poise framework";

/// Flags `depends` on disallowed cookbooks in metadata.
#[derive(Debug, Clone)]
pub struct DependsOnPoise {
    /// Cookbook names that may not be depended on.
    pub cookbooks: Vec<String>,
}

impl Default for DependsOnPoise {
    fn default() -> Self {
        Self::new()
    }
}

impl DependsOnPoise {
    /// Creates a new rule disallowing `poise` and `poise-service`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cookbooks: vec!["poise".to_string(), "poise-service".to_string()],
        }
    }

    /// Replaces the disallowed cookbook list.
    #[must_use]
    pub fn disallow(mut self, cookbooks: &[&str]) -> Self {
        self.cookbooks = cookbooks.iter().map(|s| (*s).to_string()).collect();
        self
    }

    /// Applies the `cookbooks` option from configuration.
    #[must_use]
    pub fn configure(mut self, config: &RuleConfig) -> Self {
        if let Some(cookbooks) = config.get_str_array("cookbooks") {
            self.cookbooks = cookbooks;
        }
        self
    }

    fn is_disallowed(&self, name: &str) -> bool {
        self.cookbooks.iter().any(|c| c == name)
    }
}

impl Rule for DependsOnPoise {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids depending on the deprecated Poise cookbooks"
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

    fn applies_to(&self, file: &FileContext<'_>) -> bool {
        file.is_metadata()
    }

    fn check(&self, ctx: &RuleContext<'_>, node: &Node) -> Result<Vec<Offense>, RuleError> {
        if !node.is_command("depends") || node.arguments().len() != 1 {
            return Ok(Vec::new());
        }
        match node.first_string_arg() {
            Some(name) if self.is_disallowed(name) => Ok(vec![ctx.offense(self, node.span, MSG)]),
            _ => Ok(Vec::new()),
        }
    }
}

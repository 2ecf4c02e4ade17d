//! Rule to flag Chef Vault usage in cookbooks built for Effortless.
//!
//! # Rationale
//!
//! Effortless packages run without a Chef Infra Server, so data bags and
//! the Chef Vault items stored in them are unavailable.
//!
//! # Detected Patterns
//!
//! - `require 'chef-vault'`
//! - `include_recipe 'chef-vault'`
//! - `chef_gem 'chef-vault'`
//! - `chef_vault_item(bag, item)`
//! - `chef_vault_item_for_environment(bag, item)`
//! - `ChefVault::Item`
//!
//! # Suppression
//!
//! - `# cookbook-lint: allow(chef-vault-used)` comment

use cookbook_lint_core::{
    Category, Node, NodeTag, Offense, Rule, RuleContext, RuleError, Severity,
};

/// Rule code for chef-vault-used.
pub const CODE: &str = "CL004";

/// Rule name for chef-vault-used.
pub const NAME: &str = "chef-vault-used";

const MSG: &str = "Chef Vault usage is not supported in the Effortless pattern";

/// Methods loading the `chef-vault` gem or cookbook.
const LOADERS: &[&str] = &["require", "include_recipe", "chef_gem"];

/// Helpers reading a vault item.
const ITEM_HELPERS: &[&str] = &["chef_vault_item", "chef_vault_item_for_environment"];

/// Flags Chef Vault helpers, requires and constants.
#[derive(Debug, Clone, Default)]
pub struct ChefVaultUsed;

impl ChefVaultUsed {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn is_vault_call(node: &Node) -> bool {
        let Some(method) = node.method_name() else {
            return false;
        };
        if node.receiver().is_some() {
            return false;
        }
        let args = node.arguments();
        if LOADERS.contains(&method) {
            return args.len() == 1 && args[0].str_value() == Some("chef-vault");
        }
        ITEM_HELPERS.contains(&method) && args.len() == 2
    }
}

impl Rule for ChefVaultUsed {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Flags Chef Vault usage, which Effortless packages cannot support"
    }

    fn category(&self) -> Category {
        Category::Effortless
    }

    fn default_severity(&self) -> Severity {
        Severity::Refactor
    }

    fn node_kinds(&self) -> &'static [NodeTag] {
        &[NodeTag::Call, NodeTag::Const]
    }

    fn check(&self, ctx: &RuleContext<'_>, node: &Node) -> Result<Vec<Offense>, RuleError> {
        let matched = match node.tag() {
            NodeTag::Call => Self::is_vault_call(node),
            NodeTag::Const => node.is_const_path(&["ChefVault", "Item"]),
            _ => false,
        };
        if matched {
            Ok(vec![ctx.offense(self, node.span, MSG)])
        } else {
            Ok(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{check, flagged};

    const RECIPE: &str = "recipes/default.rb";

    #[test]
    fn test_detects_loaders() {
        let src = "require 'chef-vault'\ninclude_recipe 'chef-vault'\nchef_gem \"chef-vault\"\n";
        let offenses = check(ChefVaultUsed::new(), RECIPE, src);
        assert_eq!(offenses.len(), 3);
        assert!(offenses.iter().all(|o| o.severity == Severity::Refactor));
        assert_eq!(flagged(src, &offenses[2]), "chef_gem \"chef-vault\"");
    }

    #[test]
    fn test_detects_item_helpers_with_two_arguments() {
        let src = "creds = chef_vault_item('secrets', 'db')\nenv = chef_vault_item_for_environment('secrets', 'db')\n";
        let offenses = check(ChefVaultUsed::new(), RECIPE, src);
        assert_eq!(offenses.len(), 2);
        assert_eq!(flagged(src, &offenses[0]), "chef_vault_item('secrets', 'db')");
    }

    #[test]
    fn test_ignores_other_arities() {
        let src = "chef_vault_item('secrets')\nrequire 'chef-vault', 'x'\nchef_gem 'chef-vault' do\n  action :install\nend\n";
        let offenses = check(ChefVaultUsed::new(), RECIPE, src);
        // the block form is still a single-argument chef_gem call
        assert_eq!(offenses.len(), 1);
        assert_eq!(offenses[0].location.line, 3);
    }

    #[test]
    fn test_detects_item_constant() {
        let src = "item = ChefVault::Item.load('secrets', 'db')\n";
        let offenses = check(ChefVaultUsed::new(), RECIPE, src);
        assert_eq!(offenses.len(), 1);
        assert_eq!(flagged(src, &offenses[0]), "ChefVault::Item");
    }

    #[test]
    fn test_ignores_unrelated_code() {
        let src = "require 'json'\nfoo.chef_vault_item('a', 'b')\nChefVault.new\ninclude_recipe 'vault'\n";
        assert!(check(ChefVaultUsed::new(), RECIPE, src).is_empty());
    }
}

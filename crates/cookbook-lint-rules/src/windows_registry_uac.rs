//! Rule to prefer `windows_uac` over raw UAC registry keys.
//!
//! # Rationale
//!
//! Chef Infra Client 15.0 ships a `windows_uac` resource. Setting the
//! policy registry values by hand duplicates it and is easy to get wrong.
//!
//! # Detected Patterns
//!
//! A `registry_key` resource block whose key is under
//! `HKLM\SOFTWARE\Microsoft\Windows\CurrentVersion\Policies\System`
//! (`HKEY_LOCAL_MACHINE` also accepted, case-insensitive). The key is read
//! from a `key` property in the block, else from the resource name.
//!
//! ```ruby
//! registry_key 'HKEY_LOCAL_MACHINE\SOFTWARE\Microsoft\Windows\CurrentVersion\Policies\System' do
//!   values [{ name: 'EnableLUA', type: :dword, data: 0 }]
//!   action :create
//! end
//! ```
//!
//! `registry_key('...')` without a block, as used in InSpec, is not matched.
//! Only applies when the target version is 15.0 or later.
//!
//! # Suppression
//!
//! - `# cookbook-lint: allow(windows-registry-uac)` comment

use cookbook_lint_core::{
    Category, Node, NodeTag, Offense, Rule, RuleContext, RuleError, Severity, TargetVersion,
};
use regex::Regex;
use std::sync::LazyLock;

/// Rule code for windows-registry-uac.
pub const CODE: &str = "CL007";

/// Rule name for windows-registry-uac.
pub const NAME: &str = "windows-registry-uac";

const MSG: &str = "Chef Infra Client 15.0 and later includes a windows_uac resource that should be used to set Windows UAC values instead of setting registry keys directly.";

static RE_UAC_KEY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(HKLM|HKEY_LOCAL_MACHINE)\\SOFTWARE\\Microsoft\\Windows\\CurrentVersion\\Policies\\System",
    )
    .unwrap()
});

/// Flags `registry_key` resources managing UAC policy values.
#[derive(Debug, Clone, Default)]
pub struct WindowsRegistryUac;

impl WindowsRegistryUac {
    /// Creates a new rule.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Registry path managed by a `registry_key` block.
    fn managed_key(block: &Node) -> Option<&str> {
        let call = block.block_call()?;
        if !call.is_command("registry_key") {
            return None;
        }
        let property = block
            .block_body()
            .iter()
            .find(|n| n.is_command("key"))
            .and_then(Node::first_string_arg);
        property.or_else(|| call.first_string_arg())
    }
}

impl Rule for WindowsRegistryUac {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Prefers the windows_uac resource over UAC registry keys"
    }

    fn category(&self) -> Category {
        Category::Modernize
    }

    fn default_severity(&self) -> Severity {
        Severity::Refactor
    }

    fn node_kinds(&self) -> &'static [NodeTag] {
        &[NodeTag::Block]
    }

    fn minimum_version(&self) -> Option<TargetVersion> {
        Some(TargetVersion::new(15, 0))
    }

    fn check(&self, ctx: &RuleContext<'_>, node: &Node) -> Result<Vec<Offense>, RuleError> {
        match Self::managed_key(node) {
            Some(key) if RE_UAC_KEY.is_match(key) => Ok(vec![ctx.offense(self, node.span, MSG)]),
            _ => Ok(Vec::new()),
        }
    }
}

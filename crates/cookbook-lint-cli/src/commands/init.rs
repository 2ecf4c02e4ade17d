//! Init command implementation.

use anyhow::{bail, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# cookbook-lint configuration

# Rule preset: "recommended" (default), "all" or "deprecations"
preset = "recommended"

# Lowest severity that fails the run: "refactor", "warning" or "error"
# fail_on = "warning"

# Chef Infra Client version the cookbooks target. Rules for newer
# releases are skipped when set.
# target_version = "15.0"

# Year used for copyright ranges (default: current year)
# current_year = 2024

[analyzer]
# Root directory to analyze (default: current directory)
# root = "./cookbooks"

# Glob patterns to exclude from analysis
exclude = [
    "**/vendor/**",
    "**/.kitchen/**",
]

# Respect .gitignore files
respect_gitignore = true

# Worker threads (default: one per CPU)
# parallelism = 4

# Rule configurations
# Each rule can be enabled/disabled and have its severity overridden

[rules.depends-on-poise]
enabled = true
# severity = "error"
cookbooks = ["poise", "poise-service"]

[rules.copyright-comment-format]
enabled = true

# [rules.chef-vault-used]
# enabled = false
"#;

const CONFIG_FILE: &str = "cookbook-lint.toml";

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new(CONFIG_FILE);

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)?;

    println!("Created {CONFIG_FILE}");
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_FILE} to configure rules");
    println!("  2. Run: cookbook-lint check");

    Ok(())
}

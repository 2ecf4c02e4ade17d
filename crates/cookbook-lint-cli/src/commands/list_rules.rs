//! List rules command implementation.

use cookbook_lint_rules::{all_rules, Preset};

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!(
        "{:<7} {:<29} {:<13} {:<9} {:<5} {:<4} Description",
        "Code", "Name", "Category", "Severity", "Min", "Fix"
    );
    println!("{}", "-".repeat(100));

    for rule in all_rules() {
        let min = rule
            .minimum_version()
            .map_or_else(|| "-".to_string(), |v| v.to_string());
        let fix = if rule.is_autocorrectable() { "yes" } else { "-" };
        println!(
            "{:<7} {:<29} {:<13} {:<9} {:<5} {:<4} {}",
            rule.code(),
            rule.name(),
            rule.category().to_string(),
            rule.default_severity().to_string(),
            min,
            fix,
            rule.description()
        );
    }

    println!("\nPresets:");
    for preset in [Preset::Recommended, Preset::All, Preset::Deprecations] {
        let codes: Vec<&str> = preset.rules().iter().map(|r| r.code()).collect();
        let default = if preset == Preset::default() {
            " (default)"
        } else {
            ""
        };
        println!("  {:<13} - {}{default}", preset.name(), codes.join(", "));
    }

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  cookbook-lint check --rules provides-metadata,depends-on-poise");
    println!("  cookbook-lint check --rules CL001,CL003 --target-version 15.0");
}

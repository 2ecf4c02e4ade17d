//! Shared output formatting for lint results.

use anyhow::Result;
use cookbook_lint_core::{LintResult, Severity};

use crate::OutputFormat;

const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const BLUE: &str = "\x1b[34m";
const GREEN: &str = "\x1b[32m";
const RESET: &str = "\x1b[0m";

/// Print lint results in the specified format.
pub fn print(result: &LintResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
    }
    Ok(())
}

fn print_text(result: &LintResult) {
    let counts = result.count_by_severity();

    for offense in &result.offenses {
        let color = match offense.severity {
            Severity::Error => RED,
            Severity::Warning => YELLOW,
            Severity::Refactor => BLUE,
        };

        println!(
            "{} {} at {}:{}:{}",
            offense.code,
            offense.rule,
            offense.location.file.display(),
            offense.location.line,
            offense.location.column,
        );
        let corrected = if offense.corrected {
            format!(" {GREEN}[corrected]{RESET}")
        } else {
            String::new()
        };
        println!("  {color}{}{RESET}: {}{corrected}", offense.severity, offense.message);
        if let Some(suggestion) = &offense.suggestion {
            println!("  = help: {}", suggestion.message);
        }
        println!();
    }

    for error in &result.errors {
        println!("{RED}{error}{RESET}");
    }
    if !result.errors.is_empty() {
        println!();
    }

    let summary_color = if counts.errors > 0 || !result.errors.is_empty() {
        RED
    } else if counts.warnings > 0 {
        YELLOW
    } else if counts.refactors > 0 {
        BLUE
    } else {
        GREEN
    };

    let mut summary = format!(
        "Found {} error(s), {} warning(s), {} refactor(s) in {} file(s)",
        counts.errors, counts.warnings, counts.refactors, result.files_checked
    );
    let corrected = result.corrected_count();
    if corrected > 0 {
        summary.push_str(&format!(", {corrected} corrected"));
    }
    println!("{summary_color}{summary}{RESET}");
}

fn print_json(result: &LintResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &LintResult) {
    for offense in &result.offenses {
        println!("{offense}");
    }
    for error in &result.errors {
        println!("{error}");
    }
}

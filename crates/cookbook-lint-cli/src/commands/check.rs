//! Check command implementation.

use anyhow::{bail, Context, Result};
use chrono::Datelike;
use cookbook_lint_core::{Analyzer, Config, RuleBox};
use cookbook_lint_rules::{all_rules, apply_rule_options, rule_by_name, rules_from_config};
use cookbook_lint_ruby::RubyParser;
use std::path::{Path, PathBuf};

use crate::config_resolver;
use crate::CheckArgs;

/// Runs the check command and returns the process exit code.
pub fn run(args: &CheckArgs, config_path: Option<&Path>) -> Result<i32> {
    let project_dir = project_dir(&args.paths);
    let mut config = config_resolver::resolve(&project_dir, config_path).load()?;
    apply_overrides(&mut config, args);

    let rules = match &args.rules {
        Some(filter) => filter_rules(filter, &config)?,
        None => rules_from_config(&config)?,
    };

    let current_year = config
        .current_year
        .unwrap_or_else(|| chrono::Local::now().year());
    let fail_on = config.fail_on();

    let mut builder = Analyzer::builder()
        .parser(RubyParser::new())
        .rules(rules)
        .excludes(args.exclude.iter().cloned())
        .autocorrect(args.autocorrect)
        .current_year(current_year);
    builder = match args.paths.as_slice() {
        [dir] if dir.is_dir() => builder.root(dir),
        paths => builder.paths(paths.iter().cloned()),
    };

    let analyzer = builder
        .config(config)
        .build()
        .context("Failed to build analyzer")?;

    tracing::info!(
        "Analyzing {} with {} rules",
        analyzer.root().display(),
        analyzer.rule_count()
    );

    let result = analyzer.analyze().context("Analysis failed")?;

    super::output::print(&result, args.format)?;

    Ok(result.exit_code(fail_on))
}

/// Directory searched for a project config file.
fn project_dir(paths: &[PathBuf]) -> PathBuf {
    match paths.first() {
        Some(p) if p.is_dir() => p.clone(),
        Some(p) => p
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf),
        None => PathBuf::from("."),
    }
}

/// Command-line flags take precedence over the config file.
fn apply_overrides(config: &mut Config, args: &CheckArgs) {
    if let Some(preset) = &args.preset {
        config.preset = Some(preset.clone());
    }
    if args.fail_on.is_some() {
        config.fail_on = args.fail_on;
    }
    if args.target_version.is_some() {
        config.target_version = args.target_version;
    }
    if args.current_year.is_some() {
        config.current_year = args.current_year;
    }
}

fn filter_rules(filter: &str, config: &Config) -> Result<Vec<RuleBox>> {
    let wanted: Vec<&str> = filter
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();

    for name in &wanted {
        if rule_by_name(name).is_none() {
            tracing::warn!("Unknown rule: {}", name);
        }
    }

    let selected: Vec<RuleBox> = all_rules()
        .into_iter()
        .filter(|r| wanted.contains(&r.name()) || wanted.contains(&r.code()))
        .collect();
    if selected.is_empty() {
        bail!("No known rules in --rules '{filter}'");
    }
    Ok(apply_rule_options(selected, config))
}

//! cookbook-lint CLI tool.
//!
//! Usage:
//! ```bash
//! cookbook-lint check [OPTIONS] [PATHS]...
//! cookbook-lint list-rules
//! cookbook-lint init
//! ```

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use cookbook_lint_core::{Severity, TargetVersion};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Linter and autocorrector for Chef cookbooks
#[derive(Parser)]
#[command(name = "cookbook-lint")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run lint checks
    Check(CheckArgs),

    /// List available rules
    ListRules,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Options for `cookbook-lint check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Cookbook directories or files to analyze (default: current directory)
    #[arg(default_value = ".")]
    pub paths: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Only run specific rules (comma-separated names or codes)
    #[arg(long)]
    pub rules: Option<String>,

    /// Exclude patterns (can be specified multiple times)
    #[arg(short, long)]
    pub exclude: Vec<String>,

    /// Chef Infra Client version the cookbooks target (e.g. 14.3)
    #[arg(short, long)]
    pub target_version: Option<TargetVersion>,

    /// Apply automatic corrections in place
    #[arg(short, long)]
    pub autocorrect: bool,

    /// Lowest severity that makes the run fail
    #[arg(long)]
    pub fail_on: Option<Severity>,

    /// Year used for copyright ranges (default: local clock)
    #[arg(long)]
    pub current_year: Option<i32>,

    /// Rule preset: recommended, all or deprecations
    #[arg(long)]
    pub preset: Option<String>,
}

/// Output format for lint results.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-offense compact format.
    Compact,
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("error: {e:#}");
            std::process::exit(2);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    match cli.command {
        Commands::Check(args) => commands::check::run(&args, cli.config.as_deref()),
        Commands::ListRules => {
            commands::list_rules::run();
            Ok(0)
        }
        Commands::Init { force } => commands::init::run(force).map(|()| 0),
    }
}

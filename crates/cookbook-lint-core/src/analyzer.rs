//! Multi-file orchestration: discovery, parallel linting and autocorrect.

use crate::config::{Config, RuleConfig};
use crate::context::FileContext;
use crate::corrector;
use crate::evaluator::Evaluator;
use crate::parser::SourceParser;
use crate::registry::{DuplicateRuleError, RuleRegistry};
use crate::rule::{Rule, RuleBox};
use crate::types::{Correction, FileError, FileErrorKind, LintResult, Offense};
use crate::version::TargetVersion;

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Upper bound on re-evaluation passes while autocorrecting one file.
pub const MAX_CORRECTION_PASSES: usize = 10;

/// Errors that abort a whole run.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error resolving paths.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error walking a directory.
    #[error("Failed to walk directory: {0}")]
    Walk(#[from] ignore::Error),

    /// A path given to the analyzer does not exist.
    #[error("Path not found: {}", .0.display())]
    PathNotFound(PathBuf),

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Two rules share a name or code.
    #[error(transparent)]
    DuplicateRule(#[from] DuplicateRuleError),

    /// No parser was configured.
    #[error("No source parser configured")]
    MissingParser,

    /// No current year was configured.
    #[error("No current year configured; set it on the builder or as `current_year` in config")]
    MissingCurrentYear,

    /// The worker pool could not be created.
    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    paths: Vec<PathBuf>,
    root: Option<PathBuf>,
    rules: Vec<RuleBox>,
    parser: Option<Box<dyn SourceParser>>,
    exclude_patterns: Vec<String>,
    include_patterns: Vec<String>,
    config: Option<Config>,
    autocorrect: bool,
    target_version: Option<TargetVersion>,
    current_year: Option<i32>,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file or directory to analyze.
    #[must_use]
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.paths.push(path.into());
        self
    }

    /// Adds several files or directories to analyze.
    #[must_use]
    pub fn paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.paths.extend(paths.into_iter().map(Into::into));
        self
    }

    /// Sets the project root; reported paths are relative to it.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds several boxed rules.
    #[must_use]
    pub fn rules(mut self, rules: impl IntoIterator<Item = RuleBox>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Sets the source parser.
    #[must_use]
    pub fn parser<P: SourceParser + 'static>(mut self, parser: P) -> Self {
        self.parser = Some(Box::new(parser));
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Adds an include glob pattern.
    #[must_use]
    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.include_patterns.push(pattern.into());
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Enables writing corrections back to disk.
    #[must_use]
    pub fn autocorrect(mut self, enabled: bool) -> Self {
        self.autocorrect = enabled;
        self
    }

    /// Sets the target platform version, overriding the config.
    #[must_use]
    pub fn target_version(mut self, version: TargetVersion) -> Self {
        self.target_version = Some(version);
        self
    }

    /// Sets the year used by date-sensitive rules, overriding the config.
    #[must_use]
    pub fn current_year(mut self, year: i32) -> Self {
        self.current_year = Some(year);
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error when two rules collide, no parser or current year is
    /// set, a glob pattern is invalid, or the working directory is unknown.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let config = self.config.unwrap_or_default();
        let parser = self.parser.ok_or(AnalyzerError::MissingParser)?;
        let current_year = self
            .current_year
            .or(config.current_year)
            .ok_or(AnalyzerError::MissingCurrentYear)?;

        let mut registry = RuleRegistry::new();
        for rule in self.rules {
            registry.register(rule)?;
        }

        let cwd = std::env::current_dir()?;
        let absolute = |p: PathBuf| if p.is_absolute() { p } else { cwd.join(p) };

        let root = absolute(self.root.unwrap_or_else(|| config.analyzer.root.clone()));
        let paths = if self.paths.is_empty() {
            vec![root.clone()]
        } else {
            self.paths.into_iter().map(absolute).collect()
        };

        let mut exclude = self.exclude_patterns;
        exclude.extend(config.analyzer.exclude.iter().cloned());
        let mut include = self.include_patterns;
        include.extend(config.analyzer.include.iter().cloned());

        Ok(Analyzer {
            paths,
            root,
            target_version: self.target_version.or(config.target_version),
            current_year,
            registry,
            parser,
            exclude_patterns: compile_patterns(&exclude)?,
            include_patterns: compile_patterns(&include)?,
            autocorrect: self.autocorrect,
            config,
        })
    }
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<glob::Pattern>, glob::PatternError> {
    patterns.iter().map(|p| glob::Pattern::new(p)).collect()
}

/// Result of linting one document.
#[derive(Debug, Clone, Default)]
pub struct FileOutcome {
    /// Path of the document.
    pub path: PathBuf,
    /// Offenses from the first pass, in source order.
    pub offenses: Vec<Offense>,
    /// Failures confined to this document.
    pub errors: Vec<FileError>,
    /// Corrected text when autocorrect changed the document.
    pub corrected: Option<String>,
}

/// The main analyzer that orchestrates lint execution.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    paths: Vec<PathBuf>,
    root: PathBuf,
    registry: RuleRegistry,
    parser: Box<dyn SourceParser>,
    exclude_patterns: Vec<glob::Pattern>,
    include_patterns: Vec<glob::Pattern>,
    config: Config,
    autocorrect: bool,
    target_version: Option<TargetVersion>,
    current_year: i32,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the project root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the registered rules.
    #[must_use]
    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.registry.len()
    }

    /// Gets the configuration for a specific rule.
    #[must_use]
    pub fn rule_config(&self, name: &str, code: &str) -> Option<&RuleConfig> {
        self.config.rule_config(name, code)
    }

    fn evaluator(&self) -> Evaluator<'_> {
        Evaluator::new(&self.registry)
            .with_config(&self.config)
            .with_target_version(self.target_version)
    }

    /// Analyzes every discovered file and returns the merged results.
    ///
    /// Per-file failures are recorded in [`LintResult::errors`]; only
    /// discovery problems abort the run. With autocorrect enabled, changed
    /// files are written back.
    ///
    /// # Errors
    ///
    /// Returns an error if a path is missing or cannot be walked.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {}", self.root.display());

        let files = self.discover_files()?;
        info!("Found {} files to analyze", files.len());

        let run = || -> Vec<FileOutcome> { files.par_iter().map(|p| self.analyze_file(p)).collect() };
        let outcomes = match self.config.analyzer.parallelism {
            Some(threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?
                .install(run),
            None => run(),
        };

        let mut result = LintResult::new();
        result.files_checked = outcomes.len();
        for outcome in outcomes {
            if outcome.corrected.is_some() {
                result.files_corrected += 1;
            }
            result.offenses.extend(outcome.offenses);
            result.errors.extend(outcome.errors);
        }

        result.offenses.sort_by(|a, b| {
            a.location
                .file
                .cmp(&b.location.file)
                .then(a.location.offset.cmp(&b.location.offset))
        });
        result.errors.sort_by(|a, b| a.file.cmp(&b.file).then(a.line.cmp(&b.line)));

        info!(
            "Analysis complete: {} offenses, {} errors in {} files",
            result.offenses.len(),
            result.errors.len(),
            result.files_checked
        );

        Ok(result)
    }

    /// Reads, lints and (when correcting) rewrites one file.
    fn analyze_file(&self, path: &Path) -> FileOutcome {
        debug!("Analyzing: {}", path.display());

        let source = match std::fs::read_to_string(path) {
            Ok(source) => source,
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                return FileOutcome {
                    path: path.to_path_buf(),
                    errors: vec![FileError::new(self.relative(path), FileErrorKind::Io, e.to_string())],
                    ..FileOutcome::default()
                };
            }
        };

        let mut outcome = self.lint_source(path, &source);
        if let Some(corrected) = &outcome.corrected {
            if let Err(e) = std::fs::write(path, corrected) {
                warn!("Failed to write {}: {}", path.display(), e);
                outcome.errors.push(FileError::new(
                    self.relative(path),
                    FileErrorKind::Io,
                    format!("failed to write corrections: {e}"),
                ));
                outcome.corrected = None;
                for offense in &mut outcome.offenses {
                    offense.corrected = false;
                }
            } else {
                info!("Corrected {}", path.display());
            }
        }
        outcome
    }

    /// Lints one document held in memory.
    ///
    /// Parses `source`, evaluates the active rules and, with autocorrect
    /// enabled, computes the corrected text. Nothing is written to disk.
    #[must_use]
    pub fn lint_source(&self, path: &Path, source: &str) -> FileOutcome {
        let ctx = FileContext::new(path, source, &self.root, self.current_year);
        let mut outcome = FileOutcome {
            path: path.to_path_buf(),
            ..FileOutcome::default()
        };

        let ast = match self.parser.parse(source) {
            Ok(ast) => ast,
            Err(e) => {
                let (line, column) = ctx.line_col(e.offset);
                warn!("Failed to parse {}: {}", path.display(), e);
                outcome.errors.push(
                    FileError::new(ctx.relative_path.clone(), FileErrorKind::Syntax, e.message)
                        .at(line, column),
                );
                return outcome;
            }
        };

        let evaluation = self.evaluator().evaluate(&ctx, &ast);
        outcome.errors.extend(evaluation.errors.iter().map(FileError::from));
        outcome.offenses = evaluation.offenses;

        if !self.autocorrect {
            return outcome;
        }

        let corrections = collect_corrections(&outcome.offenses);
        if corrections.is_empty() {
            return outcome;
        }

        match self.correct(path, source, corrections) {
            Ok(text) => {
                for offense in &mut outcome.offenses {
                    offense.corrected = offense.is_correctable();
                }
                if text != source {
                    outcome.corrected = Some(text);
                }
            }
            Err(message) => {
                warn!("Autocorrect abandoned for {}: {}", path.display(), message);
                outcome.errors.push(FileError::new(
                    ctx.relative_path.clone(),
                    FileErrorKind::Correction,
                    message,
                ));
            }
        }
        outcome
    }

    /// Applies corrections until the document reaches a fixed point.
    fn correct(
        &self,
        path: &Path,
        source: &str,
        mut corrections: Vec<Correction>,
    ) -> Result<String, String> {
        let mut text = source.to_string();
        for pass in 1..=MAX_CORRECTION_PASSES {
            text = corrector::apply(&text, &corrections).map_err(|e| e.to_string())?;
            let ast = self
                .parser
                .parse(&text)
                .map_err(|e| format!("corrected source no longer parses: {e}"))?;

            let ctx = FileContext::new(path, &text, &self.root, self.current_year);
            corrections = collect_corrections(&self.evaluator().evaluate(&ctx, &ast).offenses);
            if corrections.is_empty() {
                debug!("{} converged after {} pass(es)", path.display(), pass);
                return Ok(text);
            }
        }

        warn!(
            "{} still has corrections after {} passes",
            path.display(),
            MAX_CORRECTION_PASSES
        );
        Ok(text)
    }

    fn relative(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf)
    }

    /// Discovers source files under the configured paths.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let mut files = Vec::new();

        for path in &self.paths {
            if path.is_file() {
                files.push(path.clone());
                continue;
            }
            if !path.exists() {
                return Err(AnalyzerError::PathNotFound(path.clone()));
            }

            let respect = self.config.analyzer.respect_gitignore;
            let mut builder = ignore::WalkBuilder::new(path);
            builder
                .hidden(false)
                .git_ignore(respect)
                .git_global(respect)
                .git_exclude(respect)
                .ignore(respect)
                .filter_entry(|entry| entry.file_name() != ".git");

            for entry in builder.build() {
                let entry = entry?;
                let candidate = entry.path();
                if !candidate.is_file() || !self.parser.handles(candidate) {
                    continue;
                }
                if self.should_exclude(candidate) {
                    debug!("Excluding: {}", candidate.display());
                    continue;
                }
                files.push(candidate.to_path_buf());
            }
        }

        files.sort();
        files.dedup();
        Ok(files)
    }

    /// Checks include/exclude patterns against the absolute and
    /// root-relative forms of `path`.
    fn should_exclude(&self, path: &Path) -> bool {
        let relative = self.relative(path);
        let matches = |pattern: &glob::Pattern| {
            pattern.matches_path(path) || pattern.matches_path(&relative)
        };

        if self.exclude_patterns.iter().any(matches) {
            return true;
        }
        !self.include_patterns.is_empty() && !self.include_patterns.iter().any(matches)
    }
}

fn collect_corrections(offenses: &[Offense]) -> Vec<Correction> {
    offenses
        .iter()
        .flat_map(|o| o.corrections().iter().cloned())
        .collect()
}

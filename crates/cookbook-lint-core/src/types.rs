//! Core types for offenses, corrections and lint results.

use miette::{Diagnostic, SourceSpan};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity level for offenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Code that works but should be simplified or modernized.
    Refactor,
    /// Deprecated or risky construct that should be addressed.
    Warning,
    /// Construct that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Refactor => write!(f, "refactor"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "refactor" => Ok(Self::Refactor),
            "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            other => Err(format!(
                "unknown severity '{other}' (expected refactor, warning or error)"
            )),
        }
    }
}

/// Source code location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path relative to project root.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed, in bytes).
    pub column: usize,
    /// Byte offset in file.
    pub offset: usize,
    /// Length of the span in bytes.
    pub length: usize,
}

impl Location {
    /// Creates a new location with explicit values.
    #[must_use]
    pub fn new(file: PathBuf, line: usize, column: usize) -> Self {
        Self {
            file,
            line,
            column,
            offset: 0,
            length: 0,
        }
    }

    /// Sets the byte offset and length for this location.
    #[must_use]
    pub fn with_span(mut self, offset: usize, length: usize) -> Self {
        self.offset = offset;
        self.length = length;
        self
    }

    /// Byte offset one past the end of this location.
    #[must_use]
    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}

/// A text edit over a byte range of the original source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correction {
    /// Range to replace.
    pub location: Location,
    /// New text to insert in place of the range.
    pub new_text: String,
}

impl Correction {
    /// Replaces the range with `new_text`.
    #[must_use]
    pub fn replace(location: Location, new_text: impl Into<String>) -> Self {
        Self {
            location,
            new_text: new_text.into(),
        }
    }

    /// Deletes the range.
    #[must_use]
    pub fn remove(location: Location) -> Self {
        Self::replace(location, "")
    }

    /// Inserts `text` at the (empty) location.
    #[must_use]
    pub fn insert(location: Location, text: impl Into<String>) -> Self {
        let location = Location {
            length: 0,
            ..location
        };
        Self::replace(location, text)
    }
}

/// A suggested fix for an offense.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    /// Human-readable description of the fix.
    pub message: String,
    /// Automatic corrections; empty when the fix is manual.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub corrections: Vec<Correction>,
}

impl Suggestion {
    /// Creates a new suggestion without automatic fix.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            corrections: Vec::new(),
        }
    }

    /// Creates a new suggestion with one automatic correction.
    #[must_use]
    pub fn with_fix(message: impl Into<String>, correction: Correction) -> Self {
        Self::with_fixes(message, vec![correction])
    }

    /// Creates a new suggestion with several automatic corrections.
    #[must_use]
    pub fn with_fixes(message: impl Into<String>, corrections: Vec<Correction>) -> Self {
        Self {
            message: message.into(),
            corrections,
        }
    }
}

/// A lint offense found during evaluation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Offense {
    /// Rule code (e.g., "CL001").
    pub code: String,
    /// Rule name (e.g., "chefspec-legacy-runner").
    pub rule: String,
    /// Severity of this offense.
    pub severity: Severity,
    /// Location of the matched construct.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Optional suggestion for fixing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<Suggestion>,
    /// Whether autocorrect fixed this offense.
    #[serde(default)]
    pub corrected: bool,
}

impl Offense {
    /// Creates a new offense.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            location,
            message: message.into(),
            suggestion: None,
            corrected: false,
        }
    }

    /// Adds a suggestion to this offense.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    /// Automatic corrections proposed for this offense.
    #[must_use]
    pub fn corrections(&self) -> &[Correction] {
        self.suggestion
            .as_ref()
            .map_or(&[], |s| s.corrections.as_slice())
    }

    /// Returns true when the offense carries automatic corrections.
    #[must_use]
    pub fn is_correctable(&self) -> bool {
        !self.corrections().is_empty()
    }

    /// Formats the offense for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!(
            "{} {} at {}:{}:{}\n",
            self.code,
            self.rule,
            self.location.file.display(),
            self.location.line,
            self.location.column,
        );
        let corrected = if self.corrected { " [corrected]" } else { "" };
        let _ = writeln!(output, "  {}: {}{corrected}", self.severity, self.message);
        if let Some(suggestion) = &self.suggestion {
            let _ = writeln!(output, "  = help: {}", suggestion.message);
        }
        output
    }
}

impl std::fmt::Display for Offense {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} [{}] {}",
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.severity,
            self.code,
            self.message
        )?;
        if self.corrected {
            write!(f, " [corrected]")?;
        }
        Ok(())
    }
}

/// Converts an Offense to a miette Diagnostic for rich error display.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct OffenseDiagnostic {
    message: String,
    #[help]
    help: Option<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
}

impl From<&Offense> for OffenseDiagnostic {
    fn from(o: &Offense) -> Self {
        Self {
            message: format!("[{}] {}", o.code, o.message),
            help: o.suggestion.as_ref().map(|s| s.message.clone()),
            span: SourceSpan::from((o.location.offset, o.location.length)),
            label_message: o.rule.clone(),
        }
    }
}

/// Category of a per-file failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileErrorKind {
    /// The file could not be parsed; no offenses were produced.
    Syntax,
    /// The file could not be read or written.
    Io,
    /// A rule failed on one node; other offenses are still reported.
    RuleEvaluation,
    /// Autocorrect was abandoned; the file was left unmodified.
    Correction,
}

impl std::fmt::Display for FileErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Syntax => write!(f, "syntax error"),
            Self::Io => write!(f, "io error"),
            Self::RuleEvaluation => write!(f, "rule error"),
            Self::Correction => write!(f, "autocorrect error"),
        }
    }
}

/// An error confined to a single file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileError {
    /// File the error belongs to.
    pub file: PathBuf,
    /// What went wrong.
    pub kind: FileErrorKind,
    /// Human-readable message.
    pub message: String,
    /// Line of the failure, when known (1-indexed).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<usize>,
    /// Column of the failure, when known (1-indexed).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
}

impl FileError {
    /// Creates a file error without position.
    #[must_use]
    pub fn new(file: PathBuf, kind: FileErrorKind, message: impl Into<String>) -> Self {
        Self {
            file,
            kind,
            message: message.into(),
            line: None,
            column: None,
        }
    }

    /// Attaches a position.
    #[must_use]
    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }
}

impl std::fmt::Display for FileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.file.display())?;
        if let (Some(line), Some(column)) = (self.line, self.column) {
            write!(f, ":{line}:{column}")?;
        }
        write!(f, ": {}: {}", self.kind, self.message)
    }
}

/// Offense counts per severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeverityCounts {
    /// Error-level offenses.
    pub errors: usize,
    /// Warning-level offenses.
    pub warnings: usize,
    /// Refactor-level offenses.
    pub refactors: usize,
}

/// Result of running lint analysis.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// All offenses found, sorted by file then position.
    pub offenses: Vec<Offense>,
    /// Per-file failures.
    #[serde(default)]
    pub errors: Vec<FileError>,
    /// Number of files checked.
    pub files_checked: usize,
    /// Number of files rewritten by autocorrect.
    #[serde(default)]
    pub files_corrected: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Offenses that were not fixed by autocorrect.
    pub fn remaining(&self) -> impl Iterator<Item = &Offense> {
        self.offenses.iter().filter(|o| !o.corrected)
    }

    /// Counts offenses by severity, corrected ones included.
    #[must_use]
    pub fn count_by_severity(&self) -> SeverityCounts {
        let mut counts = SeverityCounts::default();
        for offense in &self.offenses {
            match offense.severity {
                Severity::Error => counts.errors += 1,
                Severity::Warning => counts.warnings += 1,
                Severity::Refactor => counts.refactors += 1,
            }
        }
        counts
    }

    /// Number of offenses fixed by autocorrect.
    #[must_use]
    pub fn corrected_count(&self) -> usize {
        self.offenses.iter().filter(|o| o.corrected).count()
    }

    /// Checks if any uncorrected offense meets or exceeds the given severity.
    #[must_use]
    pub fn has_offenses_at(&self, severity: Severity) -> bool {
        self.remaining().any(|o| o.severity >= severity)
    }

    /// Process exit code for this result.
    ///
    /// `2` when any file failed, `1` when uncorrected offenses at or above
    /// `fail_on` remain, `0` otherwise.
    #[must_use]
    pub fn exit_code(&self, fail_on: Severity) -> i32 {
        if !self.errors.is_empty() {
            2
        } else if self.has_offenses_at(fail_on) {
            1
        } else {
            0
        }
    }

    /// Formats offenses and errors as a plain-text report.
    #[must_use]
    pub fn format_report(&self) -> String {
        use std::fmt::Write;

        let mut report = String::new();
        for offense in &self.offenses {
            let _ = writeln!(report, "{}", offense.format());
        }
        for error in &self.errors {
            let _ = writeln!(report, "{error}");
        }

        let counts = self.count_by_severity();
        let _ = write!(
            report,
            "Found {} error(s), {} warning(s), {} refactor(s) in {} file(s)",
            counts.errors, counts.warnings, counts.refactors, self.files_checked
        );
        let corrected = self.corrected_count();
        if corrected > 0 {
            let _ = write!(report, ", {corrected} corrected");
        }
        report.push('\n');
        report
    }

    /// Adds offenses and errors from another result.
    pub fn extend(&mut self, other: Self) {
        self.offenses.extend(other.offenses);
        self.errors.extend(other.errors);
        self.files_checked += other.files_checked;
        self.files_corrected += other.files_corrected;
    }
}

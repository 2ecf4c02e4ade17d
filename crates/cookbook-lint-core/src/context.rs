//! Context types for rule execution.

use crate::ast::Span;
use crate::types::Location;
use std::path::{Path, PathBuf};

/// Role of a file inside a cookbook, derived from its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// `metadata.rb`.
    Metadata,
    /// ChefSpec / RSpec file under `spec/` or named `*_spec.rb`.
    Spec,
    /// Any other source file (recipes, resources, libraries, ...).
    Source,
}

/// Context provided to rules for the file being checked.
///
/// Contains metadata about the file that rules use to make context-aware
/// decisions (e.g. only inspect `metadata.rb`), plus the explicit inputs
/// that must not be read from the environment, like the current year.
#[derive(Debug, Clone)]
pub struct FileContext<'a> {
    /// Path of the file as given to the analyzer.
    pub path: &'a Path,
    /// File contents.
    pub content: &'a str,
    /// Role of this file inside the cookbook.
    pub kind: FileKind,
    /// Path relative to the project root.
    pub relative_path: PathBuf,
    /// Calendar year used by date-sensitive rules.
    pub current_year: i32,
    line_starts: Vec<usize>,
}

impl<'a> FileContext<'a> {
    /// Creates a new file context.
    #[must_use]
    pub fn new(path: &'a Path, content: &'a str, root: &Path, current_year: i32) -> Self {
        let relative_path = path
            .strip_prefix(root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf);
        let line_starts = std::iter::once(0)
            .chain(content.match_indices('\n').map(|(i, _)| i + 1))
            .collect();

        Self {
            path,
            content,
            kind: Self::detect_kind(path),
            relative_path,
            current_year,
            line_starts,
        }
    }

    /// Classifies a file based on path conventions.
    fn detect_kind(path: &Path) -> FileKind {
        let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
        if file_name == "metadata.rb" {
            return FileKind::Metadata;
        }
        if file_name.ends_with("_spec.rb") {
            return FileKind::Spec;
        }
        for component in path.components() {
            if let std::path::Component::Normal(s) = component {
                if s == "spec" {
                    return FileKind::Spec;
                }
            }
        }
        FileKind::Source
    }

    /// Returns true for `metadata.rb`.
    #[must_use]
    pub fn is_metadata(&self) -> bool {
        self.kind == FileKind::Metadata
    }

    /// Source text covered by `span`; empty when out of range.
    #[must_use]
    pub fn text(&self, span: Span) -> &'a str {
        self.content.get(span.start..span.end).unwrap_or("")
    }

    /// Converts a byte offset to a 1-indexed `(line, column)` pair.
    ///
    /// Columns count characters, not bytes.
    #[must_use]
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let line_idx = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        let line_start = self.line_starts.get(line_idx).copied().unwrap_or(0);
        let column = self
            .content
            .get(line_start..offset)
            .map_or_else(|| offset.saturating_sub(line_start), |s| s.chars().count());
        (line_idx + 1, column + 1)
    }

    /// Builds a [`Location`] for `span` in this file.
    #[must_use]
    pub fn location(&self, span: Span) -> Location {
        let (line, column) = self.line_col(span.start);
        Location::new(self.relative_path.clone(), line, column).with_span(span.start, span.len())
    }
}

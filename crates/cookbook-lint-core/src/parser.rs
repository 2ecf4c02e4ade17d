//! Parser collaborator interface.

use crate::ast::Node;
use miette::{Diagnostic, SourceSpan};

/// The document could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(cookbook_lint::syntax))]
pub struct SyntaxError {
    /// Description of the failure.
    pub message: String,
    /// Byte offset of the offending construct.
    pub offset: usize,
    /// Length of the offending construct in bytes.
    pub length: usize,
    #[label("here")]
    span: SourceSpan,
}

impl SyntaxError {
    /// Creates a syntax error at `offset..offset + length`.
    #[must_use]
    pub fn new(message: impl Into<String>, offset: usize, length: usize) -> Self {
        Self {
            message: message.into(),
            offset,
            length,
            span: SourceSpan::from((offset, length)),
        }
    }
}

/// Turns source text into the lint AST.
pub trait SourceParser: Send + Sync {
    /// Identifier of the source language (e.g. "ruby").
    fn language_id(&self) -> &'static str;

    /// File extensions this parser handles, without the dot.
    fn extensions(&self) -> &'static [&'static str];

    /// Parses `source` into a tree rooted at a `Program` node.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError`] when the text is not valid source.
    fn parse(&self, source: &str) -> Result<Node, SyntaxError>;

    /// Returns true when `path` has one of [`Self::extensions`].
    fn handles(&self, path: &std::path::Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions().contains(&ext))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_error_carries_label_span() {
        let err = SyntaxError::new("unexpected 'end'", 12, 3);
        assert_eq!(err.to_string(), "unexpected 'end'");
        let labels: Vec<_> = err.labels().into_iter().flatten().collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].offset(), 12);
        assert_eq!(labels[0].len(), 3);
    }
}

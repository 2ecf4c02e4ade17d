//! Text helpers for rule implementations.

use crate::ast::Span;

/// Widens `span` leftwards over any whitespace, newlines included.
///
/// Used by removals so that deleting a statement does not leave a blank
/// line or trailing spaces behind.
#[must_use]
pub fn range_with_space_to_left(content: &str, span: Span) -> Span {
    let prefix = content.get(..span.start).unwrap_or("");
    let trimmed = prefix.trim_end_matches(char::is_whitespace);
    Span::new(trimmed.len(), span.end)
}

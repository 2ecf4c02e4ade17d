//! Applies corrections to source text.

use crate::types::Correction;

/// Corrections could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CorrectionError {
    /// Two corrections touch the same bytes.
    #[error("overlapping corrections at {first_start}..{first_end} and {second_start}..{second_end}")]
    Overlapping {
        /// Start of the earlier range.
        first_start: usize,
        /// End of the earlier range.
        first_end: usize,
        /// Start of the later range.
        second_start: usize,
        /// End of the later range.
        second_end: usize,
    },

    /// A range lies outside the text or splits a character.
    #[error("correction range {start}..{end} is out of bounds for text of length {len}")]
    OutOfBounds {
        /// Range start.
        start: usize,
        /// Range end.
        end: usize,
        /// Text length in bytes.
        len: usize,
    },
}

fn overlaps(a: (usize, usize), b: (usize, usize)) -> bool {
    let both_inserts_at_same_point = a.0 == a.1 && b.0 == b.1 && a.0 == b.0;
    (a.0 < b.1 && b.0 < a.1) || both_inserts_at_same_point
}

/// Applies `corrections` to `original` in one linear pass.
///
/// Corrections are sorted by start offset; untouched text is copied
/// verbatim. The input order does not matter.
///
/// # Errors
///
/// Returns [`CorrectionError::Overlapping`] when two ranges intersect and
/// [`CorrectionError::OutOfBounds`] for ranges outside `original` or off a
/// char boundary. `original` is never modified.
pub fn apply(original: &str, corrections: &[Correction]) -> Result<String, CorrectionError> {
    let mut sorted: Vec<&Correction> = corrections.iter().collect();
    sorted.sort_by_key(|c| (c.location.offset, c.location.end()));

    for c in &sorted {
        let (start, end) = (c.location.offset, c.location.end());
        if end > original.len() || !original.is_char_boundary(start) || !original.is_char_boundary(end) {
            return Err(CorrectionError::OutOfBounds {
                start,
                end,
                len: original.len(),
            });
        }
    }

    for pair in sorted.windows(2) {
        let a = (pair[0].location.offset, pair[0].location.end());
        let b = (pair[1].location.offset, pair[1].location.end());
        if overlaps(a, b) {
            return Err(CorrectionError::Overlapping {
                first_start: a.0,
                first_end: a.1,
                second_start: b.0,
                second_end: b.1,
            });
        }
    }

    let mut output = String::with_capacity(original.len());
    let mut cursor = 0;
    for c in sorted {
        output.push_str(&original[cursor..c.location.offset]);
        output.push_str(&c.new_text);
        cursor = c.location.end();
    }
    output.push_str(&original[cursor..]);
    Ok(output)
}

// file: src/models/heading.rs
// description: heading record produced by the structure parser
// reference: internal data structures

use serde::{Deserialize, Serialize};

/// A document heading with its markup stripped.
///
/// `position` is the character offset of the heading's first character in
/// the full document text. Heading lists are kept sorted by position with no
/// duplicate positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub text: String,
    pub position: usize,
    pub level: u32,
}

impl Heading {
    pub fn new(text: impl Into<String>, position: usize, level: u32) -> Self {
        Self {
            text: text.into(),
            position,
            level,
        }
    }
}

/// Sorts by position and drops later entries that reuse a position.
pub fn normalize_headings(headings: &mut Vec<Heading>) {
    headings.sort_by_key(|h| h.position);
    headings.dedup_by_key(|h| h.position);
}

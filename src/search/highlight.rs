// file: src/search/highlight.rs
// description: locate keyword occurrences for highlighting in a viewer

use crate::utils::CharOffsets;
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HighlightSpan {
    /// Character offset of the occurrence, comparable with match positions.
    pub position: usize,
    /// Byte range of the occurrence, for slicing the text.
    pub range: Range<usize>,
    /// 1-based line number.
    pub line: usize,
    /// 0-based column, counted in characters.
    pub column: usize,
    pub matched: String,
}

/// Every non-overlapping, case-insensitive keyword occurrence in `text`.
/// Longer keywords take precedence where two would start at the same place.
pub fn highlight_spans<I, S>(text: &str, keywords: I) -> Vec<HighlightSpan>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let Some(pattern) = keyword_pattern(keywords) else {
        return Vec::new();
    };

    let mut spans = Vec::new();
    let mut offsets = CharOffsets::new(text);
    let mut line = 1;
    let mut line_start = 0;
    let mut scanned = 0;

    for found in pattern.find_iter(text) {
        let before = &text[scanned..found.start()];
        if let Some(last_break) = before.rfind('\n') {
            line += before.matches('\n').count();
            line_start = scanned + last_break + 1;
        }
        scanned = found.start();

        spans.push(HighlightSpan {
            position: offsets.char_offset(found.start()),
            range: found.range(),
            line,
            column: text[line_start..found.start()].chars().count(),
            matched: found.as_str().to_string(),
        });
    }

    spans
}

fn keyword_pattern<I, S>(keywords: I) -> Option<Regex>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut words: Vec<String> = keywords
        .into_iter()
        .map(|k| k.as_ref().trim().to_string())
        .filter(|k| !k.is_empty())
        .collect();
    if words.is_empty() {
        return None;
    }

    words.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then_with(|| a.cmp(b)));
    words.dedup();

    let alternation = words
        .iter()
        .map(|w| regex::escape(w))
        .collect::<Vec<_>>()
        .join("|");

    RegexBuilder::new(&alternation)
        .case_insensitive(true)
        .build()
        .ok()
}

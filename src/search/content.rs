// file: src/search/content.rs
// description: paragraph splitting, nearest-heading lookup and snippet extraction

use crate::models::Heading;
use crate::utils::CharOffsets;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // a line break, any whitespace, then another line break
    static ref PARAGRAPH_BREAK: Regex = Regex::new(
        r"\n\s*\n"
    ).expect("PARAGRAPH_BREAK regex is valid");
}

/// Label used for content that has no heading to attach to.
pub const UNTITLED_REGION: &str = "无标题区域";

const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph<'a> {
    pub text: &'a str,
    /// Character offset of the first character of `text` in the full document.
    pub position: usize,
    pub lower: String,
    pub char_len: usize,
}

/// Splits on blank-line separators, skipping whitespace-only pieces. Every
/// paragraph carries its exact offset, so repeated paragraphs stay distinct.
pub fn split_paragraphs(text: &str) -> Vec<Paragraph<'_>> {
    let mut ranges = Vec::new();
    let mut start = 0;
    for separator in PARAGRAPH_BREAK.find_iter(text) {
        ranges.push(start..separator.start());
        start = separator.end();
    }
    ranges.push(start..text.len());

    let mut offsets = CharOffsets::new(text);
    ranges
        .into_iter()
        .map(|range| (range.start, &text[range]))
        .filter(|(_, piece)| !piece.trim().is_empty())
        .map(|(start, piece)| Paragraph {
            text: piece,
            position: offsets.char_offset(start),
            lower: piece.to_lowercase(),
            char_len: piece.chars().count(),
        })
        .collect()
}

/// The heading closest before `position`, or the closest one overall when
/// nothing precedes it. Ties keep the earliest heading in the list.
pub fn nearest_heading(headings: &[Heading], position: usize) -> Option<&Heading> {
    let mut preceding: Option<&Heading> = None;
    for heading in headings.iter().filter(|h| h.position <= position) {
        if preceding.is_none_or(|best| heading.position > best.position) {
            preceding = Some(heading);
        }
    }

    preceding.or_else(|| {
        let mut closest: Option<&Heading> = None;
        for heading in headings {
            if closest.is_none_or(|best| {
                heading.position.abs_diff(position) < best.position.abs_diff(position)
            }) {
                closest = Some(heading);
            }
        }
        closest
    })
}

/// Snippet layout in characters.
#[derive(Debug, Clone, Copy)]
pub struct SnippetWindow {
    pub verbatim_max_chars: usize,
    pub context_before: usize,
    pub context_after: usize,
    pub fallback_chars: usize,
}

/// Short excerpt of `paragraph` around the first keyword that can be located.
///
/// Paragraphs within `verbatim_max_chars` come back whole. Otherwise the
/// excerpt runs from `context_before` chars ahead of the match to
/// `context_after` chars past its end, with "..." marking each truncated
/// side. If no keyword is found the paragraph head is used.
pub fn make_snippet<S: AsRef<str>>(paragraph: &str, keywords: &[S], window: SnippetWindow) -> String {
    let chars: Vec<char> = paragraph.chars().collect();
    if chars.len() <= window.verbatim_max_chars {
        return paragraph.to_string();
    }

    let located = keywords
        .iter()
        .find_map(|k| find_ignore_case(&chars, k.as_ref()));

    match located {
        Some((index, len)) => {
            let start = index.saturating_sub(window.context_before);
            let end = (index + len + window.context_after).min(chars.len());

            let mut snippet = String::new();
            if start > 0 {
                snippet.push_str(ELLIPSIS);
            }
            snippet.extend(&chars[start..end]);
            if end < chars.len() {
                snippet.push_str(ELLIPSIS);
            }
            snippet
        }
        None => {
            let mut snippet: String = chars.iter().take(window.fallback_chars).collect();
            snippet.push_str(ELLIPSIS);
            snippet
        }
    }
}

/// Char index and char length of the first case-insensitive occurrence of `needle`.
fn find_ignore_case(haystack: &[char], needle: &str) -> Option<(usize, usize)> {
    let needle: Vec<char> = needle.chars().flat_map(char::to_lowercase).collect();
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }

    (0..=haystack.len() - needle.len())
        .find(|&start| {
            haystack[start..start + needle.len()]
                .iter()
                .zip(&needle)
                .all(|(h, n)| h.to_lowercase().eq(std::iter::once(*n)))
        })
        .map(|start| (start, needle.len()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn window() -> SnippetWindow {
        SnippetWindow {
            verbatim_max_chars: 100,
            context_before: 40,
            context_after: 60,
            fallback_chars: 100,
        }
    }

    #[test]
    fn test_split_paragraphs_keeps_offsets() {
        let text = "first para\n\n  \n\nsecond\nline\n\n\n";
        let paragraphs = split_paragraphs(text);

        assert_eq!(paragraphs.len(), 2);
        assert_eq!(paragraphs[0].text, "first para");
        assert_eq!(paragraphs[0].position, 0);
        assert_eq!(paragraphs[1].text, "second\nline");
        assert_eq!(&text[paragraphs[1].position..][..6], "second");
    }

    #[test]
    fn test_duplicate_paragraphs_get_their_own_offsets() {
        let text = "same text\n\nother\n\nsame text";
        let paragraphs = split_paragraphs(text);

        assert_eq!(paragraphs.len(), 3);
        assert_eq!(paragraphs[0].position, 0);
        assert_eq!(paragraphs[2].position, 18);
        assert_eq!(paragraphs[2].text, "same text");
    }

    #[test]
    fn test_split_multibyte_paragraphs() {
        let text = "缓存策略\n\n淘汰算法";
        let paragraphs = split_paragraphs(text);

        assert_eq!(paragraphs[1].position, 6);
        assert_eq!(paragraphs[1].char_len, 4);
    }

    #[test]
    fn test_nearest_heading_prefers_preceding() {
        let headings = vec![
            Heading::new("Intro", 10, 1),
            Heading::new("Body", 50, 2),
            Heading::new("End", 90, 1),
        ];

        assert_eq!(nearest_heading(&headings, 60).map(|h| h.text.as_str()), Some("Body"));
        assert_eq!(nearest_heading(&headings, 50).map(|h| h.text.as_str()), Some("Body"));
        // nothing precedes offset 0, so the closest heading wins
        assert_eq!(nearest_heading(&headings, 0).map(|h| h.text.as_str()), Some("Intro"));
        assert!(nearest_heading(&[], 5).is_none());
    }

    #[test]
    fn test_nearest_heading_tie_keeps_first() {
        let headings = vec![Heading::new("A", 20, 1), Heading::new("B", 20, 2)];
        assert_eq!(nearest_heading(&headings, 30).map(|h| h.text.as_str()), Some("A"));
        assert_eq!(nearest_heading(&headings, 10).map(|h| h.text.as_str()), Some("A"));
    }

    #[test]
    fn test_short_paragraph_is_verbatim() {
        let paragraph = "Redis eviction policies are configurable.";
        assert_eq!(make_snippet(paragraph, &["redis"], window()), paragraph);
    }

    #[test]
    fn test_snippet_window_around_keyword() {
        let paragraph = format!("{}Redis{}", "x".repeat(100), "y".repeat(100));
        let snippet = make_snippet(&paragraph, &["redis"], window());

        assert!(snippet.starts_with("..."));
        assert!(snippet.ends_with("..."));
        assert!(snippet.contains("Redis"));
        // 40 before, the keyword itself, 60 after
        assert_eq!(snippet.chars().count(), 40 + 5 + 60 + 6);
        assert!(snippet.chars().count() <= paragraph.chars().count() + 6);
    }

    #[test]
    fn test_snippet_at_paragraph_start_has_no_leading_marker() {
        let paragraph = format!("Redis {}", "z".repeat(150));
        let snippet = make_snippet(&paragraph, &["REDIS"], window());

        assert!(snippet.starts_with("Redis"));
        assert!(snippet.ends_with("..."));
        assert_eq!(snippet.chars().count(), 5 + 60 + 3);
    }

    #[test]
    fn test_snippet_fallback_when_keyword_missing() {
        let paragraph = "缓".repeat(150);
        let snippet = make_snippet(&paragraph, &["jvm"], window());

        assert_eq!(snippet.chars().count(), 103);
        assert!(snippet.ends_with("..."));
    }

    #[test]
    fn test_snippet_uses_next_keyword_when_first_is_absent() {
        let paragraph = format!("{}缓存{}", "a".repeat(120), "b".repeat(120));
        let snippet = make_snippet(&paragraph, &["redis", "缓存"], window());

        assert!(snippet.contains("缓存"));
        assert!(snippet.starts_with("..."));
    }

    #[test]
    fn test_find_ignore_case_counts_chars() {
        let haystack: Vec<char> = "策略 Redis".chars().collect();
        assert_eq!(find_ignore_case(&haystack, "redis"), Some((3, 5)));
        assert_eq!(find_ignore_case(&haystack, "kafka"), None);
        assert_eq!(find_ignore_case(&haystack, ""), None);
    }
}

// file: src/parser/structure.rs
// description: heading detection for markdown and plain-text knowledge bases
// reference: https://docs.rs/pulldown-cmark

use crate::models::heading::normalize_headings;
use crate::models::{DocumentFormat, Heading};
use crate::utils::CharOffsets;
use lazy_static::lazy_static;
use pulldown_cmark::{Event, Parser, Tag, TagEnd};
use regex::Regex;

lazy_static! {
    // "Title" followed by a line of at least three '=' (level 1) or '-' (level 2)
    static ref UNDERLINED_HEADING: Regex = Regex::new(
        r"(?m)^(.+)\n([=\-]{3,})$"
    ).expect("UNDERLINED_HEADING regex is valid");

    // "1. Title", "2.3. Title"
    static ref NUMBERED_HEADING: Regex = Regex::new(
        r"(?m)^(?:\d+\.)+[ \t]+.+$"
    ).expect("NUMBERED_HEADING regex is valid");

    static ref NUMBER_GROUP: Regex = Regex::new(
        r"\d+\."
    ).expect("NUMBER_GROUP regex is valid");

    // Shouted lines such as "INSTALLATION GUIDE"
    static ref UPPERCASE_LINE: Regex = Regex::new(
        r"(?m)^[A-Z \t]{5,}$"
    ).expect("UPPERCASE_LINE regex is valid");
}

/// Uppercase lines are only treated as headings when the other heuristics
/// find fewer than this many.
const MIN_STRUCTURED_HEADINGS: usize = 3;

pub struct StructureParser;

impl StructureParser {
    pub fn new() -> Self {
        Self
    }

    /// Returns headings sorted by character position with unique positions.
    pub fn parse(&self, text: &str, format: DocumentFormat) -> Vec<Heading> {
        let mut headings = match format {
            DocumentFormat::Markdown => self.parse_markdown(text),
            DocumentFormat::PlainText => self.parse_plain_text(text),
        };
        normalize_headings(&mut headings);

        // detectors report byte offsets; sorted order lets one pass convert them
        let mut offsets = CharOffsets::new(text);
        for heading in &mut headings {
            heading.position = offsets.char_offset(heading.position);
        }
        headings
    }

    fn parse_markdown(&self, text: &str) -> Vec<Heading> {
        let mut headings = Vec::new();
        let mut current: Option<(u32, usize, String)> = None;

        for (event, range) in Parser::new(text).into_offset_iter() {
            match event {
                Event::Start(Tag::Heading { level, .. }) => {
                    current = Some((level as u32, range.start, String::new()));
                }
                Event::End(TagEnd::Heading(_)) => {
                    if let Some((level, position, heading_text)) = current.take() {
                        let heading_text = heading_text.trim();
                        if !heading_text.is_empty() {
                            headings.push(Heading::new(heading_text, position, level));
                        }
                    }
                }
                Event::Text(fragment) | Event::Code(fragment) => {
                    if let Some((_, _, ref mut heading_text)) = current {
                        heading_text.push_str(&fragment);
                    }
                }
                Event::SoftBreak | Event::HardBreak => {
                    if let Some((_, _, ref mut heading_text)) = current {
                        heading_text.push(' ');
                    }
                }
                _ => {}
            }
        }

        headings
    }

    fn parse_plain_text(&self, text: &str) -> Vec<Heading> {
        let mut headings = Vec::new();

        for capture in UNDERLINED_HEADING.captures_iter(text) {
            let (Some(whole), Some(title), Some(marker)) =
                (capture.get(0), capture.get(1), capture.get(2))
            else {
                continue;
            };
            let title = title.as_str().trim();
            if title.is_empty() {
                continue;
            }
            let level = if marker.as_str().starts_with('=') { 1 } else { 2 };
            headings.push(Heading::new(title, whole.start(), level));
        }

        for found in NUMBERED_HEADING.find_iter(text) {
            let line = found.as_str().trim();
            let prefix = line.split_whitespace().next().unwrap_or_default();
            let level = NUMBER_GROUP.find_iter(prefix).count() as u32;
            headings.push(Heading::new(line, found.start(), level.max(1)));
        }

        if headings.len() < MIN_STRUCTURED_HEADINGS {
            for found in UPPERCASE_LINE.find_iter(text) {
                let line = found.as_str().trim();
                if line.is_empty() {
                    continue;
                }
                headings.push(Heading::new(line, found.start(), 1));
            }
        }

        headings
    }
}

impl Default for StructureParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_markdown_headings_with_offsets() {
        let content = "# Redis Caching\n\nRedis eviction policies.\n\n## JVM `-Xmx` Tuning\n\nBody.";
        let headings = StructureParser::new().parse(content, DocumentFormat::Markdown);

        assert_eq!(
            headings,
            vec![
                Heading::new("Redis Caching", 0, 1),
                Heading::new("JVM -Xmx Tuning", 43, 2),
            ]
        );
        assert!(content[43..].starts_with("## JVM"));
    }

    #[test]
    fn test_markdown_ignores_code_blocks() {
        let content = "# Real\n\n```\n# not a heading\n```\n";
        let headings = StructureParser::new().parse(content, DocumentFormat::Markdown);

        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].text, "Real");
    }

    #[test]
    fn test_markdown_multibyte_positions() {
        let content = "# 缓存\n\n正文内容\n\n## 调优\n";
        let headings = StructureParser::new().parse(content, DocumentFormat::Markdown);

        assert_eq!(headings.len(), 2);
        assert_eq!(headings[1].text, "调优");
        assert_eq!(headings[1].position, 12);

        let tail: String = content.chars().skip(headings[1].position).collect();
        assert!(tail.starts_with("## 调优"));
    }

    #[test]
    fn test_plain_text_underlined_and_numbered() {
        let content = "Overview\n========\n\nText here.\n\nDetails\n-------\n\n1. Setup\n\n1.2. Install steps\n";
        let headings = StructureParser::new().parse(content, DocumentFormat::PlainText);

        let summary: Vec<(&str, u32)> = headings.iter().map(|h| (h.text.as_str(), h.level)).collect();
        assert_eq!(
            summary,
            vec![
                ("Overview", 1),
                ("Details", 2),
                ("1. Setup", 1),
                ("1.2. Install steps", 2),
            ]
        );
        assert_eq!(headings[0].position, 0);
    }

    #[test]
    fn test_plain_text_uppercase_lines_only_when_sparse() {
        let sparse = "INTRODUCTION\n\nsome text\n\nSECOND PART\nmore text\n";
        let headings = StructureParser::new().parse(sparse, DocumentFormat::PlainText);
        assert_eq!(headings.len(), 2);
        assert_eq!(headings[1].text, "SECOND PART");

        let structured = "1. One\n2. Two\n3. Three\nSHOUTED LINE\n";
        let headings = StructureParser::new().parse(structured, DocumentFormat::PlainText);
        assert_eq!(headings.len(), 3);
    }

    #[test]
    fn test_positions_are_unique_and_sorted() {
        let content = "1. Intro\n=====\n\nbody\n";
        let headings = StructureParser::new().parse(content, DocumentFormat::PlainText);

        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].text, "1. Intro");
        assert_eq!(headings[0].level, 1);
        assert!(headings.windows(2).all(|w| w[0].position < w[1].position));
    }
}

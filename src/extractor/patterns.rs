// file: src/extractor/patterns.rs
// description: compiled regex patterns for keyword extraction
// reference: https://docs.rs/regex

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Contiguous ASCII letter runs, used when no stop-word tokenizer is usable
    pub static ref LATIN_WORD: Regex = Regex::new(
        r"\b[a-zA-Z]+\b"
    ).expect("LATIN_WORD regex is valid");

    // Dotted, underscored or hyphenated identifiers (spring-boot, os.path, max_heap)
    pub static ref TECHNICAL_TERM: Regex = Regex::new(
        r"\b[a-zA-Z0-9]+(?:[._-][a-zA-Z0-9]+)*\b"
    ).expect("TECHNICAL_TERM regex is valid");

    // Word-character runs outside the Han block, kept whole across inner '.'
    // and '-' so compounds stay one token; Han text is left to the segmenter
    pub static ref WORD_TOKEN: Regex = Regex::new(
        r"[^\W\p{Han}]+(?:[.\-][^\W\p{Han}]+)*"
    ).expect("WORD_TOKEN regex is valid");
}

/// Characters in the CJK Unified Ideographs block.
pub fn is_cjk(c: char) -> bool {
    ('\u{4e00}'..='\u{9fff}').contains(&c)
}

pub fn contains_cjk(text: &str) -> bool {
    text.chars().any(is_cjk)
}

/// A technical term must be compound: joined by `.`, `_` or `-`.
pub fn is_compound_term(term: &str) -> bool {
    term.contains(['.', '_', '-'])
}

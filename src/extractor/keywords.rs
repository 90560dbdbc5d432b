// file: src/extractor/keywords.rs
// description: keyword extraction from mixed Chinese/English queries and transcripts
// reference: segmentation, stop-word filtering and technical-term patterns

use crate::config::ExtractionConfig;
use crate::extractor::capability::{self, Segmenter, WordTokenizer};
use crate::extractor::patterns::{LATIN_WORD, TECHNICAL_TERM, contains_cjk, is_compound_term};
use std::collections::BTreeSet;
use tracing::debug;

/// Turns a typed query or a speech transcript into a set of search terms.
///
/// Every token class is best-effort: a missing or failing capability falls
/// back to a simpler strategy and never aborts the extraction.
pub struct KeywordExtractor {
    segmenter: Box<dyn Segmenter>,
    tokenizer: Box<dyn WordTokenizer>,
    config: ExtractionConfig,
}

impl KeywordExtractor {
    pub fn new(config: ExtractionConfig) -> Self {
        let segmenter = capability::default_segmenter(config.enable_segmenter);
        let tokenizer = capability::default_tokenizer(config.enable_stopword_tokenizer);
        Self::with_capabilities(segmenter, tokenizer, config)
    }

    pub fn with_capabilities(
        segmenter: Box<dyn Segmenter>,
        tokenizer: Box<dyn WordTokenizer>,
        config: ExtractionConfig,
    ) -> Self {
        Self {
            segmenter,
            tokenizer,
            config,
        }
    }

    pub fn extract_keywords(&self, text: &str) -> BTreeSet<String> {
        let mut keywords = BTreeSet::new();

        if contains_cjk(text) {
            keywords.extend(self.cjk_words(text));
        }

        keywords.extend(self.latin_words(text));
        keywords.extend(self.technical_terms(text));

        if keywords.is_empty() && text.chars().count() < self.config.short_query_chars {
            keywords.insert(text.to_string());
        }

        debug!("Extracted {} keywords from query", keywords.len());
        keywords
    }

    fn cjk_words(&self, text: &str) -> Vec<String> {
        match self.segmenter.segment(text) {
            Ok(words) => words
                .iter()
                .map(|w| w.trim())
                .filter(|w| w.chars().count() >= self.config.min_cjk_word_chars)
                .filter(|w| !w.chars().all(char::is_numeric))
                .filter(|w| w.chars().any(char::is_alphanumeric))
                .map(str::to_lowercase)
                .collect(),
            Err(e) => {
                debug!("Skipping CJK segmentation: {}", e);
                Vec::new()
            }
        }
    }

    fn latin_words(&self, text: &str) -> Vec<String> {
        match self.tokenizer.tokenize(text) {
            Ok(tokens) => tokens
                .iter()
                .filter(|t| t.chars().all(char::is_alphanumeric))
                .filter(|t| t.chars().count() >= self.config.min_latin_word_chars)
                .map(|t| t.to_lowercase())
                .filter(|t| !self.tokenizer.is_stopword(t))
                .collect(),
            Err(e) => {
                debug!(
                    "{} unusable ({}), using letter-run fallback",
                    self.tokenizer.name(),
                    e
                );
                self.letter_runs(text)
            }
        }
    }

    fn letter_runs(&self, text: &str) -> Vec<String> {
        LATIN_WORD
            .find_iter(text)
            .map(|m| m.as_str())
            .filter(|w| w.len() >= self.config.min_latin_word_chars)
            .map(str::to_lowercase)
            .collect()
    }

    fn technical_terms(&self, text: &str) -> Vec<String> {
        TECHNICAL_TERM
            .find_iter(text)
            .map(|m| m.as_str())
            .filter(|t| t.len() >= self.config.min_technical_term_chars && is_compound_term(t))
            .map(str::to_lowercase)
            .collect()
    }
}

impl Default for KeywordExtractor {
    fn default() -> Self {
        Self::new(ExtractionConfig::default())
    }
}

/// Extracts keywords with the default capabilities and thresholds.
pub fn extract_keywords(text: &str) -> BTreeSet<String> {
    KeywordExtractor::default().extract_keywords(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CapabilityError;
    use crate::extractor::capability::{StopwordTokenizer, Unavailable};
    use pretty_assertions::assert_eq;

    struct FailingTokenizer;

    impl WordTokenizer for FailingTokenizer {
        fn name(&self) -> &'static str {
            "failing tokenizer"
        }

        fn tokenize(&self, _text: &str) -> Result<Vec<String>, CapabilityError> {
            Err(CapabilityError::Failed {
                capability: "failing tokenizer",
                message: "model data missing".to_string(),
            })
        }

        fn is_stopword(&self, _word: &str) -> bool {
            false
        }
    }

    fn set(words: &[&str]) -> BTreeSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn bare_extractor() -> KeywordExtractor {
        KeywordExtractor::with_capabilities(
            Box::new(Unavailable::new("segmenter")),
            Box::new(Unavailable::new("tokenizer")),
            ExtractionConfig::default(),
        )
    }

    #[test]
    fn test_english_query_drops_stopwords() {
        let extractor = KeywordExtractor::with_capabilities(
            Box::new(Unavailable::new("segmenter")),
            Box::new(StopwordTokenizer),
            ExtractionConfig::default(),
        );

        let keywords = extractor.extract_keywords("What are the Redis eviction policies?");
        assert_eq!(keywords, set(&["eviction", "policies", "redis"]));
    }

    #[test]
    fn test_tokenizer_keeps_digits_and_drops_short_tokens() {
        let extractor = KeywordExtractor::with_capabilities(
            Box::new(Unavailable::new("segmenter")),
            Box::new(StopwordTokenizer),
            ExtractionConfig::default(),
        );

        let keywords = extractor.extract_keywords("GC in JDK 2023 vs go");
        assert_eq!(keywords, set(&["2023", "jdk"]));
    }

    #[test]
    fn test_tokenizer_leaves_compounds_to_technical_terms() {
        let extractor = KeywordExtractor::with_capabilities(
            Box::new(Unavailable::new("segmenter")),
            Box::new(StopwordTokenizer),
            ExtractionConfig::default(),
        );

        let keywords = extractor.extract_keywords("configure spring-boot via application.yml");
        assert_eq!(
            keywords,
            set(&["application.yml", "configure", "spring-boot", "via"])
        );
    }

    #[test]
    fn test_technical_terms_are_extracted() {
        let keywords = bare_extractor().extract_keywords("configure spring-boot with application.yml");
        assert!(keywords.contains("spring-boot"));
        assert!(keywords.contains("application.yml"));
        assert!(keywords.contains("configure"));
        assert!(keywords.contains("spring"));
    }

    #[test]
    fn test_failing_tokenizer_falls_back_to_letter_runs() {
        let extractor = KeywordExtractor::with_capabilities(
            Box::new(Unavailable::new("segmenter")),
            Box::new(FailingTokenizer),
            ExtractionConfig::default(),
        );

        let keywords = extractor.extract_keywords("the JVM heap");
        assert_eq!(keywords, set(&["heap", "jvm", "the"]));
    }

    #[test]
    fn test_short_query_fallback() {
        let extractor = bare_extractor();
        assert_eq!(extractor.extract_keywords("ab"), set(&["ab"]));
        assert_eq!(extractor.extract_keywords(""), set(&[""]));
        assert_eq!(extractor.extract_keywords("C#"), set(&["C#"]));
    }

    #[test]
    fn test_long_query_without_tokens_yields_nothing() {
        let query = "1 2 3 4 5 6 7 8 9 ".repeat(4);
        assert!(query.chars().count() >= 50);
        assert!(bare_extractor().extract_keywords(&query).is_empty());
    }

    #[test]
    fn test_cjk_without_segmenter_uses_fallback() {
        let keywords = bare_extractor().extract_keywords("缓存");
        assert_eq!(keywords, set(&["缓存"]));
    }

    #[cfg(feature = "jieba")]
    #[test]
    fn test_mixed_chinese_english_query() {
        let keywords = extract_keywords("我想了解Redis缓存策略");
        assert!(keywords.contains("缓存"));
        assert!(keywords.contains("redis"));
        assert!(keywords.iter().all(|k| k.chars().count() >= 2));
        assert!(!keywords.contains("Redis"));
    }

    #[cfg(feature = "jieba")]
    #[test]
    fn test_numeric_segments_are_dropped() {
        let extractor = KeywordExtractor::with_capabilities(
            Box::new(crate::extractor::capability::JiebaSegmenter),
            Box::new(Unavailable::new("tokenizer")),
            ExtractionConfig::default(),
        );

        let keywords = extractor.extract_keywords("2024年的缓存");
        assert!(!keywords.contains("2024"));
        assert!(keywords.contains("缓存"));
    }
}

// file: src/extractor/capability.rs
// description: pluggable text-processing capabilities used by keyword extraction
// reference: strategy traits with an always-unavailable stub

use crate::error::CapabilityError;
use crate::extractor::patterns::WORD_TOKEN;
use crate::extractor::stopwords;

#[cfg(feature = "jieba")]
use jieba_rs::Jieba;
#[cfg(feature = "jieba")]
use lazy_static::lazy_static;

#[cfg(feature = "jieba")]
lazy_static! {
    static ref JIEBA: Jieba = Jieba::new();
}

/// Splits CJK text into words.
pub trait Segmenter: Send + Sync {
    fn name(&self) -> &'static str;

    fn segment(&self, text: &str) -> Result<Vec<String>, CapabilityError>;
}

/// Splits text into word tokens and knows which words carry no meaning.
pub trait WordTokenizer: Send + Sync {
    fn name(&self) -> &'static str;

    fn tokenize(&self, text: &str) -> Result<Vec<String>, CapabilityError>;

    /// `word` is lowercased.
    fn is_stopword(&self, word: &str) -> bool;
}

/// Dictionary-based Chinese segmentation (jieba, HMM enabled).
#[cfg(feature = "jieba")]
#[derive(Debug, Default, Clone, Copy)]
pub struct JiebaSegmenter;

#[cfg(feature = "jieba")]
impl Segmenter for JiebaSegmenter {
    fn name(&self) -> &'static str {
        "jieba segmenter"
    }

    fn segment(&self, text: &str) -> Result<Vec<String>, CapabilityError> {
        Ok(JIEBA
            .cut(text, true)
            .into_iter()
            .map(str::to_string)
            .collect())
    }
}

/// Splits on whitespace and punctuation, keeping joined identifiers such as
/// `spring-boot` as single tokens. Backed by the standard English stop-word list.
#[derive(Debug, Default, Clone, Copy)]
pub struct StopwordTokenizer;

impl WordTokenizer for StopwordTokenizer {
    fn name(&self) -> &'static str {
        "stop-word tokenizer"
    }

    fn tokenize(&self, text: &str) -> Result<Vec<String>, CapabilityError> {
        Ok(WORD_TOKEN
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect())
    }

    fn is_stopword(&self, word: &str) -> bool {
        stopwords::is_stopword(word)
    }
}

/// Stand-in for a capability that is switched off or not compiled in.
#[derive(Debug, Clone, Copy)]
pub struct Unavailable {
    capability: &'static str,
}

impl Unavailable {
    pub fn new(capability: &'static str) -> Self {
        Self { capability }
    }
}

impl Segmenter for Unavailable {
    fn name(&self) -> &'static str {
        self.capability
    }

    fn segment(&self, _text: &str) -> Result<Vec<String>, CapabilityError> {
        Err(CapabilityError::Unavailable(self.capability))
    }
}

impl WordTokenizer for Unavailable {
    fn name(&self) -> &'static str {
        self.capability
    }

    fn tokenize(&self, _text: &str) -> Result<Vec<String>, CapabilityError> {
        Err(CapabilityError::Unavailable(self.capability))
    }

    fn is_stopword(&self, _word: &str) -> bool {
        false
    }
}

/// The best segmenter this build offers, or `Unavailable` when disabled.
#[cfg(feature = "jieba")]
pub fn default_segmenter(enabled: bool) -> Box<dyn Segmenter> {
    if enabled {
        Box::new(JiebaSegmenter)
    } else {
        Box::new(Unavailable::new("jieba segmenter"))
    }
}

#[cfg(not(feature = "jieba"))]
pub fn default_segmenter(_enabled: bool) -> Box<dyn Segmenter> {
    Box::new(Unavailable::new("jieba segmenter"))
}

pub fn default_tokenizer(enabled: bool) -> Box<dyn WordTokenizer> {
    if enabled {
        Box::new(StopwordTokenizer)
    } else {
        Box::new(Unavailable::new("stop-word tokenizer"))
    }
}

// file: src/extractor/mod.rs
// description: keyword extraction module exports
// reference: internal module structure

pub mod capability;
pub mod keywords;
pub mod patterns;
pub mod stopwords;

#[cfg(feature = "jieba")]
pub use capability::JiebaSegmenter;
pub use capability::{Segmenter, StopwordTokenizer, Unavailable, WordTokenizer};
pub use keywords::{KeywordExtractor, extract_keywords};

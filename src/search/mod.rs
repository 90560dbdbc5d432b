// file: src/search/mod.rs
// description: search module exports

pub mod cache;
pub mod content;
pub mod engine;
pub mod filter;
pub mod highlight;
pub mod ranker;
pub mod scoring;
pub mod similarity;

pub use cache::{CacheKey, SearchCache};
pub use content::{Paragraph, SnippetWindow, UNTITLED_REGION, make_snippet, nearest_heading, split_paragraphs};
pub use engine::{SearchEngine, SearchOutcome};
pub use filter::{MatchFilter, SortOrder, sort_matches};
pub use highlight::{HighlightSpan, highlight_spans};
pub use ranker::{RankedMatcher, RankedResults};
pub use scoring::FuzzyOptions;
pub use similarity::{SequenceRatio, SimilarityMeasure, ratio};

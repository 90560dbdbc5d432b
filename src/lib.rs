// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod config;
pub mod error;
pub mod exporter;
pub mod extractor;
pub mod loader;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod search;
pub mod utils;

pub use config::{
    Config, ExtractionConfig, PipelineConfig, ScoringConfig, SearchConfig, SnippetConfig,
};
pub use error::{CapabilityError, NavigatorError, Result};
pub use exporter::json::{ExportManifest, ExportedSearch, JsonExporter};
pub use extractor::{KeywordExtractor, Segmenter, WordTokenizer, extract_keywords};
pub use loader::DocumentLoader;
pub use models::{DocumentFormat, Heading, KnowledgeBase, MatchType, SearchMatch};
pub use parser::{Outline, OutlineNode, StructureParser, parent_chapter};
pub use pipeline::{BatchReport, BatchSearcher, BatchStats, ProgressTracker, load_queries};
pub use search::{
    HighlightSpan, MatchFilter, RankedMatcher, SearchEngine, SearchOutcome, SimilarityMeasure,
    SortOrder, highlight_spans, sort_matches,
};
pub use utils::{OperationTimer, PerformanceMetrics, Validator};

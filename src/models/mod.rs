// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod heading;
pub mod knowledge_base;
pub mod search_match;

pub use heading::Heading;
pub use knowledge_base::{DocumentFormat, KnowledgeBase};
pub use search_match::{MatchType, SearchMatch};

// file: src/parser/mod.rs
// description: document structure parsing module exports
// reference: internal module structure

pub mod outline;
pub mod structure;

pub use outline::{Outline, OutlineNode, UNKNOWN_CHAPTER, parent_chapter};
pub use structure::StructureParser;

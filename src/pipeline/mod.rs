// file: src/pipeline/mod.rs
// description: batch search module exports

mod batch;
mod progress;

pub use batch::{BatchEntry, BatchReport, BatchSearcher, load_queries};
pub use progress::{BatchStats, ProgressTracker};

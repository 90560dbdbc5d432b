// file: src/utils/mod.rs
// description: utility functions module exports
// reference: internal module structure

pub mod logging;
pub mod offsets;
pub mod telemetry;
pub mod validation;

pub use offsets::CharOffsets;
pub use telemetry::{OperationTimer, PerformanceMetrics};
pub use validation::Validator;

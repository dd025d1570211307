//! Error handling module

pub mod types;

pub use types::PipelineError;

/// Result alias used across the pipeline
pub type Result<T> = std::result::Result<T, PipelineError>;

//! Export AWS Elastic Beanstalk environment variables from a CI job

// Public modules
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod pipeline;
pub mod schemas;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use error::PipelineError;
pub use pipeline::{run, RunSummary};

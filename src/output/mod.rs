//! Output module
//!
//! The two ways a run hands its variables to later CI steps: step outputs
//! recorded through the runner, or a `NAME=VALUE` file.

pub mod actions;
pub mod env_file;

pub use actions::{GithubActionsOutput, OutputSink};
pub use env_file::{render_env_file, verify_env_file, write_env_file};

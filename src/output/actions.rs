//! GitHub Actions step outputs
//!
//! Implements the runner's output protocol: a heredoc entry appended to the
//! file named by `GITHUB_OUTPUT`, or the legacy `::set-output` workflow
//! command on stdout when no output file is provided.

use std::env;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::{PipelineError, Result};

/// Environment variable naming the runner's output file
pub const GITHUB_OUTPUT_ENV: &str = "GITHUB_OUTPUT";

/// Records named results visible to later steps
pub trait OutputSink {
    fn set_output(&mut self, name: &str, value: &str) -> Result<()>;
}

/// Where outputs are recorded
#[derive(Debug, Clone, PartialEq, Eq)]
enum OutputTarget {
    /// Append heredoc entries to the runner's output file
    File(PathBuf),
    /// Print `::set-output` commands to stdout
    Commands,
}

/// Output sink speaking the GitHub Actions runner protocol
#[derive(Debug, Clone)]
pub struct GithubActionsOutput {
    target: OutputTarget,
}

impl GithubActionsOutput {
    /// Pick the target the way the runner toolkit does
    pub fn from_env() -> Self {
        match env::var(GITHUB_OUTPUT_ENV) {
            Ok(path) if !path.trim().is_empty() => Self::to_file(path),
            _ => Self::to_commands(),
        }
    }

    pub fn to_file(path: impl Into<PathBuf>) -> Self {
        Self {
            target: OutputTarget::File(path.into()),
        }
    }

    pub fn to_commands() -> Self {
        Self {
            target: OutputTarget::Commands,
        }
    }

    fn append_to_file(path: &Path, message: &str) -> io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        file.write_all(message.as_bytes())
    }
}

impl OutputSink for GithubActionsOutput {
    fn set_output(&mut self, name: &str, value: &str) -> Result<()> {
        let failure = |message: String| PipelineError::OutputFailure {
            name: name.to_string(),
            message,
        };

        match &self.target {
            OutputTarget::File(path) => {
                let delimiter = format!("ghadelimiter_{}", Uuid::new_v4());
                let message = file_command_message(name, value, &delimiter).map_err(failure)?;
                Self::append_to_file(path, &message).map_err(|err| failure(err.to_string()))?;
            }
            OutputTarget::Commands => {
                let mut stdout = io::stdout().lock();
                stdout
                    .write_all(set_output_command(name, value).as_bytes())
                    .and_then(|_| stdout.flush())
                    .map_err(|err| failure(err.to_string()))?;
            }
        }

        tracing::debug!(output = %name, "Recorded step output");
        Ok(())
    }
}

/// Build a `GITHUB_OUTPUT` heredoc entry
///
/// Fails if the delimiter occurs in the name or the value, since the runner
/// would cut the entry short.
pub fn file_command_message(
    name: &str,
    value: &str,
    delimiter: &str,
) -> std::result::Result<String, String> {
    if name.contains(delimiter) {
        return Err(format!(
            "Unexpected input: name should not contain the delimiter \"{}\"",
            delimiter
        ));
    }
    if value.contains(delimiter) {
        return Err(format!(
            "Unexpected input: value should not contain the delimiter \"{}\"",
            delimiter
        ));
    }
    Ok(format!("{name}<<{delimiter}\n{value}\n{delimiter}\n"))
}

/// Build a legacy `::set-output` workflow command line
pub fn set_output_command(name: &str, value: &str) -> String {
    format!(
        "::set-output name={}::{}\n",
        escape_property(name),
        escape_data(value)
    )
}

/// Escape a command message
pub fn escape_data(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

/// Escape a command property value
pub fn escape_property(s: &str) -> String {
    escape_data(s).replace(':', "%3A").replace(',', "%2C")
}

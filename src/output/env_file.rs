//! Output-file mode
//!
//! Writes the variables as `NAME=VALUE` lines and reads the file back to
//! make sure what landed on disk is exactly what was intended.

use std::fs;
use std::path::Path;

use crate::error::{PipelineError, Result};
use crate::schemas::EnvVariableEntry;

/// Serialize entries as newline-joined `NAME=VALUE` lines, no trailing newline
pub fn render_env_file(entries: &[EnvVariableEntry]) -> String {
    entries
        .iter()
        .map(EnvVariableEntry::to_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Overwrite `path` with the rendered entries, then verify it
///
/// Returns the content that was written.
pub fn write_env_file(path: &Path, entries: &[EnvVariableEntry]) -> Result<String> {
    let content = render_env_file(entries);

    if let Err(err) = fs::write(path, &content) {
        tracing::warn!(path = %path.display(), error = %err, "Failed to write env file");
        return Err(verification_failure(path, &content, String::new()));
    }

    verify_env_file(path, &content)?;
    Ok(content)
}

/// Byte-compare the file at `path` with `expected`
pub fn verify_env_file(path: &Path, expected: &str) -> Result<()> {
    let actual = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "Failed to read back env file");
            return Err(verification_failure(path, expected, String::new()));
        }
    };

    if actual != expected.as_bytes() {
        return Err(verification_failure(
            path,
            expected,
            String::from_utf8_lossy(&actual).into_owned(),
        ));
    }

    Ok(())
}

fn verification_failure(path: &Path, expected: &str, actual: String) -> PipelineError {
    PipelineError::WriteVerificationFailure {
        path: path.display().to_string(),
        expected: expected.to_string(),
        actual,
    }
}

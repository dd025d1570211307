//! Pipeline error types

use thiserror::Error;

/// Every way a run can fail. All variants are fatal and map to exit status 1.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("{field} was not specified in the inputs")]
    MissingInput { field: &'static str },

    #[error("Error while authenticating in AWS: {message}")]
    AuthenticationFailure { message: String },

    #[error("An issue during getting the env configuration settings: {message}")]
    FetchFailure { message: String },

    #[error(
        "The env name {environment} of the application {application} does not have any configuration"
    )]
    EmptyConfiguration {
        environment: String,
        application: String,
        /// Raw service response rendered as JSON
        raw: String,
    },

    #[error("Failed to write env file {path}: content read back does not match")]
    WriteVerificationFailure {
        path: String,
        expected: String,
        actual: String,
    },

    #[error("Failed to record output {name}: {message}")]
    OutputFailure { name: String, message: String },
}

impl PipelineError {
    /// Short name of the failure kind, used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::MissingInput { .. } => "missing_input",
            PipelineError::AuthenticationFailure { .. } => "authentication_failure",
            PipelineError::FetchFailure { .. } => "fetch_failure",
            PipelineError::EmptyConfiguration { .. } => "empty_configuration",
            PipelineError::WriteVerificationFailure { .. } => "write_verification_failure",
            PipelineError::OutputFailure { .. } => "output_failure",
        }
    }

    /// Process exit status for this error
    pub fn exit_code(&self) -> u8 {
        1
    }

    /// Log this error once, with the context that belongs to its kind
    pub fn report(&self) {
        match self {
            PipelineError::EmptyConfiguration { raw, .. } => {
                tracing::error!(kind = self.kind(), data = %raw, "{}", self);
            }
            PipelineError::WriteVerificationFailure {
                expected, actual, ..
            } => {
                tracing::error!(
                    kind = self.kind(),
                    expected = ?expected,
                    actual = ?actual,
                    "{}",
                    self
                );
            }
            _ => tracing::error!(kind = self.kind(), "{}", self),
        }
    }
}

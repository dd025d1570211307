//! Action inputs and run settings
//!
//! This module reads the `INPUT_*` variables the Actions runner exports for
//! each `with:` argument and validates them before anything touches AWS.

use serde::Serialize;
use std::env;

use crate::error::{PipelineError, Result};
use crate::utils::mask_secret;

/// Input variable names as exported by the Actions runner
pub mod inputs {
    pub const REGION: &str = "INPUT_REGION";
    pub const ACCESS_KEY: &str = "INPUT_AWS_ACCESS_KEY";
    pub const SECRET_KEY: &str = "INPUT_AWS_SECRET_KEY";
    pub const ENVIRONMENT_NAME: &str = "INPUT_ENVIRONMENT_NAME";
    pub const APPLICATION_NAME: &str = "INPUT_APPLICATION_NAME";
    pub const USE_ENV_FILE: &str = "INPUT_USE_ENV_FILE";
    pub const FILE_PATH: &str = "INPUT_FILE_PATH";
    pub const ENDPOINT_URL: &str = "INPUT_ENDPOINT_URL";
    pub const LOG_LEVEL: &str = "INPUT_LOG_LEVEL";
}

/// Where the filtered variables end up
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "path")]
pub enum OutputMode {
    /// One step output per variable
    StepOutputs,
    /// `NAME=VALUE` lines written to the given path
    EnvFile(String),
}

/// Validated settings for a single run
#[derive(Debug, Clone, Serialize)]
pub struct Settings {
    // AWS settings
    pub region: String,
    #[serde(skip_serializing)]
    pub aws_access_key_id: String,
    #[serde(skip_serializing)]
    pub aws_secret_access_key: String,
    /// Custom endpoint for every AWS client (LocalStack, mocks)
    pub endpoint_url: Option<String>,

    // Elastic Beanstalk target
    pub environment_name: String,
    pub application_name: String,

    // Output
    pub output: OutputMode,

    // Logging
    pub log_level: String,
}

impl Settings {
    /// Load settings from the process environment
    ///
    /// Outside of a GitHub Actions job a `.env` file in the working directory
    /// is read first if present; variables already set in the environment
    /// win. `output_file` forces output-file mode with that path.
    pub fn load(output_file: Option<String>) -> Result<Self> {
        let lookup = |key: &str| env::var(key).ok();
        if loads_dotenv(&lookup) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup_with(lookup, output_file)
    }

    /// Build settings from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_lookup_with(lookup, None)
    }

    /// Build settings from a lookup, optionally forcing output-file mode
    ///
    /// Required inputs are checked in a fixed order and the first missing one
    /// is reported. A forced output file replaces `INPUT_USE_ENV_FILE` and
    /// `INPUT_FILE_PATH` entirely.
    pub fn from_lookup_with<F>(lookup: F, output_file: Option<String>) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let trimmed = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .unwrap_or_default()
        };

        let region = required(trimmed(inputs::REGION), "Region")?;
        let environment_name = required(trimmed(inputs::ENVIRONMENT_NAME), "Environment's name")?;
        let aws_access_key_id = required(trimmed(inputs::ACCESS_KEY), "AWS Access Key")?;
        let aws_secret_access_key = required(trimmed(inputs::SECRET_KEY), "AWS Secret Key")?;
        let application_name = required(trimmed(inputs::APPLICATION_NAME), "Application's name")?;

        let forced = output_file
            .map(|path| path.trim().to_string())
            .filter(|path| !path.is_empty());

        let output = if let Some(path) = forced {
            OutputMode::EnvFile(path)
        } else if trimmed(inputs::USE_ENV_FILE).eq_ignore_ascii_case("true") {
            OutputMode::EnvFile(required(trimmed(inputs::FILE_PATH), "File path")?)
        } else {
            OutputMode::StepOutputs
        };

        let endpoint_url = Some(trimmed(inputs::ENDPOINT_URL)).filter(|url| !url.is_empty());

        Ok(Self {
            region,
            aws_access_key_id,
            aws_secret_access_key,
            endpoint_url,
            environment_name,
            application_name,
            output,
            log_level: default_log_level(&lookup),
        })
    }

    /// Access key id safe to print in logs
    pub fn masked_access_key(&self) -> String {
        mask_secret(&self.aws_access_key_id, 4)
    }
}

/// Resolve the default log level
///
/// `INPUT_LOG_LEVEL` wins over `LOG_LEVEL`; a runner with step debugging
/// enabled (`RUNNER_DEBUG=1`) defaults to `debug`.
pub fn default_log_level<F>(lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let explicit = [inputs::LOG_LEVEL, "LOG_LEVEL"]
        .into_iter()
        .filter_map(|key| lookup(key))
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty());

    match explicit {
        Some(level) => level,
        None if lookup("RUNNER_DEBUG").as_deref() == Some("1") => "debug".to_string(),
        None => "info".to_string(),
    }
}

/// Whether a `.env` file should be loaded
///
/// Never inside a GitHub Actions job, where the working directory is the
/// checked-out repository and its `.env` would feed the AWS SDK.
pub fn loads_dotenv<F>(lookup: &F) -> bool
where
    F: Fn(&str) -> Option<String>,
{
    lookup("GITHUB_ACTIONS").as_deref() != Some("true")
}

fn required(value: String, field: &'static str) -> Result<String> {
    if value.is_empty() {
        return Err(PipelineError::MissingInput { field });
    }
    Ok(value)
}

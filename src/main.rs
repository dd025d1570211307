//! EBS Env Variables
//!
//! Reads the user-defined environment properties of an Elastic Beanstalk
//! environment and exposes them to the rest of a GitHub Actions job.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use ebs_env_variables::{
    config::Settings,
    logging::ActionsFormat,
    output::GithubActionsOutput,
    services::AwsAuthenticator,
};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// EBS Env Variables
///
/// Inputs come from the `INPUT_*` variables set by the Actions runner.
#[derive(Parser, Debug)]
#[command(name = "ebs-env-variables")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log level: trace, debug, info, warn, error (overrides INPUT_LOG_LEVEL / LOG_LEVEL)
    #[arg(long)]
    log_level: Option<String>,

    /// Write NAME=VALUE lines to this file instead of recording step outputs
    #[arg(long)]
    output_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let output_file = args
        .output_file
        .as_ref()
        .map(|path| path.to_string_lossy().into_owned());
    let settings = Settings::load(output_file);

    // Logging needs a level before the inputs are known to be valid
    let log_level = match (&args.log_level, &settings) {
        (Some(level), _) => level.clone(),
        (None, Ok(settings)) => settings.log_level.clone(),
        (None, Err(_)) => "info".to_string(),
    };
    if let Err(err) = init_tracing(&log_level) {
        eprintln!("::error::{:#}", err);
        return ExitCode::FAILURE;
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Check-ebs-env-variables: GitHub Action for checking AWS Elastic Beanstalk environment's variables"
    );

    let settings = match settings {
        Ok(settings) => settings,
        Err(err) => {
            err.report();
            return ExitCode::from(err.exit_code());
        }
    };

    let authenticator = AwsAuthenticator::new();
    let mut sink = GithubActionsOutput::from_env();

    match ebs_env_variables::run(&settings, &authenticator, &mut sink).await {
        Ok(summary) => {
            tracing::info!(variables = summary.variables.len(), "Completed");
            ExitCode::SUCCESS
        }
        Err(err) => {
            err.report();
            ExitCode::from(err.exit_code())
        }
    }
}

/// Initialize tracing subscriber with the specified log level
///
/// `RUST_LOG` wins over the level when set. Events go to stdout, where the
/// runner picks up the annotation prefixes.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = match tracing_subscriber::EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => tracing_subscriber::EnvFilter::try_new(log_level)
            .with_context(|| format!("Invalid log level: {}", log_level))?,
    };

    let console_layer = fmt::layer()
        .event_format(ActionsFormat)
        .with_writer(std::io::stdout)
        .with_filter(filter);

    tracing_subscriber::registry()
        .with(console_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(())
}

//! Retrieval-and-output pipeline
//!
//! `Validate → Authenticate → Fetch → FilterProject → Emit`. Input validation
//! happens when [`Settings`] is built; everything after it lives here. Every
//! step returns a [`PipelineError`] instead of exiting so the caller owns the
//! single exit point.

use std::path::Path;

use crate::config::{AwsCredentials, OutputMode, Settings};
use crate::error::{PipelineError, Result};
use crate::output::{write_env_file, OutputSink};
use crate::schemas::{ConfigurationBlock, EnvVariableEntry};
use crate::services::{Authenticator, ConfigurationSource};

/// What a successful run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Variables emitted, in service order
    pub variables: Vec<EnvVariableEntry>,
    /// Content written in output-file mode
    pub file_content: Option<String>,
}

/// Run the whole pipeline once
pub async fn run<A, S>(settings: &Settings, authenticator: &A, sink: &mut S) -> Result<RunSummary>
where
    A: Authenticator,
    S: OutputSink,
{
    log_parameters(settings);

    let credentials = AwsCredentials::from_settings(settings);
    let source = authenticator.authenticate(&credentials).await?;

    let variables = fetch_environment_variables(
        &source,
        &settings.environment_name,
        &settings.application_name,
    )
    .await?;

    let file_content = emit(&settings.output, &variables, sink)?;

    Ok(RunSummary {
        variables,
        file_content,
    })
}

/// Fetch the configuration and reduce it to environment variables
pub async fn fetch_environment_variables<C>(
    source: &C,
    environment_name: &str,
    application_name: &str,
) -> Result<Vec<EnvVariableEntry>>
where
    C: ConfigurationSource + ?Sized,
{
    let blocks = source
        .describe_configuration_settings(environment_name, application_name)
        .await?;

    select_environment_variables(environment_name, application_name, blocks)
}

/// Pick the first block and project its environment variables
///
/// Later blocks are ignored with a warning.
pub fn select_environment_variables(
    environment_name: &str,
    application_name: &str,
    blocks: Vec<ConfigurationBlock>,
) -> Result<Vec<EnvVariableEntry>> {
    if blocks.is_empty() {
        let raw = serde_json::json!({ "configuration_settings": blocks }).to_string();
        return Err(PipelineError::EmptyConfiguration {
            environment: environment_name.to_string(),
            application: application_name.to_string(),
            raw,
        });
    }
    let first = &blocks[0];

    if blocks.len() > 1 {
        tracing::warn!(
            returned = blocks.len(),
            ignored = blocks.len() - 1,
            "More than one configuration returned, using the first"
        );
    }

    let variables = first.environment_variables();
    tracing::debug!(
        options = first.options.len(),
        variables = variables.len(),
        "Filtered application environment options"
    );

    Ok(variables)
}

/// Hand the variables to the configured output
///
/// Returns the written content in output-file mode.
pub fn emit<S>(
    output: &OutputMode,
    variables: &[EnvVariableEntry],
    sink: &mut S,
) -> Result<Option<String>>
where
    S: OutputSink + ?Sized,
{
    match output {
        OutputMode::EnvFile(path) => {
            let content = write_env_file(Path::new(path), variables)?;
            tracing::info!(
                path = %path,
                variables = variables.len(),
                "Environment variables written to file"
            );
            Ok(Some(content))
        }
        OutputMode::StepOutputs => {
            for variable in variables {
                sink.set_output(&variable.name, &variable.value)?;
            }
            tracing::info!(
                variables = variables.len(),
                "Environment variables recorded as step outputs"
            );
            Ok(None)
        }
    }
}

fn log_parameters(settings: &Settings) {
    tracing::info!(
        environment = %settings.environment_name,
        region = %settings.region,
        application = %settings.application_name,
        access_key = %settings.masked_access_key(),
        "Checking the AWS EBS environment"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::inputs;
    use crate::schemas::{ConfigurationOption, APPLICATION_ENVIRONMENT_NAMESPACE};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::fs;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct StaticSource {
        blocks: Vec<ConfigurationBlock>,
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl ConfigurationSource for StaticSource {
        async fn describe_configuration_settings(
            &self,
            _environment_name: &str,
            _application_name: &str,
        ) -> Result<Vec<ConfigurationBlock>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.blocks.clone())
        }
    }

    struct StaticAuthenticator {
        blocks: Vec<ConfigurationBlock>,
        reject: bool,
        fetches: Arc<AtomicUsize>,
    }

    impl StaticAuthenticator {
        fn new(blocks: Vec<ConfigurationBlock>) -> Self {
            Self {
                blocks,
                reject: false,
                fetches: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl Authenticator for StaticAuthenticator {
        type Source = StaticSource;

        async fn authenticate(&self, _credentials: &AwsCredentials) -> Result<Self::Source> {
            if self.reject {
                return Err(PipelineError::AuthenticationFailure {
                    message: "InvalidClientTokenId: token is invalid".to_string(),
                });
            }
            Ok(StaticSource {
                blocks: self.blocks.clone(),
                calls: self.fetches.clone(),
            })
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        outputs: Vec<(String, String)>,
    }

    impl OutputSink for RecordingSink {
        fn set_output(&mut self, name: &str, value: &str) -> Result<()> {
            self.outputs.push((name.to_string(), value.to_string()));
            Ok(())
        }
    }

    fn settings() -> Settings {
        settings_with_output(None)
    }

    fn settings_with_output(output_file: Option<&Path>) -> Settings {
        let vars = HashMap::from([
            (inputs::REGION, "us-east-1"),
            (inputs::ACCESS_KEY, "AKIAEXAMPLE"),
            (inputs::SECRET_KEY, "secret"),
            (inputs::ENVIRONMENT_NAME, "shop-prod"),
            (inputs::APPLICATION_NAME, "shop"),
        ]);
        Settings::from_lookup_with(
            |key| vars.get(key).map(|v| v.to_string()),
            output_file.map(|path| path.to_string_lossy().into_owned()),
        )
        .unwrap()
    }

    fn env_option(name: &str, value: &str) -> ConfigurationOption {
        ConfigurationOption::new(APPLICATION_ENVIRONMENT_NAMESPACE, name, value)
    }

    fn sample_block() -> ConfigurationBlock {
        ConfigurationBlock::with_options(vec![
            env_option("FOO", "bar"),
            ConfigurationOption::new("other:ns", "BAZ", "qux"),
        ])
    }

    #[tokio::test]
    async fn test_step_outputs_mode() {
        let authenticator = StaticAuthenticator::new(vec![sample_block()]);
        let mut sink = RecordingSink::default();

        let summary = run(&settings(), &authenticator, &mut sink).await.unwrap();

        assert_eq!(sink.outputs, vec![("FOO".to_string(), "bar".to_string())]);
        assert_eq!(summary.variables, vec![EnvVariableEntry::new("FOO", "bar")]);
        assert_eq!(summary.file_content, None);
    }

    #[tokio::test]
    async fn test_env_file_mode() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.env");
        let settings = settings_with_output(Some(&path));
        let authenticator = StaticAuthenticator::new(vec![sample_block()]);
        let mut sink = RecordingSink::default();

        let summary = run(&settings, &authenticator, &mut sink).await.unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "FOO=bar");
        assert_eq!(summary.file_content.as_deref(), Some("FOO=bar"));
        assert!(sink.outputs.is_empty());
    }

    #[tokio::test]
    async fn test_env_file_mode_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ordered.env");
        let settings = settings_with_output(Some(&path));
        let authenticator = StaticAuthenticator::new(vec![ConfigurationBlock::with_options(vec![
            env_option("A", "first"),
            ConfigurationOption::new("aws:autoscaling:asg", "MaxSize", "4"),
            env_option("B", "second"),
        ])]);

        run(&settings, &authenticator, &mut RecordingSink::default())
            .await
            .unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "A=first\nB=second");
    }

    #[tokio::test]
    async fn test_repeated_runs_are_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("repeat.env");
        let settings = settings_with_output(Some(&path));
        let authenticator = StaticAuthenticator::new(vec![ConfigurationBlock::with_options(vec![
            env_option("A", "1"),
            env_option("B", "2"),
        ])]);

        run(&settings, &authenticator, &mut RecordingSink::default())
            .await
            .unwrap();
        let first = fs::read_to_string(&path).unwrap();

        run(&settings, &authenticator, &mut RecordingSink::default())
            .await
            .unwrap();
        let second = fs::read_to_string(&path).unwrap();

        assert_eq!(first, second);
        assert_eq!(first, "A=1\nB=2");
    }

    #[tokio::test]
    async fn test_empty_configuration() {
        let authenticator = StaticAuthenticator::new(vec![]);
        let mut sink = RecordingSink::default();

        let err = run(&settings(), &authenticator, &mut sink).await.unwrap_err();

        match &err {
            PipelineError::EmptyConfiguration {
                environment,
                application,
                raw,
            } => {
                assert_eq!(environment, "shop-prod");
                assert_eq!(application, "shop");
                assert_eq!(raw, r#"{"configuration_settings":[]}"#);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.to_string().contains("shop-prod"));
        assert_eq!(err.exit_code(), 1);
        assert!(sink.outputs.is_empty());
    }

    #[tokio::test]
    async fn test_authentication_failure_stops_before_fetch() {
        let mut authenticator = StaticAuthenticator::new(vec![sample_block()]);
        authenticator.reject = true;
        let mut sink = RecordingSink::default();

        let err = run(&settings(), &authenticator, &mut sink).await.unwrap_err();

        assert!(matches!(err, PipelineError::AuthenticationFailure { .. }));
        assert_eq!(authenticator.fetches.load(Ordering::SeqCst), 0);
        assert!(sink.outputs.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_is_called_once() {
        let authenticator = StaticAuthenticator::new(vec![sample_block()]);

        run(&settings(), &authenticator, &mut RecordingSink::default())
            .await
            .unwrap();

        assert_eq!(authenticator.fetches.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_only_first_block_is_used() {
        let blocks = vec![
            ConfigurationBlock::with_options(vec![env_option("FIRST", "1")]),
            ConfigurationBlock::with_options(vec![env_option("SECOND", "2")]),
        ];

        let variables = select_environment_variables("env", "app", blocks).unwrap();
        assert_eq!(variables, vec![EnvVariableEntry::new("FIRST", "1")]);
    }

    #[test]
    fn test_duplicates_pass_through() {
        let blocks = vec![ConfigurationBlock::with_options(vec![
            env_option("DUP", "x"),
            env_option("DUP", "x"),
        ])];

        let variables = select_environment_variables("env", "app", blocks).unwrap();
        assert_eq!(variables.len(), 2);
    }

    #[test]
    fn test_emit_step_outputs_in_order() {
        let variables = vec![
            EnvVariableEntry::new("A", "1"),
            EnvVariableEntry::new("B", "2"),
        ];
        let mut sink = RecordingSink::default();

        emit(&OutputMode::StepOutputs, &variables, &mut sink).unwrap();

        let names: Vec<_> = sink.outputs.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn test_emit_to_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.env");
        let output = OutputMode::EnvFile(path.to_string_lossy().into_owned());

        let err = emit(
            &output,
            &[EnvVariableEntry::new("FOO", "bar")],
            &mut RecordingSink::default(),
        )
        .unwrap_err();

        assert!(matches!(err, PipelineError::WriteVerificationFailure { .. }));
        assert_eq!(err.exit_code(), 1);
    }
}

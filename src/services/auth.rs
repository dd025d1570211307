//! AWS authentication
//!
//! Verifies the credential pair from the inputs with a single STS
//! `GetCallerIdentity` call before any Elastic Beanstalk request is made.

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_smithy_runtime_api::client::http::SharedHttpClient;

use crate::config::{
    create_elastic_beanstalk_client, create_sts_client, AwsConfigBuilder, AwsCredentials,
};
use crate::error::{PipelineError, Result};
use crate::services::describe_sdk_error;
use crate::services::elastic_beanstalk::{ConfigurationSource, ElasticBeanstalkService};

/// Turns a credential pair into an authenticated configuration source
#[async_trait]
pub trait Authenticator: Send + Sync {
    type Source: ConfigurationSource;

    /// Verify the credentials; one attempt, no retry of our own
    async fn authenticate(&self, credentials: &AwsCredentials) -> Result<Self::Source>;
}

/// Authenticator backed by the AWS SDK
#[derive(Debug, Clone, Default)]
pub struct AwsAuthenticator {
    /// Replaces the SDK's default HTTP client when set
    http_client: Option<SharedHttpClient>,
}

impl AwsAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_http_client(http_client: SharedHttpClient) -> Self {
        Self {
            http_client: Some(http_client),
        }
    }

    /// Resolve the account the credentials belong to
    async fn verify_identity(&self, sdk_config: &SdkConfig) -> Result<Option<String>> {
        let identity = create_sts_client(sdk_config)
            .get_caller_identity()
            .send()
            .await
            .map_err(|err| PipelineError::AuthenticationFailure {
                message: describe_sdk_error(&err),
            })?;

        Ok(identity.account().map(str::to_string))
    }
}

#[async_trait]
impl Authenticator for AwsAuthenticator {
    type Source = ElasticBeanstalkService;

    async fn authenticate(&self, credentials: &AwsCredentials) -> Result<Self::Source> {
        let sdk_config = AwsConfigBuilder::new(credentials)
            .with_http_client(self.http_client.clone())
            .build_sdk_config()
            .await;

        let account = self.verify_identity(&sdk_config).await?;
        tracing::info!(
            account = account.as_deref().unwrap_or("unknown"),
            region = %credentials.region,
            "Authenticated in AWS"
        );

        Ok(ElasticBeanstalkService::new(
            create_elastic_beanstalk_client(&sdk_config),
        ))
    }
}

//! AWS SDK configuration
//!
//! This module builds the SDK configuration shared by the STS and Elastic
//! Beanstalk clients. Credentials come only from the action inputs; nothing
//! is written to process-wide state.

use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_elasticbeanstalk::config::Credentials;
use aws_sdk_elasticbeanstalk::Client as ElasticBeanstalkSdkClient;
use aws_sdk_sts::Client as StsSdkClient;
use aws_smithy_runtime_api::client::http::SharedHttpClient;

use crate::config::Settings;

/// Provider name attached to the static credentials
const CREDENTIALS_PROVIDER_NAME: &str = "action-inputs";

/// Region, credential pair and optional endpoint for one run
#[derive(Clone)]
pub struct AwsCredentials {
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub endpoint_url: Option<String>,
}

impl AwsCredentials {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            region: settings.region.clone(),
            access_key_id: settings.aws_access_key_id.clone(),
            secret_access_key: settings.aws_secret_access_key.clone(),
            endpoint_url: settings.endpoint_url.clone(),
        }
    }
}

impl std::fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("region", &self.region)
            .field("access_key_id", &crate::utils::mask_secret(&self.access_key_id, 4))
            .field("secret_access_key", &"** redacted **")
            .field("endpoint_url", &self.endpoint_url)
            .finish()
    }
}

/// AWS configuration builder
///
/// Creates AWS SDK configuration with:
/// - The region from the inputs, no fallback chain
/// - Static credentials from the inputs
/// - An optional custom endpoint URL for local testing
/// - Retries disabled: every request is a single attempt
pub struct AwsConfigBuilder<'a> {
    credentials: &'a AwsCredentials,
    http_client: Option<SharedHttpClient>,
}

impl<'a> AwsConfigBuilder<'a> {
    /// Create a new AWS configuration builder
    pub fn new(credentials: &'a AwsCredentials) -> Self {
        Self {
            credentials,
            http_client: None,
        }
    }

    /// Send requests through the given HTTP client instead of the default one
    pub fn with_http_client(mut self, http_client: Option<SharedHttpClient>) -> Self {
        self.http_client = http_client;
        self
    }

    /// Build the base AWS SDK configuration
    pub async fn build_sdk_config(&self) -> SdkConfig {
        let credentials = Credentials::new(
            self.credentials.access_key_id.clone(),
            self.credentials.secret_access_key.clone(),
            None,
            None,
            CREDENTIALS_PROVIDER_NAME,
        );

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(self.credentials.region.clone()))
            .credentials_provider(credentials)
            .retry_config(RetryConfig::disabled());

        if let Some(http_client) = &self.http_client {
            loader = loader.http_client(http_client.clone());
        }

        if let Some(endpoint_url) = &self.credentials.endpoint_url {
            tracing::info!(endpoint = %endpoint_url, "Using custom AWS endpoint");
            loader = loader.endpoint_url(endpoint_url);
        }

        loader.load().await
    }
}

/// Create an STS client from an SDK config
pub fn create_sts_client(sdk_config: &SdkConfig) -> StsSdkClient {
    StsSdkClient::new(sdk_config)
}

/// Create an Elastic Beanstalk client from an SDK config
pub fn create_elastic_beanstalk_client(sdk_config: &SdkConfig) -> ElasticBeanstalkSdkClient {
    ElasticBeanstalkSdkClient::new(sdk_config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> AwsCredentials {
        AwsCredentials {
            region: "eu-central-1".to_string(),
            access_key_id: "AKIAEXAMPLE".to_string(),
            secret_access_key: "wJalrXUtnFEMI".to_string(),
            endpoint_url: None,
        }
    }

    #[tokio::test]
    async fn test_build_sdk_config() {
        let config = AwsConfigBuilder::new(&credentials()).build_sdk_config().await;

        assert!(config.region().is_some());
        assert_eq!(config.region().unwrap().as_ref(), "eu-central-1");
        assert!(config.credentials_provider().is_some());
    }

    #[tokio::test]
    async fn test_requests_are_single_attempt() {
        let config = AwsConfigBuilder::new(&credentials()).build_sdk_config().await;
        assert_eq!(config.retry_config().map(|r| r.max_attempts()), Some(1));
    }

    #[tokio::test]
    async fn test_custom_endpoint() {
        let mut credentials = credentials();
        credentials.endpoint_url = Some("http://localhost:4566".to_string());

        let config = AwsConfigBuilder::new(&credentials).build_sdk_config().await;
        assert_eq!(config.endpoint_url(), Some("http://localhost:4566"));

        let _sts = create_sts_client(&config);
        let _eb = create_elastic_beanstalk_client(&config);
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let rendered = format!("{:?}", credentials());
        assert!(!rendered.contains("wJalrXUtnFEMI"));
        assert!(!rendered.contains("AKIAEXAMPLE"));
        assert!(rendered.contains("AKIA*******"));
    }
}

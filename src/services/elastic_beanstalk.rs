//! Elastic Beanstalk service
//!
//! This module reads an environment's configuration settings through the
//! `DescribeConfigurationSettings` API.

use async_trait::async_trait;
use aws_sdk_elasticbeanstalk::{
    types::{ConfigurationOptionSetting, ConfigurationSettingsDescription},
    Client as ElasticBeanstalkClient,
};

use crate::error::{PipelineError, Result};
use crate::schemas::{ConfigurationBlock, ConfigurationOption};
use crate::services::describe_sdk_error;

/// Source of an environment's configuration blocks
#[async_trait]
pub trait ConfigurationSource: Send + Sync {
    /// Return every configuration-settings block for the pair, in service order
    async fn describe_configuration_settings(
        &self,
        environment_name: &str,
        application_name: &str,
    ) -> Result<Vec<ConfigurationBlock>>;
}

/// Service for reading configuration from AWS Elastic Beanstalk.
#[derive(Debug, Clone)]
pub struct ElasticBeanstalkService {
    /// AWS Elastic Beanstalk SDK client
    client: ElasticBeanstalkClient,
}

impl ElasticBeanstalkService {
    /// Create a new Elastic Beanstalk service.
    pub fn new(client: ElasticBeanstalkClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ConfigurationSource for ElasticBeanstalkService {
    async fn describe_configuration_settings(
        &self,
        environment_name: &str,
        application_name: &str,
    ) -> Result<Vec<ConfigurationBlock>> {
        tracing::debug!(
            environment = %environment_name,
            application = %application_name,
            "Calling DescribeConfigurationSettings"
        );

        let output = self
            .client
            .describe_configuration_settings()
            .environment_name(environment_name)
            .application_name(application_name)
            .send()
            .await
            .map_err(|err| PipelineError::FetchFailure {
                message: describe_sdk_error(&err),
            })?;

        let blocks: Vec<ConfigurationBlock> = output
            .configuration_settings
            .unwrap_or_default()
            .into_iter()
            .map(block_from_sdk)
            .collect();

        tracing::debug!(blocks = blocks.len(), "DescribeConfigurationSettings completed");

        Ok(blocks)
    }
}

/// Convert an SDK description into the crate's block type
///
/// Missing option fields become empty strings.
pub fn block_from_sdk(description: ConfigurationSettingsDescription) -> ConfigurationBlock {
    ConfigurationBlock {
        application_name: description.application_name,
        environment_name: description.environment_name,
        options: description
            .option_settings
            .unwrap_or_default()
            .into_iter()
            .map(option_from_sdk)
            .collect(),
    }
}

fn option_from_sdk(setting: ConfigurationOptionSetting) -> ConfigurationOption {
    ConfigurationOption {
        namespace: setting.namespace.unwrap_or_default(),
        name: setting.option_name.unwrap_or_default(),
        value: setting.value.unwrap_or_default(),
    }
}

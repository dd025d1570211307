//! Elastic Beanstalk configuration types
//!
//! SDK-independent view of a `DescribeConfigurationSettings` response and
//! the environment variables extracted from it.

use serde::{Deserialize, Serialize};

/// Namespace holding the user-defined environment properties
pub const APPLICATION_ENVIRONMENT_NAMESPACE: &str = "aws:elasticbeanstalk:application:environment";

/// One entry of a configuration's option list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationOption {
    pub namespace: String,
    pub name: String,
    pub value: String,
}

impl ConfigurationOption {
    pub fn new(
        namespace: impl Into<String>,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            namespace: namespace.into(),
            name: name.into(),
            value: value.into(),
        }
    }

    /// Whether this option is a user-defined environment variable
    pub fn is_environment_variable(&self) -> bool {
        self.namespace == APPLICATION_ENVIRONMENT_NAMESPACE
    }
}

/// One configuration-settings description returned by the service
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigurationBlock {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub application_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_name: Option<String>,
    pub options: Vec<ConfigurationOption>,
}

impl ConfigurationBlock {
    pub fn with_options(options: Vec<ConfigurationOption>) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    /// Environment variables of this block, in service order
    pub fn environment_variables(&self) -> Vec<EnvVariableEntry> {
        self.options
            .iter()
            .filter(|option| option.is_environment_variable())
            .map(|option| EnvVariableEntry {
                name: option.name.clone(),
                value: option.value.clone(),
            })
            .collect()
    }
}

/// A filtered environment variable
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvVariableEntry {
    pub name: String,
    pub value: String,
}

impl EnvVariableEntry {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// `NAME=VALUE` line used by output-file mode
    pub fn to_line(&self) -> String {
        format!("{}={}", self.name, self.value)
    }
}

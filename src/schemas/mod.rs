//! Data model for Elastic Beanstalk configuration settings

pub mod configuration;

pub use configuration::{
    ConfigurationBlock, ConfigurationOption, EnvVariableEntry, APPLICATION_ENVIRONMENT_NAMESPACE,
};

//! Configuration management module
//!
//! This module handles loading and validating the action inputs and
//! building the AWS SDK configuration from them.

pub mod aws;
pub mod settings;

pub use aws::{
    create_elastic_beanstalk_client, create_sts_client, AwsConfigBuilder, AwsCredentials,
};
pub use settings::{default_log_level, inputs, OutputMode, Settings};

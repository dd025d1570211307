//! Services module
//!
//! Contains the AWS integrations: authentication and configuration lookup.

pub mod auth;
pub mod elastic_beanstalk;

pub use auth::{Authenticator, AwsAuthenticator};
pub use elastic_beanstalk::{ConfigurationSource, ElasticBeanstalkService};

use aws_smithy_runtime_api::client::result::SdkError;
use aws_smithy_types::error::display::DisplayErrorContext;
use aws_smithy_types::error::metadata::ProvideErrorMetadata;

/// Render an SDK error for logs
///
/// Service errors keep their code and message; transport and other errors
/// are rendered with their full source chain.
pub(crate) fn describe_sdk_error<E, R>(err: &SdkError<E, R>) -> String
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    match err {
        SdkError::ServiceError(service_err) => {
            let error = service_err.err();
            format!(
                "{}: {}",
                error.code().unwrap_or("Unknown"),
                error.message().unwrap_or("no message")
            )
        }
        _ => DisplayErrorContext(err).to_string(),
    }
}

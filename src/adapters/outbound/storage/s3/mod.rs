//! S3 storage adapter built on `aws-sdk-s3`
//!
//! Works against AWS itself and against S3-compatible endpoints such as
//! LocalStack or MinIO (set an endpoint and keep path-style addressing).

pub mod s3_repository;

pub use s3_repository::S3StorageRepository;

use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use bon::Builder;

pub const DEFAULT_REGION: &str = "us-east-1";

/// Where the S3 client takes its credentials from
#[derive(Clone, Default)]
pub enum CredentialSource {
    /// Fixed access key pair
    Static {
        access_key_id: String,
        secret_access_key: String,
    },
    /// The default AWS provider chain (environment, profile, instance metadata)
    #[default]
    Environment,
}

impl std::fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialSource::Static { access_key_id, .. } => f
                .debug_struct("Static")
                .field("access_key_id", access_key_id)
                .field("secret_access_key", &"<redacted>")
                .finish(),
            CredentialSource::Environment => f.write_str("Environment"),
        }
    }
}

/// Configuration for S3 storage backend
#[derive(Debug, Clone, Builder)]
pub struct S3Config {
    /// Endpoint override, e.g. `http://localhost:4566`
    #[builder(into)]
    pub endpoint: Option<String>,
    #[builder(into, default = DEFAULT_REGION.to_string())]
    pub region: String,
    #[builder(default)]
    pub credentials: CredentialSource,
    #[builder(default = true)]
    pub force_path_style: bool,
}

impl Default for S3Config {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Create an S3 client from configuration
pub async fn create_s3_client(config: &S3Config) -> aws_sdk_s3::Client {
    let mut loader =
        aws_config::defaults(BehaviorVersion::latest()).region(Region::new(config.region.clone()));

    if let CredentialSource::Static {
        access_key_id,
        secret_access_key,
    } = &config.credentials
    {
        loader = loader.credentials_provider(Credentials::new(
            access_key_id,
            secret_access_key,
            None,
            None,
            "s3-explorer-static",
        ));
    }

    let sdk_config = loader.load().await;

    let mut builder =
        aws_sdk_s3::config::Builder::from(&sdk_config).force_path_style(config.force_path_style);
    if let Some(endpoint) = &config.endpoint {
        builder = builder.endpoint_url(endpoint);
    }

    aws_sdk_s3::Client::from_conf(builder.build())
}

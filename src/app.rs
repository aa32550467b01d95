use std::sync::Arc;

use crate::{
    adapters::outbound::storage::{
        CredentialSource, InMemoryStorageRepository, S3Config, S3StorageRepository,
    },
    ports::repositories::StorageRepository,
    services::{BucketUseCases, ObjectUseCases},
};

/// Configuration for the application
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub storage_backend: StorageBackend,
}

/// Storage backend configuration
#[derive(Debug, Clone, Default)]
pub enum StorageBackend {
    #[default]
    InMemory,
    S3(S3Config),
}

/// Application services container.
///
/// Both use-case façades share the one repository built for this process.
#[derive(Clone)]
pub struct AppServices {
    pub repository: Arc<dyn StorageRepository>,
    pub bucket_use_cases: BucketUseCases,
    pub object_use_cases: ObjectUseCases,
}

impl AppServices {
    pub fn from_repository(repository: Arc<dyn StorageRepository>) -> Self {
        Self {
            bucket_use_cases: BucketUseCases::new(repository.clone()),
            object_use_cases: ObjectUseCases::new(repository.clone()),
            repository,
        }
    }
}

/// Application builder for dependency injection
#[derive(Debug, Default)]
pub struct AppBuilder {
    config: AppConfig,
}

impl AppBuilder {
    /// Create a new application builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the application with custom settings
    pub fn with_config(mut self, config: AppConfig) -> Self {
        self.config = config;
        self
    }

    /// Configure storage backend
    pub fn with_storage_backend(mut self, backend: StorageBackend) -> Self {
        self.config.storage_backend = backend;
        self
    }

    /// Build the repository for the configured backend
    pub async fn build_repository(&self) -> Arc<dyn StorageRepository> {
        match &self.config.storage_backend {
            StorageBackend::InMemory => Arc::new(InMemoryStorageRepository::new()),
            StorageBackend::S3(s3_config) => {
                Arc::new(S3StorageRepository::from_config(s3_config).await)
            }
        }
    }

    /// Build the complete application with services
    pub async fn build(self) -> AppServices {
        let repository = self.build_repository().await;
        AppServices::from_repository(repository)
    }
}

/// Application-level errors
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Convenience functions for common configurations
///
/// Create an in-memory application for testing and development
pub async fn create_in_memory_app() -> AppServices {
    AppBuilder::new()
        .with_storage_backend(StorageBackend::InMemory)
        .build()
        .await
}

/// Create an S3-backed application
pub async fn create_s3_app(config: S3Config) -> AppServices {
    AppBuilder::new()
        .with_storage_backend(StorageBackend::S3(config))
        .build()
        .await
}

/// Read the application configuration from environment variables.
///
/// `STORAGE_BACKEND` picks `s3` or `memory` (default `s3`). For S3,
/// `S3_ENDPOINT`, `S3_REGION` and `S3_FORCE_PATH_STYLE` are optional;
/// `S3_ACCESS_KEY` and `S3_SECRET_KEY` must be set together or not at all,
/// in which case the default AWS credential chain is used.
pub fn config_from_env() -> Result<AppConfig, AppError> {
    config_from_lookup(|name| std::env::var(name).ok())
}

fn config_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<AppConfig, AppError> {
    let storage_backend = match lookup("STORAGE_BACKEND").as_deref() {
        Some("memory") => StorageBackend::InMemory,
        None | Some("s3") => {
            let credentials = match (lookup("S3_ACCESS_KEY"), lookup("S3_SECRET_KEY")) {
                (Some(access_key_id), Some(secret_access_key)) => CredentialSource::Static {
                    access_key_id,
                    secret_access_key,
                },
                (None, None) => CredentialSource::Environment,
                _ => {
                    return Err(AppError::Configuration {
                        message: "S3_ACCESS_KEY and S3_SECRET_KEY must be set together"
                            .to_string(),
                    })
                }
            };

            let force_path_style = match lookup("S3_FORCE_PATH_STYLE") {
                Some(value) => value.parse::<bool>().map_err(|_| AppError::Configuration {
                    message: format!("S3_FORCE_PATH_STYLE must be true or false, got '{}'", value),
                })?,
                None => true,
            };

            let config = S3Config::builder()
                .maybe_endpoint(lookup("S3_ENDPOINT"))
                .maybe_region(lookup("S3_REGION"))
                .credentials(credentials)
                .force_path_style(force_path_style)
                .build();

            StorageBackend::S3(config)
        }
        Some(other) => {
            return Err(AppError::Configuration {
                message: format!("Unknown storage backend: {}", other),
            })
        }
    };

    Ok(AppConfig { storage_backend })
}

/// Create application from environment variables
pub async fn create_app_from_env() -> Result<AppServices, AppError> {
    let config = config_from_env()?;
    Ok(AppBuilder::new().with_config(config).build().await)
}

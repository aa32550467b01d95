pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;
pub mod services;

// Re-export key types for convenience

// Domain types - entities and errors
pub use domain::{
    object_key_from_path, Bucket, FailureReason, StorageError, StorageObject, StorageResult,
};

// Port types - interface to the storage backend
pub use ports::{StorageRepository, DEFAULT_PRESIGN_EXPIRATION};

// Use-case façades
pub use services::{BucketUseCases, ObjectUseCases};

// Application factory and configuration
pub use app::{
    config_from_env, create_app_from_env, create_in_memory_app, create_s3_app, AppBuilder,
    AppConfig, AppError, AppServices, StorageBackend,
};

// Adapter types - infrastructure implementations
pub use adapters::outbound::storage::{
    CredentialSource, InMemoryStorageRepository, S3Config, S3StorageRepository,
};

// Public facade for easy construction
pub mod prelude {
    pub use crate::{
        create_in_memory_app, create_s3_app, AppBuilder, AppServices, Bucket, BucketUseCases,
        InMemoryStorageRepository, ObjectUseCases, S3Config, S3StorageRepository,
        StorageObject, StorageRepository,
    };
}

// Backend error translation
pub mod error;

// Storage implementations
pub mod memory;
pub mod s3;

// Re-export key types
pub use memory::InMemoryStorageRepository;
pub use s3::{CredentialSource, S3Config, S3StorageRepository};

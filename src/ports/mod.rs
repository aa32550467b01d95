pub mod repositories;

// Re-export all port traits for convenience
pub use repositories::{StorageRepository, DEFAULT_PRESIGN_EXPIRATION};

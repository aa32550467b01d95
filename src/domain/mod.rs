pub mod errors;
pub mod models;

// Re-export commonly used types
pub use errors::{FailureReason, StorageError, StorageResult};
pub use models::*;

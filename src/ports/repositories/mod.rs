mod storage_repository;

pub use storage_repository::{StorageRepository, DEFAULT_PRESIGN_EXPIRATION};

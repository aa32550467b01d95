use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

use crate::domain::{
    errors::{StorageError, StorageResult},
    models::{object_key_from_path, Bucket, StorageObject},
};

/// Expiry used for presigned URLs when the caller does not pick one
pub const DEFAULT_PRESIGN_EXPIRATION: Duration = Duration::from_secs(3600);

/// Port for bucket and object storage operations.
///
/// Implementations translate backend failures into [`StorageError`]; no
/// backend-specific error type crosses this boundary.
#[async_trait]
pub trait StorageRepository: Send + Sync + 'static {
    /// List all buckets, in backend response order
    async fn list_buckets(&self) -> StorageResult<Vec<Bucket>>;

    async fn create_bucket(&self, bucket: &str) -> StorageResult<()>;

    /// Delete a bucket. Whether a non-empty bucket may be deleted is up to the backend.
    async fn delete_bucket(&self, bucket: &str) -> StorageResult<()>;

    /// List the objects of a bucket. An empty bucket yields an empty vec.
    async fn list_objects(&self, bucket: &str) -> StorageResult<Vec<StorageObject>>;

    /// Upload a local file under an explicit key
    async fn upload_object_as(
        &self,
        bucket: &str,
        key: &str,
        file_path: &Path,
    ) -> StorageResult<StorageObject>;

    /// Mint a time-limited URL allowing a direct `PUT` of `key` into `bucket`
    async fn generate_presigned_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> StorageResult<String>;

    async fn delete_object(&self, bucket: &str, key: &str) -> StorageResult<()>;

    /// Server-side copy within one bucket
    async fn copy_object(&self, bucket: &str, source_key: &str, destination_key: &str)
        -> StorageResult<()>;

    /// Upload a local file, keyed by the final segment of its path
    async fn upload_object(&self, bucket: &str, file_path: &Path) -> StorageResult<StorageObject> {
        let key = object_key_from_path(file_path).ok_or_else(|| StorageError::InvalidInput {
            operation: "upload_object",
            message: format!("cannot derive an object key from '{}'", file_path.display()),
        })?;
        self.upload_object_as(bucket, &key, file_path).await
    }

    /// Rename an object. Object stores have no atomic rename, so this copies
    /// then deletes the source; a failed copy leaves the source untouched.
    async fn rename_object(&self, bucket: &str, from_key: &str, to_key: &str) -> StorageResult<()> {
        self.copy_object(bucket, from_key, to_key).await?;
        self.delete_object(bucket, from_key).await
    }
}

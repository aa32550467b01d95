use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::{
    domain::{errors::StorageResult, models::StorageObject},
    ports::repositories::{StorageRepository, DEFAULT_PRESIGN_EXPIRATION},
};

/// Object-facing use cases.
///
/// Same two views as [`crate::services::BucketUseCases`]: plain methods
/// collapse failures to `false`/empty/`None`, `try_` methods keep the reason.
#[derive(Clone)]
pub struct ObjectUseCases {
    repository: Arc<dyn StorageRepository>,
}

impl ObjectUseCases {
    pub fn new(repository: Arc<dyn StorageRepository>) -> Self {
        Self { repository }
    }

    pub async fn try_get_objects(&self, bucket_name: &str) -> StorageResult<Vec<StorageObject>> {
        self.repository.list_objects(bucket_name).await
    }

    /// Upload a local file; the object key is the file name
    pub async fn try_upload_object(
        &self,
        bucket_name: &str,
        file_path: impl AsRef<Path>,
    ) -> StorageResult<StorageObject> {
        self.repository
            .upload_object(bucket_name, file_path.as_ref())
            .await
    }

    pub async fn try_upload_object_as(
        &self,
        bucket_name: &str,
        object_key: &str,
        file_path: impl AsRef<Path>,
    ) -> StorageResult<StorageObject> {
        self.repository
            .upload_object_as(bucket_name, object_key, file_path.as_ref())
            .await
    }

    /// Presigned `PUT` URL; `None` expiration means one hour
    pub async fn try_generate_presigned_url(
        &self,
        bucket_name: &str,
        object_key: &str,
        expiration: Option<Duration>,
    ) -> StorageResult<String> {
        self.repository
            .generate_presigned_url(
                bucket_name,
                object_key,
                expiration.unwrap_or(DEFAULT_PRESIGN_EXPIRATION),
            )
            .await
    }

    pub async fn try_delete_object(&self, bucket_name: &str, object_key: &str) -> StorageResult<()> {
        self.repository.delete_object(bucket_name, object_key).await
    }

    pub async fn try_rename_object(
        &self,
        bucket_name: &str,
        old_key: &str,
        new_key: &str,
    ) -> StorageResult<()> {
        self.repository
            .rename_object(bucket_name, old_key, new_key)
            .await
    }

    pub async fn get_objects(&self, bucket_name: &str) -> Vec<StorageObject> {
        self.try_get_objects(bucket_name).await.unwrap_or_default()
    }

    pub async fn upload_object(&self, bucket_name: &str, file_path: impl AsRef<Path>) -> bool {
        self.try_upload_object(bucket_name, file_path).await.is_ok()
    }

    pub async fn generate_presigned_url(
        &self,
        bucket_name: &str,
        object_key: &str,
        expiration: Option<Duration>,
    ) -> Option<String> {
        self.try_generate_presigned_url(bucket_name, object_key, expiration)
            .await
            .ok()
    }

    pub async fn delete_object(&self, bucket_name: &str, object_key: &str) -> bool {
        self.try_delete_object(bucket_name, object_key).await.is_ok()
    }

    pub async fn rename_object(&self, bucket_name: &str, old_key: &str, new_key: &str) -> bool {
        self.try_rename_object(bucket_name, old_key, new_key)
            .await
            .is_ok()
    }
}

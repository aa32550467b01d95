use std::sync::Arc;

use crate::{
    domain::{errors::StorageResult, models::Bucket},
    ports::repositories::StorageRepository,
};

/// Bucket-facing use cases.
///
/// The plain methods keep the simple view: an empty list or `false` when the
/// backend call failed. The `try_` methods return the failure reason.
#[derive(Clone)]
pub struct BucketUseCases {
    repository: Arc<dyn StorageRepository>,
}

impl BucketUseCases {
    pub fn new(repository: Arc<dyn StorageRepository>) -> Self {
        Self { repository }
    }

    pub async fn try_get_buckets(&self) -> StorageResult<Vec<Bucket>> {
        self.repository.list_buckets().await
    }

    pub async fn try_create_bucket(&self, bucket_name: &str) -> StorageResult<()> {
        self.repository.create_bucket(bucket_name).await
    }

    pub async fn try_delete_bucket(&self, bucket_name: &str) -> StorageResult<()> {
        self.repository.delete_bucket(bucket_name).await
    }

    /// All buckets, or an empty list if they could not be listed
    pub async fn get_buckets(&self) -> Vec<Bucket> {
        self.try_get_buckets().await.unwrap_or_default()
    }

    pub async fn create_bucket(&self, bucket_name: &str) -> bool {
        self.try_create_bucket(bucket_name).await.is_ok()
    }

    pub async fn delete_bucket(&self, bucket_name: &str) -> bool {
        self.try_delete_bucket(bucket_name).await.is_ok()
    }
}

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::{StreamExt, TryStreamExt};
use object_store::{
    memory::InMemory,
    path::{Path as ObjectPath, PathPart},
    ObjectStore, PutPayload,
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::{
    adapters::outbound::storage::error::from_object_store_error,
    domain::{
        errors::{StorageError, StorageResult},
        models::{Bucket, StorageObject},
    },
    ports::repositories::StorageRepository,
};

/// In-memory implementation of StorageRepository for testing and offline use.
///
/// Each bucket owns an `object_store` in-memory store. Every object key is
/// stored as a single encoded path part, so keys come back from a listing
/// exactly as they were written. Buckets are listed in creation order,
/// objects in key order.
#[derive(Clone, Default)]
pub struct InMemoryStorageRepository {
    buckets: Arc<RwLock<Vec<BucketEntry>>>,
}

struct BucketEntry {
    name: String,
    creation_date: DateTime<Utc>,
    store: Arc<InMemory>,
}

impl InMemoryStorageRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn store(&self, operation: &'static str, bucket: &str) -> StorageResult<Arc<InMemory>> {
        let buckets = self.buckets.read().await;
        buckets
            .iter()
            .find(|entry| entry.name == bucket)
            .map(|entry| entry.store.clone())
            .ok_or_else(|| {
                log_failure(
                    StorageError::NotFound {
                        operation,
                        message: format!("bucket '{}' does not exist", bucket),
                    },
                    bucket,
                    None,
                )
            })
    }
}

fn log_failure(err: StorageError, bucket: &str, key: Option<&str>) -> StorageError {
    warn!(
        operation = err.operation(),
        bucket,
        key,
        reason = %err.reason(),
        "{}",
        err
    );
    err
}

/// Map a key onto a one-part path. `PathPart` percent-encodes `/`, `%` and
/// the other reserved bytes, so distinct keys never share a path.
fn object_path(operation: &'static str, bucket: &str, key: &str) -> StorageResult<ObjectPath> {
    if key.is_empty() {
        return Err(log_failure(
            StorageError::InvalidInput {
                operation,
                message: "object key must not be empty".to_string(),
            },
            bucket,
            Some(key),
        ));
    }
    Ok(ObjectPath::from_iter([PathPart::from(key)]))
}

fn object_key(location: &ObjectPath) -> Option<String> {
    let part = location.filename()?;
    urlencoding::decode(part).ok().map(|key| key.into_owned())
}

#[async_trait]
impl StorageRepository for InMemoryStorageRepository {
    async fn list_buckets(&self) -> StorageResult<Vec<Bucket>> {
        let buckets = self.buckets.read().await;
        Ok(buckets
            .iter()
            .map(|entry| Bucket::new(entry.name.clone(), entry.creation_date))
            .collect())
    }

    async fn create_bucket(&self, bucket: &str) -> StorageResult<()> {
        let mut buckets = self.buckets.write().await;

        if buckets.iter().any(|entry| entry.name == bucket) {
            return Err(log_failure(
                StorageError::Conflict {
                    operation: "create_bucket",
                    message: format!("bucket '{}' already exists", bucket),
                },
                bucket,
                None,
            ));
        }

        buckets.push(BucketEntry {
            name: bucket.to_string(),
            creation_date: Utc::now(),
            store: Arc::new(InMemory::new()),
        });

        debug!(bucket, "created bucket");
        Ok(())
    }

    async fn delete_bucket(&self, bucket: &str) -> StorageResult<()> {
        let mut buckets = self.buckets.write().await;

        let Some(index) = buckets.iter().position(|entry| entry.name == bucket) else {
            return Err(log_failure(
                StorageError::NotFound {
                    operation: "delete_bucket",
                    message: format!("bucket '{}' does not exist", bucket),
                },
                bucket,
                None,
            ));
        };

        // Same rule as S3: only empty buckets can go
        let has_objects = buckets[index].store.list(None).next().await.is_some();
        if has_objects {
            return Err(log_failure(
                StorageError::Conflict {
                    operation: "delete_bucket",
                    message: format!("bucket '{}' is not empty", bucket),
                },
                bucket,
                None,
            ));
        }

        buckets.remove(index);
        debug!(bucket, "deleted bucket");
        Ok(())
    }

    async fn list_objects(&self, bucket: &str) -> StorageResult<Vec<StorageObject>> {
        let store = self.store("list_objects", bucket).await?;

        let metas: Vec<_> = store
            .list(None)
            .try_collect()
            .await
            .map_err(|e| log_failure(from_object_store_error("list_objects", e), bucket, None))?;

        let mut objects: Vec<StorageObject> = metas
            .into_iter()
            .filter_map(|meta| {
                let key = object_key(&meta.location)?;
                Some(StorageObject::new(key, meta.size as i64, meta.last_modified))
            })
            .collect();
        // Encoded paths sort differently from the keys they carry
        objects.sort_by(|a, b| a.key.cmp(&b.key));

        Ok(objects)
    }

    async fn upload_object_as(
        &self,
        bucket: &str,
        key: &str,
        file_path: &Path,
    ) -> StorageResult<StorageObject> {
        let store = self.store("upload_object", bucket).await?;
        let path = object_path("upload_object", bucket, key)?;

        let data = tokio::fs::read(file_path).await.map_err(|e| {
            log_failure(
                StorageError::io("upload_object", file_path.display().to_string(), e.to_string()),
                bucket,
                Some(key),
            )
        })?;
        let size = data.len() as i64;

        store
            .put(&path, PutPayload::from(Bytes::from(data)))
            .await
            .map_err(|e| {
                log_failure(from_object_store_error("upload_object", e), bucket, Some(key))
            })?;

        debug!(bucket, key, size, "uploaded object");
        Ok(StorageObject::new(key, size, Utc::now()))
    }

    async fn generate_presigned_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        Ok(format!(
            "memory://{}/{}?X-Amz-Expires={}",
            bucket,
            key,
            expires_in.as_secs()
        ))
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> StorageResult<()> {
        let store = self.store("delete_object", bucket).await?;
        let path = object_path("delete_object", bucket, key)?;

        store.delete(&path).await.map_err(|e| {
            log_failure(from_object_store_error("delete_object", e), bucket, Some(key))
        })?;

        debug!(bucket, key, "deleted object");
        Ok(())
    }

    async fn copy_object(
        &self,
        bucket: &str,
        source_key: &str,
        destination_key: &str,
    ) -> StorageResult<()> {
        let store = self.store("copy_object", bucket).await?;
        let source = object_path("copy_object", bucket, source_key)?;
        let destination = object_path("copy_object", bucket, destination_key)?;

        store.copy(&source, &destination).await.map_err(|e| {
            log_failure(from_object_store_error("copy_object", e), bucket, Some(source_key))
        })?;

        debug!(bucket, source_key, destination_key, "copied object");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::FailureReason;
    use std::io::Write;

    fn temp_file(contents: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file
    }

    #[tokio::test]
    async fn test_buckets_listed_in_creation_order() {
        let repository = InMemoryStorageRepository::new();
        repository.create_bucket("zeta").await.unwrap();
        repository.create_bucket("alpha").await.unwrap();

        let names: Vec<String> = repository
            .list_buckets()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.name)
            .collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[tokio::test]
    async fn test_duplicate_bucket_is_conflict() {
        let repository = InMemoryStorageRepository::new();
        repository.create_bucket("logs").await.unwrap();

        let err = repository.create_bucket("logs").await.unwrap_err();
        assert_eq!(err.reason(), FailureReason::Conflict);
        assert_eq!(repository.list_buckets().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_missing_bucket_is_not_found() {
        let repository = InMemoryStorageRepository::new();
        let err = repository.delete_bucket("ghost").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_non_empty_bucket_cannot_be_deleted() {
        let repository = InMemoryStorageRepository::new();
        repository.create_bucket("logs").await.unwrap();
        let file = temp_file(b"hello");
        repository
            .upload_object_as("logs", "hello.txt", file.path())
            .await
            .unwrap();

        let err = repository.delete_bucket("logs").await.unwrap_err();
        assert_eq!(err.reason(), FailureReason::Conflict);

        repository.delete_object("logs", "hello.txt").await.unwrap();
        repository.delete_bucket("logs").await.unwrap();
        assert!(repository.list_buckets().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_objects_reports_size() {
        let repository = InMemoryStorageRepository::new();
        repository.create_bucket("data").await.unwrap();
        let file = temp_file(b"0123456789");

        let uploaded = repository
            .upload_object_as("data", "digits.txt", file.path())
            .await
            .unwrap();
        assert_eq!(uploaded.size, 10);

        let objects = repository.list_objects("data").await.unwrap();
        assert_eq!(objects.len(), 1);
        assert_eq!(objects[0].key, "digits.txt");
        assert_eq!(objects[0].size, 10);
    }

    #[tokio::test]
    async fn test_list_objects_missing_bucket() {
        let repository = InMemoryStorageRepository::new();
        let err = repository.list_objects("nope").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(err.operation(), "list_objects");
    }

    #[tokio::test]
    async fn test_upload_missing_file_is_io_error() {
        let repository = InMemoryStorageRepository::new();
        repository.create_bucket("data").await.unwrap();

        let err = repository
            .upload_object_as("data", "x", Path::new("/no/such/file.bin"))
            .await
            .unwrap_err();
        assert_eq!(err.reason(), FailureReason::Io);
        assert!(repository.list_objects("data").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_object_succeeds() {
        let repository = InMemoryStorageRepository::new();
        repository.create_bucket("data").await.unwrap();
        repository.delete_object("data", "never-there").await.unwrap();
    }

    #[tokio::test]
    async fn test_copy_missing_source_is_not_found() {
        let repository = InMemoryStorageRepository::new();
        repository.create_bucket("data").await.unwrap();

        let err = repository
            .copy_object("data", "missing.txt", "other.txt")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_listed_keys_match_uploaded_keys() {
        let repository = InMemoryStorageRepository::new();
        repository.create_bucket("data").await.unwrap();
        let file = temp_file(b"abc");

        let keys = ["report[1] 100%.txt", "dir//x.txt", "/lead.txt", "dir/x.txt", ".."];
        for key in keys {
            repository.upload_object_as("data", key, file.path()).await.unwrap();
        }

        let listed: Vec<String> = repository
            .list_objects("data")
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.key)
            .collect();
        let mut expected: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
        expected.sort();
        assert_eq!(listed, expected);
    }

    #[tokio::test]
    async fn test_delete_by_listed_key_empties_bucket() {
        let repository = InMemoryStorageRepository::new();
        repository.create_bucket("data").await.unwrap();
        let file = temp_file(b"quarterly");
        repository
            .upload_object_as("data", "report[1] 100%.txt", file.path())
            .await
            .unwrap();

        let listed = repository.list_objects("data").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].key, "report[1] 100%.txt");

        repository.delete_object("data", &listed[0].key).await.unwrap();
        assert!(repository.list_objects("data").await.unwrap().is_empty());
        repository.delete_bucket("data").await.unwrap();
    }

    #[tokio::test]
    async fn test_copy_keeps_special_keys() {
        let repository = InMemoryStorageRepository::new();
        repository.create_bucket("data").await.unwrap();
        let file = temp_file(b"v1");
        repository
            .upload_object_as("data", "a?b#c.txt", file.path())
            .await
            .unwrap();

        repository
            .copy_object("data", "a?b#c.txt", "{copy}~1.txt")
            .await
            .unwrap();

        let keys: Vec<String> = repository
            .list_objects("data")
            .await
            .unwrap()
            .into_iter()
            .map(|o| o.key)
            .collect();
        assert_eq!(keys, vec!["a?b#c.txt", "{copy}~1.txt"]);
    }

    #[tokio::test]
    async fn test_empty_key_is_invalid_input() {
        let repository = InMemoryStorageRepository::new();
        repository.create_bucket("data").await.unwrap();
        let file = temp_file(b"x");

        let err = repository
            .upload_object_as("data", "", file.path())
            .await
            .unwrap_err();
        assert_eq!(err.reason(), FailureReason::InvalidInput);
        assert!(repository.list_objects("data").await.unwrap().is_empty());
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<std::sync::Mutex<Vec<u8>>>);

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for CapturedLogs {
        type Writer = CapturedLogs;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    #[tokio::test]
    async fn test_backend_failures_are_logged() {
        let logs = CapturedLogs::default();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(logs.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let repository = InMemoryStorageRepository::new();
        repository.create_bucket("data").await.unwrap();
        repository
            .copy_object("data", "missing.txt", "other.txt")
            .await
            .unwrap_err();

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("WARN"), "unexpected logs: {}", output);
        assert!(output.contains("copy_object"), "unexpected logs: {}", output);
        assert!(output.contains("missing.txt"), "unexpected logs: {}", output);
    }

    #[tokio::test]
    async fn test_presigned_url_does_not_check_bucket() {
        let repository = InMemoryStorageRepository::new();
        let url = repository
            .generate_presigned_url("anything", "a.txt", Duration::from_secs(3600))
            .await
            .unwrap();
        assert_eq!(url, "memory://anything/a.txt?X-Amz-Expires=3600");
    }
}

use async_trait::async_trait;
use aws_sdk_s3::{
    presigning::PresigningConfig,
    primitives::{ByteStream, DateTime as SdkDateTime},
    types::{BucketLocationConstraint, CreateBucketConfiguration},
    Client,
};
use chrono::{DateTime, Utc};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error};

use super::{create_s3_client, S3Config, DEFAULT_REGION};
use crate::{
    adapters::outbound::storage::error::from_sdk_error,
    domain::{
        errors::{StorageError, StorageResult},
        models::{Bucket, StorageObject},
    },
    ports::repositories::StorageRepository,
};

/// S3 adapter that implements the StorageRepository port
#[derive(Clone, Debug)]
pub struct S3StorageRepository {
    client: Client,
    region: String,
}

impl S3StorageRepository {
    /// Wrap an already configured client. `region` decides whether bucket
    /// creation sends a location constraint.
    pub fn new(client: Client, region: impl Into<String>) -> Self {
        Self {
            client,
            region: region.into(),
        }
    }

    pub async fn from_config(config: &S3Config) -> Self {
        let client = create_s3_client(config).await;
        Self::new(client, config.region.clone())
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}

/// Log a failed call with its context and hand the error back
fn log_failure(err: StorageError, bucket: &str, key: Option<&str>) -> StorageError {
    error!(
        operation = err.operation(),
        bucket,
        key,
        reason = %err.reason(),
        "{}",
        err
    );
    err
}

fn to_utc(value: &SdkDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(value.secs(), value.subsec_nanos())
}

#[async_trait]
impl StorageRepository for S3StorageRepository {
    async fn list_buckets(&self) -> StorageResult<Vec<Bucket>> {
        let output = self
            .client
            .list_buckets()
            .send()
            .await
            .map_err(|e| log_failure(from_sdk_error("list_buckets", e), "", None))?;

        let buckets: Vec<Bucket> = output
            .buckets()
            .iter()
            .map(|bucket| {
                Bucket::new(
                    bucket.name().unwrap_or_default(),
                    bucket
                        .creation_date()
                        .and_then(to_utc)
                        .unwrap_or_else(Utc::now),
                )
            })
            .collect();

        debug!(count = buckets.len(), "listed buckets");
        Ok(buckets)
    }

    async fn create_bucket(&self, bucket: &str) -> StorageResult<()> {
        let mut request = self.client.create_bucket().bucket(bucket);

        // us-east-1 rejects an explicit location constraint
        if self.region != DEFAULT_REGION {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(self.region.as_str()))
                    .build(),
            );
        }

        request
            .send()
            .await
            .map_err(|e| log_failure(from_sdk_error("create_bucket", e), bucket, None))?;

        debug!(bucket, "created bucket");
        Ok(())
    }

    async fn delete_bucket(&self, bucket: &str) -> StorageResult<()> {
        self.client
            .delete_bucket()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| log_failure(from_sdk_error("delete_bucket", e), bucket, None))?;

        debug!(bucket, "deleted bucket");
        Ok(())
    }

    async fn list_objects(&self, bucket: &str) -> StorageResult<Vec<StorageObject>> {
        let mut objects = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let output = self
                .client
                .list_objects_v2()
                .bucket(bucket)
                .set_continuation_token(continuation_token.take())
                .send()
                .await
                .map_err(|e| log_failure(from_sdk_error("list_objects", e), bucket, None))?;

            for object in output.contents() {
                objects.push(StorageObject::new(
                    object.key().unwrap_or_default(),
                    object.size().unwrap_or(0),
                    object
                        .last_modified()
                        .and_then(to_utc)
                        .unwrap_or_else(Utc::now),
                ));
            }

            continuation_token = output.next_continuation_token().map(str::to_string);
            if continuation_token.is_none() {
                break;
            }
        }

        debug!(bucket, count = objects.len(), "listed objects");
        Ok(objects)
    }

    async fn upload_object_as(
        &self,
        bucket: &str,
        key: &str,
        file_path: &Path,
    ) -> StorageResult<StorageObject> {
        let display_path = file_path.display().to_string();

        let metadata = tokio::fs::metadata(file_path).await.map_err(|e| {
            log_failure(
                StorageError::io("upload_object", &display_path, e.to_string()),
                bucket,
                Some(key),
            )
        })?;

        let body = ByteStream::from_path(file_path).await.map_err(|e| {
            log_failure(
                StorageError::io("upload_object", &display_path, e.to_string()),
                bucket,
                Some(key),
            )
        })?;

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .map_err(|e| log_failure(from_sdk_error("upload_object", e), bucket, Some(key)))?;

        debug!(bucket, key, path = %display_path, size = metadata.len(), "uploaded object");
        Ok(StorageObject::new(key, metadata.len() as i64, Utc::now()))
    }

    async fn generate_presigned_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> StorageResult<String> {
        let presigning = PresigningConfig::expires_in(expires_in).map_err(|e| {
            log_failure(
                StorageError::InvalidInput {
                    operation: "generate_presigned_url",
                    message: e.to_string(),
                },
                bucket,
                Some(key),
            )
        })?;

        let request = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| {
                log_failure(from_sdk_error("generate_presigned_url", e), bucket, Some(key))
            })?;

        Ok(request.uri().to_string())
    }

    async fn delete_object(&self, bucket: &str, key: &str) -> StorageResult<()> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| log_failure(from_sdk_error("delete_object", e), bucket, Some(key)))?;

        debug!(bucket, key, "deleted object");
        Ok(())
    }

    async fn copy_object(
        &self,
        bucket: &str,
        source_key: &str,
        destination_key: &str,
    ) -> StorageResult<()> {
        let copy_source = format!("{}/{}", bucket, urlencoding::encode(source_key));

        self.client
            .copy_object()
            .bucket(bucket)
            .copy_source(copy_source)
            .key(destination_key)
            .send()
            .await
            .map_err(|e| {
                log_failure(from_sdk_error("copy_object", e), bucket, Some(source_key))
            })?;

        debug!(bucket, source_key, destination_key, "copied object");
        Ok(())
    }
}

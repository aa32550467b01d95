use aws_sdk_s3::{
    config::http::HttpResponse,
    error::{DisplayErrorContext, ProvideErrorMetadata, SdkError},
};

use crate::domain::errors::{FailureReason, StorageError};

const NOT_FOUND_CODES: &[&str] = &["NoSuchBucket", "NoSuchKey", "NotFound"];
const PERMISSION_CODES: &[&str] = &[
    "AccessDenied",
    "InvalidAccessKeyId",
    "SignatureDoesNotMatch",
    "AllAccessDisabled",
];
const CONFLICT_CODES: &[&str] = &[
    "BucketAlreadyExists",
    "BucketAlreadyOwnedByYou",
    "BucketNotEmpty",
    "OperationAborted",
];

/// Map an S3 error code and HTTP status to a failure category.
///
/// The error code wins over the status; the status only decides when the
/// code is missing or unknown.
pub fn classify(code: Option<&str>, status: Option<u16>) -> FailureReason {
    if let Some(code) = code {
        if NOT_FOUND_CODES.contains(&code) {
            return FailureReason::NotFound;
        }
        if PERMISSION_CODES.contains(&code) {
            return FailureReason::PermissionDenied;
        }
        if CONFLICT_CODES.contains(&code) {
            return FailureReason::Conflict;
        }
    }

    match status {
        Some(404) => FailureReason::NotFound,
        Some(401) | Some(403) => FailureReason::PermissionDenied,
        Some(409) => FailureReason::Conflict,
        Some(500..=599) => FailureReason::Unavailable,
        _ => FailureReason::Backend,
    }
}

/// Convert an `object_store` error into the domain error for `operation`
pub fn from_object_store_error(operation: &'static str, err: object_store::Error) -> StorageError {
    let reason = match &err {
        object_store::Error::NotFound { .. } => FailureReason::NotFound,
        object_store::Error::AlreadyExists { .. } | object_store::Error::Precondition { .. } => {
            FailureReason::Conflict
        }
        object_store::Error::PermissionDenied { .. }
        | object_store::Error::Unauthenticated { .. } => FailureReason::PermissionDenied,
        object_store::Error::InvalidPath { .. } => FailureReason::InvalidInput,
        _ => FailureReason::Backend,
    };

    StorageError::new(reason, operation, err.to_string())
}

/// Convert an SDK error into the domain error for `operation`
pub fn from_sdk_error<E>(operation: &'static str, err: SdkError<E, HttpResponse>) -> StorageError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
{
    let message = DisplayErrorContext(&err).to_string();

    let reason = match &err {
        SdkError::DispatchFailure(_) | SdkError::TimeoutError(_) => FailureReason::Unavailable,
        SdkError::ConstructionFailure(_) => FailureReason::InvalidInput,
        _ => classify(
            err.code(),
            err.raw_response().map(|response| response.status().as_u16()),
        ),
    };

    StorageError::new(reason, operation, message)
}

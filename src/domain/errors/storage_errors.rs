use thiserror::Error;

/// Category of a failed storage operation.
///
/// Callers that only need to branch on "what went wrong" match on this
/// instead of on the full [`StorageError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureReason {
    NotFound,
    PermissionDenied,
    Conflict,
    Unavailable,
    InvalidInput,
    Io,
    Backend,
}

impl std::fmt::Display for FailureReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FailureReason::NotFound => "not found",
            FailureReason::PermissionDenied => "permission denied",
            FailureReason::Conflict => "conflict",
            FailureReason::Unavailable => "backend unavailable",
            FailureReason::InvalidInput => "invalid input",
            FailureReason::Io => "i/o error",
            FailureReason::Backend => "backend error",
        };
        f.write_str(s)
    }
}

/// Errors that can occur during storage operations.
///
/// Every adapter translates its backend's native errors into this type, so
/// nothing above the repository port ever sees an SDK error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// Bucket or object does not exist
    #[error("{operation} failed: not found: {message}")]
    NotFound {
        operation: &'static str,
        message: String,
    },

    /// Credentials rejected or access denied
    #[error("{operation} failed: permission denied: {message}")]
    PermissionDenied {
        operation: &'static str,
        message: String,
    },

    /// Resource already exists, or bucket is not empty
    #[error("{operation} failed: conflict: {message}")]
    Conflict {
        operation: &'static str,
        message: String,
    },

    /// Backend unreachable, timed out, or returned a server error
    #[error("{operation} failed: backend unavailable: {message}")]
    Unavailable {
        operation: &'static str,
        message: String,
    },

    /// Arguments the backend call cannot be built from
    #[error("{operation} failed: invalid input: {message}")]
    InvalidInput {
        operation: &'static str,
        message: String,
    },

    /// Local file could not be opened or read
    #[error("{operation} failed: cannot read '{path}': {message}")]
    Io {
        operation: &'static str,
        path: String,
        message: String,
    },

    /// Any other backend-reported failure
    #[error("{operation} failed: {message}")]
    Backend {
        operation: &'static str,
        message: String,
    },
}

impl StorageError {
    /// Build an error of the given category. `FailureReason::Io` has no path
    /// here; use [`StorageError::io`] when one is known.
    pub fn new(reason: FailureReason, operation: &'static str, message: impl Into<String>) -> Self {
        let message = message.into();
        match reason {
            FailureReason::NotFound => StorageError::NotFound { operation, message },
            FailureReason::PermissionDenied => StorageError::PermissionDenied { operation, message },
            FailureReason::Conflict => StorageError::Conflict { operation, message },
            FailureReason::Unavailable => StorageError::Unavailable { operation, message },
            FailureReason::InvalidInput => StorageError::InvalidInput { operation, message },
            FailureReason::Io => StorageError::Io {
                operation,
                path: String::new(),
                message,
            },
            FailureReason::Backend => StorageError::Backend { operation, message },
        }
    }

    pub fn io(operation: &'static str, path: impl Into<String>, message: impl Into<String>) -> Self {
        StorageError::Io {
            operation,
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn reason(&self) -> FailureReason {
        match self {
            StorageError::NotFound { .. } => FailureReason::NotFound,
            StorageError::PermissionDenied { .. } => FailureReason::PermissionDenied,
            StorageError::Conflict { .. } => FailureReason::Conflict,
            StorageError::Unavailable { .. } => FailureReason::Unavailable,
            StorageError::InvalidInput { .. } => FailureReason::InvalidInput,
            StorageError::Io { .. } => FailureReason::Io,
            StorageError::Backend { .. } => FailureReason::Backend,
        }
    }

    /// Name of the repository operation that failed
    pub fn operation(&self) -> &'static str {
        match self {
            StorageError::NotFound { operation, .. }
            | StorageError::PermissionDenied { operation, .. }
            | StorageError::Conflict { operation, .. }
            | StorageError::Unavailable { operation, .. }
            | StorageError::InvalidInput { operation, .. }
            | StorageError::Io { operation, .. }
            | StorageError::Backend { operation, .. } => operation,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.reason() == FailureReason::NotFound
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Component, Path};

/// An object stored in a bucket, as reported by a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StorageObject {
    pub key: String,
    pub size: i64,
    pub last_modified: DateTime<Utc>,
}

impl StorageObject {
    pub fn new(key: impl Into<String>, size: i64, last_modified: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            size,
            last_modified,
        }
    }
}

impl std::fmt::Display for StorageObject {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "StorageObject(key={}, size={}, last_modified={})",
            self.key, self.size, self.last_modified
        )
    }
}

/// Derive an object key from a local file path: the final path segment.
///
/// Returns `None` when the path does not end in a normal segment
/// (`/`, `..`, an empty string).
pub fn object_key_from_path(path: &Path) -> Option<String> {
    match path.components().next_back()? {
        Component::Normal(name) => Some(name.to_string_lossy().into_owned()),
        _ => None,
    }
}

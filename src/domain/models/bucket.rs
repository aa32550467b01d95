use chrono::{DateTime, Utc};
use serde::Serialize;

/// A named top-level storage container, as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub name: String,
    pub creation_date: DateTime<Utc>,
}

impl Bucket {
    pub fn new(name: impl Into<String>, creation_date: DateTime<Utc>) -> Self {
        Self {
            name: name.into(),
            creation_date,
        }
    }
}

impl std::fmt::Display for Bucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Bucket(name={}, creation_date={})",
            self.name, self.creation_date
        )
    }
}

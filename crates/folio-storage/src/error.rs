//! Local persistence failures

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem trouble, or a failure injected by the in-memory store
    #[error("Local storage unavailable: {0}")]
    Io(String),

    /// Saving `key` would exceed the per-value quota
    #[error("Storage capacity exceeded: '{key}' needs {size} bytes, limit is {limit}")]
    CapacityExceeded { key: String, size: usize, limit: usize },

    /// A value could not be encoded for storage
    #[error("Cannot encode stored value: {0}")]
    Encode(#[from] serde_json::Error),

    /// The redb file rejected an open, transaction or table operation
    #[error("Database error: {0}")]
    Database(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl StorageError {
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io(message.into())
    }

    /// For `map_err` on redb results
    pub fn database(err: impl std::fmt::Display) -> Self {
        Self::Database(err.to_string())
    }

    /// Quota rejections are expected when the document outgrows the store;
    /// the caller keeps working from memory.
    pub fn is_capacity(&self) -> bool {
        matches!(self, Self::CapacityExceeded { .. })
    }
}

pub type StorageResult<T> = Result<T, StorageError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_message_names_key() {
        let err = StorageError::CapacityExceeded {
            key: "site_content_v1".into(),
            size: 10,
            limit: 5,
        };
        assert!(err.is_capacity());
        assert_eq!(
            err.to_string(),
            "Storage capacity exceeded: 'site_content_v1' needs 10 bytes, limit is 5"
        );
    }

    #[test]
    fn test_conversions() {
        let denied = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        assert!(matches!(StorageError::from(denied), StorageError::Io(_)));

        let truncated = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = StorageError::from(truncated);
        assert!(matches!(err, StorageError::Encode(_)));
        assert!(!err.is_capacity());
    }

    #[test]
    fn test_database_helper() {
        assert_eq!(
            StorageError::database("table locked").to_string(),
            "Database error: table locked"
        );
    }
}

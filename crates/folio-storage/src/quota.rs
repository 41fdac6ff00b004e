//! Byte quota for stored values
//!
//! Mirrors the per-origin limit a browser puts on keyed storage: a write
//! that would store more than the limit fails instead of truncating.

use crate::error::StorageError;

/// Maximum encoded size of a single stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ByteQuota {
    max_value_bytes: Option<usize>,
}

impl ByteQuota {
    /// No limit
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// Limit every value to `max_value_bytes`
    pub fn new(max_value_bytes: usize) -> Self {
        Self {
            max_value_bytes: Some(max_value_bytes),
        }
    }

    /// Get the configured limit
    pub fn max_value_bytes(&self) -> Option<usize> {
        self.max_value_bytes
    }

    /// Check a value of `size` bytes about to be written under `key`.
    pub fn check(&self, key: &str, size: usize) -> Result<(), StorageError> {
        match self.max_value_bytes {
            Some(limit) if size > limit => Err(StorageError::CapacityExceeded {
                key: key.to_string(),
                size,
                limit,
            }),
            _ => Ok(()),
        }
    }
}

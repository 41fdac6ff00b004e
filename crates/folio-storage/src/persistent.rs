//! Durable local store on redb
//!
//! One database file with a single string-keyed table of raw blobs.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use redb::{Database, ReadableTable, ReadableTableMetadata, TableDefinition};
use tracing::{debug, info, instrument};

use crate::LocalStore;
use crate::error::{StorageError, StorageResult};
use crate::quota::ByteQuota;

// Key: storage key, Value: raw JSON bytes
const VALUES: TableDefinition<&str, &[u8]> = TableDefinition::new("values");

/// Configuration for the redb store
#[derive(Debug, Clone)]
pub struct RedbLocalStoreConfig {
    /// Path to the database file
    pub db_path: PathBuf,
    /// Size limit per value
    pub quota: ByteQuota,
}

impl Default for RedbLocalStoreConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("./data/folio.redb"),
            quota: ByteQuota::unlimited(),
        }
    }
}

impl RedbLocalStoreConfig {
    /// Config for a database at `db_path`
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            db_path: db_path.into(),
            ..Self::default()
        }
    }

    /// Set the quota
    pub fn with_quota(mut self, quota: ByteQuota) -> Self {
        self.quota = quota;
        self
    }
}

/// redb implementation of LocalStore
#[derive(Clone)]
pub struct RedbLocalStore {
    db: Arc<Database>,
    config: RedbLocalStoreConfig,
}

impl std::fmt::Debug for RedbLocalStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbLocalStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RedbLocalStore {
    /// Open or create the database
    #[instrument(skip(config), fields(path = %config.db_path.display()))]
    pub fn open(config: RedbLocalStoreConfig) -> StorageResult<Self> {
        if let Some(parent) = config.db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let db = Database::create(&config.db_path).map_err(StorageError::database)?;

        let write_txn = db.begin_write().map_err(StorageError::database)?;
        write_txn
            .open_table(VALUES)
            .map_err(StorageError::database)?;
        write_txn.commit().map_err(StorageError::database)?;

        info!("Opened local content database");

        Ok(Self {
            db: Arc::new(db),
            config,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &RedbLocalStoreConfig {
        &self.config
    }

    /// Number of stored keys
    pub fn len(&self) -> StorageResult<u64> {
        let read_txn = self.db.begin_read().map_err(StorageError::database)?;
        let table = read_txn
            .open_table(VALUES)
            .map_err(StorageError::database)?;
        table.len().map_err(StorageError::database)
    }

    /// Whether nothing is stored
    pub fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }
}

#[async_trait]
impl LocalStore for RedbLocalStore {
    async fn read(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        let read_txn = self.db.begin_read().map_err(StorageError::database)?;
        let table = read_txn
            .open_table(VALUES)
            .map_err(StorageError::database)?;

        let value = table
            .get(key)
            .map_err(StorageError::database)?
            .map(|v| v.value().to_vec());

        Ok(value)
    }

    async fn write(&self, key: &str, value: Vec<u8>) -> StorageResult<()> {
        self.config.quota.check(key, value.len())?;

        let write_txn = self.db.begin_write().map_err(StorageError::database)?;
        {
            let mut table = write_txn
                .open_table(VALUES)
                .map_err(StorageError::database)?;
            table
                .insert(key, value.as_slice())
                .map_err(StorageError::database)?;
        }
        write_txn.commit().map_err(StorageError::database)?;

        debug!(key, bytes = value.len(), "Persisted value");
        Ok(())
    }

    async fn remove(&self, key: &str) -> StorageResult<bool> {
        let write_txn = self.db.begin_write().map_err(StorageError::database)?;
        let removed = {
            let mut table = write_txn
                .open_table(VALUES)
                .map_err(StorageError::database)?;
            table
                .remove(key)
                .map_err(StorageError::database)?
                .is_some()
        };
        write_txn.commit().map_err(StorageError::database)?;

        Ok(removed)
    }
}

//! Pluggable storage backends.
//!
//! The driver consumes a backend strictly through [`KeyValueStore`]; a
//! backend's own error and connection types never reach the harness.

mod memory;
mod sled;

pub use memory::MemoryStore;
pub use sled::{
    SledStore, SledStoreConfig, CACHE_CAPACITY_PROPERTY, COMPRESSION_PROPERTY, PATH_PROPERTY,
    TEMPORARY_PROPERTY,
};

use crate::error::Error;
use crate::record::FieldMap;

/// Capabilities the driver requires from a storage backend.
///
/// One store handle is shared by every driver instance of a run, so
/// implementations must be safe for concurrent use. Methods return
/// [`Error`]; the driver, not the store, decides what a fault means for the
/// harness.
pub trait KeyValueStore: Send + Sync {
    /// Store a record under `key`, overwriting any existing value.
    fn put(&self, key: &str, record: &FieldMap) -> Result<(), Error>;

    /// Fetch the record stored under `key`.
    fn get(&self, key: &str) -> Result<Option<FieldMap>, Error>;

    /// Remove the record under `key`. Removing an absent key is not an
    /// error.
    fn delete(&self, key: &str) -> Result<(), Error>;

    /// Collect records with keys in `[start, end)` in ascending key order.
    ///
    /// `limit` bounds the number of returned records; 0 means unbounded.
    fn range_scan(
        &self,
        start: &str,
        end: &str,
        limit: usize,
    ) -> Result<Vec<(String, FieldMap)>, Error>;

    /// Apply all pairs atomically: either every record becomes visible or
    /// none does.
    fn apply_batch(&self, pairs: &[(String, FieldMap)]) -> Result<(), Error> {
        let _ = pairs;
        Err(Error::Unsupported("atomic batch writes"))
    }

    /// Whether [`KeyValueStore::apply_batch`] is backed by a real multi-key
    /// transaction.
    fn supports_batch(&self) -> bool {
        false
    }

    /// Flush pending writes and release backend resources.
    fn close(&self) -> Result<(), Error> {
        Ok(())
    }
}

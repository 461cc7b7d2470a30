//! In-memory reference store.

use std::collections::BTreeMap;
use std::ops::Bound;

use parking_lot::RwLock;

use super::KeyValueStore;
use crate::error::Error;
use crate::record::FieldMap;

/// Ordered in-memory store.
///
/// Records live behind a single `RwLock`, and scans collect under the read
/// lock so a concurrent writer never splits a scan. No batch capability:
/// writes are applied per call, like a plain key-value backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<String, FieldMap>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn put(&self, key: &str, record: &FieldMap) -> Result<(), Error> {
        self.records.write().insert(key.to_string(), record.clone());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<FieldMap>, Error> {
        Ok(self.records.read().get(key).cloned())
    }

    fn delete(&self, key: &str) -> Result<(), Error> {
        self.records.write().remove(key);
        Ok(())
    }

    fn range_scan(
        &self,
        start: &str,
        end: &str,
        limit: usize,
    ) -> Result<Vec<(String, FieldMap)>, Error> {
        let records = self.records.read();
        let range = records
            .range::<str, _>((Bound::Included(start), Bound::Excluded(end)))
            .map(|(key, record)| (key.clone(), record.clone()));

        Ok(match limit {
            0 => range.collect(),
            n => range.take(n).collect(),
        })
    }
}

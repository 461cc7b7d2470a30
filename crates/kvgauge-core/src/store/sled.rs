//! Sled-backed reference store.

use std::path::PathBuf;

use sled::{Batch, Db, Tree};

use super::KeyValueStore;
use crate::config::Properties;
use crate::error::Error;
use crate::record::FieldMap;

/// Tree name for record data.
const DATA_TREE: &str = "records";

/// Property for the database directory.
pub const PATH_PROPERTY: &str = "sled.path";

/// Default database directory.
pub const PATH_DEFAULT: &str = "./kvgauge_data";

/// Property for the page cache capacity in bytes.
pub const CACHE_CAPACITY_PROPERTY: &str = "sled.cache_capacity";

/// Default page cache capacity.
pub const CACHE_CAPACITY_DEFAULT: &str = "1073741824";

/// Property enabling zstd compression.
pub const COMPRESSION_PROPERTY: &str = "sled.compression";

/// Property for a temporary database (deleted on drop).
pub const TEMPORARY_PROPERTY: &str = "sled.temporary";

/// Configuration for the sled-backed store.
#[derive(Debug, Clone)]
pub struct SledStoreConfig {
    /// Path to the database directory.
    pub path: PathBuf,

    /// Page cache capacity in bytes.
    pub cache_capacity: u64,

    /// Enable zstd compression.
    pub compression: bool,

    /// Temporary database (deleted on drop).
    pub temporary: bool,
}

impl Default for SledStoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(PATH_DEFAULT),
            cache_capacity: 1024 * 1024 * 1024, // 1GB
            compression: true,
            temporary: false,
        }
    }
}

impl SledStoreConfig {
    /// Create a new configuration with the given path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Create a temporary configuration for testing.
    pub fn temporary() -> Self {
        Self {
            path: PathBuf::from(""),
            temporary: true,
            ..Default::default()
        }
    }

    /// Validate and extract the sled properties.
    pub fn from_properties(props: &Properties) -> Result<Self, Error> {
        Ok(Self {
            path: PathBuf::from(props.get_or(PATH_PROPERTY, PATH_DEFAULT)),
            cache_capacity: props.parse_or(CACHE_CAPACITY_PROPERTY, CACHE_CAPACITY_DEFAULT)?,
            compression: props.parse_or(COMPRESSION_PROPERTY, "true")?,
            temporary: props.parse_or(TEMPORARY_PROPERTY, "false")?,
        })
    }

    /// Convert to sled configuration.
    fn to_sled_config(&self) -> sled::Config {
        let mut config = sled::Config::new()
            .cache_capacity(self.cache_capacity)
            .use_compression(self.compression);

        if self.temporary {
            config = config.temporary(true);
        } else {
            config = config.path(&self.path);
        }

        config
    }
}

/// Sled-backed store.
///
/// Records are rkyv-encoded into a single tree; [`sled::Batch`] provides the
/// atomic multi-key flush that backs driver-side insert batching.
pub struct SledStore {
    db: Db,
    tree: Tree,
}

impl SledStore {
    /// Open or create a store with the given configuration.
    pub fn open(config: SledStoreConfig) -> Result<Self, Error> {
        let db = config.to_sled_config().open()?;
        let tree = db.open_tree(DATA_TREE)?;
        Ok(Self { db, tree })
    }
}

impl KeyValueStore for SledStore {
    fn put(&self, key: &str, record: &FieldMap) -> Result<(), Error> {
        self.tree.insert(key, record.to_bytes()?)?;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<FieldMap>, Error> {
        match self.tree.get(key)? {
            Some(bytes) => Ok(Some(FieldMap::from_bytes(&bytes)?)),
            None => Ok(None),
        }
    }

    fn delete(&self, key: &str) -> Result<(), Error> {
        self.tree.remove(key)?;
        Ok(())
    }

    fn range_scan(
        &self,
        start: &str,
        end: &str,
        limit: usize,
    ) -> Result<Vec<(String, FieldMap)>, Error> {
        let mut rows = Vec::new();
        for entry in self.tree.range(start.as_bytes()..end.as_bytes()) {
            let (key_bytes, value_bytes) = entry?;
            let key = String::from_utf8(key_bytes.to_vec())
                .map_err(|_| Error::Deserialization("non-utf8 row key".to_string()))?;
            rows.push((key, FieldMap::from_bytes(&value_bytes)?));

            if limit != 0 && rows.len() == limit {
                break;
            }
        }
        Ok(rows)
    }

    fn apply_batch(&self, pairs: &[(String, FieldMap)]) -> Result<(), Error> {
        let mut batch = Batch::default();
        for (key, record) in pairs {
            batch.insert(key.as_bytes(), record.to_bytes()?);
        }
        self.tree.apply_batch(batch)?;
        Ok(())
    }

    fn supports_batch(&self) -> bool {
        true
    }

    fn close(&self) -> Result<(), Error> {
        self.db.flush()?;
        Ok(())
    }
}

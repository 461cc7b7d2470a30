//! Benchmark harness helpers.
//!
//! This module provides driver contexts for isolated benchmark runs.

use std::sync::Arc;

use kvgauge_core::config::BATCH_SIZE_PROPERTY;
use kvgauge_core::factory::BACKEND_PROPERTY;
use kvgauge_core::store::PATH_PROPERTY;
use kvgauge_core::{open_driver, Driver, FieldMap, Properties, TracingSink};
use tempfile::TempDir;

/// Table every generated record lands in.
pub const TABLE: &str = "usertable";

/// A driver plus the scratch space backing it.
pub struct BenchContext {
    pub driver: Box<dyn Driver>,
    /// Keeps a sled context's database directory alive for the run.
    _data_dir: Option<TempDir>,
}

impl BenchContext {
    /// In-memory backend.
    pub fn memory() -> Self {
        Self::open(Properties::new(), None)
    }

    /// Sled backend in a fresh temp directory, direct writes.
    pub fn sled() -> Self {
        Self::sled_batched(0)
    }

    /// Sled backend with insert batching at the given size.
    pub fn sled_batched(batch_size: usize) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let props = Properties::new()
            .with(BACKEND_PROPERTY, "sled")
            .with(PATH_PROPERTY, dir.path().to_str().unwrap())
            .with(BATCH_SIZE_PROPERTY, batch_size.to_string());
        Self::open(props, Some(dir))
    }

    fn open(props: Properties, data_dir: Option<TempDir>) -> Self {
        let driver = open_driver(&props, Arc::new(TracingSink)).unwrap();
        Self {
            driver,
            _data_dir: data_dir,
        }
    }

    /// Load records through the driver, asserting every insert lands.
    pub fn load(&mut self, records: &[(String, FieldMap)]) {
        for (key, record) in records {
            assert!(self.driver.insert(TABLE, key, record.clone()).is_ok());
        }
    }
}

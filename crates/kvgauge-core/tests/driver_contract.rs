//! Contract tests for the benchmark driver over both reference stores.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use kvgauge_core::{
    Driver, DriverConfig, Error, FieldMap, KeyValueStore, MemorySink, MemoryStore, Outcome,
    SledStore, SledStoreConfig, StoreDriver,
};

const TABLE: &str = "usertable";

fn field_map(pairs: &[(&str, &str)]) -> FieldMap {
    let mut map = FieldMap::new();
    for (name, value) in pairs {
        map.insert(*name, value.as_bytes().to_vec());
    }
    map
}

fn filter(names: &[&str]) -> HashSet<String> {
    names.iter().map(|n| n.to_string()).collect()
}

/// Run a contract property against both reference backends.
fn each_backend(test: impl Fn(&mut dyn Driver)) {
    let mut memory = StoreDriver::new(
        Arc::new(MemoryStore::new()),
        DriverConfig::default(),
        Arc::new(MemorySink::new()),
    );
    test(&mut memory);
    memory.cleanup().unwrap();

    let store = SledStore::open(SledStoreConfig::temporary()).unwrap();
    let mut sled = StoreDriver::new(
        Arc::new(store),
        DriverConfig::default(),
        Arc::new(MemorySink::new()),
    );
    test(&mut sled);
    sled.cleanup().unwrap();
}

#[test]
fn read_of_never_inserted_key_is_not_found() {
    each_backend(|driver| {
        assert_eq!(driver.read(TABLE, "ghost", None), Outcome::NotFound);
    });
}

#[test]
fn insert_then_read_returns_exact_fields() {
    each_backend(|driver| {
        let values = field_map(&[("field0", "alpha"), ("field1", "beta")]);
        assert!(driver.insert(TABLE, "user0", values.clone()).is_ok());
        assert_eq!(driver.read(TABLE, "user0", None), Outcome::Ok(values));
    });
}

#[test]
fn insert_overwrites_whole_record() {
    each_backend(|driver| {
        driver.insert(TABLE, "user0", field_map(&[("old", "1"), ("both", "1")]));
        let replacement = field_map(&[("both", "2")]);
        driver.insert(TABLE, "user0", replacement.clone());

        assert_eq!(driver.read(TABLE, "user0", None), Outcome::Ok(replacement));
    });
}

#[test]
fn delete_then_read_is_not_found() {
    each_backend(|driver| {
        driver.insert(TABLE, "user0", field_map(&[("f", "v")]));
        assert!(driver.delete(TABLE, "user0").is_ok());
        assert_eq!(driver.read(TABLE, "user0", None), Outcome::NotFound);
    });
}

#[test]
fn delete_of_absent_key_is_idempotent() {
    each_backend(|driver| {
        assert!(driver.delete(TABLE, "never-inserted").is_ok());
        assert!(driver.delete(TABLE, "never-inserted").is_ok());
    });
}

#[test]
fn update_changes_only_supplied_fields() {
    each_backend(|driver| {
        driver.insert(
            TABLE,
            "user0",
            field_map(&[("name", "alice"), ("status", "active")]),
        );
        assert!(driver
            .update(TABLE, "user0", field_map(&[("status", "inactive")]))
            .is_ok());

        let expected = field_map(&[("name", "alice"), ("status", "inactive")]);
        assert_eq!(driver.read(TABLE, "user0", None), Outcome::Ok(expected));
    });
}

#[test]
fn read_with_field_filter_projects_exactly() {
    each_backend(|driver| {
        driver.insert(
            TABLE,
            "user0",
            field_map(&[("name", "alice"), ("email", "a@x"), ("status", "active")]),
        );

        let wanted = filter(&["name", "status"]);
        let record = driver.read(TABLE, "user0", Some(&wanted)).ok().unwrap();
        assert_eq!(record.len(), 2);
        assert_eq!(record.get("name"), Some("alice".as_bytes()));
        assert!(record.get("email").is_none());
    });
}

#[test]
fn read_of_record_lacking_requested_field_is_not_found() {
    each_backend(|driver| {
        driver.insert(TABLE, "user0", field_map(&[("name", "alice")]));

        let wanted = filter(&["name", "phone"]);
        assert_eq!(driver.read(TABLE, "user0", Some(&wanted)), Outcome::NotFound);
    });
}

#[test]
fn scan_is_ordered_bounded_and_starts_at_key() {
    each_backend(|driver| {
        // Insert out of key order; scan must come back sorted.
        for i in [4usize, 1, 3, 0, 2, 5] {
            driver.insert(
                TABLE,
                &format!("user{i}"),
                field_map(&[("k", &format!("user{i}"))]),
            );
        }

        let records = driver.scan(TABLE, "user2", 3, None).ok().unwrap();
        let keys: Vec<_> = records
            .iter()
            .map(|r| String::from_utf8(r.get("k").unwrap().to_vec()).unwrap())
            .collect();
        assert_eq!(keys, vec!["user2", "user3", "user4"]);
    });
}

#[test]
fn scan_past_the_end_returns_remaining_without_error() {
    each_backend(|driver| {
        for i in 0..3 {
            driver.insert(TABLE, &format!("user{i}"), field_map(&[("f", "v")]));
        }

        let records = driver.scan(TABLE, "user1", 100, None).ok().unwrap();
        assert_eq!(records.len(), 2);

        let empty = driver.scan(TABLE, "userz", 10, None).ok().unwrap();
        assert!(empty.is_empty());
    });
}

#[test]
fn scan_with_zero_limit_is_unbounded() {
    each_backend(|driver| {
        for i in 0..10 {
            driver.insert(TABLE, &format!("user{i}"), field_map(&[("f", "v")]));
        }
        let records = driver.scan(TABLE, "", 0, None).ok().unwrap();
        assert_eq!(records.len(), 10);
    });
}

#[test]
fn scan_never_crosses_tables() {
    each_backend(|driver| {
        driver.insert("users", "a", field_map(&[("f", "user")]));
        driver.insert("posts", "a", field_map(&[("f", "post")]));

        let records = driver.scan("users", "", 0, None).ok().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].get("f"), Some("user".as_bytes()));
    });
}

#[test]
fn scan_with_missing_requested_field_fails_whole_call() {
    each_backend(|driver| {
        driver.insert(TABLE, "user0", field_map(&[("v", "1"), ("extra", "x")]));
        driver.insert(TABLE, "user1", field_map(&[("v", "1")]));

        // user0 satisfies the projection, user1 does not; no partial result.
        let wanted = filter(&["extra"]);
        assert_eq!(driver.scan(TABLE, "", 0, Some(&wanted)), Outcome::Error);
    });
}

#[test]
fn insert_scan_delete_scenario() {
    each_backend(|driver| {
        for key in ["a", "b", "c"] {
            driver.insert(TABLE, key, field_map(&[("v", "1")]));
        }

        let records = driver.scan(TABLE, "a", 2, None).ok().unwrap();
        assert_eq!(records.len(), 2);
        for record in &records {
            assert_eq!(record.get("v"), Some("1".as_bytes()));
        }

        assert!(driver.delete(TABLE, "b").is_ok());
        assert_eq!(driver.read(TABLE, "b", None), Outcome::NotFound);
        assert_eq!(
            driver.read(TABLE, "a", None),
            Outcome::Ok(field_map(&[("v", "1")]))
        );
    });
}

// ---------------------------------------------------------------------------
// Batched writes (sled reference backend: real multi-key transaction)
// ---------------------------------------------------------------------------

fn batched_sled_driver(batch_size: usize) -> (StoreDriver<SledStore>, Arc<SledStore>) {
    let store = Arc::new(SledStore::open(SledStoreConfig::temporary()).unwrap());
    let config = DriverConfig {
        batch_size,
        ..DriverConfig::default()
    };
    let driver = StoreDriver::new(store.clone(), config, Arc::new(MemorySink::new()));
    (driver, store)
}

#[test]
fn batched_inserts_become_visible_at_threshold() {
    let (mut driver, _store) = batched_sled_driver(3);

    driver.insert(TABLE, "user0", field_map(&[("f", "0")]));
    driver.insert(TABLE, "user1", field_map(&[("f", "1")]));
    // Buffered, not yet flushed.
    assert_eq!(driver.read(TABLE, "user0", None), Outcome::NotFound);

    assert!(driver.insert(TABLE, "user2", field_map(&[("f", "2")])).is_ok());
    for i in 0..3 {
        assert!(driver.read(TABLE, &format!("user{i}"), None).is_ok());
    }
}

#[test]
fn cleanup_flushes_residual_batch() {
    let (mut driver, store) = batched_sled_driver(100);

    driver.insert(TABLE, "user0", field_map(&[("f", "0")]));
    driver.insert(TABLE, "user1", field_map(&[("f", "1")]));
    driver.cleanup().unwrap();

    // A fresh driver over the same store handle sees the flushed records.
    let mut reader = StoreDriver::new(
        store,
        DriverConfig::default(),
        Arc::new(MemorySink::new()),
    );
    assert!(reader.read(TABLE, "user0", None).is_ok());
    assert!(reader.read(TABLE, "user1", None).is_ok());
}

// ---------------------------------------------------------------------------
// Fault injection
// ---------------------------------------------------------------------------

/// Test double: delegates to an in-memory store, but fails on demand and
/// advertises whichever capabilities the test needs.
#[derive(Default)]
struct FlakyStore {
    inner: MemoryStore,
    fail_get: AtomicBool,
    fail_batch: AtomicBool,
    deny_scan: bool,
}

impl KeyValueStore for FlakyStore {
    fn put(&self, key: &str, record: &FieldMap) -> Result<(), Error> {
        self.inner.put(key, record)
    }

    fn get(&self, key: &str) -> Result<Option<FieldMap>, Error> {
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(Error::Backend("injected read fault".to_string()));
        }
        self.inner.get(key)
    }

    fn delete(&self, key: &str) -> Result<(), Error> {
        self.inner.delete(key)
    }

    fn range_scan(
        &self,
        start: &str,
        end: &str,
        limit: usize,
    ) -> Result<Vec<(String, FieldMap)>, Error> {
        if self.deny_scan {
            return Err(Error::Unsupported("ordered range iteration"));
        }
        self.inner.range_scan(start, end, limit)
    }

    fn apply_batch(&self, pairs: &[(String, FieldMap)]) -> Result<(), Error> {
        if self.fail_batch.load(Ordering::SeqCst) {
            return Err(Error::Backend("injected flush fault".to_string()));
        }
        for (key, record) in pairs {
            self.inner.put(key, record)?;
        }
        Ok(())
    }

    fn supports_batch(&self) -> bool {
        true
    }
}

#[test]
fn backend_faults_are_contained_and_logged_with_operation_and_key() {
    let store = Arc::new(FlakyStore::default());
    let events = Arc::new(MemorySink::new());
    let mut driver = StoreDriver::new(store.clone(), DriverConfig::default(), events.clone());

    store.fail_get.store(true, Ordering::SeqCst);
    assert_eq!(driver.read(TABLE, "user7", None), Outcome::Error);
    // A faulted get also fails the read-merge-write update path.
    assert_eq!(driver.update(TABLE, "user7", field_map(&[("f", "v")])), Outcome::Error);

    let errors = events.errors();
    assert!(errors[0].contains("read") && errors[0].contains("user7"));
    assert!(errors[1].contains("update") && errors[1].contains("user7"));
}

#[test]
fn scan_on_backend_without_range_support_errors() {
    let store = Arc::new(FlakyStore {
        deny_scan: true,
        ..FlakyStore::default()
    });
    let events = Arc::new(MemorySink::new());
    let mut driver = StoreDriver::new(store, DriverConfig::default(), events.clone());

    driver.insert(TABLE, "user0", field_map(&[("f", "v")]));
    assert_eq!(driver.scan(TABLE, "", 0, None), Outcome::Error);
    assert!(events.errors()[0].contains("scan"));
}

#[test]
fn failed_batch_flush_leaves_no_key_visible() {
    let store = Arc::new(FlakyStore::default());
    let events = Arc::new(MemorySink::new());
    let config = DriverConfig {
        batch_size: 3,
        ..DriverConfig::default()
    };
    let mut driver = StoreDriver::new(store.clone(), config, events.clone());

    store.fail_batch.store(true, Ordering::SeqCst);
    driver.insert(TABLE, "user0", field_map(&[("f", "0")]));
    driver.insert(TABLE, "user1", field_map(&[("f", "1")]));
    // Third insert triggers the flush, which fails as a whole.
    assert_eq!(driver.insert(TABLE, "user2", field_map(&[("f", "2")])), Outcome::Error);

    for i in 0..3 {
        assert_eq!(driver.read(TABLE, &format!("user{i}"), None), Outcome::NotFound);
    }

    // Every buffered key was reported, and the buffer was cleared: the
    // failed operations are never replayed.
    assert_eq!(events.errors().len(), 3);
    store.fail_batch.store(false, Ordering::SeqCst);
    driver.cleanup().unwrap();
    assert_eq!(driver.read(TABLE, "user0", None), Outcome::NotFound);
}

//! Benchmark driver contract and the store-backed implementation.

use std::collections::HashSet;
use std::sync::Arc;

use crate::config::DriverConfig;
use crate::error::Error;
use crate::events::EventSink;
use crate::outcome::Outcome;
use crate::record::FieldMap;
use crate::rowkey;
use crate::store::KeyValueStore;

/// Uniform benchmark surface over a storage backend.
///
/// One driver instance serves one worker; every call blocks until the
/// backend responds or the call fails. Implementations never leak backend
/// error types: a fault is reported through the event sink with the
/// operation type and key, then collapsed into [`Outcome::Error`]. Nothing
/// is retried; the harness decides what to do with a failed call.
pub trait Driver: Send {
    /// Read one record, optionally projected to `fields`.
    ///
    /// `None` or an empty set requests all fields. A record missing a
    /// requested field is `NotFound`, never a record with a hole.
    fn read(
        &mut self,
        table: &str,
        key: &str,
        fields: Option<&HashSet<String>>,
    ) -> Outcome<FieldMap>;

    /// Create or overwrite one record. Never a partial write: the record is
    /// either fully visible afterwards or the call failed.
    fn insert(&mut self, table: &str, key: &str, values: FieldMap) -> Outcome;

    /// Merge `values` into the stored record, replacing only the supplied
    /// fields. A missing key is created from `values` (create-on-update).
    fn update(&mut self, table: &str, key: &str, values: FieldMap) -> Outcome;

    /// Remove one record. Deleting an absent key succeeds.
    fn delete(&mut self, table: &str, key: &str) -> Outcome;

    /// Collect records of `table` in ascending key order, starting at or
    /// after `start_key`, up to `limit` records (0 means unbounded).
    ///
    /// Finding fewer records than requested is not an error. Partial
    /// results are never returned: a fault or failed projection anywhere in
    /// the iteration fails the whole call.
    fn scan(
        &mut self,
        table: &str,
        start_key: &str,
        limit: usize,
        fields: Option<&HashSet<String>>,
    ) -> Outcome<Vec<FieldMap>>;

    /// Flush pending batched writes and release the backend handle.
    fn cleanup(&mut self) -> Result<(), Error>;
}

/// Driver over any [`KeyValueStore`].
pub struct StoreDriver<S> {
    store: Arc<S>,
    config: DriverConfig,
    events: Arc<dyn EventSink>,
    /// Buffered inserts awaiting an atomic flush. Instance-private, so no
    /// locking.
    batch: Vec<(String, FieldMap)>,
    batching: bool,
}

impl<S: KeyValueStore> StoreDriver<S> {
    /// Build a driver instance over `store`.
    ///
    /// Batching is enabled only when the configured batch size is nonzero
    /// and the store advertises atomic multi-key writes; otherwise inserts
    /// go to the backend per call and the fallback is logged.
    pub fn new(store: Arc<S>, config: DriverConfig, events: Arc<dyn EventSink>) -> Self {
        let batching = config.batch_size > 0 && store.supports_batch();
        if config.batch_size > 0 && !batching {
            events.info("store lacks atomic batch writes, falling back to direct inserts");
        }

        Self {
            store,
            config,
            events,
            batch: Vec::new(),
            batching,
        }
    }

    fn row_key(&self, table: &str, key: &str) -> String {
        rowkey::row_key(&self.config.namespace, table, key)
    }

    /// Report a fault and collapse it into the error outcome.
    ///
    /// The single normalization path: every backend failure goes through
    /// here, so no backend error type escapes.
    fn fault<T>(&self, operation: &str, key: &str, err: &Error) -> Outcome<T> {
        self.events
            .error(&format!("{operation} failed for key {key}: {err}"));
        Outcome::Error
    }

    /// Push the buffered inserts as one atomic batch.
    ///
    /// On failure every buffered operation is failed, each key is logged,
    /// and the buffer is cleared; nothing is replayed.
    fn flush_batch(&mut self) -> Outcome {
        if self.batch.is_empty() {
            return Outcome::Ok(());
        }

        let pending = std::mem::take(&mut self.batch);
        match self.store.apply_batch(&pending) {
            Ok(()) => Outcome::Ok(()),
            Err(err) => {
                for (key, _) in &pending {
                    self.events
                        .error(&format!("batch insert failed for key {key}: {err}"));
                }
                Outcome::Error
            }
        }
    }
}

/// Treat an empty filter the same as no filter: all fields.
fn projection(fields: Option<&HashSet<String>>) -> Option<&HashSet<String>> {
    fields.filter(|wanted| !wanted.is_empty())
}

impl<S: KeyValueStore> Driver for StoreDriver<S> {
    fn read(
        &mut self,
        table: &str,
        key: &str,
        fields: Option<&HashSet<String>>,
    ) -> Outcome<FieldMap> {
        let row = self.row_key(table, key);
        let record = match self.store.get(&row) {
            Ok(Some(record)) => record,
            Ok(None) => return Outcome::NotFound,
            Err(err) => return self.fault("read", key, &err),
        };

        match projection(fields) {
            Some(wanted) => match record.project(wanted) {
                Some(projected) => Outcome::Ok(projected),
                None => {
                    self.events
                        .debug(&format!("read missed a requested field for key {key}"));
                    Outcome::NotFound
                }
            },
            None => Outcome::Ok(record),
        }
    }

    fn insert(&mut self, table: &str, key: &str, values: FieldMap) -> Outcome {
        let row = self.row_key(table, key);

        if self.batching {
            self.batch.push((row, values));
            if self.batch.len() >= self.config.batch_size {
                return self.flush_batch();
            }
            return Outcome::Ok(());
        }

        match self.store.put(&row, &values) {
            Ok(()) => Outcome::Ok(()),
            Err(err) => self.fault("insert", key, &err),
        }
    }

    fn update(&mut self, table: &str, key: &str, values: FieldMap) -> Outcome {
        let row = self.row_key(table, key);
        let mut record = match self.store.get(&row) {
            Ok(Some(existing)) => existing,
            Ok(None) => FieldMap::new(),
            Err(err) => return self.fault("update", key, &err),
        };

        record.merge(values);
        match self.store.put(&row, &record) {
            Ok(()) => Outcome::Ok(()),
            Err(err) => self.fault("update", key, &err),
        }
    }

    fn delete(&mut self, table: &str, key: &str) -> Outcome {
        let row = self.row_key(table, key);
        match self.store.delete(&row) {
            Ok(()) => Outcome::Ok(()),
            Err(err) => self.fault("delete", key, &err),
        }
    }

    fn scan(
        &mut self,
        table: &str,
        start_key: &str,
        limit: usize,
        fields: Option<&HashSet<String>>,
    ) -> Outcome<Vec<FieldMap>> {
        let start = self.row_key(table, start_key);
        let end = rowkey::table_end(&self.config.namespace, table);
        self.events
            .debug(&format!("scan from {start} to {end} limit {limit}"));

        let rows = match self.store.range_scan(&start, &end, limit) {
            Ok(rows) => rows,
            Err(err) => return self.fault("scan", start_key, &err),
        };

        let wanted = projection(fields);
        let mut records = Vec::with_capacity(rows.len());
        for (row, record) in rows {
            match wanted {
                Some(wanted) => match record.project(wanted) {
                    Some(projected) => records.push(projected),
                    None => {
                        // All-or-nothing: gathered rows are discarded.
                        self.events
                            .error(&format!("scan missed a requested field for key {row}"));
                        return Outcome::Error;
                    }
                },
                None => records.push(record),
            }
        }

        Outcome::Ok(records)
    }

    fn cleanup(&mut self) -> Result<(), Error> {
        if let Outcome::Error = self.flush_batch() {
            return Err(Error::Backend("batch flush failed during cleanup".to_string()));
        }
        self.store.close()
    }
}

//! Driver configuration.

use std::collections::HashMap;
use std::str::FromStr;

use crate::error::Error;
use crate::rowkey::{SEPARATOR, TERMINATOR};

/// Property naming the keyspace all tables live under.
pub const NAMESPACE_PROPERTY: &str = "driver.namespace";

/// Default keyspace name.
pub const NAMESPACE_DEFAULT: &str = "kv";

/// Property for the insert batch size; 0 disables batching.
pub const BATCH_SIZE_PROPERTY: &str = "driver.batchsize";

/// Default insert batch size.
pub const BATCH_SIZE_DEFAULT: &str = "0";

/// Flat string-to-string configuration, as handed over by a workload
/// harness.
#[derive(Debug, Clone, Default)]
pub struct Properties {
    entries: HashMap<String, String>,
}

impl Properties {
    /// Create an empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a property.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Builder-style variant of [`Properties::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Get a property value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Get a property value, falling back to `default` when absent.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Parse a property value, falling back to `default` when absent.
    ///
    /// An unparseable value is a configuration fault: init fails with the
    /// offending key and value named, before any operation runs.
    pub fn parse_or<T: FromStr>(&self, key: &str, default: &str) -> Result<T, Error> {
        let raw = self.get_or(key, default);
        raw.parse().map_err(|_| {
            Error::Config(format!("invalid value {raw:?} for property {key}"))
        })
    }
}

impl FromIterator<(String, String)> for Properties {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// Validated driver-level configuration.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Keyspace prefix for every row key.
    pub namespace: String,

    /// Inserts buffered before an atomic flush; 0 means direct per-call
    /// writes.
    pub batch_size: usize,
}

impl DriverConfig {
    /// Validate and extract the driver-level properties.
    pub fn from_properties(props: &Properties) -> Result<Self, Error> {
        let namespace = props.get_or(NAMESPACE_PROPERTY, NAMESPACE_DEFAULT).to_string();
        if namespace.is_empty() || namespace.contains([SEPARATOR, TERMINATOR]) {
            return Err(Error::Config(format!(
                "invalid value {namespace:?} for property {NAMESPACE_PROPERTY}"
            )));
        }

        let batch_size = props.parse_or(BATCH_SIZE_PROPERTY, BATCH_SIZE_DEFAULT)?;

        Ok(Self {
            namespace,
            batch_size,
        })
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            namespace: NAMESPACE_DEFAULT.to_string(),
            batch_size: 0,
        }
    }
}

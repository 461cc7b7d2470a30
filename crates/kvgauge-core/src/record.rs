//! Field map record type.

use std::collections::{BTreeMap, HashSet};

use crate::error::Error;
use rkyv::{Archive, Deserialize, Serialize};

/// One logical record: field name mapped to an opaque byte payload.
///
/// Backed by a `BTreeMap` so the encoded form is deterministic regardless of
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq, Archive, Serialize, Deserialize)]
pub struct FieldMap {
    fields: BTreeMap<String, Vec<u8>>,
}

impl FieldMap {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a field, replacing any existing payload.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Vec<u8>>) -> &mut Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    /// Get a field's payload.
    pub fn get(&self, field: &str) -> Option<&[u8]> {
        self.fields.get(field).map(Vec::as_slice)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterate fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_slice()))
    }

    /// Overlay `updates` onto this record.
    ///
    /// Supplied fields replace existing payloads; fields not named in
    /// `updates` are left untouched.
    pub fn merge(&mut self, updates: FieldMap) {
        self.fields.extend(updates.fields);
    }

    /// Project the record down to exactly the requested fields.
    ///
    /// Fails closed: `None` when any requested field is missing, so a caller
    /// never receives a record with a hole.
    pub fn project(&self, wanted: &HashSet<String>) -> Option<FieldMap> {
        let mut fields = BTreeMap::new();
        for name in wanted {
            let value = self.fields.get(name)?;
            fields.insert(name.clone(), value.clone());
        }
        Some(FieldMap { fields })
    }

    /// Serialize the record to bytes using rkyv.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        rkyv::to_bytes::<rkyv::rancor::Error>(self)
            .map(|v| v.to_vec())
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Deserialize a record from bytes using rkyv.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        rkyv::from_bytes::<Self, rkyv::rancor::Error>(bytes)
            .map_err(|e| Error::Deserialization(e.to_string()))
    }
}

impl FromIterator<(String, Vec<u8>)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (String, Vec<u8>)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

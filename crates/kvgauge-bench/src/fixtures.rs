//! Workload data generation.
//!
//! Generators are seeded for benchmark reproducibility: the same scale
//! always produces the same records.

use kvgauge_core::FieldMap;
use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Fields per generated record.
pub const FIELD_COUNT: usize = 10;

/// Payload bytes per field.
pub const FIELD_LENGTH: usize = 100;

const SEED: u64 = 12345;

/// Record key for the given index.
pub fn record_key(index: usize) -> String {
    format!("user{index}")
}

/// Generate one record with `FIELD_COUNT` fields of `FIELD_LENGTH` bytes.
pub fn generate_record(rng: &mut StdRng) -> FieldMap {
    let mut record = FieldMap::new();
    for field in 0..FIELD_COUNT {
        record.insert(format!("field{field}"), random_payload(rng, FIELD_LENGTH));
    }
    record
}

/// Generate `count` keyed records, deterministically.
pub fn generate_records(count: usize) -> Vec<(String, FieldMap)> {
    let mut rng = StdRng::seed_from_u64(SEED);
    (0..count)
        .map(|i| (record_key(i), generate_record(&mut rng)))
        .collect()
}

/// Random printable payload of the specified length.
fn random_payload(rng: &mut StdRng, len: usize) -> Vec<u8> {
    (0..len).map(|_| rng.sample(Alphanumeric)).collect()
}

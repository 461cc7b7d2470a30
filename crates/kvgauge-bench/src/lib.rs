//! kvgauge Benchmark Suite
//!
//! Criterion benchmarks for the driver contract over the reference
//! backends.
//!
//! # Benchmark Categories
//!
//! - **Workload**: insert (direct and batched), read, update throughput
//! - **Scan**: range scans of varying length
//!
//! Both categories run against the in-memory and sled backends so a backend
//! author can compare a new store against the references.

pub mod fixtures;
pub mod harness;

pub use fixtures::{generate_records, record_key, FIELD_COUNT, FIELD_LENGTH};
pub use harness::{BenchContext, TABLE};

//! kvgauge core - benchmark driver contract and reference stores.
//!
//! This crate defines the fixed benchmark surface (read, insert, update,
//! delete, scan) that a workload harness drives, the [`store::KeyValueStore`]
//! capability trait a storage backend plugs in through, and two reference
//! backends: an ordered in-memory store and a sled-backed store with atomic
//! multi-key batches.
//!
//! Every operation returns the tri-state [`Outcome`]; backend error types
//! never cross the driver boundary.

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

pub mod config;
pub mod driver;
pub mod error;
pub mod events;
pub mod factory;
pub mod outcome;
pub mod record;
pub mod rowkey;
pub mod store;

pub use config::{DriverConfig, Properties};
pub use driver::{Driver, StoreDriver};
pub use error::Error;
pub use events::{EventSink, Level, MemorySink, TracingSink};
pub use factory::open_driver;
pub use outcome::Outcome;
pub use record::FieldMap;
pub use store::{KeyValueStore, MemoryStore, SledStore, SledStoreConfig};

//! Backend selection from configuration.

use std::sync::Arc;

use crate::config::{DriverConfig, Properties};
use crate::driver::{Driver, StoreDriver};
use crate::error::Error;
use crate::events::EventSink;
use crate::store::{MemoryStore, SledStore, SledStoreConfig};

/// Property selecting the backend implementation.
pub const BACKEND_PROPERTY: &str = "store.backend";

/// Default backend.
pub const BACKEND_DEFAULT: &str = "memory";

/// Build a driver for the configured backend.
///
/// Fails fast on any invalid property; no operation is ever attempted on a
/// driver that did not initialize. Each call opens its own store handle;
/// workers that should share one handle construct [`StoreDriver`] instances
/// directly over a shared store.
pub fn open_driver(props: &Properties, events: Arc<dyn EventSink>) -> Result<Box<dyn Driver>, Error> {
    let config = DriverConfig::from_properties(props)?;

    match props.get_or(BACKEND_PROPERTY, BACKEND_DEFAULT) {
        "memory" => Ok(Box::new(StoreDriver::new(
            Arc::new(MemoryStore::new()),
            config,
            events,
        ))),
        "sled" => {
            let store = SledStore::open(SledStoreConfig::from_properties(props)?)?;
            Ok(Box::new(StoreDriver::new(Arc::new(store), config, events)))
        }
        other => Err(Error::Config(format!("unknown store backend {other:?}"))),
    }
}

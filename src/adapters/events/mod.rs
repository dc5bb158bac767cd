//! Event bus adapters.
//!
//! - `EventBus` - In-process fan-out with bounded per-subscriber queues

mod event_bus;

pub use event_bus::{EventBus, DEFAULT_SUBSCRIBER_CAPACITY};

//! Notification module - events fanned out to live client streams.

mod event;

pub use event::{Event, EventKind};

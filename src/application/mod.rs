//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers write and then notify; query handlers only read.

pub mod handlers;
pub mod notifier;

pub use handlers::*;
pub use notifier::Notifier;

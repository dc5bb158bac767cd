//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `events` - In-process event bus
//! - `http` - REST and SSE API
//! - `memory` - In-memory stores for tests and local runs
//! - `postgres` - PostgreSQL mail store
//! - `storage` - Local filesystem blob and document stores

pub mod events;
pub mod http;
pub mod memory;
pub mod postgres;
pub mod storage;

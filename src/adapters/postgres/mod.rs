//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresMailRepository` - Mail, chat, and attachment rows
//! - `PostgresSessionStore` - Session listing and transactional session deletion

mod mail_repository;
mod session_store;

pub use mail_repository::PostgresMailRepository;
pub use session_store::PostgresSessionStore;

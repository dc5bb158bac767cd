//! Session lifecycle handlers.

mod session_lifecycle;

pub use session_lifecycle::{orphan_sessions, SessionLifecycleManager};

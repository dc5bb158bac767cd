//! User query handlers.

mod get_user_summary;

pub use get_user_summary::{GetUserSummaryHandler, GetUserSummaryQuery};

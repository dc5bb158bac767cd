//! Domain layer containing business types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors)
//! - `mail` - Mail, chat, and attachment records
//! - `notification` - Live events fanned out to client streams

pub mod foundation;
pub mod mail;
pub mod notification;

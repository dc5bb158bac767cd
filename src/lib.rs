//! Raven - Session-scoped groupware backend
//!
//! Mail, direct chat and attachments partitioned by session, with live
//! notifications fanned out over an in-process event bus and whole-session
//! cleanup of rows and files.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

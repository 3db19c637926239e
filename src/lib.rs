//! Inbox Voice: Gmail messages rendered for reading aloud.

pub mod body;
pub mod config;
pub mod error;
pub mod gmail;
pub mod mailbox;
pub mod messages;
pub mod server;

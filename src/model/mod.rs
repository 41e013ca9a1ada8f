//! Core data model types: paths, content, message identifiers and messages.

pub mod address;
pub mod content;
pub mod message;
pub mod message_id;
pub mod path;

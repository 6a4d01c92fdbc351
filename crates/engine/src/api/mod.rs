//! API layer - the HTTP entry point the chat gateway posts messages to.

pub mod http;

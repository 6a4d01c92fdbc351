//! Fatebot Engine library.
//!
//! Interprets dot-prefixed chat commands for a Fate table and forwards them
//! to the game-tracking backend.
//!
//! ## Structure
//!
//! - `commands/` - Command metadata, argument parsing, pattern registry, dispatch
//! - `use_cases/` - Command handlers and entity targeting
//! - `stores/` - Per-user session state
//! - `presentation/` - Chat rendering
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `api/` - HTTP entry point for the chat gateway
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod commands;
pub mod infrastructure;
pub mod presentation;
pub mod stores;
pub mod use_cases;

/// Test fixtures shared by module tests.
#[cfg(test)]
pub(crate) mod test_fixtures;

pub use app::App;

//! In-memory state storage modules.
//!
//! Stores manage runtime state that the game backend does not own:
//! - `SessionStore` - per-user claims, last roll, pending invocation

pub mod session;

pub use session::{Claim, PendingInvocation, SessionStore, UserSession};

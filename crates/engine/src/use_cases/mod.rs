//! Use cases - command handlers.
//!
//! Each module holds the handlers for one area of table play. Handlers talk
//! to the backend through `Services` and render through the presentation
//! layer; none of them touch transport concerns.

pub mod admin;
pub mod aspects;
pub mod backend_command;
pub mod claims;
pub mod entities;
pub mod fate_points;
pub mod help;
pub mod rolling;
pub mod stress;
pub mod targeting;
pub mod turn_order;

//! Command interpretation: metadata, argument parsing, the pattern registry
//! and the dispatcher that ties them to handlers.

pub mod args;
pub mod catalog;
pub mod definition;
pub mod dispatch;
pub mod error;
pub mod handler;
pub mod registry;

pub use args::{ArgParser, ArgumentError, CommandArgs, Params};
pub use definition::{CommandSpec, Group, HandlerId, TargetMode};
pub use dispatch::Dispatcher;
pub use error::CommandError;
pub use handler::{CommandContext, CommandHandler};
pub use registry::{Handler, ParseOutcome, ParsedInvocation, PatternTable, RegistryError};

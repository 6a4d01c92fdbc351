//! Errors raised while handling a command.
//!
//! Every variant becomes a chat reply at the dispatch boundary; none of them
//! stop the bot.

use fatebot_domain::DomainError;
use fatebot_shared::Reply;

use crate::commands::args::ArgumentError;
use crate::infrastructure::ports::BackendError;

pub const BACKEND_UNREACHABLE: &str =
    "Could not reach the game server, please try again in a moment.";

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("There is no entity named {0}")]
    UnknownEntity(String),
    #[error("There is already an entity named {0}")]
    EntityExists(String),
    #[error(transparent)]
    Backend(#[from] BackendError),
    #[error(transparent)]
    InvalidArguments(#[from] ArgumentError),
    #[error("You don't have permission to do this, please ask a {0}")]
    PermissionDenied(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CommandError {
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Text shown in chat. Transport details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            CommandError::Backend(BackendError::Rejected(description)) => description.clone(),
            CommandError::Backend(_) => BACKEND_UNREACHABLE.to_string(),
            CommandError::Internal(_) => "Something went wrong handling that command.".to_string(),
            other => other.to_string(),
        }
    }

    pub fn to_reply(&self) -> Reply {
        Reply::text(self.user_message())
    }
}

impl From<DomainError> for CommandError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::UnknownEntity(name) => CommandError::UnknownEntity(name),
            other => CommandError::InvalidArguments(ArgumentError::Invalid(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_is_shown_verbatim() {
        let error = CommandError::from(BackendError::Rejected("Weft has no fate points".into()));
        assert_eq!(error.user_message(), "Weft has no fate points");
    }

    #[test]
    fn test_transport_failures_are_generic() {
        for error in [
            BackendError::Timeout,
            BackendError::Unavailable("connection refused".into()),
            BackendError::Status(502),
            BackendError::InvalidResponse("eof".into()),
        ] {
            assert_eq!(CommandError::from(error).user_message(), BACKEND_UNREACHABLE);
        }
    }

    #[test]
    fn test_domain_unknown_entity_maps_through() {
        let error = CommandError::from(DomainError::unknown_entity("Shuttle"));
        assert_eq!(error.user_message(), "There is no entity named Shuttle");
    }

    #[test]
    fn test_permission_denied_names_role() {
        let error = CommandError::PermissionDenied("bot_admins".into());
        assert_eq!(
            error.user_message(),
            "You don't have permission to do this, please ask a bot_admins"
        );
    }
}

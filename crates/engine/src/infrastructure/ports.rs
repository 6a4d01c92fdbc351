//! Port traits for infrastructure boundaries.
//!
//! Ports exist for:
//! - The game-tracking backend (could swap HTTP -> in-process)
//! - Randomness (for testing dice rolls)

use async_trait::async_trait;
use fatebot_shared::{CommandPayload, CommandRequest, GameSnapshot};

// =============================================================================
// Error Types
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// The backend understood the command and refused it. The text is the
    /// backend's own description and is shown to users verbatim.
    #[error("{0}")]
    Rejected(String),
    #[error("Game server unavailable: {0}")]
    Unavailable(String),
    #[error("Game server timed out")]
    Timeout,
    #[error("Invalid response from game server: {0}")]
    InvalidResponse(String),
    #[error("Game server returned HTTP {0}")]
    Status(u16),
}

impl BackendError {
    /// Transient failures worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            BackendError::Unavailable(_) | BackendError::Timeout => true,
            // Malformed bodies are usually a truncated transfer
            BackendError::InvalidResponse(_) => true,
            BackendError::Status(code) => *code >= 500 || *code == 429,
            BackendError::Rejected(_) => false,
        }
    }
}

// =============================================================================
// Backend Port
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BackendPort: Send + Sync {
    /// `GET /game`. A backend with no game loaded yields an empty snapshot.
    async fn game(&self) -> Result<GameSnapshot, BackendError>;

    /// `POST /commands`. Nested result envelopes are already unwrapped.
    async fn command(&self, request: CommandRequest) -> Result<CommandPayload, BackendError>;
}

// =============================================================================
// Testability Ports
// =============================================================================

#[cfg_attr(test, mockall::automock)]
pub trait RandomPort: Send + Sync {
    /// Uniform integer in `min..=max`.
    fn gen_range(&self, min: i32, max: i32) -> i32;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejections_are_not_retried() {
        assert!(!BackendError::Rejected("no".into()).is_retryable());
        assert!(!BackendError::Status(404).is_retryable());
    }

    #[test]
    fn test_transport_failures_are_retried() {
        assert!(BackendError::Timeout.is_retryable());
        assert!(BackendError::Unavailable("refused".into()).is_retryable());
        assert!(BackendError::Status(503).is_retryable());
        assert!(BackendError::Status(429).is_retryable());
    }
}

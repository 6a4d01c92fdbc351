//! The handler seam every command goes through.

use async_trait::async_trait;

use fatebot_shared::{ChatMessage, Reply};

use crate::app::Services;
use crate::commands::args::CommandArgs;
use crate::commands::error::CommandError;
use crate::commands::registry::PatternTable;
use crate::infrastructure::correlation::CorrelationId;

/// Everything a handler may touch while serving one message.
pub struct CommandContext<'a> {
    pub message: &'a ChatMessage,
    pub services: &'a Services,
    /// For handlers that re-enter the registry (`target`, `help`)
    pub registry: &'a PatternTable,
    pub correlation_id: CorrelationId,
}

impl CommandContext<'_> {
    /// Session key of the author.
    pub fn author(&self) -> &str {
        &self.message.author_display_name
    }
}

#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(
        &self,
        ctx: &CommandContext<'_>,
        args: CommandArgs,
    ) -> Result<Vec<Reply>, CommandError>;
}

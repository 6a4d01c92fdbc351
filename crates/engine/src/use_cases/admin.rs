//! Operator commands: version, state dump and shutdown.

use async_trait::async_trait;

use fatebot_shared::Reply;

use crate::commands::args::CommandArgs;
use crate::commands::error::CommandError;
use crate::commands::handler::{CommandContext, CommandHandler};

pub const POWERING_DOWN: &str = "Powering down.";

pub struct Version;

#[async_trait]
impl CommandHandler for Version {
    async fn handle(
        &self,
        ctx: &CommandContext<'_>,
        _args: CommandArgs,
    ) -> Result<Vec<Reply>, CommandError> {
        let settings = &ctx.services.settings;
        let mut lines = vec![format!("fatebot {}", env!("CARGO_PKG_VERSION"))];
        if let Some(revision) = &settings.revision {
            lines.push(format!("Revision: {}", revision));
        }
        lines.push(format!("Settings: {}", settings.fingerprint()));
        lines.push(format!("Host: {}", settings.host_label));
        lines.push(format!(
            "Up since: {}",
            ctx.services.started_at.format("%Y-%m-%d %H:%M:%S UTC")
        ));
        Ok(vec![Reply::text(lines.join("\n"))])
    }
}

/// Reply with the raw game state as a JSON attachment.
pub struct Dump;

#[async_trait]
impl CommandHandler for Dump {
    async fn handle(
        &self,
        ctx: &CommandContext<'_>,
        _args: CommandArgs,
    ) -> Result<Vec<Reply>, CommandError> {
        let snapshot = ctx.services.backend.game().await?;
        let content = serde_json::to_value(&snapshot)
            .map_err(|e| CommandError::internal(format!("Failed to serialize game: {}", e)))?;
        tracing::info!(
            author = %ctx.author(),
            entities = snapshot.entities.len(),
            "Game state dumped"
        );
        Ok(vec![Reply::text(format!(
            "Game state: {} entities.",
            snapshot.entities.len()
        ))
        .with_attachment("game.json", content)])
    }
}

/// Shut the bot down. Only holders of the admin role may.
pub struct Stop;

#[async_trait]
impl CommandHandler for Stop {
    async fn handle(
        &self,
        ctx: &CommandContext<'_>,
        _args: CommandArgs,
    ) -> Result<Vec<Reply>, CommandError> {
        let role = &ctx.services.settings.admin_role;
        if !ctx.message.has_role(role) {
            return Err(CommandError::PermissionDenied(role.clone()));
        }
        tracing::warn!(author = %ctx.author(), "Shutdown requested");
        ctx.services.shutdown.cancel();
        Ok(vec![Reply::text(POWERING_DOWN)])
    }
}

//! Entity lookups and lifecycle.

use async_trait::async_trait;

use fatebot_domain::EntityRoster;
use fatebot_shared::{CommandRequest, Reply};

use crate::commands::args::{CommandArgs, Params};
use crate::commands::error::CommandError;
use crate::commands::handler::{CommandContext, CommandHandler};
use crate::presentation::ResponseFormatter;
use crate::use_cases::backend_command::send_command;
use crate::use_cases::targeting::{ResolvedTarget, TargetedHandler};

pub const NO_ENTITIES: &str = "No entities yet. Create one with `.create <name>`.";

/// `info`: full sheet for each target.
pub struct ShowInfo;

#[async_trait]
impl TargetedHandler for ShowInfo {
    async fn handle_target(
        &self,
        ctx: &CommandContext<'_>,
        _args: &CommandArgs,
        target: &ResolvedTarget,
    ) -> Result<Vec<Reply>, CommandError> {
        let view = target.require_view()?;
        let claimant = ctx.services.sessions.claimant_of(&view.name);
        Ok(vec![Reply::text(ResponseFormatter::entity_card(
            view,
            claimant.as_ref(),
        ))])
    }
}

/// `summary`: one line per entity.
pub struct Summary;

#[async_trait]
impl CommandHandler for Summary {
    async fn handle(
        &self,
        ctx: &CommandContext<'_>,
        _args: CommandArgs,
    ) -> Result<Vec<Reply>, CommandError> {
        let snapshot = ctx.services.backend.game().await?;
        if snapshot.entities.is_empty() {
            return Ok(vec![Reply::text(NO_ENTITIES)]);
        }
        let lines: Vec<String> = snapshot
            .entities
            .values()
            .map(ResponseFormatter::entity_summary)
            .collect();
        Ok(vec![Reply::text(lines.join("\n"))])
    }
}

pub struct ListEntities;

#[async_trait]
impl CommandHandler for ListEntities {
    async fn handle(
        &self,
        ctx: &CommandContext<'_>,
        _args: CommandArgs,
    ) -> Result<Vec<Reply>, CommandError> {
        let snapshot = ctx.services.backend.game().await?;
        let claims = ctx.services.sessions.claims();
        Ok(vec![Reply::text(ResponseFormatter::roster(&snapshot, &claims))])
    }
}

pub struct CreateEntity;

#[async_trait]
impl CommandHandler for CreateEntity {
    async fn handle(
        &self,
        ctx: &CommandContext<'_>,
        args: CommandArgs,
    ) -> Result<Vec<Reply>, CommandError> {
        let Params::NewEntity {
            name,
            fate,
            refresh,
        } = args.params
        else {
            return Err(CommandError::internal("create_entity expects a new entity"));
        };
        let snapshot = ctx.services.backend.game().await?;
        let roster = EntityRoster::new(snapshot.entities.keys().cloned());
        if let Some(existing) = roster.lookup(&name) {
            return Err(CommandError::EntityExists(existing.to_string()));
        }

        let request = CommandRequest::new("create_entity")
            .entity(name)
            .optional_field("fate", fate)
            .optional_field("refresh", refresh);
        send_command(ctx, request).await
    }
}

pub struct EditEntity;

#[async_trait]
impl TargetedHandler for EditEntity {
    async fn handle_target(
        &self,
        ctx: &CommandContext<'_>,
        args: &CommandArgs,
        target: &ResolvedTarget,
    ) -> Result<Vec<Reply>, CommandError> {
        let Params::Edit { field, value } = &args.params else {
            return Err(CommandError::internal("edit_entity expects a field and value"));
        };
        let request = CommandRequest::new("edit_entity")
            .entity(&target.name)
            .field("field", field)
            .field("value", value);
        send_command(ctx, request).await
    }
}

/// Remove an entity; whoever played it loses the claim.
pub struct RemoveEntity;

#[async_trait]
impl TargetedHandler for RemoveEntity {
    async fn handle_target(
        &self,
        ctx: &CommandContext<'_>,
        _args: &CommandArgs,
        target: &ResolvedTarget,
    ) -> Result<Vec<Reply>, CommandError> {
        let replies =
            send_command(ctx, CommandRequest::new("remove_entity").entity(&target.name)).await?;
        if let Some((user, _)) = ctx.services.sessions.claimant_of(&target.name) {
            ctx.services.sessions.unclaim(&user);
            tracing::info!(user = %user, entity = %target.name, "Claim dropped with entity");
        }
        Ok(replies)
    }
}

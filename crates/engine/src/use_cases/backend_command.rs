//! Sending one command to the backend and rendering what came back.

use fatebot_shared::{CommandPayload, CommandRequest, Reply};

use crate::commands::error::CommandError;
use crate::commands::handler::CommandContext;
use crate::presentation::ResponseFormatter;

pub async fn send_command(
    ctx: &CommandContext<'_>,
    request: CommandRequest,
) -> Result<Vec<Reply>, CommandError> {
    let command = request.command.clone();
    let payload = ctx.services.backend.command(request).await?;
    tracing::debug!(command = %command, "Backend accepted command");

    let current_claim = match &payload {
        CommandPayload::Order(order) => order
            .current_entity()
            .and_then(|name| ctx.services.sessions.claimant_of(name))
            .map(|(_, claim)| claim),
        _ => None,
    };

    Ok(vec![Reply::text(ResponseFormatter::command_result(
        &payload,
        current_claim.as_ref(),
    ))])
}

//! Fate point spending, awarding and refreshing.

use async_trait::async_trait;

use fatebot_shared::{CommandRequest, Reply};

use crate::commands::args::{CommandArgs, Params};
use crate::commands::error::CommandError;
use crate::commands::handler::CommandContext;
use crate::use_cases::backend_command::send_command;
use crate::use_cases::targeting::{ResolvedTarget, TargetedHandler};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatePointChange {
    Increment,
    Decrement,
    /// Reset to the entity's refresh value
    Refresh,
}

impl FatePointChange {
    pub fn command(&self) -> &'static str {
        match self {
            FatePointChange::Increment => "increment_fp",
            FatePointChange::Decrement => "decrement_fp",
            FatePointChange::Refresh => "refresh_fp",
        }
    }
}

pub struct AdjustFatePoints {
    change: FatePointChange,
}

impl AdjustFatePoints {
    pub fn new(change: FatePointChange) -> Self {
        Self { change }
    }
}

#[async_trait]
impl TargetedHandler for AdjustFatePoints {
    async fn handle_target(
        &self,
        ctx: &CommandContext<'_>,
        args: &CommandArgs,
        target: &ResolvedTarget,
    ) -> Result<Vec<Reply>, CommandError> {
        let request = CommandRequest::new(self.change.command()).entity(&target.name);
        let request = match (self.change, &args.params) {
            (FatePointChange::Refresh, _) => request,
            (_, Params::Amount(amount)) => request.field("amount", amount),
            (_, other) => {
                return Err(CommandError::internal(format!(
                    "fate point change got {:?}",
                    other
                )))
            }
        };
        send_command(ctx, request).await
    }
}

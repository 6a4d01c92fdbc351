//! Stress tracks.
//!
//! Boxes are numbered from 1 in chat and forwarded as typed; the backend
//! reports checked boxes as zero-based indices.

use async_trait::async_trait;

use fatebot_shared::{CommandRequest, EntityView, Reply};

use crate::commands::args::{CommandArgs, Params};
use crate::commands::error::CommandError;
use crate::commands::handler::{CommandContext, CommandHandler};
use crate::use_cases::backend_command::send_command;
use crate::use_cases::targeting::{ResolvedTarget, TargetedHandler};

/// Expand a track abbreviation against the entity's tracks.
///
/// An exact (case-insensitive) name wins, then a unique prefix. Anything
/// else is passed through for the backend to judge.
pub fn expand_track(abbrev: &str, view: Option<&EntityView>) -> String {
    let abbrev = abbrev.trim();
    let Some(view) = view else {
        return abbrev.to_string();
    };

    if let Some(exact) = view
        .stress
        .keys()
        .find(|track| track.eq_ignore_ascii_case(abbrev))
    {
        return exact.clone();
    }

    let folded = abbrev.to_lowercase();
    let mut prefixed = view
        .stress
        .keys()
        .filter(|track| track.to_lowercase().starts_with(&folded));
    match (prefixed.next(), prefixed.next()) {
        (Some(only), None) => only.clone(),
        _ => abbrev.to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StressOp {
    Check,
    /// Soak shifts into the first box that can take them
    Absorb,
    Uncheck,
}

impl StressOp {
    fn command(&self) -> &'static str {
        match self {
            StressOp::Check => "check_stress",
            StressOp::Absorb => "absorb_stress",
            StressOp::Uncheck => "uncheck_stress",
        }
    }

    fn field(&self) -> &'static str {
        match self {
            StressOp::Absorb => "shifts",
            StressOp::Check | StressOp::Uncheck => "box",
        }
    }
}

pub struct StressBoxes {
    op: StressOp,
}

impl StressBoxes {
    pub fn new(op: StressOp) -> Self {
        Self { op }
    }
}

#[async_trait]
impl TargetedHandler for StressBoxes {
    async fn handle_target(
        &self,
        ctx: &CommandContext<'_>,
        args: &CommandArgs,
        target: &ResolvedTarget,
    ) -> Result<Vec<Reply>, CommandError> {
        let Params::Stress { track, amount } = &args.params else {
            return Err(CommandError::internal(format!(
                "{} got {:?}",
                self.op.command(),
                args.params
            )));
        };
        let request = CommandRequest::new(self.op.command())
            .entity(&target.name)
            .field("track", expand_track(track, target.view.as_ref()))
            .field(self.op.field(), amount);
        send_command(ctx, request).await
    }
}

/// Clear one entity's stress, optionally a single track.
pub struct ClearStress;

#[async_trait]
impl TargetedHandler for ClearStress {
    async fn handle_target(
        &self,
        ctx: &CommandContext<'_>,
        args: &CommandArgs,
        target: &ResolvedTarget,
    ) -> Result<Vec<Reply>, CommandError> {
        let Params::Track(track) = &args.params else {
            return Err(CommandError::internal("clear_stress expects a track"));
        };
        let track = track
            .as_deref()
            .map(|track| expand_track(track, target.view.as_ref()));
        let request = CommandRequest::new("clear_stress")
            .entity(&target.name)
            .optional_field("track", track);
        send_command(ctx, request).await
    }
}

pub struct ClearAllStress;

#[async_trait]
impl CommandHandler for ClearAllStress {
    async fn handle(
        &self,
        ctx: &CommandContext<'_>,
        _args: CommandArgs,
    ) -> Result<Vec<Reply>, CommandError> {
        send_command(ctx, CommandRequest::new("clear_all_stress")).await
    }
}

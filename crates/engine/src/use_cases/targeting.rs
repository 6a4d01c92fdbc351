//! Entity targeting.
//!
//! A targeted command runs once per entity it resolves to. Candidates come
//! from the first non-empty source, in this order:
//!
//! 1. `@ Name` markers in the message, then users the platform reports as
//!    mentioned (each mapped to the character they claimed, if any)
//! 2. the author's claimed character
//! 3. a parenthetical in the author's display name, as in `Ann (Weft)`
//!
//! When nothing resolves, the invocation is parked on the author's session
//! and `.target <name>` replays it.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex_lite::Regex;

use fatebot_domain::EntityRoster;
use fatebot_shared::{ChatMessage, EntityView, GameSnapshot, Reply};

use crate::commands::args::{CommandArgs, Params};
use crate::commands::definition::HandlerId;
use crate::commands::error::CommandError;
use crate::commands::handler::{CommandContext, CommandHandler};
use crate::stores::{PendingInvocation, SessionStore};

static MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)@\s*([^\s@<>]+)").expect("valid regex"));
/// Platform mention tokens such as `<@1234>` or `<@!1234>`
static MENTION_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<@[!&]?[^>\s]*>").expect("valid regex"));
static PARENTHETICAL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(([^()]+)\)").expect("valid regex"));

pub const NO_TARGET_NOTICE: &str =
    "Who is that for? Answer with `.target <name>`, or add `@ <name>` to the command.";
pub const NOTHING_PENDING: &str = "Nothing is waiting for a target.";

/// `@ Name` markers, left to right.
pub fn markers(text: &str) -> Vec<String> {
    MARKER_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().to_string()))
        .collect()
}

/// The command text with markers and mention tokens removed, so argument
/// patterns only see arguments.
pub fn strip_markers(text: &str) -> String {
    let without_markers = MARKER_RE.replace_all(text, " ");
    let without_mentions = MENTION_TOKEN_RE.replace_all(&without_markers, " ");
    without_mentions.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// The command text with each marker reduced to its bare name, so
/// `.claim @ Weft` reads as `.claim Weft`.
pub fn unmark(text: &str) -> String {
    let unmarked = MARKER_RE.replace_all(text, " ${1}");
    let without_mentions = MENTION_TOKEN_RE.replace_all(&unmarked, " ");
    without_mentions.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn parenthetical(display_name: &str) -> Option<String> {
    PARENTHETICAL_RE
        .captures_iter(display_name)
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().trim().to_string()))
        .filter(|name| !name.is_empty())
        .last()
}

pub struct EntityResolver;

impl EntityResolver {
    /// Raw candidate names for a message, before canonicalization.
    pub fn candidates(message: &ChatMessage, sessions: &SessionStore) -> Vec<String> {
        let mut explicit = markers(&message.text);
        explicit.extend(message.explicit_mentions.iter().map(|mentioned| {
            sessions
                .claimed(&mentioned.display_name)
                .map(|claim| claim.entity)
                .unwrap_or_else(|| mentioned.display_name.clone())
        }));
        if !explicit.is_empty() {
            return explicit;
        }

        if let Some(claim) = sessions.claimed(&message.author_display_name) {
            return vec![claim.entity];
        }

        parenthetical(&message.author_display_name)
            .into_iter()
            .collect()
    }

    /// Canonical names, first occurrence kept.
    pub fn resolve(candidates: &[String], roster: &EntityRoster) -> Vec<String> {
        let mut resolved: Vec<String> = Vec::new();
        for candidate in candidates {
            let name = roster.canonicalize(candidate);
            if name.is_empty() || resolved.iter().any(|seen| seen.eq_ignore_ascii_case(&name)) {
                continue;
            }
            resolved.push(name);
        }
        resolved
    }
}

/// One entity a targeted handler runs against.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedTarget {
    pub name: String,
    /// The entity as of this invocation's snapshot; `None` when unknown
    pub view: Option<EntityView>,
}

impl ResolvedTarget {
    fn from_snapshot(name: String, snapshot: &GameSnapshot) -> Self {
        let view = snapshot.entity(&name).cloned();
        Self { name, view }
    }

    pub fn require_view(&self) -> Result<&EntityView, CommandError> {
        self.view
            .as_ref()
            .ok_or_else(|| CommandError::UnknownEntity(self.name.clone()))
    }
}

#[async_trait]
pub trait TargetedHandler: Send + Sync {
    async fn handle_target(
        &self,
        ctx: &CommandContext<'_>,
        args: &CommandArgs,
        target: &ResolvedTarget,
    ) -> Result<Vec<Reply>, CommandError>;
}

/// Targeting middleware, composed around a `TargetedHandler` at registration.
pub struct Targeted {
    handler: HandlerId,
    inner: Arc<dyn TargetedHandler>,
}

impl Targeted {
    pub fn new(handler: HandlerId, inner: Arc<dyn TargetedHandler>) -> Self {
        Self { handler, inner }
    }
}

#[async_trait]
impl CommandHandler for Targeted {
    async fn handle(
        &self,
        ctx: &CommandContext<'_>,
        args: CommandArgs,
    ) -> Result<Vec<Reply>, CommandError> {
        let snapshot = ctx.services.backend.game().await?;
        let roster = EntityRoster::new(snapshot.entities.keys().cloned());

        if let Some(explicit) = args.target.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let target = ResolvedTarget::from_snapshot(roster.canonicalize(explicit), &snapshot);
            return self.inner.handle_target(ctx, &args, &target).await;
        }

        let candidates = EntityResolver::candidates(ctx.message, &ctx.services.sessions);
        let names = EntityResolver::resolve(&candidates, &roster);

        if names.is_empty() {
            tracing::info!(
                handler = %self.handler,
                author = %ctx.author(),
                "No target resolved, parking invocation"
            );
            ctx.services.sessions.set_pending(
                ctx.author(),
                PendingInvocation {
                    handler: self.handler,
                    args,
                },
            );
            return Ok(vec![Reply::text(NO_TARGET_NOTICE)]);
        }

        tracing::debug!(handler = %self.handler, targets = ?names, "Fanning out");
        let mut replies = Vec::new();
        for name in names {
            let target = ResolvedTarget::from_snapshot(name, &snapshot);
            match self.inner.handle_target(ctx, &args, &target).await {
                Ok(mut handled) => replies.append(&mut handled),
                Err(error) => {
                    tracing::warn!(
                        handler = %self.handler,
                        target = %target.name,
                        error = %error,
                        "Targeted invocation failed"
                    );
                    replies.push(error.to_reply());
                }
            }
        }
        Ok(replies)
    }
}

/// `target <name>`: replay the author's parked invocation against `name`.
///
/// The slot is cleared only when the replay succeeds, so a typo can be
/// corrected with another `.target`.
pub struct RetargetPending;

#[async_trait]
impl CommandHandler for RetargetPending {
    async fn handle(
        &self,
        ctx: &CommandContext<'_>,
        args: CommandArgs,
    ) -> Result<Vec<Reply>, CommandError> {
        let Params::Name(name) = args.params else {
            return Err(CommandError::internal("target expects a name"));
        };
        let Some(pending) = ctx.services.sessions.pending(ctx.author()) else {
            return Ok(vec![Reply::text(NOTHING_PENDING)]);
        };

        tracing::info!(handler = %pending.handler, target = %name, "Replaying pending invocation");
        let replies = ctx
            .registry
            .invoke(pending.handler, ctx, pending.args.with_target(name))
            .await?;
        ctx.services.sessions.clear_pending(ctx.author());
        Ok(replies)
    }
}

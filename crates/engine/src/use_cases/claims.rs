//! Claiming a character to play.

use async_trait::async_trait;

use fatebot_domain::EntityRoster;
use fatebot_shared::Reply;

use crate::commands::args::{CommandArgs, Params};
use crate::commands::error::CommandError;
use crate::commands::handler::{CommandContext, CommandHandler};
use crate::presentation::ResponseFormatter;

/// `claim <name>`: the name must exist; no backend command is sent.
pub struct ClaimEntity;

#[async_trait]
impl CommandHandler for ClaimEntity {
    async fn handle(
        &self,
        ctx: &CommandContext<'_>,
        args: CommandArgs,
    ) -> Result<Vec<Reply>, CommandError> {
        let Params::Name(name) = args.params else {
            return Err(CommandError::internal("claim expects a name"));
        };
        let snapshot = ctx.services.backend.game().await?;
        let roster = EntityRoster::new(snapshot.entities.keys().cloned());
        let entity = roster.require(&name)?;

        ctx.services
            .sessions
            .claim(ctx.author(), entity.clone(), &ctx.message.author_mention);
        tracing::info!(author = %ctx.author(), entity = %entity, "Entity claimed");
        Ok(vec![Reply::text(format!(
            "{} is now playing {}.",
            ctx.author(),
            entity
        ))])
    }
}

pub struct Unclaim;

#[async_trait]
impl CommandHandler for Unclaim {
    async fn handle(
        &self,
        ctx: &CommandContext<'_>,
        _args: CommandArgs,
    ) -> Result<Vec<Reply>, CommandError> {
        let text = match ctx.services.sessions.unclaim(ctx.author()) {
            Some(claim) => format!("{} is no longer playing {}.", ctx.author(), claim.entity),
            None => format!("{} is not playing any character.", ctx.author()),
        };
        Ok(vec![Reply::text(text)])
    }
}

pub struct ListClaims;

#[async_trait]
impl CommandHandler for ListClaims {
    async fn handle(
        &self,
        ctx: &CommandContext<'_>,
        _args: CommandArgs,
    ) -> Result<Vec<Reply>, CommandError> {
        let claims = ctx.services.sessions.claims();
        Ok(vec![Reply::text(ResponseFormatter::claims(&claims))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::App;
    use crate::infrastructure::ports::MockBackendPort;
    use crate::test_fixtures::{entity, message, services, snapshot};

    fn app() -> App {
        let mut backend = MockBackendPort::new();
        backend
            .expect_game()
            .returning(|| Ok(snapshot(&[entity("Weft", 3, 3), entity("Warp", 1, 2)])));
        backend.expect_command().never();
        App::new(services(backend)).unwrap()
    }

    #[tokio::test]
    async fn test_claim_stores_canonical_name_and_mention() {
        let app = app();

        let replies = app.dispatcher.dispatch(&message("Ann", ".claim WEFT")).await;

        assert_eq!(replies[0].text, "Ann is now playing Weft.");
        let claim = app.services.sessions.claimed("Ann").unwrap();
        assert_eq!(claim.entity, "Weft");
        assert_eq!(claim.mention, "<@ann>");
    }

    #[tokio::test]
    async fn test_claim_accepts_a_marker() {
        let app = app();

        let replies = app.dispatcher.dispatch(&message("Ann", ".claim @ Warp")).await;

        assert_eq!(replies[0].text, "Ann is now playing Warp.");
        assert_eq!(app.services.sessions.claimed("Ann").unwrap().entity, "Warp");
    }

    #[tokio::test]
    async fn test_claim_unknown_entity() {
        let app = app();

        let replies = app.dispatcher.dispatch(&message("Ann", ".assume Shuttle")).await;

        assert_eq!(replies[0].text, "There is no entity named Shuttle");
        assert!(app.services.sessions.claimed("Ann").is_none());
    }

    #[tokio::test]
    async fn test_unclaim() {
        let app = app();
        app.services.sessions.claim("Ann", "Weft", "<@ann>");

        let first = app.dispatcher.dispatch(&message("Ann", ".unclaim")).await;
        let second = app.dispatcher.dispatch(&message("Ann", ".unassume")).await;

        assert_eq!(first[0].text, "Ann is no longer playing Weft.");
        assert_eq!(second[0].text, "Ann is not playing any character.");
    }

    #[tokio::test]
    async fn test_claimed_lists_mentions() {
        let app = app();
        app.services.sessions.claim("Ann", "Weft", "<@ann>");
        app.services.sessions.claim("Bob", "Warp", "<@bob>");

        let replies = app.dispatcher.dispatch(&message("Cid", ".claims")).await;

        assert_eq!(replies[0].text, "<@ann> plays Weft\n<@bob> plays Warp");
    }
}

//! Fate dice rolls and amendments.

use async_trait::async_trait;

use fatebot_domain::{parse_bonuses, Bonus, DomainError, FateRoll};
use fatebot_shared::Reply;

use crate::commands::args::{CommandArgs, Params};
use crate::commands::error::CommandError;
use crate::commands::handler::{CommandContext, CommandHandler};
use crate::presentation::ResponseFormatter;

pub const NOTHING_TO_AMEND: &str = "You haven't rolled yet.";

fn bonuses(args: &CommandArgs) -> Result<Vec<Bonus>, CommandError> {
    match &args.params {
        Params::Text(Some(text)) => Ok(parse_bonuses(text).map_err(DomainError::from)?),
        Params::Text(None) => Ok(Vec::new()),
        other => Err(CommandError::internal(format!("roll got {:?}", other))),
    }
}

pub struct Roll;

#[async_trait]
impl CommandHandler for Roll {
    async fn handle(
        &self,
        ctx: &CommandContext<'_>,
        args: CommandArgs,
    ) -> Result<Vec<Reply>, CommandError> {
        let bonuses = bonuses(&args)?;
        let random = &ctx.services.random;
        let roll = FateRoll::roll(|| random.gen_range(-1, 1), bonuses);
        tracing::debug!(author = %ctx.author(), total = roll.running_total(), "Rolled");

        let text = ResponseFormatter::roll(ctx.author(), &roll);
        ctx.services.sessions.set_last_roll(ctx.author(), roll);
        Ok(vec![Reply::text(text)])
    }
}

/// Add bonuses to the author's last roll. Amendments accumulate.
pub struct Amend;

#[async_trait]
impl CommandHandler for Amend {
    async fn handle(
        &self,
        ctx: &CommandContext<'_>,
        args: CommandArgs,
    ) -> Result<Vec<Reply>, CommandError> {
        let Some(mut roll) = ctx.services.sessions.last_roll(ctx.author()) else {
            return Ok(vec![Reply::text(NOTHING_TO_AMEND)]);
        };
        roll.amend(bonuses(&args)?).map_err(DomainError::from)?;

        let text = ResponseFormatter::amended(ctx.author(), &roll);
        ctx.services.sessions.set_last_roll(ctx.author(), roll);
        Ok(vec![Reply::text(text)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::App;
    use crate::infrastructure::ports::{MockBackendPort, MockRandomPort};
    use crate::test_fixtures::{message, services_with};

    fn app_with_faces(faces: Vec<i32>) -> App {
        let mut random = MockRandomPort::new();
        let count = faces.len();
        let mut faces = faces.into_iter();
        random
            .expect_gen_range()
            .withf(|min, max| *min == -1 && *max == 1)
            .times(count)
            .returning(move |_, _| faces.next().unwrap_or(0));
        App::new(services_with(MockBackendPort::new(), random)).unwrap()
    }

    #[tokio::test]
    async fn test_roll_with_bonuses() {
        let app = app_with_faces(vec![1, 1, 0, -1]);

        let replies = app
            .dispatcher
            .dispatch(&message("Ann", ".roll +2 athletics -1 wounded"))
            .await;

        assert_eq!(replies[0].text, "Ann rolled [+][+][ ][-] 1 +2 -1 = 2 (Fair)");
    }

    #[tokio::test]
    async fn test_amendments_accumulate() {
        let app = app_with_faces(vec![1, -1, 1, 0]);
        let base = 1;

        app.dispatcher.dispatch(&message("Ann", ".r")).await;
        app.dispatcher.dispatch(&message("Ann", ".amend +2")).await;
        let replies = app.dispatcher.dispatch(&message("Ann", ".am -1")).await;

        let roll = app.services.sessions.last_roll("Ann").unwrap();
        assert_eq!(roll.running_total(), base + 1);
        assert_eq!(roll.bonuses(), &[Bonus::new(2), Bonus::new(-1)]);
        assert_eq!(
            replies[0].text,
            "Ann amended their roll: [+][-][+][ ] 1 +2 -1 = 2 (Fair)"
        );
    }

    #[tokio::test]
    async fn test_amend_without_roll() {
        let app = app_with_faces(Vec::new());
        let replies = app.dispatcher.dispatch(&message("Ann", ".amend +1")).await;
        assert_eq!(replies[0].text, NOTHING_TO_AMEND);
    }

    #[tokio::test]
    async fn test_roll_with_oversized_bonus_is_refused() {
        let app = app_with_faces(Vec::new());

        let replies = app
            .dispatcher
            .dispatch(&message("Ann", ".roll +2147483647 +1"))
            .await;

        assert_eq!(replies.len(), 1);
        assert!(replies[0].text.contains("+2147483647"), "{}", replies[0].text);
        assert!(app.services.sessions.last_roll("Ann").is_none());
    }

    #[tokio::test]
    async fn test_amend_past_the_bonus_cap_keeps_the_last_roll() {
        let app = app_with_faces(vec![0, 0, 0, 0]);

        app.dispatcher.dispatch(&message("Ann", ".roll +99 +99 +99 +99 +99")).await;
        app.dispatcher.dispatch(&message("Ann", ".amend +99 +99 +99 +99 +99")).await;
        let replies = app.dispatcher.dispatch(&message("Ann", ".amend +99")).await;

        assert!(replies[0].text.contains("999"), "{}", replies[0].text);
        let roll = app.services.sessions.last_roll("Ann").unwrap();
        assert_eq!(roll.running_total(), 990);
        assert_eq!(roll.bonuses().len(), 10);
    }

    #[tokio::test]
    async fn test_rolls_are_per_user() {
        let app = app_with_faces(vec![0, 0, 0, 0]);

        app.dispatcher.dispatch(&message("Ann", ".roll")).await;
        let replies = app.dispatcher.dispatch(&message("Bob", ".amend +1")).await;

        assert_eq!(replies[0].text, NOTHING_TO_AMEND);
        assert!(app.services.sessions.last_roll("Ann").is_some());
    }
}

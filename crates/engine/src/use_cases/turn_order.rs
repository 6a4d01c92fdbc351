//! Turn order.

use async_trait::async_trait;

use fatebot_shared::{CommandRequest, Reply};

use crate::commands::args::CommandArgs;
use crate::commands::error::CommandError;
use crate::commands::handler::{CommandContext, CommandHandler};
use crate::presentation::ResponseFormatter;
use crate::use_cases::backend_command::send_command;
use crate::use_cases::targeting::{ResolvedTarget, TargetedHandler};

/// Order changes that name an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderEntityOp {
    Add,
    Drop,
    Defer,
    Undefer,
}

impl OrderEntityOp {
    fn command(&self) -> &'static str {
        match self {
            OrderEntityOp::Add => "order_add",
            OrderEntityOp::Drop => "order_drop",
            OrderEntityOp::Defer => "order_defer",
            OrderEntityOp::Undefer => "order_undefer",
        }
    }
}

pub struct OrderEntity {
    op: OrderEntityOp,
}

impl OrderEntity {
    pub fn new(op: OrderEntityOp) -> Self {
        Self { op }
    }
}

#[async_trait]
impl TargetedHandler for OrderEntity {
    async fn handle_target(
        &self,
        ctx: &CommandContext<'_>,
        _args: &CommandArgs,
        target: &ResolvedTarget,
    ) -> Result<Vec<Reply>, CommandError> {
        send_command(ctx, CommandRequest::new(self.op.command()).entity(&target.name)).await
    }
}

/// Order changes that apply to the whole order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStepOp {
    Next,
    Back,
    Start,
    Clear,
}

impl OrderStepOp {
    fn command(&self) -> &'static str {
        match self {
            OrderStepOp::Next => "order_next",
            OrderStepOp::Back => "order_back",
            OrderStepOp::Start => "order_start",
            OrderStepOp::Clear => "order_clear",
        }
    }
}

pub struct OrderStep {
    op: OrderStepOp,
}

impl OrderStep {
    pub fn new(op: OrderStepOp) -> Self {
        Self { op }
    }
}

#[async_trait]
impl CommandHandler for OrderStep {
    async fn handle(
        &self,
        ctx: &CommandContext<'_>,
        _args: CommandArgs,
    ) -> Result<Vec<Reply>, CommandError> {
        send_command(ctx, CommandRequest::new(self.op.command())).await
    }
}

/// `order` / `order list`: read-only view of the current order.
pub struct ShowOrder;

#[async_trait]
impl CommandHandler for ShowOrder {
    async fn handle(
        &self,
        ctx: &CommandContext<'_>,
        _args: CommandArgs,
    ) -> Result<Vec<Reply>, CommandError> {
        let snapshot = ctx.services.backend.game().await?;
        let current_claim = snapshot
            .order
            .current_entity()
            .and_then(|name| ctx.services.sessions.claimant_of(name))
            .map(|(_, claim)| claim);
        Ok(vec![Reply::text(ResponseFormatter::order(
            &snapshot.order,
            current_claim.as_ref(),
        ))])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::App;
    use crate::infrastructure::ports::MockBackendPort;
    use crate::test_fixtures::{entity, message, services, snapshot};
    use fatebot_shared::{CommandPayload, OrderView};

    fn started() -> OrderView {
        OrderView {
            order: vec!["Weft".into(), "Warp".into()],
            current: Some(1),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_order_add_targets_entity() {
        let mut backend = MockBackendPort::new();
        backend
            .expect_game()
            .returning(|| Ok(snapshot(&[entity("Weft", 3, 3)])));
        backend
            .expect_command()
            .withf(|request| *request == CommandRequest::new("order_add").entity("Weft"))
            .times(1)
            .returning(|_| {
                Ok(CommandPayload::Order(OrderView {
                    entities: vec!["Weft".into()],
                    ..Default::default()
                }))
            });
        let app = App::new(services(backend)).unwrap();

        let replies = app
            .dispatcher
            .dispatch(&message("Ann", ".order add @ weft"))
            .await;

        assert_eq!(replies[0].text, "Turn order (not started): Weft");
    }

    #[tokio::test]
    async fn test_next_pings_current_claimant() {
        let mut backend = MockBackendPort::new();
        backend
            .expect_command()
            .withf(|request| *request == CommandRequest::new("order_next"))
            .times(1)
            .returning(|_| Ok(CommandPayload::Order(started())));
        let app = App::new(services(backend)).unwrap();
        app.services.sessions.claim("Bob", "Warp", "<@bob>");

        let replies = app.dispatcher.dispatch(&message("Ann", ".o next")).await;

        assert_eq!(
            replies[0].text,
            "Turn order:\n   Weft\n-> Warp <@bob>, you're up"
        );
    }

    #[tokio::test]
    async fn test_show_order_reads_snapshot() {
        let mut backend = MockBackendPort::new();
        backend.expect_game().times(2).returning(|| {
            let mut game = snapshot(&[entity("Weft", 3, 3), entity("Warp", 1, 2)]);
            game.order = started();
            Ok(game)
        });
        backend.expect_command().never();
        let app = App::new(services(backend)).unwrap();

        let plain = app.dispatcher.dispatch(&message("Ann", ".init")).await;
        let listed = app.dispatcher.dispatch(&message("Ann", ".order list")).await;

        assert_eq!(plain, listed);
        assert_eq!(plain[0].text, "Turn order:\n   Weft\n-> Warp");
    }
}

//! Aspects: adding, removing, free invocations and bulk clears.

use async_trait::async_trait;

use fatebot_domain::AspectKind;
use fatebot_shared::{CommandRequest, EntityView, Reply};

use crate::commands::args::{CommandArgs, Params};
use crate::commands::error::CommandError;
use crate::commands::handler::{CommandContext, CommandHandler};
use crate::use_cases::backend_command::send_command;
use crate::use_cases::targeting::{ResolvedTarget, TargetedHandler};

/// The entity's own spelling of `name`, when it has such an aspect.
fn aspect_name(view: Option<&EntityView>, name: &str) -> String {
    view.and_then(|view| {
        view.aspects
            .iter()
            .find(|aspect| aspect.name.eq_ignore_ascii_case(name.trim()))
            .map(|aspect| aspect.name.clone())
    })
    .unwrap_or_else(|| name.trim().to_string())
}

fn kind_field(kind: &Option<AspectKind>) -> Option<&'static str> {
    kind.as_ref().map(AspectKind::as_str)
}

fn unexpected(command: &str, params: &Params) -> CommandError {
    CommandError::internal(format!("{} got {:?}", command, params))
}

pub struct AddAspect;

#[async_trait]
impl TargetedHandler for AddAspect {
    async fn handle_target(
        &self,
        ctx: &CommandContext<'_>,
        args: &CommandArgs,
        target: &ResolvedTarget,
    ) -> Result<Vec<Reply>, CommandError> {
        let Params::Aspect { kind, name } = &args.params else {
            return Err(unexpected("add_aspect", &args.params));
        };
        let request = CommandRequest::new("add_aspect")
            .entity(&target.name)
            .field("aspect", name)
            .optional_field("kind", kind_field(kind));
        send_command(ctx, request).await
    }
}

pub struct RemoveAspect;

#[async_trait]
impl TargetedHandler for RemoveAspect {
    async fn handle_target(
        &self,
        ctx: &CommandContext<'_>,
        args: &CommandArgs,
        target: &ResolvedTarget,
    ) -> Result<Vec<Reply>, CommandError> {
        let Params::Name(name) = &args.params else {
            return Err(unexpected("remove_aspect", &args.params));
        };
        let request = CommandRequest::new("remove_aspect")
            .entity(&target.name)
            .field("aspect", aspect_name(target.view.as_ref(), name));
        send_command(ctx, request).await
    }
}

/// Add (`tag`) or spend (`untag`) free invocations.
pub struct TagAspect {
    untag: bool,
}

impl TagAspect {
    pub fn tag() -> Self {
        Self { untag: false }
    }

    pub fn untag() -> Self {
        Self { untag: true }
    }

    fn command(&self) -> &'static str {
        if self.untag {
            "untag_aspect"
        } else {
            "tag_aspect"
        }
    }
}

#[async_trait]
impl TargetedHandler for TagAspect {
    async fn handle_target(
        &self,
        ctx: &CommandContext<'_>,
        args: &CommandArgs,
        target: &ResolvedTarget,
    ) -> Result<Vec<Reply>, CommandError> {
        let Params::Tag { aspect, amount } = &args.params else {
            return Err(unexpected(self.command(), &args.params));
        };
        let request = CommandRequest::new(self.command())
            .entity(&target.name)
            .field("aspect", aspect_name(target.view.as_ref(), aspect))
            .field("amount", amount);
        send_command(ctx, request).await
    }
}

/// Clear one entity's aspects, optionally only one kind.
pub struct ClearAspects;

#[async_trait]
impl TargetedHandler for ClearAspects {
    async fn handle_target(
        &self,
        ctx: &CommandContext<'_>,
        args: &CommandArgs,
        target: &ResolvedTarget,
    ) -> Result<Vec<Reply>, CommandError> {
        let Params::Kind(kind) = &args.params else {
            return Err(unexpected("clear_aspects", &args.params));
        };
        let request = CommandRequest::new("clear_aspects")
            .entity(&target.name)
            .optional_field("kind", kind_field(kind));
        send_command(ctx, request).await
    }
}

/// Clear aspects across every entity.
pub struct ClearAllAspects;

#[async_trait]
impl CommandHandler for ClearAllAspects {
    async fn handle(
        &self,
        ctx: &CommandContext<'_>,
        args: CommandArgs,
    ) -> Result<Vec<Reply>, CommandError> {
        let Params::Kind(kind) = &args.params else {
            return Err(unexpected("clear_all_aspects", &args.params));
        };
        let request =
            CommandRequest::new("clear_all_aspects").optional_field("kind", kind_field(kind));
        send_command(ctx, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::App;
    use crate::infrastructure::ports::MockBackendPort;
    use crate::test_fixtures::{entity, message, services, snapshot};
    use fatebot_shared::{AspectView, CommandPayload};

    fn weft_on_fire() -> EntityView {
        let mut weft = entity("Weft", 3, 3);
        weft.aspects.push(AspectView {
            name: "On Fire".into(),
            kind: Some("fragile".into()),
            tags: Some(1),
        });
        weft
    }

    fn app_expecting(expected: CommandRequest) -> App {
        let mut backend = MockBackendPort::new();
        backend
            .expect_game()
            .returning(|| Ok(snapshot(&[weft_on_fire()])));
        backend
            .expect_command()
            .withf(move |request| *request == expected)
            .times(1)
            .returning(|_| Ok(CommandPayload::Entity(weft_on_fire())));
        App::new(services(backend)).unwrap()
    }

    #[tokio::test]
    async fn test_add_aspect_with_kind() {
        let app = app_expecting(
            CommandRequest::new("add_aspect")
                .entity("Weft")
                .field("aspect", "Broken Arm")
                .field("kind", "mild"),
        );
        let replies = app
            .dispatcher
            .dispatch(&message("Ann", ".a+ MILD Broken Arm @ weft"))
            .await;
        assert_eq!(replies[0].text, "Weft: FP) 3/3 | Aspects) On Fire (fragile, 1)");
    }

    #[tokio::test]
    async fn test_add_plain_aspect_has_no_kind() {
        let app = app_expecting(
            CommandRequest::new("add_aspect")
                .entity("Weft")
                .field("aspect", "Smoke Everywhere"),
        );
        app.dispatcher
            .dispatch(&message("Ann", ".aspect+ Smoke Everywhere @Weft"))
            .await;
    }

    #[tokio::test]
    async fn test_remove_aspect_uses_entity_spelling() {
        let app = app_expecting(
            CommandRequest::new("remove_aspect")
                .entity("Weft")
                .field("aspect", "On Fire"),
        );
        app.dispatcher
            .dispatch(&message("Ann", ".a- on fire @Weft"))
            .await;
    }

    #[tokio::test]
    async fn test_tag_with_amount() {
        let app = app_expecting(
            CommandRequest::new("tag_aspect")
                .entity("Weft")
                .field("aspect", "On Fire")
                .field("amount", 2),
        );
        app.dispatcher
            .dispatch(&message("Ann", ".tag on fire 2 @Weft"))
            .await;
    }

    #[tokio::test]
    async fn test_untag_defaults_to_one() {
        let app = app_expecting(
            CommandRequest::new("untag_aspect")
                .entity("Weft")
                .field("aspect", "On Fire")
                .field("amount", 1),
        );
        app.dispatcher
            .dispatch(&message("Ann", ".t- On Fire @Weft"))
            .await;
    }

    #[tokio::test]
    async fn test_clear_all_aspects_by_kind() {
        let mut backend = MockBackendPort::new();
        backend
            .expect_command()
            .withf(|request| {
                *request == CommandRequest::new("clear_all_aspects").field("kind", "fragile")
            })
            .times(1)
            .returning(|_| Ok(CommandPayload::Empty));
        let app = App::new(services(backend)).unwrap();

        let replies = app.dispatcher.dispatch(&message("Ann", ".a!! fragile")).await;

        assert_eq!(replies[0].text, "Done.");
    }

    #[tokio::test]
    async fn test_unknown_kind_is_an_argument_error() {
        let app = App::new(services(MockBackendPort::new())).unwrap();
        let replies = app.dispatcher.dispatch(&message("Ann", ".a!! gooey")).await;
        assert!(replies[0].text.contains("Unknown aspect kind: gooey"));
    }
}

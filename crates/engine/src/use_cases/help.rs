//! `help` renders the static command metadata.

use async_trait::async_trait;

use fatebot_shared::Reply;

use crate::commands::args::{CommandArgs, Params};
use crate::commands::error::CommandError;
use crate::commands::handler::{CommandContext, CommandHandler};
use crate::presentation::ResponseFormatter;

pub struct Help;

#[async_trait]
impl CommandHandler for Help {
    async fn handle(
        &self,
        ctx: &CommandContext<'_>,
        args: CommandArgs,
    ) -> Result<Vec<Reply>, CommandError> {
        let text = match args.params {
            Params::Text(None) => ResponseFormatter::help_overview(&ctx.registry.groups()),
            Params::Text(Some(topic)) => match ctx.registry.lookup(&topic) {
                Some(spec) => ResponseFormatter::help_detail(spec),
                None => format!("No command named `{}`. Try `.help`.", topic),
            },
            other => return Err(CommandError::internal(format!("help got {:?}", other))),
        };
        Ok(vec![Reply::text(text)])
    }
}

//! Message dispatch: match, parse, lock, invoke, and turn every failure into
//! a reply.

use std::sync::Arc;

use tracing::Instrument;

use fatebot_shared::{ChatMessage, Reply};

use crate::app::Services;
use crate::commands::definition::TargetMode;
use crate::commands::error::CommandError;
use crate::commands::handler::CommandContext;
use crate::commands::registry::{ParseOutcome, PatternTable};
use crate::infrastructure::correlation::CorrelationId;
use crate::infrastructure::ports::BackendError;
use crate::use_cases::targeting::{markers, strip_markers, unmark};

pub struct Dispatcher {
    registry: Arc<PatternTable>,
    services: Arc<Services>,
}

impl Dispatcher {
    pub fn new(registry: Arc<PatternTable>, services: Arc<Services>) -> Self {
        Self { registry, services }
    }

    pub fn registry(&self) -> &PatternTable {
        &self.registry
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    /// Interpret one chat message. Plain chat (anything not starting with
    /// `.`) produces no replies.
    pub async fn dispatch(&self, message: &ChatMessage) -> Vec<Reply> {
        let text = message.text.trim();
        if !text.starts_with('.') {
            return Vec::new();
        }

        let correlation_id = CorrelationId::new();
        let span = tracing::info_span!(
            "dispatch",
            correlation_id = %correlation_id.short(),
            author = %message.author_display_name,
        );
        self.dispatch_command(message, text, correlation_id)
            .instrument(span)
            .await
    }

    async fn dispatch_command(
        &self,
        message: &ChatMessage,
        text: &str,
        correlation_id: CorrelationId,
    ) -> Vec<Reply> {
        let body = strip_markers(text);
        let outcome = match self.registry.parse(&body) {
            ParseOutcome::Parsed(invocation) => ParseOutcome::Parsed(invocation),
            unparsed => self.parse_marker_as_name(text).unwrap_or(unparsed),
        };
        let invocation = match outcome {
            ParseOutcome::NoMatch => {
                tracing::debug!(text, "No command matched");
                return vec![Reply::text(format!("Could not interpret `{}`", text))];
            }
            ParseOutcome::Invalid { handler, error } => {
                tracing::debug!(handler = %handler, error = %error, "Invalid arguments");
                let usage = self
                    .registry
                    .spec(handler)
                    .map(|spec| spec.usage)
                    .unwrap_or_default();
                return vec![Reply::text(format!("{}. Usage: `{}`", error, usage))];
            }
            ParseOutcome::Parsed(invocation) => invocation,
        };

        tracing::info!(
            handler = %invocation.handler,
            span = invocation.span,
            "Dispatching command"
        );

        let _guard = self
            .services
            .sessions
            .lock_user(&message.author_display_name)
            .await;
        let ctx = CommandContext {
            message,
            services: &self.services,
            registry: &self.registry,
            correlation_id,
        };

        match self
            .registry
            .invoke(invocation.handler, &ctx, invocation.args)
            .await
        {
            Ok(replies) => replies,
            Err(error) => {
                log_failure(&error);
                vec![error.to_reply()]
            }
        }
    }
}

impl Dispatcher {
    /// Commands that take no target read a marker as a plain argument.
    fn parse_marker_as_name(&self, text: &str) -> Option<ParseOutcome> {
        if markers(text).is_empty() {
            return None;
        }
        match self.registry.parse(&unmark(text)) {
            ParseOutcome::Parsed(invocation)
                if self
                    .registry
                    .spec(invocation.handler)
                    .is_some_and(|spec| spec.target == TargetMode::None) =>
            {
                Some(ParseOutcome::Parsed(invocation))
            }
            _ => None,
        }
    }
}

fn log_failure(error: &CommandError) {
    match error {
        CommandError::Backend(BackendError::Rejected(description)) => {
            tracing::info!(description = %description, "Backend rejected command");
        }
        CommandError::Backend(backend) => {
            tracing::error!(error = %backend, "Backend request failed");
        }
        CommandError::Internal(detail) => {
            tracing::error!(error = %detail, "Command failed");
        }
        other => {
            tracing::info!(error = %other, "Command refused");
        }
    }
}

//! Pattern table: aliases and argument variants compiled into matchers.
//!
//! For every alias and every variant of a command the table compiles
//! `^\.<alias><variant>(?:\s|$)`. A message is matched against all of them
//! and the match covering the most text wins; on equal spans the command
//! registered first wins.

use std::collections::HashMap;
use std::sync::Arc;

use regex_lite::{Captures, Regex};

use fatebot_shared::Reply;

use crate::commands::args::{ArgParser, ArgumentError, CommandArgs};
use crate::commands::definition::{CommandSpec, Group, HandlerId, TargetMode};
use crate::commands::error::CommandError;
use crate::commands::handler::{CommandContext, CommandHandler};
use crate::use_cases::targeting::{Targeted, TargetedHandler};

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("command {0} has no aliases")]
    NoAliases(&'static str),
    #[error("command {0} is already registered")]
    Duplicate(&'static str),
    #[error("command {name} has an invalid pattern: {reason}")]
    InvalidPattern { name: &'static str, reason: String },
    #[error("command {0} handler does not fit its target mode")]
    TargetModeMismatch(&'static str),
}

/// What runs when a command matches.
pub enum Handler {
    Plain(Arc<dyn CommandHandler>),
    /// Wrapped in the targeting middleware at registration
    Targeted(Arc<dyn TargetedHandler>),
    /// Help entry only
    DocumentationOnly,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInvocation {
    pub handler: HandlerId,
    pub args: CommandArgs,
    /// Bytes of the message covered by the match
    pub span: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    NoMatch,
    /// A command matched but its arguments did not validate
    Invalid {
        handler: HandlerId,
        error: ArgumentError,
    },
    Parsed(ParsedInvocation),
}

struct Entry {
    spec: CommandSpec,
    parser: ArgParser,
    handler: Option<Arc<dyn CommandHandler>>,
}

struct Matcher {
    regex: Regex,
    entry: usize,
}

/// Registered once at startup, read-only afterwards.
#[derive(Default)]
pub struct PatternTable {
    entries: Vec<Entry>,
    by_id: HashMap<HandlerId, usize>,
    matchers: Vec<Matcher>,
    groups: Vec<(Group, Vec<usize>)>,
}

impl PatternTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        spec: CommandSpec,
        parser: ArgParser,
        handler: Handler,
    ) -> Result<HandlerId, RegistryError> {
        if spec.aliases.is_empty() {
            return Err(RegistryError::NoAliases(spec.name));
        }
        let id = spec.id();
        if self.by_id.contains_key(&id) {
            return Err(RegistryError::Duplicate(spec.name));
        }

        let handler: Option<Arc<dyn CommandHandler>> = match (spec.target, handler) {
            (TargetMode::DocumentationOnly, Handler::DocumentationOnly) => None,
            (TargetMode::None, Handler::Plain(handler)) => Some(handler),
            (TargetMode::Required, Handler::Targeted(inner)) => {
                Some(Arc::new(Targeted::new(id, inner)))
            }
            _ => return Err(RegistryError::TargetModeMismatch(spec.name)),
        };

        let index = self.entries.len();
        let matchers = if handler.is_some() {
            compile(&spec, index)?
        } else {
            Vec::new()
        };

        self.matchers.extend(matchers);
        self.entries.push(Entry {
            spec,
            parser,
            handler,
        });
        self.by_id.insert(id, index);
        match self.groups.iter_mut().find(|(group, _)| *group == spec.group) {
            Some((_, members)) => members.push(index),
            None => self.groups.push((spec.group, vec![index])),
        }

        tracing::trace!(command = spec.name, "Registered command");
        Ok(id)
    }

    /// Pick the longest match for `text` and parse its arguments.
    pub fn parse(&self, text: &str) -> ParseOutcome {
        let mut best: Option<(usize, Captures<'_>, usize)> = None;
        for matcher in &self.matchers {
            let Some(caps) = matcher.regex.captures(text) else {
                continue;
            };
            let span = caps.get(0).map_or(0, |m| m.end());
            let longer = best.as_ref().is_none_or(|(best_span, _, _)| span > *best_span);
            if longer {
                best = Some((span, caps, matcher.entry));
            }
        }

        let Some((span, caps, index)) = best else {
            return ParseOutcome::NoMatch;
        };
        let Some(entry) = self.entries.get(index) else {
            return ParseOutcome::NoMatch;
        };

        match (entry.parser)(&caps) {
            Ok(args) => ParseOutcome::Parsed(ParsedInvocation {
                handler: entry.spec.id(),
                args,
                span,
            }),
            Err(error) => ParseOutcome::Invalid {
                handler: entry.spec.id(),
                error,
            },
        }
    }

    /// Run a registered handler. Used by the dispatcher and by replays.
    pub async fn invoke(
        &self,
        id: HandlerId,
        ctx: &CommandContext<'_>,
        args: CommandArgs,
    ) -> Result<Vec<Reply>, CommandError> {
        let handler = self
            .by_id
            .get(&id)
            .and_then(|index| self.entries.get(*index))
            .and_then(|entry| entry.handler.clone())
            .ok_or_else(|| CommandError::internal(format!("no runnable handler {id}")))?;
        handler.handle(ctx, args).await
    }

    pub fn spec(&self, id: HandlerId) -> Option<&CommandSpec> {
        self.by_id
            .get(&id)
            .and_then(|index| self.entries.get(*index))
            .map(|entry| &entry.spec)
    }

    /// Look a command up by name first, then by alias.
    pub fn lookup(&self, token: &str) -> Option<&CommandSpec> {
        let token = token.trim();
        let bare = token.strip_prefix('.').unwrap_or(token);
        self.entries
            .iter()
            .find(|entry| entry.spec.name == bare)
            .or_else(|| self.entries.iter().find(|entry| entry.spec.answers_to(bare)))
            .map(|entry| &entry.spec)
    }

    /// Commands per group, in registration order.
    pub fn groups(&self) -> Vec<(Group, Vec<&CommandSpec>)> {
        self.groups
            .iter()
            .map(|(group, members)| {
                let specs = members
                    .iter()
                    .filter_map(|index| self.entries.get(*index))
                    .map(|entry| &entry.spec)
                    .collect();
                (*group, specs)
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn compile(spec: &CommandSpec, entry: usize) -> Result<Vec<Matcher>, RegistryError> {
    let variants: &[&str] = if spec.variants.is_empty() {
        &[""]
    } else {
        spec.variants
    };

    let mut matchers = Vec::with_capacity(spec.aliases.len() * variants.len());
    for alias in spec.aliases {
        for variant in variants {
            let pattern = format!(r"^\.{}{}(?:\s|$)", regex_lite::escape(alias), variant);
            let regex = Regex::new(&pattern).map_err(|e| RegistryError::InvalidPattern {
                name: spec.name,
                reason: e.to_string(),
            })?;
            matchers.push(Matcher { regex, entry });
        }
    }
    Ok(matchers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::args::{self, Params};
    use crate::test_fixtures::{context_parts, message};
    use async_trait::async_trait;

    struct Echo(&'static str);

    #[async_trait]
    impl CommandHandler for Echo {
        async fn handle(
            &self,
            _ctx: &CommandContext<'_>,
            _args: CommandArgs,
        ) -> Result<Vec<Reply>, CommandError> {
            Ok(vec![Reply::text(self.0)])
        }
    }

    fn spec(name: &'static str, aliases: &'static [&'static str], variants: &'static [&'static str]) -> CommandSpec {
        CommandSpec {
            name,
            aliases,
            variants,
            group: Group::Help,
            target: TargetMode::None,
            summary: "",
            usage: "",
            examples: &[],
        }
    }

    fn plain(text: &'static str) -> Handler {
        Handler::Plain(Arc::new(Echo(text)))
    }

    fn parsed_handler(table: &PatternTable, text: &str) -> Option<&'static str> {
        match table.parse(text) {
            ParseOutcome::Parsed(invocation) => Some(invocation.handler.as_str()),
            _ => None,
        }
    }

    #[test]
    fn test_longest_span_wins() {
        let mut table = PatternTable::new();
        table
            .register(spec("order", &["order", "o"], &[r"(?:\s+list)?"]), args::no_args, plain("order"))
            .unwrap();
        table
            .register(spec("order_next", &["order", "o"], &[r"\s+next"]), args::no_args, plain("next"))
            .unwrap();

        assert_eq!(parsed_handler(&table, ".order next"), Some("order_next"));
        assert_eq!(parsed_handler(&table, ".o next"), Some("order_next"));
        assert_eq!(parsed_handler(&table, ".order"), Some("order"));
        assert_eq!(parsed_handler(&table, ".order list"), Some("order"));
    }

    #[test]
    fn test_equal_spans_go_to_first_registration() {
        let mut table = PatternTable::new();
        table.register(spec("first", &["same"], &[]), args::no_args, plain("1")).unwrap();
        table.register(spec("second", &["same"], &[]), args::no_args, plain("2")).unwrap();

        for _ in 0..10 {
            assert_eq!(parsed_handler(&table, ".same"), Some("first"));
        }
    }

    #[test]
    fn test_alias_must_match_exactly() {
        let mut table = PatternTable::new();
        table.register(spec("refresh", &["refresh"], &[]), args::no_args, plain("r")).unwrap();
        table.register(spec("clear_stress", &["s0"], &[]), args::no_args, plain("s0")).unwrap();

        assert_eq!(parsed_handler(&table, ".refresh"), Some("refresh"));
        assert_eq!(table.parse(".Refresh"), ParseOutcome::NoMatch);
        assert_eq!(table.parse(".refreshing"), ParseOutcome::NoMatch);
        assert_eq!(table.parse(".s00"), ParseOutcome::NoMatch);
        assert_eq!(table.parse("refresh"), ParseOutcome::NoMatch);
    }

    #[test]
    fn test_alias_metacharacters_are_escaped() {
        let mut table = PatternTable::new();
        table
            .register(spec("increment_fp", &["fp+"], &[r"(?:\s+(?P<amount>\S+))?"]), args::amount, plain("+"))
            .unwrap();

        assert_eq!(parsed_handler(&table, ".fp+ 2"), Some("increment_fp"));
        assert_eq!(table.parse(".fpp"), ParseOutcome::NoMatch);
    }

    #[test]
    fn test_invalid_arguments_are_reported_with_handler() {
        let mut table = PatternTable::new();
        table
            .register(spec("increment_fp", &["fp+"], &[r"(?:\s+(?P<amount>\S+))?"]), args::amount, plain("+"))
            .unwrap();

        match table.parse(".fp+ 99") {
            ParseOutcome::Invalid { handler, error } => {
                assert_eq!(handler.as_str(), "increment_fp");
                assert!(matches!(error, ArgumentError::OutOfRange { value: 99, .. }));
            }
            other => panic!("expected invalid arguments, got {:?}", other),
        }
    }

    #[test]
    fn test_registration_errors() {
        let mut table = PatternTable::new();
        assert_eq!(
            table.register(spec("empty", &[], &[]), args::no_args, plain("")),
            Err(RegistryError::NoAliases("empty"))
        );

        table.register(spec("dup", &["dup"], &[]), args::no_args, plain("")).unwrap();
        assert_eq!(
            table.register(spec("dup", &["other"], &[]), args::no_args, plain("")),
            Err(RegistryError::Duplicate("dup"))
        );

        assert!(matches!(
            table.register(spec("broken", &["broken"], &[r"(?P<open"]), args::no_args, plain("")),
            Err(RegistryError::InvalidPattern { name: "broken", .. })
        ));

        let mut targeted = spec("needs_target", &["nt"], &[]);
        targeted.target = TargetMode::Required;
        assert_eq!(
            table.register(targeted, args::no_args, plain("")),
            Err(RegistryError::TargetModeMismatch("needs_target"))
        );
    }

    #[test]
    fn test_documentation_only_is_listed_not_matched() {
        let mut table = PatternTable::new();
        let mut doc = spec("targeting", &["targeting"], &[]);
        doc.target = TargetMode::DocumentationOnly;
        table.register(doc, args::no_args, Handler::DocumentationOnly).unwrap();

        assert_eq!(table.parse(".targeting"), ParseOutcome::NoMatch);
        assert!(table.lookup("targeting").is_some());
        assert_eq!(table.groups()[0].1[0].name, "targeting");
    }

    #[test]
    fn test_lookup_prefers_name_over_alias() {
        let mut table = PatternTable::new();
        table.register(spec("order_add", &["order"], &[r"\s+add"]), args::no_args, plain("")).unwrap();
        table.register(spec("order", &["order"], &[]), args::no_args, plain("")).unwrap();

        assert_eq!(table.lookup(".order").unwrap().name, "order");
        assert_eq!(table.lookup("order_add").unwrap().name, "order_add");
        assert!(table.lookup("nothing").is_none());
    }

    #[tokio::test]
    async fn test_invoke_runs_registered_handler() {
        let mut table = PatternTable::new();
        let id = table.register(spec("hello", &["hello"], &[]), args::no_args, plain("hi")).unwrap();

        let (services, _) = context_parts();
        let message = message("Ann", ".hello");
        let ctx = CommandContext {
            message: &message,
            services: &services,
            registry: &table,
            correlation_id: Default::default(),
        };

        let replies = table.invoke(id, &ctx, CommandArgs::new(Params::None)).await.unwrap();
        assert_eq!(replies, vec![Reply::text("hi")]);

        let missing = table
            .invoke(HandlerId::new("nope"), &ctx, CommandArgs::new(Params::None))
            .await;
        assert!(matches!(missing, Err(CommandError::Internal(_))));
    }
}

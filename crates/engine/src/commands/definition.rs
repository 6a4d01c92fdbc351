//! Static command metadata.
//!
//! Every command is described once, at compile time. The registry compiles
//! matchers from it and `help` renders it, so help text cannot drift from
//! what the bot actually accepts.

use std::fmt;

/// Canonical handler name, unique across the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(&'static str);

impl HandlerId {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for HandlerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

/// Help listing group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Group {
    Session,
    Dice,
    Entities,
    FatePoints,
    Aspects,
    Stress,
    TurnOrder,
    Help,
    Admin,
}

impl Group {
    pub fn title(&self) -> &'static str {
        match self {
            Group::Session => "Session",
            Group::Dice => "Dice",
            Group::Entities => "Entities",
            Group::FatePoints => "Fate points",
            Group::Aspects => "Aspects",
            Group::Stress => "Stress",
            Group::TurnOrder => "Turn order",
            Group::Help => "Help",
            Group::Admin => "Admin",
        }
    }
}

/// How a command relates to game entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetMode {
    /// Runs once per resolved entity
    Required,
    None,
    /// Listed in help, never matched
    DocumentationOnly,
}

/// One registered command.
#[derive(Debug, Clone, Copy)]
pub struct CommandSpec {
    pub name: &'static str,
    /// Case-sensitive tokens typed after the leading `.`
    pub aliases: &'static [&'static str],
    /// Regex suffixes tried after each alias, in order
    pub variants: &'static [&'static str],
    pub group: Group,
    pub target: TargetMode,
    pub summary: &'static str,
    pub usage: &'static str,
    pub examples: &'static [&'static str],
}

impl CommandSpec {
    pub fn id(&self) -> HandlerId {
        HandlerId::new(self.name)
    }

    /// Name or alias match, with or without the leading `.`.
    pub fn answers_to(&self, token: &str) -> bool {
        let token = token.strip_prefix('.').unwrap_or(token);
        self.name == token || self.aliases.contains(&token)
    }
}

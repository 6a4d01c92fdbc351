//! Typed command arguments.
//!
//! Each command has a parser that turns the matcher's captures into a
//! `Params` value. Numbers are parsed and range-checked here, so handlers
//! never see a malformed amount.

use std::ops::RangeInclusive;
use std::str::FromStr;

use regex_lite::Captures;

use fatebot_domain::AspectKind;

pub const AMOUNT_RANGE: RangeInclusive<u32> = 1..=20;
pub const BOX_RANGE: RangeInclusive<u32> = 1..=12;
pub const FATE_RANGE: RangeInclusive<u32> = 0..=99;

/// Turns captures into arguments. Chosen per command at registration.
pub type ArgParser = fn(&Captures<'_>) -> Result<CommandArgs, ArgumentError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArgumentError {
    #[error("{field} must be a whole number, got `{value}`")]
    NotANumber { field: &'static str, value: String },
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: u32,
        max: u32,
    },
    #[error("Missing {0}")]
    Missing(&'static str),
    #[error("{0}")]
    Invalid(String),
}

/// One argument shape per variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Params {
    None,
    Amount(u32),
    /// Optional free text (roll bonuses, help topic)
    Text(Option<String>),
    Name(String),
    NewEntity {
        name: String,
        fate: Option<u32>,
        refresh: Option<u32>,
    },
    Edit {
        field: String,
        value: String,
    },
    Aspect {
        kind: Option<AspectKind>,
        name: String,
    },
    Tag {
        aspect: String,
        amount: u32,
    },
    Kind(Option<AspectKind>),
    Stress {
        track: String,
        amount: u32,
    },
    Track(Option<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandArgs {
    /// Explicit target; overrides marker and claim resolution
    pub target: Option<String>,
    pub params: Params,
}

impl CommandArgs {
    pub fn new(params: Params) -> Self {
        Self {
            target: None,
            params,
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }
}

// =============================================================================
// Capture helpers
// =============================================================================

fn text(caps: &Captures<'_>, group: &str) -> Option<String> {
    caps.name(group)
        .map(|m| m.as_str().trim().to_string())
        .filter(|value| !value.is_empty())
}

fn required(caps: &Captures<'_>, group: &str, field: &'static str) -> Result<String, ArgumentError> {
    text(caps, group).ok_or(ArgumentError::Missing(field))
}

fn number(
    caps: &Captures<'_>,
    group: &str,
    field: &'static str,
    range: RangeInclusive<u32>,
) -> Result<Option<u32>, ArgumentError> {
    let Some(raw) = text(caps, group) else {
        return Ok(None);
    };
    let value: i64 = raw.parse().map_err(|_| ArgumentError::NotANumber {
        field,
        value: raw.clone(),
    })?;
    let (min, max) = (*range.start(), *range.end());
    if value < i64::from(min) || value > i64::from(max) {
        return Err(ArgumentError::OutOfRange {
            field,
            value,
            min,
            max,
        });
    }
    Ok(Some(value as u32))
}

fn kind(caps: &Captures<'_>) -> Result<Option<AspectKind>, ArgumentError> {
    text(caps, "kind")
        .map(|raw| AspectKind::from_str(&raw).map_err(|e| ArgumentError::Invalid(e.to_string())))
        .transpose()
}

// =============================================================================
// Parsers
// =============================================================================

pub fn no_args(_caps: &Captures<'_>) -> Result<CommandArgs, ArgumentError> {
    Ok(CommandArgs::new(Params::None))
}

/// `[n]`, defaulting to 1.
pub fn amount(caps: &Captures<'_>) -> Result<CommandArgs, ArgumentError> {
    let amount = number(caps, "amount", "amount", AMOUNT_RANGE)?.unwrap_or(1);
    Ok(CommandArgs::new(Params::Amount(amount)))
}

pub fn free_text(caps: &Captures<'_>) -> Result<CommandArgs, ArgumentError> {
    Ok(CommandArgs::new(Params::Text(text(caps, "text"))))
}

pub fn name(caps: &Captures<'_>) -> Result<CommandArgs, ArgumentError> {
    Ok(CommandArgs::new(Params::Name(required(caps, "name", "name")?)))
}

/// Optional entity name typed straight after the command (`.info weft`).
pub fn target_name(caps: &Captures<'_>) -> Result<CommandArgs, ArgumentError> {
    let args = CommandArgs::new(Params::None);
    Ok(match text(caps, "target") {
        Some(target) => args.with_target(target),
        None => args,
    })
}

pub fn new_entity(caps: &Captures<'_>) -> Result<CommandArgs, ArgumentError> {
    Ok(CommandArgs::new(Params::NewEntity {
        name: required(caps, "name", "name")?,
        fate: number(caps, "fate", "fate", FATE_RANGE)?,
        refresh: number(caps, "refresh", "refresh", FATE_RANGE)?,
    }))
}

pub fn edit(caps: &Captures<'_>) -> Result<CommandArgs, ArgumentError> {
    Ok(CommandArgs::new(Params::Edit {
        field: required(caps, "field", "field")?,
        value: required(caps, "value", "value")?,
    }))
}

pub fn aspect(caps: &Captures<'_>) -> Result<CommandArgs, ArgumentError> {
    Ok(CommandArgs::new(Params::Aspect {
        kind: kind(caps)?,
        name: required(caps, "name", "aspect")?,
    }))
}

pub fn tag(caps: &Captures<'_>) -> Result<CommandArgs, ArgumentError> {
    Ok(CommandArgs::new(Params::Tag {
        aspect: required(caps, "aspect", "aspect")?,
        amount: number(caps, "amount", "amount", AMOUNT_RANGE)?.unwrap_or(1),
    }))
}

pub fn aspect_kind(caps: &Captures<'_>) -> Result<CommandArgs, ArgumentError> {
    Ok(CommandArgs::new(Params::Kind(kind(caps)?)))
}

pub fn stress_box(caps: &Captures<'_>) -> Result<CommandArgs, ArgumentError> {
    stress(caps, "box")
}

pub fn stress_shifts(caps: &Captures<'_>) -> Result<CommandArgs, ArgumentError> {
    stress(caps, "shifts")
}

fn stress(caps: &Captures<'_>, field: &'static str) -> Result<CommandArgs, ArgumentError> {
    let track = required(caps, "track", "track")?;
    let amount = number(caps, "amount", field, BOX_RANGE)?.ok_or(ArgumentError::Missing(field))?;
    Ok(CommandArgs::new(Params::Stress { track, amount }))
}

pub fn track(caps: &Captures<'_>) -> Result<CommandArgs, ArgumentError> {
    Ok(CommandArgs::new(Params::Track(text(caps, "track"))))
}

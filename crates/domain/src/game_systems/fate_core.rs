//! FATE Core table vocabulary.
//!
//! FATE uses 4dF (Fudge dice) + skill vs difficulty.
//! Key features used at the table:
//! - Ladder-based results (-2 to +8)
//! - Aspects as central mechanic, some sticky, some fragile, some consequences
//! - Fate Points for narrative control
//! - Stress and Consequences instead of HP

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// FATE ladder value to descriptor mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LadderRating {
    Terrible = -2,
    Poor = -1,
    Mediocre = 0,
    Average = 1,
    Fair = 2,
    Good = 3,
    Great = 4,
    Superb = 5,
    Fantastic = 6,
    Epic = 7,
    Legendary = 8,
}

impl LadderRating {
    pub fn from_value(value: i32) -> Option<Self> {
        match value {
            -2 => Some(LadderRating::Terrible),
            -1 => Some(LadderRating::Poor),
            0 => Some(LadderRating::Mediocre),
            1 => Some(LadderRating::Average),
            2 => Some(LadderRating::Fair),
            3 => Some(LadderRating::Good),
            4 => Some(LadderRating::Great),
            5 => Some(LadderRating::Superb),
            6 => Some(LadderRating::Fantastic),
            7 => Some(LadderRating::Epic),
            8 => Some(LadderRating::Legendary),
            _ => None,
        }
    }

    pub fn descriptor(&self) -> &'static str {
        match self {
            LadderRating::Terrible => "Terrible",
            LadderRating::Poor => "Poor",
            LadderRating::Mediocre => "Mediocre",
            LadderRating::Average => "Average",
            LadderRating::Fair => "Fair",
            LadderRating::Good => "Good",
            LadderRating::Great => "Great",
            LadderRating::Superb => "Superb",
            LadderRating::Fantastic => "Fantastic",
            LadderRating::Epic => "Epic",
            LadderRating::Legendary => "Legendary",
        }
    }
}

/// Consequence severity in FATE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsequenceSeverity {
    /// Absorbs 2 shifts, clears after scene
    Mild,
    /// Absorbs 4 shifts, clears after session
    Moderate,
    /// Absorbs 6 shifts, clears after scenario
    Severe,
    /// Absorbs 8 shifts, permanently alters an aspect
    Extreme,
}

impl ConsequenceSeverity {
    pub fn shifts_absorbed(&self) -> i32 {
        match self {
            ConsequenceSeverity::Mild => 2,
            ConsequenceSeverity::Moderate => 4,
            ConsequenceSeverity::Severe => 6,
            ConsequenceSeverity::Extreme => 8,
        }
    }
}

/// How long an aspect sticks around.
///
/// Plain situation aspects carry no kind at all, so this is always used as
/// `Option<AspectKind>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AspectKind {
    /// Survives bulk clears
    Sticky,
    /// Goes away once invoked
    Fragile,
    Consequence(ConsequenceSeverity),
}

impl AspectKind {
    /// Every kind keyword accepted in chat, in display order.
    pub const KEYWORDS: [&'static str; 6] =
        ["sticky", "fragile", "mild", "moderate", "severe", "extreme"];

    /// Wire name understood by the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectKind::Sticky => "sticky",
            AspectKind::Fragile => "fragile",
            AspectKind::Consequence(ConsequenceSeverity::Mild) => "mild",
            AspectKind::Consequence(ConsequenceSeverity::Moderate) => "moderate",
            AspectKind::Consequence(ConsequenceSeverity::Severe) => "severe",
            AspectKind::Consequence(ConsequenceSeverity::Extreme) => "extreme",
        }
    }
}

impl fmt::Display for AspectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AspectKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sticky" => Ok(AspectKind::Sticky),
            "fragile" => Ok(AspectKind::Fragile),
            "mild" => Ok(AspectKind::Consequence(ConsequenceSeverity::Mild)),
            "moderate" => Ok(AspectKind::Consequence(ConsequenceSeverity::Moderate)),
            "severe" => Ok(AspectKind::Consequence(ConsequenceSeverity::Severe)),
            "extreme" => Ok(AspectKind::Consequence(ConsequenceSeverity::Extreme)),
            other => Err(DomainError::parse(format!("Unknown aspect kind: {}", other))),
        }
    }
}

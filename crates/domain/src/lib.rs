//! Fatebot Domain - value objects and invariants for Fate table play.
//!
//! Pure types only: no I/O, no randomness source, no async. Randomness is
//! injected by the engine through closures.

pub mod error;
pub mod game_systems;
pub mod roster;
pub mod value_objects;

pub use error::DomainError;

pub use game_systems::{AspectKind, ConsequenceSeverity, LadderRating};

pub use roster::EntityRoster;

pub use value_objects::{
    parse_bonuses, Bonus, BonusParseError, FateDie, FateRoll, FATE_DICE_COUNT,
};

//! Value objects - Immutable objects defined by their attributes

mod dice;

pub use dice::{parse_bonuses, Bonus, BonusParseError, FateDie, FateRoll, FATE_DICE_COUNT};

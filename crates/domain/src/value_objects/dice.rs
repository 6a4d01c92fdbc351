//! Fate dice rolling value objects and bonus parsing
//!
//! A Fate roll is four Fudge dice (each -1, 0 or +1) plus any number of
//! bonuses picked out of free-form text such as "+2 for the aspect, -1 hurt".

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::game_systems::LadderRating;

/// Number of Fudge dice in a Fate roll.
pub const FATE_DICE_COUNT: usize = 4;

/// Largest magnitude a single `+N`/`-N` token may carry.
pub const MAX_BONUS: i32 = 99;

/// Largest magnitude the bonuses on one roll may add up to, amendments included.
pub const MAX_BONUS_TOTAL: i32 = 999;

/// Error when parsing bonus tokens out of free text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BonusParseError {
    /// A `+N`/`-N` token larger than [`MAX_BONUS`]
    #[error("Bonus out of range: {0} (at most {max} either way)", max = MAX_BONUS)]
    Overflow(String),
    /// The bonuses on one roll add up past [`MAX_BONUS_TOTAL`]
    #[error("Bonuses add up to more than {max} either way", max = MAX_BONUS_TOTAL)]
    TotalOutOfRange,
}

/// One face of a Fudge die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FateDie {
    Minus,
    Blank,
    Plus,
}

impl FateDie {
    /// Map a drawn value to a face. Anything outside -1..=1 is clamped by sign.
    pub fn from_value(value: i32) -> Self {
        match value.signum() {
            -1 => FateDie::Minus,
            0 => FateDie::Blank,
            _ => FateDie::Plus,
        }
    }

    pub fn value(self) -> i32 {
        match self {
            FateDie::Minus => -1,
            FateDie::Blank => 0,
            FateDie::Plus => 1,
        }
    }

    /// Chat symbol for this face.
    pub fn symbol(self) -> &'static str {
        match self {
            FateDie::Minus => "[-]",
            FateDie::Blank => "[ ]",
            FateDie::Plus => "[+]",
        }
    }
}

/// A signed bonus token such as `+2` or `-1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bonus(i32);

impl Bonus {
    pub fn new(value: i32) -> Self {
        Self(value)
    }

    pub fn value(self) -> i32 {
        self.0
    }
}

impl fmt::Display for Bonus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 < 0 {
            write!(f, "-{}", self.0.unsigned_abs())
        } else {
            write!(f, "+{}", self.0)
        }
    }
}

/// Extract every `+N` / `-N` token from free text, in order of appearance.
///
/// Text between tokens is ignored, so "+2 aspect -1 wounded" yields `[+2, -1]`.
/// A sign with no digits after it is not a token. Tokens above [`MAX_BONUS`]
/// and lists adding up past [`MAX_BONUS_TOTAL`] are rejected.
pub fn parse_bonuses(text: &str) -> Result<Vec<Bonus>, BonusParseError> {
    let mut bonuses = Vec::new();
    let bytes = text.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        let sign = match bytes[i] {
            b'+' => 1,
            b'-' => -1,
            _ => {
                i += 1;
                continue;
            }
        };

        let digits_start = i + 1;
        let mut end = digits_start;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }

        if end == digits_start {
            i += 1;
            continue;
        }

        let token = &text[i..end];
        let magnitude = text[digits_start..end]
            .parse::<i32>()
            .ok()
            .filter(|magnitude| *magnitude <= MAX_BONUS)
            .ok_or_else(|| BonusParseError::Overflow(token.to_string()))?;
        bonuses.push(Bonus(sign * magnitude));
        i = end;
    }

    check_total(&bonuses)?;
    Ok(bonuses)
}

fn sum_bonuses(bonuses: &[Bonus]) -> i32 {
    bonuses
        .iter()
        .fold(0i32, |total, bonus| total.saturating_add(bonus.value()))
}

fn check_total(bonuses: &[Bonus]) -> Result<(), BonusParseError> {
    if sum_bonuses(bonuses).unsigned_abs() > MAX_BONUS_TOTAL.unsigned_abs() {
        return Err(BonusParseError::TotalOutOfRange);
    }
    Ok(())
}

/// A Fate roll: four faces, the bonuses applied so far and the running total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FateRoll {
    faces: [FateDie; FATE_DICE_COUNT],
    bonuses: Vec<Bonus>,
}

impl FateRoll {
    /// Roll four dice. `draw` must return a value in -1..=1 for each die;
    /// randomness is injected so callers (and tests) control it.
    pub fn roll(mut draw: impl FnMut() -> i32, bonuses: Vec<Bonus>) -> Self {
        let faces = std::array::from_fn(|_| FateDie::from_value(draw()));
        Self { faces, bonuses }
    }

    pub fn from_faces(faces: [FateDie; FATE_DICE_COUNT], bonuses: Vec<Bonus>) -> Self {
        Self { faces, bonuses }
    }

    pub fn faces(&self) -> &[FateDie; FATE_DICE_COUNT] {
        &self.faces
    }

    pub fn bonuses(&self) -> &[Bonus] {
        &self.bonuses
    }

    /// Sum of the dice alone.
    pub fn base_total(&self) -> i32 {
        self.faces.iter().map(|face| face.value()).sum()
    }

    pub fn bonus_total(&self) -> i32 {
        sum_bonuses(&self.bonuses)
    }

    /// Dice plus every bonus applied so far.
    pub fn running_total(&self) -> i32 {
        self.base_total().saturating_add(self.bonus_total())
    }

    /// Append further bonuses. Amending is cumulative, never a replacement.
    ///
    /// The roll is left untouched if the new total would pass [`MAX_BONUS_TOTAL`].
    pub fn amend(
        &mut self,
        more: impl IntoIterator<Item = Bonus>,
    ) -> Result<(), BonusParseError> {
        let mut bonuses = self.bonuses.clone();
        bonuses.extend(more);
        check_total(&bonuses)?;
        self.bonuses = bonuses;
        Ok(())
    }

    /// Ladder descriptor for the running total, if it is on the ladder.
    pub fn ladder(&self) -> Option<LadderRating> {
        LadderRating::from_value(self.running_total())
    }

    /// Render as "[+][-][ ][+] 1 +2 -1 = 2".
    pub fn formula(&self) -> String {
        let faces: String = self.faces.iter().map(|face| face.symbol()).collect();
        let mut out = format!("{} {}", faces, self.base_total());
        for bonus in &self.bonuses {
            out.push(' ');
            out.push_str(&bonus.to_string());
        }
        out.push_str(&format!(" = {}", self.running_total()));
        out
    }
}

impl fmt::Display for FateRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.formula())?;
        if let Some(rating) = self.ladder() {
            write!(f, " ({})", rating.descriptor())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn faces(values: [i32; 4]) -> [FateDie; 4] {
        values.map(FateDie::from_value)
    }

    #[test]
    fn test_parse_bonuses_in_order() {
        let bonuses = parse_bonuses("+2 for the aspect -1 wounded").unwrap();
        assert_eq!(bonuses, vec![Bonus::new(2), Bonus::new(-1)]);
    }

    #[test]
    fn test_parse_bonuses_ignores_bare_signs() {
        let bonuses = parse_bonuses("fight - with a + sword +3").unwrap();
        assert_eq!(bonuses, vec![Bonus::new(3)]);
    }

    #[test]
    fn test_parse_bonuses_empty_text() {
        assert!(parse_bonuses("").unwrap().is_empty());
        assert!(parse_bonuses("no bonuses here").unwrap().is_empty());
    }

    #[test]
    fn test_parse_bonuses_adjacent_tokens() {
        let bonuses = parse_bonuses("+1+2-3").unwrap();
        assert_eq!(
            bonuses,
            vec![Bonus::new(1), Bonus::new(2), Bonus::new(-3)]
        );
    }

    #[test]
    fn test_parse_bonuses_overflow() {
        assert!(matches!(
            parse_bonuses("+99999999999"),
            Err(BonusParseError::Overflow(_))
        ));
    }

    #[test]
    fn test_parse_bonuses_caps_each_token() {
        assert_eq!(parse_bonuses("+99 -99").unwrap(), vec![Bonus::new(99), Bonus::new(-99)]);
        assert_eq!(
            parse_bonuses("+2147483647 +1"),
            Err(BonusParseError::Overflow("+2147483647".into()))
        );
        assert_eq!(
            parse_bonuses("-100"),
            Err(BonusParseError::Overflow("-100".into()))
        );
    }

    #[test]
    fn test_parse_bonuses_caps_the_total() {
        let within = "+99 ".repeat(10);
        assert_eq!(parse_bonuses(&within).unwrap().len(), 10);

        let past = "+99 ".repeat(11);
        assert_eq!(parse_bonuses(&past), Err(BonusParseError::TotalOutOfRange));
    }

    #[test]
    fn test_amend_past_total_cap_leaves_roll_untouched() {
        let mut roll = FateRoll::from_faces(faces([1, 1, 1, 1]), vec![Bonus::new(99)]);
        for _ in 0..9 {
            roll.amend([Bonus::new(99)]).unwrap();
        }
        assert_eq!(roll.running_total(), 4 + 990);

        assert_eq!(
            roll.amend([Bonus::new(99)]),
            Err(BonusParseError::TotalOutOfRange)
        );
        assert_eq!(roll.bonuses().len(), 10);
        assert_eq!(roll.running_total(), 994);
    }

    #[test]
    fn test_totals_saturate_instead_of_wrapping() {
        let roll = FateRoll::from_faces(
            faces([1, 1, 1, 1]),
            vec![Bonus::new(i32::MAX), Bonus::new(1)],
        );
        assert_eq!(roll.bonus_total(), i32::MAX);
        assert_eq!(roll.running_total(), i32::MAX);
    }

    #[test]
    fn test_bonus_display() {
        assert_eq!(Bonus::new(2).to_string(), "+2");
        assert_eq!(Bonus::new(-1).to_string(), "-1");
        assert_eq!(Bonus::new(0).to_string(), "+0");
    }

    #[test]
    fn test_die_from_value_clamps() {
        assert_eq!(FateDie::from_value(-5), FateDie::Minus);
        assert_eq!(FateDie::from_value(0), FateDie::Blank);
        assert_eq!(FateDie::from_value(3), FateDie::Plus);
    }

    #[test]
    fn test_roll_uses_injected_draws() {
        let mut draws = vec![1, -1, 0, 1].into_iter();
        let roll = FateRoll::roll(|| draws.next().unwrap_or(0), vec![Bonus::new(2)]);
        assert_eq!(roll.faces(), &faces([1, -1, 0, 1]));
        assert_eq!(roll.base_total(), 1);
        assert_eq!(roll.running_total(), 3);
    }

    #[test]
    fn test_amend_is_cumulative() {
        let mut roll = FateRoll::from_faces(faces([1, 1, 0, 0]), vec![]);
        roll.amend([Bonus::new(2)]).unwrap();
        roll.amend([Bonus::new(-1)]).unwrap();
        assert_eq!(roll.bonuses(), &[Bonus::new(2), Bonus::new(-1)]);
        assert_eq!(roll.running_total(), roll.base_total() + 2 - 1);
    }

    #[test]
    fn test_formula_rendering() {
        let roll = FateRoll::from_faces(
            faces([1, -1, 0, 1]),
            vec![Bonus::new(2), Bonus::new(-1)],
        );
        assert_eq!(roll.formula(), "[+][-][ ][+] 1 +2 -1 = 2");
        assert_eq!(roll.to_string(), "[+][-][ ][+] 1 +2 -1 = 2 (Fair)");
    }

    #[test]
    fn test_off_ladder_total_has_no_descriptor() {
        let roll = FateRoll::from_faces(faces([-1, -1, -1, -1]), vec![]);
        assert_eq!(roll.to_string(), "[-][-][-][-] -4 = -4");
    }
}

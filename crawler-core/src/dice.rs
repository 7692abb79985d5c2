//! Dice rolling system.
//!
//! Supports the multi-dice notation used throughout trait definitions:
//! `NdS[+offset]` with a case-insensitive `d`, plus d20 rolls with
//! advantage/disadvantage.
//!
//! The lenient helpers (`roll_multi_dice`, `max_roll`, `change_qty_of_dice`,
//! ...) never fail. Malformed notation is logged and replaced with a safe
//! default so a bad content string can never stall a turn.

use lazy_static::lazy_static;
use rand::rngs::{StdRng, ThreadRng};
use rand::Rng;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error type for strict dice parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceError {
    #[error("Invalid dice notation: {0}")]
    InvalidNotation(String),
    #[error("Invalid die size: {0}")]
    InvalidDieSize(u32),
}

/// Largest number of dice one expression may roll.
pub const MAX_DICE_QTY: u32 = 10_000;

/// Largest die size one expression may use.
pub const MAX_DIE_SIDES: u32 = 10_000;

lazy_static! {
    static ref MULTI_DICE: Regex =
        Regex::new(r"^\s*(\d+)\s*[dD]\s*(\d+)\s*(?:\+\s*(\d+))?\s*$").expect("valid dice pattern");
}

// ============================================================================
// Rollers
// ============================================================================

/// Source of die faces.
///
/// Every rolling operation in the crate goes through this trait so that
/// encounters can be replayed from a seed or scripted in tests.
pub trait DieRoller {
    /// Roll a single die, returning a face in `[1, sides]`.
    fn roll_die(&mut self, sides: u32) -> u32;
}

impl DieRoller for ThreadRng {
    fn roll_die(&mut self, sides: u32) -> u32 {
        self.gen_range(1..=sides.max(1))
    }
}

impl DieRoller for StdRng {
    fn roll_die(&mut self, sides: u32) -> u32 {
        self.gen_range(1..=sides.max(1))
    }
}

/// Advantage state for d20 rolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Advantage {
    #[default]
    Normal,
    Advantage,
    Disadvantage,
}

impl Advantage {
    /// Combine two advantage states (advantage + disadvantage = normal).
    pub fn combine(self, other: Advantage) -> Advantage {
        match (self, other) {
            (Advantage::Normal, x) | (x, Advantage::Normal) => x,
            (Advantage::Advantage, Advantage::Disadvantage) => Advantage::Normal,
            (Advantage::Disadvantage, Advantage::Advantage) => Advantage::Normal,
            (Advantage::Advantage, Advantage::Advantage) => Advantage::Advantage,
            (Advantage::Disadvantage, Advantage::Disadvantage) => Advantage::Disadvantage,
        }
    }
}

/// Roll a d20, rolling twice and keeping the better/worse face when the
/// roll has advantage/disadvantage.
pub fn roll_d20_with(roller: &mut impl DieRoller, advantage: Advantage) -> u32 {
    let first = roller.roll_die(20);
    match advantage {
        Advantage::Normal => first,
        Advantage::Advantage => first.max(roller.roll_die(20)),
        Advantage::Disadvantage => first.min(roller.roll_die(20)),
    }
}

// ============================================================================
// Dice details
// ============================================================================

/// A parsed `NdS+offset` expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceDetails {
    pub qty: u32,
    pub sides: u32,
    pub offset: i32,
}

impl DiceDetails {
    pub fn new(qty: u32, sides: u32, offset: i32) -> Self {
        Self { qty, sides, offset }
    }

    /// Parse strict `NdS[+offset]` notation.
    pub fn parse(notation: &str) -> Result<Self, DiceError> {
        let caps = MULTI_DICE
            .captures(notation)
            .ok_or_else(|| DiceError::InvalidNotation(notation.to_string()))?;

        let invalid = || DiceError::InvalidNotation(notation.to_string());
        let qty: u32 = caps[1].parse().map_err(|_| invalid())?;
        let sides: u32 = caps[2].parse().map_err(|_| invalid())?;
        let offset: i32 = caps
            .get(3)
            .map(|m| m.as_str().parse::<i32>())
            .transpose()
            .map_err(|_| invalid())?
            .unwrap_or(0);

        if sides == 0 {
            return Err(DiceError::InvalidDieSize(sides));
        }
        if qty > MAX_DICE_QTY || sides > MAX_DIE_SIDES {
            return Err(invalid());
        }

        Ok(Self { qty, sides, offset })
    }

    /// The highest total these dice can produce.
    pub fn max_roll(&self) -> i32 {
        let dice_total = i64::from(self.qty).saturating_mul(i64::from(self.sides));
        clamp_to_i32(dice_total.saturating_add(i64::from(self.offset)))
    }

    /// Roll every die and add the offset.
    pub fn roll_with(&self, roller: &mut impl DieRoller) -> i32 {
        let dice_total = (0..self.qty).fold(0i64, |total, _| {
            total.saturating_add(i64::from(roller.roll_die(self.sides)))
        });
        clamp_to_i32(dice_total.saturating_add(i64::from(self.offset)))
    }
}

fn clamp_to_i32(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

impl Default for DiceDetails {
    fn default() -> Self {
        Self::new(1, 1, 0)
    }
}

impl FromStr for DiceDetails {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DiceDetails::parse(s)
    }
}

impl fmt::Display for DiceDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.offset == 0 {
            write!(f, "{}D{}", self.qty, self.sides)
        } else {
            write!(f, "{}D{}+{}", self.qty, self.sides, self.offset)
        }
    }
}

// ============================================================================
// Lenient helpers
// ============================================================================

/// Roll a single die with the thread RNG.
pub fn roll_dice(sides: u32) -> u32 {
    roll_dice_with(&mut rand::thread_rng(), sides)
}

/// Roll a single die. A zero-sided die yields 1.
pub fn roll_dice_with(roller: &mut impl DieRoller, sides: u32) -> u32 {
    if sides == 0 {
        return 1;
    }
    roller.roll_die(sides)
}

/// Whether `notation` is an `NdS[+offset]` expression.
pub fn is_multi_dice(notation: &str) -> bool {
    MULTI_DICE.is_match(notation)
}

/// Roll a multi-dice expression with the thread RNG.
pub fn roll_multi_dice(notation: &str) -> i32 {
    roll_multi_dice_with(&mut rand::thread_rng(), notation)
}

/// Roll a multi-dice expression.
///
/// Empty input yields 1. A bare integer is treated as the number of sides
/// of a single die. Malformed notation is logged and yields 1.
pub fn roll_multi_dice_with(roller: &mut impl DieRoller, notation: &str) -> i32 {
    let trimmed = notation.trim();
    if trimmed.is_empty() {
        return 1;
    }
    if let Ok(sides) = trimmed.parse::<i64>() {
        if sides <= 0 {
            if sides < 0 {
                tracing::error!(notation, "negative die size");
            }
            return 1;
        }
        return match u32::try_from(sides) {
            Ok(sides) if sides <= MAX_DIE_SIDES => roll_dice_with(roller, sides) as i32,
            _ => {
                tracing::error!(notation, "die size too large");
                1
            }
        };
    }
    match DiceDetails::parse(trimmed) {
        Ok(details) => details.roll_with(roller),
        Err(err) => {
            tracing::error!(notation, %err, "unable to roll dice");
            1
        }
    }
}

/// Highest possible result of `notation`; 1 for empty or malformed input.
pub fn max_roll(notation: &str) -> i32 {
    let trimmed = notation.trim();
    if trimmed.is_empty() {
        return 1;
    }
    if let Ok(sides) = trimmed.parse::<i32>() {
        return if sides > 0 { sides } else { 1 };
    }
    match DiceDetails::parse(trimmed) {
        Ok(details) => details.max_roll(),
        Err(err) => {
            tracing::error!(notation, %err, "unable to compute maximum roll");
            1
        }
    }
}

/// Parse `notation`, logging and falling back to `1D1` when malformed.
pub fn get_dice_details(notation: &str) -> DiceDetails {
    DiceDetails::parse(notation).unwrap_or_else(|err| {
        tracing::error!(notation, %err, "invalid dice details");
        DiceDetails::default()
    })
}

/// Format dice details; a zero offset is omitted.
pub fn get_dice_details_as_string(details: &DiceDetails) -> String {
    details.to_string()
}

/// Adjust the number of dice by `delta`, staying within `0..=MAX_DICE_QTY`.
pub fn change_qty_of_dice(notation: &str, delta: i32) -> String {
    let mut details = get_dice_details(notation);
    details.qty = details.qty.saturating_add_signed(delta).min(MAX_DICE_QTY);
    details.to_string()
}

/// Whichever expression has the larger maximum roll; ties go to `a`.
pub fn biggest_multi_dice<'a>(a: &'a str, b: &'a str) -> &'a str {
    if max_roll(b) > max_roll(a) {
        b
    } else {
        a
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedRoller;
    use rand::SeedableRng;

    #[test]
    fn test_roll_dice_reaches_bounds() {
        let mut rng = StdRng::seed_from_u64(7);
        let rolls: Vec<u32> = (0..2000).map(|_| roll_dice_with(&mut rng, 6)).collect();
        assert!(rolls.iter().all(|r| (1..=6).contains(r)));
        assert_eq!(rolls.iter().min(), Some(&1));
        assert_eq!(rolls.iter().max(), Some(&6));
    }

    #[test]
    fn test_is_multi_dice() {
        assert!(is_multi_dice("2D6"));
        assert!(is_multi_dice("2d6+3"));
        assert!(is_multi_dice(" 1 d 8 +  2 "));
        assert!(!is_multi_dice("12"));
        assert!(!is_multi_dice("D6"));
        assert!(!is_multi_dice("2D6-1"));
        assert!(!is_multi_dice("SWORD"));
    }

    #[test]
    fn test_roll_multi_dice_range() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let total = roll_multi_dice_with(&mut rng, "3D4+2");
            assert!((5..=14).contains(&total));
        }
        assert_eq!(max_roll("3D4+2"), 14);
    }

    #[test]
    fn test_roll_multi_dice_sums_faces() {
        let mut roller = ScriptedRoller::new([3, 5]);
        assert_eq!(roll_multi_dice_with(&mut roller, "2d6+1"), 9);
    }

    #[test]
    fn test_roll_multi_dice_degenerate_input() {
        let mut roller = ScriptedRoller::new([4]);
        assert_eq!(roll_multi_dice_with(&mut roller, ""), 1);
        assert_eq!(roll_multi_dice_with(&mut roller, "0"), 1);
        assert_eq!(roll_multi_dice_with(&mut roller, "garbage"), 1);
        // A bare integer is a single die with that many sides.
        assert_eq!(roll_multi_dice_with(&mut roller, "8"), 4);
    }

    #[test]
    fn test_max_roll_defaults() {
        assert_eq!(max_roll(""), 1);
        assert_eq!(max_roll("nonsense"), 1);
        assert_eq!(max_roll("1D12"), 12);
        assert_eq!(max_roll("10"), 10);
    }

    #[test]
    fn test_dice_details_format() {
        let details = get_dice_details("2d8+3");
        assert_eq!(details, DiceDetails::new(2, 8, 3));
        assert_eq!(get_dice_details_as_string(&details), "2D8+3");
        assert_eq!(get_dice_details_as_string(&DiceDetails::new(1, 6, 0)), "1D6");
        assert_eq!(get_dice_details("bad"), DiceDetails::new(1, 1, 0));
    }

    #[test]
    fn test_strict_parse_errors() {
        assert!(matches!(
            DiceDetails::parse("XdY"),
            Err(DiceError::InvalidNotation(_))
        ));
        assert_eq!(DiceDetails::parse("1D0"), Err(DiceError::InvalidDieSize(0)));
    }

    #[test]
    fn test_change_qty_of_dice() {
        assert_eq!(change_qty_of_dice("2D6+1", 3), "5D6+1");
        assert_eq!(change_qty_of_dice("2D6", -5), "0D6");
        assert_eq!(max_roll(&change_qty_of_dice("2D6", -5)), 0);
        assert_eq!(change_qty_of_dice("2D6", i32::MIN), "0D6");

        let full = format!("{MAX_DICE_QTY}D6");
        assert_eq!(change_qty_of_dice(&full, 1), full);
        assert_eq!(change_qty_of_dice(&full, i32::MAX), full);
        // Beyond the limit the notation is malformed and degrades to 1D1.
        assert_eq!(change_qty_of_dice("4294967295D6", 1), "2D1");
    }

    #[test]
    fn test_huge_dice_degrade_instead_of_overflowing() {
        assert_eq!(max_roll("70000D70000"), 1);
        assert_eq!(max_roll("99999999999D6"), 1);
        assert_eq!(max_roll("1D6+3000000000"), 1);
        assert_eq!(max_roll("1D6+2147483647"), i32::MAX);
        assert_eq!(max_roll("10000D10000"), 100_000_000);
        assert!(matches!(
            DiceDetails::parse("70000D6"),
            Err(DiceError::InvalidNotation(_))
        ));
        assert!(matches!(
            DiceDetails::parse("1D6+3000000000"),
            Err(DiceError::InvalidNotation(_))
        ));

        let mut roller = ScriptedRoller::new([70000]);
        assert_eq!(roll_multi_dice_with(&mut roller, "70000D70000"), 1);
        assert_eq!(roll_multi_dice_with(&mut roller, "5000000000"), 1);
        assert_eq!(roller.rolls(), 0);

        let mut roller = ScriptedRoller::new([6]);
        assert_eq!(roll_multi_dice_with(&mut roller, "1D6+2147483647"), i32::MAX);
    }

    #[test]
    fn test_biggest_multi_dice() {
        assert_eq!(biggest_multi_dice("1D8", "2D4+1"), "2D4+1");
        assert_eq!(biggest_multi_dice("1D12", "2D4"), "1D12");
        assert_eq!(biggest_multi_dice("1D8", "2D4"), "1D8");
    }

    #[test]
    fn test_advantage_combine() {
        assert_eq!(
            Advantage::Normal.combine(Advantage::Advantage),
            Advantage::Advantage
        );
        assert_eq!(
            Advantage::Advantage.combine(Advantage::Disadvantage),
            Advantage::Normal
        );
    }

    #[test]
    fn test_d20_with_disadvantage_keeps_lower() {
        let mut roller = ScriptedRoller::new([17, 4]);
        assert_eq!(roll_d20_with(&mut roller, Advantage::Disadvantage), 4);

        let mut roller = ScriptedRoller::new([17, 4]);
        assert_eq!(roll_d20_with(&mut roller, Advantage::Advantage), 17);
    }
}

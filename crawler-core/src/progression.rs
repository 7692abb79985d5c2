//! Character advancement tables.
//!
//! Experience thresholds, proficiency bonuses and challenge-rating rewards
//! follow the SRD advancement table exactly.

use serde::{Deserialize, Serialize};

/// Minimum experience for each level, indexed by `level - 1`.
pub const LEVEL_THRESHOLDS: [i32; 20] = [
    0, 300, 900, 2700, 6500, 14000, 23000, 34000, 48000, 64000, 85000, 100000, 120000, 140000,
    165000, 195000, 225000, 265000, 305000, 355000,
];

/// Levels at which a character earns two ability points.
pub const ABILITY_IMPROVEMENT_LEVELS: [u32; 5] = [4, 8, 12, 16, 19];

/// Points awarded at each ability improvement level.
pub const POINTS_PER_IMPROVEMENT: i32 = 2;

/// Ability scores never climb above this through improvements.
pub const MAX_IMPROVED_ABILITY: i32 = 20;

/// Challenge rating breakpoints and their XP rewards.
const CR_XP: [(f64, i32); 34] = [
    (0.0, 10),
    (0.125, 25),
    (0.25, 50),
    (0.5, 100),
    (1.0, 200),
    (2.0, 450),
    (3.0, 700),
    (4.0, 1100),
    (5.0, 1800),
    (6.0, 2300),
    (7.0, 2900),
    (8.0, 3900),
    (9.0, 5000),
    (10.0, 5900),
    (11.0, 7200),
    (12.0, 8400),
    (13.0, 10000),
    (14.0, 11500),
    (15.0, 13000),
    (16.0, 15000),
    (17.0, 18000),
    (18.0, 20000),
    (19.0, 22000),
    (20.0, 25000),
    (21.0, 33000),
    (22.0, 41000),
    (23.0, 50000),
    (24.0, 62000),
    (25.0, 75000),
    (26.0, 90000),
    (27.0, 105000),
    (28.0, 120000),
    (29.0, 135000),
    (30.0, 155000),
];

/// Level and proficiency bonus derived from experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelAndProficiency {
    pub level: u32,
    pub prof_bonus: i32,
}

/// Proficiency bonus for a character level: +2 at levels 1-4, rising by one
/// every four levels.
pub fn proficiency_bonus_for_level(level: u32) -> i32 {
    let level = level.clamp(1, 20) as i32;
    2 + (level - 1) / 4
}

/// Look up level and proficiency bonus for an experience total.
pub fn get_level_and_prof_bonus_from_exp(exp: i32) -> LevelAndProficiency {
    let level = LEVEL_THRESHOLDS
        .iter()
        .take_while(|threshold| exp >= **threshold)
        .count()
        .max(1) as u32;

    LevelAndProficiency {
        level,
        prof_bonus: proficiency_bonus_for_level(level),
    }
}

/// XP awarded for defeating a creature of challenge rating `cr`.
///
/// Ratings between breakpoints use the highest breakpoint not above them.
pub fn get_xp_from_cr(cr: f64) -> i32 {
    if !cr.is_finite() || cr < 0.0 {
        tracing::warn!(cr, "invalid challenge rating");
        return CR_XP[0].1;
    }
    CR_XP
        .iter()
        .rev()
        .find(|(rating, _)| cr >= *rating)
        .map(|(_, xp)| *xp)
        .unwrap_or(CR_XP[0].1)
}

/// Parse a challenge rating such as `"4"`, `"0.25"` or `"1/8"`.
pub fn parse_challenge_rating(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    match raw.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            (den != 0.0).then(|| num / den)
        }
        None => raw.parse().ok(),
    }
}

/// Number of ability improvement levels reached at `level`.
pub fn ability_improvements_at_level(level: u32) -> u32 {
    ABILITY_IMPROVEMENT_LEVELS
        .iter()
        .filter(|threshold| level >= **threshold)
        .count() as u32
}

//! Trait values and the per-key coercion rules of the trait-string language.

use crate::dice::{is_multi_dice, roll_multi_dice_with, DieRoller};
use crate::difficulty::Difficulty;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

lazy_static! {
    static ref LEADING_INT: Regex = Regex::new(r"^\s*([+-]?\d+)").expect("valid integer pattern");
    static ref LEADING_FLOAT: Regex =
        Regex::new(r"^\s*([+-]?(?:\d+\.?\d*|\.\d+))").expect("valid float pattern");
    static ref VALUE_WITH_CURRENCY: Regex =
        Regex::new(r"^(.*?)\s*([A-Z]{2})?$").expect("valid currency pattern");
}

/// Currency used when a `VALUE` omits its code.
pub const DEFAULT_CURRENCY: &str = "GP";

/// A single trait value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TraitValue {
    Bool(bool),
    Int(i32),
    Float(f64),
    Text(String),
    List(Vec<String>),
}

impl TraitValue {
    /// Integer view of the value. Text is read up to the first non-digit, so
    /// `"10 GP"` reads as 10 and `"+1"` as 1.
    pub fn as_int(&self) -> Option<i32> {
        match self {
            TraitValue::Int(n) => Some(*n),
            TraitValue::Float(f) if f.is_finite() => Some(f.trunc() as i32),
            TraitValue::Text(s) => LEADING_INT
                .captures(s)
                .and_then(|caps| caps[1].parse().ok()),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            TraitValue::Int(n) => Some(*n as f64),
            TraitValue::Float(f) => Some(*f),
            TraitValue::Text(s) => LEADING_FLOAT
                .captures(s)
                .and_then(|caps| caps[1].parse().ok()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> bool {
        match self {
            TraitValue::Bool(b) => *b,
            TraitValue::Int(n) => *n != 0,
            TraitValue::Float(f) => *f != 0.0,
            TraitValue::Text(s) => parse_bool(s).unwrap_or(!s.is_empty()),
            TraitValue::List(items) => !items.is_empty(),
        }
    }

    /// List view; text is split on `&`.
    pub fn as_list(&self) -> Vec<String> {
        match self {
            TraitValue::List(items) => items.clone(),
            TraitValue::Text(s) => split_list(s),
            other => vec![other.to_string()],
        }
    }
}

impl fmt::Display for TraitValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraitValue::Bool(true) => write!(f, "TRUE"),
            TraitValue::Bool(false) => write!(f, "FALSE"),
            TraitValue::Int(n) => write!(f, "{n}"),
            // Keep a decimal point so the value parses back as a float.
            TraitValue::Float(x) if x.fract() == 0.0 && x.is_finite() => write!(f, "{x:.1}"),
            TraitValue::Float(x) => write!(f, "{x}"),
            TraitValue::Text(s) => write!(f, "{s}"),
            TraitValue::List(items) => write!(f, "{}", items.join("&")),
        }
    }
}

impl From<bool> for TraitValue {
    fn from(value: bool) -> Self {
        TraitValue::Bool(value)
    }
}

impl From<i32> for TraitValue {
    fn from(value: i32) -> Self {
        TraitValue::Int(value)
    }
}

impl From<f64> for TraitValue {
    fn from(value: f64) -> Self {
        TraitValue::Float(value)
    }
}

impl From<&str> for TraitValue {
    fn from(value: &str) -> Self {
        TraitValue::Text(value.to_string())
    }
}

impl From<String> for TraitValue {
    fn from(value: String) -> Self {
        TraitValue::Text(value)
    }
}

impl From<Vec<String>> for TraitValue {
    fn from(value: Vec<String>) -> Self {
        TraitValue::List(value)
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_uppercase().as_str() {
        "YES" | "TRUE" => Some(true),
        "NO" | "FALSE" => Some(false),
        _ => None,
    }
}

fn split_list(s: &str) -> Vec<String> {
    s.split('&')
        .map(|item| item.trim().to_uppercase())
        .filter(|item| !item.is_empty())
        .collect()
}

// ============================================================================
// Coercion rules
// ============================================================================

/// Convert the raw text of a trait definition into a typed value.
///
/// Keys are matched case-insensitively and with or without a leading
/// underscore. Values are uppercased except for `NAME` and `REWARD`.
pub fn parse_trait_value(key: &str, raw: &str, roller: &mut impl DieRoller) -> TraitValue {
    let key = key.trim().to_uppercase();
    let raw = raw.trim();

    if key == "NAME" || key == "REWARD" {
        return TraitValue::Text(raw.to_string());
    }

    let value = raw.to_uppercase();
    match key.strip_prefix('_').unwrap_or(key.as_str()) {
        "PROF" => TraitValue::List(split_list(&value)),
        "VALUE" => TraitValue::Text(parse_value_with_currency(&value, roller)),
        "DMG" | "DMG_POISON" | "HP_GAIN" => parse_damage_formula(&key, &value),
        "HIT_DICE" => {
            if is_multi_dice(&value) {
                TraitValue::Text(value)
            } else {
                tracing::error!(key = %key, value = %value, "hit dice must be a dice expression");
                TraitValue::Text("1D6".to_string())
            }
        }
        "DC" | "IDENTIFY_DC" => TraitValue::Int(parse_difficulty(&value)),
        _ => parse_default(&value, roller),
    }
}

fn parse_value_with_currency(value: &str, roller: &mut impl DieRoller) -> String {
    let parsed = VALUE_WITH_CURRENCY.captures(value).and_then(|caps| {
        let amount = caps.get(1).map(|m| m.as_str().trim()).unwrap_or_default();
        let code = caps.get(2).map(|m| m.as_str()).unwrap_or(DEFAULT_CURRENCY);
        let amount = if is_multi_dice(amount) {
            Some(roll_multi_dice_with(roller, amount))
        } else {
            amount.parse::<i32>().ok()
        };
        amount.map(|n| format!("{n} {code}"))
    });

    parsed.unwrap_or_else(|| {
        tracing::error!(value, "invalid VALUE, defaulting to 0 {}", DEFAULT_CURRENCY);
        format!("0 {DEFAULT_CURRENCY}")
    })
}

fn parse_damage_formula(key: &str, value: &str) -> TraitValue {
    if is_multi_dice(value) {
        return TraitValue::Text(value.to_string());
    }
    match value.parse::<i32>() {
        Ok(n) => TraitValue::Int(n),
        Err(_) => {
            tracing::error!(key, value, "damage is neither dice nor a number, defaulting to 0");
            TraitValue::Int(0)
        }
    }
}

fn parse_difficulty(value: &str) -> i32 {
    if let Ok(dc) = value.parse::<i32>() {
        return dc;
    }
    Difficulty::from_name(value)
        .map(|d| d.dc())
        .unwrap_or_else(|| {
            tracing::warn!(value, "unknown difficulty, defaulting to 1");
            1
        })
}

fn parse_default(value: &str, roller: &mut impl DieRoller) -> TraitValue {
    if let Some(b) = parse_bool(value) {
        return TraitValue::Bool(b);
    }
    if is_multi_dice(value) {
        return TraitValue::Int(roll_multi_dice_with(roller, value));
    }
    // An explicit plus sign is meaningful (additive armour), keep it as text.
    if !value.starts_with('+') {
        if let Ok(n) = value.parse::<i32>() {
            return TraitValue::Int(n);
        }
        if value.contains('.') {
            if let Ok(x) = value.parse::<f64>() {
                return TraitValue::Float(x);
            }
        }
    }
    TraitValue::Text(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedRoller;

    fn parse(key: &str, raw: &str) -> TraitValue {
        parse_trait_value(key, raw, &mut ScriptedRoller::new([3, 4, 5]))
    }

    #[test]
    fn test_prof_list() {
        assert_eq!(
            parse("prof", "simple weapons & light armour&"),
            TraitValue::List(vec!["SIMPLE WEAPONS".into(), "LIGHT ARMOUR".into()])
        );
        assert!(matches!(parse("_PROF", "stealth"), TraitValue::List(_)));
    }

    #[test]
    fn test_value_rolls_dice_once() {
        assert_eq!(parse("VALUE", "2d6 sp"), TraitValue::Text("7 SP".into()));
        assert_eq!(parse("VALUE", "25"), TraitValue::Text("25 GP".into()));
        assert_eq!(parse("_VALUE", "12 CP"), TraitValue::Text("12 CP".into()));
        assert_eq!(parse("VALUE", "lots"), TraitValue::Text("0 GP".into()));
    }

    #[test]
    fn test_damage_stays_formula() {
        assert_eq!(parse("DMG", "1d8"), TraitValue::Text("1D8".into()));
        assert_eq!(parse("DMG", "4"), TraitValue::Int(4));
        assert_eq!(parse("DMG", "sharp"), TraitValue::Int(0));
        assert_eq!(parse("HP_GAIN", "2D4+2"), TraitValue::Text("2D4+2".into()));
        assert_eq!(parse("DMG_POISON", "1D6"), TraitValue::Text("1D6".into()));
    }

    #[test]
    fn test_hit_dice_validation() {
        assert_eq!(parse("HIT_DICE", "3d10"), TraitValue::Text("3D10".into()));
        assert_eq!(parse("HIT_DICE", "ten"), TraitValue::Text("1D6".into()));
    }

    #[test]
    fn test_difficulty_keys() {
        assert_eq!(parse("DC", "13"), TraitValue::Int(13));
        assert_eq!(parse("DC", "hard"), TraitValue::Int(20));
        assert_eq!(parse("IDENTIFY_DC", "very_easy"), TraitValue::Int(5));
        assert_eq!(parse("DC", "mystery"), TraitValue::Int(1));
    }

    #[test]
    fn test_default_rules() {
        assert_eq!(parse("UNDEAD", "yes"), TraitValue::Bool(true));
        assert_eq!(parse("CURSED", "False"), TraitValue::Bool(false));
        // Dice outside the formula keys are rolled immediately.
        assert_eq!(parse("GOLD", "2D6"), TraitValue::Int(7));
        assert_eq!(parse("STR", "14"), TraitValue::Int(14));
        assert_eq!(parse("DMG_SAVED", "0.5"), TraitValue::Float(0.5));
        assert_eq!(parse("AC", "+1"), TraitValue::Text("+1".into()));
        assert_eq!(parse("TYPE", "light armour"), TraitValue::Text("LIGHT ARMOUR".into()));
    }

    #[test]
    fn test_oversized_dice_roll_to_one() {
        assert_eq!(parse("GOLD", "70000D70000"), TraitValue::Int(1));
        assert_eq!(parse("GOLD", "1D6+3000000000"), TraitValue::Int(1));
    }

    #[test]
    fn test_name_keeps_case() {
        assert_eq!(parse("name", "Sir Gawain"), TraitValue::Text("Sir Gawain".into()));
        assert_eq!(parse("REWARD", "Gold Key"), TraitValue::Text("Gold Key".into()));
    }

    #[test]
    fn test_numeric_views() {
        assert_eq!(TraitValue::Text("10 GP".into()).as_int(), Some(10));
        assert_eq!(TraitValue::Text("+2".into()).as_int(), Some(2));
        assert_eq!(TraitValue::Float(2.9).as_int(), Some(2));
        assert_eq!(TraitValue::Text("SWORD".into()).as_int(), None);
        assert_eq!(TraitValue::Text("0.25".into()).as_float(), Some(0.25));
        assert_eq!(TraitValue::Bool(true).as_int(), None);
    }

    #[test]
    fn test_display_round_trips_floats() {
        assert_eq!(TraitValue::Float(2.0).to_string(), "2.0");
        assert_eq!(TraitValue::Float(0.5).to_string(), "0.5");
        assert_eq!(
            TraitValue::List(vec!["A".into(), "B C".into()]).to_string(),
            "A&B C"
        );
    }
}

//! The trait store.
//!
//! A [`Traits`] value is an ordered, case-insensitive bag of named values
//! describing an actor, artefact or spell. It is usually built from a
//! definition string such as `"NAME:Short sword, DMG:1D6, TYPE=simple light"`
//! and read through defensive accessors that fall back to a caller-supplied
//! default instead of failing.
//!
//! A key and its underscore-prefixed form are aliases when reading: looking
//! up `PROF` finds `_PROF` when no plain `PROF` is stored.

mod value;

pub use value::{parse_trait_value, TraitValue, DEFAULT_CURRENCY};

use crate::ability::characteristic_to_modifier;
use crate::dice::DieRoller;
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

/// Feet covered by one map tile.
pub const FEET_PER_TILE: f64 = 7.5;

lazy_static! {
    static ref SEGMENT: Regex =
        Regex::new(r"^\s*([A-Za-z0-9_\-]+)\s*(?:[:=]|\s)\s*(.*?)\s*$").expect("valid segment pattern");
}

/// Errors from building a trait store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraitError {
    #[error("Malformed trait definition segment: {segment:?}")]
    MalformedDefinition { segment: String },
}

/// Convert a distance in feet to whole tiles.
pub fn feet_to_tiles(feet: f64) -> i32 {
    (feet / FEET_PER_TILE).round() as i32
}

fn normalize_key(key: &str) -> String {
    key.trim().to_uppercase()
}

/// Ordered key/value store of traits.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Traits {
    values: IndexMap<String, TraitValue>,
}

impl Traits {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a definition string, rolling any dice with the thread RNG.
    pub fn parse(definition: &str) -> Result<Self, TraitError> {
        Self::parse_with(definition, &mut rand::thread_rng())
    }

    /// Parse a comma-separated `KEY(:|=| )VALUE` definition string.
    ///
    /// Empty segments are skipped; any other segment that is not a key/value
    /// pair is an error.
    pub fn parse_with(definition: &str, roller: &mut impl DieRoller) -> Result<Self, TraitError> {
        let mut traits = Self::new();
        traits.extend_from_definition(definition, roller)?;
        Ok(traits)
    }

    /// Parse `definition` into this store, overwriting existing keys.
    pub fn extend_from_definition(
        &mut self,
        definition: &str,
        roller: &mut impl DieRoller,
    ) -> Result<(), TraitError> {
        for segment in definition.split(',') {
            if segment.trim().is_empty() {
                continue;
            }
            let caps = SEGMENT
                .captures(segment)
                .ok_or_else(|| TraitError::MalformedDefinition {
                    segment: segment.trim().to_string(),
                })?;
            self.set_from_string(&caps[1], &caps[2], roller);
        }
        Ok(())
    }

    /// Build a store from already typed pairs.
    pub fn from_pairs<K, I>(pairs: I) -> Self
    where
        K: AsRef<str>,
        I: IntoIterator<Item = (K, TraitValue)>,
    {
        let mut traits = Self::new();
        for (key, value) in pairs {
            traits.set(key.as_ref(), value);
        }
        traits
    }

    /// Set a key from raw definition text, applying the per-key coercion rules.
    pub fn set_from_string(&mut self, key: &str, raw: &str, roller: &mut impl DieRoller) {
        let value = parse_trait_value(key, raw, roller);
        self.set(key, value);
    }

    pub fn set(&mut self, key: &str, value: impl Into<TraitValue>) {
        self.values.insert(normalize_key(key), value.into());
    }

    /// The stored key that `key` resolves to: `KEY`, else `_KEY`.
    fn resolve_key(&self, key: &str) -> Option<String> {
        let key = normalize_key(key);
        if self.values.contains_key(&key) {
            return Some(key);
        }
        let alias = format!("_{key}");
        self.values.contains_key(&alias).then_some(alias)
    }

    pub fn get(&self, key: &str) -> Option<&TraitValue> {
        self.resolve_key(key).and_then(|k| self.values.get(&k))
    }

    pub fn has(&self, key: &str) -> bool {
        self.resolve_key(key).is_some()
    }

    pub fn get_string(&self, key: &str, default: &str) -> String {
        self.get(key)
            .map(|v| v.to_string())
            .unwrap_or_else(|| default.to_string())
    }

    pub fn get_int(&self, key: &str, default: i32) -> i32 {
        self.get(key).and_then(TraitValue::as_int).unwrap_or(default)
    }

    pub fn get_float(&self, key: &str, default: f64) -> f64 {
        self.get(key).and_then(TraitValue::as_float).unwrap_or(default)
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key).map(TraitValue::as_bool).unwrap_or(false)
    }

    pub fn get_list(&self, key: &str) -> Vec<String> {
        self.get(key).map(TraitValue::as_list).unwrap_or_default()
    }

    /// Ability modifier of an integer trait. `default` is the modifier
    /// returned when the trait is missing or not numeric.
    pub fn get_as_modifier(&self, key: &str, default: i32) -> i32 {
        self.get(key)
            .and_then(TraitValue::as_int)
            .map(characteristic_to_modifier)
            .unwrap_or(default)
    }

    /// Remove `key` and its underscore alias, returning the value that was
    /// visible through [`Traits::get`].
    pub fn delete(&mut self, key: &str) -> Option<TraitValue> {
        let key = normalize_key(key);
        let plain = self.values.shift_remove(&key);
        let alias = self.values.shift_remove(&format!("_{key}"));
        plain.or(alias)
    }

    /// Add `delta` to an integer trait, treating a missing value as 0.
    /// Returns the new value.
    pub fn add_int(&mut self, key: &str, delta: i32) -> i32 {
        let target = self.resolve_key(key).unwrap_or_else(|| normalize_key(key));
        let value = self.get_int(&target, 0).saturating_add(delta);
        self.values.insert(target, TraitValue::Int(value));
        value
    }

    /// Read a distance in feet and convert it to tiles.
    pub fn get_value_in_feet_in_tiles(&self, key: &str, default_feet: f64) -> i32 {
        feet_to_tiles(self.get_float(key, default_feet))
    }

    /// All traits in insertion order.
    pub fn all_traits(&self) -> impl Iterator<Item = (&str, &TraitValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// All traits ordered by key.
    pub fn all_traits_sorted(&self) -> Vec<(&str, &TraitValue)> {
        let mut traits: Vec<_> = self.all_traits().collect();
        traits.sort_by(|a, b| a.0.cmp(b.0));
        traits
    }

    /// Serialize to the `KEY:VALUE,...` definition format.
    pub fn values_to_string(&self) -> String {
        self.values
            .iter()
            .map(|(k, v)| format!("{k}:{v}"))
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

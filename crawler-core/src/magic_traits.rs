//! Spell definitions.
//!
//! A spell's damage and healing dice grow with the caster's level at the
//! rate given by its `DICE_PER_LEVEL` trait.

use crate::character::CharacterTraits;
use crate::dice::{change_qty_of_dice, is_multi_dice, DieRoller};
use crate::traits::{TraitError, Traits};
use std::ops::Deref;

/// Trait store describing a spell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MagicTraits {
    traits: Traits,
}

impl MagicTraits {
    pub fn new(traits: Traits) -> Self {
        Self { traits }
    }

    pub fn parse(definition: &str) -> Result<Self, TraitError> {
        Traits::parse(definition).map(Self::new)
    }

    pub fn parse_with(definition: &str, roller: &mut impl DieRoller) -> Result<Self, TraitError> {
        Traits::parse_with(definition, roller).map(Self::new)
    }

    pub fn traits(&self) -> &Traits {
        &self.traits
    }

    pub fn traits_mut(&mut self) -> &mut Traits {
        &mut self.traits
    }

    pub fn into_traits(self) -> Traits {
        self.traits
    }

    /// Spell level, at least 1.
    pub fn spell_level(&self) -> u32 {
        self.traits.get_int("LEVEL", 1).max(1) as u32
    }

    /// Additional dice earned by a caster of `caster_level`.
    pub fn extra_dice_for_level(&self, caster_level: u32) -> i32 {
        let rate = self.traits.get_float("DICE_PER_LEVEL", 0.0);
        (caster_level.saturating_sub(1) as f64 * rate).floor() as i32
    }

    pub fn get_damage_dice_when_cast_by(&self, caster: &CharacterTraits) -> Option<String> {
        self.scaled_dice("DMG", caster.level())
    }

    pub fn get_hp_gain_dice_when_cast_by(&self, caster: &CharacterTraits) -> Option<String> {
        self.scaled_dice("HP_GAIN", caster.level())
    }

    /// The formula under `key`, with extra dice for the caster level. Flat
    /// numbers are returned unchanged.
    fn scaled_dice(&self, key: &str, caster_level: u32) -> Option<String> {
        let base = self.traits.get(key)?.to_string();
        if !is_multi_dice(&base) {
            return Some(base);
        }
        let extra = self.extra_dice_for_level(caster_level);
        if extra == 0 {
            return Some(base);
        }
        Some(change_qty_of_dice(&base, extra))
    }
}

impl Deref for MagicTraits {
    type Target = Traits;

    fn deref(&self) -> &Traits {
        &self.traits
    }
}

impl From<Traits> for MagicTraits {
    fn from(traits: Traits) -> Self {
        Self::new(traits)
    }
}

//! Spell learning and casting power.
//!
//! Spell slots are replaced by a single casting power pool per character.
//! Each spell costs power according to its level, and the pool refills on a
//! long rest.

use crate::character::CharacterTraits;
use crate::traits::Traits;

/// Trait key holding the remaining casting power.
pub const CASTING_POWER_KEY: &str = "CASTING_POWER";

/// Highest spell level.
pub const MAX_SPELL_LEVEL: u32 = 9;

/// Spells without `MAX_TARGET_HP` can target anyone.
const DEFAULT_MAX_TARGET_HP: i32 = 999;

fn spell_level(spell: &Traits) -> u32 {
    spell.get_int("LEVEL", 1).max(1) as u32
}

/// Casting power a spell costs: levels 1-9 map onto 1-6.
pub fn get_spell_power(spell: &Traits) -> i32 {
    let level = spell_level(spell) as f64;
    (1.0 + 5.0 * (level - 1.0) / 8.0).round() as i32
}

/// Highest spell level a character of `character_level` can learn.
pub fn character_level_to_spell_level(character_level: u32) -> u32 {
    let level = character_level.max(1) as f64;
    let spell_level = (1.0 + 8.0 * (level - 1.0) / 16.0).round() as u32;
    spell_level.min(MAX_SPELL_LEVEL)
}

/// Whether `character` may learn `spell`: its level must be within reach
/// and, when the spell lists `CASTERS`, the character's class must be one of
/// them.
pub fn can_actor_learn_magic(character: &CharacterTraits, spell: &Traits) -> bool {
    if spell_level(spell) > character_level_to_spell_level(character.level()) {
        return false;
    }

    let casters = spell.get_string("CASTERS", "");
    let mut allowed = casters
        .split(|c: char| c == '&' || c.is_whitespace())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .peekable();
    if allowed.peek().is_none() {
        return true;
    }

    match character.class() {
        Some(class) => allowed.any(|name| name.eq_ignore_ascii_case(class.name())),
        None => false,
    }
}

/// Full casting power at `character_level`.
pub fn max_casting_power(character_level: u32) -> i32 {
    let level = character_level.max(1) as f64;
    (4.0 * (2.0 + 20.0 * (level - 1.0) / 19.0)).round() as i32
}

/// Remaining casting power, filling the pool the first time it is read.
pub fn get_casting_power(character: &mut CharacterTraits) -> i32 {
    if !character.has(CASTING_POWER_KEY) {
        restore_casting_power(character);
    }
    character.get_int(CASTING_POWER_KEY, 0)
}

/// Whether enough power remains to cast `spell`. Never mutates; an unread
/// pool counts as full.
pub fn can_cast_spell(character: &CharacterTraits, spell: &Traits) -> bool {
    let power = character.get_int(CASTING_POWER_KEY, max_casting_power(character.level()));
    power >= get_spell_power(spell)
}

/// Spend the power for `spell`, never going below zero. Returns what is
/// left.
pub fn use_casting_power(character: &mut CharacterTraits, spell: &Traits) -> i32 {
    let remaining = (get_casting_power(character) - get_spell_power(spell)).max(0);
    character.set(CASTING_POWER_KEY, remaining);
    tracing::debug!(name = %character.name(), remaining, "casting power spent");
    remaining
}

/// Refill the pool to its maximum for the character's level.
pub fn restore_casting_power(character: &mut CharacterTraits) {
    let power = max_casting_power(character.level());
    character.set(CASTING_POWER_KEY, power);
}

/// Bless-style spells only affect targets at or below `MAX_TARGET_HP`.
pub fn can_bless(spell: &Traits, target: &Traits) -> bool {
    target.get_int("HP", 0) <= spell.get_int("MAX_TARGET_HP", DEFAULT_MAX_TARGET_HP)
}

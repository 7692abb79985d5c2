//! Attacks, poison, spells and healing.

use super::{hp_shortfall, roll_formula};
use crate::attack::AttackDetail;
use crate::character::CharacterTraits;
use crate::dice::{roll_d20_with, Advantage, DieRoller};
use crate::magic_traits::MagicTraits;
use crate::traits::Traits;
use serde::{Deserialize, Serialize};

/// Poison damage of an attacker with neither `DMG_POISON` nor `DMG`.
const DEFAULT_POISON_DAMAGE: &str = "1D4";

/// Base DC of a spell without a `DC` trait.
const DEFAULT_SPELL_DC: i32 = 8;

/// Damage dealt by a spell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellDamage {
    pub damage: i32,
    /// Hit points the caster drains back; vampiric spells only.
    pub drained: i32,
}

/// Resolve a melee attack against `target`'s effective AC.
pub fn get_melee_damage(
    roller: &mut impl DieRoller,
    attack: &AttackDetail,
    target: &CharacterTraits,
) -> i32 {
    get_melee_damage_with_advantage(roller, attack, target, Advantage::Normal)
}

/// Resolve an attack roll. A natural 1 always misses and a natural 20 always
/// hits for double damage; otherwise meeting the AC is a hit.
pub fn get_melee_damage_with_advantage(
    roller: &mut impl DieRoller,
    attack: &AttackDetail,
    target: &CharacterTraits,
    advantage: Advantage,
) -> i32 {
    let roll = attack.roll_for_attack(roller, advantage);
    let target_ac = target.effective_ac();

    let damage = if roll.is_fumble() {
        0
    } else if roll.is_critical() {
        2 * attack.roll_for_damage(roller)
    } else if roll.total >= target_ac {
        attack.roll_for_damage(roller)
    } else {
        0
    };

    tracing::debug!(
        attack = %attack.name,
        natural = roll.natural,
        total = roll.total,
        target_ac,
        damage,
        "attack resolved"
    );
    damage
}

/// Roll poison damage from `attacker`, halved (or negated) by a successful
/// saving throw against its `DC`.
///
/// An attacker without a `DC` is a content error: it is logged and the full
/// damage lands.
pub fn get_poison_damage(
    roller: &mut impl DieRoller,
    attacker: &Traits,
    target: &CharacterTraits,
) -> i32 {
    let formula = ["DMG_POISON", "DMG"]
        .into_iter()
        .find_map(|key| attacker.get(key))
        .map(|value| value.to_string())
        .unwrap_or_else(|| DEFAULT_POISON_DAMAGE.to_string());
    let damage = roll_formula(roller, &formula).max(0);

    let Some(dc) = attacker.get("DC").and_then(|v| v.as_int()) else {
        tracing::error!(
            attacker = %attacker.get_string("NAME", "UNKNOWN"),
            "poisoner has no DC, saving throw skipped"
        );
        return damage;
    };
    saving_throw_damage(roller, damage, dc, attacker.get_float("DMG_SAVED", 0.0), target)
}

/// Hit points restored by consuming `item`, limited to what `consumer` is
/// missing.
pub fn get_consumption_benefit(
    roller: &mut impl DieRoller,
    consumer: &Traits,
    item: &Traits,
) -> i32 {
    let Some(formula) = item.get("HP_GAIN").map(|v| v.to_string()) else {
        return 0;
    };
    let shortfall = hp_shortfall(consumer.get_int("HP", 0), consumer.get_int("HP_MAX", 0));
    roll_formula(roller, &formula).clamp(0, shortfall)
}

/// Resolve `spell` cast by `caster` at `target`, `separation_tiles` away.
///
/// `MODE` (or `ATTACK`) selects the mechanic: `MELEE` and `VAMPIRIC MELEE`
/// use an attack roll, `RANGED` too but at disadvantage from an adjacent
/// tile, anything else a saving throw against the caster's spell DC.
pub fn get_spell_damage(
    roller: &mut impl DieRoller,
    caster: &CharacterTraits,
    spell: &MagicTraits,
    target: &CharacterTraits,
    separation_tiles: i32,
) -> SpellDamage {
    if target.get_bool("UNDEAD") && spell.get_bool("UNDEAD_IMMUNE") {
        tracing::debug!(spell = %spell.get_string("NAME", ""), "undead target is immune");
        return SpellDamage::default();
    }
    let Some(formula) = spell.get_damage_dice_when_cast_by(caster) else {
        return SpellDamage::default();
    };

    let mode = spell
        .get("MODE")
        .or_else(|| spell.get("ATTACK"))
        .map(|v| v.to_string().to_uppercase())
        .unwrap_or_default();

    let spell_attack = || {
        AttackDetail::new(spell.get_string("NAME", "SPELL"), formula.clone())
            .with_proficiency_bonus(caster.proficiency_bonus())
            .with_ability_modifier(caster.spellcasting_modifier())
    };

    let damage = match mode.as_str() {
        "MELEE" | "VAMPIRIC MELEE" => {
            let attack = AttackDetail {
                unarmed: true,
                ..spell_attack()
            };
            let damage = get_melee_damage(roller, &attack, target);
            let drained = if mode.starts_with("VAMPIRIC") { damage } else { 0 };
            return SpellDamage { damage, drained };
        }
        "RANGED" => {
            let advantage = if separation_tiles <= 1 {
                Advantage::Disadvantage
            } else {
                Advantage::Normal
            };
            get_melee_damage_with_advantage(roller, &spell_attack(), target, advantage)
        }
        _ => {
            let dc = spell.get_int("DC", DEFAULT_SPELL_DC)
                + caster.spellcasting_modifier()
                + caster.proficiency_bonus_for(&spell.get_string("TYPE", ""));
            let damage = roll_formula(roller, &formula).max(0);
            saving_throw_damage(roller, damage, dc, spell.get_float("DMG_SAVED", 0.0), target)
        }
    };
    SpellDamage { damage, drained: 0 }
}

/// Hit points `spell` restores to `target`, limited to what it is missing.
/// Spells without `HP_GAIN` restore nothing.
pub fn get_spell_hp_gain(
    roller: &mut impl DieRoller,
    caster: &CharacterTraits,
    spell: &MagicTraits,
    target: &Traits,
) -> i32 {
    let Some(formula) = spell.get_hp_gain_dice_when_cast_by(caster) else {
        return 0;
    };
    let shortfall = hp_shortfall(target.get_int("HP", 0), target.get_int("HP_MAX", 0));
    roll_formula(roller, &formula).clamp(0, shortfall)
}

/// Apply a non-melee saving throw: on a success the damage is scaled by
/// `save_factor` and rounded.
fn saving_throw_damage(
    roller: &mut impl DieRoller,
    damage: i32,
    dc: i32,
    save_factor: f64,
    target: &CharacterTraits,
) -> i32 {
    let natural = roll_d20_with(roller, Advantage::Normal);
    let total = natural as i32 + target.non_melee_save_modifier();
    let saved = total >= dc;
    let result = if saved {
        (damage as f64 * save_factor).round() as i32
    } else {
        damage
    };
    tracing::debug!(natural, total, dc, saved, damage = result, "saving throw");
    result
}

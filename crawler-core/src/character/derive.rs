//! Equipment and effect layering for heroes and traders.
//!
//! Contributions are applied in a fixed order: transient effects, magic
//! effects of equipped artefacts, weapons, armour and shields, then
//! movement. Magic comes before weapons and armour because it can change
//! the strength and dexterity those steps read.

use super::CharacterTraits;
use crate::ability::{characteristic_to_modifier, Ability};
use crate::attack::AttackDetail;
use crate::traits::{feet_to_tiles, Traits};

/// Prefix of keys that add to an effective stat, e.g. `FX_STR:2`.
const EFFECT_PREFIX: &str = "FX_";

/// Damage of a weapon with no `DMG` trait.
const DEFAULT_WEAPON_DAMAGE: &str = "1D4";

/// Default walking speed in feet.
const DEFAULT_SPEED_FEET: f64 = 30.0;

/// Speed lost in heavy armour the wearer is too weak for.
const HEAVY_ARMOUR_SPEED_PENALTY_FEET: f64 = 10.0;

pub fn is_weapon(artefact: &Traits) -> bool {
    artefact.get_string("TYPE_ID", "").eq_ignore_ascii_case("WEAPON")
}

pub fn is_armour(artefact: &Traits) -> bool {
    artefact.get_string("TYPE_ID", "").eq_ignore_ascii_case("ARMOUR")
}

/// Shields are armour whose `TYPE` names them as such.
pub fn is_shield(artefact: &Traits) -> bool {
    is_armour(artefact) && type_words(artefact).contains("SHIELD")
}

fn type_words(artefact: &Traits) -> String {
    artefact.get_string("TYPE", "").to_uppercase()
}

/// Add every `FX_<STAT>` of `source` into `effective`. Stats not yet in the
/// overlay start from their base value.
fn add_effects(effective: &mut Traits, base: &Traits, source: &Traits) {
    for (key, value) in source.all_traits() {
        let Some(stat) = key.trim_start_matches('_').strip_prefix(EFFECT_PREFIX) else {
            continue;
        };
        let Some(amount) = value.as_int() else {
            tracing::warn!(key, value = %value, "ignoring non-numeric effect");
            continue;
        };
        if !effective.has(stat) {
            effective.set(stat, base.get_int(stat, 0));
        }
        effective.add_int(stat, amount);
    }
}

impl CharacterTraits {
    pub(super) fn apply_transient_effects(&mut self) {
        for effect in &self.transient_effects {
            add_effects(&mut self.effective, &self.traits, effect);
        }
    }

    pub(super) fn apply_magic_effects(&mut self) {
        for artefact in &self.equipment {
            add_effects(&mut self.effective, &self.traits, artefact);
        }
    }

    /// Build the attack list from equipped weapons.
    ///
    /// Two simple light weapons are both kept, the off-hand one without its
    /// ability modifier. Any other pair keeps only the weapon with the higher
    /// maximum damage, the first one on a tie.
    pub(super) fn utilise_weapons(&mut self) {
        let weapons: Vec<&Traits> = self.equipment.iter().filter(|a| is_weapon(a)).collect();

        let attacks = match weapons.as_slice() {
            [] => vec![AttackDetail::unarmed(
                self.proficiency_bonus,
                self.effective_modifier(Ability::Strength),
            )],
            [only] => vec![self.weapon_attack(only)],
            [main, off, rest @ ..] => {
                if !rest.is_empty() {
                    tracing::warn!(
                        extra = rest.len(),
                        "more than two weapons equipped, using the first two"
                    );
                }
                let main = self.weapon_attack(main);
                let off = self.weapon_attack(off);
                if main.two_weapon_eligible && off.two_weapon_eligible {
                    vec![main, off.with_ability_modifier(0)]
                } else if off.max_damage() > main.max_damage() {
                    vec![off]
                } else {
                    vec![main]
                }
            }
        };
        self.attacks = attacks;
    }

    fn weapon_attack(&self, weapon: &Traits) -> AttackDetail {
        let weapon_type = type_words(weapon);
        let strength = self.effective_modifier(Ability::Strength);
        let dexterity = self.effective_modifier(Ability::Dexterity);
        let ability_modifier = if weapon_type.contains("FINESSE") {
            strength.max(dexterity)
        } else if weapon_type.contains("RANGED") {
            dexterity
        } else {
            strength
        };

        AttackDetail::new(
            weapon.get_string("NAME", "WEAPON"),
            weapon.get_string("DMG", DEFAULT_WEAPON_DAMAGE),
        )
        .with_proficiency_bonus(self.proficiency_bonus_for(&weapon_type))
        .with_ability_modifier(ability_modifier)
        .with_two_weapon_eligible(weapon_type.contains("SIMPLE") && weapon_type.contains("LIGHT"))
    }

    /// Combine base AC with armour and shields.
    ///
    /// Armour whose `AC` carries an explicit sign adds to the total; other
    /// armour replaces the base when better. Only the best shield counts.
    pub(super) fn utilise_armour(&mut self) {
        let base = self.effective.get_int("AC", super::DEFAULT_AC);
        let mut best_flat: Option<i32> = None;
        let mut additional = 0;
        let mut best_shield = 0;

        for armour in self.equipment.iter().filter(|a| is_armour(a)) {
            if is_shield(armour) {
                best_shield = best_shield.max(armour.get_int("AC", 0));
            } else if is_signed_ac(armour) {
                additional += armour.get_int("AC", 0);
            } else {
                let ac = self.ac_from_traits(armour);
                best_flat = Some(best_flat.map_or(ac, |best| best.max(ac)));
            }
        }

        let ac = base.max(best_flat.unwrap_or(base)) + additional + best_shield;
        self.effective.set("AC", ac);
    }

    /// AC of one piece of armour including the wearer's dexterity: capped
    /// at +2 for medium armour and ignored for heavy armour.
    fn ac_from_traits(&self, armour: &Traits) -> i32 {
        let armour_type = type_words(armour);
        let dexterity = characteristic_to_modifier(self.effective.get_int("DEX", 10));
        let dex_bonus = if armour_type.contains("HEAVY") {
            0
        } else if armour_type.contains("MEDIUM") {
            dexterity.min(2)
        } else {
            dexterity
        };
        armour.get_int("AC", 0) + dex_bonus
    }

    pub(super) fn adjust_movement(&mut self) {
        let strength = self.effective.get_int("STR", 10);
        let too_heavy = self.equipment.iter().any(|armour| {
            is_armour(armour)
                && type_words(armour).contains("HEAVY")
                && armour.get_int("STR", 0) > strength
        });
        let penalty = if too_heavy {
            HEAVY_ARMOUR_SPEED_PENALTY_FEET
        } else {
            0.0
        };
        self.max_tiles_per_move = self.speed_in_tiles(penalty);
    }

    /// Walking speed less `penalty_feet`, in tiles, never below one.
    pub(super) fn speed_in_tiles(&self, penalty_feet: f64) -> i32 {
        let feet = if self.effective.has("SPEED") {
            self.effective.get_float("SPEED", DEFAULT_SPEED_FEET)
        } else {
            self.traits.get_float("SPEED", DEFAULT_SPEED_FEET)
        };
        feet_to_tiles(feet - penalty_feet).max(1)
    }
}

/// The raw `AC` text starts with `+` or `-`.
fn is_signed_ac(armour: &Traits) -> bool {
    let raw = armour.get_string("AC", "");
    let raw = raw.trim_start();
    raw.starts_with('+') || raw.starts_with('-')
}

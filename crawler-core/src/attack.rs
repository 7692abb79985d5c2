//! Attack details.
//!
//! An [`AttackDetail`] is one attack an actor can make this turn. It is
//! rebuilt on every derivation pass and never shared between turns.

use crate::dice::{max_roll, roll_d20_with, roll_multi_dice_with, Advantage, DieRoller};
use serde::{Deserialize, Serialize};

/// Damage dice used when an actor has nothing in hand.
pub const UNARMED_DAMAGE: &str = "1D1";

/// One weapon, spell or natural attack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackDetail {
    pub name: String,
    pub damage_dice: String,
    pub proficiency_bonus: i32,
    pub ability_modifier: i32,
    pub unarmed: bool,
    /// Simple light weapons can be paired for two-weapon fighting.
    pub two_weapon_eligible: bool,
}

/// Outcome of an attack roll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackRoll {
    /// The d20 face after advantage was applied.
    pub natural: u32,
    pub total: i32,
}

impl AttackRoll {
    pub fn is_critical(&self) -> bool {
        self.natural == 20
    }

    pub fn is_fumble(&self) -> bool {
        self.natural == 1
    }
}

impl AttackDetail {
    pub fn new(name: impl Into<String>, damage_dice: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            damage_dice: damage_dice.into(),
            proficiency_bonus: 0,
            ability_modifier: 0,
            unarmed: false,
            two_weapon_eligible: false,
        }
    }

    /// A fist or improvised strike.
    pub fn unarmed(proficiency_bonus: i32, ability_modifier: i32) -> Self {
        Self {
            unarmed: true,
            ..Self::new("UNARMED", UNARMED_DAMAGE)
                .with_proficiency_bonus(proficiency_bonus)
                .with_ability_modifier(ability_modifier)
        }
    }

    pub fn with_proficiency_bonus(mut self, bonus: i32) -> Self {
        self.proficiency_bonus = bonus;
        self
    }

    pub fn with_ability_modifier(mut self, modifier: i32) -> Self {
        self.ability_modifier = modifier;
        self
    }

    pub fn with_two_weapon_eligible(mut self, eligible: bool) -> Self {
        self.two_weapon_eligible = eligible;
        self
    }

    /// Bonus added to the d20 when attacking.
    pub fn attack_bonus(&self) -> i32 {
        self.ability_modifier + self.proficiency_bonus
    }

    /// Highest damage a single hit can deal.
    pub fn max_damage(&self) -> i32 {
        max_roll(&self.damage_dice) + self.ability_modifier
    }

    pub fn roll_for_attack(&self, roller: &mut impl DieRoller, advantage: Advantage) -> AttackRoll {
        let natural = roll_d20_with(roller, advantage);
        AttackRoll {
            natural,
            total: natural as i32 + self.attack_bonus(),
        }
    }

    /// Roll damage plus the ability modifier; never negative.
    pub fn roll_for_damage(&self, roller: &mut impl DieRoller) -> i32 {
        (roll_multi_dice_with(roller, &self.damage_dice) + self.ability_modifier).max(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedRoller;

    #[test]
    fn test_attack_roll_adds_bonuses() {
        let attack = AttackDetail::new("LONGSWORD", "1D8")
            .with_proficiency_bonus(2)
            .with_ability_modifier(3);
        let mut roller = ScriptedRoller::new([12]);
        let roll = attack.roll_for_attack(&mut roller, Advantage::Normal);
        assert_eq!(roll, AttackRoll { natural: 12, total: 17 });
        assert!(!roll.is_critical());
    }

    #[test]
    fn test_disadvantage_keeps_lower_face() {
        let attack = AttackDetail::new("BOW", "1D6");
        let mut roller = ScriptedRoller::new([18, 4]);
        let roll = attack.roll_for_attack(&mut roller, Advantage::Disadvantage);
        assert_eq!(roll.natural, 4);
    }

    #[test]
    fn test_damage_floor() {
        let attack = AttackDetail::new("STICK", "1D4").with_ability_modifier(-3);
        let mut roller = ScriptedRoller::new([1]);
        assert_eq!(attack.roll_for_damage(&mut roller), 0);
    }

    #[test]
    fn test_unarmed() {
        let attack = AttackDetail::unarmed(2, 1);
        assert!(attack.unarmed);
        assert_eq!(attack.damage_dice, UNARMED_DAMAGE);
        assert_eq!(attack.max_damage(), 2);
        assert_eq!(attack.attack_bonus(), 3);
    }
}

//! Character class tables.
//!
//! Each class ranks the six abilities (used to seed missing scores and to
//! distribute ability improvement points), carries a default hit die and
//! spellcasting ability, and may multiply the proficiency bonus for certain
//! weapon or task categories.

use crate::ability::Ability;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scores handed out in ability priority order when a character has none.
pub const STANDARD_ARRAY: [i32; 6] = [15, 14, 13, 12, 10, 8];

/// Character classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CharacterClass {
    Barbarian,
    Bard,
    Cleric,
    Druid,
    Fighter,
    Monk,
    Paladin,
    Ranger,
    Rogue,
    Sorcerer,
    Warlock,
    Wizard,
}

/// Class-specific rules data.
pub struct ClassData {
    /// Abilities from most to least important for the class.
    pub ability_priority: [Ability; 6],
    /// Sides of the class hit die.
    pub hit_die: u32,
    /// Proficiency multipliers keyed by a word found in the weapon or task
    /// type.
    pub proficiency_multipliers: &'static [(&'static str, i32)],
}

impl CharacterClass {
    /// Get the rules data for this class.
    pub fn data(&self) -> ClassData {
        use Ability::*;
        match self {
            CharacterClass::Barbarian => ClassData {
                ability_priority: [Strength, Constitution, Dexterity, Wisdom, Charisma, Intelligence],
                hit_die: 12,
                proficiency_multipliers: &[],
            },
            CharacterClass::Bard => ClassData {
                ability_priority: [Charisma, Dexterity, Constitution, Wisdom, Intelligence, Strength],
                hit_die: 8,
                proficiency_multipliers: &[],
            },
            CharacterClass::Cleric => ClassData {
                ability_priority: [Wisdom, Constitution, Strength, Charisma, Intelligence, Dexterity],
                hit_die: 8,
                proficiency_multipliers: &[],
            },
            CharacterClass::Druid => ClassData {
                ability_priority: [Wisdom, Constitution, Dexterity, Intelligence, Charisma, Strength],
                hit_die: 8,
                proficiency_multipliers: &[],
            },
            CharacterClass::Fighter => ClassData {
                ability_priority: [Strength, Constitution, Dexterity, Wisdom, Charisma, Intelligence],
                hit_die: 10,
                proficiency_multipliers: &[],
            },
            CharacterClass::Monk => ClassData {
                ability_priority: [Dexterity, Wisdom, Constitution, Strength, Intelligence, Charisma],
                hit_die: 8,
                proficiency_multipliers: &[],
            },
            CharacterClass::Paladin => ClassData {
                ability_priority: [Strength, Charisma, Constitution, Wisdom, Dexterity, Intelligence],
                hit_die: 10,
                proficiency_multipliers: &[],
            },
            CharacterClass::Ranger => ClassData {
                ability_priority: [Dexterity, Wisdom, Constitution, Strength, Intelligence, Charisma],
                hit_die: 10,
                proficiency_multipliers: &[],
            },
            CharacterClass::Rogue => ClassData {
                ability_priority: [Dexterity, Intelligence, Constitution, Charisma, Wisdom, Strength],
                hit_die: 8,
                proficiency_multipliers: &[("FINESSE", 2), ("THIEVES TOOLS", 2)],
            },
            CharacterClass::Sorcerer => ClassData {
                ability_priority: [Charisma, Constitution, Dexterity, Wisdom, Intelligence, Strength],
                hit_die: 6,
                proficiency_multipliers: &[],
            },
            CharacterClass::Warlock => ClassData {
                ability_priority: [Charisma, Constitution, Dexterity, Wisdom, Intelligence, Strength],
                hit_die: 8,
                proficiency_multipliers: &[],
            },
            CharacterClass::Wizard => ClassData {
                ability_priority: [Intelligence, Constitution, Dexterity, Wisdom, Charisma, Strength],
                hit_die: 6,
                proficiency_multipliers: &[],
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CharacterClass::Barbarian => "BARBARIAN",
            CharacterClass::Bard => "BARD",
            CharacterClass::Cleric => "CLERIC",
            CharacterClass::Druid => "DRUID",
            CharacterClass::Fighter => "FIGHTER",
            CharacterClass::Monk => "MONK",
            CharacterClass::Paladin => "PALADIN",
            CharacterClass::Ranger => "RANGER",
            CharacterClass::Rogue => "ROGUE",
            CharacterClass::Sorcerer => "SORCERER",
            CharacterClass::Warlock => "WARLOCK",
            CharacterClass::Wizard => "WIZARD",
        }
    }

    pub fn from_name(name: &str) -> Option<CharacterClass> {
        let name = name.trim().to_uppercase();
        Self::all().iter().copied().find(|c| c.name() == name)
    }

    /// Returns the spellcasting ability for this class, if any.
    pub fn spellcasting_ability(&self) -> Option<Ability> {
        match self {
            CharacterClass::Bard | CharacterClass::Sorcerer | CharacterClass::Warlock => {
                Some(Ability::Charisma)
            }
            CharacterClass::Cleric | CharacterClass::Druid | CharacterClass::Ranger => {
                Some(Ability::Wisdom)
            }
            CharacterClass::Wizard => Some(Ability::Intelligence),
            CharacterClass::Paladin => Some(Ability::Charisma),
            _ => None,
        }
    }

    /// Multiplier applied to the proficiency bonus for a weapon or task whose
    /// type contains one of the class keywords.
    pub fn proficiency_multiplier(&self, type_string: &str) -> i32 {
        let type_string = type_string.to_uppercase();
        self.data()
            .proficiency_multipliers
            .iter()
            .filter(|(keyword, _)| type_string.contains(keyword))
            .map(|(_, multiplier)| *multiplier)
            .max()
            .unwrap_or(1)
    }

    /// Get all character classes.
    pub fn all() -> &'static [CharacterClass] {
        &[
            CharacterClass::Barbarian,
            CharacterClass::Bard,
            CharacterClass::Cleric,
            CharacterClass::Druid,
            CharacterClass::Fighter,
            CharacterClass::Monk,
            CharacterClass::Paladin,
            CharacterClass::Ranger,
            CharacterClass::Rogue,
            CharacterClass::Sorcerer,
            CharacterClass::Warlock,
            CharacterClass::Wizard,
        ]
    }
}

impl fmt::Display for CharacterClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Ability priority for an optional class; classless actors fall back to
/// the plain STR..CHA order.
pub fn ability_priority(class: Option<CharacterClass>) -> [Ability; 6] {
    class
        .map(|c| c.data().ability_priority)
        .unwrap_or_else(Ability::all)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_classes_rank_every_ability() {
        for class in CharacterClass::all() {
            let data = class.data();
            for ability in Ability::all() {
                assert!(
                    data.ability_priority.contains(&ability),
                    "{class} is missing {ability}"
                );
            }
            assert!(data.hit_die >= 6);
        }
    }

    #[test]
    fn test_from_name() {
        assert_eq!(CharacterClass::from_name("rogue"), Some(CharacterClass::Rogue));
        assert_eq!(CharacterClass::from_name("PIRATE"), None);
    }

    #[test]
    fn test_rogue_multiplier() {
        let rogue = CharacterClass::Rogue;
        assert_eq!(rogue.proficiency_multiplier("MARTIAL FINESSE LIGHT WEAPON"), 2);
        assert_eq!(rogue.proficiency_multiplier("SIMPLE WEAPON"), 1);
        assert_eq!(CharacterClass::Fighter.proficiency_multiplier("FINESSE"), 1);
    }

    #[test]
    fn test_wizard_casts_with_intelligence() {
        assert_eq!(
            CharacterClass::Wizard.spellcasting_ability(),
            Some(Ability::Intelligence)
        );
        assert_eq!(CharacterClass::Fighter.spellcasting_ability(), None);
    }
}

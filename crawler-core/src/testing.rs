//! Testing utilities.
//!
//! - [`ScriptedRoller`] replays predetermined die faces so combat and rest
//!   outcomes can be asserted exactly.
//! - `sample_*` functions build ready-made actors.
//! - [`weapon`] and [`armour`] build equipment artefacts.

use crate::character::CharacterTraits;
use crate::dice::DieRoller;
use crate::traits::Traits;
use std::collections::VecDeque;

/// A roller that returns scripted faces in order.
///
/// # Panics
///
/// Rolling panics when the script is exhausted or when a scripted face
/// does not fit the die being rolled.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRoller {
    faces: VecDeque<u32>,
    rolls: usize,
}

impl ScriptedRoller {
    pub fn new(faces: impl IntoIterator<Item = u32>) -> Self {
        Self {
            faces: faces.into_iter().collect(),
            rolls: 0,
        }
    }

    /// Queue another face.
    pub fn push(&mut self, face: u32) {
        self.faces.push_back(face);
    }

    /// Faces not yet rolled.
    pub fn remaining(&self) -> usize {
        self.faces.len()
    }

    /// Number of dice rolled so far.
    pub fn rolls(&self) -> usize {
        self.rolls
    }
}

impl DieRoller for ScriptedRoller {
    fn roll_die(&mut self, sides: u32) -> u32 {
        let Some(face) = self.faces.pop_front() else {
            panic!("scripted roller exhausted after {} rolls (d{sides})", self.rolls);
        };
        assert!(
            (1..=sides.max(1)).contains(&face),
            "scripted face {face} does not fit a d{sides}"
        );
        self.rolls += 1;
        face
    }
}

/// Build traits from raw key/value pairs without rolling any dice.
fn traits_from(pairs: &[(&str, &str)]) -> Traits {
    let mut roller = ScriptedRoller::default();
    let mut traits = Traits::new();
    for (key, raw) in pairs {
        traits.set_from_string(key, raw, &mut roller);
    }
    traits
}

/// Level 1 fighter: STR 16, CON 14, d10 hit die, 12 HP.
pub fn sample_fighter() -> CharacterTraits {
    CharacterTraits::new(traits_from(&[
        ("NAME", "Brakka"),
        ("CLASS", "fighter"),
        ("STR", "16"),
        ("DEX", "12"),
        ("CON", "14"),
        ("INT", "8"),
        ("WIS", "10"),
        ("CHA", "10"),
        ("AC", "10"),
        ("EXP", "0"),
        ("SPEED", "30"),
        ("HIT_DICE", "1D10"),
        ("PROF", "simple&martial&light armour&medium armour&heavy armour&shield"),
    ]))
}

/// Level 1 rogue: DEX 16, proficient with thieves tools and stealth.
pub fn sample_rogue() -> CharacterTraits {
    CharacterTraits::new(traits_from(&[
        ("NAME", "Sly"),
        ("CLASS", "rogue"),
        ("STR", "8"),
        ("DEX", "16"),
        ("CON", "12"),
        ("INT", "14"),
        ("WIS", "12"),
        ("CHA", "10"),
        ("AC", "10"),
        ("EXP", "0"),
        ("HIT_DICE", "1D8"),
        (
            "PROF",
            "simple&finesse&light armour&thieves tools&stealth&sleight of hand&perception",
        ),
    ]))
}

/// Level 1 wizard: INT 16, 1D6 hit die, proficient with evocation.
pub fn sample_wizard() -> CharacterTraits {
    CharacterTraits::new(traits_from(&[
        ("NAME", "Mira"),
        ("CLASS", "wizard"),
        ("STR", "8"),
        ("DEX", "14"),
        ("CON", "12"),
        ("INT", "16"),
        ("WIS", "12"),
        ("CHA", "10"),
        ("AC", "10"),
        ("EXP", "0"),
        ("HIT_DICE", "1D6"),
        ("PROF", "simple&arcana&evocation"),
    ]))
}

/// A CR 1/4 goblin with AC 15 and 7 HP.
pub fn sample_goblin() -> CharacterTraits {
    CharacterTraits::new(traits_from(&[
        ("NAME", "Goblin"),
        ("TYPE_ID", "ENEMY"),
        ("STR", "8"),
        ("DEX", "14"),
        ("CON", "10"),
        ("INT", "10"),
        ("WIS", "8"),
        ("CHA", "8"),
        ("AC", "15"),
        ("HP", "7"),
        ("DMG", "1D6"),
        ("PB", "2"),
        ("CR", "1/4"),
    ]))
}

/// A weapon artefact, e.g. `weapon("Dagger", "1D4", "simple light finesse")`.
pub fn weapon(name: &str, damage: &str, kind: &str) -> Traits {
    traits_from(&[
        ("NAME", name),
        ("TYPE_ID", "WEAPON"),
        ("TYPE", kind),
        ("DMG", damage),
    ])
}

/// An armour artefact. A signed `ac` such as `"+1"` adds to the wearer's AC;
/// a `kind` containing `shield` makes it a shield.
pub fn armour(name: &str, ac: &str, kind: &str) -> Traits {
    traits_from(&[
        ("NAME", name),
        ("TYPE_ID", "ARMOUR"),
        ("TYPE", kind),
        ("AC", ac),
    ])
}

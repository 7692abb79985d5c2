//! Ability checks for traps, locks, theft, identification and stealth.

use crate::ability::Ability;
use crate::character::CharacterTraits;
use crate::dice::{roll_d20_with, roll_multi_dice_with, Advantage, DieRoller};
use crate::difficulty::Difficulty;
use crate::traits::Traits;

/// Succeeds when `d20 + ability modifier + proficiency bonus` meets
/// `difficulty`. The bonus applies only when proficient in `task`.
pub fn can_perform_task(
    roller: &mut impl DieRoller,
    character: &CharacterTraits,
    ability: Ability,
    task: &str,
    difficulty: i32,
) -> bool {
    let natural = roll_d20_with(roller, Advantage::Normal);
    let total = natural as i32
        + character.effective_modifier(ability)
        + character.proficiency_bonus_for(task);
    let success = total >= difficulty;
    tracing::debug!(
        name = %character.name(),
        task,
        %ability,
        natural,
        total,
        difficulty,
        success,
        "task check"
    );
    success
}

/// DC stored under `key`, MEDIUM when absent.
fn difficulty_of(source: &Traits, key: &str) -> i32 {
    source.get_int(key, Difficulty::Medium.dc())
}

pub fn can_detect_trap(
    roller: &mut impl DieRoller,
    character: &CharacterTraits,
    trap: &Traits,
) -> bool {
    let difficulty = difficulty_of(trap, "DC");
    can_perform_task(roller, character, Ability::Wisdom, "PERCEPTION", difficulty)
}

pub fn can_disable_trap(
    roller: &mut impl DieRoller,
    character: &CharacterTraits,
    trap: &Traits,
) -> bool {
    let difficulty = difficulty_of(trap, "DC");
    can_perform_task(roller, character, Ability::Dexterity, "THIEVES TOOLS", difficulty)
}

pub fn can_pick_lock(
    roller: &mut impl DieRoller,
    character: &CharacterTraits,
    lock: &Traits,
) -> bool {
    let difficulty = difficulty_of(lock, "DC");
    can_perform_task(roller, character, Ability::Dexterity, "THIEVES TOOLS", difficulty)
}

/// Steal from `victim`, whose `DC` sets the difficulty.
pub fn can_steal(
    roller: &mut impl DieRoller,
    character: &CharacterTraits,
    victim: &Traits,
) -> bool {
    let difficulty = difficulty_of(victim, "DC");
    can_perform_task(roller, character, Ability::Dexterity, "SLEIGHT OF HAND", difficulty)
}

/// Identify `artefact` against its `IDENTIFY_DC`.
pub fn can_identify(
    roller: &mut impl DieRoller,
    character: &CharacterTraits,
    artefact: &Traits,
) -> bool {
    can_perform_task(
        roller,
        character,
        Ability::Intelligence,
        "ARCANA",
        difficulty_of(artefact, "IDENTIFY_DC"),
    )
}

/// Items break on a roll of exactly 3: `3D6` when enchanted, `3D4` otherwise.
pub fn does_item_break(roller: &mut impl DieRoller, item: &Traits) -> bool {
    let dice = if item.get_bool("ENCHANTED") { "3D6" } else { "3D4" };
    roll_multi_dice_with(roller, dice) == 3
}

/// Moving a single tile is always silent; longer moves need a stealth check,
/// easy up to two tiles and medium beyond.
pub fn sneaks_past(
    roller: &mut impl DieRoller,
    character: &CharacterTraits,
    tiles_moved: i32,
) -> bool {
    if tiles_moved <= 1 {
        return true;
    }
    let difficulty = if tiles_moved <= 2 {
        Difficulty::Easy
    } else {
        Difficulty::Medium
    };
    can_perform_task(roller, character, Ability::Dexterity, "STEALTH", difficulty.dc())
}

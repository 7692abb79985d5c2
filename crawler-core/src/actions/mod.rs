//! Action resolution.
//!
//! Stateless functions that turn traits and dice into outcomes: attacks,
//! poison, spells, healing, rests and task checks. They always produce a
//! number or a flag; malformed traits are logged and replaced with safe
//! defaults rather than failing the turn.
//!
//! Only the rest functions mutate the character they are given.

mod checks;
mod combat;
mod rest;

pub use checks::{
    can_detect_trap, can_disable_trap, can_identify, can_perform_task, can_pick_lock, can_steal,
    does_item_break, sneaks_past,
};
pub use combat::{
    get_consumption_benefit, get_melee_damage, get_melee_damage_with_advantage,
    get_poison_damage, get_spell_damage, get_spell_hp_gain, SpellDamage,
};
pub use rest::{
    available_hit_dice, can_rest, take_long_rest, take_short_rest, LongRestOutcome, RestFailure,
    RestOption, RestPossibilities, ShortRestOutcome, DRINKS_FOR_LONG_REST, DRINKS_FOR_SHORT_REST,
    FOOD_ITEMS_FOR_LONG_REST, FOOD_ITEMS_FOR_SHORT_REST, POISONED_KEY, SPENT_HIT_DICE_KEY,
};

use crate::dice::{is_multi_dice, roll_multi_dice_with, DieRoller};
use crate::traits::TraitValue;

/// Roll a damage or healing formula: dice are rolled, flat numbers used as
/// they are.
pub(crate) fn roll_formula(roller: &mut impl DieRoller, formula: &str) -> i32 {
    if is_multi_dice(formula) {
        return roll_multi_dice_with(roller, formula);
    }
    TraitValue::Text(formula.to_string()).as_int().unwrap_or_else(|| {
        tracing::error!(formula, "formula is neither dice nor a number");
        0
    })
}

/// Shortfall between current and maximum hit points, never negative.
pub(crate) fn hp_shortfall(hp: i32, hp_max: i32) -> i32 {
    (hp_max - hp).max(0)
}

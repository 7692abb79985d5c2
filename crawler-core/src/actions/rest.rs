//! Short and long rests.
//!
//! Hit dice are a pool of `qty` dice from the `HIT_DICE` trait; dice spent
//! on short rests are counted in `SPENT_HIT_DICE` and partly recovered by a
//! long rest.

use crate::character::CharacterTraits;
use crate::dice::{get_dice_details, is_multi_dice, roll_dice_with, DieRoller};
use crate::magic::restore_casting_power;
use crate::traits::Traits;
use serde::{Deserialize, Serialize};

pub const FOOD_ITEMS_FOR_SHORT_REST: u32 = 1;
pub const DRINKS_FOR_SHORT_REST: u32 = 1;
pub const FOOD_ITEMS_FOR_LONG_REST: u32 = 3;
pub const DRINKS_FOR_LONG_REST: u32 = 3;

/// Count of hit dice spent since the last long rest.
pub const SPENT_HIT_DICE_KEY: &str = "SPENT_HIT_DICE";

/// Toxin status cleared by any rest.
pub const POISONED_KEY: &str = "POISONED";

/// Why a rest cannot be taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RestFailure {
    NeedLongRest,
    NeedFood,
    NeedDrink,
}

/// Whether one kind of rest is possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestOption {
    pub possible: bool,
    pub reason: Option<RestFailure>,
}

impl RestOption {
    fn allowed() -> Self {
        Self {
            possible: true,
            reason: None,
        }
    }

    fn refused(reason: RestFailure) -> Self {
        Self {
            possible: false,
            reason: Some(reason),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestPossibilities {
    pub short_rest: RestOption,
    pub long_rest: RestOption,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortRestOutcome {
    pub hp_recovered: i32,
    pub hit_die_spent: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LongRestOutcome {
    pub hp_recovered: i32,
    pub hit_dice_recovered: u32,
}

fn hit_dice_qty(traits: &Traits) -> u32 {
    let hit_dice = traits.get_string("HIT_DICE", "");
    if is_multi_dice(&hit_dice) {
        get_dice_details(&hit_dice).qty
    } else {
        0
    }
}

fn spent_hit_dice(traits: &Traits) -> u32 {
    traits.get_int(SPENT_HIT_DICE_KEY, 0).max(0) as u32
}

/// Hit dice still available for short rests.
pub fn available_hit_dice(traits: &Traits) -> u32 {
    hit_dice_qty(traits).saturating_sub(spent_hit_dice(traits))
}

/// Check which rests `traits` can take with the food and drink at hand.
pub fn can_rest(n_food: u32, n_drinks: u32, traits: &Traits) -> RestPossibilities {
    let short_rest = if available_hit_dice(traits) == 0 {
        RestOption::refused(RestFailure::NeedLongRest)
    } else {
        provisions_check(n_food, n_drinks, FOOD_ITEMS_FOR_SHORT_REST, DRINKS_FOR_SHORT_REST)
    };
    let long_rest =
        provisions_check(n_food, n_drinks, FOOD_ITEMS_FOR_LONG_REST, DRINKS_FOR_LONG_REST);

    RestPossibilities {
        short_rest,
        long_rest,
    }
}

fn provisions_check(n_food: u32, n_drinks: u32, food_needed: u32, drinks_needed: u32) -> RestOption {
    if n_food < food_needed {
        RestOption::refused(RestFailure::NeedFood)
    } else if n_drinks < drinks_needed {
        RestOption::refused(RestFailure::NeedDrink)
    } else {
        RestOption::allowed()
    }
}

/// Spend one hit die, if any remain, to recover `die + CON modifier` hit
/// points. Poison is cleared either way.
pub fn take_short_rest(
    roller: &mut impl DieRoller,
    character: &mut CharacterTraits,
) -> ShortRestOutcome {
    character.delete(POISONED_KEY);

    if available_hit_dice(character.traits()) == 0 {
        tracing::debug!(name = %character.name(), "no hit dice left for a short rest");
        return ShortRestOutcome::default();
    }

    let die = get_dice_details(&character.get_string("HIT_DICE", "")).sides;
    let roll = roll_dice_with(roller, die) as i32 + character.get_as_modifier("CON", 0);
    let hp = character.get_int("HP", 0);
    let hp_max = character.get_int("HP_MAX", hp);
    let hp_recovered = roll.clamp(0, (hp_max - hp).max(0));

    character.set("HP", hp + hp_recovered);
    character.add_int(SPENT_HIT_DICE_KEY, 1);
    tracing::debug!(name = %character.name(), roll, hp_recovered, "short rest");

    ShortRestOutcome {
        hp_recovered,
        hit_die_spent: true,
    }
}

/// Recover `max(1, ceil(qty / 2))` spent hit dice, all hit points and all
/// casting power, and clear poison.
pub fn take_long_rest(character: &mut CharacterTraits) -> LongRestOutcome {
    let qty = hit_dice_qty(character.traits());
    let spent = spent_hit_dice(character.traits());
    let recoverable = qty.div_ceil(2).max(1);
    let hit_dice_recovered = recoverable.min(spent);
    character.set(SPENT_HIT_DICE_KEY, (spent - hit_dice_recovered) as i32);

    let hp = character.get_int("HP", 0);
    let hp_max = character.get_int("HP_MAX", hp);
    character.set("HP", hp_max.max(hp));

    restore_casting_power(character);
    character.delete(POISONED_KEY);

    let outcome = LongRestOutcome {
        hp_recovered: (hp_max - hp).max(0),
        hit_dice_recovered,
    };
    tracing::debug!(
        name = %character.name(),
        hp_recovered = outcome.hp_recovered,
        hit_dice_recovered,
        "long rest"
    );
    outcome
}

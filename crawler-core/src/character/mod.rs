//! Character trait stores.
//!
//! [`CharacterTraits`] wraps the persisted [`Traits`] of a hero, enemy or
//! trader and keeps the values derived from them up to date: level and
//! proficiency bonus from `EXP`, hit points from `HIT_DICE`, the effective
//! ability scores and armour class after equipment and transient effects,
//! the attacks available this turn and the movement allowance.
//!
//! Setting any key that feeds the derivation re-runs it immediately.
//! Batched edits can go through [`CharacterTraits::traits_mut`] followed by a
//! single [`CharacterTraits::refresh_derived_values`].

mod derive;

pub use derive::{is_armour, is_shield, is_weapon};

use crate::ability::{characteristic_to_modifier, Ability};
use crate::attack::AttackDetail;
use crate::class_data::{ability_priority, CharacterClass, STANDARD_ARRAY};
use crate::dice::{change_qty_of_dice, get_dice_details, is_multi_dice, DieRoller};
use crate::progression::{
    ability_improvements_at_level, get_level_and_prof_bonus_from_exp, get_xp_from_cr,
    parse_challenge_rating, MAX_IMPROVED_ABILITY, POINTS_PER_IMPROVEMENT,
};
use crate::traits::{TraitError, TraitValue, Traits};
use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// `TYPE_ID` of hostile actors. Enemies fight with their own `DMG` rather
/// than equipment.
pub const ENEMY_TYPE_ID: &str = "ENEMY";

/// Count of ability improvements already granted.
pub const ABILITY_IMPROVEMENTS_KEY: &str = "ABILITY_IMPROVEMENTS";

/// Armour class of an actor with no `AC` trait.
pub const DEFAULT_AC: i32 = 10;

/// Keys whose change invalidates the derived values.
const DERIVATION_KEYS: [&str; 13] = [
    "STR", "DEX", "CON", "INT", "WIS", "CHA", "AC", "EXP", "HIT_DICE", "CLASS", "SPEED", "PROF",
    "TYPE_ID",
];

/// Stats copied into the effective overlay before contributions are added.
const EFFECTIVE_STATS: [&str; 7] = ["STR", "DEX", "CON", "INT", "WIS", "CHA", "AC"];

/// Experience and level before and after a reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceGain {
    pub exp_before: i32,
    pub exp_after: i32,
    pub level_before: u32,
    pub level_after: u32,
}

impl ExperienceGain {
    pub fn leveled_up(&self) -> bool {
        self.level_after > self.level_before
    }
}

/// An actor's traits plus everything derived from them.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterTraits {
    traits: Traits,
    level: u32,
    proficiency_bonus: i32,
    attacks: Vec<AttackDetail>,
    effective: Traits,
    transient_effects: Vec<Traits>,
    equipment: Vec<Traits>,
    max_tiles_per_move: i32,
}

impl CharacterTraits {
    /// Build a character, seeding missing ability scores and hit dice from
    /// its class and deriving everything else.
    pub fn new(traits: Traits) -> Self {
        let mut character = Self {
            traits,
            level: 1,
            proficiency_bonus: 2,
            attacks: Vec::new(),
            effective: Traits::new(),
            transient_effects: Vec::new(),
            equipment: Vec::new(),
            max_tiles_per_move: 1,
        };

        let level = get_level_and_prof_bonus_from_exp(character.traits.get_int("EXP", 0)).level;
        character.seed_ability_scores();
        character.seed_hit_dice(level);
        if !character.traits.has(ABILITY_IMPROVEMENTS_KEY) {
            // Scores supplied with the character already include any
            // improvements for its current level.
            character
                .traits
                .set(ABILITY_IMPROVEMENTS_KEY, ability_improvements_at_level(level) as i32);
        }
        character.refresh_derived_values();
        character
    }

    pub fn parse(definition: &str) -> Result<Self, TraitError> {
        Traits::parse(definition).map(Self::new)
    }

    pub fn parse_with(definition: &str, roller: &mut impl DieRoller) -> Result<Self, TraitError> {
        Traits::parse_with(definition, roller).map(Self::new)
    }

    // ------------------------------------------------------------------
    // Access
    // ------------------------------------------------------------------

    /// The persisted traits.
    pub fn traits(&self) -> &Traits {
        &self.traits
    }

    /// Mutable access to the persisted traits. Derived values are not
    /// refreshed until [`CharacterTraits::refresh_derived_values`] is called.
    pub fn traits_mut(&mut self) -> &mut Traits {
        &mut self.traits
    }

    pub fn into_traits(self) -> Traits {
        self.traits
    }

    /// Set a trait, refreshing derived values when the key feeds them.
    pub fn set(&mut self, key: &str, value: impl Into<TraitValue>) {
        self.traits.set(key, value);
        if is_derivation_key(key) {
            self.refresh_derived_values();
        }
    }

    /// Set a trait from definition text, refreshing like [`CharacterTraits::set`].
    pub fn set_from_string(&mut self, key: &str, raw: &str, roller: &mut impl DieRoller) {
        self.traits.set_from_string(key, raw, roller);
        if is_derivation_key(key) {
            self.refresh_derived_values();
        }
    }

    /// Add to an integer trait without refreshing derived values.
    pub fn add_int(&mut self, key: &str, delta: i32) -> i32 {
        self.traits.add_int(key, delta)
    }

    pub fn delete(&mut self, key: &str) -> Option<TraitValue> {
        let removed = self.traits.delete(key);
        if removed.is_some() && is_derivation_key(key) {
            self.refresh_derived_values();
        }
        removed
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn proficiency_bonus(&self) -> i32 {
        self.proficiency_bonus
    }

    pub fn attacks(&self) -> &[AttackDetail] {
        &self.attacks
    }

    pub fn effective_traits(&self) -> &Traits {
        &self.effective
    }

    pub fn transient_effects(&self) -> &[Traits] {
        &self.transient_effects
    }

    pub fn equipment(&self) -> &[Traits] {
        &self.equipment
    }

    pub fn max_tiles_per_move(&self) -> i32 {
        self.max_tiles_per_move
    }

    pub fn name(&self) -> String {
        self.traits.get_string("NAME", "UNKNOWN")
    }

    pub fn class(&self) -> Option<CharacterClass> {
        self.traits
            .get("CLASS")
            .and_then(|v| CharacterClass::from_name(&v.to_string()))
    }

    pub fn is_enemy(&self) -> bool {
        self.traits.get_string("TYPE_ID", "").eq_ignore_ascii_case(ENEMY_TYPE_ID)
    }

    /// Challenge rating from the `CR` trait; accepts fractions like `1/8`.
    pub fn challenge_rating(&self) -> f64 {
        match self.traits.get("CR") {
            Some(TraitValue::Text(raw)) => parse_challenge_rating(raw).unwrap_or(0.0),
            Some(other) => other.as_float().unwrap_or(0.0),
            None => 0.0,
        }
    }

    // ------------------------------------------------------------------
    // Effective values
    // ------------------------------------------------------------------

    /// Value of `key` after equipment and transient effects, falling back to
    /// the base trait and then `default`.
    pub fn get_effective_int(&self, key: &str, default: i32) -> i32 {
        if self.effective.has(key) {
            self.effective.get_int(key, default)
        } else {
            self.traits.get_int(key, default)
        }
    }

    pub fn effective_modifier(&self, ability: Ability) -> i32 {
        characteristic_to_modifier(self.get_effective_int(ability.key(), 10))
    }

    /// Armour class after equipment.
    pub fn effective_ac(&self) -> i32 {
        self.get_effective_int("AC", DEFAULT_AC)
    }

    /// Best of the DEX, CON and WIS modifiers, used for saving throws
    /// against poison and spells.
    pub fn non_melee_save_modifier(&self) -> i32 {
        [Ability::Dexterity, Ability::Constitution, Ability::Wisdom]
            .into_iter()
            .map(|a| self.effective_modifier(a))
            .max()
            .unwrap_or(0)
    }

    /// Modifier of the class spellcasting ability. Classless casters use
    /// their best mental ability.
    pub fn spellcasting_modifier(&self) -> i32 {
        match self.class().and_then(|c| c.spellcasting_ability()) {
            Some(ability) => self.effective_modifier(ability),
            None => [Ability::Intelligence, Ability::Wisdom, Ability::Charisma]
                .into_iter()
                .map(|a| self.effective_modifier(a))
                .max()
                .unwrap_or(0),
        }
    }

    // ------------------------------------------------------------------
    // Proficiency
    // ------------------------------------------------------------------

    /// Whether any `PROF` phrase matches `type_string`: every word of the
    /// phrase must appear somewhere in it, in any order.
    pub fn is_proficient(&self, type_string: &str) -> bool {
        let target = type_string.to_uppercase();
        self.traits.get_list("PROF").iter().any(|phrase| {
            let mut words = phrase.split_whitespace().peekable();
            words.peek().is_some() && words.all(|word| target.contains(word))
        })
    }

    /// [`CharacterTraits::is_proficient`] against an artefact's `TYPE`.
    pub fn is_proficient_with(&self, artefact: &Traits) -> bool {
        self.is_proficient(&artefact.get_string("TYPE", ""))
    }

    /// Proficiency bonus for `type_string`, including class multipliers, or
    /// 0 when not proficient.
    pub fn proficiency_bonus_for(&self, type_string: &str) -> i32 {
        if !self.is_proficient(type_string) {
            return 0;
        }
        let multiplier = self
            .class()
            .map(|c| c.proficiency_multiplier(type_string))
            .unwrap_or(1);
        self.proficiency_bonus * multiplier
    }

    // ------------------------------------------------------------------
    // Equipment and effects
    // ------------------------------------------------------------------

    /// Replace the equipped artefacts and re-derive.
    pub fn utilise_additional_traits(&mut self, equipment: Vec<Traits>) {
        self.equipment = equipment;
        self.refresh_derived_values();
    }

    pub fn add_transient_effect(&mut self, effect: Traits) {
        self.transient_effects.push(effect);
        self.refresh_derived_values();
    }

    pub fn set_transient_effects(&mut self, effects: Vec<Traits>) {
        self.transient_effects = effects;
        self.refresh_derived_values();
    }

    pub fn clear_transient_effects(&mut self) {
        if self.transient_effects.is_empty() {
            return;
        }
        self.transient_effects.clear();
        self.refresh_derived_values();
    }

    // ------------------------------------------------------------------
    // Progression
    // ------------------------------------------------------------------

    /// Raise abilities and experience to at least `other`'s plus `extra`.
    /// Nothing is ever lowered.
    pub fn exceed_abilities_and_exp(&mut self, other: &CharacterTraits, extra: i32) {
        for key in ["STR", "DEX", "INT", "WIS", "CON", "CHA", "EXP"] {
            let candidate = other.traits.get_int(key, 0).saturating_add(extra);
            if candidate > self.traits.get_int(key, 0) {
                self.traits.set(key, candidate);
            }
        }
        self.refresh_derived_values();
    }

    /// Award the experience for defeating `defeated`.
    pub fn adjust_for_defeat_of_actor(&mut self, defeated: &CharacterTraits) -> ExperienceGain {
        let exp_before = self.traits.get_int("EXP", 0);
        let level_before = self.level;
        let reward = get_xp_from_cr(defeated.challenge_rating());

        let exp_after = self.traits.add_int("EXP", reward);
        self.refresh_derived_values();

        let gain = ExperienceGain {
            exp_before,
            exp_after,
            level_before,
            level_after: self.level,
        };
        tracing::debug!(
            name = %self.name(),
            defeated = %defeated.name(),
            reward,
            level = gain.level_after,
            "experience awarded"
        );
        gain
    }

    /// Recompute every derived value from the persisted traits, equipment
    /// and transient effects.
    pub fn refresh_derived_values(&mut self) {
        self.update_level_and_proficiency();
        self.update_hit_points();
        self.reset_effective_traits();

        if self.is_enemy() {
            self.attacks = vec![self.natural_attack()];
            self.max_tiles_per_move = self.speed_in_tiles(0.0);
        } else {
            self.apply_transient_effects();
            self.apply_magic_effects();
            self.utilise_weapons();
            self.utilise_armour();
            self.adjust_movement();
        }

        tracing::debug!(
            name = %self.name(),
            level = self.level,
            ac = self.effective_ac(),
            attacks = self.attacks.len(),
            tiles = self.max_tiles_per_move,
            "derived values refreshed"
        );
    }

    fn seed_ability_scores(&mut self) {
        let priority = ability_priority(self.class());
        for (ability, score) in priority.iter().zip(STANDARD_ARRAY) {
            if !self.traits.has(ability.key()) {
                self.traits.set(ability.key(), score);
            }
        }
    }

    fn seed_hit_dice(&mut self, level: u32) {
        if self.traits.has("HIT_DICE") || self.is_enemy() {
            return;
        }
        if let Some(class) = self.class() {
            self.traits
                .set("HIT_DICE", format!("{}D{}", level, class.data().hit_die));
        }
    }

    fn update_level_and_proficiency(&mut self) {
        let progression = get_level_and_prof_bonus_from_exp(self.traits.get_int("EXP", 0));
        if progression.level != self.level {
            tracing::debug!(
                from = self.level,
                to = progression.level,
                "level changed"
            );
        }
        self.level = progression.level;
        self.proficiency_bonus = progression.prof_bonus;
        self.apply_ability_improvements();
        self.grow_hit_dice();
    }

    /// Keep at least one hit die per level for classed adventurers.
    fn grow_hit_dice(&mut self) {
        if self.is_enemy() || self.class().is_none() {
            return;
        }
        let hit_dice = self.traits.get_string("HIT_DICE", "");
        if !is_multi_dice(&hit_dice) {
            return;
        }
        let qty = get_dice_details(&hit_dice).qty;
        if qty < self.level {
            let grown = change_qty_of_dice(&hit_dice, (self.level - qty) as i32);
            tracing::debug!(from = %hit_dice, to = %grown, "hit dice grew with level");
            self.traits.set("HIT_DICE", grown);
        }
    }

    /// Grant any improvement points due at the current level, one point per
    /// ability in class priority order, skipping abilities at the cap.
    fn apply_ability_improvements(&mut self) {
        let due = ability_improvements_at_level(self.level);
        let applied = self.traits.get_int(ABILITY_IMPROVEMENTS_KEY, 0).max(0) as u32;
        if due <= applied {
            return;
        }

        let priority = ability_priority(self.class());
        let mut cursor = (applied as usize * POINTS_PER_IMPROVEMENT as usize) % priority.len();
        let mut points = (due - applied) as i32 * POINTS_PER_IMPROVEMENT;
        let mut capped_in_a_row = 0;
        while points > 0 && capped_in_a_row < priority.len() {
            let key = priority[cursor].key();
            cursor = (cursor + 1) % priority.len();
            let score = self.traits.get_int(key, 10);
            if score >= MAX_IMPROVED_ABILITY {
                capped_in_a_row += 1;
                continue;
            }
            self.traits.set(key, score + 1);
            points -= 1;
            capped_in_a_row = 0;
        }

        self.traits.set(ABILITY_IMPROVEMENTS_KEY, due as i32);
        tracing::debug!(improvements = due, unspent = points, "ability improvements applied");
    }

    fn update_hit_points(&mut self) {
        let hit_dice = self.traits.get_string("HIT_DICE", "");
        if is_multi_dice(&hit_dice) {
            let max_die = get_dice_details(&hit_dice).sides as i32;
            let con = self.traits.get_as_modifier("CON", 0);
            let first_level = max_die + con;
            let per_level = (max_die + 2) / 2 + con;
            let hp_max = (first_level + (self.level as i32 - 1) * per_level).max(1);
            self.traits.set("HP_MAX", hp_max);
            if !self.traits.has("HP") {
                self.traits.set("HP", first_level.clamp(1, hp_max));
            }
        } else if self.traits.has("HP") && !self.traits.has("HP_MAX") {
            let hp = self.traits.get_int("HP", 1);
            self.traits.set("HP_MAX", hp);
        }
    }

    fn reset_effective_traits(&mut self) {
        let mut effective = Traits::new();
        for key in EFFECTIVE_STATS {
            let default = if key == "AC" { DEFAULT_AC } else { 10 };
            effective.set(key, self.traits.get_int(key, default));
        }
        self.effective = effective;
    }

    /// Enemies attack with their own damage, proficiency and strength.
    fn natural_attack(&self) -> AttackDetail {
        AttackDetail::new(self.name(), self.traits.get_string("DMG", "1D4"))
            .with_proficiency_bonus(self.traits.get_int("PB", self.proficiency_bonus))
            .with_ability_modifier(self.traits.get_as_modifier("STR", 0))
    }
}

impl Deref for CharacterTraits {
    type Target = Traits;

    fn deref(&self) -> &Traits {
        &self.traits
    }
}

impl From<Traits> for CharacterTraits {
    fn from(traits: Traits) -> Self {
        Self::new(traits)
    }
}

fn is_derivation_key(key: &str) -> bool {
    let key = key.trim().to_uppercase();
    let key = key.strip_prefix('_').unwrap_or(key.as_str());
    DERIVATION_KEYS.contains(&key)
}

//! Character growth and equipment layering across a whole adventure.

use crawler_core::progression::{get_level_and_prof_bonus_from_exp, get_xp_from_cr};
use crawler_core::testing::{armour, sample_fighter, sample_goblin, sample_rogue, weapon, ScriptedRoller};
use crawler_core::{CharacterTraits, Traits};

fn traits(definition: &str) -> Traits {
    Traits::parse_with(definition, &mut ScriptedRoller::default()).unwrap()
}

fn ability_total(character: &CharacterTraits) -> i32 {
    ["STR", "DEX", "CON", "INT", "WIS", "CHA"]
        .iter()
        .map(|key| character.get_int(key, 0))
        .sum()
}

// =============================================================================
// Experience
// =============================================================================

#[test]
fn test_advancement_tables() {
    let level = get_level_and_prof_bonus_from_exp(6500);
    assert_eq!((level.level, level.prof_bonus), (5, 3));
    assert_eq!(get_xp_from_cr(4.0), 1100);
}

#[test]
fn test_levelling_through_defeats() {
    let mut fighter = sample_fighter();
    fighter.set("EXP", 2650);
    assert_eq!(fighter.level(), 3);
    assert_eq!(fighter.get_int("HP_MAX", 0), 28);
    let before = ability_total(&fighter);

    let gain = fighter.adjust_for_defeat_of_actor(&sample_goblin());
    assert!(gain.leveled_up());
    assert_eq!((gain.level_before, gain.level_after), (3, 4));
    assert_eq!(fighter.proficiency_bonus(), 2);

    // Level 4 grants one improvement of two points and another hit die's worth
    // of hit points.
    assert_eq!(fighter.get_int("ABILITY_IMPROVEMENTS", 0), 1);
    assert_eq!(ability_total(&fighter), before + 2);
    assert!(fighter.get_int("HP_MAX", 0) > 28);

    // Improvements are never granted twice.
    fighter.refresh_derived_values();
    assert_eq!(ability_total(&fighter), before + 2);
}

#[test]
fn test_proficiency_bonus_feeds_attacks() {
    let mut rogue = sample_rogue();
    rogue.utilise_additional_traits(vec![weapon("Rapier", "1D8", "martial finesse")]);
    // Finesse proficiency is doubled for rogues.
    assert_eq!(rogue.attacks()[0].proficiency_bonus, 4);
    assert_eq!(rogue.attacks()[0].ability_modifier, 3);

    rogue.set("EXP", 6500);
    assert_eq!(rogue.proficiency_bonus(), 3);
    assert_eq!(rogue.attacks()[0].proficiency_bonus, 6);
}

// =============================================================================
// Equipment and effects
// =============================================================================

#[test]
fn test_effects_layer_and_clear() {
    let mut hero = CharacterTraits::new(traits("NAME:Hero, STR:10"));
    hero.add_transient_effect(traits("NAME:Rage, FX_STR:20"));
    hero.utilise_additional_traits(vec![traits(
        "NAME:Belt of giant strength, TYPE_ID:ARMOUR, TYPE:belt, FX_STR:30",
    )]);
    assert_eq!(hero.get_effective_int("STR", 0), 60);

    hero.clear_transient_effects();
    assert_eq!(hero.get_effective_int("STR", 0), 40);

    hero.utilise_additional_traits(Vec::new());
    assert_eq!(hero.get_effective_int("STR", 0), 10);
}

#[test]
fn test_two_weapon_fighting() {
    let mut fighter = sample_fighter();
    fighter.utilise_additional_traits(vec![
        weapon("Shortsword", "1D6", "simple light"),
        weapon("Handaxe", "1D6", "simple light"),
    ]);
    let attacks = fighter.attacks();
    assert_eq!(attacks.len(), 2);
    assert_eq!(attacks[0].ability_modifier, 3);
    assert_eq!(attacks[1].ability_modifier, 0);

    fighter.utilise_additional_traits(vec![
        weapon("Maul", "2D6", "martial heavy"),
        weapon("Dagger", "1D4", "simple light"),
    ]);
    let attacks = fighter.attacks();
    assert_eq!(attacks.len(), 1);
    assert_eq!(attacks[0].name, "Maul");
    assert_eq!(attacks[0].max_damage(), 15);
}

#[test]
fn test_dressing_for_battle() {
    let mut fighter = sample_fighter();
    assert_eq!(fighter.effective_ac(), 10);
    assert_eq!(fighter.max_tiles_per_move(), 4);

    let mut splint = armour("Splint", "17", "heavy");
    splint.set("STR", 15);
    fighter.utilise_additional_traits(vec![
        splint,
        armour("Shield", "2", "shield"),
        armour("Cloak of protection", "+1", "cloak"),
        weapon("Longsword", "1D8", "martial"),
    ]);
    assert_eq!(fighter.effective_ac(), 20);
    assert_eq!(fighter.max_tiles_per_move(), 4);
    assert_eq!(fighter.attacks()[0].name, "Longsword");

    // Sapped strength no longer carries the splint at full speed.
    fighter.add_transient_effect(traits("NAME:Ray of enfeeblement, FX_STR:-4"));
    assert_eq!(fighter.get_effective_int("STR", 0), 12);
    assert_eq!(fighter.max_tiles_per_move(), 3);
}

//! Combat flows: melee rounds, poison, healing items and spells.
//!
//! Every die is scripted, so each assertion follows the arithmetic exactly.

use crawler_core::testing::{sample_fighter, sample_goblin, sample_wizard, weapon, ScriptedRoller};
use crawler_core::{
    get_consumption_benefit, get_melee_damage, get_poison_damage, get_spell_damage,
    get_spell_hp_gain, Advantage, MagicTraits, SpellDamage, Traits,
};

/// Route engine logs to the test output; filter with `RUST_LOG`.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn spell(definition: &str) -> MagicTraits {
    MagicTraits::parse_with(definition, &mut ScriptedRoller::default()).unwrap()
}

fn item(definition: &str) -> Traits {
    Traits::parse_with(definition, &mut ScriptedRoller::default()).unwrap()
}

// =============================================================================
// Melee
// =============================================================================

#[test]
fn test_fighter_clears_a_goblin() {
    init_tracing();
    let mut fighter = sample_fighter();
    fighter.utilise_additional_traits(vec![weapon("Longsword", "1D8", "martial versatile")]);
    let mut goblin = sample_goblin();
    let attack = fighter.attacks()[0].clone();
    assert_eq!(attack.attack_bonus(), 5);

    // 10 + 5 ties the goblin's AC 15: a hit for 4 + 3.
    let mut roller = ScriptedRoller::new([10, 4]);
    let damage = get_melee_damage(&mut roller, &attack, &goblin);
    assert_eq!(damage, 7);
    assert_eq!(roller.remaining(), 0);

    let hp = goblin.add_int("HP", -damage);
    assert_eq!(hp, 0);

    let gain = fighter.adjust_for_defeat_of_actor(&goblin);
    assert_eq!(gain.exp_after - gain.exp_before, 50);
    assert!(!gain.leveled_up());
}

#[test]
fn test_natural_rolls_override_armour() {
    init_tracing();
    let fighter = sample_fighter();
    let mut fortress = sample_goblin();
    fortress.set("AC", 30);
    let attack = &fighter.attacks()[0];

    // A natural 1 misses without rolling damage.
    let mut roller = ScriptedRoller::new([1]);
    assert_eq!(get_melee_damage(&mut roller, attack, &fortress), 0);
    assert_eq!(roller.rolls(), 1);

    // A natural 20 doubles the damage roll, even against AC 30.
    let mut roller = ScriptedRoller::new([20, 1]);
    let damage = get_melee_damage(&mut roller, attack, &fortress);
    assert_eq!(damage, 2 * (1 + 3));
}

#[test]
fn test_goblin_attacks_back() {
    init_tracing();
    let goblin = sample_goblin();
    let fighter = sample_fighter();
    let attack = &goblin.attacks()[0];

    // PB 2, STR -1: 9 + 1 meets the fighter's AC 10 and the damage floors at 0.
    let mut roller = ScriptedRoller::new([9, 1]);
    assert_eq!(get_melee_damage(&mut roller, attack, &fighter), 0);

    let mut roller = ScriptedRoller::new([8]);
    assert_eq!(get_melee_damage(&mut roller, attack, &fighter), 0);
    assert_eq!(roller.remaining(), 0);
}

#[test]
fn test_advantage_uses_better_die() {
    init_tracing();
    let fighter = sample_fighter();
    let goblin = sample_goblin();
    let attack = &fighter.attacks()[0];

    let roll = attack.roll_for_attack(&mut ScriptedRoller::new([3, 17]), Advantage::Advantage);
    assert_eq!(roll.natural, 17);
    let roll = attack.roll_for_attack(&mut ScriptedRoller::new([3, 17]), Advantage::Disadvantage);
    assert_eq!(roll.natural, 3);
    assert!(roll.total < goblin.effective_ac());
}

// =============================================================================
// Poison and healing
// =============================================================================

#[test]
fn test_poison_saving_throw_halves() {
    init_tracing();
    let fighter = sample_fighter();
    let spider = item("NAME:Spider, DMG:1D4, DMG_POISON:2D8, DC:11, DMG_SAVED:0.5");

    // 3 + 5 poison; d20 9 + CON 2 meets DC 11.
    let mut roller = ScriptedRoller::new([3, 5, 9]);
    assert_eq!(get_poison_damage(&mut roller, &spider, &fighter), 4);

    let mut roller = ScriptedRoller::new([3, 5, 8]);
    assert_eq!(get_poison_damage(&mut roller, &spider, &fighter), 8);
}

#[test]
fn test_poison_without_dc_lands_in_full() {
    init_tracing();
    let fighter = sample_fighter();
    let snake = item("NAME:Snake, DMG_POISON:1D6");
    let mut roller = ScriptedRoller::new([6]);
    assert_eq!(get_poison_damage(&mut roller, &snake, &fighter), 6);
    assert_eq!(roller.remaining(), 0);
}

#[test]
fn test_potion_heals_up_to_max() {
    init_tracing();
    let mut fighter = sample_fighter();
    fighter.set("HP", 5);
    let potion = item("NAME:Potion of healing, HP_GAIN:2D4+2");

    let mut roller = ScriptedRoller::new([4, 4]);
    assert_eq!(get_consumption_benefit(&mut roller, fighter.traits(), &potion), 7);

    let bread = item("NAME:Bread");
    assert_eq!(
        get_consumption_benefit(&mut ScriptedRoller::default(), fighter.traits(), &bread),
        0
    );
}

// =============================================================================
// Spells
// =============================================================================

#[test]
fn test_area_spell_against_saving_throw() {
    init_tracing();
    let wizard = sample_wizard();
    let goblin = sample_goblin();
    let burning_hands =
        spell("NAME:Burning Hands, LEVEL:1, DMG:3D6, DC:8, DMG_SAVED:0.5, TYPE:evocation");

    // DC 8 + INT 3 + proficiency 2 = 13; the goblin saves with DEX +2.
    let mut roller = ScriptedRoller::new([2, 3, 4, 10]);
    let result = get_spell_damage(&mut roller, &wizard, &burning_hands, &goblin, 2);
    assert_eq!(result, SpellDamage { damage: 9, drained: 0 });

    let mut roller = ScriptedRoller::new([2, 3, 4, 11]);
    let result = get_spell_damage(&mut roller, &wizard, &burning_hands, &goblin, 2);
    assert_eq!(result.damage, 5);
}

#[test]
fn test_ranged_spell_at_point_blank() {
    init_tracing();
    let wizard = sample_wizard();
    let goblin = sample_goblin();
    let fire_bolt = spell("NAME:Fire Bolt, LEVEL:1, DMG:1D10, MODE:ranged");

    // Adjacent: disadvantage keeps the 5, so 5 + 2 + 3 misses AC 15.
    let mut roller = ScriptedRoller::new([18, 5]);
    let result = get_spell_damage(&mut roller, &wizard, &fire_bolt, &goblin, 1);
    assert_eq!(result.damage, 0);

    // At range a single 10 hits for 6 + 3.
    let mut roller = ScriptedRoller::new([10, 6]);
    let result = get_spell_damage(&mut roller, &wizard, &fire_bolt, &goblin, 3);
    assert_eq!(result.damage, 9);
}

#[test]
fn test_vampiric_touch_drains() {
    init_tracing();
    let wizard = sample_wizard();
    let goblin = sample_goblin();
    let touch = spell("NAME:Vampiric Touch, LEVEL:1, DMG:1D6, MODE:vampiric melee");

    let mut roller = ScriptedRoller::new([15, 4]);
    let result = get_spell_damage(&mut roller, &wizard, &touch, &goblin, 1);
    assert_eq!(result, SpellDamage { damage: 7, drained: 7 });
}

#[test]
fn test_undead_immunity() {
    init_tracing();
    let wizard = sample_wizard();
    let mut skeleton = sample_goblin();
    skeleton.set("UNDEAD", true);
    let touch = spell("NAME:Chill, DMG:1D8, MODE:melee, UNDEAD_IMMUNE:yes");

    let mut roller = ScriptedRoller::default();
    let result = get_spell_damage(&mut roller, &wizard, &touch, &skeleton, 1);
    assert_eq!(result, SpellDamage::default());
    assert_eq!(roller.rolls(), 0);
}

#[test]
fn test_healing_spell_limited_by_shortfall() {
    init_tracing();
    let wizard = sample_wizard();
    let mut fighter = sample_fighter();
    fighter.set("HP", 10);
    let cure = spell("NAME:Cure Wounds, LEVEL:1, HP_GAIN:1D8");

    let mut roller = ScriptedRoller::new([8]);
    assert_eq!(get_spell_hp_gain(&mut roller, &wizard, &cure, fighter.traits()), 2);

    let mut roller = ScriptedRoller::new([1]);
    assert_eq!(get_spell_hp_gain(&mut roller, &wizard, &cure, fighter.traits()), 1);
}

//! Trait and combat-resolution engine for a D&D 5e inspired dungeon crawler.
//!
//! This crate provides:
//! - Dice notation parsing and rolling behind a swappable `DieRoller`
//! - Trait stores for artefacts, spells and characters
//! - Character derivation: level, hit points, attacks, armour class, movement
//! - Action resolution for melee, poison, spells, rests and ability checks
//! - Casting power rules and save-game persistence
//!
//! # Quick Start
//!
//! ```
//! use crawler_core::{get_melee_damage, CharacterTraits, RollerConfig};
//!
//! let mut roller = RollerConfig::new().with_seed(1).build();
//! let hero = CharacterTraits::parse("NAME:Brakka, CLASS:fighter, STR:16, HIT_DICE:1D10")?;
//! let goblin = CharacterTraits::parse("NAME:Goblin, TYPE_ID:ENEMY, AC:15, HP:7, DMG:1D6")?;
//!
//! let damage = get_melee_damage(&mut roller, &hero.attacks()[0], &goblin);
//! assert!(damage >= 0);
//! # Ok::<(), crawler_core::TraitError>(())
//! ```

pub mod ability;
pub mod actions;
pub mod attack;
pub mod character;
pub mod class_data;
pub mod config;
pub mod dice;
pub mod difficulty;
pub mod magic;
pub mod magic_traits;
pub mod persist;
pub mod progression;
pub mod testing;
pub mod traits;

// Primary public API
pub use ability::Ability;
pub use actions::*;
pub use attack::{AttackDetail, AttackRoll};
pub use character::{CharacterTraits, ExperienceGain};
pub use class_data::CharacterClass;
pub use config::{GameRoller, RollerConfig};
pub use dice::{Advantage, DiceDetails, DiceError, DieRoller};
pub use difficulty::Difficulty;
pub use magic_traits::MagicTraits;
pub use persist::{revive_any, PersistError, Revive, RevivedTraits};
pub use traits::{TraitError, TraitValue, Traits};

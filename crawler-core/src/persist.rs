//! Save-game persistence for trait stores.
//!
//! Every store saves as `{"reviver": "<kind>", "data": [[key, value], ...]}`.
//! The reviver name lets a loader rebuild the right kind of store. Only the
//! persisted traits are saved: equipment contributions, transient effects
//! and other derived values are recomputed when a character is revived.

use crate::character::CharacterTraits;
use crate::magic_traits::MagicTraits;
use crate::traits::{TraitValue, Traits};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const TRAITS_REVIVER: &str = "Traits";
pub const MAGIC_TRAITS_REVIVER: &str = "MagicTraits";
pub const CHARACTER_TRAITS_REVIVER: &str = "CharacterTraits";

/// Errors from persistence operations.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown reviver: {0}")]
    UnknownReviver(String),

    #[error("Reviver mismatch: expected {expected}, found {found}")]
    ReviverMismatch {
        expected: &'static str,
        found: String,
    },
}

/// Serialized form of a trait store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedTraits {
    pub reviver: String,
    pub data: Vec<(String, TraitValue)>,
}

/// A trait store that can be saved and revived.
pub trait Revive: Sized {
    /// Name written to the `reviver` field.
    const REVIVER: &'static str;

    /// The traits that are saved.
    fn persisted_traits(&self) -> &Traits;

    /// Rebuild the store, re-deriving anything not saved.
    fn from_persisted_traits(traits: Traits) -> Self;

    fn to_persisted(&self) -> PersistedTraits {
        PersistedTraits {
            reviver: Self::REVIVER.to_string(),
            data: self
                .persisted_traits()
                .all_traits()
                .map(|(key, value)| (key.to_string(), value.clone()))
                .collect(),
        }
    }

    fn to_json(&self) -> Result<serde_json::Value, PersistError> {
        Ok(serde_json::to_value(self.to_persisted())?)
    }

    fn to_json_string(&self) -> Result<String, PersistError> {
        Ok(serde_json::to_string(&self.to_persisted())?)
    }

    fn from_persisted(persisted: PersistedTraits) -> Result<Self, PersistError> {
        if persisted.reviver != Self::REVIVER {
            return Err(PersistError::ReviverMismatch {
                expected: Self::REVIVER,
                found: persisted.reviver,
            });
        }
        Ok(Self::from_persisted_traits(Traits::from_pairs(persisted.data)))
    }

    fn revive(value: serde_json::Value) -> Result<Self, PersistError> {
        Self::from_persisted(serde_json::from_value(value)?)
    }

    fn revive_str(json: &str) -> Result<Self, PersistError> {
        Self::from_persisted(serde_json::from_str(json)?)
    }
}

impl Revive for Traits {
    const REVIVER: &'static str = TRAITS_REVIVER;

    fn persisted_traits(&self) -> &Traits {
        self
    }

    fn from_persisted_traits(traits: Traits) -> Self {
        traits
    }
}

impl Revive for MagicTraits {
    const REVIVER: &'static str = MAGIC_TRAITS_REVIVER;

    fn persisted_traits(&self) -> &Traits {
        self.traits()
    }

    fn from_persisted_traits(traits: Traits) -> Self {
        MagicTraits::new(traits)
    }
}

impl Revive for CharacterTraits {
    const REVIVER: &'static str = CHARACTER_TRAITS_REVIVER;

    fn persisted_traits(&self) -> &Traits {
        self.traits()
    }

    fn from_persisted_traits(traits: Traits) -> Self {
        CharacterTraits::new(traits)
    }
}

/// Any of the revivable stores.
#[derive(Debug, Clone, PartialEq)]
pub enum RevivedTraits {
    Traits(Traits),
    Magic(MagicTraits),
    Character(Box<CharacterTraits>),
}

/// Rebuild whichever store `value` holds, dispatching on its reviver name.
pub fn revive_any(value: serde_json::Value) -> Result<RevivedTraits, PersistError> {
    let persisted: PersistedTraits = serde_json::from_value(value)?;
    let revived = match persisted.reviver.as_str() {
        TRAITS_REVIVER => RevivedTraits::Traits(Traits::from_persisted(persisted)?),
        MAGIC_TRAITS_REVIVER => RevivedTraits::Magic(MagicTraits::from_persisted(persisted)?),
        CHARACTER_TRAITS_REVIVER => {
            RevivedTraits::Character(Box::new(CharacterTraits::from_persisted(persisted)?))
        }
        _ => return Err(PersistError::UnknownReviver(persisted.reviver)),
    };
    Ok(revived)
}

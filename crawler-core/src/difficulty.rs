//! Named difficulty classes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Named task difficulties and their DC values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    VeryEasy,
    Easy,
    Medium,
    Hard,
    VeryHard,
    NearlyImpossible,
    Impossible,
}

impl Difficulty {
    pub fn dc(&self) -> i32 {
        match self {
            Difficulty::VeryEasy => 5,
            Difficulty::Easy => 10,
            Difficulty::Medium => 15,
            Difficulty::Hard => 20,
            Difficulty::VeryHard => 25,
            Difficulty::NearlyImpossible => 30,
            Difficulty::Impossible => 999,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Difficulty::VeryEasy => "VERY_EASY",
            Difficulty::Easy => "EASY",
            Difficulty::Medium => "MEDIUM",
            Difficulty::Hard => "HARD",
            Difficulty::VeryHard => "VERY_HARD",
            Difficulty::NearlyImpossible => "NEARLY_IMPOSSIBLE",
            Difficulty::Impossible => "IMPOSSIBLE",
        }
    }

    /// Look up a difficulty by name, ignoring case and treating spaces as
    /// underscores.
    pub fn from_name(name: &str) -> Option<Difficulty> {
        let normalized = name.trim().to_uppercase().replace(' ', "_");
        Self::all().into_iter().find(|d| d.name() == normalized)
    }

    pub fn all() -> [Difficulty; 7] {
        [
            Difficulty::VeryEasy,
            Difficulty::Easy,
            Difficulty::Medium,
            Difficulty::Hard,
            Difficulty::VeryHard,
            Difficulty::NearlyImpossible,
            Difficulty::Impossible,
        ]
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_values() {
        assert_eq!(Difficulty::VeryEasy.dc(), 5);
        assert_eq!(Difficulty::Medium.dc(), 15);
        assert_eq!(Difficulty::NearlyImpossible.dc(), 30);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Difficulty::from_name("hard"), Some(Difficulty::Hard));
        assert_eq!(Difficulty::from_name("very easy"), Some(Difficulty::VeryEasy));
        assert_eq!(
            Difficulty::from_name("NEARLY_IMPOSSIBLE"),
            Some(Difficulty::NearlyImpossible)
        );
        assert_eq!(Difficulty::from_name("TRIVIAL"), None);
    }
}

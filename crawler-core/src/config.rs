//! Dice roller configuration.
use crate::dice::DieRoller;
use rand::rngs::{StdRng, ThreadRng};
use rand::SeedableRng;
use std::env;

/// Environment variable holding a dice seed for replayable games.
pub const DICE_SEED_ENV: &str = "CRAWLER_DICE_SEED";

/// How the game's dice are rolled.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RollerConfig {
    pub seed: Option<u64>,
}

impl RollerConfig {
    pub const fn new() -> Self {
        Self { seed: None }
    }

    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Construct configuration from process environment variables.
    ///
    /// - `CRAWLER_DICE_SEED`
    pub fn from_env() -> Self {
        Self::from_seed_value(env::var(DICE_SEED_ENV).ok().as_deref())
    }

    fn from_seed_value(value: Option<&str>) -> Self {
        let mut config = Self::new();
        if let Some(raw) = value {
            match raw.trim().parse::<u64>() {
                Ok(seed) => config.seed = Some(seed),
                Err(_) => tracing::warn!(
                    variable = DICE_SEED_ENV,
                    value = raw,
                    "ignoring unparseable dice seed"
                ),
            }
        }
        config
    }

    pub fn build(&self) -> GameRoller {
        match self.seed {
            Some(seed) => {
                tracing::debug!(seed, "using seeded dice");
                GameRoller::Seeded(StdRng::seed_from_u64(seed))
            }
            None => GameRoller::Thread(rand::thread_rng()),
        }
    }
}

/// The roller a running game uses.
#[derive(Debug)]
pub enum GameRoller {
    Thread(ThreadRng),
    Seeded(StdRng),
}

impl DieRoller for GameRoller {
    fn roll_die(&mut self, sides: u32) -> u32 {
        match self {
            GameRoller::Thread(rng) => rng.roll_die(sides),
            GameRoller::Seeded(rng) => rng.roll_die(sides),
        }
    }
}

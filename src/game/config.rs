//! World Configuration
//!
//! Tunables for a run. `Default` reproduces the stock game; a JSON file can
//! override any subset of fields.

use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An odds value of zero
    #[error("{field} must be greater than zero")]
    ZeroOdds {
        /// Offending field
        field: &'static str,
    },

    /// No bacteria in any pit pool
    #[error("pit pools are all empty; no bacteria would ever be released")]
    EmptyPitPools,

    /// Spray cap of zero
    #[error("player spray cap must be greater than zero")]
    ZeroSprayCap,

    /// Starting sprays above the cap
    #[error("starting sprays ({sprays}) exceed the spray cap ({cap})")]
    SpraysAboveCap {
        /// Configured starting sprays
        sprays: u32,
        /// Configured cap
        cap: u32,
    },

    /// Starting health outside 1..=max
    #[error("starting health must be in 1..={max}, got {health}")]
    InvalidHealth {
        /// Configured starting health
        health: i32,
        /// Configured maximum
        max: i32,
    },

    /// JSON parse failure
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
}

/// Odds of the per-tick goodie and fungus rolls.
///
/// Each roll succeeds with probability `1 / max(base - step * level, floor)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnOdds {
    /// Base odds before the per-level reduction
    pub base_odds: u32,
    /// Reduction per level
    pub level_step: u32,
    /// Lowest odds for beneficial goodies
    pub goodie_floor: u32,
    /// Lowest odds for fungus
    pub fungus_floor: u32,
}

impl Default for SpawnOdds {
    fn default() -> Self {
        Self {
            base_odds: 510,
            level_step: 10,
            goodie_floor: 250,
            fungus_floor: 200,
        }
    }
}

impl SpawnOdds {
    /// Odds of a beneficial goodie this tick at `level`.
    pub fn goodie_odds(&self, level: u32) -> u32 {
        self.scaled(level).max(self.goodie_floor)
    }

    /// Odds of a fungus this tick at `level`.
    pub fn fungus_odds(&self, level: u32) -> u32 {
        self.scaled(level).max(self.fungus_floor)
    }

    fn scaled(&self, level: u32) -> u32 {
        self.base_odds.saturating_sub(self.level_step.saturating_mul(level))
    }
}

/// Pit inventory and release rate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PitConfig {
    /// Regular salmonella per pit
    pub regular_salmonella: u32,
    /// Aggressive salmonella per pit
    pub aggressive_salmonella: u32,
    /// E. coli per pit
    pub ecoli: u32,
    /// A pit releases with probability 1 / `release_odds` per tick
    pub release_odds: u32,
}

impl Default for PitConfig {
    fn default() -> Self {
        Self {
            regular_salmonella: 5,
            aggressive_salmonella: 3,
            ecoli: 2,
            release_odds: 50,
        }
    }
}

impl PitConfig {
    /// Bacteria one pit holds at creation.
    pub fn total(&self) -> u32 {
        self.regular_salmonella
            .saturating_add(self.aggressive_salmonella)
            .saturating_add(self.ecoli)
    }
}

/// Player starting charges and limits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Spray charges at level start
    pub starting_sprays: u32,
    /// Flame charges at level start
    pub starting_flames: u32,
    /// Health at level start
    pub starting_health: i32,
    /// Health never rises above this
    pub max_health: i32,
    /// Spray charges never rise above this
    pub spray_cap: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            starting_sprays: 20,
            starting_flames: 5,
            starting_health: 100,
            max_health: 100,
            spray_cap: 20,
        }
    }
}

/// Configuration for a run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Base seed; each level derives its own RNG seed from it
    pub seed: u64,
    /// Goodie and fungus spawn odds
    pub spawn: SpawnOdds,
    /// Pit configuration
    pub pit: PitConfig,
    /// Player configuration
    pub player: PlayerConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 0x5EED_D15C,
            spawn: SpawnOdds::default(),
            pit: PitConfig::default(),
            player: PlayerConfig::default(),
        }
    }
}

impl WorldConfig {
    /// Parse and validate a JSON config. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration can produce a playable level.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.spawn.goodie_floor == 0 {
            return Err(ConfigError::ZeroOdds { field: "spawn.goodie_floor" });
        }
        if self.spawn.fungus_floor == 0 {
            return Err(ConfigError::ZeroOdds { field: "spawn.fungus_floor" });
        }
        if self.pit.release_odds == 0 {
            return Err(ConfigError::ZeroOdds { field: "pit.release_odds" });
        }
        if self.pit.total() == 0 {
            return Err(ConfigError::EmptyPitPools);
        }
        if self.player.spray_cap == 0 {
            return Err(ConfigError::ZeroSprayCap);
        }
        if self.player.starting_sprays > self.player.spray_cap {
            return Err(ConfigError::SpraysAboveCap {
                sprays: self.player.starting_sprays,
                cap: self.player.spray_cap,
            });
        }
        if self.player.starting_health <= 0 || self.player.starting_health > self.player.max_health {
            return Err(ConfigError::InvalidHealth {
                health: self.player.starting_health,
                max: self.player.max_health,
            });
        }
        Ok(())
    }
}

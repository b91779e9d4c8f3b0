//! Session configuration
//!
//! `SessionConfig` is plain serde data with working defaults. It can be
//! overridden from environment variables or parsed from JSON, then checked
//! with [`SessionConfig::validate`] before a session is built.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ability::AbilityConfig;
use crate::gem::{Gem, GemId};
use crate::types::{
    GemType, BOMB_DESTROY_DELAY_MS, DEFAULT_BOARD_HEIGHT, DEFAULT_BOARD_WIDTH, DEFAULT_BOMB_SCORE,
    DEFAULT_GEM_SCORE, MAX_BOARD_SIDE, MIN_BOARD_SIDE, NEIGHBOR_DESTROY_DELAY_MS,
};

/// One generatable gem kind and what it scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GemSpec {
    pub kind: GemType,
    pub score: u32,
}

/// The kinds a generator may draw from, plus the bomb template's score
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GemCatalog {
    pub gems: Vec<GemSpec>,
    pub bomb_score: u32,
}

impl Default for GemCatalog {
    fn default() -> Self {
        Self {
            gems: GemType::COLORS
                .iter()
                .map(|&kind| GemSpec {
                    kind,
                    score: DEFAULT_GEM_SCORE,
                })
                .collect(),
            bomb_score: DEFAULT_BOMB_SCORE,
        }
    }
}

impl GemCatalog {
    /// Template for freshly created bombs; ids are assigned on clone
    pub fn bomb_template(&self) -> Gem {
        Gem::new(GemId(0), GemType::Bomb, self.bomb_score)
    }

    /// Score for `kind`, if the catalog lists it
    pub fn score_of(&self, kind: GemType) -> Option<u32> {
        if kind == GemType::Bomb {
            return Some(self.bomb_score);
        }
        self.gems.iter().find(|spec| spec.kind == kind).map(|spec| spec.score)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("board {width}x{height} outside {min}..={max}")]
    BadDimensions { width: u8, height: u8, min: u8, max: u8 },
    #[error("gem catalog is empty")]
    EmptyCatalog,
    #[error("gem catalog lists {0:?}; bombs are created by the cascade only")]
    BombInCatalog(GemType),
    #[error("gem catalog lists {0:?} twice")]
    DuplicateKind(GemType),
    #[error("invalid config json: {0}")]
    Json(String),
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::BadDimensions { .. } => "bad_dimensions",
            ConfigError::EmptyCatalog => "empty_catalog",
            ConfigError::BombInCatalog(_) => "bomb_in_catalog",
            ConfigError::DuplicateKind(_) => "duplicate_kind",
            ConfigError::Json(_) => "json",
        }
    }
}

/// Everything needed to start a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub width: u8,
    pub height: u8,
    pub seed: u32,
    pub catalog: GemCatalog,
    pub neighbor_destroy_delay_ms: u32,
    pub bomb_destroy_delay_ms: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_BOARD_WIDTH,
            height: DEFAULT_BOARD_HEIGHT,
            seed: 1,
            catalog: GemCatalog::default(),
            neighbor_destroy_delay_ms: NEIGHBOR_DESTROY_DELAY_MS,
            bomb_destroy_delay_ms: BOMB_DESTROY_DELAY_MS,
        }
    }
}

impl SessionConfig {
    /// Defaults overridden by `GEM_CASCADE_WIDTH`, `GEM_CASCADE_HEIGHT` and
    /// `GEM_CASCADE_SEED`. Unparseable values keep the default.
    pub fn from_env() -> Self {
        use std::env;

        let defaults = Self::default();
        let width = env::var("GEM_CASCADE_WIDTH")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.width);
        let height = env::var("GEM_CASCADE_HEIGHT")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.height);
        let seed = env::var("GEM_CASCADE_SEED")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(defaults.seed);

        Self {
            width,
            height,
            seed,
            ..defaults
        }
    }

    /// Parse and validate. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|e| ConfigError::Json(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let side = MIN_BOARD_SIDE..=MAX_BOARD_SIDE;
        if !side.contains(&self.width) || !side.contains(&self.height) {
            return Err(ConfigError::BadDimensions {
                width: self.width,
                height: self.height,
                min: MIN_BOARD_SIDE,
                max: MAX_BOARD_SIDE,
            });
        }
        if self.catalog.gems.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        for (i, spec) in self.catalog.gems.iter().enumerate() {
            if spec.kind == GemType::Bomb {
                return Err(ConfigError::BombInCatalog(spec.kind));
            }
            if self.catalog.gems[..i].iter().any(|earlier| earlier.kind == spec.kind) {
                return Err(ConfigError::DuplicateKind(spec.kind));
            }
        }
        Ok(())
    }

    pub fn ability_config(&self) -> AbilityConfig {
        AbilityConfig {
            neighbor_delay_ms: self.neighbor_destroy_delay_ms,
            bomb_delay_ms: self.bomb_destroy_delay_ms,
        }
    }
}

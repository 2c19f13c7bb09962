//! Game configuration.
//!
//! Defaults reproduce the stock 15x15 board. A config can be loaded from
//! TOML; any missing key keeps its default.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::game::BodyKind;

/// Smallest supported table.
pub const MIN_PLAYERS: u8 = 2;
/// Largest supported table.
pub const MAX_PLAYERS: u8 = 4;
/// Deepest supported board.
pub const MAX_DEPTH: u16 = 3;
/// Widest or tallest supported board.
pub const MAX_BOARD_SIDE: u16 = 64;
/// Most base probes per turn a config may grant.
pub const MAX_PROBES_PER_TURN: u32 = 8;

/// Rules and dimensions for a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Board width.
    pub width: u16,
    /// Board height.
    pub height: u16,
    /// Default layer count (a new game picks its own depth).
    pub layers: u16,
    /// Starting currency on single-layer boards.
    pub starting_currency_single: u32,
    /// Starting currency on two-layer boards.
    pub starting_currency_two: u32,
    /// Starting currency on three-layer boards.
    pub starting_currency_three: u32,
    /// Report near misses for empty probes.
    pub near_miss_reporting: bool,
    /// Probes a player normally takes per turn.
    pub probes_per_turn: u32,
    /// Structure type that doubles a player's probes.
    pub double_probe_kind: BodyKind,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 15,
            height: 15,
            layers: 1,
            starting_currency_single: 20,
            starting_currency_two: 32,
            starting_currency_three: 40,
            near_miss_reporting: true,
            probes_per_turn: 1,
            double_probe_kind: BodyKind::Planet,
        }
    }
}

impl GameConfig {
    /// Parse a TOML config and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or fails validation.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Check dimensions and probe budget.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sides = 1..=MAX_BOARD_SIDE;
        if !sides.contains(&self.width) || !sides.contains(&self.height) {
            return Err(ConfigError::Dimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.layers == 0 || self.layers > MAX_DEPTH {
            return Err(ConfigError::Depth(self.layers));
        }
        if !(1..=MAX_PROBES_PER_TURN).contains(&self.probes_per_turn) {
            return Err(ConfigError::ProbesPerTurn);
        }
        Ok(())
    }

    /// Check a table size and depth for a new game.
    ///
    /// # Errors
    ///
    /// Returns an error if either is out of range.
    pub fn validate_table(players: u8, depth: u16) -> Result<(), ConfigError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players) {
            return Err(ConfigError::PlayerCount(players));
        }
        if !(1..=MAX_DEPTH).contains(&depth) {
            return Err(ConfigError::Depth(depth));
        }
        Ok(())
    }

    /// Starting currency for a table; only the depth matters.
    #[must_use]
    pub fn starting_currency(&self, _players: u8, depth: u16) -> u32 {
        match depth {
            0 | 1 => self.starting_currency_single,
            2 => self.starting_currency_two,
            _ => self.starting_currency_three,
        }
    }
}

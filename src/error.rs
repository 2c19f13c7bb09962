//! Error types for configuration, catalogs and scripted play.
//!
//! Rule outcomes (probes, placement checks, power plays) are plain values;
//! these errors cover setup, loading and purchases.

use std::io;

use thiserror::Error;

use crate::game::{BodyKind, PlayerId};

/// Invalid or unreadable game configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Player count outside the supported range.
    #[error("player count {0} is outside 2..=4")]
    PlayerCount(u8),
    /// Depth outside the supported range.
    #[error("depth {0} is outside 1..=3")]
    Depth(u16),
    /// A board dimension is zero or too large.
    #[error("board sides must be within 1..=64 (got {width}x{height})")]
    Dimensions {
        /// Configured width.
        width: u16,
        /// Configured height.
        height: u16,
    },
    /// Base probes per turn is zero or too large.
    #[error("probes_per_turn must be within 1..=8")]
    ProbesPerTurn,
    /// The file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),
    /// The file is not valid TOML for a config.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Invalid or unreadable body catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Two entries share a type tag.
    #[error("duplicate catalog entry for {0}")]
    Duplicate(BodyKind),
    /// An entry covers no cells.
    #[error("{0} has an empty shape")]
    EmptyShape(BodyKind),
    /// An entry covers the same cell twice.
    #[error("{0} repeats a shape offset")]
    RepeatedOffset(BodyKind),
    /// The file could not be read.
    #[error("failed to read catalog: {0}")]
    Io(#[from] io::Error),
    /// The file is not valid catalog JSON.
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Why a purchase was refused.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PurchaseError {
    /// The game has ended.
    #[error("the game is over")]
    GameOver,
    /// A probe is waiting for the defender's decision.
    #[error("a probe is pending")]
    ProbePending,
    /// No such player.
    #[error("unknown player {0}")]
    UnknownPlayer(PlayerId),
    /// The catalog has no entry for the type.
    #[error("{0} is not in the catalog")]
    UnknownBody(BodyKind),
    /// Not enough currency.
    #[error("{kind} costs {price}, only {available} available")]
    InsufficientCurrency {
        /// Requested type.
        kind: BodyKind,
        /// Its price.
        price: u32,
        /// Player's balance.
        available: u32,
    },
    /// A prerequisite body is missing or not encircled.
    #[error("{0} is locked: {1}")]
    Locked(BodyKind, &'static str),
    /// Out of bounds, overlapping or over a probed cell.
    #[error("{0} cannot be placed there")]
    Blocked(BodyKind),
}

/// Failure while loading or running a scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    /// The file could not be read.
    #[error("failed to read scenario: {0}")]
    Io(#[from] io::Error),
    /// The file is not valid scenario JSON.
    #[error("failed to parse scenario: {0}")]
    Parse(#[from] serde_json::Error),
    /// Setup rejected the scenario's player count or depth.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// An action names a player that is not seated.
    #[error("action {step} references unknown player {player}")]
    UnknownPlayer {
        /// Zero-based action index.
        step: usize,
        /// Referenced player.
        player: PlayerId,
    },
}

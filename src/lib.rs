// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Deepfield: rules engine for a multiplayer hidden-grid strategy game.
//!
//! Each player hides celestial bodies on a private board one to three
//! layers deep, then players take turns probing each other's boards.
//! Fully probed bodies are colonized and hand their powers to the
//! attacker; the last player with an uncolonized body wins.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │     CLI / Scenario Runner           │
//! ├─────────────────────────────────────┤
//! │  GameState (turns, probes, powers)  │
//! ├─────────────────────────────────────┤
//! │  Board + Bodies    │  BodyCatalog   │
//! └─────────────────────────────────────┘
//! ```
//!
//! The engine is synchronous and single-threaded. A probe that the
//! defender may answer with a false report is parked as a pending probe
//! until the caller resolves it.

pub mod catalog;
pub mod config;
pub mod error;
pub mod game;
pub mod scenario;

pub use catalog::BodyCatalog;
pub use config::GameConfig;
pub use error::{CatalogError, ConfigError, PurchaseError, ScenarioError};

// Re-export key game types at crate root for convenience
pub use game::{
    Board, BodyKind, BodyRef, Coord, GameEvent, GameState, Phase, PlayerId, PlayerState,
    ProbeOutcome,
};

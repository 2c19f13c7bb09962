//! Game layer for Deepfield.
//!
//! Implements the rules of the hidden-grid game:
//! - Boards of cells, one to three layers deep
//! - Bodies placed from a shared catalog, probed until colonized
//! - Powers granted on placement or colonization
//! - The placement/probing turn machine, false reports and victory

mod board;
mod body;
mod economy;
mod events;
mod invariants;
mod player;
mod power;
mod state;
mod turn;

pub use board::{Board, Cell, CellReport, Coord, ProbeOutcome};
pub use body::{BodyDefinition, BodyId, BodyInstance, BodyKind, BodyRef, BodyShape, NearMissPattern};
pub use economy::{encircles_star, lock_reason, DYSON_STAR_RADIUS};
pub use events::GameEvent;
pub use invariants::{assert_invariants, check_invariants, InvariantViolation};
pub use player::{seat_label, GrantedPower, PlayerId, PlayerState};
pub use power::{Power, PowerContext, PowerEffect, PowerTiming};
pub use state::{GameState, PendingProbe, Phase};
pub use turn::{AdvanceDelay, TurnTracker};

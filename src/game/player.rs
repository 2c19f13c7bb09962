//! Player state management.

use crate::game::{Board, BodyInstance, BodyKind, BodyRef, Power, PowerEffect};

/// Unique identifier for a player (its seat index, starting at 0).
pub type PlayerId = u8;

/// Seat letter used in logs and reports (`0` is `A`).
#[must_use]
pub fn seat_label(id: PlayerId) -> char {
    char::from(b'A'.saturating_add(id))
}

/// A power handed to a player.
#[derive(Debug, Clone)]
pub struct GrantedPower {
    /// Private copy of the prototype.
    pub power: Power,
    /// Body that granted it.
    pub source: Option<BodyRef>,
    /// Passive powers are marked consumed until the owner's next turn.
    pub consumed: bool,
}

impl GrantedPower {
    /// Wrap a freshly cloned prototype.
    #[must_use]
    pub fn new(power: Power, source: Option<BodyRef>) -> Self {
        Self {
            power,
            source,
            consumed: false,
        }
    }

    /// Whether the power can be played right now.
    #[must_use]
    pub fn is_available(&self) -> bool {
        !(self.power.is_passive() && self.consumed)
    }
}

/// State for a single player.
#[derive(Debug, Clone)]
pub struct PlayerState {
    /// Seat identifier.
    pub id: PlayerId,
    /// Hidden board, owned exclusively by this player.
    pub board: Board,
    /// Currency available for purchases.
    pub currency: u32,
    /// Tokens that can turn a hit into a reported miss.
    pub false_report_tokens: u32,
    /// Done placing bodies for the placement phase.
    pub placement_ready: bool,
    /// Granted powers, in grant order.
    pub powers: Vec<GrantedPower>,
}

impl PlayerState {
    /// Create a player with an empty board.
    #[must_use]
    pub fn new(id: PlayerId, board: Board, currency: u32) -> Self {
        Self {
            id,
            board,
            currency,
            false_report_tokens: 0,
            placement_ready: false,
            powers: Vec::new(),
        }
    }

    /// Bodies placed on this player's board.
    #[must_use]
    pub fn bodies(&self) -> &[BodyInstance] {
        self.board.bodies()
    }

    /// Whether at least one body has been placed.
    #[must_use]
    pub fn has_placed_bodies(&self) -> bool {
        !self.board.bodies().is_empty()
    }

    /// Eliminated once every placed body is fully colonized.
    ///
    /// A player who never placed anything is not eliminated.
    #[must_use]
    pub fn is_eliminated(&self) -> bool {
        self.has_placed_bodies() && self.bodies().iter().all(BodyInstance::is_fully_colonized)
    }

    /// Whether the player owns a body of the given type.
    #[must_use]
    pub fn owns_kind(&self, kind: BodyKind) -> bool {
        self.bodies().iter().any(|body| body.kind() == kind)
    }

    /// Un-consume every passive power.
    pub fn reset_passive_powers(&mut self) {
        for granted in &mut self.powers {
            if granted.power.is_passive() {
                granted.consumed = false;
            }
        }
    }

    /// Remove the first available false-report power, if any.
    pub fn take_false_report_power(&mut self) -> Option<GrantedPower> {
        let idx = self.powers.iter().position(|granted| {
            granted.power.effect == PowerEffect::FalseReport && granted.is_available()
        })?;
        Some(self.powers.remove(idx))
    }
}

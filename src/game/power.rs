//! Granted abilities and their effects.
//!
//! Powers form a closed set of effects. Each is played through a
//! [`PowerContext`] that names the acting player, the resolved target and
//! the cell picked by the caller. A failed play leaves the game untouched.

use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::game::{BodyRef, Coord, GameState, PlayerId};

/// When and how a power is played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerTiming {
    /// Played openly against the opponent's board.
    OffensiveFaceUp,
    /// Held face down and played on the owner's behalf.
    DefensiveFaceDown,
    /// Reusable; refreshes at the start of the owner's turn.
    PassiveUpkeep,
}

/// What a power does when played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum PowerEffect {
    /// Grant the owner one false-report token.
    FalseReport,
    /// Reveal a whole row on the target board.
    ScanRow,
    /// Reveal a column, or a centered span of it.
    ScanColumn {
        /// Limit the scan to `max(3, height / 2)` cells around the target.
        #[serde(default)]
        half_range: bool,
    },
    /// Reveal the target cell and its neighborhood.
    RevealNeighbors {
        /// Include the four planar diagonals.
        #[serde(default)]
        diagonals: bool,
        /// Include the layers above and below.
        #[serde(default)]
        vertical: bool,
    },
    /// Add currency to the owner.
    GainCurrency {
        /// Amount gained.
        amount: u32,
    },
    /// Erase a probe on the target's board.
    ScrambleProbe,
    /// Erase a probe on the owner's own board.
    EraseProbe,
}

impl PowerEffect {
    /// Whether the caller must supply a target cell.
    #[must_use]
    pub const fn requires_target_cell(self) -> bool {
        !matches!(self, Self::FalseReport | Self::GainCurrency { .. })
    }
}

/// A power prototype, or a granted copy of one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Power {
    /// Card title.
    pub name: String,
    /// Rules text.
    #[serde(default)]
    pub text: String,
    /// Timing class.
    pub timing: PowerTiming,
    /// Effect.
    #[serde(flatten)]
    pub effect: PowerEffect,
}

impl Power {
    /// Create a power.
    #[must_use]
    pub fn new(name: impl Into<String>, text: impl Into<String>, timing: PowerTiming, effect: PowerEffect) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            timing,
            effect,
        }
    }

    /// Whether the caller must supply a target cell.
    #[must_use]
    pub const fn requires_target_cell(&self) -> bool {
        self.effect.requires_target_cell()
    }

    /// Whether the power survives being played.
    #[must_use]
    pub const fn is_passive(&self) -> bool {
        matches!(self.timing, PowerTiming::PassiveUpkeep)
    }

    /// Apply the effect.
    ///
    /// Returns `false`, with no state change, if the context lacks a
    /// reference the effect needs.
    pub fn try_play(&self, ctx: &mut PowerContext<'_>) -> bool {
        if ctx.game.player(ctx.actor).is_none() {
            return false;
        }

        match self.effect {
            PowerEffect::FalseReport => ctx.game.player_mut(ctx.actor).is_some_and(|player| {
                player.false_report_tokens += 1;
                true
            }),
            PowerEffect::GainCurrency { amount } => ctx.game.player_mut(ctx.actor).is_some_and(|player| {
                player.currency += amount;
                true
            }),
            PowerEffect::ScanRow => {
                let Some(target) = ctx.resolved_target() else {
                    return false;
                };
                ctx.game.reveal_row(ctx.actor, target, ctx.cell.y, ctx.cell.z);
                true
            }
            PowerEffect::ScanColumn { half_range } => {
                let Some(target) = ctx.resolved_target() else {
                    return false;
                };
                ctx.game.reveal_column(ctx.actor, target, ctx.cell, half_range);
                true
            }
            PowerEffect::RevealNeighbors { diagonals, vertical } => {
                let Some(target) = ctx.resolved_target() else {
                    return false;
                };
                ctx.game
                    .reveal_neighbors(ctx.actor, target, ctx.cell, diagonals, vertical);
                if let Some(source) = ctx.source {
                    ctx.game.activate_sensor_burst(ctx.actor, source);
                }
                true
            }
            PowerEffect::ScrambleProbe => {
                let Some(target) = ctx.resolved_target() else {
                    return false;
                };
                ctx.game.erase_probe(target, ctx.cell)
            }
            PowerEffect::EraseProbe => ctx.game.erase_probe(ctx.actor, ctx.cell),
        }
    }
}

/// Everything a power needs while it is being played.
#[derive(Debug)]
pub struct PowerContext<'a> {
    /// The game being acted on.
    pub game: &'a mut GameState,
    /// Player playing the power.
    pub actor: PlayerId,
    /// Opponent for offensive powers, the actor otherwise.
    pub target: Option<PlayerId>,
    /// Body the power was granted from.
    pub source: Option<BodyRef>,
    /// Cell picked by the caller (ignored by untargeted powers).
    pub cell: Coord,
}

impl PowerContext<'_> {
    /// Shared game RNG, seeded once per [`GameState`].
    ///
    /// No stock effect draws from it; it is reserved for catalog-defined
    /// random effects, which must draw only here to keep games replayable.
    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        self.game.rng_mut()
    }

    fn resolved_target(&self) -> Option<PlayerId> {
        self.target.filter(|&id| self.game.player(id).is_some())
    }
}

//! Caller-side turn pacing.
//!
//! The engine never advances on its own. These helpers let a driver count
//! probes against the per-turn allowance and hold the result on screen for
//! a moment before calling [`GameState::advance_after_probe`].

use std::time::{Duration, Instant};

use crate::game::{GameState, PlayerId, ProbeOutcome};

/// Counts the probes the current player has spent this turn.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnTracker {
    player: Option<PlayerId>,
    taken: u32,
}

impl TurnTracker {
    /// A tracker with nothing counted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a probe result for `player`.
    ///
    /// Switching players restarts the count. `OutOfBounds` is not counted.
    /// Returns whether the probe counted.
    pub fn record(&mut self, player: PlayerId, outcome: ProbeOutcome) -> bool {
        if self.player != Some(player) {
            self.player = Some(player);
            self.taken = 0;
        }
        if !outcome.counts_as_probe() {
            return false;
        }
        self.taken += 1;
        true
    }

    /// Probes counted for the tracked player.
    #[must_use]
    pub const fn taken(&self) -> u32 {
        self.taken
    }

    /// Probes the current player still has this turn.
    #[must_use]
    pub fn remaining(&self, game: &GameState) -> u32 {
        let Some(current) = game.current_player() else {
            return 0;
        };
        let taken = if self.player == Some(current) { self.taken } else { 0 };
        game.probes_per_turn(current).saturating_sub(taken)
    }

    /// Whether the driver should hand the turn on.
    #[must_use]
    pub fn should_advance(&self, game: &GameState) -> bool {
        !game.is_game_over()
            && !game.has_pending_probe()
            && game.current_player().is_some()
            && self.player == game.current_player()
            && self.remaining(game) == 0
    }

    /// Forget the count.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Minimum pause between a probe and the turn advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceDelay {
    delay: Duration,
}

impl Default for AdvanceDelay {
    fn default() -> Self {
        Self::new(Duration::from_millis(1500))
    }
}

impl AdvanceDelay {
    /// A gate holding for `delay`.
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Configured pause.
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Whether enough time has passed since `since`.
    #[must_use]
    pub fn ready(&self, since: Instant, now: Instant) -> bool {
        now.saturating_duration_since(since) >= self.delay
    }
}

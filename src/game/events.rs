//! Observable game events.
//!
//! The engine journals what happened so a driving caller can report it
//! without diffing state. Nothing in the engine reads the journal back.

use crate::game::{BodyKind, BodyRef, Coord, Phase, PlayerId, ProbeOutcome};

/// Something that happened during play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// A body was placed and paid for.
    BodyPlaced {
        /// The new body.
        body: BodyRef,
        /// Its type.
        kind: BodyKind,
        /// Price paid.
        price: u32,
    },
    /// A probe resolved against a board.
    ProbeResolved {
        /// Probing player.
        attacker: PlayerId,
        /// Probed player.
        defender: PlayerId,
        /// Probed cell.
        coord: Coord,
        /// Result.
        outcome: ProbeOutcome,
    },
    /// A probe is waiting for the defender's false-report decision.
    ProbeDeferred {
        /// Probing player.
        attacker: PlayerId,
        /// Probed player.
        defender: PlayerId,
        /// Probed cell.
        coord: Coord,
    },
    /// The defender masked a hit as a miss.
    FalseReport {
        /// Defending player.
        defender: PlayerId,
        /// Masked cell.
        coord: Coord,
    },
    /// Powers were granted from a body.
    PowersGranted {
        /// Receiving player.
        recipient: PlayerId,
        /// Body the powers came from.
        source: BodyRef,
        /// Number of powers granted.
        count: usize,
    },
    /// A granted power was played successfully.
    PowerPlayed {
        /// Player who played it.
        player: PlayerId,
        /// Power title.
        name: String,
    },
    /// The phase changed.
    PhaseChanged(Phase),
    /// A player's turn began.
    TurnStarted(PlayerId),
    /// Sensor burst tracking started.
    SensorOnline {
        /// Player receiving the sensor feed.
        owner: PlayerId,
        /// Station powering it.
        station: BodyRef,
    },
    /// A tracked hit was detected.
    SensorContact {
        /// Player receiving the sensor feed.
        owner: PlayerId,
        /// Body that was hit.
        target: BodyRef,
        /// Type of the body that was hit.
        kind: BodyKind,
    },
    /// The powering station was hit and the feed stopped.
    SensorOffline {
        /// Player who lost the feed.
        owner: PlayerId,
        /// Station that went dark.
        station: BodyRef,
    },
    /// The game ended.
    GameOver {
        /// Winning player.
        winner: Option<PlayerId>,
    },
}

/// An active sensor burst.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SensorBurst {
    pub(crate) owner: PlayerId,
    pub(crate) station: BodyRef,
    pub(crate) initial_hits: u32,
}

#![no_main]

//! Engine action fuzzer.
//!
//! Drives a game through arbitrary purchases, probes, false-report
//! decisions, power plays and turn changes, checking every invariant after
//! each call. Coordinates are allowed to stray off the board.

use std::sync::Arc;

use arbitrary::Arbitrary;
use deepfield::game::{check_invariants, BodyKind, Coord, GameState};
use deepfield::{BodyCatalog, GameConfig};
use libfuzzer_sys::fuzz_target;

const KINDS: [BodyKind; 13] = [
    BodyKind::Spacejunk,
    BodyKind::Satellite,
    BodyKind::Rocket3,
    BodyKind::Rocket4,
    BodyKind::Moon,
    BodyKind::SpaceStation,
    BodyKind::AlienArtifact,
    BodyKind::Planet,
    BodyKind::AsteroidBelt,
    BodyKind::Nebula,
    BodyKind::Star,
    BodyKind::Ringworld,
    BodyKind::DysonSphere,
];

/// A fuzzer-generated engine call.
#[derive(Arbitrary, Debug, Clone)]
enum FuzzAction {
    Purchase { player: u8, kind: u8, x: i8, y: i8, z: i8, rotation: u8 },
    CompletePlacement,
    Probe { defender: u8, x: i8, y: i8, z: i8 },
    Resolve { spend_token: bool },
    PlayPower { index: u8, x: i8, y: i8, z: i8 },
    Advance,
    Restart,
}

/// Structured input for engine fuzzing.
#[derive(Arbitrary, Debug)]
struct EngineInput {
    players: u8,
    depth: u8,
    width: u8,
    height: u8,
    near_miss_reporting: bool,
    seed: u64,
    actions: Vec<FuzzAction>,
}

fn coord(x: i8, y: i8, z: i8) -> Coord {
    Coord::new(i32::from(x), i32::from(y), i32::from(z))
}

fuzz_target!(|input: EngineInput| {
    let config = GameConfig {
        width: u16::from(input.width % 16).max(1),
        height: u16::from(input.height % 16).max(1),
        near_miss_reporting: input.near_miss_reporting,
        ..GameConfig::default()
    };
    let players = 2 + input.players % 3;
    let depth = 1 + u16::from(input.depth % 3);

    let mut game = GameState::new(config, Arc::new(BodyCatalog::standard()), input.seed);
    if game.new_game(players, depth).is_err() {
        return;
    }

    for action in input.actions.iter().take(200) {
        let Some(current) = game.current_player() else {
            return;
        };
        match *action {
            FuzzAction::Purchase { player, kind, x, y, z, rotation } => {
                let kind = KINDS[usize::from(kind) % KINDS.len()];
                let _ = game.purchase(player % players, kind, coord(x, y, z), rotation);
            }
            FuzzAction::CompletePlacement => game.complete_placement_for_current_player(),
            FuzzAction::Probe { defender, x, y, z } => {
                game.launch_probe(current, defender % players, coord(x, y, z));
            }
            FuzzAction::Resolve { spend_token } => {
                game.resolve_pending_probe(spend_token);
            }
            FuzzAction::PlayPower { index, x, y, z } => {
                game.play_power(current, usize::from(index % 8), coord(x, y, z));
            }
            FuzzAction::Advance => game.advance_after_probe(),
            FuzzAction::Restart => {
                if game.restart_current_config().is_err() {
                    return;
                }
            }
        }

        let violations = check_invariants(&game);
        assert!(violations.is_empty(), "Invariants violated after {:?}: {:?}", action, violations);
        assert_eq!(game.is_game_over(), game.winner().is_some());
    }
});

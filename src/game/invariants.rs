//! Game invariants - sanity checks that detect bugs.
//!
//! None of these should ever trigger through the public operations. They
//! exist for tests, fuzzing and debug builds.

use std::collections::HashSet;

use crate::game::{seat_label, BodyId, Board, GameState, Phase, PlayerId};

/// Invariant violation error.
#[derive(Debug, Clone)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub message: String,
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Invariant violation: {}", self.message)
    }
}

impl std::error::Error for InvariantViolation {}

fn violation(violations: &mut Vec<InvariantViolation>, message: String) {
    violations.push(InvariantViolation { message });
}

fn check_board(owner: PlayerId, board: &Board, violations: &mut Vec<InvariantViolation>) {
    let seat = seat_label(owner);

    // Cell -> body
    for cell in board.cells() {
        if let Some(id) = cell.occupant {
            match board.body(id) {
                Some(body) if body.cells.contains(&cell.coord) => {}
                Some(_) => violation(
                    violations,
                    format!("Board {seat}: cell {} names body {} which does not list it", cell.coord, id.index()),
                ),
                None => violation(
                    violations,
                    format!("Board {seat}: cell {} names missing body {}", cell.coord, id.index()),
                ),
            }
        } else if cell.struck {
            violation(violations, format!("Board {seat}: empty cell {} is struck", cell.coord));
        }
    }

    // Body -> cells
    for (index, body) in board.bodies().iter().enumerate() {
        let id = BodyId::new(index);
        if body.owner != owner {
            violation(
                violations,
                format!("Board {seat}: body {index} belongs to {}", seat_label(body.owner)),
            );
        }

        let distinct: HashSet<_> = body.cells.iter().collect();
        if distinct.len() != body.cells.len() {
            violation(violations, format!("Board {seat}: body {index} lists a cell twice"));
        }

        let mut struck = 0u32;
        for &coord in &body.cells {
            match board.get(coord) {
                Some(cell) if cell.occupant == Some(id) => {
                    if cell.struck {
                        struck += 1;
                    }
                }
                Some(_) => violation(
                    violations,
                    format!("Board {seat}: body {index} overlaps or lost cell {coord}"),
                ),
                None => violation(
                    violations,
                    format!("Board {seat}: body {index} lies outside the board at {coord}"),
                ),
            }
        }

        if usize::try_from(body.hit_count).unwrap_or(usize::MAX) > body.cells.len() {
            violation(
                violations,
                format!(
                    "Board {seat}: body {index} hit count {} exceeds {} cells",
                    body.hit_count,
                    body.cells.len()
                ),
            );
        } else if body.hit_count != struck {
            violation(
                violations,
                format!(
                    "Board {seat}: body {index} hit count {} but {struck} struck cells",
                    body.hit_count
                ),
            );
        }
    }
}

/// Check all game invariants.
///
/// Returns a list of violations found, or empty if all invariants hold.
#[must_use]
pub fn check_invariants(state: &GameState) -> Vec<InvariantViolation> {
    let mut violations = Vec::new();

    for (seat, player) in state.players().iter().enumerate() {
        if usize::from(player.id) != seat {
            violation(
                &mut violations,
                format!("Seat {seat} holds player id {}", player.id),
            );
        }
        check_board(player.id, &player.board, &mut violations);
    }

    if state.winner().is_some() && !state.is_game_over() {
        violation(&mut violations, "Winner set before the game is over".to_string());
    }

    if let Some(pending) = state.pending_probe() {
        if state.phase() != Phase::Probing {
            violation(
                &mut violations,
                format!("Pending probe during {} phase", state.phase()),
            );
        }
        let in_bounds = state
            .player(pending.defender)
            .is_some_and(|defender| defender.board.in_bounds(pending.coord));
        if !in_bounds {
            violation(
                &mut violations,
                format!(
                    "Pending probe at {} is off the board of {}",
                    pending.coord,
                    seat_label(pending.defender)
                ),
            );
        }
    }

    if !state.players().is_empty() && state.current_player().is_none() {
        violation(&mut violations, "Current player index out of range".to_string());
    }

    violations
}

/// Assert all game invariants hold, panicking if any are violated.
///
/// Only active in debug builds. No-op in release builds.
///
/// # Panics
///
/// Panics with detailed message if any invariant is violated.
#[cfg(debug_assertions)]
pub fn assert_invariants(state: &GameState) {
    let violations = check_invariants(state);
    if !violations.is_empty() {
        let messages: Vec<_> = violations.iter().map(|v| v.message.as_str()).collect();
        panic!("Game invariant violations:\n  - {}", messages.join("\n  - "));
    }
}

/// No-op in release builds.
#[cfg(not(debug_assertions))]
pub fn assert_invariants(_state: &GameState) {}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalog::BodyCatalog;
    use crate::config::GameConfig;
    use crate::game::{BodyKind, Coord};

    fn create_valid_game() -> GameState {
        let mut game = GameState::new(GameConfig::default(), Arc::new(BodyCatalog::standard()), 11);
        game.new_game(2, 2).unwrap();
        game.purchase(0, BodyKind::Moon, Coord::new(3, 3, 0), 0).unwrap();
        game.purchase(1, BodyKind::Rocket4, Coord::new(0, 0, 1), 0).unwrap();
        game
    }

    #[test]
    fn test_valid_game_passes() {
        let mut game = create_valid_game();
        assert!(check_invariants(&game).is_empty());

        game.complete_placement_for_current_player();
        game.complete_placement_for_current_player();
        game.launch_probe(0, 1, Coord::new(1, 0, 1));
        game.launch_probe(0, 1, Coord::new(1, 0, 1));
        game.launch_probe(0, 1, Coord::new(5, 5, 0));
        assert!(check_invariants(&game).is_empty());
    }

    #[test]
    fn test_inflated_hit_count_detected() {
        let mut game = create_valid_game();
        let body = game.player_mut(1).unwrap().board.body_mut(BodyId::new(0)).unwrap();
        body.hit_count = 9;

        let violations = check_invariants(&game);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("exceeds"));
    }

    #[test]
    fn test_hit_count_mismatch_detected() {
        let mut game = create_valid_game();
        let body = game.player_mut(1).unwrap().board.body_mut(BodyId::new(0)).unwrap();
        body.hit_count = 2;

        let violations = check_invariants(&game);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("struck cells"));
    }

    #[test]
    fn test_orphaned_body_cell_detected() {
        let mut game = create_valid_game();
        let body = game.player_mut(0).unwrap().board.body_mut(BodyId::new(0)).unwrap();
        body.cells.push(Coord::new(9, 9, 1));

        let violations = check_invariants(&game);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("lost cell"));
    }

    #[test]
    fn test_dropped_cell_detected() {
        let mut game = create_valid_game();
        let body = game.player_mut(0).unwrap().board.body_mut(BodyId::new(0)).unwrap();
        body.cells.pop();

        let violations = check_invariants(&game);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("does not list it"));
    }

    #[test]
    fn test_wrong_owner_detected() {
        let mut game = create_valid_game();
        let body = game.player_mut(0).unwrap().board.body_mut(BodyId::new(0)).unwrap();
        body.owner = 1;

        let violations = check_invariants(&game);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("belongs to B"));
    }

    #[test]
    #[should_panic(expected = "Game invariant violations")]
    #[cfg(debug_assertions)]
    fn test_assert_invariants_panics() {
        let mut game = create_valid_game();
        let body = game.player_mut(0).unwrap().board.body_mut(BodyId::new(0)).unwrap();
        body.hit_count = 50;
        assert_invariants(&game);
    }
}

//! Scripted games.
//!
//! A scenario is a JSON document naming the table and a list of actions.
//! Actions are taken on behalf of whoever holds the turn, except purchases,
//! which name their buyer. Refused actions are reported, not fatal.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::BodyCatalog;
use crate::config::GameConfig;
use crate::error::ScenarioError;
use crate::game::{
    seat_label, BodyKind, Coord, GameState, Phase, PlayerId, PlayerState, ProbeOutcome,
};

const fn default_depth() -> u16 {
    1
}

/// A scripted game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    /// Seated players.
    pub players: u8,
    /// Board layers.
    #[serde(default = "default_depth")]
    pub depth: u16,
    /// RNG seed.
    #[serde(default)]
    pub seed: u64,
    /// Actions, in order.
    pub actions: Vec<Action>,
}

/// One scripted step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Buy and place a body for `player`.
    Purchase {
        /// Buyer.
        player: PlayerId,
        /// Body type.
        kind: BodyKind,
        /// Placement origin.
        at: Coord,
        /// Quarter turns.
        #[serde(default)]
        rotation: u8,
    },
    /// The current player is done placing.
    CompletePlacement,
    /// The current player probes `defender` (default: their opponent).
    Probe {
        /// Probed player.
        #[serde(default)]
        defender: Option<PlayerId>,
        /// Probed cell.
        at: Coord,
    },
    /// Settle the pending probe.
    Resolve {
        /// Spend a false-report token if possible.
        #[serde(default)]
        spend_token: bool,
    },
    /// The current player plays a granted power.
    PlayPower {
        /// Index into the player's powers.
        index: usize,
        /// Target cell, for powers that need one.
        #[serde(default)]
        at: Option<Coord>,
    },
    /// Hand the turn on after probing.
    EndTurn,
}

impl Action {
    fn label(&self) -> &'static str {
        match self {
            Self::Purchase { .. } => "purchase",
            Self::CompletePlacement => "complete_placement",
            Self::Probe { .. } => "probe",
            Self::Resolve { .. } => "resolve",
            Self::PlayPower { .. } => "play_power",
            Self::EndTurn => "end_turn",
        }
    }
}

/// What one step did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepReport {
    /// Zero-based action index.
    pub step: usize,
    /// Acting player, if any held the turn.
    pub player: Option<PlayerId>,
    /// Action name.
    pub action: &'static str,
    /// Human-readable outcome.
    pub outcome: String,
}

/// End-of-scenario snapshot of one player.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlayerSummary {
    /// Seat index.
    pub id: PlayerId,
    /// Seat letter.
    pub seat: char,
    /// Remaining currency.
    pub currency: u32,
    /// Unspent false-report tokens.
    pub false_report_tokens: u32,
    /// Bodies placed.
    pub bodies: usize,
    /// Bodies fully colonized.
    pub colonized: usize,
    /// Titles of held powers.
    pub powers: Vec<String>,
    /// Whether the player is out.
    pub eliminated: bool,
}

/// Result of running a scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScenarioReport {
    /// Seed the game ran with.
    pub seed: u64,
    /// Per-step outcomes.
    pub steps: Vec<StepReport>,
    /// Final phase.
    pub phase: Phase,
    /// Winner, if the game ended.
    pub winner: Option<PlayerId>,
    /// Final player snapshots.
    pub players: Vec<PlayerSummary>,
}

impl Scenario {
    /// Parse a scenario from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not describe a scenario.
    pub fn from_json_str(text: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a scenario file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Set up a fresh game and play every action.
    ///
    /// # Errors
    ///
    /// Returns an error if the table is invalid or an action names a player
    /// who is not seated.
    pub fn run(&self, config: GameConfig, catalog: Arc<BodyCatalog>) -> Result<ScenarioReport, ScenarioError> {
        let mut game = GameState::new(config, catalog, self.seed);
        game.new_game(self.players, self.depth)?;
        let steps = self.apply(&mut game)?;

        Ok(ScenarioReport {
            seed: self.seed,
            steps,
            phase: game.phase(),
            winner: game.winner(),
            players: game.players().iter().map(summarize).collect(),
        })
    }

    /// Play every action against an existing game.
    ///
    /// # Errors
    ///
    /// Returns an error if an action names a player who is not seated.
    pub fn apply(&self, game: &mut GameState) -> Result<Vec<StepReport>, ScenarioError> {
        self.actions
            .iter()
            .enumerate()
            .map(|(step, action)| apply_action(game, step, action))
            .collect()
    }
}

fn summarize(player: &PlayerState) -> PlayerSummary {
    PlayerSummary {
        id: player.id,
        seat: seat_label(player.id),
        currency: player.currency,
        false_report_tokens: player.false_report_tokens,
        bodies: player.bodies().len(),
        colonized: player
            .bodies()
            .iter()
            .filter(|body| body.is_fully_colonized())
            .count(),
        powers: player
            .powers
            .iter()
            .map(|granted| granted.power.name.clone())
            .collect(),
        eliminated: player.is_eliminated(),
    }
}

fn require_seated(game: &GameState, step: usize, player: PlayerId) -> Result<(), ScenarioError> {
    if game.player(player).is_none() {
        return Err(ScenarioError::UnknownPlayer { step, player });
    }
    Ok(())
}

fn describe_probe(outcome: ProbeOutcome, defender: PlayerId, at: Coord) -> String {
    format!("{} at {at} on {}", outcome, seat_label(defender))
}

fn apply_action(game: &mut GameState, step: usize, action: &Action) -> Result<StepReport, ScenarioError> {
    let current = game.current_player();
    let mut player = current;

    let outcome = match *action {
        Action::Purchase {
            player: buyer,
            kind,
            at,
            rotation,
        } => {
            require_seated(game, step, buyer)?;
            player = Some(buyer);
            match game.purchase(buyer, kind, at, rotation) {
                Ok(_) => format!("placed {kind} at {at}"),
                Err(e) => format!("refused: {e}"),
            }
        }
        Action::CompletePlacement => {
            game.complete_placement_for_current_player();
            format!("{} phase", game.phase())
        }
        Action::Probe { defender, at } => match current {
            Some(attacker) => {
                let defender = match defender {
                    Some(defender) => {
                        require_seated(game, step, defender)?;
                        Some(defender)
                    }
                    None => game.opponent_of(attacker),
                };
                match defender {
                    Some(defender) => {
                        let outcome = game.launch_probe(attacker, defender, at);
                        describe_probe(outcome, defender, at)
                    }
                    None => "no opponent".to_string(),
                }
            }
            None => "no player holds the turn".to_string(),
        },
        Action::Resolve { spend_token } => match game.pending_probe() {
            Some(pending) => {
                let outcome = game.resolve_pending_probe(spend_token);
                describe_probe(outcome, pending.defender, pending.coord)
            }
            None => "nothing pending".to_string(),
        },
        Action::PlayPower { index, at } => match current {
            Some(actor) => {
                let name = game
                    .player(actor)
                    .and_then(|p| p.powers.get(index))
                    .map(|granted| granted.power.name.clone());
                match name {
                    Some(name) if game.play_power(actor, index, at.unwrap_or(Coord::new(0, 0, 0))) => {
                        format!("played {name}")
                    }
                    Some(name) => format!("{name} failed"),
                    None => format!("no power at {index}"),
                }
            }
            None => "no player holds the turn".to_string(),
        },
        Action::EndTurn => {
            game.advance_after_probe();
            match game.current_player() {
                Some(next) => format!("turn {}", seat_label(next)),
                None => "no player holds the turn".to_string(),
            }
        }
    };

    debug!(step, action = action.label(), %outcome, "scenario step");
    Ok(StepReport {
        step,
        player,
        action: action.label(),
        outcome,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(json: &str) -> ScenarioReport {
        Scenario::from_json_str(json)
            .unwrap()
            .run(GameConfig::default(), Arc::new(BodyCatalog::standard()))
            .unwrap()
    }

    #[test]
    fn test_parse_defaults() {
        let scenario = Scenario::from_json_str(
            r#"{"players":2,"actions":[{"action":"probe","at":{"x":1,"y":2,"z":0}},{"action":"resolve"}]}"#,
        )
        .unwrap();
        assert_eq!(scenario.depth, 1);
        assert_eq!(scenario.seed, 0);
        assert_eq!(
            scenario.actions,
            vec![
                Action::Probe {
                    defender: None,
                    at: Coord::new(1, 2, 0),
                },
                Action::Resolve { spend_token: false },
            ]
        );
    }

    #[test]
    fn test_short_game_to_victory() {
        let report = run(
            r#"{
                "players": 2,
                "seed": 5,
                "actions": [
                    {"action":"purchase","player":0,"kind":"Satellite","at":{"x":0,"y":0,"z":0}},
                    {"action":"purchase","player":1,"kind":"Spacejunk","at":{"x":4,"y":4,"z":0}},
                    {"action":"complete_placement"},
                    {"action":"complete_placement"},
                    {"action":"probe","at":{"x":4,"y":5,"z":0}},
                    {"action":"end_turn"},
                    {"action":"probe","at":{"x":0,"y":0,"z":0}},
                    {"action":"end_turn"},
                    {"action":"probe","at":{"x":4,"y":4,"z":0}}
                ]
            }"#,
        );
        assert_eq!(report.steps[3].outcome, "probing phase");
        assert_eq!(report.steps[4].outcome, "near miss at (4, 5, 0) on B");
        assert_eq!(report.steps[5].outcome, "turn B");
        assert_eq!(report.steps[6].player, Some(1));
        assert_eq!(report.steps[8].outcome, "hit body #0 at (4, 4, 0) on B");
        assert_eq!(report.winner, Some(0));
        assert!(report.players[1].eliminated);
        assert_eq!(report.players[0].currency, 18);
    }

    #[test]
    fn test_refusals_are_reported() {
        let report = run(
            r#"{"players":2,"actions":[
                {"action":"purchase","player":0,"kind":"DysonSphere","at":{"x":7,"y":7,"z":0}},
                {"action":"resolve"},
                {"action":"play_power","index":0}
            ]}"#,
        );
        assert!(report.steps[0].outcome.starts_with("refused: "));
        assert_eq!(report.steps[1].outcome, "nothing pending");
        assert_eq!(report.steps[2].outcome, "no power at 0");
        assert_eq!(report.phase, Phase::Placement);
    }

    #[test]
    fn test_unknown_player_is_an_error() {
        let scenario = Scenario::from_json_str(
            r#"{"players":2,"actions":[{"action":"purchase","player":3,"kind":"Moon","at":{"x":2,"y":2,"z":0}}]}"#,
        )
        .unwrap();
        let result = scenario.run(GameConfig::default(), Arc::new(BodyCatalog::standard()));
        assert!(matches!(
            result,
            Err(ScenarioError::UnknownPlayer { step: 0, player: 3 })
        ));
    }

    #[test]
    fn test_bad_table_is_an_error() {
        let scenario = Scenario::from_json_str(r#"{"players":5,"actions":[]}"#).unwrap();
        let result = scenario.run(GameConfig::default(), Arc::new(BodyCatalog::standard()));
        assert!(matches!(result, Err(ScenarioError::Config(_))));
    }
}

//! Game state management.
//!
//! Owns the seated players, the placement/probing phase machine, probe
//! resolution (including false-report arbitration), power grants and the
//! victory check. Every public operation either completes or rejects before
//! returning; nothing blocks waiting for a caller.

use std::fmt;
use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::catalog::BodyCatalog;
use crate::config::GameConfig;
use crate::error::ConfigError;
use crate::game::events::SensorBurst;
use crate::game::{
    seat_label, Board, BodyId, BodyKind, BodyRef, Coord, GameEvent, GrantedPower, PlayerId,
    PlayerState, Power, PowerContext, PowerTiming, ProbeOutcome,
};

/// Phase of play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    /// Players place bodies on their own boards.
    Placement,
    /// Players take turns probing opponents.
    Probing,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Placement => write!(f, "placement"),
            Self::Probing => write!(f, "probing"),
        }
    }
}

/// A probe waiting for the defender's false-report decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingProbe {
    /// Probing player.
    pub attacker: PlayerId,
    /// Probed player.
    pub defender: PlayerId,
    /// Probed cell.
    pub coord: Coord,
}

/// Complete game state.
#[derive(Debug, Clone)]
pub struct GameState {
    config: GameConfig,
    catalog: Arc<BodyCatalog>,
    depth: u16,
    players: Vec<PlayerState>,
    current: usize,
    phase: Phase,
    rng: ChaCha8Rng,
    game_over: bool,
    winner: Option<PlayerId>,
    pending: Option<PendingProbe>,
    sensors: Vec<SensorBurst>,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Create an engine with no players seated yet.
    ///
    /// Call [`GameState::new_game`] to seat players.
    #[must_use]
    pub fn new(config: GameConfig, catalog: Arc<BodyCatalog>, seed: u64) -> Self {
        let depth = config.layers;
        Self {
            config,
            catalog,
            depth,
            players: Vec::new(),
            current: 0,
            phase: Phase::Placement,
            rng: ChaCha8Rng::seed_from_u64(seed),
            game_over: false,
            winner: None,
            pending: None,
            sensors: Vec::new(),
            events: Vec::new(),
        }
    }

    /// Seat `players` players on fresh boards `depth` layers deep.
    ///
    /// # Errors
    ///
    /// Returns an error if the player count, depth or configured board size
    /// is out of range. The previous game is left untouched in that case.
    pub fn new_game(&mut self, players: u8, depth: u16) -> Result<(), ConfigError> {
        GameConfig::validate_table(players, depth)?;
        self.config.validate()?;

        let currency = self.config.starting_currency(players, depth);
        let mut seated = Vec::with_capacity(usize::from(players));
        for id in 0..players {
            let mut board = Board::new(self.config.width, self.config.height, depth).ok_or(
                ConfigError::Dimensions {
                    width: self.config.width,
                    height: self.config.height,
                },
            )?;
            board.set_near_miss_reporting(self.config.near_miss_reporting);
            seated.push(PlayerState::new(id, board, currency));
        }

        self.players = seated;
        self.depth = depth;
        self.current = 0;
        self.phase = Phase::Placement;
        self.game_over = false;
        self.winner = None;
        self.pending = None;
        self.sensors.clear();
        self.events.clear();

        info!(players, depth, currency, "new game");
        self.events.push(GameEvent::TurnStarted(0));
        Ok(())
    }

    /// Start over with the same player count and depth.
    ///
    /// # Errors
    ///
    /// Returns an error if no game was ever started.
    pub fn restart_current_config(&mut self) -> Result<(), ConfigError> {
        let players = u8::try_from(self.players.len()).unwrap_or(u8::MAX);
        self.new_game(players, self.depth)
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Injected body catalog.
    #[must_use]
    pub fn catalog(&self) -> &Arc<BodyCatalog> {
        &self.catalog
    }

    /// Layers per board in the current game.
    #[must_use]
    pub const fn depth(&self) -> u16 {
        self.depth
    }

    /// Seated players, in turn order.
    #[must_use]
    pub fn players(&self) -> &[PlayerState] {
        &self.players
    }

    /// Get a player by ID.
    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&PlayerState> {
        self.players.get(usize::from(id))
    }

    /// Get a mutable reference to a player by ID.
    #[must_use]
    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut PlayerState> {
        self.players.get_mut(usize::from(id))
    }

    /// Player whose turn it is.
    #[must_use]
    pub fn current_player(&self) -> Option<PlayerId> {
        self.players.get(self.current).map(|player| player.id)
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the game has ended.
    #[must_use]
    pub const fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Winner, once the game is over.
    #[must_use]
    pub const fn winner(&self) -> Option<PlayerId> {
        self.winner
    }

    /// The probe awaiting a false-report decision, if any.
    #[must_use]
    pub const fn pending_probe(&self) -> Option<PendingProbe> {
        self.pending
    }

    /// Whether a probe awaits a false-report decision.
    #[must_use]
    pub const fn has_pending_probe(&self) -> bool {
        self.pending.is_some()
    }

    /// Shared RNG.
    pub fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    /// Journal of events not yet drained.
    #[must_use]
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take the journal, leaving it empty.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn record(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// First other player still standing, else any other player, else `player` itself.
    #[must_use]
    pub fn opponent_of(&self, player: PlayerId) -> Option<PlayerId> {
        self.player(player)?;
        let opponent = self
            .players
            .iter()
            .find(|candidate| candidate.id != player && !candidate.is_eliminated())
            .or_else(|| self.players.iter().find(|candidate| candidate.id != player));
        Some(opponent.map_or(player, |candidate| candidate.id))
    }

    /// Grant a freshly placed body's placement powers to its owner, once.
    pub fn handle_placement(&mut self, owner: PlayerId, body: BodyId) {
        let Some(instance) = self
            .player_mut(owner)
            .and_then(|player| player.board.body_mut(body))
        else {
            return;
        };
        if instance.placement_powers_granted {
            return;
        }
        instance.placement_powers_granted = true;

        let definition = Arc::clone(&instance.definition);
        self.grant_powers(owner, &definition.placement_powers, BodyRef { owner, body });
    }

    fn grant_powers(&mut self, recipient: PlayerId, prototypes: &[Power], source: BodyRef) {
        if prototypes.is_empty() {
            return;
        }
        let Some(player) = self.player_mut(recipient) else {
            return;
        };
        player.powers.extend(
            prototypes
                .iter()
                .map(|prototype| GrantedPower::new(prototype.clone(), Some(source))),
        );
        debug!(
            recipient = %seat_label(recipient),
            count = prototypes.len(),
            "powers granted"
        );
        self.events.push(GameEvent::PowersGranted {
            recipient,
            source,
            count: prototypes.len(),
        });
    }

    /// Reset passive powers of a player to unconsumed.
    pub fn reset_passive_powers(&mut self, player: PlayerId) {
        if let Some(player) = self.player_mut(player) {
            player.reset_passive_powers();
        }
    }

    fn begin_turn(&mut self, index: usize) {
        self.current = index;
        if let Some(player) = self.players.get_mut(index) {
            player.reset_passive_powers();
            let id = player.id;
            self.events.push(GameEvent::TurnStarted(id));
        }
    }

    /// Mark the current player ready; start probing once everyone is.
    pub fn complete_placement_for_current_player(&mut self) {
        if self.phase != Phase::Placement || self.game_over {
            return;
        }
        let Some(current) = self.players.get_mut(self.current) else {
            return;
        };
        current.placement_ready = true;

        if self.players.iter().all(|player| player.placement_ready) {
            self.phase = Phase::Probing;
            info!("all players ready, probing begins");
            self.events.push(GameEvent::PhaseChanged(Phase::Probing));
            self.begin_turn(0);
        } else {
            self.advance_to_next_placement_player();
        }
    }

    /// Move to the next player who is not yet ready, without readying anyone.
    pub fn advance_to_next_placement_player(&mut self) {
        if self.phase != Phase::Placement || self.game_over {
            return;
        }
        let count = self.players.len();
        for step in 1..=count {
            let idx = (self.current + step) % count;
            if !self.players[idx].placement_ready {
                self.begin_turn(idx);
                return;
            }
        }
    }

    /// Hand the turn to the next player still standing.
    ///
    /// Ignored outside probing, after the game ends or while a probe is pending.
    pub fn advance_after_probe(&mut self) {
        if self.phase != Phase::Probing
            || self.players.is_empty()
            || self.game_over
            || self.pending.is_some()
        {
            return;
        }
        let count = self.players.len();
        for step in 1..=count {
            let idx = (self.current + step) % count;
            if !self.players[idx].is_eliminated() {
                self.begin_turn(idx);
                return;
            }
        }
    }

    /// Whether the player fields an intact or fully colonized double-probe structure.
    #[must_use]
    pub fn has_double_probe(&self, player: PlayerId) -> bool {
        let kind = self.config.double_probe_kind;
        self.player(player).is_some_and(|player| {
            player.bodies().iter().any(|body| {
                body.kind() == kind
                    && !body.cells.is_empty()
                    && (body.is_intact() || body.is_fully_colonized())
            })
        })
    }

    /// Probes the player may take this turn.
    #[must_use]
    pub fn probes_per_turn(&self, player: PlayerId) -> u32 {
        let base = self.config.probes_per_turn;
        if self.has_double_probe(player) {
            base.saturating_mul(2)
        } else {
            base
        }
    }

    /// Probe a defender's cell.
    ///
    /// Returns `Pending` if another probe is pending or the game is over,
    /// and also when the probe is deferred because the defender holds a
    /// false-report token and the cell hides an unstruck occupant. Probes
    /// are only deferred during the probing phase.
    pub fn launch_probe(&mut self, attacker: PlayerId, defender: PlayerId, coord: Coord) -> ProbeOutcome {
        if self.pending.is_some() || self.game_over {
            return ProbeOutcome::Pending;
        }
        if self.player(attacker).is_none() {
            return ProbeOutcome::OutOfBounds;
        }
        let Some(target) = self.player(defender) else {
            return ProbeOutcome::OutOfBounds;
        };
        let Some(cell) = target.board.get(coord) else {
            return ProbeOutcome::OutOfBounds;
        };

        let deferrable = self.phase == Phase::Probing && !cell.struck && cell.occupant.is_some();
        if deferrable && target.false_report_tokens > 0 {
            self.pending = Some(PendingProbe {
                attacker,
                defender,
                coord,
            });
            debug!(
                attacker = %seat_label(attacker),
                defender = %seat_label(defender),
                %coord,
                "probe deferred for false report"
            );
            self.events.push(GameEvent::ProbeDeferred {
                attacker,
                defender,
                coord,
            });
            return ProbeOutcome::Pending;
        }

        self.resolve_probe(attacker, defender, coord)
    }

    /// Settle the pending probe.
    ///
    /// With `spend_token`, a defender still holding a token masks the hit as
    /// a miss and the occupant stays hidden. Otherwise the probe resolves
    /// normally. Returns `OutOfBounds` if nothing is pending.
    pub fn resolve_pending_probe(&mut self, spend_token: bool) -> ProbeOutcome {
        let Some(PendingProbe {
            attacker,
            defender,
            coord,
        }) = self.pending.take()
        else {
            return ProbeOutcome::OutOfBounds;
        };

        if spend_token {
            if let Some(player) = self.players.get_mut(usize::from(defender)) {
                let occupied = player
                    .board
                    .get(coord)
                    .is_some_and(|cell| cell.occupant.is_some());
                if player.false_report_tokens > 0 && occupied {
                    player.false_report_tokens -= 1;
                    player.take_false_report_power();
                    player.board.mask_as_miss(coord);

                    debug!(defender = %seat_label(defender), %coord, "false report");
                    self.events.push(GameEvent::FalseReport { defender, coord });
                    self.events.push(GameEvent::ProbeResolved {
                        attacker,
                        defender,
                        coord,
                        outcome: ProbeOutcome::FalseReport,
                    });
                    return ProbeOutcome::FalseReport;
                }
            }
        }

        self.resolve_probe(attacker, defender, coord)
    }

    fn resolve_probe(&mut self, attacker: PlayerId, defender: PlayerId, coord: Coord) -> ProbeOutcome {
        let Some(target) = self.players.get_mut(usize::from(defender)) else {
            return ProbeOutcome::OutOfBounds;
        };
        let outcome = target.board.probe(coord);

        debug!(
            attacker = %seat_label(attacker),
            defender = %seat_label(defender),
            %coord,
            %outcome,
            "probe resolved"
        );
        self.events.push(GameEvent::ProbeResolved {
            attacker,
            defender,
            coord,
            outcome,
        });

        if let ProbeOutcome::Hit(body) = outcome {
            self.handle_hit(attacker, BodyRef { owner: defender, body });
        }
        if !self.game_over && self.player(defender).is_some_and(PlayerState::is_eliminated) {
            self.evaluate_victory(attacker);
        }
        outcome
    }

    /// Grant colonization powers to the attacker the first time a body is fully colonized.
    fn handle_hit(&mut self, attacker: PlayerId, target: BodyRef) {
        self.process_sensor_bursts(attacker, target);

        let Some(body) = self
            .players
            .get_mut(usize::from(target.owner))
            .and_then(|player| player.board.body_mut(target.body))
        else {
            return;
        };
        if body.colonization_powers_granted
            || !body.is_fully_colonized()
            || body.definition.colonization_powers.is_empty()
        {
            return;
        }
        body.colonization_powers_granted = true;

        let definition = Arc::clone(&body.definition);
        info!(
            attacker = %seat_label(attacker),
            kind = %definition.kind,
            "body colonized"
        );
        self.grant_powers(attacker, &definition.colonization_powers, target);
    }

    /// Start a sensor burst fed by a space station.
    ///
    /// Ignored unless `station` is a space station.
    pub fn activate_sensor_burst(&mut self, owner: PlayerId, station: BodyRef) {
        let Some(initial_hits) = self
            .player(station.owner)
            .and_then(|player| player.board.body(station.body))
            .filter(|body| body.kind() == BodyKind::SpaceStation)
            .map(|body| body.hit_count)
        else {
            return;
        };

        self.sensors
            .retain(|burst| !(burst.owner == owner && burst.station == station));
        self.sensors.push(SensorBurst {
            owner,
            station,
            initial_hits,
        });
        info!(owner = %seat_label(owner), "sensor burst online");
        self.events.push(GameEvent::SensorOnline { owner, station });
    }

    fn process_sensor_bursts(&mut self, attacker: PlayerId, hit: BodyRef) {
        if self.sensors.is_empty() {
            return;
        }

        let players = &self.players;
        let mut offline = Vec::new();
        self.sensors.retain(|burst| {
            let hits = players
                .get(usize::from(burst.station.owner))
                .and_then(|player| player.board.body(burst.station.body))
                .map(|body| body.hit_count);
            let keep = match hits {
                Some(hits) => hits <= burst.initial_hits,
                None => false,
            };
            if !keep {
                offline.push(*burst);
            }
            keep
        });
        for burst in offline {
            info!(owner = %seat_label(burst.owner), "sensor burst offline");
            self.events.push(GameEvent::SensorOffline {
                owner: burst.owner,
                station: burst.station,
            });
        }

        let Some(kind) = self
            .player(hit.owner)
            .and_then(|player| player.board.body(hit.body))
            .map(|body| body.kind())
        else {
            return;
        };
        let listeners: Vec<PlayerId> = self
            .sensors
            .iter()
            .filter(|burst| burst.owner == attacker)
            .map(|burst| burst.owner)
            .collect();
        for owner in listeners {
            info!(owner = %seat_label(owner), %kind, "sensor contact");
            self.events.push(GameEvent::SensorContact {
                owner,
                target: hit,
                kind,
            });
        }
    }

    /// End the game if at most one player is still standing.
    ///
    /// With no survivors the last attacker wins.
    pub fn evaluate_victory(&mut self, last_attacker: PlayerId) -> bool {
        let survivors: Vec<PlayerId> = self
            .players
            .iter()
            .filter(|player| !player.is_eliminated())
            .map(|player| player.id)
            .collect();
        if survivors.len() > 1 {
            return false;
        }

        self.game_over = true;
        self.winner = match survivors.as_slice() {
            [sole] => Some(*sole),
            _ => Some(last_attacker),
        };
        info!(winner = ?self.winner.map(seat_label), "game over");
        self.events.push(GameEvent::GameOver {
            winner: self.winner,
        });
        true
    }

    /// Probe every unprobed cell of a row on the target board.
    ///
    /// Row and layer are clamped onto the board.
    pub fn reveal_row(&mut self, viewer: PlayerId, target: PlayerId, row: i32, layer: i32) {
        let Some(board) = self.player(target).map(|player| &player.board) else {
            return;
        };
        let y = row.clamp(0, i32::from(board.height()) - 1);
        let z = layer.clamp(0, i32::from(board.layers()) - 1);
        let cells: Vec<Coord> = (0..i32::from(board.width()))
            .map(|x| Coord::new(x, y, z))
            .collect();
        self.reveal_cells(viewer, target, &cells, true);
    }

    /// Probe every unprobed cell of the column through `at`.
    ///
    /// With `half_range` only a span of `max(3, height / 2)` centered on
    /// `at` is revealed. Coordinates are clamped onto the board.
    pub fn reveal_column(&mut self, viewer: PlayerId, target: PlayerId, at: Coord, half_range: bool) {
        let Some(board) = self.player(target).map(|player| &player.board) else {
            return;
        };
        let height = i32::from(board.height());
        let x = at.x.clamp(0, i32::from(board.width()) - 1);
        let y = at.y.clamp(0, height - 1);
        let z = at.z.clamp(0, i32::from(board.layers()) - 1);

        let (start, end) = if half_range {
            let span = (height / 2).max(3);
            ((y - span / 2).max(0), (y + span / 2).min(height - 1))
        } else {
            (0, height - 1)
        };
        let cells: Vec<Coord> = (start..=end).map(|y| Coord::new(x, y, z)).collect();
        self.reveal_cells(viewer, target, &cells, true);
    }

    /// Probe a cell and its neighborhood without granting colonization powers.
    ///
    /// The neighborhood is the four planar orthogonals, plus the planar
    /// diagonals with `diagonals`, plus the same pattern one layer up and
    /// down with `vertical`.
    pub fn reveal_neighbors(
        &mut self,
        viewer: PlayerId,
        target: PlayerId,
        center: Coord,
        diagonals: bool,
        vertical: bool,
    ) {
        let reach = i32::from(vertical);
        let mut cells = vec![center];
        for dz in -reach..=reach {
            for dy in -1..=1_i32 {
                for dx in -1..=1_i32 {
                    if dx == 0 && dy == 0 && dz == 0 {
                        continue;
                    }
                    if !diagonals && dx.abs() + dy.abs() > 1 {
                        continue;
                    }
                    cells.extend(center.offset(Coord::new(dx, dy, dz)));
                }
            }
        }
        self.reveal_cells(viewer, target, &cells, false);
    }

    fn reveal_cells(&mut self, viewer: PlayerId, target: PlayerId, cells: &[Coord], colonize: bool) {
        let opponent = viewer != target;

        for &coord in cells {
            let Some(player) = self.players.get_mut(usize::from(target)) else {
                return;
            };
            let fresh = player.board.get(coord).is_some_and(|cell| !cell.probed);
            if !fresh {
                continue;
            }
            let outcome = player.board.probe(coord);
            self.events.push(GameEvent::ProbeResolved {
                attacker: viewer,
                defender: target,
                coord,
                outcome,
            });
            if let ProbeOutcome::Hit(body) = outcome {
                if opponent && colonize {
                    self.handle_hit(viewer, BodyRef { owner: target, body });
                }
            }
        }

        if !self.game_over && opponent && self.player(target).is_some_and(PlayerState::is_eliminated) {
            self.evaluate_victory(viewer);
        }
    }

    /// Forget a probe on a player's own board. Returns `false` if the cell was never probed.
    pub fn erase_probe(&mut self, board_owner: PlayerId, coord: Coord) -> bool {
        self.player_mut(board_owner)
            .is_some_and(|player| player.board.unprobe(coord))
    }

    /// Play the player's granted power at `index`.
    ///
    /// Offensive powers target the opponent; the rest target the player.
    /// A successful one-shot power is removed, a passive one is marked
    /// consumed. Returns `false` with no state change if the power is
    /// missing, unavailable, or its effect could not apply.
    pub fn play_power(&mut self, player: PlayerId, index: usize, cell: Coord) -> bool {
        if self.game_over || self.pending.is_some() {
            return false;
        }
        let Some(granted) = self
            .player(player)
            .and_then(|owner| owner.powers.get(index))
            .filter(|granted| granted.is_available())
        else {
            return false;
        };
        let power = granted.power.clone();
        let source = granted.source;

        let target = match power.timing {
            PowerTiming::OffensiveFaceUp => self.opponent_of(player),
            PowerTiming::DefensiveFaceDown | PowerTiming::PassiveUpkeep => Some(player),
        };
        let mut ctx = PowerContext {
            game: self,
            actor: player,
            target,
            source,
            cell,
        };
        if !power.try_play(&mut ctx) {
            warn!(player = %seat_label(player), power = %power.name, "power failed");
            return false;
        }

        if let Some(owner) = self.player_mut(player) {
            if power.is_passive() {
                if let Some(granted) = owner.powers.get_mut(index) {
                    granted.consumed = true;
                }
            } else if index < owner.powers.len() {
                owner.powers.remove(index);
            }
        }
        info!(player = %seat_label(player), power = %power.name, "power played");
        self.events.push(GameEvent::PowerPlayed {
            player,
            name: power.name,
        });
        true
    }
}

//! Purchasing bodies.
//!
//! Currency comes from the starting allowance and from powers. Spending it
//! places a body on the buyer's own board; the Dyson Sphere additionally
//! has to wrap around a Star the buyer already owns.

use std::sync::Arc;

use tracing::info;

use crate::error::PurchaseError;
use crate::game::{seat_label, BodyKind, BodyRef, Coord, GameEvent, GameState, PlayerId, PlayerState};

/// Largest x/y distance from a Dyson Sphere origin to any cell of the Star it encircles.
pub const DYSON_STAR_RADIUS: u32 = 2;

/// Why a body type is locked for a player at `origin`, if it is.
#[must_use]
pub fn lock_reason(player: &PlayerState, kind: BodyKind, origin: Coord) -> Option<&'static str> {
    if kind != BodyKind::DysonSphere {
        return None;
    }
    if !player.owns_kind(BodyKind::Star) {
        return Some("requires a Star");
    }
    if !encircles_star(player, origin) {
        return Some("must encircle one of your Stars");
    }
    None
}

/// Whether one of the player's Stars sits entirely inside the ring around `origin`.
#[must_use]
pub fn encircles_star(player: &PlayerState, origin: Coord) -> bool {
    player
        .bodies()
        .iter()
        .filter(|body| body.kind() == BodyKind::Star && !body.cells.is_empty())
        .any(|star| {
            star.cells.iter().all(|cell| {
                cell.z == origin.z
                    && cell.x.abs_diff(origin.x) <= DYSON_STAR_RADIUS
                    && cell.y.abs_diff(origin.y) <= DYSON_STAR_RADIUS
            })
        })
}

impl GameState {
    /// Buy a body and place it on the player's own board.
    ///
    /// Placement powers are granted as part of the purchase.
    ///
    /// # Errors
    ///
    /// Returns the first reason the purchase is refused. Nothing changes on
    /// refusal.
    pub fn purchase(
        &mut self,
        player: PlayerId,
        kind: BodyKind,
        origin: Coord,
        rotation: u8,
    ) -> Result<BodyRef, PurchaseError> {
        if self.is_game_over() {
            return Err(PurchaseError::GameOver);
        }
        if self.has_pending_probe() {
            return Err(PurchaseError::ProbePending);
        }
        let definition = Arc::clone(
            self.catalog()
                .get(kind)
                .ok_or(PurchaseError::UnknownBody(kind))?,
        );
        let buyer = self
            .player_mut(player)
            .ok_or(PurchaseError::UnknownPlayer(player))?;

        if buyer.currency < definition.price {
            return Err(PurchaseError::InsufficientCurrency {
                kind,
                price: definition.price,
                available: buyer.currency,
            });
        }
        if let Some(reason) = lock_reason(buyer, kind, origin) {
            return Err(PurchaseError::Locked(kind, reason));
        }
        if !buyer.board.can_place(&definition.shape, origin, rotation) {
            return Err(PurchaseError::Blocked(kind));
        }

        let body = buyer.board.place(&definition, player, origin, rotation);
        buyer.currency -= definition.price;
        let remaining = buyer.currency;

        info!(
            player = %seat_label(player),
            %kind,
            %origin,
            rotation,
            remaining,
            "body purchased"
        );
        let placed = BodyRef { owner: player, body };
        self.record(GameEvent::BodyPlaced {
            body: placed,
            kind,
            price: definition.price,
        });
        self.handle_placement(player, body);
        Ok(placed)
    }

    /// Types the player could buy right now, ignoring where they would go.
    ///
    /// A Dyson Sphere is listed once the player owns a Star.
    #[must_use]
    pub fn affordable_kinds(&self, player: PlayerId) -> Vec<BodyKind> {
        let Some(buyer) = self.player(player) else {
            return Vec::new();
        };
        self.catalog()
            .iter()
            .filter(|definition| definition.price <= buyer.currency)
            .filter(|definition| {
                definition.kind != BodyKind::DysonSphere || buyer.owns_kind(BodyKind::Star)
            })
            .map(|definition| definition.kind)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::BodyCatalog;
    use crate::config::GameConfig;

    fn create_test_game() -> GameState {
        let mut game = GameState::new(GameConfig::default(), Arc::new(BodyCatalog::standard()), 1);
        game.new_game(2, 1).unwrap();
        game
    }

    #[test]
    fn test_purchase_deducts_and_places() {
        let mut game = create_test_game();
        let placed = game
            .purchase(0, BodyKind::Rocket3, Coord::new(0, 0, 0), 1)
            .unwrap();
        let player = game.player(0).unwrap();
        assert_eq!(player.currency, 17);
        let body = player.board.body(placed.body).unwrap();
        assert_eq!(body.cells, vec![Coord::new(0, 0, 0), Coord::new(0, 1, 0), Coord::new(0, 2, 0)]);
        assert!(game.events().contains(&GameEvent::BodyPlaced {
            body: placed,
            kind: BodyKind::Rocket3,
            price: 3,
        }));
    }

    #[test]
    fn test_purchase_grants_placement_powers() {
        let mut game = create_test_game();
        game.purchase(1, BodyKind::Moon, Coord::new(5, 5, 0), 0).unwrap();
        assert_eq!(game.player(1).unwrap().powers.len(), 1);
    }

    #[test]
    fn test_purchase_refusals_leave_state() {
        let mut game = create_test_game();
        game.purchase(0, BodyKind::Star, Coord::new(7, 7, 0), 0).unwrap();

        assert_eq!(
            game.purchase(0, BodyKind::Planet, Coord::new(0, 0, 0), 0),
            Err(PurchaseError::InsufficientCurrency {
                kind: BodyKind::Planet,
                price: 8,
                available: 5,
            })
        );
        assert_eq!(
            game.purchase(0, BodyKind::Spacejunk, Coord::new(7, 7, 0), 0),
            Err(PurchaseError::Blocked(BodyKind::Spacejunk))
        );
        assert_eq!(
            game.purchase(0, BodyKind::Spacejunk, Coord::new(15, 0, 0), 0),
            Err(PurchaseError::Blocked(BodyKind::Spacejunk))
        );
        assert_eq!(
            game.purchase(9, BodyKind::Spacejunk, Coord::new(0, 0, 0), 0),
            Err(PurchaseError::UnknownPlayer(9))
        );
        assert_eq!(game.player(0).unwrap().currency, 5);
        assert_eq!(game.player(0).unwrap().bodies().len(), 1);
    }

    #[test]
    fn test_dyson_requires_encircled_star() {
        let mut game = create_test_game();
        game.player_mut(0).unwrap().currency = 100;

        assert_eq!(
            game.purchase(0, BodyKind::DysonSphere, Coord::new(7, 7, 0), 0),
            Err(PurchaseError::Locked(BodyKind::DysonSphere, "requires a Star"))
        );

        game.purchase(0, BodyKind::Star, Coord::new(7, 7, 0), 0).unwrap();
        assert!(matches!(
            game.purchase(0, BodyKind::DysonSphere, Coord::new(7, 8, 0), 0),
            Err(PurchaseError::Locked(BodyKind::DysonSphere, _))
        ));
        game.purchase(0, BodyKind::DysonSphere, Coord::new(7, 7, 0), 0).unwrap();
        assert_eq!(game.player(0).unwrap().currency, 100 - 15 - 18);
    }

    #[test]
    fn test_encircle_check_at_coordinate_extremes() {
        let mut game = create_test_game();
        game.player_mut(0).unwrap().currency = 100;
        game.purchase(0, BodyKind::Star, Coord::new(7, 7, 0), 0).unwrap();
        let player = game.player(0).unwrap();
        assert!(!encircles_star(player, Coord::new(i32::MIN, i32::MIN, 0)));
        assert!(!encircles_star(player, Coord::new(i32::MAX, 7, 0)));
        assert!(matches!(
            game.purchase(0, BodyKind::DysonSphere, Coord::new(i32::MIN, 7, 0), 0),
            Err(PurchaseError::Locked(..))
        ));
    }

    #[test]
    fn test_affordable_kinds() {
        let mut game = create_test_game();
        let kinds = game.affordable_kinds(0);
        assert_eq!(kinds.len(), 12);
        assert!(!kinds.contains(&BodyKind::DysonSphere));

        game.purchase(0, BodyKind::Star, Coord::new(7, 7, 0), 0).unwrap();
        assert_eq!(
            game.affordable_kinds(0),
            vec![
                BodyKind::Spacejunk,
                BodyKind::Satellite,
                BodyKind::Rocket3,
                BodyKind::Rocket4,
                BodyKind::Moon,
            ]
        );
        assert!(game.affordable_kinds(7).is_empty());
    }

    #[test]
    fn test_purchase_blocked_while_pending() {
        let mut game = create_test_game();
        game.purchase(1, BodyKind::Spacejunk, Coord::new(1, 1, 0), 0).unwrap();
        game.purchase(1, BodyKind::Spacejunk, Coord::new(3, 3, 0), 0).unwrap();
        game.purchase(0, BodyKind::Spacejunk, Coord::new(3, 3, 0), 0).unwrap();
        game.complete_placement_for_current_player();
        game.complete_placement_for_current_player();
        game.player_mut(1).unwrap().false_report_tokens = 1;
        game.launch_probe(0, 1, Coord::new(1, 1, 0));

        assert_eq!(
            game.purchase(0, BodyKind::Spacejunk, Coord::new(5, 5, 0), 0),
            Err(PurchaseError::ProbePending)
        );
    }
}

//! Board cells, occupancy and probe resolution.
//!
//! A board is a flat arena of cells (layer-major, then row-major) plus the
//! body instances placed on it. Cells refer to bodies by [`BodyId`] and
//! bodies list the coordinates they occupy, so neither side owns the other.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::game::{BodyDefinition, BodyId, BodyInstance, BodyShape, PlayerId};

/// A coordinate on a board (or a local offset inside a body shape).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    /// X coordinate (column).
    pub x: i32,
    /// Y coordinate (row).
    pub y: i32,
    /// Z coordinate (layer).
    pub z: i32,
}

impl Coord {
    /// Create a new coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Translate by another coordinate.
    ///
    /// Returns `None` if any axis leaves the `i32` range.
    #[must_use]
    pub fn offset(self, by: Coord) -> Option<Self> {
        Some(Self::new(
            self.x.checked_add(by.x)?,
            self.y.checked_add(by.y)?,
            self.z.checked_add(by.z)?,
        ))
    }

    /// Rotate about the vertical axis by `rotation` quarter turns.
    ///
    /// Only the low two bits matter, so `4` is the same as `0`. Returns
    /// `None` when an axis equal to `i32::MIN` would have to be negated.
    #[must_use]
    pub fn rotated(self, rotation: u8) -> Option<Self> {
        let Self { x, y, z } = self;
        Some(match rotation & 3 {
            1 => Self::new(y.checked_neg()?, x, z),
            2 => Self::new(x.checked_neg()?, y.checked_neg()?, z),
            3 => Self::new(y, x.checked_neg()?, z),
            _ => self,
        })
    }

    /// The axis-aligned neighbors (+x, -x, +y, -y, +z, -z) that exist in `i32` space.
    ///
    /// Neighbors may lie outside any particular board.
    pub fn orthogonal_neighbors(self) -> impl Iterator<Item = Coord> {
        ORTHOGONAL.into_iter().filter_map(move |step| self.offset(step))
    }
}

const ORTHOGONAL: [Coord; 6] = [
    Coord::new(1, 0, 0),
    Coord::new(-1, 0, 0),
    Coord::new(0, 1, 0),
    Coord::new(0, -1, 0),
    Coord::new(0, 0, 1),
    Coord::new(0, 0, -1),
];

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// What the last probe of a cell reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CellReport {
    /// Never probed, or the probe was erased.
    #[default]
    Unknown,
    /// Nothing here and nothing detectable nearby.
    Miss,
    /// A body occupies this cell.
    Hit,
    /// Empty, but an adjacent body reported a near miss.
    NearMiss,
}

/// A single board cell.
#[derive(Debug, Clone, Copy)]
pub struct Cell {
    /// Where the cell sits.
    pub coord: Coord,
    /// Whether the cell has been probed (and not erased since).
    pub probed: bool,
    /// Body occupying this cell, if any.
    pub occupant: Option<BodyId>,
    /// Last visible report.
    pub report: CellReport,
    /// Whether this cell has already contributed a hit to its occupant.
    pub struck: bool,
}

impl Cell {
    const fn new(coord: Coord) -> Self {
        Self {
            coord,
            probed: false,
            occupant: None,
            report: CellReport::Unknown,
            struck: false,
        }
    }
}

/// Result of a probe, either straight from a board or from the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The coordinate does not exist on the target board.
    OutOfBounds,
    /// Empty cell, no near-miss detection.
    Miss,
    /// Empty cell next to a body that reports near misses.
    NearMiss,
    /// The probe struck the given body.
    Hit(BodyId),
    /// The defender spent a false-report token; reported as a miss.
    FalseReport,
    /// Rejected for now, or deferred awaiting the defender's decision.
    Pending,
}

impl ProbeOutcome {
    /// Whether the outcome is a real hit.
    #[must_use]
    pub const fn is_hit(self) -> bool {
        matches!(self, Self::Hit(_))
    }

    /// Whether the outcome should count against the attacker's probe budget.
    #[must_use]
    pub const fn counts_as_probe(self) -> bool {
        !matches!(self, Self::OutOfBounds)
    }
}

impl fmt::Display for ProbeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds => write!(f, "out of bounds"),
            Self::Miss => write!(f, "miss"),
            Self::NearMiss => write!(f, "near miss"),
            Self::Hit(body) => write!(f, "hit body #{}", body.index()),
            Self::FalseReport => write!(f, "miss (false report)"),
            Self::Pending => write!(f, "pending"),
        }
    }
}

/// A player's hidden 3-D board.
#[derive(Debug, Clone)]
pub struct Board {
    width: u16,
    height: u16,
    layers: u16,
    near_miss_reporting: bool,
    cells: Vec<Cell>,
    bodies: Vec<BodyInstance>,
}

impl Board {
    /// Create an empty board.
    ///
    /// Returns `None` if any dimension is zero.
    #[must_use]
    pub fn new(width: u16, height: u16, layers: u16) -> Option<Self> {
        if width == 0 || height == 0 || layers == 0 {
            return None;
        }

        let mut cells = Vec::with_capacity(usize::from(width) * usize::from(height) * usize::from(layers));
        for z in 0..i32::from(layers) {
            for y in 0..i32::from(height) {
                for x in 0..i32::from(width) {
                    cells.push(Cell::new(Coord::new(x, y, z)));
                }
            }
        }

        Some(Self {
            width,
            height,
            layers,
            near_miss_reporting: true,
            cells,
            bodies: Vec::new(),
        })
    }

    /// Width in cells.
    #[must_use]
    pub const fn width(&self) -> u16 {
        self.width
    }

    /// Height in cells.
    #[must_use]
    pub const fn height(&self) -> u16 {
        self.height
    }

    /// Number of stacked layers.
    #[must_use]
    pub const fn layers(&self) -> u16 {
        self.layers
    }

    /// Enable or disable near-miss reports for empty probes.
    pub fn set_near_miss_reporting(&mut self, enabled: bool) {
        self.near_miss_reporting = enabled;
    }

    /// Check if a coordinate is within the board.
    #[must_use]
    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.x >= 0
            && coord.y >= 0
            && coord.z >= 0
            && coord.x < i32::from(self.width)
            && coord.y < i32::from(self.height)
            && coord.z < i32::from(self.layers)
    }

    #[allow(clippy::cast_sign_loss)]
    fn index(&self, coord: Coord) -> Option<usize> {
        if !self.in_bounds(coord) {
            return None;
        }
        let plane = usize::from(self.width) * usize::from(self.height);
        Some(coord.z as usize * plane + coord.y as usize * usize::from(self.width) + coord.x as usize)
    }

    /// Get the cell at a coordinate.
    #[must_use]
    pub fn get(&self, coord: Coord) -> Option<&Cell> {
        self.index(coord).map(|idx| &self.cells[idx])
    }

    /// All cells, layer by layer.
    #[must_use]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Bodies placed on this board, indexed by [`BodyId`].
    #[must_use]
    pub fn bodies(&self) -> &[BodyInstance] {
        &self.bodies
    }

    /// Look up a placed body.
    #[must_use]
    pub fn body(&self, id: BodyId) -> Option<&BodyInstance> {
        self.bodies.get(id.index())
    }

    pub(crate) fn body_mut(&mut self, id: BodyId) -> Option<&mut BodyInstance> {
        self.bodies.get_mut(id.index())
    }

    /// Check whether a shape fits at `origin` with the given rotation.
    ///
    /// Every target cell must exist, be unoccupied and be unprobed.
    #[must_use]
    pub fn can_place(&self, shape: &BodyShape, origin: Coord, rotation: u8) -> bool {
        shape.footprint(origin, rotation).all(|coord| {
            coord
                .and_then(|coord| self.get(coord))
                .is_some_and(|cell| cell.occupant.is_none() && !cell.probed)
        })
    }

    /// Place a body.
    ///
    /// Overlap is not re-checked: callers must validate with [`Board::can_place`].
    ///
    /// # Panics
    ///
    /// Panics if any target cell is out of bounds.
    pub fn place(
        &mut self,
        definition: &Arc<BodyDefinition>,
        owner: PlayerId,
        origin: Coord,
        rotation: u8,
    ) -> BodyId {
        let id = BodyId::new(self.bodies.len());
        let mut occupied = Vec::with_capacity(definition.shape.len());

        for coord in definition.shape.footprint(origin, rotation) {
            let Some((coord, idx)) = coord.and_then(|coord| Some((coord, self.index(coord)?))) else {
                panic!("placement at {origin} leaves the board; validate with can_place first");
            };
            self.cells[idx].occupant = Some(id);
            occupied.push(coord);
        }

        self.bodies
            .push(BodyInstance::new(Arc::clone(definition), owner, occupied));
        id
    }

    /// Probe a cell.
    ///
    /// A cell contributes at most one hit to its occupant, however often it
    /// is probed.
    pub fn probe(&mut self, coord: Coord) -> ProbeOutcome {
        let Some(idx) = self.index(coord) else {
            return ProbeOutcome::OutOfBounds;
        };

        let cell = &mut self.cells[idx];
        cell.probed = true;

        if let Some(body) = cell.occupant {
            cell.report = CellReport::Hit;
            if !cell.struck {
                cell.struck = true;
                self.bodies[body.index()].hit_count += 1;
            }
            return ProbeOutcome::Hit(body);
        }

        let near = self.near_miss_reporting && self.detects_near_miss(coord);
        if near {
            self.cells[idx].report = CellReport::NearMiss;
            ProbeOutcome::NearMiss
        } else {
            self.cells[idx].report = CellReport::Miss;
            ProbeOutcome::Miss
        }
    }

    /// Only the six orthogonal neighbors are consulted, so diagonal
    /// occupants never produce a near miss regardless of their pattern.
    fn detects_near_miss(&self, coord: Coord) -> bool {
        coord.orthogonal_neighbors().any(|neighbor| {
            self.get(neighbor)
                .and_then(|cell| cell.occupant)
                .and_then(|body| self.body(body))
                .is_some_and(|body| body.definition.near_miss.detects(neighbor, coord))
        })
    }

    /// Report a hidden occupant as a miss without damaging it.
    ///
    /// Returns `false` if the cell is out of bounds or empty.
    pub(crate) fn mask_as_miss(&mut self, coord: Coord) -> bool {
        let Some(idx) = self.index(coord) else {
            return false;
        };
        let cell = &mut self.cells[idx];
        if cell.occupant.is_none() {
            return false;
        }
        cell.probed = true;
        cell.report = CellReport::Miss;
        true
    }

    /// Forget a probe, returning the cell to `Unknown`.
    ///
    /// Hits already counted stay counted. Returns `false` if the cell does
    /// not exist or was never probed.
    pub(crate) fn unprobe(&mut self, coord: Coord) -> bool {
        let Some(idx) = self.index(coord) else {
            return false;
        };
        let cell = &mut self.cells[idx];
        if !cell.probed {
            return false;
        }
        cell.probed = false;
        cell.report = CellReport::Unknown;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{BodyKind, NearMissPattern};

    fn definition(kind: BodyKind, pattern: NearMissPattern, points: &[(i32, i32, i32)]) -> Arc<BodyDefinition> {
        let shape = BodyShape::new(points.iter().map(|&(x, y, z)| Coord::new(x, y, z)).collect());
        Arc::new(BodyDefinition::new(kind, "test", 1, 1, pattern, shape))
    }

    #[test]
    fn test_board_creation() {
        let board = Board::new(5, 4, 2).unwrap();
        assert_eq!(board.width(), 5);
        assert_eq!(board.height(), 4);
        assert_eq!(board.layers(), 2);
        assert_eq!(board.cells().len(), 40);
        assert_eq!(board.get(Coord::new(4, 3, 1)).unwrap().coord, Coord::new(4, 3, 1));
    }

    #[test]
    fn test_board_zero_size() {
        assert!(Board::new(0, 5, 1).is_none());
        assert!(Board::new(5, 0, 1).is_none());
        assert!(Board::new(5, 5, 0).is_none());
    }

    #[test]
    fn test_board_bounds() {
        let board = Board::new(3, 3, 1).unwrap();
        assert!(board.in_bounds(Coord::new(0, 0, 0)));
        assert!(board.in_bounds(Coord::new(2, 2, 0)));
        assert!(!board.in_bounds(Coord::new(3, 0, 0)));
        assert!(!board.in_bounds(Coord::new(0, -1, 0)));
        assert!(!board.in_bounds(Coord::new(0, 0, 1)));
    }

    #[test]
    fn test_rotation_steps() {
        let p = Coord::new(2, 1, 0);
        assert_eq!(p.rotated(0), Some(p));
        assert_eq!(p.rotated(1), Some(Coord::new(-1, 2, 0)));
        assert_eq!(p.rotated(2), Some(Coord::new(-2, -1, 0)));
        assert_eq!(p.rotated(3), Some(Coord::new(1, -2, 0)));
        assert_eq!(p.rotated(4), Some(p));
    }

    #[test]
    fn test_coordinate_overflow_is_none() {
        assert_eq!(Coord::new(i32::MAX, 0, 0).offset(Coord::new(1, 0, 0)), None);
        assert_eq!(Coord::new(0, i32::MIN, 0).offset(Coord::new(0, -1, 0)), None);
        assert_eq!(Coord::new(0, i32::MIN, 0).rotated(1), None);
        assert_eq!(Coord::new(i32::MIN, 0, 0).rotated(2), None);
        assert_eq!(Coord::new(i32::MIN, 0, 0).rotated(3), None);
        assert_eq!(Coord::new(i32::MIN, i32::MIN, 0).rotated(4), Some(Coord::new(i32::MIN, i32::MIN, 0)));
        assert_eq!(Coord::new(i32::MAX, 0, i32::MIN).orthogonal_neighbors().count(), 4);
    }

    #[test]
    fn test_extreme_coordinates_rejected() {
        let mut board = Board::new(5, 5, 1).unwrap();
        let far = BodyShape::new(vec![Coord::new(0, 0, 0), Coord::new(0, i32::MIN, 0)]);
        for rotation in 0..4 {
            assert!(!board.can_place(&far, Coord::new(0, 0, 0), rotation));
        }
        let single = BodyShape::new(vec![Coord::new(0, 0, 0)]);
        for extreme in [
            Coord::new(i32::MAX, i32::MAX, i32::MAX),
            Coord::new(i32::MIN, i32::MIN, i32::MIN),
            Coord::new(i32::MAX, 0, 0),
        ] {
            assert!(!board.can_place(&single, extreme, 1));
            assert_eq!(board.probe(extreme), ProbeOutcome::OutOfBounds);
        }
    }

    #[test]
    fn test_can_place_rejects_overlap_and_probed() {
        let mut board = Board::new(5, 5, 1).unwrap();
        let bar = definition(BodyKind::Satellite, NearMissPattern::None, &[(0, 0, 0), (1, 0, 0)]);

        assert!(board.can_place(&bar.shape, Coord::new(0, 0, 0), 0));
        board.place(&bar, 0, Coord::new(0, 0, 0), 0);
        assert!(!board.can_place(&bar.shape, Coord::new(1, 0, 0), 0));

        board.probe(Coord::new(3, 3, 0));
        assert!(!board.can_place(&bar.shape, Coord::new(2, 3, 0), 0));
        assert!(!board.can_place(&bar.shape, Coord::new(4, 4, 0), 0));
    }

    #[test]
    fn test_place_with_rotation() {
        let mut board = Board::new(5, 5, 1).unwrap();
        let bar = definition(BodyKind::Rocket3, NearMissPattern::None, &[(0, 0, 0), (1, 0, 0), (2, 0, 0)]);

        // A quarter turn maps +x onto +y.
        assert!(board.can_place(&bar.shape, Coord::new(1, 1, 0), 1));
        let id = board.place(&bar, 0, Coord::new(1, 1, 0), 1);
        let body = board.body(id).unwrap();
        assert_eq!(
            body.cells,
            vec![Coord::new(1, 1, 0), Coord::new(1, 2, 0), Coord::new(1, 3, 0)]
        );
        assert_eq!(board.get(Coord::new(1, 3, 0)).unwrap().occupant, Some(id));
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_place_unvalidated_panics() {
        let mut board = Board::new(2, 2, 1).unwrap();
        let bar = definition(BodyKind::Rocket3, NearMissPattern::None, &[(0, 0, 0), (1, 0, 0), (2, 0, 0)]);
        board.place(&bar, 0, Coord::new(0, 0, 0), 0);
    }

    #[test]
    fn test_probe_hit_counts_once() {
        let mut board = Board::new(3, 3, 1).unwrap();
        let junk = definition(BodyKind::Spacejunk, NearMissPattern::None, &[(0, 0, 0)]);
        let id = board.place(&junk, 0, Coord::new(1, 1, 0), 0);

        assert_eq!(board.probe(Coord::new(1, 1, 0)), ProbeOutcome::Hit(id));
        assert_eq!(board.probe(Coord::new(1, 1, 0)), ProbeOutcome::Hit(id));
        let body = board.body(id).unwrap();
        assert_eq!(body.hit_count, 1);
        assert!(body.is_fully_colonized());
        assert_eq!(board.get(Coord::new(1, 1, 0)).unwrap().report, CellReport::Hit);
    }

    #[test]
    fn test_probe_out_of_bounds() {
        let mut board = Board::new(3, 3, 1).unwrap();
        assert_eq!(board.probe(Coord::new(3, 0, 0)), ProbeOutcome::OutOfBounds);
        assert_eq!(board.probe(Coord::new(0, 0, -1)), ProbeOutcome::OutOfBounds);
    }

    #[test]
    fn test_near_miss_orthogonal() {
        let mut board = Board::new(3, 3, 2).unwrap();
        let junk = definition(BodyKind::Spacejunk, NearMissPattern::AdjacentNoDiag, &[(0, 0, 0)]);
        board.place(&junk, 0, Coord::new(1, 1, 0), 0);

        assert_eq!(board.probe(Coord::new(2, 1, 0)), ProbeOutcome::NearMiss);
        // Directly above counts as orthogonal.
        assert_eq!(board.probe(Coord::new(1, 1, 1)), ProbeOutcome::NearMiss);
        assert_eq!(board.probe(Coord::new(2, 2, 0)), ProbeOutcome::Miss);
        assert_eq!(board.get(Coord::new(2, 1, 0)).unwrap().report, CellReport::NearMiss);
    }

    #[test]
    fn test_near_miss_none_pattern() {
        let mut board = Board::new(3, 3, 1).unwrap();
        let rocket = definition(BodyKind::Rocket3, NearMissPattern::None, &[(0, 0, 0)]);
        board.place(&rocket, 0, Coord::new(1, 1, 0), 0);
        assert_eq!(board.probe(Coord::new(1, 0, 0)), ProbeOutcome::Miss);
    }

    #[test]
    fn test_near_miss_disabled() {
        let mut board = Board::new(3, 3, 1).unwrap();
        board.set_near_miss_reporting(false);
        let junk = definition(BodyKind::Spacejunk, NearMissPattern::AdjacentNoDiag, &[(0, 0, 0)]);
        board.place(&junk, 0, Coord::new(1, 1, 0), 0);
        assert_eq!(board.probe(Coord::new(2, 1, 0)), ProbeOutcome::Miss);
    }

    #[test]
    fn test_unprobe_and_mask() {
        let mut board = Board::new(3, 3, 1).unwrap();
        let junk = definition(BodyKind::Spacejunk, NearMissPattern::None, &[(0, 0, 0)]);
        let id = board.place(&junk, 0, Coord::new(0, 0, 0), 0);

        assert!(!board.unprobe(Coord::new(2, 2, 0)));
        board.probe(Coord::new(2, 2, 0));
        assert!(board.unprobe(Coord::new(2, 2, 0)));
        let cell = board.get(Coord::new(2, 2, 0)).unwrap();
        assert!(!cell.probed);
        assert_eq!(cell.report, CellReport::Unknown);

        assert!(!board.mask_as_miss(Coord::new(1, 1, 0)));
        assert!(board.mask_as_miss(Coord::new(0, 0, 0)));
        let cell = board.get(Coord::new(0, 0, 0)).unwrap();
        assert_eq!(cell.report, CellReport::Miss);
        assert_eq!(cell.occupant, Some(id));
        assert_eq!(board.body(id).unwrap().hit_count, 0);
    }
}

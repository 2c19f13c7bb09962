//! Body templates and placed body instances.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::game::{Coord, PlayerId, Power};

/// Structural type tag of a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BodyKind {
    /// Single-cell decoy.
    Spacejunk,
    /// Two-cell bar.
    Satellite,
    /// Three-cell bar.
    Rocket3,
    /// Four-cell bar.
    Rocket4,
    /// Five-cell plus.
    Moon,
    /// Two by three block.
    SpaceStation,
    /// Seven-cell L ladder.
    AlienArtifact,
    /// Two by four block; the stock double-probe structure.
    Planet,
    /// Three by four block.
    AsteroidBelt,
    /// Eight-cell cloud.
    Nebula,
    /// Twelve-cell star.
    Star,
    /// Five by five ring.
    Ringworld,
    /// Seven by seven ring; must encircle a Star.
    DysonSphere,
}

impl fmt::Display for BodyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// How a body announces probes that land next to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum NearMissPattern {
    /// Never reports.
    #[default]
    None,
    /// Reports for any orthogonally adjacent probe.
    AdjacentNoDiag,
    /// Reports within Chebyshev distance 1 on the same layer.
    AdjacentAllDirs,
    /// Reports within Chebyshev distance 1 across all three axes.
    AdjacentAllLayers,
}

impl NearMissPattern {
    /// Whether an occupant at `occupied` reports a near miss for a probe at `probe`.
    ///
    /// The board only asks about orthogonal neighbors, so the distance checks
    /// for the wider patterns always pass in practice.
    #[must_use]
    pub const fn detects(self, occupied: Coord, probe: Coord) -> bool {
        let dx = occupied.x.abs_diff(probe.x);
        let dy = occupied.y.abs_diff(probe.y);
        let dz = occupied.z.abs_diff(probe.z);
        match self {
            Self::None => false,
            Self::AdjacentNoDiag => true,
            Self::AdjacentAllDirs => dx <= 1 && dy <= 1 && dz == 0,
            Self::AdjacentAllLayers => dx <= 1 && dy <= 1 && dz <= 1,
        }
    }
}

/// Ordered local offsets relative to an anchor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BodyShape {
    points: Vec<Coord>,
}

impl BodyShape {
    /// Create a shape from its offsets.
    #[must_use]
    pub fn new(points: Vec<Coord>) -> Self {
        Self { points }
    }

    /// A flat `width` x `height` rectangle anchored at its corner.
    #[must_use]
    pub fn rect(width: i32, height: i32) -> Self {
        let points = (0..height)
            .flat_map(|y| (0..width).map(move |x| Coord::new(x, y, 0)))
            .collect();
        Self { points }
    }

    /// The offsets, in definition order.
    #[must_use]
    pub fn points(&self) -> &[Coord] {
        &self.points
    }

    /// Number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the shape has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Board coordinates covered when anchored at `origin` with `rotation` quarter turns.
    ///
    /// A cell whose coordinate would overflow `i32` comes out as `None`.
    pub fn footprint(&self, origin: Coord, rotation: u8) -> impl Iterator<Item = Option<Coord>> + '_ {
        self.points
            .iter()
            .map(move |point| point.rotated(rotation).and_then(|local| origin.offset(local)))
    }
}

/// Immutable template shared by every instance of a body type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyDefinition {
    /// Type tag.
    pub kind: BodyKind,
    /// Display name.
    pub name: String,
    /// Population capacity.
    pub capacity: u32,
    /// Purchase price.
    pub price: u32,
    /// Cells covered.
    pub shape: BodyShape,
    /// Near-miss detection pattern.
    #[serde(default)]
    pub near_miss: NearMissPattern,
    /// One-line rules summary.
    #[serde(default)]
    pub summary: String,
    /// Powers granted to the owner when placed.
    #[serde(default)]
    pub placement_powers: Vec<Power>,
    /// Powers granted to whoever fully colonizes it.
    #[serde(default)]
    pub colonization_powers: Vec<Power>,
}

impl BodyDefinition {
    /// Create a definition without summary or powers.
    #[must_use]
    pub fn new(
        kind: BodyKind,
        name: impl Into<String>,
        capacity: u32,
        price: u32,
        near_miss: NearMissPattern,
        shape: BodyShape,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            capacity,
            price,
            shape,
            near_miss,
            summary: String::new(),
            placement_powers: Vec::new(),
            colonization_powers: Vec::new(),
        }
    }

    /// Attach a rules summary.
    #[must_use]
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = summary.into();
        self
    }

    /// Attach placement-triggered powers.
    #[must_use]
    pub fn with_placement_powers(mut self, powers: Vec<Power>) -> Self {
        self.placement_powers = powers;
        self
    }

    /// Attach colonization-triggered powers.
    #[must_use]
    pub fn with_colonization_powers(mut self, powers: Vec<Power>) -> Self {
        self.colonization_powers = powers;
        self
    }
}

/// Index of a body in its board's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(usize);

impl BodyId {
    pub(crate) const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position in [`Board::bodies`](crate::game::Board::bodies).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A body on a specific player's board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyRef {
    /// Board owner.
    pub owner: PlayerId,
    /// Body on that board.
    pub body: BodyId,
}

/// A placed body.
#[derive(Debug, Clone)]
pub struct BodyInstance {
    /// Shared template.
    pub definition: Arc<BodyDefinition>,
    /// Owning player.
    pub owner: PlayerId,
    /// Occupied board cells, fixed at placement.
    pub cells: Vec<Coord>,
    /// Distinct cells struck so far.
    pub hit_count: u32,
    /// Placement powers have been handed out.
    pub placement_powers_granted: bool,
    /// Colonization powers have been handed out.
    pub colonization_powers_granted: bool,
}

impl BodyInstance {
    pub(crate) fn new(definition: Arc<BodyDefinition>, owner: PlayerId, cells: Vec<Coord>) -> Self {
        Self {
            definition,
            owner,
            cells,
            hit_count: 0,
            placement_powers_granted: false,
            colonization_powers_granted: false,
        }
    }

    /// Template type tag.
    #[must_use]
    pub fn kind(&self) -> BodyKind {
        self.definition.kind
    }

    /// Whether every occupied cell has been struck.
    #[must_use]
    pub fn is_fully_colonized(&self) -> bool {
        self.hit_count as usize >= self.cells.len()
    }

    /// Whether the body has taken no hits at all.
    #[must_use]
    pub const fn is_intact(&self) -> bool {
        self.hit_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_shape() {
        let shape = BodyShape::rect(3, 2);
        assert_eq!(shape.len(), 6);
        assert_eq!(shape.points()[4], Coord::new(1, 1, 0));
    }

    #[test]
    fn test_footprint_translates_and_rotates() {
        let shape = BodyShape::new(vec![Coord::new(0, 0, 0), Coord::new(1, 0, 1)]);
        let cells: Option<Vec<_>> = shape.footprint(Coord::new(5, 5, 0), 2).collect();
        assert_eq!(cells, Some(vec![Coord::new(5, 5, 0), Coord::new(4, 5, 1)]));
    }

    #[test]
    fn test_near_miss_patterns() {
        let probe = Coord::new(2, 2, 1);
        let beside = Coord::new(3, 2, 1);
        let above = Coord::new(2, 2, 2);
        let diagonal = Coord::new(3, 3, 1);

        assert!(!NearMissPattern::None.detects(beside, probe));
        assert!(NearMissPattern::AdjacentNoDiag.detects(above, probe));
        assert!(NearMissPattern::AdjacentAllDirs.detects(diagonal, probe));
        assert!(!NearMissPattern::AdjacentAllDirs.detects(above, probe));
        assert!(NearMissPattern::AdjacentAllLayers.detects(above, probe));
        assert!(!NearMissPattern::AdjacentAllLayers.detects(Coord::new(4, 2, 1), probe));
    }

    #[test]
    fn test_colonization_threshold() {
        let definition = Arc::new(BodyDefinition::new(
            BodyKind::Satellite,
            "Satellite",
            2,
            2,
            NearMissPattern::None,
            BodyShape::rect(2, 1),
        ));
        let mut body = BodyInstance::new(definition, 0, vec![Coord::new(0, 0, 0), Coord::new(1, 0, 0)]);
        assert!(body.is_intact());
        assert!(!body.is_fully_colonized());
        body.hit_count = 1;
        assert!(!body.is_intact());
        assert!(!body.is_fully_colonized());
        body.hit_count = 2;
        assert!(body.is_fully_colonized());
    }
}

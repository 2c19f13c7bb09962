//! Body catalog.
//!
//! The catalog is built once, outside the engine, and injected into a
//! [`GameState`](crate::game::GameState). Definitions are shared behind
//! `Arc` so every placed instance points at the same template.

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::error::CatalogError;
use crate::game::{
    BodyDefinition, BodyKind, BodyShape, Coord, NearMissPattern, Power, PowerEffect, PowerTiming,
};

/// Immutable lookup from body type to definition.
#[derive(Debug, Clone, Default)]
pub struct BodyCatalog {
    entries: BTreeMap<BodyKind, Arc<BodyDefinition>>,
}

impl BodyCatalog {
    /// Build a catalog, rejecting duplicate types and malformed shapes.
    ///
    /// # Errors
    ///
    /// Returns an error for a repeated type, an empty shape or a shape that
    /// lists the same offset twice.
    pub fn from_definitions(definitions: Vec<BodyDefinition>) -> Result<Self, CatalogError> {
        let mut entries = BTreeMap::new();
        for definition in definitions {
            let kind = definition.kind;
            if definition.shape.is_empty() {
                return Err(CatalogError::EmptyShape(kind));
            }
            let distinct: HashSet<Coord> = definition.shape.points().iter().copied().collect();
            if distinct.len() != definition.shape.len() {
                return Err(CatalogError::RepeatedOffset(kind));
            }
            if entries.insert(kind, Arc::new(definition)).is_some() {
                return Err(CatalogError::Duplicate(kind));
            }
        }
        Ok(Self { entries })
    }

    /// Parse a JSON array of definitions.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or the catalog is invalid.
    pub fn from_json_str(text: &str) -> Result<Self, CatalogError> {
        let definitions: Vec<BodyDefinition> = serde_json::from_str(text)?;
        Self::from_definitions(definitions)
    }

    /// Load a JSON catalog file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid catalog.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Serialize the catalog as pretty JSON, in type order.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_string(&self) -> Result<String, CatalogError> {
        let definitions: Vec<&BodyDefinition> = self.entries.values().map(Arc::as_ref).collect();
        Ok(serde_json::to_string_pretty(&definitions)?)
    }

    /// Look up a definition.
    #[must_use]
    pub fn get(&self, kind: BodyKind) -> Option<&Arc<BodyDefinition>> {
        self.entries.get(&kind)
    }

    /// Definitions in type order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<BodyDefinition>> {
        self.entries.values()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The stock thirteen bodies.
    #[must_use]
    pub fn standard() -> Self {
        let entries = standard_definitions()
            .into_iter()
            .map(|definition| (definition.kind, Arc::new(definition)))
            .collect();
        Self { entries }
    }
}

fn shape(points: &[(i32, i32)]) -> BodyShape {
    BodyShape::new(points.iter().map(|&(x, y)| Coord::new(x, y, 0)).collect())
}

fn ring(radius: i32) -> BodyShape {
    let mut points = Vec::new();
    for i in -radius..=radius {
        points.push((i, -radius));
        points.push((i, radius));
    }
    for j in -(radius - 1)..radius {
        points.push((-radius, j));
        points.push((radius, j));
    }
    shape(&points)
}

fn offensive(name: &str, text: &str, effect: PowerEffect) -> Power {
    Power::new(name, text, PowerTiming::OffensiveFaceUp, effect)
}

fn defensive(name: &str, text: &str, effect: PowerEffect) -> Power {
    Power::new(name, text, PowerTiming::DefensiveFaceDown, effect)
}

fn passive(name: &str, text: &str, effect: PowerEffect) -> Power {
    Power::new(name, text, PowerTiming::PassiveUpkeep, effect)
}

#[allow(clippy::too_many_lines)]
fn standard_definitions() -> Vec<BodyDefinition> {
    use NearMissPattern::{AdjacentAllDirs, AdjacentAllLayers, AdjacentNoDiag};

    let afterimage = || {
        defensive(
            "Afterimage",
            "Erase intel from one of your probed cells.",
            PowerEffect::EraseProbe,
        )
    };
    let solar_dividend = || {
        passive(
            "Solar Dividend",
            "Gain 1 currency each turn while active.",
            PowerEffect::GainCurrency { amount: 1 },
        )
    };

    vec![
        BodyDefinition::new(BodyKind::Spacejunk, "Spacejunk", 1, 1, AdjacentNoDiag, shape(&[(0, 0)]))
            .with_summary("Near-hit reporting. Cheap decoy."),
        BodyDefinition::new(BodyKind::Satellite, "Satellite", 2, 2, AdjacentNoDiag, BodyShape::rect(2, 1))
            .with_summary("Near-hit. Unlocks Scan Row when colonized.")
            .with_colonization_powers(vec![offensive(
                "Scan Row",
                "Reveal one entire row on the opponent board.",
                PowerEffect::ScanRow,
            )]),
        BodyDefinition::new(BodyKind::Rocket3, "Rocket (3)", 3, 3, NearMissPattern::None, BodyShape::rect(3, 1))
            .with_summary("No near-hit. Unlocks Scan Column when colonized.")
            .with_colonization_powers(vec![offensive(
                "Scan Column",
                "Reveal the entire column containing the selected cell.",
                PowerEffect::ScanColumn { half_range: false },
            )]),
        BodyDefinition::new(BodyKind::Rocket4, "Rocket (4)", 4, 4, AdjacentNoDiag, BodyShape::rect(4, 1))
            .with_summary("Near-hit. Unlocks Half Column scan when colonized.")
            .with_colonization_powers(vec![offensive(
                "Half Column Scan",
                "Reveal a segment of the selected column.",
                PowerEffect::ScanColumn { half_range: true },
            )]),
        BodyDefinition::new(
            BodyKind::Moon,
            "Moon",
            5,
            5,
            AdjacentNoDiag,
            shape(&[(0, 0), (1, 0), (-1, 0), (0, 1), (0, -1)]),
        )
        .with_summary("Defensive bulwark. Grants a False Report token when placed.")
        .with_placement_powers(vec![defensive(
            "False Report",
            "Gain one False Report token.",
            PowerEffect::FalseReport,
        )]),
        BodyDefinition::new(
            BodyKind::SpaceStation,
            "Space Station",
            6,
            6,
            NearMissPattern::None,
            BodyShape::rect(2, 3),
        )
        .with_summary("Advanced scanning platform.")
        .with_colonization_powers(vec![offensive(
            "Sensor Burst",
            "Reveal a target cell and its orthogonal neighbors.",
            PowerEffect::RevealNeighbors {
                diagonals: false,
                vertical: false,
            },
        )]),
        BodyDefinition::new(
            BodyKind::AlienArtifact,
            "Alien Artifact",
            7,
            7,
            NearMissPattern::None,
            shape(&[(0, 0), (1, 0), (2, 0), (0, 1), (0, 2), (0, 3), (1, 3)]),
        )
        .with_summary("Experimental tech. Cloaks your intel when threatened.")
        .with_placement_powers(vec![afterimage()])
        .with_colonization_powers(vec![afterimage()]),
        BodyDefinition::new(BodyKind::Planet, "Planet", 8, 8, NearMissPattern::None, BodyShape::rect(2, 4))
            .with_summary("Maintains double probe tempo while intact."),
        BodyDefinition::new(
            BodyKind::AsteroidBelt,
            "Asteroid Belt",
            12,
            10,
            NearMissPattern::None,
            BodyShape::rect(3, 4),
        )
        .with_summary("Sturdy debris field that pays out on survival.")
        .with_colonization_powers(vec![passive(
            "Salvage Bounty",
            "Gain 5 currency when this belt is fully colonized.",
            PowerEffect::GainCurrency { amount: 5 },
        )]),
        BodyDefinition::new(
            BodyKind::Nebula,
            "Nebula",
            8,
            9,
            AdjacentAllDirs,
            shape(&[(0, 0), (1, 0), (-1, 0), (0, 1), (0, -1), (1, 1), (-1, 1), (0, 2)]),
        )
        .with_summary("Scan beacon on colonization.")
        .with_colonization_powers(vec![offensive(
            "Beacon Sweep",
            "Reveal all adjacent cells (including vertical neighbors).",
            PowerEffect::RevealNeighbors {
                diagonals: true,
                vertical: true,
            },
        )]),
        BodyDefinition::new(
            BodyKind::Star,
            "Star",
            12,
            15,
            AdjacentAllLayers,
            shape(&[
                (0, 0),
                (1, 0),
                (-1, 0),
                (2, 0),
                (-2, 0),
                (0, 1),
                (0, -1),
                (0, 2),
                (0, -2),
                (1, 1),
                (1, -1),
                (-1, -1),
            ]),
        )
        .with_summary("Generates currency each turn while active.")
        .with_placement_powers(vec![solar_dividend()])
        .with_colonization_powers(vec![solar_dividend()]),
        BodyDefinition::new(BodyKind::Ringworld, "Ringworld", 16, 14, AdjacentNoDiag, ring(2))
            .with_summary("Massive defensive ring.")
            .with_colonization_powers(vec![defensive(
                "Recloak Segment",
                "Erase probing intel from one of your cells.",
                PowerEffect::EraseProbe,
            )]),
        BodyDefinition::new(BodyKind::DysonSphere, "Dyson Sphere", 24, 18, AdjacentNoDiag, ring(3))
            .with_summary("Requires a Star. Upgrades its economy.")
            .with_colonization_powers(vec![passive(
                "Stellar Harvest",
                "Gain 3 currency each turn while active (requires a Star).",
                PowerEffect::GainCurrency { amount: 3 },
            )]),
    ]
}

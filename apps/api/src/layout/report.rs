//! Layout report: the structured hand-off from the layout engine to pricing and
//! to the diagram collaborator.
//!
//! A report is built once per computation from a finished `SofaGeometry` and its
//! packings. Nothing mutates it afterwards; any input change builds a new one.

use serde::{Deserialize, Serialize};

use crate::geometry::pieces::{BolsterPlacement, MeridienneZone};
use crate::geometry::{FoamDims, Position, SofaGeometry, SofaTopology, StructuralPiece};
use crate::packing::{BenchPacking, CushionCounts, CushionSpec};

/// One straight bench with its cushions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchReport {
    pub position: Position,
    pub edge_length: f64,
    pub usable_length: f64,
    pub foam: FoamDims,
    pub cushions: CushionSpec,
    pub cushion_width: f64,
    pub meridienne: Option<MeridienneZone>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutReport {
    pub topology: SofaTopology,
    pub depth: f64,
    pub nb_straight_benches: usize,
    pub nb_corner_benches: usize,
    pub nb_backrests: usize,
    pub nb_armrests: usize,
    /// (length, width) per straight bench, in bench order (left, bottom, right).
    pub foam_dims_straight: Vec<FoamDims>,
    pub foam_dims_corner: Vec<FoamDims>,
    pub cushion_counts: CushionCounts,
    /// Bolsters placed at bench ends. Untagged extras are added at pricing time.
    pub nb_bolsters: usize,
    pub benches: Vec<BenchReport>,
    /// Every structural piece with its polygon, for the diagram.
    pub pieces: Vec<StructuralPiece>,
    pub bolsters: Vec<BolsterPlacement>,
}

impl LayoutReport {
    pub fn assemble(geometry: &SofaGeometry, packings: &[BenchPacking]) -> Self {
        let benches: Vec<BenchReport> = geometry
            .benches
            .iter()
            .zip(packings)
            .map(|(bench, packing)| BenchReport {
                position: bench.position,
                edge_length: bench.edge_length,
                usable_length: bench.usable_length,
                foam: bench.foam(),
                cushions: packing.cushions,
                cushion_width: packing.cushion_width,
                meridienne: bench.meridienne.clone(),
            })
            .collect();

        Self {
            topology: geometry.topology,
            depth: geometry.benches.first().map(|b| b.depth).unwrap_or_default(),
            nb_straight_benches: geometry.benches.len(),
            nb_corner_benches: geometry.corners.len(),
            nb_backrests: geometry.backrests.len(),
            nb_armrests: geometry.armrests.len(),
            foam_dims_straight: geometry.benches.iter().map(|b| b.foam()).collect(),
            foam_dims_corner: geometry.corners.iter().filter_map(|c| c.foam).collect(),
            cushion_counts: CushionCounts::from_packings(packings),
            nb_bolsters: geometry.bolsters.len(),
            benches,
            pieces: geometry.pieces(),
            bolsters: geometry.bolsters.clone(),
        }
    }

    /// Straight plus corner foam blocks; one mattress topper each.
    pub fn foam_piece_count(&self) -> usize {
        self.foam_dims_straight.len() + self.foam_dims_corner.len()
    }
}

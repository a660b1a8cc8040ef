//! Choice lists the configuration form must offer.

use serde::Serialize;

use crate::geometry::{DimensionLimits, Position, SofaTopology};
use crate::layout::{LayoutEngine, MERIDIENNE_MAX_CM, MERIDIENNE_MIN_CM};
use crate::packing::SizingPolicy;
use crate::pricing::{
    FoamType, MAX_DECORATIVE_CUSHIONS, MAX_EXTRA_BOLSTERS, THICKNESS_MAX_CM, THICKNESS_MIN_CM,
};

#[derive(Debug, Clone, Serialize)]
pub struct TopologyEntry {
    pub key: &'static str,
    pub label: &'static str,
    pub straight_benches: usize,
    pub corner_benches: usize,
    pub required_edges: &'static [&'static str],
    pub armrest_positions: &'static [Position],
    pub backrest_positions: &'static [Position],
    pub meridienne: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    pub topologies: Vec<TopologyEntry>,
    pub cushion_policies: Vec<&'static str>,
    pub foam_types: Vec<&'static str>,
    pub thickness_cm: Range,
    pub edge_cm: Range,
    pub depth_cm: Range,
    pub meridienne_cm: Range,
    pub max_decorative_cushions: u32,
    pub max_extra_bolsters: u32,
}

impl Catalog {
    pub fn build(layout: &LayoutEngine) -> Self {
        let limits: &DimensionLimits = layout.limits();
        Self {
            topologies: SofaTopology::ALL
                .iter()
                .map(|t| TopologyEntry {
                    key: t.key(),
                    label: t.label(),
                    straight_benches: t.straight_bench_count(),
                    corner_benches: t.corner_count(),
                    required_edges: t.required_edges(),
                    armrest_positions: t.armrest_positions(),
                    backrest_positions: t.backrest_positions(),
                    meridienne: t.supports_meridienne(),
                })
                .collect(),
            cushion_policies: SizingPolicy::catalog_keys(),
            foam_types: FoamType::ALL.iter().map(|f| f.key()).collect(),
            thickness_cm: Range {
                min: THICKNESS_MIN_CM,
                max: THICKNESS_MAX_CM,
            },
            edge_cm: Range {
                min: limits.edge_min_cm,
                max: limits.edge_max_cm,
            },
            depth_cm: Range {
                min: limits.depth_min_cm,
                max: limits.depth_max_cm,
            },
            meridienne_cm: Range {
                min: MERIDIENNE_MIN_CM,
                max: MERIDIENNE_MAX_CM,
            },
            max_decorative_cushions: MAX_DECORATIVE_CUSHIONS,
            max_extra_bolsters: MAX_EXTRA_BOLSTERS,
        }
    }
}

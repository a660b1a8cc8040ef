//! Layout engine: runs the geometry model and the cushion packer for one sofa.
//!
//! # Pipeline
//! 1. Resolve edge lengths for the topology (`MissingDimension` / `InvalidQuoteInput`).
//! 2. Check armrest, backrest, meridienne and bolster flags against the topology.
//!    Structurally impossible flags are rejected, never turned into phantom pieces.
//! 3. Generate the geometry. Any failure there becomes `LayoutComputation`.
//! 4. Pack cushions on every straight bench and assemble the `LayoutReport`.
//!
//! Deterministic and side-effect free: the engine holds only read-only parameters,
//! so one instance is shared by every request.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::QuoteError;
use crate::geometry::{
    DimensionLimits, EdgeLengths, GeometryInput, GeometryModel, Meridienne, Position, RawDimensions,
    Sides, SofaTopology,
};
use crate::layout::report::LayoutReport;
use crate::packing::{BenchSlot, CushionPacker, SizingPolicy};

/// Meridienne length bounds, in centimetres.
pub const MERIDIENNE_MIN_CM: f64 = 50.0;
pub const MERIDIENNE_MAX_CM: f64 = 200.0;

/// Everything the layout engine reads from a configuration record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutRequest {
    pub topology: SofaTopology,
    pub dimensions: RawDimensions,
    #[serde(default)]
    pub backrests: Sides,
    #[serde(default)]
    pub armrests: Sides,
    #[serde(default)]
    pub meridienne: Option<Meridienne>,
    #[serde(default)]
    pub cushion_policy: SizingPolicy,
    /// Bench ends that receive a bolster.
    #[serde(default)]
    pub bolster_positions: Vec<Position>,
}

#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    geometry: GeometryModel,
    packer: CushionPacker,
    limits: DimensionLimits,
}

impl LayoutEngine {
    pub fn new(geometry: GeometryModel, packer: CushionPacker, limits: DimensionLimits) -> Self {
        Self {
            geometry,
            packer,
            limits,
        }
    }

    pub fn limits(&self) -> &DimensionLimits {
        &self.limits
    }

    /// Computes the full layout report. Never returns a partial report.
    pub fn compute(&self, request: &LayoutRequest) -> Result<LayoutReport, QuoteError> {
        let topology = request.topology;
        let edges = EdgeLengths::resolve(topology, &request.dimensions, &self.limits)?;
        validate_structure(request)?;

        let input = GeometryInput {
            topology,
            edges,
            backrests: request.backrests,
            armrests: request.armrests,
            meridienne: request.meridienne,
            bolsters: request.bolster_positions.clone(),
        };
        let geometry = self
            .geometry
            .generate(&input)
            .map_err(|source| QuoteError::LayoutComputation { source })?;

        let slots: Vec<BenchSlot> = geometry
            .benches
            .iter()
            .map(|b| BenchSlot {
                position: b.position,
                usable_length: b.usable_length,
                has_meridienne: b.meridienne.is_some(),
            })
            .collect();
        let packings = self.packer.pack(&slots, request.cushion_policy);
        let report = LayoutReport::assemble(&geometry, &packings);

        debug!(
            "Layout {}: {} benches, {} corners, {} backrests, {} armrests, {} cushions ({})",
            topology,
            report.nb_straight_benches,
            report.nb_corner_benches,
            report.nb_backrests,
            report.nb_armrests,
            report.cushion_counts.total(),
            request.cushion_policy
        );
        Ok(report)
    }
}

/// Rejects flags that name a position the topology does not have.
fn validate_structure(request: &LayoutRequest) -> Result<(), QuoteError> {
    let topology = request.topology;

    for position in request.armrests.positions() {
        if !topology.armrest_positions().contains(&position) {
            return Err(QuoteError::invalid(format!(
                "armrest '{position}' is not available on topology {topology}"
            )));
        }
    }
    for position in request.backrests.positions() {
        if !topology.backrest_positions().contains(&position) {
            return Err(QuoteError::invalid(format!(
                "backrest '{position}' is not available on topology {topology}"
            )));
        }
    }

    if let Some(m) = request.meridienne {
        if !topology.supports_meridienne() {
            return Err(QuoteError::invalid(format!(
                "topology {topology} does not accept a meridienne"
            )));
        }
        if !m.length.is_finite() || m.length < MERIDIENNE_MIN_CM || m.length > MERIDIENNE_MAX_CM {
            return Err(QuoteError::invalid(format!(
                "meridienne length {} cm is outside the allowed range {MERIDIENNE_MIN_CM}–{MERIDIENNE_MAX_CM} cm",
                m.length
            )));
        }
    }

    let mut seen = Vec::with_capacity(request.bolster_positions.len());
    for position in &request.bolster_positions {
        if !topology.armrest_positions().contains(position) {
            return Err(QuoteError::invalid(format!(
                "bolster '{position}' has no bench end on topology {topology}"
            )));
        }
        if seen.contains(position) {
            return Err(QuoteError::invalid(format!("bolster '{position}' is listed twice")));
        }
        seen.push(*position);
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{FoamDims, MeridienneSide, PieceKind};
    use crate::packing::CushionSize;
    use proptest::prelude::*;

    fn dims(tx: f64, ty: Option<f64>, tz: Option<f64>, depth: f64) -> RawDimensions {
        RawDimensions {
            tx: Some(tx),
            ty,
            tz,
            depth: Some(depth),
        }
    }

    fn request(topology: SofaTopology, dimensions: RawDimensions) -> LayoutRequest {
        LayoutRequest {
            topology,
            dimensions,
            backrests: Sides::NONE,
            armrests: Sides::NONE,
            meridienne: None,
            cushion_policy: SizingPolicy::Auto,
            bolster_positions: vec![],
        }
    }

    const ALL_SIDES: Sides = Sides {
        left: true,
        bottom: true,
        right: true,
    };

    #[test]
    fn test_simple_280_single_bench() {
        let report = LayoutEngine::default()
            .compute(&request(SofaTopology::Simple, dims(280.0, None, None, 70.0)))
            .unwrap();
        assert_eq!(report.nb_straight_benches, 1);
        assert_eq!(report.nb_corner_benches, 0);
        assert_eq!(report.foam_dims_straight, vec![FoamDims::new(280.0, 70.0)]);
        assert_eq!(report.cushion_counts.s90, 3);
        assert_eq!(report.cushion_counts.total(), 3);
    }

    #[test]
    fn test_l_with_corner_report() {
        let report = LayoutEngine::default()
            .compute(&request(SofaTopology::LWithCorner, dims(350.0, Some(250.0), None, 70.0)))
            .unwrap();
        assert_eq!(report.nb_straight_benches, 2);
        assert_eq!(report.nb_corner_benches, 1);
        assert_eq!(report.foam_dims_corner, vec![FoamDims::new(90.0, 90.0)]);
        assert_eq!(report.foam_piece_count(), 3);
    }

    #[test]
    fn test_u_two_corners_maximum_valid_set() {
        let mut req = request(
            SofaTopology::UWithTwoCorners,
            dims(450.0, Some(300.0), Some(280.0), 70.0),
        );
        req.backrests = ALL_SIDES;
        req.armrests = Sides {
            left: true,
            bottom: false,
            right: true,
        };
        let report = LayoutEngine::default().compute(&req).unwrap();
        assert_eq!(report.nb_backrests, 3);
        assert_eq!(report.nb_armrests, 2);
        assert_eq!(report.nb_corner_benches, 2);
        assert!(report
            .pieces
            .iter()
            .filter(|p| p.kind == PieceKind::Armrest)
            .all(|p| p.position != Position::Bottom));
    }

    #[test]
    fn test_invalid_armrest_flag_is_rejected() {
        let mut req = request(
            SofaTopology::UWithTwoCorners,
            dims(450.0, Some(300.0), Some(280.0), 70.0),
        );
        req.armrests = ALL_SIDES;
        let err = LayoutEngine::default().compute(&req).unwrap_err();
        assert!(matches!(err, QuoteError::InvalidQuoteInput(ref m) if m.contains("armrest")));
    }

    #[test]
    fn test_invalid_backrest_flag_is_rejected() {
        let mut req = request(SofaTopology::LWithCorner, dims(350.0, Some(250.0), None, 70.0));
        req.backrests = Sides {
            left: false,
            bottom: false,
            right: true,
        };
        assert!(matches!(
            LayoutEngine::default().compute(&req),
            Err(QuoteError::InvalidQuoteInput(_))
        ));
    }

    #[test]
    fn test_missing_dimension_surfaces_unchanged() {
        let req = request(SofaTopology::LNoCorner, dims(350.0, None, None, 70.0));
        assert!(matches!(
            LayoutEngine::default().compute(&req),
            Err(QuoteError::MissingDimension { dimension: "ty", .. })
        ));
    }

    #[test]
    fn test_geometry_failure_wraps_as_layout_computation() {
        let mut req = request(SofaTopology::Simple, dims(200.0, None, None, 70.0));
        req.meridienne = Some(Meridienne {
            side: MeridienneSide::Left,
            length: 200.0,
        });
        let err = LayoutEngine::default().compute(&req).unwrap_err();
        assert!(matches!(err, QuoteError::LayoutComputation { .. }));
    }

    #[test]
    fn test_meridienne_bounds_and_topology() {
        let engine = LayoutEngine::default();
        let mut req = request(SofaTopology::Simple, dims(280.0, None, None, 70.0));
        req.meridienne = Some(Meridienne {
            side: MeridienneSide::Right,
            length: 40.0,
        });
        assert!(matches!(engine.compute(&req), Err(QuoteError::InvalidQuoteInput(_))));

        let mut req = request(
            SofaTopology::UNoCorner,
            dims(450.0, Some(300.0), Some(280.0), 70.0),
        );
        req.meridienne = Some(Meridienne {
            side: MeridienneSide::Left,
            length: 80.0,
        });
        assert!(matches!(engine.compute(&req), Err(QuoteError::InvalidQuoteInput(_))));
    }

    #[test]
    fn test_meridienne_drops_one_cushion() {
        let engine = LayoutEngine::default();
        let mut req = request(SofaTopology::Simple, dims(280.0, None, None, 70.0));
        req.cushion_policy = SizingPolicy::Fixed(CushionSize::S90);
        let without = engine.compute(&req).unwrap();
        req.meridienne = Some(Meridienne {
            side: MeridienneSide::Right,
            length: 60.0,
        });
        let with = engine.compute(&req).unwrap();
        assert_eq!(with.cushion_counts.s90 + 1, without.cushion_counts.s90);
        // foam block is unchanged
        assert_eq!(with.foam_dims_straight, without.foam_dims_straight);
    }

    #[test]
    fn test_bolsters_counted_and_validated() {
        let engine = LayoutEngine::default();
        let mut req = request(SofaTopology::Simple, dims(280.0, None, None, 70.0));
        req.bolster_positions = vec![Position::Left, Position::Right];
        assert_eq!(engine.compute(&req).unwrap().nb_bolsters, 2);

        req.bolster_positions = vec![Position::Left, Position::Left];
        assert!(engine.compute(&req).is_err());

        req.bolster_positions = vec![Position::Bottom];
        assert!(matches!(engine.compute(&req), Err(QuoteError::InvalidQuoteInput(_))));
    }

    #[test]
    fn test_corner_benches_carry_no_cushions() {
        let report = LayoutEngine::default()
            .compute(&request(SofaTopology::LWithCorner, dims(350.0, Some(250.0), None, 70.0)))
            .unwrap();
        let per_bench: u32 = report.benches.iter().map(|b| b.cushions.count).sum();
        assert_eq!(per_bench, report.cushion_counts.total());
    }

    fn any_topology() -> impl Strategy<Value = SofaTopology> {
        prop::sample::select(SofaTopology::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_layout_is_deterministic(
            topology in any_topology(),
            tx in 100.0f64..600.0,
            ty in 100.0f64..600.0,
            tz in 100.0f64..600.0,
            depth in 50.0f64..120.0,
            backrests in any::<(bool, bool, bool)>(),
        ) {
            let engine = LayoutEngine::default();
            let mut req = request(topology, dims(tx, Some(ty), Some(tz), depth));
            req.backrests = Sides { left: backrests.0, bottom: backrests.1, right: backrests.2 };
            let a = engine.compute(&req);
            let b = engine.compute(&req);
            match (a, b) {
                (Ok(a), Ok(b)) => prop_assert_eq!(a, b),
                (Err(a), Err(b)) => prop_assert_eq!(a.to_string(), b.to_string()),
                _ => prop_assert!(false, "one run failed and the other did not"),
            }
        }

        #[test]
        fn prop_every_bench_has_a_cushion(
            topology in any_topology(),
            tx in 100.0f64..600.0,
            ty in 100.0f64..600.0,
            tz in 100.0f64..600.0,
            depth in 50.0f64..120.0,
        ) {
            let req = request(topology, dims(tx, Some(ty), Some(tz), depth));
            if let Ok(report) = LayoutEngine::default().compute(&req) {
                prop_assert_eq!(report.benches.len(), topology.straight_bench_count());
                prop_assert_eq!(report.nb_corner_benches, topology.corner_count());
                prop_assert!(report.benches.iter().all(|b| b.cushions.count >= 1));
            }
        }
    }
}

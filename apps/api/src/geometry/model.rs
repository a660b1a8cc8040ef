//! Geometry model: maps a topology and its edge lengths onto structural pieces.
//!
//! # Bench rules (L = tx, W = ty / tz, D = depth, c = D + corner offset)
//! - Simple: one bench of length L.
//! - L without corner: the longer edge spans the junction, the other bench is
//!   shortened by D.
//! - L with corner: a c × c corner bench at the junction; both benches lose c.
//! - U without corner: the primary bench spans both junctions, wings lose D.
//! - U with one corner: corner on the left junction (left wing and primary lose c),
//!   the primary still spans the right junction (right wing loses D).
//! - U with two corners: both junctions cornered; primary loses 2c, wings lose c.
//!
//! Foam length equals the bench's usable length; foam width equals D.

use serde::{Deserialize, Serialize};

use crate::geometry::dimensions::EdgeLengths;
use crate::geometry::pieces::{
    BolsterPlacement, Edge, FoamDims, MeridienneZone, PieceKind, Polygon, StructuralPiece,
};
use crate::geometry::topology::{MeridienneSide, Position, Sides, SofaTopology};
use crate::geometry::GeometryError;

// ────────────────────────────────────────────────────────────────────────────
// Parameters and inputs
// ────────────────────────────────────────────────────────────────────────────

/// Fixed geometric constants, in centimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeometryParams {
    /// Corner bench side = depth + this offset.
    pub corner_offset_cm: f64,
    pub backrest_thickness_cm: f64,
    pub armrest_thickness_cm: f64,
    pub bolster_diameter_cm: f64,
}

impl Default for GeometryParams {
    fn default() -> Self {
        Self {
            corner_offset_cm: 20.0,
            backrest_thickness_cm: 10.0,
            armrest_thickness_cm: 15.0,
            bolster_diameter_cm: 20.0,
        }
    }
}

/// Chaise-longue extension request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Meridienne {
    pub side: MeridienneSide,
    #[serde(alias = "len")]
    pub length: f64,
}

/// Everything the geometry model needs for one sofa.
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryInput {
    pub topology: SofaTopology,
    pub edges: EdgeLengths,
    pub backrests: Sides,
    pub armrests: Sides,
    pub meridienne: Option<Meridienne>,
    pub bolsters: Vec<Position>,
}

// ────────────────────────────────────────────────────────────────────────────
// Outputs
// ────────────────────────────────────────────────────────────────────────────

/// One straight bench, the unit the cushion packer works on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchSegment {
    pub position: Position,
    pub edge: Edge,
    /// Nominal edge length the bench sits on.
    pub edge_length: f64,
    /// Length left after junction / corner consumption; foam length.
    pub usable_length: f64,
    pub depth: f64,
    pub meridienne: Option<MeridienneZone>,
    pub polygon: Polygon,
}

impl BenchSegment {
    pub fn foam(&self) -> FoamDims {
        FoamDims::new(self.usable_length, self.depth)
    }
}

/// Complete geometry of one sofa.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SofaGeometry {
    pub topology: SofaTopology,
    pub corner_side: Option<f64>,
    pub benches: Vec<BenchSegment>,
    pub corners: Vec<StructuralPiece>,
    pub backrests: Vec<StructuralPiece>,
    pub armrests: Vec<StructuralPiece>,
    pub bolsters: Vec<BolsterPlacement>,
}

impl SofaGeometry {
    /// Every structural piece: benches, corners, backrests, armrests.
    pub fn pieces(&self) -> Vec<StructuralPiece> {
        let benches = self.benches.iter().map(|b| StructuralPiece {
            kind: PieceKind::StraightBench,
            position: b.position,
            edge: b.edge,
            foam: Some(b.foam()),
            polygon: b.polygon.clone(),
        });
        benches
            .chain(self.corners.iter().cloned())
            .chain(self.backrests.iter().cloned())
            .chain(self.armrests.iter().cloned())
            .collect()
    }

    #[cfg(test)]
    pub fn bench(&self, position: Position) -> Option<&BenchSegment> {
        self.benches.iter().find(|b| b.position == position)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Model
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum End {
    Start,
    Finish,
}

/// A bench's extent along its own axis (x for the primary bench, y for wings).
#[derive(Debug, Clone, Copy)]
struct BenchSpan {
    position: Position,
    from: f64,
    to: f64,
}

#[derive(Debug, Clone, Default)]
pub struct GeometryModel {
    params: GeometryParams,
}

impl GeometryModel {
    pub fn new(params: GeometryParams) -> Self {
        Self { params }
    }

    pub fn corner_side(&self, depth: f64) -> f64 {
        depth + self.params.corner_offset_cm
    }

    /// Builds the full geometry. Fails on degenerate benches or impossible placements;
    /// never returns a partially built sofa.
    pub fn generate(&self, input: &GeometryInput) -> Result<SofaGeometry, GeometryError> {
        let edges = &input.edges;
        let c = self.corner_side(edges.depth);
        let topology = input.topology;

        let (spans, corner_junctions) = match topology {
            SofaTopology::Simple => simple_spans(edges),
            SofaTopology::LNoCorner => l_spans(edges, None)?,
            SofaTopology::LWithCorner => l_spans(edges, Some(c))?,
            SofaTopology::UNoCorner => u_spans(edges, 0, c)?,
            SofaTopology::UWithOneCorner => u_spans(edges, 1, c)?,
            SofaTopology::UWithTwoCorners => u_spans(edges, 2, c)?,
        };

        let mut benches = Vec::with_capacity(spans.len());
        for span in &spans {
            let usable = span.to - span.from;
            if usable <= 0.0 {
                return Err(GeometryError::DegenerateBench {
                    bench: span.position.to_string(),
                    length_cm: usable,
                });
            }
            let edge_length = match span.position {
                Position::Bottom => edges.primary,
                Position::Left => edges.left_edge()?,
                Position::Right => edges.right_edge()?,
            };
            benches.push(BenchSegment {
                position: span.position,
                edge: Edge::from(span.position),
                edge_length,
                usable_length: usable,
                depth: edges.depth,
                meridienne: None,
                polygon: self.bench_rect(edges, span.position, span.from, span.to),
            });
        }

        if let Some(m) = input.meridienne {
            self.place_meridienne(topology, edges, &spans, &mut benches, m)?;
        }

        let corners = corner_junctions
            .iter()
            .map(|junction| {
                let polygon = match junction {
                    Position::Right => Polygon::rect(edges.primary - c, 0.0, edges.primary, c),
                    _ => Polygon::rect(0.0, 0.0, c, c),
                };
                StructuralPiece {
                    kind: PieceKind::CornerBench,
                    position: *junction,
                    edge: Edge::Primary,
                    foam: Some(FoamDims::new(c, c)),
                    polygon,
                }
            })
            .collect();

        let mut backrests = Vec::new();
        for position in input.backrests.positions() {
            if !topology.backrest_positions().contains(&position) {
                return Err(GeometryError::InvalidPosition {
                    piece: "backrest",
                    position,
                    topology,
                });
            }
            backrests.push(StructuralPiece {
                kind: PieceKind::Backrest,
                position,
                edge: Edge::from(position),
                foam: None,
                polygon: self.backrest_rect(edges, position, &benches)?,
            });
        }

        let mut armrests = Vec::new();
        for position in input.armrests.positions() {
            let (span, end) = free_end(topology, position, &spans).ok_or(
                GeometryError::InvalidPosition {
                    piece: "armrest",
                    position,
                    topology,
                },
            )?;
            let t = self.params.armrest_thickness_cm;
            let (a0, a1) = match end {
                End::Start => (span.from - t, span.from),
                End::Finish => (span.to, span.to + t),
            };
            armrests.push(StructuralPiece {
                kind: PieceKind::Armrest,
                position,
                edge: Edge::from(span.position),
                foam: None,
                polygon: self.bench_rect(edges, span.position, a0, a1),
            });
        }

        let mut bolsters = Vec::new();
        for position in &input.bolsters {
            let (span, end) = free_end(topology, *position, &spans).ok_or(
                GeometryError::InvalidPosition {
                    piece: "bolster",
                    position: *position,
                    topology,
                },
            )?;
            let d = self.params.bolster_diameter_cm.min(span.to - span.from);
            let (a0, a1) = match end {
                End::Start => (span.from, span.from + d),
                End::Finish => (span.to - d, span.to),
            };
            bolsters.push(BolsterPlacement {
                position: *position,
                polygon: self.bench_rect(edges, span.position, a0, a1),
            });
        }

        Ok(SofaGeometry {
            topology,
            corner_side: (!corner_junctions.is_empty()).then_some(c),
            benches,
            corners,
            backrests,
            armrests,
            bolsters,
        })
    }

    fn place_meridienne(
        &self,
        topology: SofaTopology,
        edges: &EdgeLengths,
        spans: &[BenchSpan],
        benches: &mut [BenchSegment],
        m: Meridienne,
    ) -> Result<(), GeometryError> {
        let bench = topology
            .meridienne_bench(m.side)
            .ok_or(GeometryError::UnsupportedMeridienne(topology))?;
        // A simple sofa has one bench; the side picks which of its ends is extended.
        let end_position = match (topology, m.side) {
            (SofaTopology::Simple, MeridienneSide::Left) => Position::Left,
            (SofaTopology::Simple, MeridienneSide::Right) => Position::Right,
            _ => bench,
        };
        let (span, end) = free_end(topology, end_position, spans)
            .ok_or(GeometryError::UnsupportedMeridienne(topology))?;
        let bench_len = span.to - span.from;
        if m.length >= bench_len {
            return Err(GeometryError::MeridienneTooLong {
                bench: span.position.to_string(),
                meridienne_cm: m.length,
                bench_cm: bench_len,
            });
        }
        let (a0, a1) = match end {
            End::Start => (span.from, span.from + m.length),
            End::Finish => (span.to - m.length, span.to),
        };
        let zone = MeridienneZone {
            length: m.length,
            polygon: self.bench_rect(edges, span.position, a0, a1),
        };
        if let Some(bench) = benches.iter_mut().find(|b| b.position == span.position) {
            bench.meridienne = Some(zone);
        }
        Ok(())
    }

    /// Rectangle covering `[a0, a1]` along the bench axis and the seat depth across it.
    fn bench_rect(&self, edges: &EdgeLengths, position: Position, a0: f64, a1: f64) -> Polygon {
        let d = edges.depth;
        match position {
            Position::Bottom => Polygon::rect(a0, 0.0, a1, d),
            Position::Left => Polygon::rect(0.0, a0, d, a1),
            Position::Right => Polygon::rect(edges.primary - d, a0, edges.primary, a1),
        }
    }

    /// Backrest strip along the wall behind `position`, shortened where a meridienne sits.
    fn backrest_rect(
        &self,
        edges: &EdgeLengths,
        position: Position,
        benches: &[BenchSegment],
    ) -> Result<Polygon, GeometryError> {
        let t = self.params.backrest_thickness_cm;
        let wall_len = match position {
            Position::Bottom => edges.primary,
            Position::Left => edges.left_edge()?,
            Position::Right => edges.right_edge()?,
        };
        let (mut a0, mut a1) = (0.0, wall_len);
        if let Some(zone) = benches
            .iter()
            .find(|b| b.position == position)
            .and_then(|b| b.meridienne.as_ref())
        {
            if let Some((min, max)) = zone.polygon.bounds() {
                let (z0, z1) = match position {
                    Position::Bottom => (min.x, max.x),
                    _ => (min.y, max.y),
                };
                if z0 <= a0 + f64::EPSILON {
                    a0 = z1;
                } else {
                    a1 = z0;
                }
            }
        }
        Ok(match position {
            Position::Bottom => Polygon::rect(a0, -t, a1, 0.0),
            Position::Left => Polygon::rect(-t, a0, 0.0, a1),
            Position::Right => Polygon::rect(edges.primary, a0, edges.primary + t, a1),
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Per-topology bench spans
// ────────────────────────────────────────────────────────────────────────────

fn simple_spans(edges: &EdgeLengths) -> (Vec<BenchSpan>, Vec<Position>) {
    (
        vec![BenchSpan {
            position: Position::Bottom,
            from: 0.0,
            to: edges.primary,
        }],
        vec![],
    )
}

fn l_spans(
    edges: &EdgeLengths,
    corner: Option<f64>,
) -> Result<(Vec<BenchSpan>, Vec<Position>), GeometryError> {
    let tx = edges.primary;
    let ty = edges.left_edge()?;
    let d = edges.depth;
    let spans = match corner {
        Some(c) => vec![
            BenchSpan { position: Position::Left, from: c, to: ty },
            BenchSpan { position: Position::Bottom, from: c, to: tx },
        ],
        // the longer edge spans the junction
        None if tx >= ty => vec![
            BenchSpan { position: Position::Left, from: d, to: ty },
            BenchSpan { position: Position::Bottom, from: 0.0, to: tx },
        ],
        None => vec![
            BenchSpan { position: Position::Left, from: 0.0, to: ty },
            BenchSpan { position: Position::Bottom, from: d, to: tx },
        ],
    };
    let corners = if corner.is_some() { vec![Position::Left] } else { vec![] };
    Ok((spans, corners))
}

fn u_spans(
    edges: &EdgeLengths,
    corner_count: usize,
    c: f64,
) -> Result<(Vec<BenchSpan>, Vec<Position>), GeometryError> {
    let tx = edges.primary;
    let ty = edges.left_edge()?;
    let tz = edges.right_edge()?;
    let d = edges.depth;
    let left_corner = corner_count >= 1;
    let right_corner = corner_count >= 2;

    let spans = vec![
        BenchSpan {
            position: Position::Left,
            from: if left_corner { c } else { d },
            to: ty,
        },
        BenchSpan {
            position: Position::Bottom,
            from: if left_corner { c } else { 0.0 },
            to: if right_corner { tx - c } else { tx },
        },
        BenchSpan {
            position: Position::Right,
            from: if right_corner { c } else { d },
            to: tz,
        },
    ];
    let mut corners = Vec::new();
    if left_corner {
        corners.push(Position::Left);
    }
    if right_corner {
        corners.push(Position::Right);
    }
    Ok((spans, corners))
}

/// Locates the free bench end behind an armrest / bolster / meridienne position.
/// Returns `None` when the position does not exist on the topology.
fn free_end(topology: SofaTopology, position: Position, spans: &[BenchSpan]) -> Option<(BenchSpan, End)> {
    if !topology.armrest_positions().contains(&position) {
        return None;
    }
    let (bench, end) = match (topology, position) {
        (SofaTopology::Simple, Position::Left) => (Position::Bottom, End::Start),
        (SofaTopology::Simple, _) => (Position::Bottom, End::Finish),
        (_, p) => (p, End::Finish),
    };
    spans.iter().find(|s| s.position == bench).map(|s| (*s, end))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

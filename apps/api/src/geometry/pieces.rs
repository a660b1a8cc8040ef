//! Structural pieces and the polygons the diagram collaborator draws.
//!
//! Coordinates are centimetres, seen from above: x grows to the right along the
//! primary edge, y grows away from it. The outer seat corner of the primary edge
//! and the left wing sits at the origin.

use serde::{Deserialize, Serialize};

use crate::geometry::topology::Position;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Closed polygon, vertices in counter-clockwise order, last vertex not repeated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub points: Vec<Point>,
}

impl Polygon {
    /// Axis-aligned rectangle spanning `[x0, x1] × [y0, y1]`.
    pub fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        let (x0, x1) = (x0.min(x1), x0.max(x1));
        let (y0, y1) = (y0.min(y1), y0.max(y1));
        Self {
            points: vec![
                Point { x: x0, y: y0 },
                Point { x: x1, y: y0 },
                Point { x: x1, y: y1 },
                Point { x: x0, y: y1 },
            ],
        }
    }

    /// Shoelace area.
    #[cfg(test)]
    pub fn area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let twice: f64 = (0..n)
            .map(|i| {
                let a = self.points[i];
                let b = self.points[(i + 1) % n];
                a.x * b.y - b.x * a.y
            })
            .sum();
        twice.abs() / 2.0
    }

    pub fn bounds(&self) -> Option<(Point, Point)> {
        let first = self.points.first()?;
        let mut min = *first;
        let mut max = *first;
        for p in &self.points[1..] {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Some((min, max))
    }
}

/// Foam block dimensions: `length` along the bench, `width` is the seat depth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FoamDims {
    pub length: f64,
    pub width: f64,
}

impl FoamDims {
    pub fn new(length: f64, width: f64) -> Self {
        Self { length, width }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PieceKind {
    StraightBench,
    CornerBench,
    Backrest,
    Armrest,
}

/// Structural edge a piece belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Edge {
    /// tx
    Primary,
    /// ty
    Left,
    /// tz
    Right,
}

impl From<Position> for Edge {
    fn from(p: Position) -> Self {
        match p {
            Position::Left => Edge::Left,
            Position::Bottom => Edge::Primary,
            Position::Right => Edge::Right,
        }
    }
}

/// One physical support unit. Built once per layout computation, never mutated.
///
/// Corner benches use `Left` / `Right` for the junction they occupy
/// (primary × left wing, primary × right wing).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralPiece {
    pub kind: PieceKind,
    pub position: Position,
    pub edge: Edge,
    /// Foam carried by the piece; benches only.
    pub foam: Option<FoamDims>,
    pub polygon: Polygon,
}

/// Meridienne zone at the free end of a bench.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeridienneZone {
    pub length: f64,
    pub polygon: Polygon,
}

/// Bolster laid at a bench end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BolsterPlacement {
    pub position: Position,
    pub polygon: Polygon,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_normalizes_corners() {
        let poly = Polygon::rect(10.0, 5.0, 0.0, 0.0);
        let (min, max) = poly.bounds().unwrap();
        assert_eq!((min.x, min.y), (0.0, 0.0));
        assert_eq!((max.x, max.y), (10.0, 5.0));
    }

    #[test]
    fn test_rect_area() {
        assert!((Polygon::rect(0.0, 0.0, 280.0, 70.0).area() - 19_600.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_polygon_has_zero_area() {
        let poly = Polygon {
            points: vec![Point { x: 0.0, y: 0.0 }, Point { x: 1.0, y: 1.0 }],
        };
        assert_eq!(poly.area(), 0.0);
        assert!(Polygon { points: vec![] }.bounds().is_none());
    }

    #[test]
    fn test_edge_from_position() {
        assert_eq!(Edge::from(Position::Bottom), Edge::Primary);
        assert_eq!(Edge::from(Position::Left), Edge::Left);
        assert_eq!(Edge::from(Position::Right), Edge::Right);
    }
}

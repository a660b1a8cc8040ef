//! Sofa topologies and the structural positions each one exposes.
//!
//! A topology fixes how many straight benches and corner benches exist and which
//! armrest / backrest / meridienne positions are structurally valid. Everything
//! here is a small pure function keyed by the variant.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::QuoteError;

// ────────────────────────────────────────────────────────────────────────────
// Positions
// ────────────────────────────────────────────────────────────────────────────

/// Position tag of a piece, seen from above with the primary edge at the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Position {
    Left,
    Bottom,
    Right,
}

impl Position {
    pub fn as_str(&self) -> &'static str {
        match self {
            Position::Left => "left",
            Position::Bottom => "bottom",
            Position::Right => "right",
        }
    }

    /// French label used in ledger lines and diagram captions.
    pub fn label_fr(&self) -> &'static str {
        match self {
            Position::Left => "gauche",
            Position::Bottom => "bas",
            Position::Right => "droite",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-position booleans as they arrive from the configuration form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sides {
    pub left: bool,
    pub bottom: bool,
    pub right: bool,
}

impl Sides {
    pub const NONE: Sides = Sides {
        left: false,
        bottom: false,
        right: false,
    };

    pub fn is_set(&self, position: Position) -> bool {
        match position {
            Position::Left => self.left,
            Position::Bottom => self.bottom,
            Position::Right => self.right,
        }
    }

    /// Enabled positions in canonical order (left, bottom, right).
    pub fn positions(&self) -> Vec<Position> {
        [Position::Left, Position::Bottom, Position::Right]
            .into_iter()
            .filter(|p| self.is_set(*p))
            .collect()
    }

    pub fn count(&self) -> usize {
        self.positions().len()
    }
}

/// Which end of the sofa carries the chaise-longue extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeridienneSide {
    Left,
    Right,
}

// ────────────────────────────────────────────────────────────────────────────
// Topology
// ────────────────────────────────────────────────────────────────────────────

/// The six supported sofa shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SofaTopology {
    Simple,
    LNoCorner,
    LWithCorner,
    UNoCorner,
    UWithOneCorner,
    UWithTwoCorners,
}

impl SofaTopology {
    pub const ALL: [SofaTopology; 6] = [
        SofaTopology::Simple,
        SofaTopology::LNoCorner,
        SofaTopology::LWithCorner,
        SofaTopology::UNoCorner,
        SofaTopology::UWithOneCorner,
        SofaTopology::UWithTwoCorners,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            SofaTopology::Simple => "simple",
            SofaTopology::LNoCorner => "l_no_corner",
            SofaTopology::LWithCorner => "l_with_corner",
            SofaTopology::UNoCorner => "u_no_corner",
            SofaTopology::UWithOneCorner => "u_with_one_corner",
            SofaTopology::UWithTwoCorners => "u_with_two_corners",
        }
    }

    /// Display label offered by the configuration form.
    pub fn label(&self) -> &'static str {
        match self {
            SofaTopology::Simple => "Simple (S)",
            SofaTopology::LNoCorner => "L - Sans Angle",
            SofaTopology::LWithCorner => "L - Avec Angle (LF)",
            SofaTopology::UNoCorner => "U - Sans Angle",
            SofaTopology::UWithOneCorner => "U - 1 Angle (U1F)",
            SofaTopology::UWithTwoCorners => "U - 2 Angles (U2F)",
        }
    }

    pub fn straight_bench_count(&self) -> usize {
        match self {
            SofaTopology::Simple => 1,
            SofaTopology::LNoCorner | SofaTopology::LWithCorner => 2,
            SofaTopology::UNoCorner
            | SofaTopology::UWithOneCorner
            | SofaTopology::UWithTwoCorners => 3,
        }
    }

    pub fn corner_count(&self) -> usize {
        match self {
            SofaTopology::LWithCorner | SofaTopology::UWithOneCorner => 1,
            SofaTopology::UWithTwoCorners => 2,
            _ => 0,
        }
    }

    pub fn is_l_shape(&self) -> bool {
        matches!(self, SofaTopology::LNoCorner | SofaTopology::LWithCorner)
    }

    pub fn is_u_shape(&self) -> bool {
        matches!(
            self,
            SofaTopology::UNoCorner | SofaTopology::UWithOneCorner | SofaTopology::UWithTwoCorners
        )
    }

    /// Edges the topology needs, in (primary, left, right) naming.
    pub fn required_edges(&self) -> &'static [&'static str] {
        match self {
            t if t.is_u_shape() => &["tx", "ty", "tz"],
            t if t.is_l_shape() => &["tx", "ty"],
            _ => &["tx"],
        }
    }

    /// Armrest positions that exist on this shape.
    /// U shapes never have a bottom armrest; L shapes never have a right one.
    pub fn armrest_positions(&self) -> &'static [Position] {
        match self {
            t if t.is_l_shape() => &[Position::Left, Position::Bottom],
            _ => &[Position::Left, Position::Right],
        }
    }

    pub fn backrest_positions(&self) -> &'static [Position] {
        match self {
            t if t.is_u_shape() => &[Position::Left, Position::Bottom, Position::Right],
            t if t.is_l_shape() => &[Position::Left, Position::Bottom],
            _ => &[Position::Bottom],
        }
    }

    pub fn supports_meridienne(&self) -> bool {
        !matches!(self, SofaTopology::UNoCorner)
    }

    /// Straight bench that carries a meridienne placed on `side`.
    pub fn meridienne_bench(&self, side: MeridienneSide) -> Option<Position> {
        match (self, side) {
            (SofaTopology::UNoCorner, _) => None,
            (SofaTopology::Simple, _) => Some(Position::Bottom),
            (t, MeridienneSide::Right) if t.is_l_shape() => Some(Position::Bottom),
            (_, MeridienneSide::Left) => Some(Position::Left),
            (_, MeridienneSide::Right) => Some(Position::Right),
        }
    }
}

impl fmt::Display for SofaTopology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SofaTopology {
    type Err = QuoteError;

    /// Accepts canonical keys as well as the form's display labels, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim().to_lowercase();
        if let Some(topology) = SofaTopology::ALL.iter().find(|tp| tp.key() == t) {
            return Ok(*topology);
        }
        let topology = if t.starts_with("simple") {
            SofaTopology::Simple
        } else if t.starts_with("l - sans angle") || t == "lnf" {
            SofaTopology::LNoCorner
        } else if t.starts_with("l - avec angle") || t == "lf" {
            SofaTopology::LWithCorner
        } else if t.starts_with("u - sans angle") || t == "u" {
            SofaTopology::UNoCorner
        } else if t.starts_with("u - 1 angle") || t == "u1f" {
            SofaTopology::UWithOneCorner
        } else if t.starts_with("u - 2 angles") || t == "u2f" {
            SofaTopology::UWithTwoCorners
        } else {
            return Err(QuoteError::UnknownTopology(s.to_string()));
        };
        Ok(topology)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonical_keys() {
        for topology in SofaTopology::ALL {
            assert_eq!(topology.key().parse::<SofaTopology>().unwrap(), topology);
        }
    }

    #[test]
    fn test_parse_form_labels() {
        for topology in SofaTopology::ALL {
            assert_eq!(topology.label().parse::<SofaTopology>().unwrap(), topology);
        }
        assert_eq!(
            "  u - 2 ANGLES (U2F) ".parse::<SofaTopology>().unwrap(),
            SofaTopology::UWithTwoCorners
        );
    }

    #[test]
    fn test_parse_unknown_topology_is_rejected() {
        let err = "Z - Zigzag".parse::<SofaTopology>().unwrap_err();
        assert!(matches!(err, QuoteError::UnknownTopology(ref s) if s == "Z - Zigzag"));
    }

    #[test]
    fn test_piece_counts_per_topology() {
        let expected = [(1, 0), (2, 0), (2, 1), (3, 0), (3, 1), (3, 2)];
        for (topology, (benches, corners)) in SofaTopology::ALL.iter().zip(expected) {
            assert_eq!(topology.straight_bench_count(), benches, "{topology}");
            assert_eq!(topology.corner_count(), corners, "{topology}");
        }
    }

    #[test]
    fn test_u_shapes_never_expose_bottom_armrest() {
        for topology in SofaTopology::ALL.iter().filter(|t| t.is_u_shape()) {
            assert!(!topology.armrest_positions().contains(&Position::Bottom));
        }
    }

    #[test]
    fn test_l_shapes_never_expose_right_armrest() {
        for topology in SofaTopology::ALL.iter().filter(|t| t.is_l_shape()) {
            assert!(!topology.armrest_positions().contains(&Position::Right));
            assert!(!topology.backrest_positions().contains(&Position::Right));
        }
    }

    #[test]
    fn test_meridienne_bench_mapping() {
        assert_eq!(
            SofaTopology::LWithCorner.meridienne_bench(MeridienneSide::Right),
            Some(Position::Bottom)
        );
        assert_eq!(
            SofaTopology::UWithTwoCorners.meridienne_bench(MeridienneSide::Left),
            Some(Position::Left)
        );
        assert_eq!(SofaTopology::UNoCorner.meridienne_bench(MeridienneSide::Left), None);
        assert!(!SofaTopology::UNoCorner.supports_meridienne());
    }

    #[test]
    fn test_sides_positions_are_ordered() {
        let sides = Sides {
            left: true,
            bottom: false,
            right: true,
        };
        assert_eq!(sides.positions(), vec![Position::Left, Position::Right]);
        assert_eq!(sides.count(), 2);
        assert_eq!(Sides::NONE.count(), 0);
    }
}

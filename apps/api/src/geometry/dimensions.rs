//! Edge lengths and their admissible ranges.

use serde::{Deserialize, Serialize};

use crate::errors::QuoteError;
use crate::geometry::topology::SofaTopology;
use crate::geometry::GeometryError;

/// Raw dimensions as typed into the form. Any field may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawDimensions {
    pub tx: Option<f64>,
    pub ty: Option<f64>,
    pub tz: Option<f64>,
    #[serde(alias = "profondeur")]
    pub depth: Option<f64>,
}

/// Min/max bounds for edges and seat depth, in centimetres.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionLimits {
    pub edge_min_cm: f64,
    pub edge_max_cm: f64,
    pub depth_min_cm: f64,
    pub depth_max_cm: f64,
}

impl Default for DimensionLimits {
    fn default() -> Self {
        Self {
            edge_min_cm: 100.0,
            edge_max_cm: 600.0,
            depth_min_cm: 50.0,
            depth_max_cm: 120.0,
        }
    }
}

/// Validated edge lengths for one topology.
///
/// `primary` is the bottom edge (tx), `left` the left wing (ty), `right` the right
/// wing (tz). Wings the topology does not use are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EdgeLengths {
    pub primary: f64,
    pub left: Option<f64>,
    pub right: Option<f64>,
    pub depth: f64,
}

impl EdgeLengths {
    /// Checks presence and ranges of every edge the topology requires.
    ///
    /// Edges the topology does not use are dropped even if the form sent them.
    pub fn resolve(
        topology: SofaTopology,
        raw: &RawDimensions,
        limits: &DimensionLimits,
    ) -> Result<Self, QuoteError> {
        let required = topology.required_edges();
        let pick = |name: &'static str, value: Option<f64>| -> Result<Option<f64>, QuoteError> {
            if !required.contains(&name) {
                return Ok(None);
            }
            let v = value.ok_or_else(|| QuoteError::MissingDimension {
                topology: topology.key().to_string(),
                dimension: name,
            })?;
            check_range(name, v, limits.edge_min_cm, limits.edge_max_cm)?;
            Ok(Some(v))
        };

        let primary = pick("tx", raw.tx)?.ok_or_else(|| QuoteError::MissingDimension {
            topology: topology.key().to_string(),
            dimension: "tx",
        })?;
        let left = pick("ty", raw.ty)?;
        let right = pick("tz", raw.tz)?;

        let depth = raw.depth.ok_or_else(|| QuoteError::MissingDimension {
            topology: topology.key().to_string(),
            dimension: "depth",
        })?;
        check_range("depth", depth, limits.depth_min_cm, limits.depth_max_cm)?;

        Ok(Self {
            primary,
            left,
            right,
            depth,
        })
    }

    pub fn left_edge(&self) -> Result<f64, GeometryError> {
        self.left.ok_or(GeometryError::MissingEdge("ty"))
    }

    pub fn right_edge(&self) -> Result<f64, GeometryError> {
        self.right.ok_or(GeometryError::MissingEdge("tz"))
    }
}

fn check_range(name: &str, value: f64, min: f64, max: f64) -> Result<(), QuoteError> {
    if !value.is_finite() {
        return Err(QuoteError::invalid(format!("{name} must be a finite number")));
    }
    if value < min || value > max {
        return Err(QuoteError::invalid(format!(
            "{name} = {value} cm is outside the allowed range {min}–{max} cm"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(tx: Option<f64>, ty: Option<f64>, tz: Option<f64>, depth: Option<f64>) -> RawDimensions {
        RawDimensions { tx, ty, tz, depth }
    }

    #[test]
    fn test_simple_drops_unused_wings() {
        let edges = EdgeLengths::resolve(
            SofaTopology::Simple,
            &raw(Some(280.0), Some(250.0), None, Some(70.0)),
            &DimensionLimits::default(),
        )
        .unwrap();
        assert_eq!(edges.primary, 280.0);
        assert_eq!(edges.left, None);
        assert_eq!(edges.depth, 70.0);
    }

    #[test]
    fn test_l_shape_requires_left_edge() {
        let err = EdgeLengths::resolve(
            SofaTopology::LWithCorner,
            &raw(Some(350.0), None, None, Some(70.0)),
            &DimensionLimits::default(),
        )
        .unwrap_err();
        assert!(matches!(err, QuoteError::MissingDimension { dimension: "ty", .. }));
    }

    #[test]
    fn test_u_shape_requires_right_edge() {
        let err = EdgeLengths::resolve(
            SofaTopology::UWithTwoCorners,
            &raw(Some(450.0), Some(300.0), None, Some(70.0)),
            &DimensionLimits::default(),
        )
        .unwrap_err();
        assert!(matches!(err, QuoteError::MissingDimension { dimension: "tz", .. }));
    }

    #[test]
    fn test_missing_depth_is_reported() {
        let err = EdgeLengths::resolve(
            SofaTopology::Simple,
            &raw(Some(280.0), None, None, None),
            &DimensionLimits::default(),
        )
        .unwrap_err();
        assert!(matches!(err, QuoteError::MissingDimension { dimension: "depth", .. }));
    }

    #[test]
    fn test_out_of_range_edge_is_invalid_input() {
        let err = EdgeLengths::resolve(
            SofaTopology::Simple,
            &raw(Some(650.0), None, None, Some(70.0)),
            &DimensionLimits::default(),
        )
        .unwrap_err();
        assert!(matches!(err, QuoteError::InvalidQuoteInput(_)));
    }

    #[test]
    fn test_negative_and_nan_are_invalid_input() {
        let limits = DimensionLimits::default();
        for bad in [-280.0, f64::NAN, f64::INFINITY] {
            let err = EdgeLengths::resolve(
                SofaTopology::Simple,
                &raw(Some(bad), None, None, Some(70.0)),
                &limits,
            )
            .unwrap_err();
            assert!(matches!(err, QuoteError::InvalidQuoteInput(_)), "{bad}");
        }
    }

    #[test]
    fn test_depth_bounds_are_inclusive() {
        let limits = DimensionLimits::default();
        for depth in [50.0, 120.0] {
            assert!(EdgeLengths::resolve(
                SofaTopology::Simple,
                &raw(Some(200.0), None, None, Some(depth)),
                &limits
            )
            .is_ok());
        }
        assert!(EdgeLengths::resolve(
            SofaTopology::Simple,
            &raw(Some(200.0), None, None, Some(121.0)),
            &limits
        )
        .is_err());
    }

    #[test]
    fn test_raw_dimensions_accept_french_depth_alias() {
        let raw: RawDimensions =
            serde_json::from_str(r#"{"tx": 280, "profondeur": 70}"#).unwrap();
        assert_eq!(raw.depth, Some(70.0));
        assert_eq!(raw.ty, None);
    }
}

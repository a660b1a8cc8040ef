// Geometry model: topologies, edge lengths, and the structural pieces they produce.
// Pure and synchronous; every call builds a fresh SofaGeometry.

pub mod dimensions;
pub mod model;
pub mod pieces;
pub mod topology;

use thiserror::Error;

pub use dimensions::{DimensionLimits, EdgeLengths, RawDimensions};
pub use model::{GeometryInput, GeometryModel, GeometryParams, Meridienne, SofaGeometry};
pub use pieces::{FoamDims, PieceKind, StructuralPiece};
pub use topology::{MeridienneSide, Position, Sides, SofaTopology};

/// Internal geometry failures. The layout engine wraps these into
/// `QuoteError::LayoutComputation`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("edge '{0}' is required but was not provided")]
    MissingEdge(&'static str),

    #[error("{bench} bench has no usable length ({length_cm} cm) once corners are deducted")]
    DegenerateBench { bench: String, length_cm: f64 },

    #[error("meridienne of {meridienne_cm} cm does not fit on the {bench} bench ({bench_cm} cm)")]
    MeridienneTooLong {
        bench: String,
        meridienne_cm: f64,
        bench_cm: f64,
    },

    #[error("topology {0} has no meridienne position")]
    UnsupportedMeridienne(SofaTopology),

    #[error("{piece} position '{position}' does not exist on topology {topology}")]
    InvalidPosition {
        piece: &'static str,
        position: Position,
        topology: SofaTopology,
    },
}

// Layout engine: geometry model + cushion packer → LayoutReport.
// Pure and synchronous; the pricing engine only ever sees a complete report.

pub mod engine;
pub mod report;

pub use engine::{LayoutEngine, LayoutRequest, MERIDIENNE_MAX_CM, MERIDIENNE_MIN_CM};
pub use report::LayoutReport;

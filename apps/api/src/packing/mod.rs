// Cushion packer: seat-cushion sizing and counts per straight bench.
// Corner benches carry no seat cushions and never reach the packer.

pub mod packer;
pub mod sizes;

pub use packer::{
    BenchPacking, BenchSlot, CushionCounts, CushionPacker, CushionSpec, PackerConfig,
};
pub use sizes::{CushionBucket, CushionSize, CushionWidths, SizingPolicy};

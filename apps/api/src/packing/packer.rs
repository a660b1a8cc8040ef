//! Cushion packer: turns bench usable lengths into seat-cushion counts.
//!
//! # Rules
//! - Fixed size S: `count = max(1, floor(usable / S))`.
//! - Auto: one standard size (65 / 80 / 90) for the whole sofa. A size is valid when,
//!   on every bench, the real cushion width `usable / count` stays within the
//!   tolerance of its nominal width. Among valid sizes the smallest total count wins;
//!   ties go to the larger size. When no size is valid the total-length heuristic
//!   decides (< 200 cm → 65, < 350 cm → 80, otherwise 90).
//! - Range: same criterion bench by bench, limited to the sizes inside the range.
//!   A bench with no valid size takes the size whose real width deviates least.
//! - A bench carrying a meridienne loses one cushion, never going below one.

use serde::{Deserialize, Serialize};

use crate::geometry::Position;
use crate::packing::sizes::{CushionBucket, CushionSize, CushionWidths, SizingPolicy};

/// Packer tunables.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PackerConfig {
    pub widths: CushionWidths,
    /// Max distance between real and nominal cushion width in auto / range mode.
    pub auto_tolerance_cm: f64,
}

impl Default for PackerConfig {
    fn default() -> Self {
        Self {
            widths: CushionWidths::default(),
            auto_tolerance_cm: 10.0,
        }
    }
}

/// One bench as seen by the packer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BenchSlot {
    pub position: Position,
    pub usable_length: f64,
    pub has_meridienne: bool,
}

/// Cushion size and count for one bench.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CushionSpec {
    pub size: CushionSize,
    pub size_bucket: CushionBucket,
    pub count: u32,
}

/// Packing result for one bench.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BenchPacking {
    pub position: Position,
    pub usable_length: f64,
    pub cushions: CushionSpec,
    /// Real width of each cushion once the bench is divided.
    pub cushion_width: f64,
    pub meridienne_adjusted: bool,
}

/// Cushion totals per price bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CushionCounts {
    pub s65: u32,
    pub s80: u32,
    pub s90: u32,
    pub valise: u32,
}

impl CushionCounts {
    pub fn from_packings(packings: &[BenchPacking]) -> Self {
        let mut counts = CushionCounts::default();
        for p in packings {
            counts.add(p.cushions.size_bucket, p.cushions.count);
        }
        counts
    }

    pub fn add(&mut self, bucket: CushionBucket, n: u32) {
        match bucket {
            CushionBucket::S65 => self.s65 += n,
            CushionBucket::S80 => self.s80 += n,
            CushionBucket::S90 => self.s90 += n,
            CushionBucket::Suitcase => self.valise += n,
        }
    }

    pub fn get(&self, bucket: CushionBucket) -> u32 {
        match bucket {
            CushionBucket::S65 => self.s65,
            CushionBucket::S80 => self.s80,
            CushionBucket::S90 => self.s90,
            CushionBucket::Suitcase => self.valise,
        }
    }

    pub fn total(&self) -> u32 {
        self.s65 + self.s80 + self.s90 + self.valise
    }
}

#[derive(Debug, Clone, Default)]
pub struct CushionPacker {
    config: PackerConfig,
}

impl CushionPacker {
    pub fn new(config: PackerConfig) -> Self {
        Self { config }
    }

    /// Packs every bench under `policy`. Total: always returns one entry per slot,
    /// each with at least one cushion.
    pub fn pack(&self, benches: &[BenchSlot], policy: SizingPolicy) -> Vec<BenchPacking> {
        let sizes: Vec<CushionSize> = match policy {
            SizingPolicy::Fixed(size) => vec![size; benches.len()],
            SizingPolicy::Auto => {
                let lengths: Vec<f64> = benches.iter().map(|b| b.usable_length).collect();
                vec![self.auto_size(&lengths); benches.len()]
            }
            SizingPolicy::Range { min_cm, max_cm } => {
                let candidates = SizingPolicy::range_candidates(min_cm, max_cm);
                benches
                    .iter()
                    .map(|b| self.range_size(b.usable_length, &candidates))
                    .collect()
            }
        };

        benches
            .iter()
            .zip(sizes)
            .map(|(bench, size)| {
                let mut count = self.count_for(bench.usable_length, size);
                if bench.has_meridienne {
                    count = count.saturating_sub(1).max(1);
                }
                let cushion_width = if bench.usable_length > 0.0 {
                    bench.usable_length / count as f64
                } else {
                    0.0
                };
                tracing::debug!(
                    "Packed {} bench ({:.1} cm): {} × {}",
                    bench.position,
                    bench.usable_length,
                    count,
                    size.label()
                );
                BenchPacking {
                    position: bench.position,
                    usable_length: bench.usable_length,
                    cushions: CushionSpec {
                        size,
                        size_bucket: size.bucket(),
                        count,
                    },
                    cushion_width,
                    meridienne_adjusted: bench.has_meridienne,
                }
            })
            .collect()
    }

    /// Fixed-size count: `max(1, floor(usable / nominal))`. Non-positive lengths get one.
    pub fn count_for(&self, usable: f64, size: CushionSize) -> u32 {
        let nominal = self.config.widths.nominal(size);
        if usable.is_nan() || usable <= 0.0 || nominal <= 0.0 {
            return 1;
        }
        ((usable / nominal).floor() as u32).max(1)
    }

    /// Single standard size for the whole sofa.
    pub fn auto_size(&self, lengths: &[f64]) -> CushionSize {
        let mut best: Option<(u32, CushionSize)> = None;
        for size in CushionSize::STANDARD {
            if !lengths.iter().all(|l| self.fits(*l, size)) {
                continue;
            }
            let total: u32 = lengths.iter().map(|l| self.count_for(*l, size)).sum();
            // STANDARD is ascending, so `<=` lets the larger size win ties
            if best.map_or(true, |(t, _)| total <= t) {
                best = Some((total, size));
            }
        }
        match best {
            Some((_, size)) => size,
            None => heuristic_size(lengths.iter().sum()),
        }
    }

    fn range_size(&self, usable: f64, candidates: &[CushionSize]) -> CushionSize {
        let mut best: Option<(u32, CushionSize)> = None;
        for size in candidates.iter().copied().filter(|s| self.fits(usable, *s)) {
            let count = self.count_for(usable, size);
            if best.map_or(true, |(c, _)| count <= c) {
                best = Some((count, size));
            }
        }
        if let Some((_, size)) = best {
            return size;
        }
        let mut nearest: Option<(f64, CushionSize)> = None;
        for size in candidates.iter().copied() {
            let dev = self.deviation(usable, size);
            if nearest.map_or(true, |(d, _)| dev <= d) {
                nearest = Some((dev, size));
            }
        }
        nearest.map(|(_, s)| s).unwrap_or_else(|| heuristic_size(usable))
    }

    fn deviation(&self, usable: f64, size: CushionSize) -> f64 {
        let count = self.count_for(usable, size) as f64;
        (usable / count - self.config.widths.nominal(size)).abs()
    }

    fn fits(&self, usable: f64, size: CushionSize) -> bool {
        usable > 0.0 && self.deviation(usable, size) <= self.config.auto_tolerance_cm
    }
}

/// Fallback when no size packs cleanly, keyed on the total straight length.
pub fn heuristic_size(total_length: f64) -> CushionSize {
    if total_length < 200.0 {
        CushionSize::S65
    } else if total_length < 350.0 {
        CushionSize::S80
    } else {
        CushionSize::S90
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

//! Rate tables for the sale and cost ledgers.
//!
//! One canonical table, compiled in and read-only after start-up. The sale side is
//! tax-inclusive; the cost side is tax-exclusive.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

// ────────────────────────────────────────────────────────────────────────────
// Foam types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FoamType {
    #[default]
    D25,
    D30,
    HR35,
    HR45,
}

impl FoamType {
    pub const ALL: [FoamType; 4] = [FoamType::D25, FoamType::D30, FoamType::HR35, FoamType::HR45];

    pub fn key(&self) -> &'static str {
        match self {
            FoamType::D25 => "D25",
            FoamType::D30 => "D30",
            FoamType::HR35 => "HR35",
            FoamType::HR45 => "HR45",
        }
    }

    /// Density in kg/m³, used by the sale foam formula.
    pub fn density(&self) -> f64 {
        match self {
            FoamType::D25 => 25.0,
            FoamType::D30 => 30.0,
            FoamType::HR35 => 35.0,
            FoamType::HR45 => 45.0,
        }
    }

    /// Parses a selection key. Unknown keys resolve to D25.
    pub fn from_key(key: &str) -> FoamType {
        key.parse().unwrap_or_else(|_| {
            tracing::debug!("Unknown foam type '{key}', falling back to D25");
            FoamType::D25
        })
    }

    fn index(&self) -> usize {
        match self {
            FoamType::D25 => 0,
            FoamType::D30 => 1,
            FoamType::HR35 => 2,
            FoamType::HR45 => 3,
        }
    }
}

impl fmt::Display for FoamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FoamType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_uppercase();
        FoamType::ALL
            .into_iter()
            .find(|f| f.key() == key)
            .ok_or_else(|| format!("unknown foam type '{s}'"))
    }
}

impl Serialize for FoamType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl<'de> Deserialize<'de> for FoamType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        Ok(FoamType::from_key(&key))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Sale rates
// ────────────────────────────────────────────────────────────────────────────

/// Tax-inclusive catalog prices, in euros.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaleRates {
    /// `foam = L × W × thickness × density × foam_k / 1e6`
    pub foam_k: f64,
    pub fabric_wide_per_m: f64,
    pub fabric_narrow_per_m: f64,
    /// Wide fabric applies when `width + 2 × thickness` exceeds this.
    pub fabric_wide_threshold_cm: f64,
    pub straight_bench: f64,
    pub corner_bench: f64,
    pub backrest: f64,
    pub armrest: f64,
    pub cushion_65: f64,
    pub cushion_80: f64,
    pub cushion_90: f64,
    pub cushion_suitcase: f64,
    pub decorative_cushion: f64,
    pub bolster: f64,
    pub mattress_topper: f64,
    pub rounded_corner: f64,
    pub vat_rate: f64,
}

impl Default for SaleRates {
    fn default() -> Self {
        Self {
            foam_k: 23.0,
            fabric_wide_per_m: 105.0,
            fabric_narrow_per_m: 74.0,
            fabric_wide_threshold_cm: 140.0,
            straight_bench: 250.0,
            corner_bench: 250.0,
            backrest: 250.0,
            armrest: 200.0,
            cushion_65: 40.0,
            cushion_80: 50.0,
            cushion_90: 55.0,
            cushion_suitcase: 75.0,
            decorative_cushion: 15.0,
            bolster: 30.0,
            mattress_topper: 80.0,
            rounded_corner: 20.0,
            vat_rate: 0.20,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Cost rates
// ────────────────────────────────────────────────────────────────────────────

/// A cost written as `base + count × rate` (workshop supply plus labour units).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CompositeCost {
    pub base: f64,
    pub count: f64,
    pub rate: f64,
}

impl CompositeCost {
    pub const fn new(base: f64, count: f64, rate: f64) -> Self {
        Self { base, count, rate }
    }

    pub fn value(&self) -> f64 {
        self.base + self.count * self.rate
    }

    pub fn formula(&self) -> String {
        if self.count == 1.0 {
            format!("{}+{}", fmt_num(self.base), fmt_num(self.rate))
        } else {
            format!("{}+{}*{}", fmt_num(self.base), fmt_num(self.count), fmt_num(self.rate))
        }
    }
}

/// Fixed-price foam block: bypasses the foam and fabric formulas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StandardSize {
    pub length_cm: i64,
    pub width_cm: i64,
    /// Indexed D25, D30, HR35, HR45.
    pub foam: [f64; 4],
    pub fabric: f64,
}

impl StandardSize {
    pub fn foam_price(&self, foam: FoamType) -> f64 {
        self.foam[foam.index()]
    }
}

/// Tax-exclusive cost-of-goods rates, in euros.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostRates {
    /// € per m³ of foam, indexed D25, D30, HR35, HR45.
    pub foam_coefficient: [f64; 4],
    pub fabric_narrow_per_m: f64,
    pub fabric_wide_per_m: f64,
    pub fabric_supplement: f64,
    /// Narrow fabric applies while `seam + width + 2 × thickness` stays at or under the threshold.
    pub fabric_seam_cm: f64,
    pub fabric_narrow_max_cm: f64,
    pub straight_bench_short: CompositeCost,
    pub straight_bench_long: CompositeCost,
    pub short_bench_max_cm: f64,
    pub corner_bench: CompositeCost,
    pub backrest: CompositeCost,
    pub armrest: f64,
    pub cushion_65: f64,
    pub cushion_80: f64,
    pub cushion_90: f64,
    pub cushion_suitcase: f64,
    pub decorative_cushion: f64,
    pub bolster: f64,
    pub mattress_topper: f64,
    pub rounded_corner: f64,
    pub delivery: f64,
    /// Standard sizes only apply at this exact thickness.
    pub standard_thickness_cm: f64,
    pub standard_sizes: Vec<StandardSize>,
}

impl CostRates {
    pub fn foam_coefficient(&self, foam: FoamType) -> f64 {
        self.foam_coefficient[foam.index()]
    }

    pub fn standard_size(&self, length: f64, width: f64, thickness: f64) -> Option<&StandardSize> {
        if thickness != self.standard_thickness_cm {
            return None;
        }
        let key = (length.round() as i64, width.round() as i64);
        self.standard_sizes
            .iter()
            .find(|s| (s.length_cm, s.width_cm) == key)
    }
}

impl Default for CostRates {
    fn default() -> Self {
        Self {
            foam_coefficient: [157.5, 188.0, 192.0, 245.0],
            fabric_narrow_per_m: 11.2,
            fabric_wide_per_m: 16.16,
            fabric_supplement: 15.0,
            fabric_seam_cm: 2.0,
            fabric_narrow_max_cm: 140.0,
            straight_bench_short: CompositeCost::new(93.0, 8.0, 2.5),
            straight_bench_long: CompositeCost::new(98.5, 1.0, 22.5),
            short_bench_max_cm: 200.0,
            corner_bench: CompositeCost::new(93.0, 8.0, 1.4),
            backrest: CompositeCost::new(132.0, 8.0, 5.5),
            armrest: 73.0,
            cushion_65: 14.0,
            cushion_80: 17.0,
            cushion_90: 17.5,
            cushion_suitcase: 25.0,
            decorative_cushion: 9.5,
            bolster: 11.6,
            mattress_topper: 31.0,
            rounded_corner: 6.05,
            delivery: 100.0,
            standard_thickness_cm: 25.0,
            standard_sizes: vec![
                StandardSize { length_cm: 200, width_cm: 70, foam: [42.55, 51.0, 65.0, 84.0], fabric: 34.40 },
                StandardSize { length_cm: 200, width_cm: 80, foam: [63.0, 75.2, 76.2, 98.0], fabric: 34.40 },
                StandardSize { length_cm: 90, width_cm: 90, foam: [31.9, 38.1, 38.9, 49.6], fabric: 28.40 },
                StandardSize { length_cm: 100, width_cm: 100, foam: [39.3, 47.0, 48.0, 61.2], fabric: 28.40 },
            ],
        }
    }
}

/// Both tables, shared read-only by the pricing engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RateTable {
    pub sale: SaleRates,
    pub cost: CostRates,
}

/// Formats a number for ledger formulas: integers without decimals, others trimmed.
pub fn fmt_num(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        let s = format!("{value:.2}");
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_foam_falls_back_to_d25() {
        assert_eq!(FoamType::from_key("HR35"), FoamType::HR35);
        assert_eq!(FoamType::from_key("hr45"), FoamType::HR45);
        assert_eq!(FoamType::from_key("memory"), FoamType::D25);
        let f: FoamType = serde_json::from_str("\"latex\"").unwrap();
        assert_eq!(f, FoamType::D25);
    }

    #[test]
    fn test_composite_cost_values_and_formulas() {
        let cost = CostRates::default();
        assert!((cost.straight_bench_short.value() - 113.0).abs() < 1e-9);
        assert!((cost.straight_bench_long.value() - 121.0).abs() < 1e-9);
        assert!((cost.corner_bench.value() - 104.2).abs() < 1e-9);
        assert!((cost.backrest.value() - 176.0).abs() < 1e-9);
        assert_eq!(cost.straight_bench_short.formula(), "93+8*2.5");
        assert_eq!(cost.straight_bench_long.formula(), "98.5+22.5");
    }

    #[test]
    fn test_standard_size_requires_exact_thickness() {
        let cost = CostRates::default();
        let std = cost.standard_size(90.0, 90.0, 25.0).unwrap();
        assert_eq!(std.foam_price(FoamType::HR35), 38.9);
        assert!(cost.standard_size(90.0, 90.0, 20.0).is_none());
        assert!(cost.standard_size(280.0, 70.0, 25.0).is_none());
    }

    #[test]
    fn test_fmt_num() {
        assert_eq!(fmt_num(280.0), "280");
        assert_eq!(fmt_num(157.5), "157.5");
        assert_eq!(fmt_num(16.16), "16.16");
    }
}

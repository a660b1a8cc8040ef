//! Cost-of-goods ledger (tax-exclusive).
//!
//! Mirrors the sale structure with its own table: per-density foam coefficients,
//! a fabric tier with a fixed supplement, fixed prices for a few standard foam
//! sizes, length-tiered straight-bench supports and a fixed delivery line.

use crate::geometry::FoamDims;
use crate::layout::LayoutReport;
use crate::packing::CushionBucket;
use crate::pricing::engine::PricingOptions;
use crate::pricing::ledger::{Ledger, LedgerCategory};
use crate::pricing::rates::{fmt_num, CostRates};

pub fn build_cost_ledger(rates: &CostRates, report: &LayoutReport, options: &PricingOptions) -> Ledger {
    let mut ledger = Ledger::new();

    for (idx, dims) in report.foam_dims_straight.iter().enumerate() {
        push_foam_and_fabric(&mut ledger, rates, "droite", idx + 1, dims, options);
    }
    for (idx, dims) in report.foam_dims_corner.iter().enumerate() {
        push_foam_and_fabric(&mut ledger, rates, "angle", idx + 1, dims, options);
    }

    // straight benches, one line per length tier
    let (short, long): (Vec<&FoamDims>, Vec<&FoamDims>) = report
        .foam_dims_straight
        .iter()
        .partition(|d| d.length <= rates.short_bench_max_cm);
    let short_max = fmt_num(rates.short_bench_max_cm);
    ledger.push(
        LedgerCategory::Support,
        format!("Banquette droite (≤ {short_max} cm)"),
        short.len() as u32,
        rates.straight_bench_short.value(),
        rates.straight_bench_short.formula(),
    );
    ledger.push(
        LedgerCategory::Support,
        format!("Banquette droite (> {short_max} cm)"),
        long.len() as u32,
        rates.straight_bench_long.value(),
        rates.straight_bench_long.formula(),
    );
    ledger.push(
        LedgerCategory::Support,
        "Banquette d'angle",
        report.nb_corner_benches as u32,
        rates.corner_bench.value(),
        rates.corner_bench.formula(),
    );
    ledger.push(
        LedgerCategory::Support,
        "Dossier",
        report.nb_backrests as u32,
        rates.backrest.value(),
        rates.backrest.formula(),
    );
    ledger.push(
        LedgerCategory::Armrest,
        "Accoudoir",
        report.nb_armrests as u32,
        rates.armrest,
        fmt_num(rates.armrest),
    );

    for bucket in CushionBucket::ALL {
        let unit = match bucket {
            CushionBucket::S65 => rates.cushion_65,
            CushionBucket::S80 => rates.cushion_80,
            CushionBucket::S90 => rates.cushion_90,
            CushionBucket::Suitcase => rates.cushion_suitcase,
        };
        ledger.push(
            LedgerCategory::Cushion,
            bucket.label_fr(),
            report.cushion_counts.get(bucket),
            unit,
            fmt_num(unit),
        );
    }
    ledger.push(
        LedgerCategory::Cushion,
        "Coussin déco",
        options.decorative_cushions,
        rates.decorative_cushion,
        fmt_num(rates.decorative_cushion),
    );
    ledger.push(
        LedgerCategory::Bolster,
        "Traversin",
        report.nb_bolsters as u32 + options.extra_bolsters,
        rates.bolster,
        fmt_num(rates.bolster),
    );
    if options.mattress_topper {
        ledger.push(
            LedgerCategory::MattressTopper,
            "Surmatelas",
            report.foam_piece_count() as u32,
            rates.mattress_topper,
            fmt_num(rates.mattress_topper),
        );
    }
    if options.rounded_corners {
        ledger.push(
            LedgerCategory::RoundedCorners,
            "Arrondi",
            (report.nb_straight_benches + report.nb_corner_benches) as u32,
            rates.rounded_corner,
            fmt_num(rates.rounded_corner),
        );
    }
    ledger.push(
        LedgerCategory::Delivery,
        "Livraison",
        1,
        rates.delivery,
        fmt_num(rates.delivery),
    );
    ledger
}

fn push_foam_and_fabric(
    ledger: &mut Ledger,
    rates: &CostRates,
    kind: &str,
    idx: usize,
    dims: &FoamDims,
    options: &PricingOptions,
) {
    let (l, w, t) = (dims.length, dims.width, options.thickness_cm);
    let size = format!("{}×{} cm", fmt_num(l), fmt_num(w));

    let (foam, foam_formula, fabric, fabric_formula) = match rates.standard_size(l, w, t) {
        Some(std) => (
            std.foam_price(options.foam_type),
            "prix standard".to_string(),
            std.fabric,
            "prix standard".to_string(),
        ),
        None => {
            let coeff = rates.foam_coefficient(options.foam_type);
            let per_m = if rates.fabric_seam_cm + w + 2.0 * t <= rates.fabric_narrow_max_cm {
                rates.fabric_narrow_per_m
            } else {
                rates.fabric_wide_per_m
            };
            (
                l * w * t / 1_000_000.0 * coeff,
                format!("({}*{}*{})/1 000 000*{}", fmt_num(l), fmt_num(w), fmt_num(t), fmt_num(coeff)),
                l / 100.0 * per_m + rates.fabric_supplement,
                format!(
                    "({}/100)*{}+{}",
                    fmt_num(l),
                    fmt_num(per_m),
                    fmt_num(rates.fabric_supplement)
                ),
            )
        }
    };

    ledger.push(
        LedgerCategory::Foam,
        format!("Mousse {kind} {idx} ({size})"),
        1,
        foam,
        foam_formula,
    );
    ledger.push(
        LedgerCategory::Fabric,
        format!("Tissu {kind} {idx} ({size})"),
        1,
        fabric,
        fabric_formula,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{RawDimensions, Sides, SofaTopology};
    use crate::layout::{LayoutEngine, LayoutRequest};
    use crate::packing::{CushionSize, SizingPolicy};
    use crate::pricing::rates::FoamType;

    fn report(topology: SofaTopology, tx: f64, ty: Option<f64>, depth: f64) -> LayoutReport {
        LayoutEngine::default()
            .compute(&LayoutRequest {
                topology,
                dimensions: RawDimensions {
                    tx: Some(tx),
                    ty,
                    tz: None,
                    depth: Some(depth),
                },
                backrests: Sides::NONE,
                armrests: Sides::NONE,
                meridienne: None,
                cushion_policy: SizingPolicy::Fixed(CushionSize::S80),
                bolster_positions: vec![],
            })
            .unwrap()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_standard_size_bypasses_formula() {
        let r = report(SofaTopology::Simple, 200.0, None, 70.0);
        let options = PricingOptions {
            foam_type: FoamType::HR35,
            ..PricingOptions::default()
        };
        let ledger = build_cost_ledger(&CostRates::default(), &r, &options);
        let foam = &ledger.entries()[0];
        assert_eq!(foam.formula, "prix standard");
        assert!(approx(foam.line_total, 65.0));
        assert!(approx(ledger.entries()[1].line_total, 34.40));
    }

    #[test]
    fn test_standard_size_ignored_off_thickness() {
        let r = report(SofaTopology::Simple, 200.0, None, 70.0);
        let options = PricingOptions {
            thickness_cm: 20.0,
            ..PricingOptions::default()
        };
        let ledger = build_cost_ledger(&CostRates::default(), &r, &options);
        // 200 × 70 × 20 / 1e6 × 157.5
        assert!(approx(ledger.entries()[0].line_total, 44.1));
        // 2 + 70 + 40 ≤ 140 → narrow
        assert!(approx(ledger.entries()[1].line_total, 2.0 * 11.2 + 15.0));
    }

    #[test]
    fn test_corner_90_square_is_standard() {
        let r = report(SofaTopology::LWithCorner, 350.0, Some(250.0), 70.0);
        let ledger = build_cost_ledger(&CostRates::default(), &r, &PricingOptions::default());
        let corner_foam = ledger
            .entries()
            .iter()
            .find(|e| e.item_label.starts_with("Mousse angle"))
            .unwrap();
        assert!(approx(corner_foam.line_total, 31.9));
    }

    #[test]
    fn test_straight_benches_grouped_by_length_tier() {
        // LF 350/250/70 → benches of 160 and 260 cm
        let r = report(SofaTopology::LWithCorner, 350.0, Some(250.0), 70.0);
        let ledger = build_cost_ledger(&CostRates::default(), &r, &PricingOptions::default());
        let benches: Vec<_> = ledger
            .entries()
            .iter()
            .filter(|e| e.item_label.starts_with("Banquette droite"))
            .collect();
        assert_eq!(benches.len(), 2);
        assert!(approx(benches[0].unit_price, 113.0));
        assert_eq!(benches[0].quantity, 1);
        assert!(approx(benches[1].unit_price, 121.0));
        let corner = ledger
            .entries()
            .iter()
            .find(|e| e.item_label == "Banquette d'angle")
            .unwrap();
        assert!(approx(corner.line_total, 104.2));
    }

    #[test]
    fn test_delivery_is_always_last() {
        let r = report(SofaTopology::Simple, 280.0, None, 70.0);
        let options = PricingOptions {
            rounded_corners: true,
            mattress_topper: true,
            ..PricingOptions::default()
        };
        let ledger = build_cost_ledger(&CostRates::default(), &r, &options);
        let last = ledger.entries().last().unwrap();
        assert_eq!(last.category, LedgerCategory::Delivery);
        assert_eq!(last.quantity, 1);
        assert!(approx(ledger.category_total(LedgerCategory::RoundedCorners), 6.05));
        assert!(approx(ledger.category_total(LedgerCategory::MattressTopper), 31.0));
    }

    #[test]
    fn test_wide_cost_fabric_tier() {
        // 2 + 100 + 50 > 140
        let r = report(SofaTopology::Simple, 280.0, None, 100.0);
        let ledger = build_cost_ledger(&CostRates::default(), &r, &PricingOptions::default());
        // 2.8 × 16.16 + 15 = 60.248
        assert!(approx(ledger.entries()[1].line_total, 60.25));
    }
}

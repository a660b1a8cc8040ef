//! Option price breakdown: what each option adds, for the customer summary.
//!
//! Every row is the tax-exclusive difference between two independent pricing
//! probes, floored at zero:
//! - base: no armrests, no backrests, auto cushions, no accessories, D25 foam
//! - armrests / backrests / foam: base plus that one selection
//! - seat cushions: base with the selected cushion policy
//! - decorative cushions / bolsters / toppers: the seat-cushion probe plus that one
//!   accessory
//!
//! The foam upgrade is also split across straight benches proportionally to their
//! edge length. Rounded corners, the discount and the final total come from the
//! full quote and are tax-inclusive.

use serde::{Deserialize, Serialize};

use crate::errors::QuoteError;
use crate::geometry::Sides;
use crate::layout::{LayoutEngine, LayoutRequest};
use crate::packing::SizingPolicy;
use crate::pricing::engine::{PricingEngine, PricingOptions};
use crate::pricing::ledger::{round2, LedgerCategory};
use crate::pricing::rates::FoamType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownRow {
    pub label: String,
    pub quantity: u32,
    pub amount_excl_tax: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    /// Benches alone, tax-exclusive.
    pub base_excl_tax: f64,
    pub rows: Vec<BreakdownRow>,
    pub rounded_corners_incl_tax: f64,
    pub discount_incl_tax: f64,
    /// Delivery is offered to the customer; its cost only shows in the cost ledger.
    pub delivery_free: bool,
    pub total_incl_tax: f64,
}

impl PriceBreakdown {
    #[cfg(test)]
    pub fn row(&self, label: &str) -> Option<&BreakdownRow> {
        self.rows.iter().find(|r| r.label == label)
    }
}

struct Prober<'a> {
    layout: &'a LayoutEngine,
    pricing: &'a PricingEngine,
}

impl Prober<'_> {
    fn excl_tax(&self, request: &LayoutRequest, options: &PricingOptions) -> Result<f64, QuoteError> {
        let report = self.layout.compute(request)?;
        Ok(self.pricing.price(&report, options)?.sale_price_excl_tax)
    }
}

fn delta(with: f64, without: f64) -> f64 {
    round2((with - without).max(0.0))
}

pub fn compute_breakdown(
    layout: &LayoutEngine,
    pricing: &PricingEngine,
    request: &LayoutRequest,
    options: &PricingOptions,
) -> Result<PriceBreakdown, QuoteError> {
    options.validate()?;
    let full_report = layout.compute(request)?;
    let full = pricing.price(&full_report, options)?;
    let probe = Prober { layout, pricing };

    let base_request = LayoutRequest {
        backrests: Sides::NONE,
        armrests: Sides::NONE,
        cushion_policy: SizingPolicy::Auto,
        bolster_positions: vec![],
        ..request.clone()
    };
    let base_options = PricingOptions {
        foam_type: FoamType::D25,
        thickness_cm: options.thickness_cm,
        ..PricingOptions::default()
    };
    let base = probe.excl_tax(&base_request, &base_options)?;

    let armrests = delta(
        probe.excl_tax(
            &LayoutRequest {
                armrests: request.armrests,
                ..base_request.clone()
            },
            &base_options,
        )?,
        base,
    );
    let backrests = delta(
        probe.excl_tax(
            &LayoutRequest {
                backrests: request.backrests,
                ..base_request.clone()
            },
            &base_options,
        )?,
        base,
    );
    let foam = delta(
        probe.excl_tax(
            &base_request,
            &PricingOptions {
                foam_type: options.foam_type,
                ..base_options.clone()
            },
        )?,
        base,
    );

    let seat_request = LayoutRequest {
        cushion_policy: request.cushion_policy,
        ..base_request.clone()
    };
    let seat = probe.excl_tax(&seat_request, &base_options)?;
    let seat_cushions = delta(seat, base);

    let decorative = delta(
        probe.excl_tax(
            &seat_request,
            &PricingOptions {
                decorative_cushions: options.decorative_cushions,
                ..base_options.clone()
            },
        )?,
        seat,
    );
    let bolsters = delta(
        probe.excl_tax(
            &LayoutRequest {
                bolster_positions: request.bolster_positions.clone(),
                ..seat_request.clone()
            },
            &PricingOptions {
                extra_bolsters: options.extra_bolsters,
                ..base_options.clone()
            },
        )?,
        seat,
    );
    let toppers = if options.mattress_topper {
        delta(
            probe.excl_tax(
                &seat_request,
                &PricingOptions {
                    mattress_topper: true,
                    ..base_options.clone()
                },
            )?,
            seat,
        )
    } else {
        0.0
    };

    let topper_units = full
        .ledger
        .iter()
        .filter(|e| e.category == LedgerCategory::MattressTopper)
        .map(|e| e.quantity)
        .sum();

    let mut rows = vec![
        BreakdownRow {
            label: "Banquettes".to_string(),
            quantity: full_report.nb_straight_benches as u32,
            amount_excl_tax: base,
        },
        BreakdownRow {
            label: "Accoudoirs".to_string(),
            quantity: request.armrests.count() as u32,
            amount_excl_tax: armrests,
        },
        BreakdownRow {
            label: "Coussins assise".to_string(),
            quantity: full_report.cushion_counts.total(),
            amount_excl_tax: seat_cushions,
        },
        BreakdownRow {
            label: "Coussins déco".to_string(),
            quantity: options.decorative_cushions,
            amount_excl_tax: decorative,
        },
        BreakdownRow {
            label: "Traversins".to_string(),
            quantity: full_report.nb_bolsters as u32 + options.extra_bolsters,
            amount_excl_tax: bolsters,
        },
        BreakdownRow {
            label: "Surmatelas".to_string(),
            quantity: topper_units,
            amount_excl_tax: toppers,
        },
        BreakdownRow {
            label: "Dossiers".to_string(),
            quantity: request.backrests.count() as u32,
            amount_excl_tax: backrests,
        },
    ];

    let total_length: f64 = full_report.benches.iter().map(|b| b.edge_length).sum();
    for bench in &full_report.benches {
        let share = if total_length > 0.0 {
            foam * bench.edge_length / total_length
        } else {
            0.0
        };
        rows.push(BreakdownRow {
            label: format!("Mousse {} banquette {}", options.foam_type, bench.position.label_fr()),
            quantity: 1,
            amount_excl_tax: round2(share),
        });
    }

    Ok(PriceBreakdown {
        base_excl_tax: base,
        rows,
        rounded_corners_incl_tax: full
            .sale_subtotals
            .iter()
            .find(|s| s.category == LedgerCategory::RoundedCorners)
            .map(|s| s.total)
            .unwrap_or(0.0),
        discount_incl_tax: full.discount_incl_tax,
        delivery_free: true,
        total_incl_tax: full.sale_price_incl_tax,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Position, RawDimensions, SofaTopology};
    use crate::packing::CushionSize;

    fn request() -> LayoutRequest {
        LayoutRequest {
            topology: SofaTopology::Simple,
            dimensions: RawDimensions {
                tx: Some(280.0),
                ty: None,
                tz: None,
                depth: Some(70.0),
            },
            backrests: Sides::NONE,
            armrests: Sides::NONE,
            meridienne: None,
            cushion_policy: SizingPolicy::Auto,
            bolster_positions: vec![],
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 0.011
    }

    #[test]
    fn test_bare_sofa_has_only_base() {
        let b = compute_breakdown(
            &LayoutEngine::default(),
            &PricingEngine::default(),
            &request(),
            &PricingOptions::default(),
        )
        .unwrap();
        assert!(approx(b.base_excl_tax, 753.29));
        assert!(b.rows.iter().skip(1).all(|r| r.amount_excl_tax == 0.0));
        assert!(approx(b.total_incl_tax, 903.95));
        assert!(b.delivery_free);
    }

    #[test]
    fn test_armrests_and_backrests_rows() {
        let mut req = request();
        req.armrests = Sides {
            left: true,
            bottom: false,
            right: true,
        };
        req.backrests = Sides {
            left: false,
            bottom: true,
            right: false,
        };
        let b = compute_breakdown(
            &LayoutEngine::default(),
            &PricingEngine::default(),
            &req,
            &PricingOptions::default(),
        )
        .unwrap();
        let armrests = b.row("Accoudoirs").unwrap();
        assert_eq!(armrests.quantity, 2);
        // 400 € TTC
        assert!(approx(armrests.amount_excl_tax, 333.33));
        let backrests = b.row("Dossiers").unwrap();
        assert!(approx(backrests.amount_excl_tax, 208.33));
    }

    #[test]
    fn test_foam_upgrade_split_across_benches() {
        let req = LayoutRequest {
            topology: SofaTopology::LNoCorner,
            dimensions: RawDimensions {
                tx: Some(300.0),
                ty: Some(200.0),
                tz: None,
                depth: Some(70.0),
            },
            ..request()
        };
        let options = PricingOptions {
            foam_type: FoamType::HR45,
            ..PricingOptions::default()
        };
        let b = compute_breakdown(&LayoutEngine::default(), &PricingEngine::default(), &req, &options)
            .unwrap();
        let foam_rows: Vec<&BreakdownRow> =
            b.rows.iter().filter(|r| r.label.starts_with("Mousse HR45")).collect();
        assert_eq!(foam_rows.len(), 2);
        // edges 200 (left) and 300 (bottom): 40 % / 60 %
        let total = foam_rows[0].amount_excl_tax + foam_rows[1].amount_excl_tax;
        assert!(total > 0.0);
        assert!(approx(foam_rows[0].amount_excl_tax, total * 0.4));
    }

    #[test]
    fn test_accessory_rows_and_rounded_corners() {
        let req = LayoutRequest {
            bolster_positions: vec![Position::Left],
            cushion_policy: SizingPolicy::Fixed(CushionSize::S65),
            ..request()
        };
        let options = PricingOptions {
            decorative_cushions: 2,
            extra_bolsters: 1,
            mattress_topper: true,
            rounded_corners: true,
            discount_incl_tax: 50.0,
            ..PricingOptions::default()
        };
        let b = compute_breakdown(&LayoutEngine::default(), &PricingEngine::default(), &req, &options)
            .unwrap();
        assert!(approx(b.row("Coussins déco").unwrap().amount_excl_tax, 25.0));
        let bolsters = b.row("Traversins").unwrap();
        assert_eq!(bolsters.quantity, 2);
        assert!(approx(bolsters.amount_excl_tax, 50.0));
        let toppers = b.row("Surmatelas").unwrap();
        assert_eq!(toppers.quantity, 1);
        assert!(approx(toppers.amount_excl_tax, 66.67));
        assert!(approx(b.rounded_corners_incl_tax, 20.0));
        assert_eq!(b.discount_incl_tax, 50.0);
    }

    #[test]
    fn test_breakdown_propagates_layout_errors() {
        let req = LayoutRequest {
            dimensions: RawDimensions {
                tx: None,
                ..request().dimensions
            },
            ..request()
        };
        assert!(matches!(
            compute_breakdown(
                &LayoutEngine::default(),
                &PricingEngine::default(),
                &req,
                &PricingOptions::default()
            ),
            Err(QuoteError::MissingDimension { .. })
        ));
    }
}

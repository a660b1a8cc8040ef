//! Pricing engine: `LayoutReport` + options → sale ledger, cost ledger and totals.
//!
//! # Sale ledger order
//! 1. Foam and fabric per straight piece, then per corner piece
//! 2. Supports: straight benches, corner benches, backrests
//! 3. Seat cushions per bucket, then decorative cushions
//! 4. Bolsters, mattress toppers, armrests
//! 5. Rounded-corner surcharge
//!
//! Sale lines are tax-inclusive. The tax-exclusive price is the ledger total divided
//! by 1 + VAT; a discount is applied afterwards on the tax-exclusive basis. Cost of
//! goods is never discounted and margin is always taken on the discounted price.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::QuoteError;
use crate::geometry::FoamDims;
use crate::layout::LayoutReport;
use crate::packing::CushionBucket;
use crate::pricing::cost::build_cost_ledger;
use crate::pricing::ledger::{round2, CategorySubtotal, Ledger, LedgerCategory, PriceLedgerEntry, PriceTotals};
use crate::pricing::rates::{fmt_num, FoamType, RateTable};

pub const THICKNESS_MIN_CM: f64 = 15.0;
pub const THICKNESS_MAX_CM: f64 = 35.0;
pub const MAX_DECORATIVE_CUSHIONS: u32 = 10;
pub const MAX_EXTRA_BOLSTERS: u32 = 5;

// ────────────────────────────────────────────────────────────────────────────
// Inputs and outputs
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingOptions {
    pub foam_type: FoamType,
    pub thickness_cm: f64,
    pub decorative_cushions: u32,
    /// Bolsters on top of the ones placed by the layout.
    pub extra_bolsters: u32,
    pub mattress_topper: bool,
    pub rounded_corners: bool,
    /// Tax-inclusive euros.
    pub discount_incl_tax: f64,
}

impl Default for PricingOptions {
    fn default() -> Self {
        Self {
            foam_type: FoamType::D25,
            thickness_cm: 25.0,
            decorative_cushions: 0,
            extra_bolsters: 0,
            mattress_topper: false,
            rounded_corners: false,
            discount_incl_tax: 0.0,
        }
    }
}

impl PricingOptions {
    /// Range checks, run before any arithmetic.
    pub fn validate(&self) -> Result<(), QuoteError> {
        let t = self.thickness_cm;
        if !t.is_finite() || t <= 0.0 {
            return Err(QuoteError::invalid("thickness must be a positive number"));
        }
        if !(THICKNESS_MIN_CM..=THICKNESS_MAX_CM).contains(&t) {
            return Err(QuoteError::invalid(format!(
                "thickness {t} cm is outside the allowed range {THICKNESS_MIN_CM}–{THICKNESS_MAX_CM} cm"
            )));
        }
        if self.decorative_cushions > MAX_DECORATIVE_CUSHIONS {
            return Err(QuoteError::invalid(format!(
                "at most {MAX_DECORATIVE_CUSHIONS} decorative cushions can be ordered"
            )));
        }
        if self.extra_bolsters > MAX_EXTRA_BOLSTERS {
            return Err(QuoteError::invalid(format!(
                "at most {MAX_EXTRA_BOLSTERS} extra bolsters can be ordered"
            )));
        }
        if !self.discount_incl_tax.is_finite() || self.discount_incl_tax < 0.0 {
            return Err(QuoteError::invalid("discount must be zero or a positive amount"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteResult {
    pub sale_price_excl_tax: f64,
    pub vat_amount: f64,
    pub sale_price_incl_tax: f64,
    pub cost_of_goods_excl_tax: f64,
    pub margin_excl_tax: f64,
    pub discount_incl_tax: f64,
    /// Totals before the discount.
    pub undiscounted: PriceTotals,
    pub ledger: Vec<PriceLedgerEntry>,
    pub cost_ledger: Vec<PriceLedgerEntry>,
    pub sale_subtotals: Vec<CategorySubtotal>,
    pub cost_subtotals: Vec<CategorySubtotal>,
}

impl QuoteResult {
    /// Re-derives the totals under a new tax-inclusive discount. Ledgers and cost
    /// are untouched.
    pub fn apply_discount(mut self, discount_incl_tax: f64, vat_rate: f64) -> Self {
        let totals = self.undiscounted.with_discount(discount_incl_tax, vat_rate);
        self.discount_incl_tax = discount_incl_tax.max(0.0);
        self.sale_price_excl_tax = totals.excl_tax;
        self.vat_amount = totals.vat;
        self.sale_price_incl_tax = totals.incl_tax;
        self.margin_excl_tax = round2(totals.excl_tax - self.cost_of_goods_excl_tax);
        self
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Engine
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct PricingEngine {
    rates: RateTable,
}

impl PricingEngine {
    pub fn new(rates: RateTable) -> Self {
        Self { rates }
    }

    /// Prices a complete layout. Pure: the same inputs always give the same result.
    pub fn price(&self, report: &LayoutReport, options: &PricingOptions) -> Result<QuoteResult, QuoteError> {
        options.validate()?;

        let sale = self.sale_ledger(report, options);
        let cost = build_cost_ledger(&self.rates.cost, report, options);
        let vat_rate = self.rates.sale.vat_rate;

        let undiscounted = PriceTotals::from_incl_total(sale.total(), vat_rate);
        let cost_total = cost.total();

        let result = QuoteResult {
            sale_price_excl_tax: undiscounted.excl_tax,
            vat_amount: undiscounted.vat,
            sale_price_incl_tax: undiscounted.incl_tax,
            cost_of_goods_excl_tax: cost_total,
            margin_excl_tax: round2(undiscounted.excl_tax - cost_total),
            discount_incl_tax: 0.0,
            undiscounted,
            sale_subtotals: sale.subtotals(),
            cost_subtotals: cost.subtotals(),
            ledger: sale.into_entries(),
            cost_ledger: cost.into_entries(),
        }
        .apply_discount(options.discount_incl_tax, vat_rate);

        debug!(
            "Priced {}: {:.2} € TTC ({:.2} € HT), cost {:.2} €, margin {:.2} €",
            report.topology,
            result.sale_price_incl_tax,
            result.sale_price_excl_tax,
            result.cost_of_goods_excl_tax,
            result.margin_excl_tax
        );
        Ok(result)
    }

    fn sale_ledger(&self, report: &LayoutReport, options: &PricingOptions) -> Ledger {
        let r = &self.rates.sale;
        let mut ledger = Ledger::new();

        for (idx, dims) in report.foam_dims_straight.iter().enumerate() {
            self.push_foam_and_fabric(&mut ledger, "droite", idx + 1, dims, options);
        }
        for (idx, dims) in report.foam_dims_corner.iter().enumerate() {
            self.push_foam_and_fabric(&mut ledger, "angle", idx + 1, dims, options);
        }

        let bench_count = report.nb_straight_benches as u32;
        let corner_count = report.nb_corner_benches as u32;
        ledger.push(
            LedgerCategory::Support,
            "Banquette droite",
            bench_count,
            r.straight_bench,
            format!("{} €/banquette", fmt_num(r.straight_bench)),
        );
        ledger.push(
            LedgerCategory::Support,
            "Banquette d'angle",
            corner_count,
            r.corner_bench,
            format!("{} €/angle", fmt_num(r.corner_bench)),
        );
        ledger.push(
            LedgerCategory::Support,
            "Dossier",
            report.nb_backrests as u32,
            r.backrest,
            format!("{} €/dossier", fmt_num(r.backrest)),
        );

        for bucket in CushionBucket::ALL {
            let unit = match bucket {
                CushionBucket::S65 => r.cushion_65,
                CushionBucket::S80 => r.cushion_80,
                CushionBucket::S90 => r.cushion_90,
                CushionBucket::Suitcase => r.cushion_suitcase,
            };
            ledger.push(
                LedgerCategory::Cushion,
                bucket.label_fr(),
                report.cushion_counts.get(bucket),
                unit,
                format!("{} €/{}", fmt_num(unit), bucket.label_fr().to_lowercase()),
            );
        }
        ledger.push(
            LedgerCategory::Cushion,
            "Coussin déco",
            options.decorative_cushions,
            r.decorative_cushion,
            format!("{} €/coussin déco", fmt_num(r.decorative_cushion)),
        );

        ledger.push(
            LedgerCategory::Bolster,
            "Traversin",
            report.nb_bolsters as u32 + options.extra_bolsters,
            r.bolster,
            format!("{} €/traversin", fmt_num(r.bolster)),
        );
        if options.mattress_topper {
            ledger.push(
                LedgerCategory::MattressTopper,
                "Surmatelas",
                report.foam_piece_count() as u32,
                r.mattress_topper,
                format!("{} €/surmatelas", fmt_num(r.mattress_topper)),
            );
        }
        ledger.push(
            LedgerCategory::Armrest,
            "Accoudoir",
            report.nb_armrests as u32,
            r.armrest,
            format!("{} €/accoudoir", fmt_num(r.armrest)),
        );
        if options.rounded_corners {
            ledger.push(
                LedgerCategory::RoundedCorners,
                "Arrondi",
                bench_count + corner_count,
                r.rounded_corner,
                format!("{} €/banquette ou angle", fmt_num(r.rounded_corner)),
            );
        }
        ledger
    }

    fn push_foam_and_fabric(
        &self,
        ledger: &mut Ledger,
        kind: &str,
        idx: usize,
        dims: &FoamDims,
        options: &PricingOptions,
    ) {
        let r = &self.rates.sale;
        let (l, w, t) = (dims.length, dims.width, options.thickness_cm);
        let density = options.foam_type.density();
        let size = format!("{}×{} cm", fmt_num(l), fmt_num(w));

        let foam = l * w * t * density * r.foam_k / 1_000_000.0;
        ledger.push(
            LedgerCategory::Foam,
            format!("Mousse {kind} {idx} ({size})"),
            1,
            foam,
            format!(
                "({}*{}*{}*{}*{})/1 000 000",
                fmt_num(l),
                fmt_num(w),
                fmt_num(t),
                fmt_num(density),
                fmt_num(r.foam_k)
            ),
        );

        let per_m = if w + 2.0 * t > r.fabric_wide_threshold_cm {
            r.fabric_wide_per_m
        } else {
            r.fabric_narrow_per_m
        };
        ledger.push(
            LedgerCategory::Fabric,
            format!("Tissu {kind} {idx} ({size})"),
            1,
            l / 100.0 * per_m,
            format!("({}/100)*{}", fmt_num(l), fmt_num(per_m)),
        );
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

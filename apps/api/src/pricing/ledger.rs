//! Itemized ledgers and the totals derived from them.
//!
//! Entry order is the rendering order of the PDF tables: it follows the fixed
//! evaluation sequence and never affects the arithmetic.

use serde::{Deserialize, Serialize};

/// Rounds to cents.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerCategory {
    Foam,
    Fabric,
    Support,
    Cushion,
    Bolster,
    MattressTopper,
    Armrest,
    RoundedCorners,
    Delivery,
}

impl LedgerCategory {
    pub fn label_fr(&self) -> &'static str {
        match self {
            LedgerCategory::Foam => "Mousse",
            LedgerCategory::Fabric => "Tissu",
            LedgerCategory::Support => "Supports",
            LedgerCategory::Cushion => "Coussins",
            LedgerCategory::Bolster => "Traversins",
            LedgerCategory::MattressTopper => "Surmatelas",
            LedgerCategory::Armrest => "Accoudoirs",
            LedgerCategory::RoundedCorners => "Arrondis",
            LedgerCategory::Delivery => "Livraison",
        }
    }
}

/// One priced line. `formula` is human-readable, never evaluated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceLedgerEntry {
    pub category: LedgerCategory,
    pub item_label: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub formula: String,
    pub line_total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySubtotal {
    pub category: LedgerCategory,
    pub label: String,
    pub total: f64,
}

/// Append-only ledger builder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    entries: Vec<PriceLedgerEntry>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `quantity × unit_price`. Lines with a zero quantity are skipped.
    pub fn push(
        &mut self,
        category: LedgerCategory,
        item_label: impl Into<String>,
        quantity: u32,
        unit_price: f64,
        formula: impl Into<String>,
    ) {
        if quantity == 0 {
            return;
        }
        self.entries.push(PriceLedgerEntry {
            category,
            item_label: item_label.into(),
            quantity,
            unit_price: round2(unit_price),
            formula: formula.into(),
            line_total: round2(quantity as f64 * unit_price),
        });
    }

    pub fn entries(&self) -> &[PriceLedgerEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<PriceLedgerEntry> {
        self.entries
    }

    /// Sum of the rounded line totals.
    pub fn total(&self) -> f64 {
        round2(self.entries.iter().map(|e| e.line_total).sum())
    }

    pub fn category_total(&self, category: LedgerCategory) -> f64 {
        round2(
            self.entries
                .iter()
                .filter(|e| e.category == category)
                .map(|e| e.line_total)
                .sum(),
        )
    }

    /// Per-category totals in order of first appearance.
    pub fn subtotals(&self) -> Vec<CategorySubtotal> {
        let mut seen: Vec<LedgerCategory> = Vec::new();
        for entry in &self.entries {
            if !seen.contains(&entry.category) {
                seen.push(entry.category);
            }
        }
        seen.into_iter()
            .map(|category| CategorySubtotal {
                category,
                label: category.label_fr().to_string(),
                total: self.category_total(category),
            })
            .collect()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Totals
// ────────────────────────────────────────────────────────────────────────────

/// Tax split of a sale amount. `excl_tax + vat == incl_tax` to the cent; `excl_tax × (1 + rate)`
/// lands within one cent of `incl_tax`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceTotals {
    pub excl_tax: f64,
    pub vat: f64,
    pub incl_tax: f64,
}

impl PriceTotals {
    /// Splits a tax-inclusive ledger total. The inclusive amount stays the ledger sum;
    /// the tax-exclusive share is derived from it and VAT takes the remainder.
    pub fn from_incl_total(incl_total: f64, vat_rate: f64) -> Self {
        let incl_tax = round2(incl_total);
        let excl_tax = round2(incl_tax / (1.0 + vat_rate));
        Self {
            excl_tax,
            vat: round2(incl_tax - excl_tax),
            incl_tax,
        }
    }

    pub fn from_excl(excl_tax: f64, vat_rate: f64) -> Self {
        let incl_tax = round2(excl_tax * (1.0 + vat_rate));
        Self {
            excl_tax,
            vat: round2(incl_tax - excl_tax),
            incl_tax,
        }
    }

    /// Applies a tax-inclusive discount: converted to tax-exclusive, subtracted,
    /// floored at zero, then VAT and the inclusive total are re-derived.
    pub fn with_discount(&self, discount_incl_tax: f64, vat_rate: f64) -> Self {
        if discount_incl_tax <= 0.0 {
            return *self;
        }
        let discount_excl = discount_incl_tax / (1.0 + vat_rate);
        let excl_tax = round2((self.excl_tax - discount_excl).max(0.0));
        Self::from_excl(excl_tax, vat_rate)
    }
}

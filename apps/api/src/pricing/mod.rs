// Pricing engine: LayoutReport + options → sale ledger, cost ledger, totals.
// Sale prices are tax-inclusive; cost of goods is tax-exclusive and never discounted.

pub mod breakdown;
pub mod cost;
pub mod engine;
pub mod ledger;
pub mod rates;

pub use breakdown::{compute_breakdown, PriceBreakdown};
pub use engine::{
    PricingEngine, PricingOptions, QuoteResult, MAX_DECORATIVE_CUSHIONS, MAX_EXTRA_BOLSTERS,
    THICKNESS_MAX_CM, THICKNESS_MIN_CM,
};
pub use rates::{FoamType, RateTable};

//! Quote assembly: layout + pricing + customer metadata in one envelope.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::QuoteError;
use crate::layout::{LayoutEngine, LayoutReport};
use crate::pricing::{PricingEngine, QuoteResult};
use crate::quote::request::{CustomerInfo, QuoteRequest};

/// The object handed to the PDF/report collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Quote {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub customer: CustomerInfo,
    pub configuration: QuoteRequest,
    pub layout: LayoutReport,
    pub pricing: QuoteResult,
}

/// Runs layout then pricing. A layout failure aborts the quote: pricing never runs
/// on a partial report.
pub fn assemble_quote(
    layout: &LayoutEngine,
    pricing: &PricingEngine,
    request: &QuoteRequest,
) -> Result<Quote, QuoteError> {
    let layout_request = request.layout_request()?;
    let options = request.pricing_options()?;

    let report = layout.compute(&layout_request)?;
    let result = pricing.price(&report, &options)?;

    let quote = Quote {
        id: Uuid::new_v4(),
        created_at: Utc::now(),
        customer: request.customer.clone(),
        configuration: request.clone(),
        layout: report,
        pricing: result,
    };
    info!(
        "Quote {} assembled: {} {:.2} € TTC",
        quote.id, quote.layout.topology, quote.pricing.sale_price_incl_tax
    );
    Ok(quote)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(body: &str) -> QuoteRequest {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn test_assembles_layout_and_pricing() {
        let req = request(
            r#"{"topology": "u_with_two_corners",
                "dimensions": {"tx": 450, "ty": 300, "tz": 280, "depth": 70},
                "backrests": {"left": true, "bottom": true, "right": true},
                "armrests": {"left": true, "right": true},
                "thickness_cm": 25,
                "customer": {"name": "Client test"}}"#,
        );
        let quote = assemble_quote(&LayoutEngine::default(), &PricingEngine::default(), &req).unwrap();
        assert_eq!(quote.layout.nb_backrests, 3);
        assert_eq!(quote.layout.nb_armrests, 2);
        assert_eq!(quote.customer.name.as_deref(), Some("Client test"));
        assert!(quote.pricing.sale_price_incl_tax > 0.0);
        assert_eq!(quote.configuration, req);
    }

    #[test]
    fn test_each_quote_gets_a_fresh_id() {
        let req = request(r#"{"topology": "simple", "dimensions": {"tx": 280, "depth": 70}, "thickness_cm": 25}"#);
        let layout = LayoutEngine::default();
        let pricing = PricingEngine::default();
        let a = assemble_quote(&layout, &pricing, &req).unwrap();
        let b = assemble_quote(&layout, &pricing, &req).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(a.pricing, b.pricing);
    }

    #[test]
    fn test_layout_failure_aborts_quote() {
        let req = request(
            r#"{"topology": "simple", "dimensions": {"tx": 200, "depth": 70},
                "meridienne": {"side": "left", "length": 200}, "thickness_cm": 25}"#,
        );
        let err = assemble_quote(&LayoutEngine::default(), &PricingEngine::default(), &req).unwrap_err();
        assert!(matches!(err, QuoteError::LayoutComputation { .. }));
    }
}

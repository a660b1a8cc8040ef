//! Configuration record sent by the form, and its split into layout and pricing inputs.

use serde::{Deserialize, Serialize};

use crate::errors::QuoteError;
use crate::geometry::{Meridienne, Position, RawDimensions, Sides, SofaTopology};
use crate::layout::LayoutRequest;
use crate::packing::SizingPolicy;
use crate::pricing::{FoamType, PricingOptions};

/// Free-text customer metadata. Carried into the quote, never validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Accessories {
    /// Signed so that a negative count is reported as invalid input rather than a
    /// body rejection.
    pub decorative_cushions: i64,
    pub extra_bolsters: i64,
    pub bolster_positions: Vec<Position>,
    pub mattress_topper: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    /// Canonical key or form label, e.g. `"l_with_corner"` or `"L - Avec Angle (LF)"`.
    pub topology: String,
    #[serde(default)]
    pub dimensions: RawDimensions,
    #[serde(default)]
    pub backrests: Sides,
    #[serde(default)]
    pub armrests: Sides,
    #[serde(default)]
    pub meridienne: Option<Meridienne>,
    #[serde(default)]
    pub cushion_policy: SizingPolicy,
    #[serde(default)]
    pub foam_type: FoamType,
    #[serde(default)]
    pub thickness_cm: Option<f64>,
    #[serde(default)]
    pub accessories: Accessories,
    #[serde(default)]
    pub rounded_corners: bool,
    #[serde(default)]
    pub discount_incl_tax: Option<f64>,
    #[serde(default)]
    pub customer: CustomerInfo,
}

impl QuoteRequest {
    pub fn topology(&self) -> Result<SofaTopology, QuoteError> {
        self.topology.parse()
    }

    pub fn layout_request(&self) -> Result<LayoutRequest, QuoteError> {
        Ok(LayoutRequest {
            topology: self.topology()?,
            dimensions: self.dimensions,
            backrests: self.backrests,
            armrests: self.armrests,
            meridienne: self.meridienne,
            cushion_policy: self.cushion_policy,
            bolster_positions: self.accessories.bolster_positions.clone(),
        })
    }

    pub fn pricing_options(&self) -> Result<PricingOptions, QuoteError> {
        let thickness_cm = self
            .thickness_cm
            .ok_or_else(|| QuoteError::invalid("foam thickness is required"))?;
        let options = PricingOptions {
            foam_type: self.foam_type,
            thickness_cm,
            decorative_cushions: non_negative("decorative cushion count", self.accessories.decorative_cushions)?,
            extra_bolsters: non_negative("extra bolster count", self.accessories.extra_bolsters)?,
            mattress_topper: self.accessories.mattress_topper,
            rounded_corners: self.rounded_corners,
            discount_incl_tax: self.discount_incl_tax.unwrap_or(0.0),
        };
        options.validate()?;
        Ok(options)
    }
}

fn non_negative(name: &str, value: i64) -> Result<u32, QuoteError> {
    u32::try_from(value).map_err(|_| QuoteError::invalid(format!("{name} must be a non-negative integer")))
}

use std::sync::Arc;

use crate::config::Config;
use crate::geometry::{DimensionLimits, GeometryModel, GeometryParams};
use crate::layout::LayoutEngine;
use crate::packing::{CushionPacker, CushionWidths, PackerConfig};
use crate::pricing::{PricingEngine, RateTable};

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Both engines are built once at start-up and are read-only afterwards, so
/// concurrent requests share them without locking.
#[derive(Clone)]
pub struct AppState {
    pub layout: Arc<LayoutEngine>,
    pub pricing: Arc<PricingEngine>,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        let geometry = GeometryModel::new(GeometryParams {
            corner_offset_cm: config.corner_offset_cm,
            ..GeometryParams::default()
        });
        let packer = CushionPacker::new(PackerConfig {
            widths: CushionWidths {
                valise_cm: config.cushion_width_valise_cm,
                small_cm: config.cushion_width_small_cm,
                large_cm: config.cushion_width_large_cm,
            },
            auto_tolerance_cm: config.auto_cushion_tolerance_cm,
        });
        let layout = LayoutEngine::new(geometry, packer, DimensionLimits::default());

        Self {
            layout: Arc::new(layout),
            pricing: Arc::new(PricingEngine::new(RateTable::default())),
        }
    }
}

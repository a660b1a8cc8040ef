use std::str::FromStr;

use anyhow::{ensure, Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable is optional; invalid values fail start-up.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Packing widths for the non-numeric cushion sizes (valise, p, g).
    pub cushion_width_valise_cm: f64,
    pub cushion_width_small_cm: f64,
    pub cushion_width_large_cm: f64,
    pub auto_cushion_tolerance_cm: f64,
    /// Corner bench side = depth + this offset.
    pub corner_offset_cm: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            rust_log: "info".to_string(),
            cushion_width_valise_cm: 70.0,
            cushion_width_small_cm: 60.0,
            cushion_width_large_cm: 100.0,
            auto_cushion_tolerance_cm: 10.0,
            corner_offset_cm: 20.0,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        let config = Config {
            port: env_or("PORT", defaults.port)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            cushion_width_valise_cm: env_or("CUSHION_WIDTH_VALISE_CM", defaults.cushion_width_valise_cm)?,
            cushion_width_small_cm: env_or("CUSHION_WIDTH_SMALL_CM", defaults.cushion_width_small_cm)?,
            cushion_width_large_cm: env_or("CUSHION_WIDTH_LARGE_CM", defaults.cushion_width_large_cm)?,
            auto_cushion_tolerance_cm: env_or(
                "AUTO_CUSHION_TOLERANCE_CM",
                defaults.auto_cushion_tolerance_cm,
            )?,
            corner_offset_cm: env_or("CORNER_OFFSET_CM", defaults.corner_offset_cm)?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, width) in [
            ("CUSHION_WIDTH_VALISE_CM", self.cushion_width_valise_cm),
            ("CUSHION_WIDTH_SMALL_CM", self.cushion_width_small_cm),
            ("CUSHION_WIDTH_LARGE_CM", self.cushion_width_large_cm),
        ] {
            ensure!(width.is_finite() && width > 0.0, "{name} must be a positive width");
        }
        ensure!(
            self.auto_cushion_tolerance_cm.is_finite() && self.auto_cushion_tolerance_cm >= 0.0,
            "AUTO_CUSHION_TOLERANCE_CM must be zero or positive"
        );
        ensure!(
            self.corner_offset_cm.is_finite() && self.corner_offset_cm >= 0.0,
            "CORNER_OFFSET_CM must be zero or positive"
        );
        Ok(())
    }
}

fn env_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}

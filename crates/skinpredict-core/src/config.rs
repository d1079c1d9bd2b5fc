//! Application configuration model.
//!
//! Loaded from `config.toml` by the infrastructure layer. Every field has a
//! default so a missing or partial file still yields a usable config.

use serde::{Deserialize, Serialize};

use crate::catalog::{Localization, PriceTierThresholds};
use crate::location::Coordinates;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_GEOLOCATION_URL: &str = "https://ipapi.co/json/";
/// Client-side upload limit (5 MB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkinPredictConfig {
    /// Base URL of the analysis backend.
    pub api_base_url: String,
    /// IP geolocation endpoint.
    pub geolocation_url: String,
    pub request_timeout_secs: u64,
    /// Radius for dermatologist/store searches, in meters.
    pub search_radius_m: u32,
    /// Ask the backend to use the hosted vision model instead of the local one.
    pub use_groq: bool,
    /// Debounce window for history writes, in milliseconds.
    pub persist_debounce_ms: u64,
    /// Fallback country for online catalog lookups.
    pub country: String,
    pub localization: Localization,
    pub price_tiers: PriceTierThresholds,
    pub max_upload_bytes: u64,
    /// When set, used instead of IP geolocation.
    pub fixed_location: Option<Coordinates>,
}

impl Default for SkinPredictConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            geolocation_url: DEFAULT_GEOLOCATION_URL.to_string(),
            request_timeout_secs: 30,
            search_radius_m: 5000,
            use_groq: false,
            persist_debounce_ms: 500,
            country: "United States".to_string(),
            localization: Localization::default(),
            price_tiers: PriceTierThresholds::default(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            fixed_location: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: SkinPredictConfig = toml::from_str(
            r#"
            api_base_url = "http://analysis.internal:8080"
            use_groq = true

            [localization]
            currency = "TND"
            rate_from_usd = 3.1
            "#,
        )
        .unwrap();

        assert_eq!(config.api_base_url, "http://analysis.internal:8080");
        assert!(config.use_groq);
        assert_eq!(config.search_radius_m, 5000);
        assert_eq!(config.localization.currency, "TND");
        assert_eq!(config.price_tiers, PriceTierThresholds::default());
        assert!(config.fixed_location.is_none());
    }
}

//! Remote collaborators of SkinPredict: the analysis backend and IP geolocation.
//!
//! Both are reached over HTTP with `reqwest`. Catalog lookups degrade to a
//! bundled product list when the backend is unreachable.

pub mod geolocation;
pub mod http_gateway;
pub mod mock_catalog;

use std::sync::Arc;

use skinpredict_core::config::SkinPredictConfig;
use skinpredict_core::gateway::GeolocationProvider;

pub use geolocation::{FixedLocator, IpApiLocator};
pub use http_gateway::HttpSkinGateway;

/// Picks the geolocation provider for a config: a fixed point if one is
/// configured, IP lookup otherwise.
pub fn locator_from_config(config: &SkinPredictConfig) -> Arc<dyn GeolocationProvider> {
    match config.fixed_location {
        Some(coordinates) => Arc::new(FixedLocator::at(coordinates)),
        None => Arc::new(IpApiLocator::from_config(config)),
    }
}

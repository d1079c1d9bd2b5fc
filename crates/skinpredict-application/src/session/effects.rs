//! Executes dispatcher effects against the gateway and locator.

use std::sync::Arc;

use skinpredict_core::gateway::{GeolocationProvider, NearbySearch, SkinServiceGateway};
use skinpredict_core::location::{Coordinates, LocationPurpose};

use crate::dispatcher::{Effect, SystemEvent};

/// Runs one effect and reports its outcome. Never fails: every failure
/// becomes a `SystemEvent` the dispatcher can talk about.
#[derive(Clone)]
pub struct EffectRunner {
    gateway: Arc<dyn SkinServiceGateway>,
    locator: Arc<dyn GeolocationProvider>,
    search_radius_m: u32,
}

impl EffectRunner {
    pub fn new(
        gateway: Arc<dyn SkinServiceGateway>,
        locator: Arc<dyn GeolocationProvider>,
        search_radius_m: u32,
    ) -> Self {
        Self {
            gateway,
            locator,
            search_radius_m,
        }
    }

    pub async fn run(&self, effect: Effect) -> SystemEvent {
        match effect {
            Effect::RequestGeolocation(purpose) => self.locate(purpose).await,
            Effect::FindDermatologists(location) => {
                let Coordinates { lat, lng } = location.coordinates;
                match self.gateway.find_dermatologists(lat, lng).await {
                    Ok(results) => SystemEvent::DermatologistsFound(results),
                    Err(error) => SystemEvent::DermatologistSearchFailed(error),
                }
            }
            Effect::SearchProducts {
                location,
                profile,
                tier,
            } => {
                let Coordinates { lat, lng } = location.coordinates;
                let search = NearbySearch {
                    lat,
                    lng,
                    radius_m: self.search_radius_m,
                    profile,
                };
                let mut response = self.gateway.find_nearby_products(&search).await;
                if response.nearby_stores.is_empty() && !response.is_empty() {
                    response.nearby_stores = self
                        .gateway
                        .find_nearby_stores(lat, lng, self.search_radius_m, None)
                        .await;
                }
                SystemEvent::ProductsFound { tier, response }
            }
            Effect::FetchOnlineCatalog { country, profile } => {
                let products = self
                    .gateway
                    .get_product_recommendations(country.as_deref(), &profile)
                    .await;
                SystemEvent::OnlineCatalogFound(products)
            }
            Effect::SendEmail { address, result } => {
                match self.gateway.send_email(&address, &result).await {
                    Ok(true) => SystemEvent::EmailSent { address },
                    Ok(false) => SystemEvent::EmailFailed {
                        address,
                        error: None,
                    },
                    Err(error) => SystemEvent::EmailFailed {
                        address,
                        error: Some(error),
                    },
                }
            }
        }
    }

    async fn locate(&self, purpose: LocationPurpose) -> SystemEvent {
        match self.locator.locate().await {
            Ok(location) => SystemEvent::LocationResolved { purpose, location },
            Err(error) => SystemEvent::LocationFailed { purpose, error },
        }
    }
}

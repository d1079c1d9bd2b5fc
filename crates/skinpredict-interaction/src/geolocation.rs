//! Geolocation providers.
//!
//! A terminal has no permission prompt, so "where is the user" is answered
//! either by an IP lookup or by a location pinned in the config.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use skinpredict_core::config::{DEFAULT_GEOLOCATION_URL, SkinPredictConfig};
use skinpredict_core::gateway::GeolocationProvider;
use skinpredict_core::location::{Coordinates, LocationError, UserLocation};

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    #[serde(default)]
    country_name: Option<String>,
    #[serde(default)]
    city: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    /// ipapi.co sets this on rate limiting and reserved ranges.
    #[serde(default)]
    error: bool,
    #[serde(default)]
    reason: Option<String>,
}

/// Looks the user up by public IP (`GET https://ipapi.co/json/`).
#[derive(Clone)]
pub struct IpApiLocator {
    client: Client,
    url: String,
    timeout: Duration,
}

impl Default for IpApiLocator {
    fn default() -> Self {
        Self::new(DEFAULT_GEOLOCATION_URL)
    }
}

impl IpApiLocator {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            url: url.into(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn from_config(config: &SkinPredictConfig) -> Self {
        Self {
            timeout: Duration::from_secs(config.request_timeout_secs),
            ..Self::new(&config.geolocation_url)
        }
    }
}

#[async_trait]
impl GeolocationProvider for IpApiLocator {
    async fn locate(&self) -> Result<UserLocation, LocationError> {
        let response = self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| LocationError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LocationError::Unavailable(format!(
                "geolocation service returned {}",
                status
            )));
        }

        let body: IpApiResponse = response
            .json()
            .await
            .map_err(|e| LocationError::Unavailable(e.to_string()))?;

        if body.error {
            return Err(LocationError::Unavailable(
                body.reason.unwrap_or_else(|| "lookup refused".to_string()),
            ));
        }

        match (body.latitude, body.longitude) {
            (Some(lat), Some(lng)) => {
                tracing::debug!(
                    "[Geolocation] resolved {:?}/{:?}",
                    body.city,
                    body.country_name
                );
                Ok(UserLocation {
                    coordinates: Coordinates::new(lat, lng),
                    country: body.country_name,
                    city: body.city,
                })
            }
            _ => Err(LocationError::Unavailable(
                "response had no coordinates".to_string(),
            )),
        }
    }
}

/// Always answers with the same point.
#[derive(Debug, Clone)]
pub struct FixedLocator {
    location: UserLocation,
}

impl FixedLocator {
    pub fn new(location: UserLocation) -> Self {
        Self { location }
    }

    pub fn at(coordinates: Coordinates) -> Self {
        Self::new(UserLocation::at(coordinates))
    }
}

#[async_trait]
impl GeolocationProvider for FixedLocator {
    async fn locate(&self) -> Result<UserLocation, LocationError> {
        Ok(self.location.clone())
    }
}

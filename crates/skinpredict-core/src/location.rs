//! Location types shared by the geolocation provider and catalog lookups.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::PriceTier;

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A resolved user location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserLocation {
    pub coordinates: Coordinates,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
}

impl UserLocation {
    pub fn at(coordinates: Coordinates) -> Self {
        Self {
            coordinates,
            country: None,
            city: None,
        }
    }
}

/// Why the assistant asked for the user's location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocationPurpose {
    Dermatologists,
    Products { tier: Option<PriceTier> },
}

/// Failure to obtain a location.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("location lookup not supported")]
    Unsupported,
    #[error("location unavailable: {0}")]
    Unavailable(String),
}

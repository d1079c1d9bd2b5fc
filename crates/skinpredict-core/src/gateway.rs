//! Remote service seams: the analysis backend and geolocation.
//!
//! The application layer only talks to these traits. Implementations live in
//! `skinpredict-interaction`.

use async_trait::async_trait;
use thiserror::Error;

use crate::analysis::{SkinAnalysisResult, UserProfile};
use crate::catalog::{DermatologistResult, NearbyProductsResponse, NearbyStore, ProductRecommendation};
use crate::location::{LocationError, UserLocation};

/// Failure of a remote call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    /// Connection refused, timeout, DNS, ...
    #[error("transport error: {message}")]
    Transport { message: String, retryable: bool },

    /// Non-success HTTP status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Body could not be decoded into the expected shape.
    #[error("failed to decode response: {0}")]
    Decode(String),

    /// The service answered but refused the request (e.g. email not sent).
    #[error("request rejected: {0}")]
    Rejected(String),
}

impl GatewayError {
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::Transport { retryable, .. } => *retryable,
            GatewayError::Status { status, .. } => *status >= 500,
            GatewayError::Decode(_) | GatewayError::Rejected(_) => false,
        }
    }
}

/// Catalog search parameters around a point.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbySearch {
    pub lat: f64,
    pub lng: f64,
    pub radius_m: u32,
    pub profile: UserProfile,
}

/// The analysis backend and its auxiliary lookups.
///
/// Catalog and store lookups never fail: implementations fall back to a
/// local dataset filtered by the profile (or an empty list for stores).
#[async_trait]
pub trait SkinServiceGateway: Send + Sync {
    /// Classifies a base64-encoded face image (no data-URL prefix).
    async fn analyze(
        &self,
        image_base64: &str,
        use_groq: bool,
    ) -> Result<SkinAnalysisResult, GatewayError>;

    /// Emails the analysis to `address`.
    ///
    /// Returns `Ok(false)` when the service answered without confirming delivery.
    async fn send_email(
        &self,
        address: &str,
        result: &SkinAnalysisResult,
    ) -> Result<bool, GatewayError>;

    async fn find_dermatologists(
        &self,
        lat: f64,
        lng: f64,
    ) -> Result<Vec<DermatologistResult>, GatewayError>;

    async fn find_nearby_products(&self, search: &NearbySearch) -> NearbyProductsResponse;

    async fn find_nearby_stores(
        &self,
        lat: f64,
        lng: f64,
        radius_m: u32,
        product_type: Option<&str>,
    ) -> Vec<NearbyStore>;

    /// Online catalog for a country, filtered by profile.
    async fn get_product_recommendations(
        &self,
        country: Option<&str>,
        profile: &UserProfile,
    ) -> Vec<ProductRecommendation>;
}

/// Resolves where the user is.
#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    async fn locate(&self) -> Result<UserLocation, LocationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        let timeout = GatewayError::Transport {
            message: "timed out".into(),
            retryable: true,
        };
        assert!(timeout.is_retryable());
        assert!(
            GatewayError::Status {
                status: 503,
                message: "busy".into()
            }
            .is_retryable()
        );
        assert!(
            !GatewayError::Status {
                status: 400,
                message: "bad image".into()
            }
            .is_retryable()
        );
        assert!(!GatewayError::Rejected("no".into()).is_retryable());
    }

    #[test]
    fn test_converts_into_skin_error() {
        let err: crate::SkinError = GatewayError::Decode("eof".into()).into();
        assert!(err.to_string().contains("failed to decode response"));
    }
}

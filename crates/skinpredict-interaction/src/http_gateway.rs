//! HTTP client for the SkinPredict analysis backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use skinpredict_core::analysis::{SkinAnalysisResult, UserProfile};
use skinpredict_core::catalog::{
    DermatologistResult, Localization, NearbyProductsResponse, NearbyStore, PriceTierThresholds,
    ProductRecommendation,
};
use skinpredict_core::config::SkinPredictConfig;
use skinpredict_core::gateway::{GatewayError, NearbySearch, SkinServiceGateway};

use crate::mock_catalog;

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    image: &'a str,
    use_groq: bool,
}

#[derive(Debug, Serialize)]
struct EmailRequest<'a> {
    email: &'a str,
    results: &'a SkinAnalysisResult,
}

#[derive(Debug, Deserialize)]
struct EmailResponse {
    #[serde(default)]
    success: bool,
}

#[derive(Debug, Deserialize)]
struct PlacesResponse {
    #[serde(default)]
    results: Vec<DermatologistResult>,
}

/// `SkinServiceGateway` over the backend's REST endpoints.
#[derive(Clone)]
pub struct HttpSkinGateway {
    client: Client,
    base_url: String,
    timeout: Duration,
    localization: Localization,
    thresholds: PriceTierThresholds,
}

impl HttpSkinGateway {
    /// Creates a gateway for the backend at `base_url` (no trailing path).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            localization: Localization::default(),
            thresholds: PriceTierThresholds::default(),
        }
    }

    pub fn from_config(config: &SkinPredictConfig) -> Self {
        Self::new(&config.api_base_url)
            .with_timeout(Duration::from_secs(config.request_timeout_secs))
            .with_pricing(config.localization.clone(), config.price_tiers.clone())
    }

    /// Sets the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Currency and tier thresholds used when the bundled catalog stands in.
    pub fn with_pricing(mut self, localization: Localization, thresholds: PriceTierThresholds) -> Self {
        self.localization = localization;
        self.thresholds = thresholds;
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, GatewayError> {
        let response = request
            .timeout(self.timeout)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(GatewayError::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| GatewayError::Decode(e.to_string()))
    }

    fn fallback_nearby(&self, profile: &UserProfile) -> NearbyProductsResponse {
        NearbyProductsResponse::from_catalog(
            mock_catalog::products_for(profile),
            &self.localization,
            &self.thresholds,
        )
    }
}

fn transport_error(err: reqwest::Error) -> GatewayError {
    GatewayError::Transport {
        retryable: err.is_timeout() || err.is_connect(),
        message: err.to_string(),
    }
}

/// Profile filters as query pairs; issues repeat the `skinIssues` key.
fn profile_query(profile: &UserProfile) -> Vec<(&'static str, String)> {
    let mut query = vec![("skinType", profile.skin_type.clone())];
    for issue in &profile.skin_issues {
        query.push(("skinIssues", issue.clone()));
    }
    if let Some(gender) = &profile.gender {
        query.push(("gender", gender.clone()));
    }
    if let Some(age_group) = &profile.age_group {
        query.push(("ageGroup", age_group.clone()));
    }
    query
}

#[async_trait]
impl SkinServiceGateway for HttpSkinGateway {
    async fn analyze(
        &self,
        image_base64: &str,
        use_groq: bool,
    ) -> Result<SkinAnalysisResult, GatewayError> {
        tracing::debug!(
            "[SkinGateway] analyze: {} bytes of image data, use_groq={}",
            image_base64.len(),
            use_groq
        );
        let request = self.client.post(self.url("/analyze")).json(&AnalyzeRequest {
            image: image_base64,
            use_groq,
        });
        self.send_json(request).await
    }

    async fn send_email(
        &self,
        address: &str,
        result: &SkinAnalysisResult,
    ) -> Result<bool, GatewayError> {
        let request = self.client.post(self.url("/send-email")).json(&EmailRequest {
            email: address,
            results: result,
        });
        let response: EmailResponse = self.send_json(request).await?;
        Ok(response.success)
    }

    async fn find_dermatologists(
        &self,
        lat: f64,
        lng: f64,
    ) -> Result<Vec<DermatologistResult>, GatewayError> {
        let request = self
            .client
            .get(self.url("/find-dermatologists"))
            .query(&[("lat", lat.to_string()), ("lng", lng.to_string())]);
        let response: PlacesResponse = self.send_json(request).await?;
        tracing::debug!(
            "[SkinGateway] find_dermatologists: {} result(s)",
            response.results.len()
        );
        Ok(response.results)
    }

    async fn find_nearby_products(&self, search: &NearbySearch) -> NearbyProductsResponse {
        let mut query = vec![
            ("lat", search.lat.to_string()),
            ("lng", search.lng.to_string()),
            ("radius", search.radius_m.to_string()),
        ];
        query.extend(profile_query(&search.profile));

        let request = self.client.get(self.url("/nearby-products")).query(&query);
        match self.send_json::<NearbyProductsResponse>(request).await {
            Ok(response) => response.normalized(),
            Err(e) => {
                tracing::warn!(
                    "[SkinGateway] nearby-products failed, using bundled catalog: {}",
                    e
                );
                self.fallback_nearby(&search.profile)
            }
        }
    }

    async fn find_nearby_stores(
        &self,
        lat: f64,
        lng: f64,
        radius_m: u32,
        product_type: Option<&str>,
    ) -> Vec<NearbyStore> {
        let query = [
            ("lat", lat.to_string()),
            ("lng", lng.to_string()),
            ("radius", radius_m.to_string()),
            ("product_type", product_type.unwrap_or("skincare").to_string()),
        ];
        let request = self.client.get(self.url("/nearby-stores")).query(&query);
        match self.send_json::<Vec<NearbyStore>>(request).await {
            Ok(stores) => stores,
            Err(e) => {
                tracing::warn!("[SkinGateway] nearby-stores failed: {}", e);
                Vec::new()
            }
        }
    }

    async fn get_product_recommendations(
        &self,
        country: Option<&str>,
        profile: &UserProfile,
    ) -> Vec<ProductRecommendation> {
        let mut query = Vec::new();
        if let Some(country) = country {
            query.push(("country", country.to_string()));
        }
        query.extend(profile_query(profile));

        let request = self
            .client
            .get(self.url("/product-recommendations"))
            .query(&query);
        match self.send_json::<Vec<ProductRecommendation>>(request).await {
            Ok(products) => products,
            Err(e) => {
                tracing::warn!(
                    "[SkinGateway] product-recommendations failed, using bundled catalog: {}",
                    e
                );
                mock_catalog::products_for(profile)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_query_repeats_issue_key() {
        let profile = UserProfile {
            skin_type: "Oily".into(),
            skin_issues: vec!["Acne".into(), "Redness".into()],
            gender: Some("Female".into()),
            age_group: None,
        };
        let query = profile_query(&profile);
        assert_eq!(
            query,
            vec![
                ("skinType", "Oily".to_string()),
                ("skinIssues", "Acne".to_string()),
                ("skinIssues", "Redness".to_string()),
                ("gender", "Female".to_string()),
            ]
        );
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let gateway = HttpSkinGateway::new("http://localhost:5000/");
        assert_eq!(gateway.url("/analyze"), "http://localhost:5000/analyze");
    }
}

use serde::{Deserialize, Serialize};

use super::tier::{Localization, PriceTier, PriceTierThresholds};
use crate::location::Coordinates;

/// A catalog product with its applicability filters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecommendation {
    pub name: String,
    pub brand: String,
    /// Decimal price as sent by the backend, e.g. "14.99".
    pub price: String,
    #[serde(default)]
    pub currency: String,
    #[serde(default)]
    pub link: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default)]
    pub description: String,
    /// "Male", "Female" or "All".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_age_range: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub for_skin_type: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub for_skin_issues: Option<Vec<String>>,
}

impl ProductRecommendation {
    pub fn price_value(&self) -> Option<f64> {
        self.price.trim().parse().ok()
    }
}

/// A beauty or skincare store near the user.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NearbyStore {
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub location: Coordinates,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub user_ratings_total: u32,
    #[serde(default)]
    pub place_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_now: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub store_type: String,
    #[serde(default)]
    pub products_available: Vec<String>,
}

/// A catalog product annotated with its price tier and where to buy it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyProduct {
    #[serde(flatten)]
    pub product: ProductRecommendation,
    pub price_category: PriceTier,
    #[serde(default)]
    pub nearby_stores: Vec<NearbyStore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_photo_url: Option<String>,
}

/// Products bucketed by price tier.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GroupedByPrice {
    #[serde(rename = "Budget", default)]
    pub budget: Vec<NearbyProduct>,
    #[serde(rename = "Moderate", default)]
    pub moderate: Vec<NearbyProduct>,
    #[serde(rename = "Premium", default)]
    pub premium: Vec<NearbyProduct>,
}

impl GroupedByPrice {
    pub fn from_products<'a>(products: impl IntoIterator<Item = &'a NearbyProduct>) -> Self {
        let mut grouped = Self::default();
        for product in products {
            grouped.bucket_mut(product.price_category).push(product.clone());
        }
        grouped
    }

    pub fn tier(&self, tier: PriceTier) -> &[NearbyProduct] {
        match tier {
            PriceTier::Budget => &self.budget,
            PriceTier::Moderate => &self.moderate,
            PriceTier::Premium => &self.premium,
        }
    }

    fn bucket_mut(&mut self, tier: PriceTier) -> &mut Vec<NearbyProduct> {
        match tier {
            PriceTier::Budget => &mut self.budget,
            PriceTier::Moderate => &mut self.moderate,
            PriceTier::Premium => &mut self.premium,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.budget.is_empty() && self.moderate.is_empty() && self.premium.is_empty()
    }
}

/// Response of the nearby-products lookup.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyProductsResponse {
    #[serde(default)]
    pub products: Vec<NearbyProduct>,
    #[serde(default)]
    pub grouped_by_price: GroupedByPrice,
    #[serde(default)]
    pub nearby_stores: Vec<NearbyStore>,
}

impl NearbyProductsResponse {
    /// Builds a grouped response from plain catalog items, localizing
    /// prices and assigning tiers.
    pub fn from_catalog(
        products: Vec<ProductRecommendation>,
        localization: &Localization,
        thresholds: &PriceTierThresholds,
    ) -> Self {
        let products: Vec<NearbyProduct> = products
            .into_iter()
            .map(|mut product| {
                localization.localize(&mut product);
                let price_category = localization.tier_of(&product, thresholds);
                NearbyProduct {
                    product,
                    price_category,
                    nearby_stores: Vec::new(),
                    store_photo_url: None,
                }
            })
            .collect();

        Self {
            grouped_by_price: GroupedByPrice::from_products(&products),
            products,
            nearby_stores: Vec::new(),
        }
    }

    /// Rebuilds the tier buckets when the backend sent products without them.
    pub fn normalized(mut self) -> Self {
        if self.grouped_by_price.is_empty() && !self.products.is_empty() {
            self.grouped_by_price = GroupedByPrice::from_products(&self.products);
        }
        self
    }

    pub fn tier(&self, tier: PriceTier) -> &[NearbyProduct] {
        self.grouped_by_price.tier(tier)
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty() && self.grouped_by_price.is_empty()
    }
}

/// A dermatologist practice from the places lookup.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DermatologistResult {
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default)]
    pub vicinity: String,
    #[serde(default)]
    pub place_id: String,
}

//! Price tiers and currency localization.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use super::model::ProductRecommendation;

/// Budget/Moderate/Premium bucketing of catalog items.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
pub enum PriceTier {
    Budget,
    Moderate,
    Premium,
}

impl PriceTier {
    pub fn icon(&self) -> &'static str {
        match self {
            PriceTier::Budget => "💚",
            PriceTier::Moderate => "💛",
            PriceTier::Premium => "💎",
        }
    }
}

/// Upper bounds (inclusive, in USD) of the lower two tiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceTierThresholds {
    pub budget_max: f64,
    pub moderate_max: f64,
}

impl Default for PriceTierThresholds {
    fn default() -> Self {
        Self {
            budget_max: 20.0,
            moderate_max: 50.0,
        }
    }
}

impl PriceTierThresholds {
    pub fn classify(&self, price_usd: f64) -> PriceTier {
        if price_usd <= self.budget_max {
            PriceTier::Budget
        } else if price_usd <= self.moderate_max {
            PriceTier::Moderate
        } else {
            PriceTier::Premium
        }
    }
}

/// Display currency and its rate against USD.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Localization {
    pub currency: String,
    /// Units of `currency` per 1 USD.
    pub rate_from_usd: f64,
}

impl Default for Localization {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            rate_from_usd: 1.0,
        }
    }
}

impl Localization {
    fn is_usd(currency: &str) -> bool {
        currency.is_empty() || currency.eq_ignore_ascii_case("USD")
    }

    /// Converts an amount in `currency` to USD. Unknown currencies pass through.
    pub fn to_usd(&self, amount: f64, currency: &str) -> f64 {
        if Self::is_usd(currency) {
            amount
        } else if currency.eq_ignore_ascii_case(&self.currency) && self.rate_from_usd > 0.0 {
            amount / self.rate_from_usd
        } else {
            amount
        }
    }

    /// Re-prices a USD-tagged (or untagged) product into the display currency.
    pub fn localize(&self, product: &mut ProductRecommendation) {
        if Self::is_usd(&self.currency) {
            if product.currency.is_empty() {
                product.currency = "USD".to_string();
            }
            return;
        }
        if !Self::is_usd(&product.currency) {
            return;
        }
        if let Some(price) = product.price_value() {
            product.price = format!("{:.2}", price * self.rate_from_usd);
        }
        product.currency = self.currency.clone();
    }

    /// Tier of a product after converting its price to USD.
    pub fn tier_of(&self, product: &ProductRecommendation, thresholds: &PriceTierThresholds) -> PriceTier {
        let usd = product
            .price_value()
            .map(|price| self.to_usd(price, &product.currency))
            .unwrap_or(0.0);
        thresholds.classify(usd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn product(price: &str, currency: &str) -> ProductRecommendation {
        ProductRecommendation {
            name: "Cleanser".to_string(),
            brand: "Brand".to_string(),
            price: price.to_string(),
            currency: currency.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_classify_boundaries() {
        let thresholds = PriceTierThresholds::default();
        assert_eq!(thresholds.classify(20.0), PriceTier::Budget);
        assert_eq!(thresholds.classify(20.01), PriceTier::Moderate);
        assert_eq!(thresholds.classify(50.0), PriceTier::Moderate);
        assert_eq!(thresholds.classify(85.0), PriceTier::Premium);
    }

    #[test]
    fn test_localize_converts_usd_prices() {
        let localization = Localization {
            currency: "TND".to_string(),
            rate_from_usd: 3.1,
        };
        let mut item = product("10.00", "USD");
        localization.localize(&mut item);
        assert_eq!(item.currency, "TND");
        assert_eq!(item.price, "31.00");

        // Already local: untouched, and tiers compare in USD.
        let mut local = product("49.90", "TND");
        localization.localize(&mut local);
        assert_eq!(local.price, "49.90");
        assert_eq!(
            localization.tier_of(&local, &PriceTierThresholds::default()),
            PriceTier::Budget
        );
    }

    #[test]
    fn test_tier_display_and_parse() {
        assert_eq!(PriceTier::Premium.to_string(), "Premium");
        assert_eq!(PriceTier::from_str("Budget").unwrap(), PriceTier::Budget);
    }
}

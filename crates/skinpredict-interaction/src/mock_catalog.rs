//! Bundled product list used when the backend catalog is unreachable.
//!
//! Prices are USD unless tagged otherwise. Callers localize and bucket them.

use skinpredict_core::analysis::UserProfile;
use skinpredict_core::catalog::{ProductRecommendation, filter_catalog};

struct Entry {
    name: &'static str,
    brand: &'static str,
    price: &'static str,
    currency: &'static str,
    link: &'static str,
    description: &'static str,
    target_gender: &'static str,
    target_age_range: &'static [&'static str],
    for_skin_type: &'static [&'static str],
    for_skin_issues: &'static [&'static str],
}

const CATALOG: &[Entry] = &[
    Entry {
        name: "Hydrating Facial Cleanser",
        brand: "CeraVe",
        price: "14.99",
        currency: "USD",
        link: "https://www.cerave.com/skincare/cleansers/hydrating-facial-cleanser",
        description: "Gentle, moisturizing cleanser with ceramides and hyaluronic acid",
        target_gender: "All",
        target_age_range: &["20-29", "30-39", "40-49", "50-59"],
        for_skin_type: &["Dry", "Normal"],
        for_skin_issues: &[],
    },
    Entry {
        name: "Men's Moisturizing Face Cream",
        brand: "Nivea Men",
        price: "35.00",
        currency: "USD",
        link: "https://www.nivea.tn/produits/nivea-men-creme-hydratante",
        description: "Energizing face moisturizer for men",
        target_gender: "Male",
        target_age_range: &["20-29", "30-39", "40-49"],
        for_skin_type: &["Normal", "Dry"],
        for_skin_issues: &[],
    },
    Entry {
        name: "Effaclar Duo+ Cream",
        brand: "La Roche-Posay",
        price: "85.00",
        currency: "USD",
        link: "https://www.laroche-posay.tn/effaclar/effaclar-duo-creme-anti-imperfections",
        description: "Dual action acne treatment",
        target_gender: "All",
        target_age_range: &["10-19", "20-29"],
        for_skin_type: &["Oily", "Combination"],
        for_skin_issues: &["Acne"],
    },
    Entry {
        name: "Redermic R Anti-Aging Concentrate",
        brand: "La Roche-Posay",
        price: "110.00",
        currency: "USD",
        link: "https://www.laroche-posay.tn/redermic/redermic-r-creme-anti-age-intensif",
        description: "Retinol formula for reducing signs of aging",
        target_gender: "All",
        target_age_range: &["30-39", "40-49", "50-59", "60-69"],
        for_skin_type: &["All"],
        for_skin_issues: &["Wrinkles", "Fine Lines"],
    },
    Entry {
        name: "Argan Oil Face Serum",
        brand: "Tunisie Naturelle",
        price: "49.90",
        currency: "TND",
        link: "https://www.facebook.com/Tunisie.Naturelle/",
        description: "Natural argan oil serum for all skin types - Made in Tunisia with traditional Berber methods",
        target_gender: "All",
        target_age_range: &["20-29", "30-39", "40-49", "50-59"],
        for_skin_type: &["Dry", "Normal", "Combination"],
        for_skin_issues: &["Dryness", "Wrinkles"],
    },
    Entry {
        name: "Ultra Facial Cream",
        brand: "Kiehl's",
        price: "38.00",
        currency: "USD",
        link: "https://www.kiehls.com/skincare/face-moisturizers/ultra-facial-cream/3605970360757.html",
        description: "24-hour moisturizer for all skin types",
        target_gender: "All",
        target_age_range: &[],
        for_skin_type: &["Dry", "Normal"],
        for_skin_issues: &[],
    },
    Entry {
        name: "Oil-Free Moisturizer",
        brand: "Lab Series",
        price: "37.00",
        currency: "USD",
        link: "https://www.labseries.com/product/19791/54538/",
        description: "Lightweight, oil-free hydration for men",
        target_gender: "Male",
        target_age_range: &[],
        for_skin_type: &["Oily", "Combination"],
        for_skin_issues: &[],
    },
];

fn owned(values: &[&str]) -> Option<Vec<String>> {
    (!values.is_empty()).then(|| values.iter().map(|v| v.to_string()).collect())
}

impl Entry {
    fn to_product(&self) -> ProductRecommendation {
        ProductRecommendation {
            name: self.name.to_string(),
            brand: self.brand.to_string(),
            price: self.price.to_string(),
            currency: self.currency.to_string(),
            link: self.link.to_string(),
            image_url: String::new(),
            description: self.description.to_string(),
            target_gender: Some(self.target_gender.to_string()),
            target_age_range: owned(self.target_age_range),
            for_skin_type: owned(self.for_skin_type),
            for_skin_issues: owned(self.for_skin_issues),
        }
    }
}

/// Every bundled product, unfiltered.
pub fn all_products() -> Vec<ProductRecommendation> {
    CATALOG.iter().map(Entry::to_product).collect()
}

/// Bundled products that apply to `profile`.
pub fn products_for(profile: &UserProfile) -> Vec<ProductRecommendation> {
    filter_catalog(all_products(), profile)
}

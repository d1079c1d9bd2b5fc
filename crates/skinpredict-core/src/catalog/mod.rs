//! Product, store and dermatologist catalog value objects.
//!
//! These are read-only at runtime. They come either from the remote
//! gateway or from the static fallback tables in the interaction layer.

mod filter;
mod model;
mod tier;

pub use filter::{filter_catalog, matches_profile};
pub use model::{
    DermatologistResult, GroupedByPrice, NearbyProduct, NearbyProductsResponse, NearbyStore,
    ProductRecommendation,
};
pub use tier::{Localization, PriceTier, PriceTierThresholds};

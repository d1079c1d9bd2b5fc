//! Signed-in user and the authentication seam.
//!
//! # Module Structure
//!
//! - `model`: The signed-in identity (`UserIdentity`)
//! - `service`: Authentication trait (`AuthService`)

mod model;
mod service;

// Re-export public API
pub use model::UserIdentity;
pub use service::AuthService;

//! Domain layer for SkinPredict.
//!
//! Holds the analysis and chat models, the scan session state machine,
//! repository and gateway traits, and the static skincare knowledge base.

pub mod analysis;
pub mod catalog;
pub mod chat;
pub mod config;
pub mod error;
pub mod gateway;
pub mod image;
pub mod knowledge;
pub mod location;
pub mod session;
pub mod user;

// Re-export common error type
pub use error::SkinError;

//! Scan session application services.
//!
//! - `controller`: lifecycle and turn handling for the active session
//! - `effects`: runs dispatcher effects against the gateway and locator

mod controller;
mod effects;

pub use controller::{AnalysisCompletion, AnalysisTicket, ScanSessionController, SessionServices};
pub use effects::EffectRunner;

//! Scan session domain module.
//!
//! # Module Structure
//!
//! - `model`: The live session (`ScanSession`) and its lifecycle (`ScanPhase`)
//! - `context`: Conversation state between turns (`ConversationContext`, `PendingPrompt`)
//! - `history`: Persisted snapshot (`ScanHistoryEntry`)
//! - `repository`: Repository trait for history persistence
//! - `id`: Time-derived session id generator

mod context;
mod history;
mod id;
mod model;
mod repository;

// Re-export public API
pub use context::{ConversationContext, PendingPrompt};
pub use history::ScanHistoryEntry;
pub use id::SessionIdGenerator;
pub use model::{GREETING, ScanPhase, ScanSession};
pub use repository::ScanHistoryRepository;

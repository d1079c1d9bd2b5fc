//! Application layer for SkinPredict.
//!
//! Coordinates the domain model, the remote gateway and history storage:
//! the conversation dispatcher, the scan session controller and the
//! background history writer.

pub mod dispatcher;
pub mod history;
pub mod session;

pub use dispatcher::{DispatchInput, DispatchOutcome, Dispatcher, Effect, Reply, SystemEvent};
pub use history::{HistoryOverview, HistoryRow, HistoryWriter};
pub use session::{
    AnalysisCompletion, AnalysisTicket, EffectRunner, ScanSessionController, SessionServices,
};

//! Scan history services: the debounced writer and the dashboard overview.

mod overview;
mod writer;

pub use overview::{HistoryOverview, HistoryRow};
pub use writer::HistoryWriter;

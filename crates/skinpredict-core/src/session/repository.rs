//! Scan history repository trait.

use super::history::ScanHistoryEntry;
use anyhow::Result;
use async_trait::async_trait;

/// Persistence for scan history entries, one document per scan.
///
/// The application never deletes entries.
#[async_trait]
pub trait ScanHistoryRepository: Send + Sync {
    /// Finds an entry by owner and session id.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(entry))`: Entry found
    /// - `Ok(None)`: No such entry for this user
    /// - `Err(_)`: Error occurred during retrieval
    async fn find_by_id(&self, user_id: &str, session_id: &str) -> Result<Option<ScanHistoryEntry>>;

    /// Creates or overwrites an entry. Implementations set `updated_at`.
    async fn save(&self, entry: &ScanHistoryEntry) -> Result<()>;

    /// Lists a user's entries, newest first.
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<ScanHistoryEntry>>;
}

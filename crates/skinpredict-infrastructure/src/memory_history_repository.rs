//! In-memory ScanHistoryRepository for ephemeral runs.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use skinpredict_core::session::{ScanHistoryEntry, ScanHistoryRepository};
use tokio::sync::RwLock;

/// History kept only for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryHistoryRepository {
    entries: RwLock<HashMap<(String, String), ScanHistoryEntry>>,
}

impl MemoryHistoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl ScanHistoryRepository for MemoryHistoryRepository {
    async fn find_by_id(&self, user_id: &str, session_id: &str) -> Result<Option<ScanHistoryEntry>> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(&(user_id.to_string(), session_id.to_string()))
            .cloned())
    }

    async fn save(&self, entry: &ScanHistoryEntry) -> Result<()> {
        let mut stamped = entry.clone();
        stamped.updated_at = chrono::Utc::now().to_rfc3339();
        self.entries.write().await.insert(
            (entry.user_id.clone(), entry.session_id.clone()),
            stamped,
        );
        Ok(())
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<ScanHistoryEntry>> {
        let entries = self.entries.read().await;
        let mut list: Vec<ScanHistoryEntry> = entries
            .values()
            .filter(|entry| entry.user_id == user_id)
            .cloned()
            .collect();
        list.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.session_id.cmp(&a.session_id))
        });
        Ok(list)
    }
}

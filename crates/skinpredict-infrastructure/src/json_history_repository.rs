//! Directory-backed ScanHistoryRepository implementation.
//!
//! Each entry is one JSON document at `<root>/<user_id>/<session_id>.json`,
//! replaced atomically on every save.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use skinpredict_core::session::{ScanHistoryEntry, ScanHistoryRepository};
use tokio::fs;

use crate::storage::AtomicJsonFile;

/// Scan history stored as one JSON file per scan.
#[derive(Debug, Clone)]
pub struct JsonHistoryRepository {
    root: PathBuf,
}

impl JsonHistoryRepository {
    /// Creates a repository rooted at `root` (usually `SkinPaths::history_dir`).
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn user_dir(&self, user_id: &str) -> PathBuf {
        self.root.join(sanitize_component(user_id))
    }

    fn entry_file(&self, user_id: &str, session_id: &str) -> AtomicJsonFile<ScanHistoryEntry> {
        let file_name = format!("{}.json", sanitize_component(session_id));
        AtomicJsonFile::new(self.user_dir(user_id).join(file_name))
    }
}

/// Keeps ids from escaping their directory.
fn sanitize_component(id: &str) -> String {
    let cleaned: String = id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '@') {
                c
            } else {
                '_'
            }
        })
        .collect();
    match cleaned.trim_matches('.') {
        "" => "_".to_string(),
        trimmed => trimmed.to_string(),
    }
}

#[async_trait]
impl ScanHistoryRepository for JsonHistoryRepository {
    async fn find_by_id(&self, user_id: &str, session_id: &str) -> Result<Option<ScanHistoryEntry>> {
        let file = self.entry_file(user_id, session_id);
        let entry = file.load().await?;
        // Documents belong to the directory they live in.
        Ok(entry.filter(|e| e.user_id == user_id))
    }

    async fn save(&self, entry: &ScanHistoryEntry) -> Result<()> {
        let mut stamped = entry.clone();
        stamped.updated_at = chrono::Utc::now().to_rfc3339();

        let file = self.entry_file(&entry.user_id, &entry.session_id);
        file.save(&stamped)
            .await
            .with_context(|| format!("Failed to save scan '{}'", entry.session_id))?;

        tracing::debug!(
            "[JsonHistoryRepository] Saved {} ({} messages)",
            entry.session_id,
            entry.messages.len()
        );
        Ok(())
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<ScanHistoryEntry>> {
        let dir = self.user_dir(user_id);
        let mut read_dir = match fs::read_dir(&dir).await {
            Ok(read_dir) => read_dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", dir.display()));
            }
        };

        let mut entries = Vec::new();
        while let Some(item) = read_dir.next_entry().await? {
            let path = item.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }

            let file: AtomicJsonFile<ScanHistoryEntry> = AtomicJsonFile::new(&path);
            match file.load().await {
                Ok(Some(entry)) if entry.user_id == user_id => entries.push(entry),
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(
                        "[JsonHistoryRepository] Skipping unreadable entry {}: {:#}",
                        path.display(),
                        e
                    );
                }
            }
        }

        // Newest first; ids break ties so the order is stable.
        entries.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.session_id.cmp(&a.session_id))
        });
        Ok(entries)
    }
}

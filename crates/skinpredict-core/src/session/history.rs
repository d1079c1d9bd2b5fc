//! Persisted scan history documents.

use serde::{Deserialize, Serialize};

use crate::analysis::SkinAnalysisResult;
use crate::chat::ChatMessage;

/// One stored scan: the analysis plus its conversation.
///
/// Written whole on every save. The store stamps `updated_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanHistoryEntry {
    #[serde(rename = "scanId")]
    pub session_id: String,
    pub user_id: String,
    /// Timestamp when the scan completed (ISO 8601 format)
    pub created_at: String,
    /// Timestamp of the last write (ISO 8601 format)
    pub updated_at: String,
    #[serde(rename = "skinResults")]
    pub analysis: SkinAnalysisResult,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
}

impl ScanHistoryEntry {
    pub fn skin_type(&self) -> &str {
        &self.analysis.skin_type.kind
    }

    pub fn issue_count(&self) -> usize {
        self.analysis.skin_issues.len()
    }

    pub fn last_message_preview(&self, max_chars: usize) -> Option<String> {
        self.messages.last().map(|message| message.preview(max_chars))
    }
}

//! Scan session domain model.
//!
//! A `ScanSession` is the live conversation around one analysis. It is owned
//! exclusively by the session controller; everything else gets snapshots.

use serde::{Deserialize, Serialize};
use strum::Display;

use super::context::ConversationContext;
use super::history::ScanHistoryEntry;
use crate::analysis::SkinAnalysisResult;
use crate::chat::ChatMessage;
use crate::error::{Result, SkinError};

pub const GREETING: &str = "Hello! I am Hasna, your dermatology assistant. I can help analyze your skin and provide personalized skincare recommendations.";

/// Lifecycle phase of the active session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum ScanPhase {
    Idle,
    Capturing,
    Analyzing,
    Ready,
    Superseded,
}

impl ScanPhase {
    /// Whether `self -> next` is a legal lifecycle step.
    ///
    /// Loading a stored scan is not listed here: it replaces the session
    /// from any phase.
    pub fn can_transition_to(self, next: ScanPhase) -> bool {
        use ScanPhase::*;
        matches!(
            (self, next),
            (Idle | Ready | Superseded, Capturing)
                | (Capturing, Analyzing)
                | (Capturing, Idle)
                | (Analyzing, Ready)
                | (Analyzing, Idle)
                | (Ready, Superseded)
                | (Superseded, Idle)
        )
    }
}

/// The active scan and its chat log.
///
/// The log always starts with an assistant message.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanSession {
    session_id: Option<String>,
    phase: ScanPhase,
    analysis: Option<SkinAnalysisResult>,
    messages: Vec<ChatMessage>,
    is_historical_replay: bool,
    created_at: Option<String>,
    pub context: ConversationContext,
}

impl Default for ScanSession {
    fn default() -> Self {
        Self::fresh()
    }
}

impl ScanSession {
    /// An idle session holding only the greeting.
    pub fn fresh() -> Self {
        Self {
            session_id: None,
            phase: ScanPhase::Idle,
            analysis: None,
            messages: vec![Self::greeting()],
            is_historical_replay: false,
            created_at: None,
            context: ConversationContext::default(),
        }
    }

    pub fn greeting() -> ChatMessage {
        ChatMessage::assistant(GREETING, false, Vec::new())
    }

    /// Rebuilds a read-only session from a stored entry.
    pub fn replay(entry: ScanHistoryEntry) -> Self {
        let mut messages = entry.messages;
        if messages.first().is_none_or(|first| !first.is_assistant()) {
            messages.insert(0, Self::greeting());
        }
        Self {
            session_id: Some(entry.session_id),
            phase: ScanPhase::Ready,
            analysis: Some(entry.analysis),
            messages,
            is_historical_replay: true,
            created_at: Some(entry.created_at),
            context: ConversationContext::default(),
        }
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    pub fn phase(&self) -> ScanPhase {
        self.phase
    }

    pub fn analysis(&self) -> Option<&SkinAnalysisResult> {
        self.analysis.as_ref()
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_historical_replay(&self) -> bool {
        self.is_historical_replay
    }

    pub fn has_scan_results(&self) -> bool {
        self.analysis.is_some()
    }

    /// Only freshly scanned sessions are mirrored to storage.
    pub fn is_persistable(&self) -> bool {
        !self.is_historical_replay && self.analysis.is_some() && self.session_id.is_some()
    }

    /// Moves to `next`, rejecting steps the lifecycle does not allow.
    pub fn transition(&mut self, next: ScanPhase) -> Result<()> {
        if !self.phase.can_transition_to(next) {
            return Err(SkinError::invalid_state(format!(
                "cannot move scan session from {} to {}",
                self.phase, next
            )));
        }
        self.phase = next;
        Ok(())
    }

    /// Resets to an idle greeting-only log; keeps nothing from the old scan.
    pub fn reset(&mut self) {
        *self = Self::fresh();
    }

    /// Installs a completed analysis. `summary` becomes the first message.
    pub fn attach_analysis(
        &mut self,
        session_id: String,
        analysis: SkinAnalysisResult,
        summary: ChatMessage,
    ) -> Result<()> {
        self.transition(ScanPhase::Ready)?;
        self.session_id = Some(session_id);
        self.analysis = Some(analysis);
        self.messages = vec![summary];
        self.is_historical_replay = false;
        self.created_at = Some(chrono::Utc::now().to_rfc3339());
        self.context = ConversationContext::default();
        Ok(())
    }

    /// Borrows the analysis alongside a mutable conversation context.
    pub fn split_context(&mut self) -> (Option<&SkinAnalysisResult>, &mut ConversationContext) {
        (self.analysis.as_ref(), &mut self.context)
    }

    pub fn push_message(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Snapshot for persistence; `None` for replays and unscanned sessions.
    pub fn to_history_entry(&self, user_id: &str) -> Option<ScanHistoryEntry> {
        if !self.is_persistable() {
            return None;
        }
        let session_id = self.session_id.clone()?;
        let analysis = self.analysis.clone()?;
        let created_at = self
            .created_at
            .clone()
            .unwrap_or_else(|| chrono::Utc::now().to_rfc3339());
        Some(ScanHistoryEntry {
            session_id,
            user_id: user_id.to_string(),
            updated_at: created_at.clone(),
            created_at,
            analysis,
            messages: self.messages.clone(),
        })
    }
}

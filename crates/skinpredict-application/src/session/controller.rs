//! Scan session controller.
//!
//! Owns the active `ScanSession` and drives it through capture, analysis and
//! conversation. Each user turn runs the dispatcher until it produces a
//! reply, executing effects in between, then queues a history snapshot.

use std::sync::Arc;
use std::time::Duration;

use skinpredict_core::analysis::SkinAnalysisResult;
use skinpredict_core::chat::ChatMessage;
use skinpredict_core::config::SkinPredictConfig;
use skinpredict_core::error::{Result, SkinError};
use skinpredict_core::gateway::{GatewayError, GeolocationProvider, SkinServiceGateway};
use skinpredict_core::image::ImagePayload;
use skinpredict_core::knowledge::KnowledgeBase;
use skinpredict_core::session::{
    ScanHistoryEntry, ScanHistoryRepository, ScanPhase, ScanSession, SessionIdGenerator,
};

use super::effects::EffectRunner;
use crate::dispatcher::{
    DispatchInput, DispatchOutcome, Dispatcher, Reply, SystemEvent, TurnState, replies,
};
use crate::history::{HistoryOverview, HistoryWriter};

/// Upper bound on effects per turn.
const MAX_EFFECTS_PER_TURN: usize = 8;

const ANALYSIS_FAILED: &str = "I couldn't analyze that photo. Please try again with a clear, well-lit picture of your face, looking straight at the camera.";

/// Collaborators injected into the controller.
#[derive(Clone)]
pub struct SessionServices {
    pub gateway: Arc<dyn SkinServiceGateway>,
    pub locator: Arc<dyn GeolocationProvider>,
    pub repository: Arc<dyn ScanHistoryRepository>,
    pub knowledge: Arc<KnowledgeBase>,
}

/// Identifies one analysis request. Only the newest ticket is honored.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisTicket {
    generation: u64,
    image: ImagePayload,
}

impl AnalysisTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn image(&self) -> &ImagePayload {
        &self.image
    }
}

/// What `complete_analysis` did with an outcome.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisCompletion {
    /// Results attached; the session is `Ready`.
    Ready { session_id: String },
    /// The analysis failed; the session is back to `Idle`.
    Failed(GatewayError),
    /// The session moved on while the request was in flight.
    Stale,
}

/// Drives the active scan session.
pub struct ScanSessionController {
    session: ScanSession,
    /// Bumped whenever the active session is replaced.
    generation: u64,
    dispatcher: Dispatcher,
    effects: EffectRunner,
    gateway: Arc<dyn SkinServiceGateway>,
    repository: Arc<dyn ScanHistoryRepository>,
    writer: HistoryWriter,
    ids: SessionIdGenerator,
    user_id: Option<String>,
    use_groq: bool,
}

impl ScanSessionController {
    /// Creates a controller with a fresh session.
    ///
    /// Must be called inside a tokio runtime: it spawns the history writer.
    pub fn new(services: SessionServices, config: &SkinPredictConfig) -> Self {
        let writer = HistoryWriter::spawn(
            services.repository.clone(),
            Duration::from_millis(config.persist_debounce_ms),
        );
        Self {
            session: ScanSession::fresh(),
            generation: 0,
            dispatcher: Dispatcher::from_config(services.knowledge, config),
            effects: EffectRunner::new(
                services.gateway.clone(),
                services.locator,
                config.search_radius_m,
            ),
            gateway: services.gateway,
            repository: services.repository,
            writer,
            ids: SessionIdGenerator::default(),
            user_id: None,
            use_groq: config.use_groq,
        }
    }

    /// Sets the signed-in user. Changing users starts over with a fresh session.
    pub fn set_user(&mut self, user_id: Option<String>) {
        if self.user_id != user_id {
            self.user_id = user_id;
            self.replace_session(ScanSession::fresh());
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    /// Read-only view of the active session.
    pub fn session(&self) -> &ScanSession {
        &self.session
    }

    pub fn messages(&self) -> &[ChatMessage] {
        self.session.messages()
    }

    pub fn phase(&self) -> ScanPhase {
        self.session.phase()
    }

    pub fn has_scan_results(&self) -> bool {
        self.session.has_scan_results()
    }

    /// Chips offered by the latest assistant message.
    pub fn suggestions(&self) -> &[String] {
        self.session
            .messages()
            .iter()
            .rev()
            .find(|message| message.is_assistant())
            .map(|message| message.suggestions.as_slice())
            .unwrap_or_default()
    }

    fn require_user(&self) -> Result<&str> {
        self.user_id.as_deref().ok_or(SkinError::Unauthenticated)
    }

    fn replace_session(&mut self, session: ScanSession) {
        self.generation += 1;
        self.session = session;
    }

    /// Starts capturing a new photo; the previous session is superseded.
    pub fn begin_capture(&mut self) -> Result<()> {
        self.require_user()?;
        match self.session.phase() {
            ScanPhase::Capturing => return Ok(()),
            ScanPhase::Analyzing => {
                return Err(SkinError::invalid_state("An analysis is already in progress"));
            }
            ScanPhase::Ready => self.session.transition(ScanPhase::Superseded)?,
            ScanPhase::Idle | ScanPhase::Superseded => {}
        }

        tracing::debug!(
            "[ScanSessionController] Capture started, superseding {:?}",
            self.session.session_id()
        );
        self.replace_session(ScanSession::fresh());
        self.session.transition(ScanPhase::Capturing)
    }

    /// Hands the captured image over for analysis.
    pub fn start_analysis(&mut self, image: ImagePayload) -> Result<AnalysisTicket> {
        self.require_user()?;
        if self.session.phase() == ScanPhase::Analyzing {
            return Err(SkinError::invalid_state("An analysis is already in progress"));
        }
        self.session.transition(ScanPhase::Analyzing)?;
        Ok(AnalysisTicket {
            generation: self.generation,
            image,
        })
    }

    /// Applies the analyzer's answer to the session that requested it.
    pub fn complete_analysis(
        &mut self,
        ticket: AnalysisTicket,
        outcome: std::result::Result<SkinAnalysisResult, GatewayError>,
    ) -> Result<AnalysisCompletion> {
        if ticket.generation != self.generation || self.session.phase() != ScanPhase::Analyzing {
            tracing::debug!(
                "[ScanSessionController] Ignoring stale analysis (ticket {}, current {})",
                ticket.generation,
                self.generation
            );
            return Ok(AnalysisCompletion::Stale);
        }

        let analysis = match outcome {
            Ok(analysis) => analysis,
            Err(error) => {
                tracing::warn!("[ScanSessionController] Analysis failed: {}", error);
                self.session.transition(ScanPhase::Idle)?;
                self.session.push_message(ChatMessage::assistant(
                    ANALYSIS_FAILED,
                    false,
                    Vec::new(),
                ));
                return Ok(AnalysisCompletion::Failed(error));
            }
        };

        let summary = self.summarize(&analysis);
        let session_id = self.ids.next_id();
        self.session
            .attach_analysis(session_id.clone(), analysis, summary.into_message())?;
        tracing::info!("[ScanSessionController] Scan {} ready", session_id);

        self.schedule_persist();
        Ok(AnalysisCompletion::Ready { session_id })
    }

    fn summarize(&self, analysis: &SkinAnalysisResult) -> Reply {
        let mut context = Default::default();
        let mut turn = TurnState {
            analysis: Some(analysis),
            is_historical_replay: false,
            context: &mut context,
        };
        match self
            .dispatcher
            .dispatch(DispatchInput::System(SystemEvent::SummarizeAnalysis), &mut turn)
        {
            DispatchOutcome::Reply(reply) => reply,
            DispatchOutcome::Effect(_) => replies::summary(analysis),
        }
    }

    /// Capture, analyze and attach in one call.
    pub async fn analyze(&mut self, image: ImagePayload) -> Result<AnalysisCompletion> {
        if self.session.phase() != ScanPhase::Capturing {
            self.begin_capture()?;
        }
        let ticket = self.start_analysis(image)?;
        let outcome = self
            .gateway
            .analyze(ticket.image().as_base64(), self.use_groq)
            .await;
        self.complete_analysis(ticket, outcome)
    }

    /// Drops the active session for a fresh greeting. Stored history is kept.
    pub fn new_scan(&mut self) {
        if self.session.phase() == ScanPhase::Ready {
            // Ready always allows this step.
            let _ = self.session.transition(ScanPhase::Superseded);
        }
        self.replace_session(ScanSession::fresh());
    }

    /// Opens a stored scan read-only.
    pub async fn load_history(&mut self, session_id: &str) -> Result<()> {
        let user_id = self.require_user()?.to_string();
        // The newest snapshot of this scan may still be queued.
        self.writer.flush().await;

        let entry = self
            .repository
            .find_by_id(&user_id, session_id)
            .await?
            .ok_or_else(|| SkinError::not_found("Scan", session_id))?;

        tracing::debug!(
            "[ScanSessionController] Replaying {} ({} messages)",
            session_id,
            entry.messages.len()
        );
        self.replace_session(ScanSession::replay(entry));
        Ok(())
    }

    /// Handles one user message and returns the assistant's reply.
    pub async fn send_message(&mut self, text: &str) -> Result<ChatMessage> {
        let text = text.trim();
        if text.is_empty() {
            return Err(SkinError::invalid_input("Message is empty"));
        }

        self.session.push_message(ChatMessage::user(text));
        let reply = self.run_turn(text).await.into_message();
        self.session.push_message(reply.clone());

        self.schedule_persist();
        Ok(reply)
    }

    async fn run_turn(&mut self, text: &str) -> Reply {
        let mut input = DispatchInput::User(text.to_string());
        let is_replay = self.session.is_historical_replay();

        for _ in 0..MAX_EFFECTS_PER_TURN {
            let outcome = {
                let (analysis, context) = self.session.split_context();
                let mut turn = TurnState {
                    analysis,
                    is_historical_replay: is_replay,
                    context,
                };
                self.dispatcher.dispatch(input, &mut turn)
            };

            match outcome {
                DispatchOutcome::Reply(reply) => return reply,
                DispatchOutcome::Effect(effect) => {
                    tracing::debug!("[ScanSessionController] Running effect {:?}", effect);
                    input = DispatchInput::System(self.effects.run(effect).await);
                }
            }
        }

        tracing::warn!("[ScanSessionController] Turn did not settle, giving up");
        replies::technical_hiccup()
    }

    fn schedule_persist(&self) {
        let Some(user_id) = self.user_id.as_deref() else {
            return;
        };
        if let Some(entry) = self.session.to_history_entry(user_id) {
            self.writer.schedule(entry);
        }
    }

    /// Writes queued snapshots now.
    pub async fn flush(&self) -> usize {
        self.writer.flush().await
    }

    /// The signed-in user's scans, newest first.
    pub async fn history(&self) -> Result<Vec<ScanHistoryEntry>> {
        let user_id = self.require_user()?;
        self.writer.flush().await;
        Ok(self.repository.list_for_user(user_id).await?)
    }

    pub async fn history_overview(&self) -> Result<HistoryOverview> {
        let entries = self.history().await?;
        Ok(HistoryOverview::from_entries(&entries))
    }

    /// Flushes pending writes and stops the writer.
    pub async fn shutdown(self) {
        self.writer.shutdown().await;
    }
}

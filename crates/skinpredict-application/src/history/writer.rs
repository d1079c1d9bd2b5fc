//! Debounced background writer for scan history.
//!
//! Snapshots are sent over a channel to a single task. The task keeps the
//! newest snapshot per scan, waits out the debounce window, then writes them
//! one at a time. A failed write stays queued and is retried with the next
//! snapshot, flush or shutdown.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use skinpredict_core::session::{ScanHistoryEntry, ScanHistoryRepository};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;

enum WriterCommand {
    Save(Box<ScanHistoryEntry>),
    /// Write everything now; replies with the number of failed writes.
    Flush(oneshot::Sender<usize>),
}

type EntryKey = (String, String);

/// Handle to the background writer task.
pub struct HistoryWriter {
    tx: mpsc::UnboundedSender<WriterCommand>,
    handle: JoinHandle<()>,
}

impl HistoryWriter {
    /// Spawns the writer on the current tokio runtime.
    pub fn spawn(repository: Arc<dyn ScanHistoryRepository>, debounce: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = tokio::spawn(run(repository, debounce, rx));
        Self { tx, handle }
    }

    /// Queues a snapshot. Older queued snapshots of the same scan are dropped.
    pub fn schedule(&self, entry: ScanHistoryEntry) {
        if self.tx.send(WriterCommand::Save(Box::new(entry))).is_err() {
            tracing::warn!("[HistoryWriter] Writer task is gone, snapshot dropped");
        }
    }

    /// Writes all queued snapshots and waits for the result.
    ///
    /// # Returns
    ///
    /// The number of snapshots that could not be written (they stay queued).
    pub async fn flush(&self) -> usize {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(WriterCommand::Flush(ack_tx)).is_err() {
            return 0;
        }
        ack_rx.await.unwrap_or(0)
    }

    /// Flushes and stops the task.
    pub async fn shutdown(self) {
        drop(self.tx);
        if let Err(e) = self.handle.await {
            tracing::warn!("[HistoryWriter] Writer task ended abnormally: {}", e);
        }
    }
}

async fn run(
    repository: Arc<dyn ScanHistoryRepository>,
    debounce: Duration,
    mut rx: mpsc::UnboundedReceiver<WriterCommand>,
) {
    let mut pending: HashMap<EntryKey, ScanHistoryEntry> = HashMap::new();
    let mut deadline: Option<Instant> = None;

    loop {
        let sleep = async move {
            match deadline {
                Some(at) => tokio::time::sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            command = rx.recv() => match command {
                Some(WriterCommand::Save(entry)) => {
                    let key = (entry.user_id.clone(), entry.session_id.clone());
                    pending.insert(key, *entry);
                    deadline.get_or_insert_with(|| Instant::now() + debounce);
                }
                Some(WriterCommand::Flush(ack)) => {
                    deadline = None;
                    let failed = write_pending(repository.as_ref(), &mut pending).await;
                    let _ = ack.send(failed);
                }
                None => {
                    write_pending(repository.as_ref(), &mut pending).await;
                    break;
                }
            },
            _ = sleep => {
                deadline = None;
                write_pending(repository.as_ref(), &mut pending).await;
            }
        }
    }

    tracing::debug!("[HistoryWriter] Writer task stopped");
}

/// Writes and removes every queued entry; failures are put back.
async fn write_pending(
    repository: &dyn ScanHistoryRepository,
    pending: &mut HashMap<EntryKey, ScanHistoryEntry>,
) -> usize {
    let mut failed = 0;
    for (key, entry) in std::mem::take(pending) {
        match repository.save(&entry).await {
            Ok(()) => {
                tracing::debug!(
                    "[HistoryWriter] Wrote {} ({} messages)",
                    entry.session_id,
                    entry.messages.len()
                );
            }
            Err(e) => {
                tracing::warn!(
                    "[HistoryWriter] Failed to write {}, will retry: {:#}",
                    entry.session_id,
                    e
                );
                failed += 1;
                pending.insert(key, entry);
            }
        }
    }
    failed
}

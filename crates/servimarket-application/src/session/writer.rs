//! Ordered persistence of the session record.
//!
//! Every write to [`SESSION_KEY`] goes through one worker task, so writes land
//! in the order they were queued regardless of which caller awaits them.

use servimarket_core::error::{MarketError, Result};
use servimarket_core::storage::{KeyValueStore, SESSION_KEY};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

enum WriteCommand {
    Save {
        raw: String,
        done: oneshot::Sender<Result<()>>,
    },
    Clear {
        done: oneshot::Sender<Result<()>>,
    },
}

/// Completion of a queued write.
pub(crate) type PendingWrite = oneshot::Receiver<Result<()>>;

/// Queue handle for the session writer task.
#[derive(Clone)]
pub(crate) struct SessionWriter {
    tx: mpsc::UnboundedSender<WriteCommand>,
}

impl SessionWriter {
    /// Spawns the writer on the current runtime. It stops once every handle
    /// is dropped and the queue has drained.
    pub(crate) fn spawn(storage: Arc<dyn KeyValueStore>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Some(command) = rx.recv().await {
                match command {
                    WriteCommand::Save { raw, done } => {
                        let _ = done.send(storage.set(SESSION_KEY, &raw).await);
                    }
                    WriteCommand::Clear { done } => {
                        let _ = done.send(storage.remove(SESSION_KEY).await);
                    }
                }
            }
            tracing::debug!("[SessionWriter] Queue closed");
        });

        Self { tx }
    }

    /// Queues `raw` as the new session record.
    pub(crate) fn save(&self, raw: String) -> PendingWrite {
        let (done, pending) = oneshot::channel();
        // a closed queue drops `done`, which `settle` reports
        let _ = self.tx.send(WriteCommand::Save { raw, done });
        pending
    }

    /// Queues removal of the session record.
    pub(crate) fn clear(&self) -> PendingWrite {
        let (done, pending) = oneshot::channel();
        let _ = self.tx.send(WriteCommand::Clear { done });
        pending
    }

    /// Waits for a queued write and returns its outcome.
    pub(crate) async fn settle(pending: PendingWrite) -> Result<()> {
        pending
            .await
            .map_err(|_| MarketError::internal("Session writer stopped"))?
    }
}

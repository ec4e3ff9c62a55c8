//! Debounced recompute scheduler
//!
//! Coalesces rapid input edits onto a single logical timeline: every new
//! snapshot resets the deadline, and recompute runs exactly once with the
//! latest snapshot after the window goes quiet. Superseded snapshots are
//! simply discarded.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Mutex};
use tokio::time::timeout;

use crate::goal::GoalEngine;
use crate::models::GoalInputs;

/// Default debounce window for keystroke-level edits
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(600);

/// Handle for submitting input snapshots to the debounce loop
#[derive(Clone)]
pub struct RecomputeScheduler {
    tx: mpsc::UnboundedSender<GoalInputs>,
}

impl RecomputeScheduler {
    /// Spawn the debounce loop on the current runtime
    pub fn spawn(engine: Arc<Mutex<GoalEngine>>, debounce: Duration) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<GoalInputs>();

        tokio::spawn(async move {
            while let Some(mut latest) = rx.recv().await {
                // Keep absorbing edits until the window elapses uncontested
                loop {
                    match timeout(debounce, rx.recv()).await {
                        Ok(Some(next)) => latest = next,
                        Ok(None) => {
                            // Channel closed: flush the final snapshot
                            engine.lock().await.recompute_if_needed(&latest);
                            return;
                        }
                        Err(_) => break,
                    }
                }
                engine.lock().await.recompute_if_needed(&latest);
            }
        });

        Self { tx }
    }

    /// Queue a snapshot; resets the debounce deadline
    pub fn submit(&self, inputs: GoalInputs) {
        if self.tx.send(inputs).is_err() {
            tracing::warn!("recompute scheduler task is gone, snapshot dropped");
        }
    }
}

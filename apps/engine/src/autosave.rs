#![allow(dead_code)]

//! Draft autosave — debounced persistence of the working form, settings and
//! wizard position so a returning user resumes where they left off.
//!
//! A burst of edits collapses into a single write once edits stop for the
//! debounce window. The store holds at most one snapshot (overwrite
//! semantics); snapshot history lives in the separate history store.
//! Last write wins: a newer schedule aborts any pending one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::models::form::FormData;
use crate::models::settings::GenerationSettings;
use crate::storage::{KeyValueStore, DRAFT_KEY};
use crate::wizard::WizardStep;

/// What the autosave indicator shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutosaveStatus {
    Saved,
    Saving,
    Error,
}

/// The persisted envelope, overwritten on every save.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftSnapshot {
    pub form_data: FormData,
    pub settings: GenerationSettings,
    pub current_step: WizardStep,
    pub saved_at: DateTime<Utc>,
}

impl DraftSnapshot {
    /// The fallback when nothing is persisted yet or the slot is malformed.
    pub fn empty() -> Self {
        DraftSnapshot {
            form_data: FormData::default(),
            settings: GenerationSettings::default(),
            current_step: WizardStep::first(),
            saved_at: Utc::now(),
        }
    }
}

pub struct DraftAutosave {
    store: Arc<dyn KeyValueStore>,
    debounce: Duration,
    settle: Duration,
    status_tx: watch::Sender<AutosaveStatus>,
    pending: Mutex<Option<JoinHandle<()>>>,
    /// Bumped per save attempt; stale settle tasks must not flip a newer
    /// Saving back to Saved.
    epoch: Arc<AtomicU64>,
}

impl DraftAutosave {
    pub fn new(store: Arc<dyn KeyValueStore>, debounce: Duration, settle: Duration) -> Self {
        let (status_tx, _) = watch::channel(AutosaveStatus::Saved);
        DraftAutosave {
            store,
            debounce,
            settle,
            status_tx,
            pending: Mutex::new(None),
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn status(&self) -> watch::Receiver<AutosaveStatus> {
        self.status_tx.subscribe()
    }

    /// Schedules a save of `snapshot` after the debounce window. A later
    /// schedule supersedes any pending one.
    pub fn schedule(&self, snapshot: DraftSnapshot) {
        let mut pending = self.pending.lock().expect("autosave pending poisoned");
        if let Some(handle) = pending.take() {
            handle.abort();
        }

        let store = self.store.clone();
        let status_tx = self.status_tx.clone();
        let epoch = self.epoch.clone();
        let debounce = self.debounce;
        let settle = self.settle;
        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            let my_epoch = epoch.fetch_add(1, Ordering::SeqCst) + 1;
            let _ = write_snapshot(store, status_tx, epoch, my_epoch, settle, snapshot).await;
        }));
    }

    /// Writes immediately (the explicit "save draft" action), bypassing the
    /// debounce and superseding any pending write.
    pub async fn save_now(&self, snapshot: DraftSnapshot) -> Result<(), AppError> {
        if let Some(handle) = self
            .pending
            .lock()
            .expect("autosave pending poisoned")
            .take()
        {
            handle.abort();
        }
        let my_epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        write_snapshot(
            self.store.clone(),
            self.status_tx.clone(),
            self.epoch.clone(),
            my_epoch,
            self.settle,
            snapshot,
        )
        .await
    }

    /// Reads the persisted snapshot. Absent or malformed data falls back to
    /// the empty draft; this never fails to the caller.
    pub async fn load(&self) -> DraftSnapshot {
        match self.store.get(DRAFT_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(snapshot) => snapshot,
                Err(e) => {
                    warn!("malformed draft snapshot, starting empty: {e}");
                    DraftSnapshot::empty()
                }
            },
            Ok(None) => {
                debug!("no draft snapshot on file");
                DraftSnapshot::empty()
            }
            Err(e) => {
                warn!("draft snapshot unreadable, starting empty: {e}");
                DraftSnapshot::empty()
            }
        }
    }
}

/// One save attempt: Saving → write → settle → Saved, or Error on failure.
/// Not retried; the next mutation schedules a fresh attempt.
async fn write_snapshot(
    store: Arc<dyn KeyValueStore>,
    status_tx: watch::Sender<AutosaveStatus>,
    epoch: Arc<AtomicU64>,
    my_epoch: u64,
    settle: Duration,
    snapshot: DraftSnapshot,
) -> Result<(), AppError> {
    status_tx.send_replace(AutosaveStatus::Saving);

    let result = async {
        let raw = serde_json::to_string(&snapshot)?;
        store.set(DRAFT_KEY, &raw).await
    }
    .await;

    match result {
        Ok(()) => {
            // The settle delay gives the indicator a visible "saving" phase.
            tokio::time::sleep(settle).await;
            if epoch.load(Ordering::SeqCst) == my_epoch {
                status_tx.send_replace(AutosaveStatus::Saved);
            }
            Ok(())
        }
        Err(e) => {
            warn!("draft save failed: {e}");
            if epoch.load(Ordering::SeqCst) == my_epoch {
                status_tx.send_replace(AutosaveStatus::Error);
            }
            Err(e)
        }
    }
}

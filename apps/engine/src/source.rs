#![allow(dead_code)]

//! Source intake for the single-page generator: upload a CV file or point at
//! a LinkedIn profile, confirm the data is up to date, optionally reuse the
//! CV already on file. The upload itself is a timer-driven simulation; no
//! bytes are parsed.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::errors::AppError;
use crate::storage::{KeyValueStore, DEFAULT_CV_KEY};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Upload,
    Linkedin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    Idle,
    Uploading,
    Parsing,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub name: String,
    pub size: u64,
    pub mime: String,
}

/// The default-CV slot persisted under its own key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultCvFile {
    pub file_name: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Confirmations {
    pub experiences_updated: bool,
    pub skills_updated: bool,
    pub contact_updated: bool,
}

impl Confirmations {
    pub fn all_confirmed(&self) -> bool {
        self.experiences_updated && self.skills_updated && self.contact_updated
    }
}

#[derive(Debug, Default)]
struct IntakeState {
    uploaded: Option<UploadedFile>,
    linkedin_url: String,
    confirmations: Confirmations,
    save_as_default: bool,
    use_default_cv: bool,
}

pub struct SourceIntake {
    kind: Mutex<SourceKind>,
    state: Arc<Mutex<IntakeState>>,
    status_tx: watch::Sender<UploadStatus>,
    upload_task: Mutex<Option<JoinHandle<()>>>,
    upload_delay: Duration,
    parse_delay: Duration,
}

impl SourceIntake {
    pub fn new(upload_delay: Duration, parse_delay: Duration) -> Self {
        let (status_tx, _) = watch::channel(UploadStatus::Idle);
        SourceIntake {
            kind: Mutex::new(SourceKind::Upload),
            state: Arc::new(Mutex::new(IntakeState::default())),
            status_tx,
            upload_task: Mutex::new(None),
            upload_delay,
            parse_delay,
        }
    }

    pub fn status(&self) -> watch::Receiver<UploadStatus> {
        self.status_tx.subscribe()
    }

    pub fn current_status(&self) -> UploadStatus {
        *self.status_tx.borrow()
    }

    pub fn kind(&self) -> SourceKind {
        *self.kind.lock().expect("intake kind poisoned")
    }

    pub fn set_kind(&self, kind: SourceKind) {
        *self.kind.lock().expect("intake kind poisoned") = kind;
    }

    pub fn set_linkedin_url(&self, url: &str) {
        self.state.lock().expect("intake poisoned").linkedin_url = url.to_string();
    }

    pub fn set_confirmation(&self, apply: impl FnOnce(&mut Confirmations)) {
        apply(&mut self.state.lock().expect("intake poisoned").confirmations);
    }

    pub fn set_save_as_default(&self, save: bool) {
        self.state.lock().expect("intake poisoned").save_as_default = save;
    }

    pub fn save_as_default(&self) -> bool {
        self.state.lock().expect("intake poisoned").save_as_default
    }

    pub fn uploaded_file(&self) -> Option<UploadedFile> {
        self.state.lock().expect("intake poisoned").uploaded.clone()
    }

    /// Simulated upload: Uploading, then Parsing, then Success with the file
    /// recorded. A new upload supersedes an in-flight one.
    pub fn begin_upload(&self, file: UploadedFile) {
        let mut task = self.upload_task.lock().expect("upload task poisoned");
        if let Some(handle) = task.take() {
            handle.abort();
        }
        self.status_tx.send_replace(UploadStatus::Uploading);

        let state = self.state.clone();
        let status_tx = self.status_tx.clone();
        let upload_delay = self.upload_delay;
        let parse_delay = self.parse_delay;
        *task = Some(tokio::spawn(async move {
            tokio::time::sleep(upload_delay).await;
            status_tx.send_replace(UploadStatus::Parsing);
            tokio::time::sleep(parse_delay).await;
            state.lock().expect("intake poisoned").uploaded = Some(file);
            status_tx.send_replace(UploadStatus::Success);
        }));
    }

    pub fn remove_file(&self) {
        if let Some(handle) = self.upload_task.lock().expect("upload task poisoned").take() {
            handle.abort();
        }
        self.state.lock().expect("intake poisoned").uploaded = None;
        self.status_tx.send_replace(UploadStatus::Idle);
    }

    /// Reuses the CV already on file instead of uploading a new one.
    pub fn use_default(&self) {
        self.state.lock().expect("intake poisoned").use_default_cv = true;
        self.status_tx.send_replace(UploadStatus::Success);
    }

    pub fn upload_new(&self) {
        let mut state = self.state.lock().expect("intake poisoned");
        state.use_default_cv = false;
        state.uploaded = None;
        drop(state);
        self.status_tx.send_replace(UploadStatus::Idle);
    }

    /// Resets every field to its initial value.
    pub fn clear(&self) {
        if let Some(handle) = self.upload_task.lock().expect("upload task poisoned").take() {
            handle.abort();
        }
        *self.kind.lock().expect("intake kind poisoned") = SourceKind::Upload;
        *self.state.lock().expect("intake poisoned") = IntakeState::default();
        self.status_tx.send_replace(UploadStatus::Idle);
    }

    pub fn has_source(&self) -> bool {
        let state = self.state.lock().expect("intake poisoned");
        match self.kind() {
            SourceKind::Upload => state.uploaded.is_some() || state.use_default_cv,
            SourceKind::Linkedin => state.linkedin_url.contains("linkedin.com/in/"),
        }
    }

    pub fn is_confirmed(&self) -> bool {
        let state = self.state.lock().expect("intake poisoned");
        state.use_default_cv || state.confirmations.all_confirmed()
    }

    /// The upload-status gate applies to the upload path only; a LinkedIn
    /// source has no upload to finish.
    pub fn can_generate(&self) -> bool {
        let status_ok = match self.kind() {
            SourceKind::Upload => self.current_status() == UploadStatus::Success,
            SourceKind::Linkedin => true,
        };
        self.has_source() && self.is_confirmed() && status_ok
    }

    pub fn disabled_reason(&self) -> Option<&'static str> {
        if !self.has_source() {
            return Some(match self.kind() {
                SourceKind::Upload => "Envie um CV para continuar.",
                SourceKind::Linkedin => "Forneça uma URL válida do LinkedIn.",
            });
        }
        if !self.is_confirmed() {
            return Some("Confirme que seu CV está atualizado.");
        }
        None
    }

    // ── Default-CV slot ─────────────────────────────────────────────────────

    pub async fn load_default_cv(store: &dyn KeyValueStore) -> Option<DefaultCvFile> {
        match store.get(DEFAULT_CV_KEY).await {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(slot) => Some(slot),
                Err(e) => {
                    warn!("malformed default-CV slot ignored: {e}");
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("default-CV slot unreadable: {e}");
                None
            }
        }
    }

    pub async fn store_default_cv(
        store: &dyn KeyValueStore,
        file_name: &str,
    ) -> Result<(), AppError> {
        let slot = DefaultCvFile {
            file_name: file_name.to_string(),
            updated_at: Utc::now(),
        };
        store.set(DEFAULT_CV_KEY, &serde_json::to_string(&slot)?).await
    }
}

#![allow(dead_code)]

//! Session orchestrator — the operations the views call.
//!
//! Flow: form mutations feed the debounced autosave; the terminal generate
//! action runs validation, raises the auth gate, walks plan selection, and
//! drives the generation flow; on success the synthesized document lands in
//! the editor and the history records the artifact.

use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::autosave::{AutosaveStatus, DraftAutosave, DraftSnapshot};
use crate::credits::{plan_by_id, CreditsLedger};
use crate::errors::AppError;
use crate::flow::{FlowRouter, Screen};
use crate::generation::flow::{GenerationFlow, GenerationState};
use crate::generation::synthesize::default_cv_name;
use crate::history::HistoryStore;
use crate::models::form::FormData;
use crate::models::generated::GeneratedCV;
use crate::models::history::{CvHistoryItem, CvStatus};
use crate::models::settings::GenerationSettings;
use crate::services::auth::AuthError;
use crate::state::AppState;
use crate::wizard::{WizardController, WizardStep};

pub struct CvSession {
    state: AppState,
    form: FormData,
    settings: GenerationSettings,
    wizard: WizardController,
    router: FlowRouter,
    autosave: DraftAutosave,
    history: HistoryStore,
    credits: Arc<CreditsLedger>,
    flow: GenerationFlow,
    generated: Option<GeneratedCV>,
    cv_name: Option<String>,
    active_history_id: Option<Uuid>,
    active_plan: Option<&'static str>,
}

impl CvSession {
    /// Builds a session from the persisted draft, resuming form, settings and
    /// wizard position. A missing or malformed draft starts empty.
    pub async fn resume(state: AppState) -> Self {
        let autosave = DraftAutosave::new(
            state.storage.clone(),
            state.config.autosave_debounce(),
            state.config.autosave_settle(),
        );
        let snapshot = autosave.load().await;
        info!(
            "session resumed at step {:?}",
            snapshot.current_step
        );

        let credits = Arc::new(CreditsLedger::new(0));
        let flow = GenerationFlow::new(
            state.tailoring.clone(),
            credits.clone(),
            state.config.generation_tick(),
        );
        let history = HistoryStore::new(state.storage.clone());

        CvSession {
            form: snapshot.form_data,
            settings: snapshot.settings,
            wizard: WizardController::at(snapshot.current_step),
            router: FlowRouter::default(),
            autosave,
            history,
            credits,
            flow,
            generated: None,
            cv_name: None,
            active_history_id: None,
            active_plan: None,
            state,
        }
    }

    // ── Accessors ───────────────────────────────────────────────────────────

    pub fn form(&self) -> &FormData {
        &self.form
    }

    pub fn settings(&self) -> &GenerationSettings {
        &self.settings
    }

    pub fn wizard_step(&self) -> WizardStep {
        self.wizard.current()
    }

    pub fn screen(&self) -> Screen {
        self.router.screen()
    }

    pub fn is_auth_modal_open(&self) -> bool {
        self.router.is_auth_modal_open()
    }

    pub fn autosave_status(&self) -> tokio::sync::watch::Receiver<AutosaveStatus> {
        self.autosave.status()
    }

    pub fn generation_state(&self) -> GenerationState {
        self.flow.current_state()
    }

    pub fn generated(&self) -> Option<&GeneratedCV> {
        self.generated.as_ref()
    }

    pub fn cv_name(&self) -> Option<&str> {
        self.cv_name.as_deref()
    }

    pub fn credits_balance(&self) -> u32 {
        self.credits.balance()
    }

    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    // ── Form and wizard ─────────────────────────────────────────────────────

    /// Applies a form mutation and schedules the debounced draft write.
    pub fn update_form(&mut self, apply: impl FnOnce(&mut FormData)) {
        apply(&mut self.form);
        self.autosave.schedule(self.snapshot());
    }

    pub fn update_settings(&mut self, apply: impl FnOnce(&mut GenerationSettings)) {
        apply(&mut self.settings);
        self.autosave.schedule(self.snapshot());
    }

    pub fn next_step(&mut self) -> bool {
        let moved = self.wizard.advance(&self.form);
        if moved {
            self.autosave.schedule(self.snapshot());
        }
        moved
    }

    pub fn back_step(&mut self) -> bool {
        let moved = self.wizard.retreat();
        if moved {
            self.autosave.schedule(self.snapshot());
        }
        moved
    }

    pub fn jump_to_step(&mut self, step: WizardStep) -> bool {
        let moved = self.wizard.jump_to(step);
        if moved {
            self.autosave.schedule(self.snapshot());
        }
        moved
    }

    /// The explicit "save draft" action: immediate write plus a draft entry
    /// in the history.
    pub async fn save_draft_now(&mut self) -> Result<(), AppError> {
        self.autosave.save_now(self.snapshot()).await?;
        let existing = match self.active_history_id {
            Some(id) => self.history.get(id).await,
            None => None,
        };
        match existing {
            Some(mut item) => {
                item.form_data = self.form.clone();
                item.settings = self.settings;
                self.history.upsert(item).await?;
            }
            None => {
                let item = CvHistoryItem::from_working(
                    default_cv_name(&self.form, Utc::now()),
                    self.form.clone(),
                    self.settings,
                    None,
                    CvStatus::Draft,
                );
                self.active_history_id = Some(item.id);
                self.history.upsert(item).await?;
            }
        }
        Ok(())
    }

    // ── Generate flow ───────────────────────────────────────────────────────

    /// The terminal generate action. Validation failures jump the wizard to
    /// the offending step; a valid form raises the auth gate. No generation
    /// state is entered here.
    pub fn request_generate(&mut self) -> Result<(), AppError> {
        if let Err(failure) = WizardController::validate_for_generate(&self.form) {
            self.wizard.force_jump(failure.step);
            return Err(AppError::Validation(failure.message));
        }
        self.router.open_auth_modal();
        Ok(())
    }

    pub async fn login(&mut self, email: &str, password: &str) -> Result<(), AuthError> {
        self.state.auth.login(email, password).await?;
        self.router.auth_succeeded();
        Ok(())
    }

    pub async fn register(&mut self, email: &str, password: &str) -> Result<(), AuthError> {
        self.state.auth.register(email, password).await?;
        self.router.auth_succeeded();
        Ok(())
    }

    pub fn close_auth_modal(&mut self) {
        self.router.close_auth_modal();
    }

    /// Confirms a plan, granting its usages the first time it is chosen, and
    /// enters the generating screen with the flow at phase 1.
    pub fn confirm_plan(&mut self, plan_id: &str) -> Result<(), AppError> {
        let plan = plan_by_id(plan_id)
            .ok_or_else(|| AppError::NotFound(format!("Plano desconhecido: {plan_id}")))?;
        if self.active_plan != Some(plan.id) {
            self.credits.grant(plan.usages);
            self.active_plan = Some(plan.id);
        }
        self.flow.start(self.form.clone(), self.settings)?;
        self.router.plan_confirmed();
        Ok(())
    }

    /// Waits for the flow to finish. On success, after the hand-off delay the
    /// document and its default name are committed and the editor opens; the
    /// artifact is recorded in the history. On error the generating screen
    /// stays up offering retry and cancel. Returns the observed final state
    /// (`Idle` means the run was cancelled underneath us).
    pub async fn await_generation(&mut self) -> GenerationState {
        let mut rx = self.flow.state();
        let outcome = rx
            .wait_for(|s| s.is_terminal() || matches!(s, GenerationState::Idle))
            .await
            .map(|s| s.clone());
        let outcome = match outcome {
            Ok(state) => state,
            Err(_) => return GenerationState::Idle,
        };

        if outcome == GenerationState::Success {
            tokio::time::sleep(self.state.config.handoff_delay()).await;
            if let Some(cv) = self.flow.take_result() {
                let name = default_cv_name(&self.form, Utc::now());
                self.generated = Some(cv.clone());
                self.cv_name = Some(name.clone());
                self.flow.reset();
                self.router.generation_succeeded(true);

                let item = CvHistoryItem::from_working(
                    name,
                    self.form.clone(),
                    self.settings,
                    Some(cv),
                    CvStatus::Generated,
                );
                self.active_history_id = Some(item.id);
                if let Err(e) = self.history.upsert(item).await {
                    warn!("generated CV not recorded in history: {e}");
                }
            }
        }
        outcome
    }

    /// Cancel while generating: discards phase progress and returns to the
    /// prior screen. History and credits are untouched.
    pub fn cancel_generation(&mut self) {
        self.flow.cancel();
        self.router.cancel_generating();
    }

    pub fn retry_generation(&mut self) -> bool {
        self.flow.retry()
    }

    // ── Editor and preview ──────────────────────────────────────────────────

    pub fn open_preview(&mut self) -> bool {
        self.router.to_preview(self.generated.is_some())
    }

    pub fn back_to_editor(&mut self) -> bool {
        self.router.back_to_editor()
    }

    pub fn back_to_generator(&mut self) -> bool {
        self.router.back_to_generator()
    }

    /// Applies an editor change to the document and mirrors it into the
    /// active history item.
    pub async fn update_generated(&mut self, apply: impl FnOnce(&mut GeneratedCV)) -> bool {
        let Some(cv) = self.generated.as_mut() else {
            return false;
        };
        apply(cv);
        if let Some(id) = self.active_history_id {
            let cv = cv.clone();
            if let Err(e) = self.history.set_generated(id, cv).await {
                warn!("editor change not mirrored to history: {e}");
            }
        }
        true
    }

    pub async fn rename_cv(&mut self, name: &str) -> Result<(), AppError> {
        self.cv_name = Some(name.to_string());
        if let Some(id) = self.active_history_id {
            self.history.rename(id, name).await?;
        }
        Ok(())
    }

    /// Exports the document through the export service and marks the history
    /// item exported. Fire-and-forget from the product's point of view; the
    /// artifact comes back for callers that want it.
    pub async fn export(&mut self) -> Result<Bytes, AppError> {
        let Some(cv) = &self.generated else {
            return Err(AppError::Validation(
                "Nada para exportar: gere um CV primeiro.".to_string(),
            ));
        };
        let artifact = self.state.export.export(cv).await?;
        if let Some(id) = self.active_history_id {
            self.history.mark_exported(id).await?;
        }
        Ok(artifact)
    }

    // ── History ─────────────────────────────────────────────────────────────

    /// Loads a history item into the working set, replacing the in-memory
    /// state outright (no merge). Unknown ids are a no-op.
    pub async fn select_history(&mut self, id: Uuid) -> bool {
        let Some(item) = self.history.get(id).await else {
            return false;
        };
        self.form = item.form_data;
        self.settings = item.settings;
        self.generated = item.generated_content;
        self.cv_name = Some(item.name);
        self.active_history_id = Some(item.id);
        self.wizard = WizardController::default();
        self.autosave.schedule(self.snapshot());
        true
    }

    /// "Novo": a fresh working set, leaving the history untouched.
    pub fn new_cv(&mut self) {
        self.form = FormData::default();
        self.settings = GenerationSettings::default();
        self.generated = None;
        self.cv_name = None;
        self.active_history_id = None;
        self.wizard = WizardController::default();
        self.autosave.schedule(self.snapshot());
    }

    pub async fn duplicate_history(&mut self, id: Uuid) -> Result<Option<CvHistoryItem>, AppError> {
        self.history.duplicate(id).await
    }

    pub async fn rename_history(&mut self, id: Uuid, name: &str) -> Result<bool, AppError> {
        let renamed = self.history.rename(id, name).await?;
        if renamed && self.active_history_id == Some(id) {
            self.cv_name = Some(name.to_string());
        }
        Ok(renamed)
    }

    pub async fn delete_history(&mut self, id: Uuid) -> Result<bool, AppError> {
        let deleted = self.history.delete(id).await?;
        if deleted && self.active_history_id == Some(id) {
            self.active_history_id = None;
        }
        Ok(deleted)
    }

    fn snapshot(&self) -> DraftSnapshot {
        DraftSnapshot {
            form_data: self.form.clone(),
            settings: self.settings,
            current_step: self.wizard.current(),
            saved_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::config::Config;
    use crate::services::auth::MockAuthService;
    use crate::services::export::PlainTextExport;
    use crate::services::tailoring::MockTailoringService;
    use crate::storage::{KeyValueStore, MemoryStore, DRAFT_KEY};

    struct Rig {
        session: CvSession,
        store: Arc<MemoryStore>,
        tailoring: Arc<MockTailoringService>,
    }

    async fn rig() -> Rig {
        let store = Arc::new(MemoryStore::new());
        let tailoring = Arc::new(MockTailoringService::new());
        let config = Config::default();
        let state = AppState {
            storage: store.clone() as Arc<dyn KeyValueStore>,
            auth: Arc::new(MockAuthService::new(config.auth_delay())),
            tailoring: tailoring.clone(),
            export: Arc::new(PlainTextExport::new()),
            config,
        };
        Rig {
            session: CvSession::resume(state).await,
            store,
            tailoring,
        }
    }

    fn fill_form(session: &mut CvSession) {
        session.update_form(|form| {
            form.personal.full_name = "Ana Souza".to_string();
            form.target_role = "Engenheira de Software".to_string();
            let id = form.experiences[0].id;
            form.update_experience(id, |e| {
                e.company = "Acme".to_string();
                e.role = "Engineer".to_string();
                e.achievements = "Built X\nShipped Y".to_string();
            });
        });
    }

    async fn run_to_success(session: &mut CvSession) {
        session.request_generate().unwrap();
        session.login("ana@example.com", "segredo123").await.unwrap();
        session.confirm_plan("free").unwrap();
        let outcome = session.await_generation().await;
        assert_eq!(outcome, GenerationState::Success);
    }

    #[tokio::test(start_paused = true)]
    async fn test_generate_with_empty_target_role_jumps_to_objective() {
        let mut rig = rig().await;
        rig.session.update_form(|form| {
            let id = form.experiences[0].id;
            form.update_experience(id, |e| {
                e.company = "Acme".to_string();
                e.role = "Engineer".to_string();
            });
        });

        let result = rig.session.request_generate();
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(rig.session.wizard_step(), WizardStep::Objective);
        assert_eq!(rig.session.generation_state(), GenerationState::Idle);
        assert_eq!(rig.session.screen(), Screen::Generator);
        assert!(!rig.session.is_auth_modal_open());
    }

    #[tokio::test(start_paused = true)]
    async fn test_happy_path_lands_in_editor_with_document() {
        let mut rig = rig().await;
        fill_form(&mut rig.session);
        run_to_success(&mut rig.session).await;

        assert_eq!(rig.session.screen(), Screen::Editor);
        let cv = rig.session.generated().unwrap();
        assert_eq!(cv.headline, "Ana Souza");
        assert_eq!(
            cv.experience_blocks[0].bullets,
            vec!["Built X".to_string(), "Shipped Y".to_string()]
        );
        // Free plan granted 3, one success consumed 1.
        assert_eq!(rig.session.credits_balance(), 2);

        let items = rig.session.history().list().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].status, CvStatus::Generated);
        assert!(rig.session.cv_name().unwrap().contains("Engenheira de Software"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_mid_generation_returns_to_generator_and_restarts_clean() {
        let mut rig = rig().await;
        fill_form(&mut rig.session);
        rig.session.request_generate().unwrap();
        rig.session.login("ana@example.com", "segredo123").await.unwrap();
        rig.session.confirm_plan("free").unwrap();

        tokio::time::sleep(Duration::from_millis(2 * 800 + 50)).await;
        assert_eq!(
            rig.session.generation_state(),
            GenerationState::Generating { phase: 3 }
        );

        rig.session.cancel_generation();
        assert_eq!(rig.session.screen(), Screen::Generator);
        assert!(rig.session.generated().is_none());
        assert_eq!(rig.session.credits_balance(), 3, "cancel consumes nothing");
        assert!(rig.session.history().list().await.is_empty());

        // A new attempt starts over at phase 1.
        rig.session.request_generate().unwrap();
        rig.session.login("ana@example.com", "segredo123").await.unwrap();
        rig.session.confirm_plan("free").unwrap();
        assert_eq!(
            rig.session.generation_state(),
            GenerationState::Generating { phase: 1 }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_error_offers_retry_without_losing_draft() {
        let mut rig = rig().await;
        fill_form(&mut rig.session);
        rig.tailoring.set_failing(true);

        rig.session.request_generate().unwrap();
        rig.session.login("ana@example.com", "segredo123").await.unwrap();
        rig.session.confirm_plan("free").unwrap();
        let outcome = rig.session.await_generation().await;
        assert!(matches!(outcome, GenerationState::Error { .. }));
        assert_eq!(rig.session.screen(), Screen::Generating);
        assert_eq!(rig.session.credits_balance(), 3, "no credit on error");

        rig.tailoring.set_failing(false);
        assert!(rig.session.retry_generation());
        let outcome = rig.session.await_generation().await;
        assert_eq!(outcome, GenerationState::Success);
        assert_eq!(rig.session.credits_balance(), 2);
        // The draft survived the failed attempt.
        assert_eq!(rig.session.form().target_role, "Engenheira de Software");
    }

    #[tokio::test(start_paused = true)]
    async fn test_same_plan_is_not_granted_twice() {
        let mut rig = rig().await;
        fill_form(&mut rig.session);
        run_to_success(&mut rig.session).await;
        rig.session.back_to_generator();
        run_to_success(&mut rig.session).await;

        // 3 granted once, 2 successes consumed: 3 - 2 = 1.
        assert_eq!(rig.session.credits_balance(), 1);
        assert_eq!(rig.session.history().list().await.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_unknown_history_id_is_noop() {
        let mut rig = rig().await;
        fill_form(&mut rig.session);
        assert!(!rig.session.select_history(Uuid::new_v4()).await);
        assert_eq!(rig.session.form().target_role, "Engenheira de Software");
    }

    #[tokio::test(start_paused = true)]
    async fn test_select_history_replaces_working_set_outright() {
        let mut rig = rig().await;
        fill_form(&mut rig.session);
        run_to_success(&mut rig.session).await;
        let saved_id = rig.session.history().list().await[0].id;

        rig.session.new_cv();
        assert!(rig.session.form().target_role.is_empty());
        assert!(rig.session.generated().is_none());

        assert!(rig.session.select_history(saved_id).await);
        assert_eq!(rig.session.form().target_role, "Engenheira de Software");
        assert!(rig.session.generated().is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_export_requires_document_then_marks_history() {
        let mut rig = rig().await;
        fill_form(&mut rig.session);
        assert!(matches!(
            rig.session.export().await,
            Err(AppError::Validation(_))
        ));

        run_to_success(&mut rig.session).await;
        let artifact = rig.session.export().await.unwrap();
        assert!(!artifact.is_empty());
        let items = rig.session.history().list().await;
        assert_eq!(items[0].status, CvStatus::Exported);
    }

    #[tokio::test(start_paused = true)]
    async fn test_form_edit_burst_persists_one_draft_write() {
        let mut rig = rig().await;
        rig.session.update_form(|f| f.target_role = "E".to_string());
        rig.session.update_form(|f| f.target_role = "En".to_string());
        rig.session.update_form(|f| f.target_role = "Eng".to_string());

        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert_eq!(rig.store.write_count(), 1);
        let raw = rig.store.get(DRAFT_KEY).await.unwrap().unwrap();
        let snapshot: DraftSnapshot = serde_json::from_str(&raw).unwrap();
        assert_eq!(snapshot.form_data.target_role, "Eng");
    }

    #[tokio::test(start_paused = true)]
    async fn test_resume_restores_form_and_step() {
        let rig1 = rig().await;
        let store = rig1.store.clone();
        let mut session = rig1.session;
        fill_form(&mut session);
        session.next_step();
        session.save_draft_now().await.unwrap();

        let state = AppState {
            storage: store.clone() as Arc<dyn KeyValueStore>,
            auth: Arc::new(MockAuthService::new(Duration::from_millis(0))),
            tailoring: Arc::new(MockTailoringService::new()),
            export: Arc::new(PlainTextExport::new()),
            config: Config::default(),
        };
        let resumed = CvSession::resume(state).await;
        assert_eq!(resumed.form().target_role, "Engenheira de Software");
        assert_eq!(resumed.wizard_step(), WizardStep::Objective);
    }

    #[tokio::test(start_paused = true)]
    async fn test_save_draft_now_records_draft_history_item() {
        let mut rig = rig().await;
        fill_form(&mut rig.session);
        rig.session.save_draft_now().await.unwrap();

        let items = rig.session.history().list().await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].status, CvStatus::Draft);
        assert!(items[0].generated_content.is_none());

        // Saving again updates the same item instead of growing the list.
        rig.session.update_form(|f| f.company_name = "Acme".to_string());
        rig.session.save_draft_now().await.unwrap();
        assert_eq!(rig.session.history().list().await.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_editor_edits_mirror_into_history() {
        let mut rig = rig().await;
        fill_form(&mut rig.session);
        run_to_success(&mut rig.session).await;

        assert!(
            rig.session
                .update_generated(|cv| cv.summary = "Resumo editado.".to_string())
                .await
        );
        let items = rig.session.history().list().await;
        assert_eq!(
            items[0].generated_content.as_ref().unwrap().summary,
            "Resumo editado."
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_preview_round_trip_requires_document() {
        let mut rig = rig().await;
        fill_form(&mut rig.session);
        assert!(!rig.session.open_preview());

        run_to_success(&mut rig.session).await;
        assert!(rig.session.open_preview());
        assert_eq!(rig.session.screen(), Screen::Preview);
        assert!(rig.session.back_to_editor());
        assert_eq!(rig.session.screen(), Screen::Editor);
    }
}

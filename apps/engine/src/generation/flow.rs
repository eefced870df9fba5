#![allow(dead_code)]

//! Generation flow — the five-phase state machine behind "Gerando seu CV".
//!
//! Phases advance on a fixed tick with no real inference behind them; after
//! the last phase the tailoring service is invoked and the flow lands on
//! `Success` or `Error`. One credit is consumed per `Success`, never on
//! error or cancellation.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::credits::CreditsLedger;
use crate::errors::AppError;
use crate::models::form::FormData;
use crate::models::generated::GeneratedCV;
use crate::models::settings::GenerationSettings;
use crate::services::tailoring::TailoringService;

/// Progress labels, in phase order.
pub const GENERATION_PHASES: [&str; 5] = [
    "Organizando suas informações…",
    "Analisando a descrição da vaga…",
    "Ajustando experiências e habilidades…",
    "Otimizando para ATS…",
    "Finalizando seu CV…",
];

pub const LAST_PHASE: u8 = GENERATION_PHASES.len() as u8;

pub fn phase_label(phase: u8) -> Option<&'static str> {
    GENERATION_PHASES.get(phase.saturating_sub(1) as usize).copied()
}

#[derive(Debug, Clone, PartialEq)]
pub enum GenerationState {
    Idle,
    Generating { phase: u8 },
    Success,
    Error { message: String },
}

impl GenerationState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, GenerationState::Success | GenerationState::Error { .. })
    }
}

pub struct GenerationFlow {
    service: Arc<dyn TailoringService>,
    credits: Arc<CreditsLedger>,
    tick: Duration,
    state_tx: watch::Sender<GenerationState>,
    task: Mutex<Option<JoinHandle<()>>>,
    result: Arc<Mutex<Option<GeneratedCV>>>,
    /// Inputs of the last start, kept so retry resubmits nothing new.
    inputs: Mutex<Option<(FormData, GenerationSettings)>>,
}

impl GenerationFlow {
    pub fn new(
        service: Arc<dyn TailoringService>,
        credits: Arc<CreditsLedger>,
        tick: Duration,
    ) -> Self {
        let (state_tx, _) = watch::channel(GenerationState::Idle);
        GenerationFlow {
            service,
            credits,
            tick,
            state_tx,
            task: Mutex::new(None),
            result: Arc::new(Mutex::new(None)),
            inputs: Mutex::new(None),
        }
    }

    pub fn state(&self) -> watch::Receiver<GenerationState> {
        self.state_tx.subscribe()
    }

    pub fn current_state(&self) -> GenerationState {
        self.state_tx.borrow().clone()
    }

    /// Enters `Generating(phase=1)` and spawns the phase driver. Refused when
    /// the ledger is empty; ignored when a run is already in flight.
    pub fn start(&self, form: FormData, settings: GenerationSettings) -> Result<(), AppError> {
        if matches!(self.current_state(), GenerationState::Generating { .. }) {
            debug!("generate ignored: already generating");
            return Ok(());
        }
        if !self.credits.has_credit() {
            return Err(AppError::NoCredits);
        }
        *self.inputs.lock().expect("inputs poisoned") = Some((form.clone(), settings));
        self.spawn_run(form, settings);
        Ok(())
    }

    /// Re-enters the flow from `Error` at phase 1, reusing the inputs already
    /// in memory. Returns false in any other state.
    pub fn retry(&self) -> bool {
        if !matches!(self.current_state(), GenerationState::Error { .. }) {
            return false;
        }
        let inputs = self.inputs.lock().expect("inputs poisoned").clone();
        match inputs {
            Some((form, settings)) => {
                self.spawn_run(form, settings);
                true
            }
            None => false,
        }
    }

    /// Stops the phase driver and discards progress. Touches neither the
    /// history nor the ledger; screens are the caller's concern.
    pub fn cancel(&self) {
        if !matches!(
            self.current_state(),
            GenerationState::Generating { .. } | GenerationState::Error { .. }
        ) {
            return;
        }
        if let Some(handle) = self.task.lock().expect("task poisoned").take() {
            handle.abort();
        }
        self.result.lock().expect("result poisoned").take();
        self.state_tx.send_replace(GenerationState::Idle);
        info!("generation cancelled");
    }

    /// Takes the synthesized document after `Success`.
    pub fn take_result(&self) -> Option<GeneratedCV> {
        self.result.lock().expect("result poisoned").take()
    }

    /// Resets a terminal state back to `Idle` once the caller has handed the
    /// result off.
    pub fn reset(&self) {
        self.state_tx.send_replace(GenerationState::Idle);
    }

    fn spawn_run(&self, form: FormData, settings: GenerationSettings) {
        self.state_tx
            .send_replace(GenerationState::Generating { phase: 1 });

        let service = self.service.clone();
        let credits = self.credits.clone();
        let state_tx = self.state_tx.clone();
        let result = self.result.clone();
        let tick = self.tick;

        let handle = tokio::spawn(async move {
            for phase in 2..=LAST_PHASE {
                tokio::time::sleep(tick).await;
                state_tx.send_replace(GenerationState::Generating { phase });
            }
            tokio::time::sleep(tick).await;

            match service.generate(&form, &settings).await {
                Ok(cv) => {
                    *result.lock().expect("result poisoned") = Some(cv);
                    match credits.consume_one() {
                        Ok(remaining) => info!("generation succeeded, {remaining} usos restantes"),
                        // start() gates on the ledger, so this is unreachable
                        // unless the balance changed underneath us.
                        Err(_) => warn!("generation succeeded with an empty ledger"),
                    }
                    state_tx.send_replace(GenerationState::Success);
                }
                Err(e) => {
                    warn!("generation failed: {e}");
                    state_tx.send_replace(GenerationState::Error {
                        message: e.to_string(),
                    });
                }
            }
        });
        *self.task.lock().expect("task poisoned") = Some(handle);
    }
}

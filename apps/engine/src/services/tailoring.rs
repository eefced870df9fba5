#![allow(dead_code)]

//! Tailored-generation service seam.
//!
//! The engine calls through this trait; the stand-in fabricates a
//! deterministic mapping with no model call. A failure toggle lets tests and
//! the demo drive the error path.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use crate::errors::AppError;
use crate::generation::synthesize::synthesize;
use crate::models::form::FormData;
use crate::models::generated::GeneratedCV;
use crate::models::settings::GenerationSettings;

#[async_trait]
pub trait TailoringService: Send + Sync {
    async fn generate(
        &self,
        form: &FormData,
        settings: &GenerationSettings,
    ) -> Result<GeneratedCV, AppError>;
}

#[derive(Default)]
pub struct MockTailoringService {
    fail: AtomicBool,
}

impl MockTailoringService {
    pub fn new() -> Self {
        Self::default()
    }

    /// When enabled, every generate call fails until switched back.
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl TailoringService for MockTailoringService {
    async fn generate(
        &self,
        form: &FormData,
        settings: &GenerationSettings,
    ) -> Result<GeneratedCV, AppError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::Generation(
                "Não foi possível gerar o CV. Tente novamente.".to_string(),
            ));
        }
        Ok(synthesize(form, settings))
    }
}

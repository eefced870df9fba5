#![allow(dead_code)]

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Engine configuration loaded from environment variables.
///
/// Every timing knob mirrors a fixed delay the product uses to simulate
/// backend work; all have defaults so the engine starts with no `.env`.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory where the file-backed key-value store keeps its slots.
    pub storage_dir: PathBuf,
    /// Debounce window between the last form mutation and the draft write.
    pub autosave_debounce_ms: u64,
    /// How long the autosave indicator stays in "saving" before "saved".
    pub autosave_settle_ms: u64,
    /// Interval between generation phases.
    pub generation_tick_ms: u64,
    /// Pause between generation success and the switch to the editor.
    pub handoff_delay_ms: u64,
    /// Artificial delay for the auth stand-in.
    pub auth_delay_ms: u64,
    /// Artificial delays for the source upload stand-in.
    pub upload_delay_ms: u64,
    pub parse_delay_ms: u64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            storage_dir: std::env::var("STORAGE_DIR")
                .unwrap_or_else(|_| ".cv-sob-medida".to_string())
                .into(),
            autosave_debounce_ms: env_u64("AUTOSAVE_DEBOUNCE_MS", 1000)?,
            autosave_settle_ms: env_u64("AUTOSAVE_SETTLE_MS", 500)?,
            generation_tick_ms: env_u64("GENERATION_TICK_MS", 800)?,
            handoff_delay_ms: env_u64("HANDOFF_DELAY_MS", 800)?,
            auth_delay_ms: env_u64("AUTH_DELAY_MS", 1000)?,
            upload_delay_ms: env_u64("UPLOAD_DELAY_MS", 800)?,
            parse_delay_ms: env_u64("PARSE_DELAY_MS", 1000)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn autosave_debounce(&self) -> Duration {
        Duration::from_millis(self.autosave_debounce_ms)
    }

    pub fn autosave_settle(&self) -> Duration {
        Duration::from_millis(self.autosave_settle_ms)
    }

    pub fn generation_tick(&self) -> Duration {
        Duration::from_millis(self.generation_tick_ms)
    }

    pub fn handoff_delay(&self) -> Duration {
        Duration::from_millis(self.handoff_delay_ms)
    }

    pub fn auth_delay(&self) -> Duration {
        Duration::from_millis(self.auth_delay_ms)
    }

    pub fn upload_delay(&self) -> Duration {
        Duration::from_millis(self.upload_delay_ms)
    }

    pub fn parse_delay(&self) -> Duration {
        Duration::from_millis(self.parse_delay_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            storage_dir: ".cv-sob-medida".into(),
            autosave_debounce_ms: 1000,
            autosave_settle_ms: 500,
            generation_tick_ms: 800,
            handoff_delay_ms: 800,
            auth_delay_ms: 1000,
            upload_delay_ms: 800,
            parse_delay_ms: 1000,
            rust_log: "info".to_string(),
        }
    }
}

fn env_u64(key: &str, default: u64) -> Result<u64> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<u64>()
            .with_context(|| format!("{key} must be a non-negative integer (got '{raw}')")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timings_match_product_constants() {
        let config = Config::default();
        assert_eq!(config.autosave_debounce(), Duration::from_millis(1000));
        assert_eq!(config.autosave_settle(), Duration::from_millis(500));
        assert_eq!(config.generation_tick(), Duration::from_millis(800));
        assert_eq!(config.auth_delay(), Duration::from_millis(1000));
    }

    #[test]
    fn test_env_u64_rejects_garbage() {
        std::env::set_var("TEST_ENGINE_BAD_MS", "fast");
        assert!(env_u64("TEST_ENGINE_BAD_MS", 10).is_err());
        std::env::remove_var("TEST_ENGINE_BAD_MS");
    }

    #[test]
    fn test_env_u64_falls_back_when_absent() {
        assert_eq!(env_u64("TEST_ENGINE_MISSING_MS", 250).unwrap(), 250);
    }
}

#![allow(dead_code)]

//! Panel collapse preferences, persisted as boolean-as-string under their
//! own keys. Garbage or absent values fall back to the caller's default.

use std::sync::Arc;

use tracing::debug;

use crate::errors::AppError;
use crate::storage::{KeyValueStore, SIDEBAR_COLLAPSED_KEY, SOURCE_COLLAPSED_KEY};

pub struct PanelPrefs {
    store: Arc<dyn KeyValueStore>,
}

impl PanelPrefs {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        PanelPrefs { store }
    }

    pub async fn source_collapsed(&self, default: bool) -> bool {
        self.read_flag(SOURCE_COLLAPSED_KEY, default).await
    }

    pub async fn set_source_collapsed(&self, collapsed: bool) -> Result<(), AppError> {
        self.store
            .set(SOURCE_COLLAPSED_KEY, bool_str(collapsed))
            .await
    }

    pub async fn sidebar_collapsed(&self, default: bool) -> bool {
        self.read_flag(SIDEBAR_COLLAPSED_KEY, default).await
    }

    pub async fn set_sidebar_collapsed(&self, collapsed: bool) -> Result<(), AppError> {
        self.store
            .set(SIDEBAR_COLLAPSED_KEY, bool_str(collapsed))
            .await
    }

    async fn read_flag(&self, key: &str, default: bool) -> bool {
        match self.store.get(key).await {
            Ok(Some(raw)) => match raw.as_str() {
                "true" => true,
                "false" => false,
                other => {
                    debug!("unexpected value '{other}' for {key}, using default");
                    default
                }
            },
            _ => default,
        }
    }
}

fn bool_str(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

#![allow(dead_code)]

//! History items — finalized or saved CV generations, independent of the
//! live draft. The embedded form/settings are snapshots, not references: the
//! active in-memory form is always a working copy.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::form::FormData;
use crate::models::generated::GeneratedCV;
use crate::models::settings::GenerationSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CvStatus {
    Draft,
    Generated,
    Exported,
}

impl CvStatus {
    pub fn label(&self) -> &'static str {
        match self {
            CvStatus::Draft => "Rascunho",
            CvStatus::Generated => "Gerado",
            CvStatus::Exported => "Exportado",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvHistoryItem {
    pub id: Uuid,
    pub name: String,
    pub target_job: String,
    pub company_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub status: CvStatus,
    pub form_data: FormData,
    pub settings: GenerationSettings,
    pub generated_content: Option<GeneratedCV>,
}

impl CvHistoryItem {
    /// Builds an item from the current working set, stamping both timestamps
    /// with the same instant.
    pub fn from_working(
        name: String,
        form_data: FormData,
        settings: GenerationSettings,
        generated_content: Option<GeneratedCV>,
        status: CvStatus,
    ) -> Self {
        let now = Utc::now();
        CvHistoryItem {
            id: Uuid::new_v4(),
            name,
            target_job: form_data.target_role.clone(),
            company_name: form_data.company_name.clone(),
            created_at: now,
            updated_at: now,
            status,
            form_data,
            settings,
            generated_content,
        }
    }
}

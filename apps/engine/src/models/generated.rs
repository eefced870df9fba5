#![allow(dead_code)]

//! The generated CV document. Produced only by the generation flow; freely
//! editable afterward through the editor.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::form::LanguageSkill;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceBlock {
    pub id: Uuid,
    pub company: String,
    pub role: String,
    /// Display period, e.g. "03/2021 – Atual".
    pub period: String,
    pub bullets: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationBlock {
    pub id: Uuid,
    pub institution: String,
    pub degree: String,
    pub field: String,
    pub year: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraProject {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtraCertification {
    pub name: String,
    pub issuer: String,
    pub year: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratedExtras {
    pub projects: Vec<ExtraProject>,
    pub certifications: Vec<ExtraCertification>,
}

impl GeneratedExtras {
    pub fn is_empty(&self) -> bool {
        self.projects.is_empty() && self.certifications.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedCV {
    pub headline: String,
    pub contact: String,
    pub summary: String,
    pub experience_blocks: Vec<ExperienceBlock>,
    pub education_blocks: Vec<EducationBlock>,
    pub skills: Vec<String>,
    pub languages: Vec<LanguageSkill>,
    pub extras: Option<GeneratedExtras>,
}

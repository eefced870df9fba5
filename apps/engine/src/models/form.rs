#![allow(dead_code)]

//! Working form data — the aggregate the wizard mutates and the draft store
//! persists.
//!
//! Every list entry carries a generated id so update/remove address entries
//! independently of order. The mutation helpers own the few invariants this
//! model has (skill/language uniqueness on insert, current role clearing the
//! end date). No cross-field checks: an end date before a start date is
//! accepted.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalData {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub city: String,
    pub state: String,
    pub linkedin: String,
    pub portfolio: String,
}

/// Dates are free-form text ("03/2021" style); nothing validates ordering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Experience {
    pub id: Uuid,
    pub company: String,
    pub role: String,
    pub start_date: String,
    pub end_date: String,
    pub is_current: bool,
    /// Newline-delimited bullet text; split into bullets at generation time.
    pub achievements: String,
}

impl Experience {
    pub fn blank() -> Self {
        Experience {
            id: Uuid::new_v4(),
            company: String::new(),
            role: String::new(),
            start_date: String::new(),
            end_date: String::new(),
            is_current: false,
            achievements: String::new(),
        }
    }

    /// An entry counts toward the experience-step gate only when both
    /// company and role are non-empty after trimming.
    pub fn is_filled(&self) -> bool {
        !self.company.trim().is_empty() && !self.role.trim().is_empty()
    }
}

/// Closed degree variants; serialized with the product's stable identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Degree {
    #[serde(rename = "tecnico")]
    Tecnico,
    #[serde(rename = "graduacao")]
    Graduacao,
    #[serde(rename = "pos-graduacao")]
    PosGraduacao,
    #[serde(rename = "mestrado")]
    Mestrado,
    #[serde(rename = "doutorado")]
    Doutorado,
    #[serde(rename = "curso-livre")]
    CursoLivre,
}

impl Degree {
    pub fn label(&self) -> &'static str {
        match self {
            Degree::Tecnico => "Técnico",
            Degree::Graduacao => "Graduação",
            Degree::PosGraduacao => "Pós-Graduação",
            Degree::Mestrado => "Mestrado",
            Degree::Doutorado => "Doutorado",
            Degree::CursoLivre => "Curso Livre",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Education {
    pub id: Uuid,
    pub institution: String,
    /// `None` until the user picks a degree.
    pub degree: Option<Degree>,
    pub field: String,
    pub end_year: String,
}

impl Education {
    pub fn blank() -> Self {
        Education {
            id: Uuid::new_v4(),
            institution: String::new(),
            degree: None,
            field: String::new(),
            end_year: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Proficiency {
    Basico,
    Intermediario,
    Avancado,
    Fluente,
    Nativo,
}

impl Proficiency {
    pub fn label(&self) -> &'static str {
        match self {
            Proficiency::Basico => "Básico",
            Proficiency::Intermediario => "Intermediário",
            Proficiency::Avancado => "Avançado",
            Proficiency::Fluente => "Fluente",
            Proficiency::Nativo => "Nativo",
        }
    }
}

/// Languages are keyed by name (no id); uniqueness is enforced on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageSkill {
    pub name: String,
    pub level: Proficiency,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub url: Option<String>,
}

impl Project {
    pub fn blank() -> Self {
        Project {
            id: Uuid::new_v4(),
            name: String::new(),
            description: String::new(),
            url: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certification {
    pub id: Uuid,
    pub name: String,
    pub issuer: String,
    pub year: String,
}

impl Certification {
    pub fn blank() -> Self {
        Certification {
            id: Uuid::new_v4(),
            name: String::new(),
            issuer: String::new(),
            year: String::new(),
        }
    }
}

/// The full working aggregate behind the wizard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormData {
    pub personal: PersonalData,
    pub target_role: String,
    pub seniority: String,
    pub location: String,
    pub job_description: String,
    pub job_url: String,
    pub company_name: String,
    pub professional_summary: String,
    pub experiences: Vec<Experience>,
    pub education: Vec<Education>,
    pub hard_skills: Vec<String>,
    pub soft_skills: Vec<String>,
    pub languages: Vec<LanguageSkill>,
    pub projects: Vec<Project>,
    pub certifications: Vec<Certification>,
}

impl Default for FormData {
    /// The empty form ships with one blank experience row and one blank
    /// education row, each with a fresh id, so the first step renders
    /// editable entries.
    fn default() -> Self {
        FormData {
            personal: PersonalData::default(),
            target_role: String::new(),
            seniority: String::new(),
            location: String::new(),
            job_description: String::new(),
            job_url: String::new(),
            company_name: String::new(),
            professional_summary: String::new(),
            experiences: vec![Experience::blank()],
            education: vec![Education::blank()],
            hard_skills: Vec::new(),
            soft_skills: Vec::new(),
            languages: Vec::new(),
            projects: Vec::new(),
            certifications: Vec::new(),
        }
    }
}

impl FormData {
    // ── Experience ──────────────────────────────────────────────────────────

    /// Appends a blank experience entry and returns its id.
    pub fn add_experience(&mut self) -> Uuid {
        let entry = Experience::blank();
        let id = entry.id;
        self.experiences.push(entry);
        id
    }

    /// Applies `apply` to the entry with the given id. Returns false when the
    /// id is unknown. A current role always ends with an empty end date.
    pub fn update_experience(&mut self, id: Uuid, apply: impl FnOnce(&mut Experience)) -> bool {
        match self.experiences.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                apply(entry);
                if entry.is_current {
                    entry.end_date.clear();
                }
                true
            }
            None => false,
        }
    }

    pub fn remove_experience(&mut self, id: Uuid) -> bool {
        let before = self.experiences.len();
        self.experiences.retain(|e| e.id != id);
        self.experiences.len() != before
    }

    pub fn has_filled_experience(&self) -> bool {
        self.experiences.iter().any(Experience::is_filled)
    }

    // ── Education ───────────────────────────────────────────────────────────

    pub fn add_education(&mut self) -> Uuid {
        let entry = Education::blank();
        let id = entry.id;
        self.education.push(entry);
        id
    }

    pub fn update_education(&mut self, id: Uuid, apply: impl FnOnce(&mut Education)) -> bool {
        match self.education.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                apply(entry);
                true
            }
            None => false,
        }
    }

    pub fn remove_education(&mut self, id: Uuid) -> bool {
        let before = self.education.len();
        self.education.retain(|e| e.id != id);
        self.education.len() != before
    }

    // ── Skills ──────────────────────────────────────────────────────────────

    /// Adds a hard skill; duplicates and blank input are no-ops.
    pub fn add_hard_skill(&mut self, skill: &str) -> bool {
        push_unique(&mut self.hard_skills, skill)
    }

    pub fn add_soft_skill(&mut self, skill: &str) -> bool {
        push_unique(&mut self.soft_skills, skill)
    }

    pub fn remove_hard_skill(&mut self, skill: &str) -> bool {
        let before = self.hard_skills.len();
        self.hard_skills.retain(|s| s != skill);
        self.hard_skills.len() != before
    }

    pub fn remove_soft_skill(&mut self, skill: &str) -> bool {
        let before = self.soft_skills.len();
        self.soft_skills.retain(|s| s != skill);
        self.soft_skills.len() != before
    }

    // ── Languages ───────────────────────────────────────────────────────────

    /// Adds a language; uniqueness is by trimmed name.
    pub fn add_language(&mut self, name: &str, level: Proficiency) -> bool {
        let name = name.trim();
        if name.is_empty() || self.languages.iter().any(|l| l.name == name) {
            return false;
        }
        self.languages.push(LanguageSkill {
            name: name.to_string(),
            level,
        });
        true
    }

    pub fn remove_language(&mut self, name: &str) -> bool {
        let before = self.languages.len();
        self.languages.retain(|l| l.name != name);
        self.languages.len() != before
    }

    // ── Extras ──────────────────────────────────────────────────────────────

    pub fn add_project(&mut self) -> Uuid {
        let entry = Project::blank();
        let id = entry.id;
        self.projects.push(entry);
        id
    }

    pub fn update_project(&mut self, id: Uuid, apply: impl FnOnce(&mut Project)) -> bool {
        match self.projects.iter_mut().find(|p| p.id == id) {
            Some(entry) => {
                apply(entry);
                true
            }
            None => false,
        }
    }

    pub fn remove_project(&mut self, id: Uuid) -> bool {
        let before = self.projects.len();
        self.projects.retain(|p| p.id != id);
        self.projects.len() != before
    }

    pub fn add_certification(&mut self) -> Uuid {
        let entry = Certification::blank();
        let id = entry.id;
        self.certifications.push(entry);
        id
    }

    pub fn update_certification(
        &mut self,
        id: Uuid,
        apply: impl FnOnce(&mut Certification),
    ) -> bool {
        match self.certifications.iter_mut().find(|c| c.id == id) {
            Some(entry) => {
                apply(entry);
                true
            }
            None => false,
        }
    }

    pub fn remove_certification(&mut self, id: Uuid) -> bool {
        let before = self.certifications.len();
        self.certifications.retain(|c| c.id != id);
        self.certifications.len() != before
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() || list.iter().any(|s| s == value) {
        return false;
    }
    list.push(value.to_string());
    true
}

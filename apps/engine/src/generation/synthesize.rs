#![allow(dead_code)]

//! Deterministic synthesis of a `GeneratedCV` from the working form.
//!
//! This is the tailored-generation stand-in: a direct field mapping with no
//! inference. Kept pure so the mapping is testable without timers or state.

use chrono::{DateTime, Utc};

use crate::models::form::{Education, Experience, FormData, PersonalData};
use crate::models::generated::{
    EducationBlock, ExperienceBlock, ExtraCertification, ExtraProject, GeneratedCV,
    GeneratedExtras,
};
use crate::models::settings::GenerationSettings;

/// Shown when the user left the professional summary empty.
const FALLBACK_SUMMARY: &str =
    "Profissional com experiência relevante para a vaga, com foco em resultados.";

pub fn synthesize(form: &FormData, settings: &GenerationSettings) -> GeneratedCV {
    let headline = if form.personal.full_name.trim().is_empty() {
        form.target_role.trim().to_string()
    } else {
        form.personal.full_name.trim().to_string()
    };

    let summary = if form.professional_summary.trim().is_empty() {
        FALLBACK_SUMMARY.to_string()
    } else {
        form.professional_summary.trim().to_string()
    };

    let experience_blocks = form
        .experiences
        .iter()
        .filter(|e| e.is_filled())
        .map(experience_block)
        .collect();

    let education_blocks = form
        .education
        .iter()
        .filter(|e| !e.institution.trim().is_empty())
        .map(education_block)
        .collect();

    let mut skills: Vec<String> = Vec::new();
    skills.extend(form.hard_skills.iter().cloned());
    skills.extend(form.soft_skills.iter().cloned());

    let extras = build_extras(form);

    GeneratedCV {
        headline,
        contact: contact_line(&form.personal, settings.include_address),
        summary,
        experience_blocks,
        education_blocks,
        skills,
        languages: form.languages.clone(),
        extras,
    }
}

/// Default document name for a fresh generation: target role plus date.
pub fn default_cv_name(form: &FormData, now: DateTime<Utc>) -> String {
    let role = form.target_role.trim();
    let role = if role.is_empty() { "CV" } else { role };
    format!("{} - {}", role, now.format("%d/%m/%Y"))
}

fn contact_line(personal: &PersonalData, include_address: bool) -> String {
    let mut parts: Vec<String> = Vec::new();
    for value in [&personal.email, &personal.phone] {
        if !value.trim().is_empty() {
            parts.push(value.trim().to_string());
        }
    }
    if include_address {
        match (personal.city.trim(), personal.state.trim()) {
            ("", "") => {}
            (city, "") => parts.push(city.to_string()),
            ("", state) => parts.push(state.to_string()),
            (city, state) => parts.push(format!("{city}, {state}")),
        }
    }
    for value in [&personal.linkedin, &personal.portfolio] {
        if !value.trim().is_empty() {
            parts.push(value.trim().to_string());
        }
    }
    parts.join(" · ")
}

fn experience_block(experience: &Experience) -> ExperienceBlock {
    ExperienceBlock {
        id: experience.id,
        company: experience.company.trim().to_string(),
        role: experience.role.trim().to_string(),
        period: period_line(experience),
        bullets: split_bullets(&experience.achievements),
    }
}

fn period_line(experience: &Experience) -> String {
    let start = experience.start_date.trim();
    let end = if experience.is_current {
        "Atual"
    } else {
        experience.end_date.trim()
    };
    match (start.is_empty(), end.is_empty()) {
        (true, true) => String::new(),
        (false, true) => start.to_string(),
        (true, false) => end.to_string(),
        (false, false) => format!("{start} – {end}"),
    }
}

/// Achievements are newline-delimited free text; blank lines are dropped.
fn split_bullets(achievements: &str) -> Vec<String> {
    achievements
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

fn education_block(education: &Education) -> EducationBlock {
    EducationBlock {
        id: education.id,
        institution: education.institution.trim().to_string(),
        degree: education
            .degree
            .map(|d| d.label().to_string())
            .unwrap_or_default(),
        field: education.field.trim().to_string(),
        year: education.end_year.trim().to_string(),
    }
}

fn build_extras(form: &FormData) -> Option<GeneratedExtras> {
    let extras = GeneratedExtras {
        projects: form
            .projects
            .iter()
            .filter(|p| !p.name.trim().is_empty())
            .map(|p| ExtraProject {
                name: p.name.trim().to_string(),
                description: p.description.trim().to_string(),
            })
            .collect(),
        certifications: form
            .certifications
            .iter()
            .filter(|c| !c.name.trim().is_empty())
            .map(|c| ExtraCertification {
                name: c.name.trim().to_string(),
                issuer: c.issuer.trim().to_string(),
                year: c.year.trim().to_string(),
            })
            .collect(),
    };
    if extras.is_empty() {
        None
    } else {
        Some(extras)
    }
}

#![allow(dead_code)]

//! Document export seam. The real product hands a `GeneratedCV` to a PDF
//! renderer; the stand-in produces a plain-text artifact and the caller
//! treats the call as a fire-and-forget acknowledgment.

use async_trait::async_trait;
use bytes::Bytes;

use crate::errors::AppError;
use crate::models::generated::GeneratedCV;

#[async_trait]
pub trait ExportService: Send + Sync {
    async fn export(&self, cv: &GeneratedCV) -> Result<Bytes, AppError>;
}

#[derive(Default)]
pub struct PlainTextExport;

impl PlainTextExport {
    pub fn new() -> Self {
        PlainTextExport
    }
}

#[async_trait]
impl ExportService for PlainTextExport {
    async fn export(&self, cv: &GeneratedCV) -> Result<Bytes, AppError> {
        Ok(Bytes::from(render_plain_text(cv)))
    }
}

/// Renders the document as readable UTF-8 text, section by section.
pub fn render_plain_text(cv: &GeneratedCV) -> String {
    let mut out = String::new();
    out.push_str(&cv.headline);
    out.push('\n');
    if !cv.contact.is_empty() {
        out.push_str(&cv.contact);
        out.push('\n');
    }
    out.push('\n');
    out.push_str("Resumo\n");
    out.push_str(&cv.summary);
    out.push('\n');

    if !cv.experience_blocks.is_empty() {
        out.push_str("\nExperiência\n");
        for block in &cv.experience_blocks {
            out.push_str(&format!("{} — {}", block.role, block.company));
            if !block.period.is_empty() {
                out.push_str(&format!(" ({})", block.period));
            }
            out.push('\n');
            for bullet in &block.bullets {
                out.push_str(&format!("  • {bullet}\n"));
            }
        }
    }

    if !cv.education_blocks.is_empty() {
        out.push_str("\nFormação\n");
        for block in &cv.education_blocks {
            let mut line = block.institution.clone();
            for part in [&block.degree, &block.field, &block.year] {
                if !part.is_empty() {
                    line.push_str(&format!(" · {part}"));
                }
            }
            out.push_str(&line);
            out.push('\n');
        }
    }

    if !cv.skills.is_empty() {
        out.push_str("\nSkills\n");
        out.push_str(&cv.skills.join(", "));
        out.push('\n');
    }

    if !cv.languages.is_empty() {
        out.push_str("\nIdiomas\n");
        for language in &cv.languages {
            out.push_str(&format!("{} ({})\n", language.name, language.level.label()));
        }
    }

    if let Some(extras) = &cv.extras {
        if !extras.projects.is_empty() {
            out.push_str("\nProjetos\n");
            for project in &extras.projects {
                out.push_str(&format!("{}: {}\n", project.name, project.description));
            }
        }
        if !extras.certifications.is_empty() {
            out.push_str("\nCertificações\n");
            for cert in &extras.certifications {
                out.push_str(&format!("{} ({}, {})\n", cert.name, cert.issuer, cert.year));
            }
        }
    }

    out
}

mod autosave;
mod config;
mod credits;
mod errors;
mod flow;
mod generation;
mod history;
mod models;
mod prefs;
mod services;
mod session;
mod source;
mod state;
mod storage;
mod wizard;

use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::generation::flow::GenerationState;
use crate::models::form::Proficiency;
use crate::services::export::render_plain_text;
use crate::session::CvSession;
use crate::state::AppState;
use crate::storage::JsonFileStore;

/// Headless driver: wires the engine with file-backed storage and walks one
/// session end to end. Views are external collaborators; this exercises the
/// flow they would call into.
#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting CV Sob Medida engine v{}", env!("CARGO_PKG_VERSION"));

    let storage = Arc::new(JsonFileStore::new(&config.storage_dir)?);
    let state = AppState::new(config, storage);
    let mut session = CvSession::resume(state).await;

    info!(
        "resumed draft: step {:?}, {} item(s) in history",
        session.wizard_step(),
        session.history().list().await.len()
    );

    // Fill the wizard the way the form steps would.
    session.update_form(|form| {
        form.personal.full_name = "Ana Souza".to_string();
        form.personal.email = "ana.souza@example.com".to_string();
        form.personal.phone = "(11) 99999-0000".to_string();
        form.personal.city = "São Paulo".to_string();
        form.personal.state = "SP".to_string();
    });
    session.next_step();

    session.update_form(|form| {
        form.target_role = "Engenheira de Software Sênior".to_string();
        form.seniority = "Sênior".to_string();
        form.location = "Remoto".to_string();
    });
    session.next_step();

    session.update_form(|form| {
        form.job_description =
            "Buscamos pessoa engenheira com experiência em sistemas distribuídos.".to_string();
        form.company_name = "Globex".to_string();
    });
    session.next_step();

    session.update_form(|form| {
        let id = form.experiences[0].id;
        form.update_experience(id, |e| {
            e.company = "Acme".to_string();
            e.role = "Engenheira de Software".to_string();
            e.start_date = "03/2021".to_string();
            e.is_current = true;
            e.achievements =
                "Reduzi a latência p99 em 40%\nLiderei a migração para Rust".to_string();
        });
    });
    session.next_step();

    session.update_form(|form| {
        form.add_hard_skill("Rust");
        form.add_hard_skill("SQL");
        form.add_soft_skill("Comunicação");
        form.add_language("Inglês", Proficiency::Avancado);
    });
    session.next_step();

    session.update_form(|form| {
        form.professional_summary =
            "Engenheira com oito anos construindo serviços de alta disponibilidade.".to_string();
    });
    session.next_step();

    session.update_form(|form| {
        let id = form.add_project();
        form.update_project(id, |p| {
            p.name = "Pipeline de ingestão".to_string();
            p.description = "Processamento de 2M eventos/dia".to_string();
        });
    });

    // Terminal action from the last step: validation, auth gate, plan,
    // generation.
    session.request_generate()?;
    info!("auth gate raised: {}", session.is_auth_modal_open());
    session
        .login("ana.souza@example.com", "segredo123")
        .await
        .map_err(|e| anyhow::anyhow!("login stand-in rejected: {e}"))?;
    session.confirm_plan("free")?;

    let outcome = session.await_generation().await;
    match outcome {
        GenerationState::Success => {
            info!("now on screen {:?}", session.screen());
        }
        other => {
            info!("generation did not succeed: {other:?}");
            return Ok(());
        }
    }

    // A small editor pass, then export.
    session
        .update_generated(|cv| {
            cv.summary = format!("{} Aberta a posições remotas.", cv.summary);
        })
        .await;
    session.rename_cv("CV Globex - Sênior").await?;
    let artifact = session.export().await?;
    info!("exported artifact: {} bytes", artifact.len());

    if let Some(cv) = session.generated() {
        println!("{}", render_plain_text(cv));
    }

    info!(
        "{} uso(s) restante(s), {} item(s) no histórico",
        session.credits_balance(),
        session.history().list().await.len()
    );
    Ok(())
}

use std::sync::Arc;

use crate::config::Config;
use crate::services::auth::{AuthService, MockAuthService};
use crate::services::export::{ExportService, PlainTextExport};
use crate::services::tailoring::{MockTailoringService, TailoringService};
use crate::storage::KeyValueStore;

/// Shared application state handed to every session.
///
/// All collaborators sit behind trait objects so tests can substitute fakes;
/// controller logic never touches ambient storage or real services directly.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn KeyValueStore>,
    pub auth: Arc<dyn AuthService>,
    pub tailoring: Arc<dyn TailoringService>,
    pub export: Arc<dyn ExportService>,
}

impl AppState {
    /// Wires the stand-in services with the configured delays.
    pub fn new(config: Config, storage: Arc<dyn KeyValueStore>) -> Self {
        let auth = Arc::new(MockAuthService::new(config.auth_delay()));
        AppState {
            storage,
            auth,
            tailoring: Arc::new(MockTailoringService::new()),
            export: Arc::new(PlainTextExport::new()),
            config,
        }
    }
}

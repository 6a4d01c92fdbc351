//! Application state and composition.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio_util::sync::CancellationToken;

use crate::commands::{catalog, Dispatcher, PatternTable, RegistryError};
use crate::infrastructure::ports::{BackendPort, RandomPort};
use crate::infrastructure::settings::BotSettings;
use crate::stores::SessionStore;

/// Collaborators shared by every handler.
pub struct Services {
    pub backend: Arc<dyn BackendPort>,
    pub random: Arc<dyn RandomPort>,
    pub sessions: Arc<SessionStore>,
    pub settings: Arc<BotSettings>,
    /// Cancelled by `stop`; the HTTP server drains and exits
    pub shutdown: CancellationToken,
    pub started_at: DateTime<Utc>,
}

/// Main application state.
///
/// Passed to HTTP handlers via Axum state.
pub struct App {
    pub services: Arc<Services>,
    pub dispatcher: Dispatcher,
}

impl App {
    /// Register the full command catalog around `services`.
    pub fn new(services: Services) -> Result<Self, RegistryError> {
        let mut table = PatternTable::new();
        catalog::register_all(&mut table)?;
        tracing::debug!(commands = table.len(), "Command catalog registered");

        let services = Arc::new(services);
        let dispatcher = Dispatcher::new(Arc::new(table), Arc::clone(&services));
        Ok(Self {
            services,
            dispatcher,
        })
    }
}

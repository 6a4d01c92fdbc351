//! Fatebot - Main entry point.

use std::sync::Arc;

use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fatebot_engine::{
    api,
    app::{App, Services},
    infrastructure::{
        backend::HttpBackendClient,
        random::SystemRandom,
        resilient_backend::{ResilientBackend, RetryConfig},
        settings::BotSettings,
    },
    stores::SessionStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root (the bot may be run from `crates/engine`).
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fatebot_engine=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let settings = BotSettings::from_env()?;

    // Create infrastructure clients
    let http_backend = Arc::new(HttpBackendClient::new(
        &settings.backend_url,
        settings.backend_timeout,
    ));
    let retry_config = RetryConfig::default();
    tracing::info!(
        backend_url = %settings.backend_url,
        timeout_secs = settings.backend_timeout.as_secs(),
        max_retries = retry_config.max_retries,
        base_delay_ms = retry_config.base_delay_ms,
        "Game backend client configured"
    );
    let backend = Arc::new(ResilientBackend::new(http_backend, retry_config));

    let shutdown = CancellationToken::new();
    let bind = settings.bind;
    let services = Services {
        backend,
        random: Arc::new(SystemRandom::new()),
        sessions: Arc::new(SessionStore::new()),
        settings: Arc::new(settings),
        shutdown: shutdown.clone(),
        started_at: Utc::now(),
    };

    // Create application
    let app = Arc::new(App::new(services)?);
    let settings = &app.services.settings;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        revision = settings.revision.as_deref().unwrap_or("unknown"),
        fingerprint = %settings.fingerprint(),
        host = %settings.host_label,
        admin_role = %settings.admin_role,
        "Started"
    );

    let router = api::http::routes()
        .with_state(app)
        .layer(TraceLayer::new_for_http());

    // Start server
    let listener = tokio::net::TcpListener::bind(bind).await?;
    tracing::info!("Listening on {}", bind);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await?;

    tracing::info!("Stopped");
    Ok(())
}

/// Resolves on `stop` or Ctrl-C, whichever comes first.
async fn shutdown_signal(token: CancellationToken) {
    tokio::select! {
        _ = token.cancelled() => {
            tracing::info!("Shutdown requested by command");
        }
        result = tokio::signal::ctrl_c() => {
            if let Err(e) = result {
                tracing::error!(error = %e, "Failed to listen for Ctrl-C");
                token.cancelled().await;
                return;
            }
            tracing::info!("Received Ctrl-C");
        }
    }
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}

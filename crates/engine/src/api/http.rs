//! HTTP routes.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

use fatebot_shared::{ChatMessage, MessageResponse};

use crate::app::App;

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/messages", post(handle_message))
}

async fn health() -> &'static str {
    "OK"
}

/// One chat message in, zero or more replies out. Command failures are
/// replies too, so this never returns an error status.
async fn handle_message(
    State(app): State<Arc<App>>,
    Json(message): Json<ChatMessage>,
) -> Json<MessageResponse> {
    let replies = app.dispatcher.dispatch(&message).await;
    Json(MessageResponse { replies })
}

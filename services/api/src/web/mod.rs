pub mod protocol;
pub mod rest;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub use rest::{
    create_session_handler, delete_session_handler, get_session_handler, start_session_handler,
    submit_answer_handler,
};
pub use state::AppState;

/// Upper bound for a create-session upload (resume plus job description).
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Builds the API router. Middleware layers (CORS, tracing) are added by the binary.
pub fn build_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .route("/sessions", post(create_session_handler))
        .route(
            "/sessions/{session_id}",
            get(get_session_handler).delete(delete_session_handler),
        )
        .route("/sessions/{session_id}/start", post(start_session_handler))
        .route("/sessions/{session_id}/answers", post(submit_answer_handler))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(app_state)
}

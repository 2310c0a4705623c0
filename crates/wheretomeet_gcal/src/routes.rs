// --- File: crates/wheretomeet_gcal/src/routes.rs ---

use std::sync::Arc;

use axum::{routing::post, Router};

use crate::handlers::{schedule_handler, GcalState};

/// Router for the scheduling gateway, mounted under `/api`.
pub fn routes(state: Arc<GcalState>) -> Router {
    Router::new()
        .route("/calendar", post(schedule_handler))
        .with_state(state)
}

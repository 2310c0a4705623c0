// --- File: crates/wheretomeet_places/src/routes.rs ---

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handlers::{details_handler, nearby_handler, resolve_handler, PlacesState};

/// Router for the places feature, mounted under `/api`.
pub fn routes(state: Arc<PlacesState>) -> Router {
    Router::new()
        .route("/places/resolve", get(resolve_handler))
        .route("/places/nearby", get(nearby_handler))
        .route("/places/{place_id}/details", get(details_handler))
        .with_state(state)
}

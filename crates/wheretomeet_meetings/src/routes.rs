// --- File: crates/wheretomeet_meetings/src/routes.rs ---

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers::{
    auth_page_handler, choose_venue_handler, create_meeting_handler, get_meeting_handler,
    join_meeting_handler, join_page_handler, latest_meeting_handler, meeting_events_handler,
    recommendations_handler, retry_search_handler, set_creator_location_handler, MeetingsState,
};

/// Meeting API, mounted under `/api`.
pub fn routes(state: Arc<MeetingsState>) -> Router {
    Router::new()
        .route("/meetings", post(create_meeting_handler))
        .route("/meetings/latest", get(latest_meeting_handler))
        .route("/meetings/{id}", get(get_meeting_handler))
        .route("/meetings/{id}/creator-location", put(set_creator_location_handler))
        .route("/meetings/{id}/join", post(join_meeting_handler))
        .route("/meetings/{id}/venue", post(choose_venue_handler))
        .route("/meetings/{id}/recommendations", get(recommendations_handler))
        .route("/meetings/{id}/events", get(meeting_events_handler))
        .route("/meetings/{id}/search", post(retry_search_handler))
        .with_state(state)
}

/// Share-link and sign-in landings, mounted at the root.
pub fn page_routes(state: Arc<MeetingsState>) -> Router {
    Router::new()
        .route("/join/{id}", get(join_page_handler))
        .route("/auth", get(auth_page_handler))
        .with_state(state)
}

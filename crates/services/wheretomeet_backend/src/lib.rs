// --- File: crates/services/wheretomeet_backend/src/lib.rs ---
pub mod app_state;
pub mod service_factory;

use axum::{routing::get, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;
use wheretomeet_gcal::routes as gcal_routes;
use wheretomeet_meetings::routes as meetings_routes;
use wheretomeet_places::routes as places_routes;

use crate::app_state::AppState;

/// The full application: the API under `/api` plus the root-level
/// share-link and sign-in landings.
pub fn app(state: &AppState) -> Router {
    let meetings_state = state.meetings_state();

    // Nested "/" answers at "/api" itself.
    let mut api_router = Router::new()
        .route("/", get(|| async { "Welcome to WhereToMeet API!" }))
        .route("/health", get(|| async { "ok" }))
        .merge(meetings_routes::routes(meetings_state.clone()))
        .merge(gcal_routes::routes(state.gcal_state()));
    match state.places_state() {
        Some(places_state) => api_router = api_router.merge(places_routes::routes(places_state)),
        None => warn!("Places provider not configured; /api/places routes are disabled"),
    }

    #[allow(unused_mut)]
    let mut app = Router::new()
        .nest("/api", api_router)
        .merge(meetings_routes::page_routes(meetings_state));

    #[cfg(feature = "openapi")]
    {
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;
        use wheretomeet_gcal::doc::GcalApiDoc;
        use wheretomeet_meetings::doc::MeetingsApiDoc;
        use wheretomeet_places::doc::PlacesApiDoc;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "WhereToMeet API",
                version = "0.1.0",
                description = "Meet halfway: shared meetings, venue search and scheduling"
            ),
            servers((url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(MeetingsApiDoc::openapi());
        openapi_doc.merge(PlacesApiDoc::openapi());
        openapi_doc.merge(GcalApiDoc::openapi());
        tracing::info!("Adding Swagger UI at /api/docs");
        app = app.merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc));
    }

    app.layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

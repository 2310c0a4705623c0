// File: crates/wheretomeet_places/src/handlers.rs
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::Json,
};
use serde::Deserialize;
use tracing::info;
use wheretomeet_common::auth::require_user;
use wheretomeet_common::models::{LatLng, ResolvedPlace, VenueDetail};
use wheretomeet_common::services::{SharedAuthProvider, SharedPlacesService};
use wheretomeet_common::{external_service_error, not_found, validation_error, WhereToMeetError};
use wheretomeet_config::AppConfig;

use crate::logic::{resolve_location, search_venues, VenueSearchOutcome};

/// Shared state for the places routes.
#[derive(Clone)]
pub struct PlacesState {
    pub config: Arc<AppConfig>,
    pub places: SharedPlacesService,
    pub auth: Option<SharedAuthProvider>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[derive(Debug, Deserialize)]
pub struct ResolveQuery {
    pub query: String,
}

#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[derive(Debug, Deserialize)]
pub struct NearbyParams {
    pub lat: f64,
    pub lng: f64,
}

/// Geocode free text to a place.
#[axum::debug_handler]
pub async fn resolve_handler(
    State(state): State<Arc<PlacesState>>,
    headers: HeaderMap,
    Query(params): Query<ResolveQuery>,
) -> Result<Json<ResolvedPlace>, WhereToMeetError> {
    require_user(state.auth.as_ref(), &headers).await?;
    let place = resolve_location(state.places.as_ref(), &params.query).await?;
    info!(place_id = %place.place_id, "resolved location");
    Ok(Json(place))
}

/// Venue search around an arbitrary point. Provider failures come back as a
/// notice inside a 200 response.
#[axum::debug_handler]
pub async fn nearby_handler(
    State(state): State<Arc<PlacesState>>,
    headers: HeaderMap,
    Query(params): Query<NearbyParams>,
) -> Result<Json<VenueSearchOutcome>, WhereToMeetError> {
    require_user(state.auth.as_ref(), &headers).await?;
    let center = LatLng::new(params.lat, params.lng);
    center.validate().map_err(validation_error)?;
    Ok(Json(search_venues(state.places.as_ref(), center).await))
}

#[axum::debug_handler]
pub async fn details_handler(
    State(state): State<Arc<PlacesState>>,
    headers: HeaderMap,
    Path(place_id): Path<String>,
) -> Result<Json<VenueDetail>, WhereToMeetError> {
    require_user(state.auth.as_ref(), &headers).await?;
    let detail = state
        .places
        .place_details(&place_id)
        .await
        .map_err(|e| external_service_error("places", e))?;
    detail
        .map(Json)
        .ok_or_else(|| not_found(format!("venue {}", place_id)))
}

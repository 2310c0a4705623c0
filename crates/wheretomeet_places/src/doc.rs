// File: crates/wheretomeet_places/src/doc.rs

#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;
use wheretomeet_common::models::{LatLng, ResolvedPlace, VenueCandidate, VenueDetail};

use crate::logic::VenueSearchOutcome;

#[utoipa::path(
    get,
    path = "/places/resolve",
    params(
        ("query" = String, Query, description = "Free-text address or place name", example = "Grand Central Terminal")
    ),
    responses(
        (status = 200, description = "Best matching place", body = ResolvedPlace),
        (status = 401, description = "Sign-in required", body = String),
        (status = 404, description = "No place matches the query", body = String),
        (status = 502, description = "Places provider failure", body = String)
    ),
    tag = "places"
)]
fn doc_resolve_handler() {}

#[utoipa::path(
    get,
    path = "/places/nearby",
    params(
        ("lat" = f64, Query, description = "Latitude of the search center", example = 40.01),
        ("lng" = f64, Query, description = "Longitude of the search center", example = -73.01)
    ),
    responses(
        (status = 200, description = "Ranked venues, or an empty list with a notice", body = VenueSearchOutcome,
         example = json!({
             "candidates": [{
                 "place_id": "ChIJ123",
                 "name": "Halfway Diner",
                 "vicinity": "12 Midway Ave",
                 "rating": 4.6,
                 "review_count": 812,
                 "geometry": { "lat": 40.011, "lng": -73.009 },
                 "open_now": true
             }]
         })
        ),
        (status = 400, description = "Coordinates out of range", body = String),
        (status = 401, description = "Sign-in required", body = String)
    ),
    tag = "places"
)]
fn doc_nearby_handler() {}

#[utoipa::path(
    get,
    path = "/places/{place_id}/details",
    params(
        ("place_id" = String, Path, description = "Provider place id")
    ),
    responses(
        (status = 200, description = "Venue details", body = VenueDetail),
        (status = 404, description = "Unknown place", body = String),
        (status = 502, description = "Places provider failure", body = String)
    ),
    tag = "places"
)]
fn doc_details_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(doc_resolve_handler, doc_nearby_handler, doc_details_handler),
    components(schemas(LatLng, ResolvedPlace, VenueCandidate, VenueDetail, VenueSearchOutcome)),
    tags((name = "places", description = "Location resolution and venue search")),
    servers((url = "/api", description = "Places API server"))
)]
pub struct PlacesApiDoc;

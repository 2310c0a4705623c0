// --- File: crates/wheretomeet_places/src/logic.rs ---
//! Midpoint and venue search.
//!
//! The search policy is fixed: one primary query (2 km, open now), and only
//! when that comes back empty, exactly one fallback query (5 km, no open-now
//! filter). Results are ranked by rating, truncated, and then enriched with a
//! best-effort open/closed lookup per candidate.

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use wheretomeet_common::models::{LatLng, NearbyQuery, ResolvedPlace, VenueCandidate};
use wheretomeet_common::services::PlacesService;
use wheretomeet_common::{external_service_error, not_found, validation_error, WhereToMeetError};

pub const VENUE_CATEGORY: &str = "restaurant";
pub const PRIMARY_RADIUS_M: u32 = 2000;
pub const FALLBACK_RADIUS_M: u32 = 5000;
pub const MAX_CANDIDATES: usize = 9;

pub const NOTICE_SEARCH_FAILED: &str = "Could not search for venues right now. Please try again.";
pub const NOTICE_NO_VENUES: &str = "No venues found near the midpoint.";

/// Arithmetic mean of two coordinate pairs, componentwise.
pub fn midpoint(a: LatLng, b: LatLng) -> LatLng {
    LatLng::new((a.lat + b.lat) / 2.0, (a.lng + b.lng) / 2.0)
}

pub fn primary_query(center: LatLng) -> NearbyQuery {
    NearbyQuery {
        center,
        radius_m: PRIMARY_RADIUS_M,
        category: VENUE_CATEGORY.to_string(),
        open_now: true,
    }
}

pub fn fallback_query(center: LatLng) -> NearbyQuery {
    NearbyQuery {
        center,
        radius_m: FALLBACK_RADIUS_M,
        category: VENUE_CATEGORY.to_string(),
        open_now: false,
    }
}

/// Result of one venue search. Failures never escape as errors; they become
/// an empty candidate list plus a user-facing notice.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct VenueSearchOutcome {
    pub candidates: Vec<VenueCandidate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
}

impl VenueSearchOutcome {
    fn failed() -> Self {
        Self {
            candidates: Vec::new(),
            notice: Some(NOTICE_SEARCH_FAILED.to_string()),
        }
    }
}

/// Stable descending sort by rating (unrated counts as 0), then truncation.
pub fn rank_candidates(mut candidates: Vec<VenueCandidate>) -> Vec<VenueCandidate> {
    candidates.sort_by(|a, b| {
        let ra = a.rating.unwrap_or(0.0);
        let rb = b.rating.unwrap_or(0.0);
        rb.total_cmp(&ra)
    });
    candidates.truncate(MAX_CANDIDATES);
    candidates
}

/// Fills `open_now` for every candidate. Lookups run concurrently on the
/// calling task; a failed lookup leaves that candidate's status unknown.
pub async fn enrich_open_status<P>(places: &P, candidates: &mut [VenueCandidate])
where
    P: PlacesService + ?Sized,
{
    let lookups = candidates
        .iter()
        .map(|candidate| places.open_now(&candidate.place_id));
    let statuses = join_all(lookups).await;

    for (candidate, status) in candidates.iter_mut().zip(statuses) {
        candidate.open_now = match status {
            Ok(open) => open,
            Err(e) => {
                debug!(place_id = %candidate.place_id, "open status lookup failed: {}", e);
                None
            }
        };
    }
}

/// Searches dining venues around `center`.
pub async fn search_venues<P>(places: &P, center: LatLng) -> VenueSearchOutcome
where
    P: PlacesService + ?Sized,
{
    let found = match places.nearby_search(primary_query(center)).await {
        Ok(results) if !results.is_empty() => results,
        Ok(_) => {
            info!(
                lat = center.lat,
                lng = center.lng,
                "no venues within {} m, widening to {} m",
                PRIMARY_RADIUS_M,
                FALLBACK_RADIUS_M
            );
            match places.nearby_search(fallback_query(center)).await {
                Ok(results) => results,
                Err(e) => {
                    warn!("fallback venue search failed: {}", e);
                    return VenueSearchOutcome::failed();
                }
            }
        }
        Err(e) => {
            // Only an empty primary result is retried.
            warn!("venue search failed: {}", e);
            return VenueSearchOutcome::failed();
        }
    };

    if found.is_empty() {
        return VenueSearchOutcome {
            candidates: Vec::new(),
            notice: Some(NOTICE_NO_VENUES.to_string()),
        };
    }

    let mut candidates = rank_candidates(found);
    enrich_open_status(places, &mut candidates).await;
    info!(count = candidates.len(), "venue search complete");

    VenueSearchOutcome {
        candidates,
        notice: None,
    }
}

/// Geocodes free text to the provider's best match.
pub async fn resolve_location<P>(places: &P, query: &str) -> Result<ResolvedPlace, WhereToMeetError>
where
    P: PlacesService + ?Sized,
{
    let query = query.trim();
    if query.is_empty() {
        return Err(validation_error("query must not be empty"));
    }

    let results = places
        .text_search(query)
        .await
        .map_err(|e| external_service_error("places", e))?;

    results
        .into_iter()
        .next()
        .ok_or_else(|| not_found(format!("no place matches '{}'", query)))
}

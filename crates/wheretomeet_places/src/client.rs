//! Google Places (legacy web service) client.
//!
//! Implements [`PlacesService`] over the `nearbysearch`, `details` and
//! `textsearch` JSON endpoints. The provider reports failures inside a 200
//! body through its `status` field; `OK` and `ZERO_RESULTS` are successes,
//! everything else is surfaced as [`PlacesError::ApiError`].

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};
use wheretomeet_common::models::{LatLng, NearbyQuery, ResolvedPlace, VenueCandidate, VenueDetail};
use wheretomeet_common::services::{BoxFuture, PlacesService};
use wheretomeet_config::PlacesConfig;

/// Photo references kept per venue.
const MAX_PHOTOS: usize = 3;

const DETAIL_FIELDS: &str =
    "place_id,name,rating,photos,opening_hours,formatted_phone_number,website,price_level";

/// Errors that can occur when talking to the places provider
#[derive(Error, Debug)]
pub enum PlacesError {
    #[error("HTTP request error: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Places API returned HTTP {0}")]
    HttpStatus(u16),

    /// Non-OK `status` field in the response body
    #[error("Places API error {status}: {message}")]
    ApiError { status: String, message: String },

    #[error("Missing configuration: {0}")]
    ConfigError(String),
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default = "Vec::new")]
    results: Vec<T>,
    #[serde(default)]
    result: Option<ApiPlaceDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiGeometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct ApiNearbyPlace {
    place_id: String,
    name: String,
    #[serde(default)]
    vicinity: Option<String>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    user_ratings_total: Option<u32>,
    geometry: ApiGeometry,
}

#[derive(Debug, Deserialize)]
struct ApiTextPlace {
    place_id: String,
    name: String,
    #[serde(default)]
    formatted_address: Option<String>,
    geometry: ApiGeometry,
}

#[derive(Debug, Deserialize)]
struct ApiOpeningHours {
    #[serde(default)]
    open_now: Option<bool>,
    #[serde(default)]
    weekday_text: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct ApiPhoto {
    photo_reference: String,
}

#[derive(Debug, Deserialize, Default)]
struct ApiPlaceDetail {
    #[serde(default)]
    place_id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    photos: Vec<ApiPhoto>,
    #[serde(default)]
    opening_hours: Option<ApiOpeningHours>,
    #[serde(default)]
    formatted_phone_number: Option<String>,
    #[serde(default)]
    website: Option<String>,
    #[serde(default)]
    price_level: Option<u8>,
}

impl From<ApiNearbyPlace> for VenueCandidate {
    fn from(place: ApiNearbyPlace) -> Self {
        VenueCandidate {
            place_id: place.place_id,
            name: place.name,
            vicinity: place.vicinity.unwrap_or_default(),
            rating: place.rating,
            review_count: place.user_ratings_total,
            geometry: place.geometry.location,
            open_now: None,
        }
    }
}

/// Client for the Google Places web service.
pub struct GooglePlacesClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl GooglePlacesClient {
    pub fn new(config: &PlacesConfig) -> Result<Self, PlacesError> {
        if config.api_key.trim().is_empty() || config.api_key == wheretomeet_config::SECRET_MARKER {
            return Err(PlacesError::ConfigError("places.api_key is not set".to_string()));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn call<T: for<'de> Deserialize<'de>>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<ApiEnvelope<T>, PlacesError> {
        let url = format!("{}/{}/json", self.base_url, endpoint);
        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            warn!("Places {} returned HTTP {}", endpoint, response.status());
            return Err(PlacesError::HttpStatus(response.status().as_u16()));
        }

        let envelope: ApiEnvelope<T> = response.json().await?;
        debug!(endpoint, status = %envelope.status, results = envelope.results.len(), "places response");
        Ok(envelope)
    }
}

/// Maps the provider status to success (`true` = has data, `false` = empty) or an error.
fn check_status<T>(envelope: &ApiEnvelope<T>) -> Result<bool, PlacesError> {
    match envelope.status.as_str() {
        "OK" => Ok(true),
        "ZERO_RESULTS" | "NOT_FOUND" => Ok(false),
        other => Err(PlacesError::ApiError {
            status: other.to_string(),
            message: envelope.error_message.clone().unwrap_or_default(),
        }),
    }
}

impl PlacesService for GooglePlacesClient {
    type Error = PlacesError;

    fn nearby_search(&self, query: NearbyQuery) -> BoxFuture<'_, Vec<VenueCandidate>, Self::Error> {
        Box::pin(async move {
            let mut params = vec![
                ("location", format!("{},{}", query.center.lat, query.center.lng)),
                ("radius", query.radius_m.to_string()),
                ("type", query.category.clone()),
            ];
            if query.open_now {
                params.push(("opennow", "true".to_string()));
            }

            let envelope = self.call::<ApiNearbyPlace>("nearbysearch", &params).await?;
            if !check_status(&envelope)? {
                return Ok(Vec::new());
            }
            Ok(envelope.results.into_iter().map(VenueCandidate::from).collect())
        })
    }

    fn open_now(&self, place_id: &str) -> BoxFuture<'_, Option<bool>, Self::Error> {
        let place_id = place_id.to_string();
        Box::pin(async move {
            let params = [("place_id", place_id), ("fields", "opening_hours".to_string())];
            let envelope = self.call::<serde_json::Value>("details", &params).await?;
            if !check_status(&envelope)? {
                return Ok(None);
            }
            Ok(envelope
                .result
                .and_then(|detail| detail.opening_hours)
                .and_then(|hours| hours.open_now))
        })
    }

    fn text_search(&self, query: &str) -> BoxFuture<'_, Vec<ResolvedPlace>, Self::Error> {
        let query = query.to_string();
        Box::pin(async move {
            let envelope = self
                .call::<ApiTextPlace>("textsearch", &[("query", query)])
                .await?;
            if !check_status(&envelope)? {
                return Ok(Vec::new());
            }
            Ok(envelope
                .results
                .into_iter()
                .map(|place| ResolvedPlace {
                    address: place.formatted_address.unwrap_or_else(|| place.name.clone()),
                    place_id: place.place_id,
                    name: place.name,
                    location: place.geometry.location,
                })
                .collect())
        })
    }

    fn place_details(&self, place_id: &str) -> BoxFuture<'_, Option<VenueDetail>, Self::Error> {
        let place_id = place_id.to_string();
        Box::pin(async move {
            let params = [("place_id", place_id.clone()), ("fields", DETAIL_FIELDS.to_string())];
            let envelope = self.call::<serde_json::Value>("details", &params).await?;
            if !check_status(&envelope)? {
                return Ok(None);
            }
            let Some(detail) = envelope.result else {
                return Ok(None);
            };
            let hours = detail.opening_hours;
            Ok(Some(VenueDetail {
                place_id: detail.place_id.unwrap_or(place_id),
                name: detail.name.unwrap_or_default(),
                rating: detail.rating,
                photo_references: detail
                    .photos
                    .into_iter()
                    .take(MAX_PHOTOS)
                    .map(|photo| photo.photo_reference)
                    .collect(),
                weekday_text: hours.map(|h| h.weekday_text).unwrap_or_default(),
                phone_number: detail.formatted_phone_number,
                website: detail.website,
                price_level: detail.price_level,
            }))
        })
    }
}

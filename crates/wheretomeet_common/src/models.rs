// --- File: crates/wheretomeet_common/src/models.rs ---

//! The meeting record and the values that travel with it.
//!
//! A [`Meeting`] is the only shared mutable resource. It is only ever changed
//! through [`Meeting::apply`], which enforces the lifecycle
//! `pending -> active -> completed` and never clears a location once set.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::error::WhereToMeetError;

/// A bare coordinate pair in decimal degrees.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Rejects non-finite values and coordinates outside the WGS84 ranges.
    pub fn validate(&self) -> Result<(), String> {
        if !self.lat.is_finite() || !self.lng.is_finite() {
            return Err("coordinates must be finite numbers".to_string());
        }
        if !(-90.0..=90.0).contains(&self.lat) {
            return Err(format!("latitude {} out of range", self.lat));
        }
        if !(-180.0..=180.0).contains(&self.lng) {
            return Err(format!("longitude {} out of range", self.lng));
        }
        Ok(())
    }
}

/// A party's position as entered by them: coordinates plus formatted address.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
}

impl Location {
    pub fn new(lat: f64, lng: f64, address: impl Into<String>) -> Self {
        Self {
            lat,
            lng,
            address: address.into(),
        }
    }

    pub fn coordinates(&self) -> LatLng {
        LatLng::new(self.lat, self.lng)
    }
}

/// The venue the creator picked.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChosenLocation {
    pub lat: f64,
    pub lng: f64,
    pub address: String,
    pub name: String,
    pub place_id: String,
}

impl From<&VenueCandidate> for ChosenLocation {
    fn from(candidate: &VenueCandidate) -> Self {
        Self {
            lat: candidate.geometry.lat,
            lng: candidate.geometry.lng,
            address: candidate.vicinity.clone(),
            name: candidate.name.clone(),
            place_id: candidate.place_id.clone(),
        }
    }
}

/// Lifecycle of a meeting. Declaration order is the only legal direction of travel.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingStatus {
    Pending,
    Active,
    Completed,
}

impl fmt::Display for MeetingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MeetingStatus::Pending => "pending",
            MeetingStatus::Active => "active",
            MeetingStatus::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// The shared meeting record. This is also its wire and storage shape.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meeting {
    pub id: Uuid,
    pub creator_id: String,
    pub participant_id: Option<String>,
    pub creator_location: Option<Location>,
    pub participant_location: Option<Location>,
    pub chosen_location: Option<ChosenLocation>,
    pub status: MeetingStatus,
    pub created_at: DateTime<Utc>,
}

/// The closed set of writes a meeting accepts. The writer is passed separately.
#[derive(Debug, Clone, PartialEq)]
pub enum MeetingUpdate {
    /// Creator sets or moves their own location.
    CreatorLocation(Location),
    /// Participant attaches to the meeting (or moves their location while active).
    Join(Location),
    /// Creator picks the venue.
    ChooseVenue(ChosenLocation),
}

impl MeetingUpdate {
    pub fn kind(&self) -> &'static str {
        match self {
            MeetingUpdate::CreatorLocation(_) => "creator_location",
            MeetingUpdate::Join(_) => "join",
            MeetingUpdate::ChooseVenue(_) => "choose_venue",
        }
    }
}

/// Why an update was refused. The record is left untouched in every case.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransitionError {
    #[error("only the meeting creator can {0}")]
    NotCreator(&'static str),
    #[error("the creator cannot join their own meeting")]
    CreatorCannotJoin,
    #[error("meeting is {0}; it can only be joined while pending")]
    NotPending(MeetingStatus),
    #[error("meeting is {0}; a venue can only be chosen while active")]
    NotActive(MeetingStatus),
    #[error("locations are frozen once a venue has been chosen")]
    Frozen,
    #[error("invalid location: {0}")]
    InvalidLocation(String),
}

impl From<TransitionError> for WhereToMeetError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::NotCreator(_) | TransitionError::CreatorCannotJoin => {
                WhereToMeetError::ForbiddenError(err.to_string())
            }
            TransitionError::InvalidLocation(_) => WhereToMeetError::ValidationError(err.to_string()),
            _ => WhereToMeetError::ConflictError(err.to_string()),
        }
    }
}

impl Meeting {
    /// A fresh `pending` meeting owned by `creator_id`.
    pub fn new(creator_id: impl Into<String>, creator_location: Option<Location>) -> Self {
        Self {
            id: Uuid::new_v4(),
            creator_id: creator_id.into(),
            participant_id: None,
            creator_location,
            participant_location: None,
            chosen_location: None,
            status: MeetingStatus::Pending,
            created_at: Utc::now(),
        }
    }

    /// Path a participant visits to attach to this meeting.
    pub fn join_path(&self) -> String {
        format!("/join/{}", self.id)
    }

    pub fn is_creator(&self, user_id: &str) -> bool {
        self.creator_id == user_id
    }

    pub fn is_party(&self, user_id: &str) -> bool {
        self.is_creator(user_id) || self.participant_id.as_deref() == Some(user_id)
    }

    /// Both parties' coordinates, creator first, once both are known.
    pub fn coordinate_pair(&self) -> Option<(LatLng, LatLng)> {
        match (&self.creator_location, &self.participant_location) {
            (Some(a), Some(b)) => Some((a.coordinates(), b.coordinates())),
            _ => None,
        }
    }

    /// Checks the status/field invariants of the record.
    pub fn is_consistent(&self) -> bool {
        match self.status {
            MeetingStatus::Pending => self.participant_location.is_none(),
            MeetingStatus::Active => {
                self.participant_location.is_some() && self.chosen_location.is_none()
            }
            MeetingStatus::Completed => {
                self.participant_location.is_some() && self.chosen_location.is_some()
            }
        }
    }

    /// Applies `update` on behalf of `actor_id`.
    ///
    /// Status only moves forward and no location is ever cleared. On error the
    /// record is unchanged.
    pub fn apply(&mut self, actor_id: &str, update: MeetingUpdate) -> Result<(), TransitionError> {
        match update {
            MeetingUpdate::CreatorLocation(location) => {
                if !self.is_creator(actor_id) {
                    return Err(TransitionError::NotCreator("set the creator location"));
                }
                if self.status == MeetingStatus::Completed {
                    return Err(TransitionError::Frozen);
                }
                validate_location(&location.coordinates())?;
                self.creator_location = Some(location);
            }
            MeetingUpdate::Join(location) => {
                if self.is_creator(actor_id) {
                    return Err(TransitionError::CreatorCannotJoin);
                }
                validate_location(&location.coordinates())?;
                match self.status {
                    MeetingStatus::Pending => {
                        self.participant_id = Some(actor_id.to_string());
                        self.participant_location = Some(location);
                        self.status = MeetingStatus::Active;
                    }
                    MeetingStatus::Active if self.participant_id.as_deref() == Some(actor_id) => {
                        self.participant_location = Some(location);
                    }
                    MeetingStatus::Completed if self.participant_id.as_deref() == Some(actor_id) => {
                        return Err(TransitionError::Frozen);
                    }
                    status => return Err(TransitionError::NotPending(status)),
                }
            }
            MeetingUpdate::ChooseVenue(venue) => {
                if !self.is_creator(actor_id) {
                    return Err(TransitionError::NotCreator("choose the venue"));
                }
                if self.status != MeetingStatus::Active {
                    return Err(TransitionError::NotActive(self.status));
                }
                validate_location(&LatLng::new(venue.lat, venue.lng))?;
                self.chosen_location = Some(venue);
                self.status = MeetingStatus::Completed;
            }
        }
        Ok(())
    }
}

fn validate_location(coordinates: &LatLng) -> Result<(), TransitionError> {
    coordinates.validate().map_err(TransitionError::InvalidLocation)
}

/// A transient search result. Never persisted.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueCandidate {
    pub place_id: String,
    pub name: String,
    pub vicinity: String,
    pub rating: Option<f64>,
    pub review_count: Option<u32>,
    pub geometry: LatLng,
    /// Absent means unknown, which is not the same as closed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_now: Option<bool>,
}

/// First match of a free-text place search.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPlace {
    pub place_id: String,
    pub name: String,
    pub address: String,
    pub location: LatLng,
}

impl From<ResolvedPlace> for Location {
    fn from(place: ResolvedPlace) -> Self {
        Location::new(place.location.lat, place.location.lng, place.address)
    }
}

/// Extended information shown for a single venue.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct VenueDetail {
    pub place_id: String,
    pub name: String,
    pub rating: Option<f64>,
    /// Provider photo references, at most three.
    pub photo_references: Vec<String>,
    pub weekday_text: Vec<String>,
    pub phone_number: Option<String>,
    pub website: Option<String>,
    pub price_level: Option<u8>,
}

/// Parameters of one nearby-search call.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyQuery {
    pub center: LatLng,
    pub radius_m: u32,
    pub category: String,
    pub open_now: bool,
}

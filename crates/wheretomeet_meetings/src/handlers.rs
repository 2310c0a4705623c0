// File: crates/wheretomeet_meetings/src/handlers.rs
use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Json, Redirect, Response,
    },
};
use futures::stream::{self, Stream};
use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, mpsc};
use tracing::{error, info, warn};
use uuid::Uuid;
use wheretomeet_common::auth::{bearer_token, redirect_target, require_user, sign_in_url};
use wheretomeet_common::models::{ChosenLocation, Location, Meeting, MeetingStatus, MeetingUpdate};
use wheretomeet_common::services::{AuthUser, SharedAuthProvider, SharedPlacesService};
use wheretomeet_common::{auth_error, conflict, forbidden, not_found, WhereToMeetError};
use wheretomeet_config::AppConfig;
use wheretomeet_places::{midpoint, search_venues, VenueSearchOutcome};

use crate::driver::{SessionDriver, NOTICE_SEARCH_UNAVAILABLE};
use crate::session::SessionEvent;
use crate::store::SharedMeetingStore;

/// Buffered session events per open stream.
const EVENT_BUFFER: usize = 16;

/// Pending retry requests before slow sessions treat the backlog as one retry.
const RETRY_BUFFER: usize = 16;

/// Shared state for the meeting routes.
#[derive(Clone)]
pub struct MeetingsState {
    pub config: Arc<AppConfig>,
    pub store: SharedMeetingStore,
    pub places: Option<SharedPlacesService>,
    pub auth: Option<SharedAuthProvider>,
    retries: broadcast::Sender<Uuid>,
}

impl MeetingsState {
    pub fn new(
        config: Arc<AppConfig>,
        store: SharedMeetingStore,
        places: Option<SharedPlacesService>,
        auth: Option<SharedAuthProvider>,
    ) -> Self {
        let (retries, _) = broadcast::channel(RETRY_BUFFER);
        Self {
            config,
            store,
            places,
            auth,
            retries,
        }
    }

    fn share_link(&self, meeting: &Meeting) -> String {
        format!("{}{}", self.config.server.link_base(), meeting.join_path())
    }

    async fn load(&self, id: Uuid) -> Result<Meeting, WhereToMeetError> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| not_found("Meeting not found"))
    }
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Default, Deserialize)]
pub struct CreateMeetingRequest {
    /// Creator location, if already known.
    #[serde(default)]
    pub location: Option<Location>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Serialize)]
pub struct CreatedMeeting {
    pub meeting: Meeting,
    /// Absolute link the creator sends to the participant.
    pub share_link: String,
}

/// How the caller relates to a meeting they opened through a share link.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinRole {
    Creator,
    Participant,
    Visitor,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Serialize)]
pub struct JoinView {
    pub meeting: Meeting,
    pub role: JoinRole,
    /// Whether the caller may submit a location with `POST /api/meetings/{id}/join`.
    pub can_join: bool,
}

#[cfg_attr(feature = "openapi", derive(utoipa::IntoParams))]
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthParams {
    pub redirect_to: Option<String>,
}

fn join_view(meeting: Meeting, user: &AuthUser) -> JoinView {
    let role = if meeting.is_creator(&user.id) {
        JoinRole::Creator
    } else if meeting.participant_id.as_deref() == Some(user.id.as_str()) {
        JoinRole::Participant
    } else {
        JoinRole::Visitor
    };
    let can_join = match role {
        JoinRole::Creator => false,
        JoinRole::Participant => meeting.status == MeetingStatus::Active,
        JoinRole::Visitor => meeting.status == MeetingStatus::Pending,
    };
    JoinView {
        meeting,
        role,
        can_join,
    }
}

/// Create a pending meeting owned by the caller.
#[axum::debug_handler]
pub async fn create_meeting_handler(
    State(state): State<Arc<MeetingsState>>,
    headers: HeaderMap,
    Json(request): Json<CreateMeetingRequest>,
) -> Result<(StatusCode, Json<CreatedMeeting>), WhereToMeetError> {
    let user = require_user(state.auth.as_ref(), &headers).await?;
    if let Some(location) = &request.location {
        location
            .coordinates()
            .validate()
            .map_err(WhereToMeetError::ValidationError)?;
    }

    let meeting = state.store.insert(Meeting::new(user.id, request.location)).await?;
    let share_link = state.share_link(&meeting);
    info!(meeting_id = %meeting.id, "share link issued");
    Ok((StatusCode::CREATED, Json(CreatedMeeting { meeting, share_link })))
}

/// The caller's most recently created meeting.
#[axum::debug_handler]
pub async fn latest_meeting_handler(
    State(state): State<Arc<MeetingsState>>,
    headers: HeaderMap,
) -> Result<Json<Meeting>, WhereToMeetError> {
    let user = require_user(state.auth.as_ref(), &headers).await?;
    state
        .store
        .latest_for_creator(&user.id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found("No meetings yet"))
}

#[axum::debug_handler]
pub async fn get_meeting_handler(
    State(state): State<Arc<MeetingsState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<Meeting>, WhereToMeetError> {
    require_user(state.auth.as_ref(), &headers).await?;
    Ok(Json(state.load(id).await?))
}

#[axum::debug_handler]
pub async fn set_creator_location_handler(
    State(state): State<Arc<MeetingsState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(location): Json<Location>,
) -> Result<Json<Meeting>, WhereToMeetError> {
    let user = require_user(state.auth.as_ref(), &headers).await?;
    let meeting = state
        .store
        .apply(id, &user.id, MeetingUpdate::CreatorLocation(location))
        .await?;
    Ok(Json(meeting))
}

/// Attach the caller as participant with their location.
#[axum::debug_handler]
pub async fn join_meeting_handler(
    State(state): State<Arc<MeetingsState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(location): Json<Location>,
) -> Result<Json<Meeting>, WhereToMeetError> {
    let user = require_user(state.auth.as_ref(), &headers).await?;
    let meeting = state
        .store
        .apply(id, &user.id, MeetingUpdate::Join(location))
        .await?;
    Ok(Json(meeting))
}

#[axum::debug_handler]
pub async fn choose_venue_handler(
    State(state): State<Arc<MeetingsState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(venue): Json<ChosenLocation>,
) -> Result<Json<Meeting>, WhereToMeetError> {
    let user = require_user(state.auth.as_ref(), &headers).await?;
    let meeting = state
        .store
        .apply(id, &user.id, MeetingUpdate::ChooseVenue(venue))
        .await?;
    Ok(Json(meeting))
}

/// One-shot venue search around the meeting's midpoint.
#[axum::debug_handler]
pub async fn recommendations_handler(
    State(state): State<Arc<MeetingsState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<VenueSearchOutcome>, WhereToMeetError> {
    let user = require_user(state.auth.as_ref(), &headers).await?;
    let meeting = state.load(id).await?;
    if !meeting.is_party(&user.id) {
        return Err(forbidden("only the meeting's parties can see recommendations"));
    }
    if meeting.status != MeetingStatus::Active {
        return Err(conflict(format!("meeting is {}", meeting.status)));
    }
    let (a, b) = meeting
        .coordinate_pair()
        .ok_or_else(|| conflict("both locations are required"))?;

    let outcome = match &state.places {
        Some(places) => search_venues(places.as_ref(), midpoint(a, b)).await,
        None => VenueSearchOutcome {
            candidates: Vec::new(),
            notice: Some(NOTICE_SEARCH_UNAVAILABLE.to_string()),
        },
    };
    Ok(Json(outcome))
}

/// Manual retry: reruns the venue search in every open session of the
/// meeting. Answers 202 even when no session is listening.
#[axum::debug_handler]
pub async fn retry_search_handler(
    State(state): State<Arc<MeetingsState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, WhereToMeetError> {
    let user = require_user(state.auth.as_ref(), &headers).await?;
    let meeting = state.load(id).await?;
    if !meeting.is_party(&user.id) {
        return Err(forbidden("only the meeting's parties can search venues"));
    }
    if meeting.status != MeetingStatus::Active {
        return Err(conflict(format!("meeting is {}", meeting.status)));
    }
    let sessions = state.retries.send(id).unwrap_or(0);
    info!(meeting_id = %id, sessions, "venue search retry requested");
    Ok(StatusCode::ACCEPTED)
}

fn to_sse(event: &SessionEvent) -> Event {
    let builder = Event::default().event(event.name());
    match builder.json_data(event) {
        Ok(event) => event,
        Err(e) => {
            error!("failed to encode session event: {}", e);
            Event::default().event("error").data("encoding failed")
        }
    }
}

/// Live session for one meeting as server-sent events.
///
/// The current record is sent first, followed by every committed change,
/// recommendation list and notice. Closing the connection ends the session.
pub async fn meeting_events_handler(
    State(state): State<Arc<MeetingsState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, WhereToMeetError> {
    let user = require_user(state.auth.as_ref(), &headers).await?;
    let meeting = state.load(id).await?;
    if !meeting.is_party(&user.id) {
        return Err(forbidden("only the meeting's parties can follow it"));
    }

    let (tx, rx) = mpsc::channel(EVENT_BUFFER);
    let driver = SessionDriver::new(state.store.clone(), state.places.clone())
        .with_retries(state.retries.clone());
    tokio::spawn(async move {
        if let Err(e) = driver.run(id, tx).await {
            warn!(meeting_id = %id, "meeting session failed: {}", e);
        }
    });

    let stream = stream::unfold(rx, |mut rx| async move {
        let event = rx.recv().await?;
        Some((Ok(to_sse(&event)), rx))
    });
    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

/// Share-link landing. Unauthenticated visitors are sent to sign in and
/// brought back here afterwards.
#[axum::debug_handler]
pub async fn join_page_handler(
    State(state): State<Arc<MeetingsState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Response, WhereToMeetError> {
    let return_path = format!("/join/{}", id);
    if bearer_token(&headers).is_none() {
        return Ok(Redirect::to(&sign_in_url(&return_path)).into_response());
    }
    let user = match require_user(state.auth.as_ref(), &headers).await {
        Ok(user) => user,
        Err(WhereToMeetError::AuthError(_)) => {
            return Ok(Redirect::to(&sign_in_url(&return_path)).into_response());
        }
        Err(e) => return Err(e),
    };
    let meeting = state.load(id).await?;
    Ok(Json(join_view(meeting, &user)).into_response())
}

/// Sign-in landing. A signed-in caller is forwarded to the sanitised
/// `redirectTo` target.
#[axum::debug_handler]
pub async fn auth_page_handler(
    State(state): State<Arc<MeetingsState>>,
    headers: HeaderMap,
    Query(params): Query<AuthParams>,
) -> Result<Redirect, WhereToMeetError> {
    match require_user(state.auth.as_ref(), &headers).await {
        Ok(_) => Ok(Redirect::to(&redirect_target(params.redirect_to.as_deref()))),
        Err(WhereToMeetError::AuthError(_)) => Err(auth_error("Sign in to continue")),
        Err(e) => Err(e),
    }
}

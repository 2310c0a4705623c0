// File: crates/wheretomeet_gcal/src/handlers.rs
use std::sync::Arc;

use axum::{extract::State, http::HeaderMap, response::Json};
use tracing::{error, info};
use uuid::Uuid;
use wheretomeet_common::auth::{provider_token, require_user};
use wheretomeet_common::models::MeetingStatus;
use wheretomeet_common::services::{AuthUser, SharedAuthProvider, SharedCalendarService};
use wheretomeet_common::{
    config_error, conflict, forbidden, internal_error, not_found, WhereToMeetError,
};
use wheretomeet_config::AppConfig;
use wheretomeet_meetings::SharedMeetingStore;

use crate::logic::{build_event, ScheduleRequest, ScheduleResponse};

/// Shared state for the calendar route.
#[derive(Clone)]
pub struct GcalState {
    pub config: Arc<AppConfig>,
    pub calendar: Option<SharedCalendarService>,
    pub store: SharedMeetingStore,
    pub auth: Option<SharedAuthProvider>,
}

/// E-mail of the other party of `meeting_id`, as seen from `user`.
async fn counterpart_email(
    state: &GcalState,
    meeting_id: Uuid,
    user: &AuthUser,
) -> Result<String, WhereToMeetError> {
    let meeting = state
        .store
        .get(meeting_id)
        .await?
        .ok_or_else(|| not_found("Meeting not found"))?;
    if !meeting.is_party(&user.id) {
        return Err(forbidden("only the meeting's parties can schedule it"));
    }
    if meeting.status != MeetingStatus::Completed {
        return Err(conflict("a venue has to be chosen before scheduling"));
    }

    let other = if meeting.is_creator(&user.id) {
        meeting
            .participant_id
            .ok_or_else(|| not_found("Participant not found"))?
    } else {
        meeting.creator_id
    };
    let auth = state
        .auth
        .as_ref()
        .ok_or_else(|| config_error("auth backend is not configured"))?;
    auth.user_email(&other)
        .await
        .map_err(|e| {
            error!("participant lookup failed: {}", e);
            internal_error(format!("Could not look up the participant: {}", e))
        })?
        .ok_or_else(|| not_found("Participant not found"))
}

/// The gateway reports upstream failures as 500, never 502 or 504.
fn gateway_failure(err: WhereToMeetError) -> WhereToMeetError {
    match err {
        WhereToMeetError::ExternalServiceError {
            service_name,
            message,
        } => internal_error(format!("{} failed: {}", service_name, message)),
        WhereToMeetError::TimeoutError(message) | WhereToMeetError::HttpError(message) => {
            internal_error(message)
        }
        other => other,
    }
}

/// Create a calendar event in the signed-in user's calendar.
///
/// Scheduling never changes the meeting; any failure here leaves it as it was.
#[axum::debug_handler]
pub async fn schedule_handler(
    State(state): State<Arc<GcalState>>,
    headers: HeaderMap,
    Json(request): Json<ScheduleRequest>,
) -> Result<Json<ScheduleResponse>, WhereToMeetError> {
    let user = require_user(state.auth.as_ref(), &headers)
        .await
        .map_err(gateway_failure)?;
    let access_token = provider_token(&headers)
        .ok_or_else(|| config_error("calendar credentials are missing; sign in with Google again"))?;
    let gcal = state
        .config
        .gcal
        .as_ref()
        .ok_or_else(|| config_error("calendar is not configured"))?;
    let calendar = state
        .calendar
        .as_ref()
        .ok_or_else(|| config_error("calendar is not configured"))?;

    let mut attendees: Vec<String> = user.email.iter().cloned().collect();
    if let Some(meeting_id) = request.meeting_id {
        attendees.push(counterpart_email(&state, meeting_id, &user).await?);
    }

    let event = build_event(
        &request,
        gcal.default_time_zone.as_deref(),
        &gcal.event_description,
        attendees,
    )?;

    let created = calendar
        .create_event(access_token, &gcal.calendar_id, event)
        .await
        .map_err(|e| {
            error!("calendar provider failed: {}", e);
            internal_error(format!("Failed to create calendar event: {}", e))
        })?;

    info!(user_id = %user.id, event_id = ?created.event_id, "meeting scheduled");
    Ok(Json(ScheduleResponse {
        success: true,
        event_id: created.event_id.unwrap_or_default(),
    }))
}

// --- File: crates/wheretomeet_gcal/src/logic.rs ---
//! Request parsing for the scheduling gateway: wire shapes, time zone and
//! time parsing, and assembly of the provider-neutral event.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wheretomeet_common::services::CalendarEvent;

use crate::service::GcalServiceError;

const LOCAL_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Body of `POST /calendar`.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    pub summary: String,
    pub location: String,
    /// RFC 3339, or local `YYYY-MM-DDTHH:MM[:SS]` in `time_zone`.
    pub start_time: String,
    pub end_time: String,
    /// IANA zone name.
    #[serde(default)]
    pub time_zone: String,
    /// Adds the other party of this meeting as an attendee.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_id: Option<Uuid>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResponse {
    pub success: bool,
    pub event_id: String,
}

/// The request's zone, else the configured default, else UTC.
pub fn resolve_time_zone(requested: &str, fallback: Option<&str>) -> Result<Tz, GcalServiceError> {
    let name = Some(requested.trim())
        .filter(|name| !name.is_empty())
        .or(fallback.map(str::trim).filter(|name| !name.is_empty()))
        .unwrap_or("UTC");
    name.parse::<Tz>()
        .map_err(|_| GcalServiceError::InvalidTimeZone(name.to_string()))
}

/// Parses an event boundary. Values with an offset are taken as-is; local
/// values are placed in `tz`, taking the earlier instant when a clock change
/// makes them ambiguous.
pub fn parse_event_time(value: &str, tz: Tz) -> Result<DateTime<Utc>, GcalServiceError> {
    let value = value.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(value) {
        return Ok(at.with_timezone(&Utc));
    }

    let naive = LOCAL_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .ok_or_else(|| GcalServiceError::TimeParseError(format!("'{}' is not a date-time", value)))?;

    tz.from_local_datetime(&naive)
        .earliest()
        .map(|at| at.with_timezone(&Utc))
        .ok_or_else(|| {
            GcalServiceError::TimeParseError(format!("'{}' does not exist in {}", value, tz.name()))
        })
}

/// Builds the event for `request`. Dates in the past are accepted; a
/// zero-length event is allowed, an inverted one is not.
pub fn build_event(
    request: &ScheduleRequest,
    fallback_time_zone: Option<&str>,
    description: &str,
    attendees: Vec<String>,
) -> Result<CalendarEvent, GcalServiceError> {
    let tz = resolve_time_zone(&request.time_zone, fallback_time_zone)?;
    let start = parse_event_time(&request.start_time, tz)?;
    let end = parse_event_time(&request.end_time, tz)?;
    if end < start {
        return Err(GcalServiceError::CalculationError(
            "End time must not be before start time".to_string(),
        ));
    }

    let mut unique: Vec<String> = Vec::with_capacity(attendees.len());
    for email in attendees {
        if !unique.iter().any(|known| known.eq_ignore_ascii_case(&email)) {
            unique.push(email);
        }
    }

    Ok(CalendarEvent {
        summary: request.summary.clone(),
        location: request.location.clone(),
        description: Some(description.to_string()),
        start,
        end,
        time_zone: tz.name().to_string(),
        attendees: unique,
    })
}

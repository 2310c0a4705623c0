// File: crates/wheretomeet_gcal/src/doc.rs

#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;

use crate::logic::{ScheduleRequest, ScheduleResponse};

#[utoipa::path(
    post,
    path = "/calendar",
    params(
        ("X-Provider-Token" = String, Header, description = "OAuth access token of the user's calendar provider")
    ),
    request_body(content = ScheduleRequest, example = json!({
        "summary": "Meeting at Halfway Diner",
        "location": "12 Midway Ave",
        "startTime": "2026-10-20T18:30:00",
        "endTime": "2026-10-20T18:30:00",
        "timeZone": "America/New_York",
        "meetingId": "0b6f9c1e-6f2a-4d1b-9a7e-3c2f1d0e9b8a"
    })),
    responses(
        (status = 200, description = "Event created", body = ScheduleResponse,
         example = json!({ "success": true, "eventId": "c0ffee1234" })
        ),
        (status = 400, description = "Unparsable time or unknown time zone", body = String),
        (status = 401, description = "Sign-in required", body = String),
        (status = 404, description = "Meeting or participant not found", body = String),
        (status = 409, description = "No venue chosen yet", body = String),
        (status = 500, description = "Missing credentials, missing configuration or provider failure", body = String)
    ),
    tag = "calendar"
)]
fn doc_schedule_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(doc_schedule_handler),
    components(schemas(ScheduleRequest, ScheduleResponse)),
    tags((name = "calendar", description = "Scheduling the chosen venue")),
    servers((url = "/api", description = "Calendar API server"))
)]
pub struct GcalApiDoc;

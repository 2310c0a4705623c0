// File: crates/wheretomeet_meetings/src/doc.rs

#![allow(dead_code)]
#![cfg(feature = "openapi")]
use utoipa::OpenApi;
use wheretomeet_common::models::{
    ChosenLocation, LatLng, Location, Meeting, MeetingStatus, VenueCandidate,
};
use wheretomeet_places::VenueSearchOutcome;

use crate::handlers::{CreateMeetingRequest, CreatedMeeting, JoinRole, JoinView};

#[utoipa::path(
    post,
    path = "/meetings",
    request_body = CreateMeetingRequest,
    responses(
        (status = 201, description = "Meeting created", body = CreatedMeeting,
         example = json!({
             "meeting": {
                 "id": "0b6f9c1e-6f2a-4d1b-9a7e-3c2f1d0e9b8a",
                 "creator_id": "user-1",
                 "participant_id": null,
                 "creator_location": { "lat": 40.7527, "lng": -73.9772, "address": "89 E 42nd St" },
                 "participant_location": null,
                 "chosen_location": null,
                 "status": "pending",
                 "created_at": "2026-10-18T09:30:00Z"
             },
             "share_link": "http://localhost:8086/join/0b6f9c1e-6f2a-4d1b-9a7e-3c2f1d0e9b8a"
         })
        ),
        (status = 400, description = "Invalid creator location", body = String),
        (status = 401, description = "Sign-in required", body = String)
    ),
    tag = "meetings"
)]
fn doc_create_meeting_handler() {}

#[utoipa::path(
    get,
    path = "/meetings/latest",
    responses(
        (status = 200, description = "Caller's most recent meeting", body = Meeting),
        (status = 404, description = "Caller has no meetings", body = String)
    ),
    tag = "meetings"
)]
fn doc_latest_meeting_handler() {}

#[utoipa::path(
    get,
    path = "/meetings/{id}",
    params(("id" = String, Path, description = "Meeting id")),
    responses(
        (status = 200, description = "Meeting record", body = Meeting),
        (status = 404, description = "Meeting not found", body = String)
    ),
    tag = "meetings"
)]
fn doc_get_meeting_handler() {}

#[utoipa::path(
    put,
    path = "/meetings/{id}/creator-location",
    params(("id" = String, Path, description = "Meeting id")),
    request_body = Location,
    responses(
        (status = 200, description = "Updated meeting", body = Meeting),
        (status = 403, description = "Caller is not the creator", body = String),
        (status = 409, description = "Meeting is completed", body = String)
    ),
    tag = "meetings"
)]
fn doc_set_creator_location_handler() {}

#[utoipa::path(
    post,
    path = "/meetings/{id}/join",
    params(("id" = String, Path, description = "Meeting id")),
    request_body = Location,
    responses(
        (status = 200, description = "Meeting is now active", body = Meeting),
        (status = 403, description = "The creator cannot join their own meeting", body = String),
        (status = 409, description = "Meeting already has a participant", body = String)
    ),
    tag = "meetings"
)]
fn doc_join_meeting_handler() {}

#[utoipa::path(
    post,
    path = "/meetings/{id}/venue",
    params(("id" = String, Path, description = "Meeting id")),
    request_body = ChosenLocation,
    responses(
        (status = 200, description = "Meeting is now completed", body = Meeting),
        (status = 403, description = "Caller is not the creator", body = String),
        (status = 409, description = "Meeting is not active", body = String)
    ),
    tag = "meetings"
)]
fn doc_choose_venue_handler() {}

#[utoipa::path(
    get,
    path = "/meetings/{id}/recommendations",
    params(("id" = String, Path, description = "Meeting id")),
    responses(
        (status = 200, description = "Ranked venues around the midpoint, or a notice", body = VenueSearchOutcome),
        (status = 409, description = "Meeting is not active", body = String)
    ),
    tag = "meetings"
)]
fn doc_recommendations_handler() {}

#[utoipa::path(
    get,
    path = "/meetings/{id}/events",
    params(("id" = String, Path, description = "Meeting id")),
    responses(
        (status = 200, description = "Server-sent events named `meeting`, `recommendations` and `notice`", content_type = "text/event-stream", body = String),
        (status = 403, description = "Caller is not a party of the meeting", body = String),
        (status = 404, description = "Meeting not found", body = String)
    ),
    tag = "meetings"
)]
fn doc_meeting_events_handler() {}

#[utoipa::path(
    post,
    path = "/meetings/{id}/search",
    params(("id" = String, Path, description = "Meeting id")),
    responses(
        (status = 202, description = "Open sessions of the meeting rerun their venue search"),
        (status = 403, description = "Caller is not a party of the meeting", body = String),
        (status = 409, description = "Meeting is not active", body = String)
    ),
    tag = "meetings"
)]
fn doc_retry_search_handler() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        doc_create_meeting_handler,
        doc_latest_meeting_handler,
        doc_get_meeting_handler,
        doc_set_creator_location_handler,
        doc_join_meeting_handler,
        doc_choose_venue_handler,
        doc_recommendations_handler,
        doc_meeting_events_handler,
        doc_retry_search_handler
    ),
    components(schemas(
        LatLng,
        Location,
        ChosenLocation,
        MeetingStatus,
        Meeting,
        VenueCandidate,
        VenueSearchOutcome,
        CreateMeetingRequest,
        CreatedMeeting,
        JoinRole,
        JoinView
    )),
    tags((name = "meetings", description = "Meeting lifecycle and live session")),
    servers((url = "/api", description = "Meetings API server"))
)]
pub struct MeetingsApiDoc;

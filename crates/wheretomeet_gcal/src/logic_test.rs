#[cfg(test)]
mod tests {
    use crate::client::{schedule_request, ScheduleError, ScheduleForm};
    use crate::logic::{build_event, parse_event_time, resolve_time_zone, ScheduleRequest};
    use crate::service::{to_google_event, GcalServiceError};
    use chrono::{TimeZone, Utc};
    use chrono_tz::Tz;
    use wheretomeet_common::models::ChosenLocation;
    use wheretomeet_common::WhereToMeetError;

    fn request(start: &str, end: &str, tz: &str) -> ScheduleRequest {
        ScheduleRequest {
            summary: "Meeting at Halfway Diner".to_string(),
            location: "12 Midway Ave".to_string(),
            start_time: start.to_string(),
            end_time: end.to_string(),
            time_zone: tz.to_string(),
            meeting_id: None,
        }
    }

    fn venue() -> ChosenLocation {
        ChosenLocation {
            lat: 40.01,
            lng: -73.01,
            address: "12 Midway Ave".to_string(),
            name: "Halfway Diner".to_string(),
            place_id: "p1".to_string(),
        }
    }

    #[test]
    fn local_time_is_placed_in_zone() {
        let at = parse_event_time("2026-07-01T18:30:00", Tz::America__New_York).unwrap();
        assert_eq!(at, Utc.with_ymd_and_hms(2026, 7, 1, 22, 30, 0).unwrap());

        let without_seconds = parse_event_time("2026-07-01T18:30", Tz::America__New_York).unwrap();
        assert_eq!(without_seconds, at);
    }

    #[test]
    fn offset_times_ignore_zone() {
        let at = parse_event_time("2026-01-15T10:00:00+01:00", Tz::Asia__Tokyo).unwrap();
        assert_eq!(at, Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap());
    }

    #[test]
    fn garbage_and_skipped_times_are_rejected() {
        assert!(matches!(
            parse_event_time("tomorrow evening", Tz::UTC),
            Err(GcalServiceError::TimeParseError(_))
        ));
        // 02:30 does not exist in New York on the spring-forward date.
        assert!(matches!(
            parse_event_time("2026-03-08T02:30:00", Tz::America__New_York),
            Err(GcalServiceError::TimeParseError(_))
        ));
    }

    #[test]
    fn time_zone_falls_back_to_config_then_utc() {
        assert_eq!(resolve_time_zone("Europe/Berlin", Some("Asia/Tokyo")).unwrap(), Tz::Europe__Berlin);
        assert_eq!(resolve_time_zone("", Some("Asia/Tokyo")).unwrap(), Tz::Asia__Tokyo);
        assert_eq!(resolve_time_zone("  ", None).unwrap(), Tz::UTC);

        let err = resolve_time_zone("Mars/Olympus", None).unwrap_err();
        assert!(matches!(
            WhereToMeetError::from(err),
            WhereToMeetError::ValidationError(_)
        ));
    }

    #[test]
    fn past_and_zero_length_events_are_accepted() {
        let event = build_event(
            &request("2001-01-01T12:00:00", "2001-01-01T12:00:00", "UTC"),
            None,
            "Meeting scheduled via WhereToMeet",
            vec!["a@example.com".to_string()],
        )
        .unwrap();
        assert_eq!(event.start, event.end);
        assert_eq!(event.time_zone, "UTC");
        assert_eq!(event.description.as_deref(), Some("Meeting scheduled via WhereToMeet"));
    }

    #[test]
    fn inverted_window_is_rejected() {
        let err = build_event(
            &request("2026-07-01T18:30:00", "2026-07-01T17:30:00", "UTC"),
            None,
            "d",
            Vec::new(),
        )
        .unwrap_err();
        assert!(matches!(err, GcalServiceError::CalculationError(_)));
    }

    #[test]
    fn attendees_are_deduplicated() {
        let event = build_event(
            &request("2026-07-01T18:30:00", "2026-07-01T18:30:00", "UTC"),
            None,
            "d",
            vec![
                "Guest@Example.com".to_string(),
                "guest@example.com".to_string(),
                "host@example.com".to_string(),
            ],
        )
        .unwrap();
        assert_eq!(event.attendees, ["Guest@Example.com", "host@example.com"]);
    }

    #[test]
    fn google_event_carries_attendees_and_reminders() {
        let event = build_event(
            &request("2026-07-01T18:30:00", "2026-07-01T18:30:00", "Europe/Berlin"),
            None,
            "d",
            vec!["guest@example.com".to_string()],
        )
        .unwrap();

        let google = to_google_event(event);
        assert_eq!(google.location.as_deref(), Some("12 Midway Ave"));
        assert_eq!(
            google.start.unwrap().time_zone.as_deref(),
            Some("Europe/Berlin")
        );
        let attendees = google.attendees.unwrap();
        assert_eq!(attendees[0].email.as_deref(), Some("guest@example.com"));
        assert_eq!(google.reminders.unwrap().use_default, Some(true));
    }

    #[test]
    fn form_requires_date_and_time() {
        let missing_time = ScheduleForm {
            date: "2026-10-20".to_string(),
            time: String::new(),
        };
        assert_eq!(
            schedule_request(&missing_time, &venue(), "UTC", None),
            Err(ScheduleError::MissingDateOrTime)
        );

        let missing_date = ScheduleForm {
            date: " ".to_string(),
            time: "18:30".to_string(),
        };
        assert_eq!(
            schedule_request(&missing_date, &venue(), "UTC", None),
            Err(ScheduleError::MissingDateOrTime)
        );
    }

    #[test]
    fn form_builds_zero_length_request() {
        let form = ScheduleForm {
            date: "2026-10-20".to_string(),
            time: "18:30".to_string(),
        };
        let request = schedule_request(&form, &venue(), "America/New_York", None).unwrap();
        assert_eq!(request.summary, "Meeting at Halfway Diner");
        assert_eq!(request.location, "12 Midway Ave");
        assert_eq!(request.start_time, "2026-10-20T18:30:00");
        assert_eq!(request.end_time, request.start_time);
        assert_eq!(request.time_zone, "America/New_York");
    }
}

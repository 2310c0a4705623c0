#[cfg(test)]
mod tests {
    use crate::session::{MeetingSession, SessionAction, SessionEvent, NOTICE_VENUE_CHOSEN};
    use uuid::Uuid;
    use wheretomeet_common::models::{
        ChosenLocation, LatLng, Location, Meeting, MeetingStatus, MeetingUpdate,
    };
    use wheretomeet_common::testing::candidate;
    use wheretomeet_places::VenueSearchOutcome;

    const CREATOR: &str = "creator-1";
    const PARTICIPANT: &str = "participant-1";

    fn pending() -> Meeting {
        Meeting::new(CREATOR, Some(Location::new(40.0, -73.0, "Creator St")))
    }

    fn activated(meeting: &Meeting) -> Meeting {
        let mut next = meeting.clone();
        next.apply(PARTICIPANT, MeetingUpdate::Join(Location::new(40.02, -73.02, "Guest Rd")))
            .unwrap();
        next
    }

    fn completed(meeting: &Meeting) -> Meeting {
        let mut next = meeting.clone();
        next.apply(
            CREATOR,
            MeetingUpdate::ChooseVenue(ChosenLocation::from(&candidate("p1", Some(4.5)))),
        )
        .unwrap();
        next
    }

    fn outcome(ids: &[&str]) -> VenueSearchOutcome {
        VenueSearchOutcome {
            candidates: ids.iter().map(|id| candidate(id, Some(4.0))).collect(),
            notice: None,
        }
    }

    fn searches(actions: &[SessionAction]) -> Vec<(u64, LatLng)> {
        actions
            .iter()
            .filter_map(|action| match action {
                SessionAction::StartSearch { generation, center } => Some((*generation, *center)),
                SessionAction::Emit(_) => None,
            })
            .collect()
    }

    #[test]
    fn pending_record_is_published_without_search() {
        let meeting = pending();
        let mut session = MeetingSession::new(meeting.id);

        let actions = session.apply_record(meeting.clone());

        assert_eq!(actions, vec![SessionAction::Emit(SessionEvent::Meeting(meeting))]);
        assert!(!session.search_in_flight());
    }

    #[test]
    fn completion_seen_while_pending_overwrites_without_search() {
        let meeting = pending();
        let done = completed(&activated(&meeting));
        let mut session = MeetingSession::new(meeting.id);
        session.apply_record(meeting);

        // The activation was never observed; the completed record still wins.
        let actions = session.apply_record(done.clone());

        assert_eq!(
            actions,
            vec![
                SessionAction::Emit(SessionEvent::Meeting(done.clone())),
                SessionAction::Emit(SessionEvent::Notice(NOTICE_VENUE_CHOSEN.to_string())),
            ]
        );
        assert!(searches(&actions).is_empty());
        assert_eq!(session.meeting(), Some(&done));
        assert!(session.recommendations().is_empty());
        assert!(!session.search_in_flight());
    }

    #[test]
    fn activation_starts_exactly_one_search_at_midpoint() {
        let meeting = pending();
        let active = activated(&meeting);
        let mut session = MeetingSession::new(meeting.id);
        session.apply_record(meeting);

        let actions = session.apply_record(active.clone());
        let started = searches(&actions);
        assert_eq!(started.len(), 1);
        let (_, center) = started[0];
        assert!((center.lat - 40.01).abs() < 1e-9);
        assert!((center.lng + 73.01).abs() < 1e-9);
        assert!(session.search_in_flight());

        // Duplicate delivery of the same record is a no-op.
        assert!(session.apply_record(active).is_empty());
    }

    #[test]
    fn only_latest_search_lands() {
        let meeting = activated(&pending());
        let mut session = MeetingSession::new(meeting.id);
        let first = searches(&session.apply_record(meeting.clone()))[0].0;

        let mut moved = meeting.clone();
        moved
            .apply(CREATOR, MeetingUpdate::CreatorLocation(Location::new(41.0, -74.0, "Elsewhere")))
            .unwrap();
        let second = searches(&session.apply_record(moved))[0].0;
        assert!(second > first);

        assert!(session.apply_search(first, outcome(&["stale"])).is_empty());
        assert!(session.recommendations().is_empty());

        let actions = session.apply_search(second, outcome(&["fresh"]));
        assert_eq!(actions.len(), 1);
        assert_eq!(session.recommendations()[0].place_id, "fresh");
        assert!(!session.search_in_flight());
    }

    #[test]
    fn search_notice_is_forwarded() {
        let meeting = activated(&pending());
        let mut session = MeetingSession::new(meeting.id);
        let generation = searches(&session.apply_record(meeting))[0].0;

        let actions = session.apply_search(
            generation,
            VenueSearchOutcome {
                candidates: Vec::new(),
                notice: Some("No venues found near the midpoint.".to_string()),
            },
        );

        assert_eq!(
            actions,
            vec![
                SessionAction::Emit(SessionEvent::Recommendations(Vec::new())),
                SessionAction::Emit(SessionEvent::Notice(
                    "No venues found near the midpoint.".to_string()
                )),
            ]
        );
    }

    #[test]
    fn completion_clears_recommendations_and_drops_late_results() {
        let active = activated(&pending());
        let mut session = MeetingSession::new(active.id);
        let generation = searches(&session.apply_record(active.clone()))[0].0;
        session.apply_search(generation, outcome(&["a", "b"]));

        // A refresh is in flight when the venue gets chosen.
        let refresh = searches(&session.refresh())[0].0;
        let actions = session.apply_record(completed(&active));

        assert!(actions.contains(&SessionAction::Emit(SessionEvent::Recommendations(Vec::new()))));
        assert!(actions.contains(&SessionAction::Emit(SessionEvent::Notice(
            NOTICE_VENUE_CHOSEN.to_string()
        ))));
        assert!(session.recommendations().is_empty());
        assert!(session.apply_search(refresh, outcome(&["late"])).is_empty());
        assert!(session.recommendations().is_empty());
    }

    #[test]
    fn completed_on_first_load_has_no_notice() {
        let done = completed(&activated(&pending()));
        let mut session = MeetingSession::new(done.id);
        let actions = session.apply_record(done.clone());
        assert_eq!(actions, vec![SessionAction::Emit(SessionEvent::Meeting(done))]);
    }

    #[test]
    fn stale_and_foreign_records_are_ignored() {
        let pending = pending();
        let active = activated(&pending);
        let mut session = MeetingSession::new(pending.id);
        session.apply_record(active.clone());

        assert!(session.apply_record(pending).is_empty());
        assert_eq!(session.meeting().map(|m| m.status), Some(MeetingStatus::Active));

        let mut foreign = active.clone();
        foreign.id = Uuid::new_v4();
        assert!(session.apply_record(foreign).is_empty());
    }

    #[test]
    fn torn_down_session_ignores_everything() {
        let active = activated(&pending());
        let mut session = MeetingSession::new(active.id);
        let generation = searches(&session.apply_record(active.clone()))[0].0;

        session.teardown();

        assert!(!session.is_live());
        assert!(session.apply_search(generation, outcome(&["a"])).is_empty());
        assert!(session.apply_record(completed(&active)).is_empty());
        assert!(session.refresh().is_empty());
    }
}

#[cfg(test)]
mod tests {
    use crate::error::WhereToMeetError;
    use crate::models::{
        ChosenLocation, Location, Meeting, MeetingStatus, MeetingUpdate, TransitionError,
    };
    use proptest::prelude::*;

    const CREATOR: &str = "creator-1";
    const PARTICIPANT: &str = "participant-1";

    fn venue() -> ChosenLocation {
        ChosenLocation {
            lat: 40.011,
            lng: -73.009,
            address: "12 Midway Ave".to_string(),
            name: "Halfway Diner".to_string(),
            place_id: "place-halfway".to_string(),
        }
    }

    fn pending_meeting() -> Meeting {
        Meeting::new(CREATOR, Some(Location::new(40.0, -73.0, "Creator St")))
    }

    #[test]
    fn new_meeting_is_pending_and_consistent() {
        let meeting = pending_meeting();
        assert_eq!(meeting.status, MeetingStatus::Pending);
        assert!(meeting.participant_id.is_none());
        assert!(meeting.is_consistent());
        assert_eq!(meeting.join_path(), format!("/join/{}", meeting.id));
    }

    #[test]
    fn full_lifecycle_moves_forward() {
        let mut meeting = pending_meeting();

        meeting
            .apply(PARTICIPANT, MeetingUpdate::Join(Location::new(40.02, -73.02, "Guest Rd")))
            .unwrap();
        assert_eq!(meeting.status, MeetingStatus::Active);
        assert_eq!(meeting.participant_id.as_deref(), Some(PARTICIPANT));
        assert!(meeting.coordinate_pair().is_some());
        assert!(meeting.is_consistent());

        meeting.apply(CREATOR, MeetingUpdate::ChooseVenue(venue())).unwrap();
        assert_eq!(meeting.status, MeetingStatus::Completed);
        assert_eq!(meeting.chosen_location, Some(venue()));
        assert!(meeting.is_consistent());
    }

    #[test]
    fn second_participant_cannot_join() {
        let mut meeting = pending_meeting();
        meeting
            .apply(PARTICIPANT, MeetingUpdate::Join(Location::new(1.0, 1.0, "a")))
            .unwrap();

        let err = meeting
            .apply("someone-else", MeetingUpdate::Join(Location::new(2.0, 2.0, "b")))
            .unwrap_err();
        assert_eq!(err, TransitionError::NotPending(MeetingStatus::Active));
        assert_eq!(meeting.participant_id.as_deref(), Some(PARTICIPANT));
    }

    #[test]
    fn participant_may_move_while_active() {
        let mut meeting = pending_meeting();
        meeting
            .apply(PARTICIPANT, MeetingUpdate::Join(Location::new(1.0, 1.0, "a")))
            .unwrap();
        meeting
            .apply(PARTICIPANT, MeetingUpdate::Join(Location::new(3.0, 3.0, "c")))
            .unwrap();
        assert_eq!(meeting.participant_location.unwrap().address, "c");
        assert_eq!(meeting.status, MeetingStatus::Active);
    }

    #[test]
    fn creator_cannot_join_own_meeting() {
        let mut meeting = pending_meeting();
        let err = meeting
            .apply(CREATOR, MeetingUpdate::Join(Location::new(1.0, 1.0, "a")))
            .unwrap_err();
        assert_eq!(err, TransitionError::CreatorCannotJoin);
        assert!(matches!(
            WhereToMeetError::from(err),
            WhereToMeetError::ForbiddenError(_)
        ));
    }

    #[test]
    fn venue_requires_active_meeting_and_creator() {
        let mut meeting = pending_meeting();
        assert_eq!(
            meeting.apply(CREATOR, MeetingUpdate::ChooseVenue(venue())),
            Err(TransitionError::NotActive(MeetingStatus::Pending))
        );

        meeting
            .apply(PARTICIPANT, MeetingUpdate::Join(Location::new(1.0, 1.0, "a")))
            .unwrap();
        assert!(matches!(
            meeting.apply(PARTICIPANT, MeetingUpdate::ChooseVenue(venue())),
            Err(TransitionError::NotCreator(_))
        ));
        assert_eq!(meeting.status, MeetingStatus::Active);
    }

    #[test]
    fn locations_are_frozen_after_completion() {
        let mut meeting = pending_meeting();
        meeting
            .apply(PARTICIPANT, MeetingUpdate::Join(Location::new(1.0, 1.0, "a")))
            .unwrap();
        meeting.apply(CREATOR, MeetingUpdate::ChooseVenue(venue())).unwrap();
        let snapshot = meeting.clone();

        assert_eq!(
            meeting.apply(CREATOR, MeetingUpdate::CreatorLocation(Location::new(5.0, 5.0, "x"))),
            Err(TransitionError::Frozen)
        );
        assert_eq!(
            meeting.apply(PARTICIPANT, MeetingUpdate::Join(Location::new(5.0, 5.0, "x"))),
            Err(TransitionError::Frozen)
        );
        assert_eq!(meeting, snapshot);
    }

    #[test]
    fn out_of_range_coordinates_are_rejected() {
        let mut meeting = pending_meeting();
        let err = meeting
            .apply(PARTICIPANT, MeetingUpdate::Join(Location::new(91.0, 0.0, "north of north")))
            .unwrap_err();
        assert!(matches!(err, TransitionError::InvalidLocation(_)));
        assert_eq!(meeting.status, MeetingStatus::Pending);
    }

    #[test]
    fn status_serializes_lowercase() {
        let meeting = pending_meeting();
        let json = serde_json::to_value(&meeting).unwrap();
        assert_eq!(json["status"], "pending");
        assert!(json["participant_location"].is_null());
        assert_eq!(json["creator_location"]["address"], "Creator St");
    }

    fn arb_update() -> impl Strategy<Value = (usize, MeetingUpdate)> {
        let actor = 0..3usize;
        let coord = (-80.0..80.0f64, -170.0..170.0f64);
        (actor, coord, 0..3u8).prop_map(|(actor, (lat, lng), kind)| {
            let update = match kind {
                0 => MeetingUpdate::CreatorLocation(Location::new(lat, lng, "c")),
                1 => MeetingUpdate::Join(Location::new(lat, lng, "p")),
                _ => MeetingUpdate::ChooseVenue(ChosenLocation {
                    lat,
                    lng,
                    address: "v".to_string(),
                    name: "v".to_string(),
                    place_id: "v".to_string(),
                }),
            };
            (actor, update)
        })
    }

    proptest! {
        // Whatever sequence of writes arrives, status never moves backwards,
        // invariants hold, and set locations are never cleared.
        #[test]
        fn status_is_monotonic(updates in prop::collection::vec(arb_update(), 0..24)) {
            let actors = [CREATOR, PARTICIPANT, "intruder"];
            let mut meeting = pending_meeting();
            let mut last_status = meeting.status;

            for (actor, update) in updates {
                let had_participant = meeting.participant_location.is_some();
                let had_choice = meeting.chosen_location.is_some();
                let _ = meeting.apply(actors[actor], update);

                prop_assert!(meeting.status >= last_status);
                prop_assert!(meeting.is_consistent());
                prop_assert!(!had_participant || meeting.participant_location.is_some());
                prop_assert!(!had_choice || meeting.chosen_location.is_some());
                last_status = meeting.status;
            }
        }
    }
}

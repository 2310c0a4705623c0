#[cfg(test)]
mod tests {
    use crate::logic::parse_event_time;
    use chrono::{Datelike, Timelike};
    use chrono_tz::Tz;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn utc_local_times_parse_to_themselves(
            year in 1990i32..2100,
            month in 1u32..=12,
            day in 1u32..=28,
            hour in 0u32..24,
            minute in 0u32..60,
        ) {
            let value = format!("{:04}-{:02}-{:02}T{:02}:{:02}:00", year, month, day, hour, minute);
            let at = parse_event_time(&value, Tz::UTC).unwrap();
            prop_assert_eq!(at.year(), year);
            prop_assert_eq!(at.month(), month);
            prop_assert_eq!(at.day(), day);
            prop_assert_eq!(at.hour(), hour);
            prop_assert_eq!(at.minute(), minute);
        }

        #[test]
        fn rfc3339_and_local_agree_in_utc(hour in 0u32..24, minute in 0u32..60) {
            let local = format!("2026-05-05T{:02}:{:02}:00", hour, minute);
            let rfc = format!("{}Z", local);
            prop_assert_eq!(
                parse_event_time(&local, Tz::UTC).unwrap(),
                parse_event_time(&rfc, Tz::Europe__Paris).unwrap()
            );
        }
    }
}

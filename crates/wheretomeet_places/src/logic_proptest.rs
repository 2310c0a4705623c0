#[cfg(test)]
mod tests {
    use crate::logic::{midpoint, rank_candidates, MAX_CANDIDATES};
    use proptest::prelude::*;
    use wheretomeet_common::models::LatLng;
    use wheretomeet_common::testing::candidate;

    fn arb_rating() -> impl Strategy<Value = Option<f64>> {
        prop_oneof![Just(None), (0u8..=50).prop_map(|r| Some(r as f64 / 10.0))]
    }

    proptest! {
        #[test]
        fn midpoint_is_componentwise_mean(
            a_lat in -90.0..90.0f64, a_lng in -180.0..180.0f64,
            b_lat in -90.0..90.0f64, b_lng in -180.0..180.0f64,
        ) {
            let m = midpoint(LatLng::new(a_lat, a_lng), LatLng::new(b_lat, b_lng));
            prop_assert_eq!(m.lat, (a_lat + b_lat) / 2.0);
            prop_assert_eq!(m.lng, (a_lng + b_lng) / 2.0);
        }

        #[test]
        fn midpoint_is_symmetric(
            a_lat in -90.0..90.0f64, a_lng in -180.0..180.0f64,
            b_lat in -90.0..90.0f64, b_lng in -180.0..180.0f64,
        ) {
            let a = LatLng::new(a_lat, a_lng);
            let b = LatLng::new(b_lat, b_lng);
            prop_assert_eq!(midpoint(a, b), midpoint(b, a));
        }

        // Ranking is a stable descending sort on rating with unrated as 0,
        // cut to at most MAX_CANDIDATES.
        #[test]
        fn ranking_is_stable_descending(ratings in prop::collection::vec(arb_rating(), 0..30)) {
            let input: Vec<_> = ratings
                .iter()
                .enumerate()
                .map(|(i, r)| candidate(&i.to_string(), *r))
                .collect();

            let ranked = rank_candidates(input.clone());

            prop_assert_eq!(ranked.len(), input.len().min(MAX_CANDIDATES));
            for pair in ranked.windows(2) {
                let ra = pair[0].rating.unwrap_or(0.0);
                let rb = pair[1].rating.unwrap_or(0.0);
                prop_assert!(ra >= rb);
                if ra == rb {
                    let ia: usize = pair[0].place_id.parse().unwrap();
                    let ib: usize = pair[1].place_id.parse().unwrap();
                    prop_assert!(ia < ib, "ties must keep provider order");
                }
            }

            // The kept prefix is exactly the best entries.
            let mut expected = input;
            expected.sort_by(|a, b| b.rating.unwrap_or(0.0).total_cmp(&a.rating.unwrap_or(0.0)));
            expected.truncate(MAX_CANDIDATES);
            prop_assert_eq!(ranked, expected);
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::handlers::PlacesState;
    use crate::routes::routes;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use std::sync::Arc;
    use tower::ServiceExt;
    use wheretomeet_common::models::{LatLng, ResolvedPlace, VenueDetail};
    use wheretomeet_common::testing::{candidate, ScriptedPlaces, StaticAuthProvider};
    use wheretomeet_config::AppConfig;

    fn app(places: ScriptedPlaces) -> axum::Router {
        let state = Arc::new(PlacesState {
            config: Arc::new(AppConfig::local("127.0.0.1", 0)),
            places: Arc::new(places),
            auth: Some(StaticAuthProvider::new().with_user("tok", "u1", None).shared()),
        });
        routes(state)
    }

    fn get(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn unauthenticated_requests_get_401() {
        let response = app(ScriptedPlaces::new())
            .oneshot(get("/places/resolve?query=x", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn resolve_returns_place() {
        let places = ScriptedPlaces::new().with_text_result(ResolvedPlace {
            place_id: "p1".to_string(),
            name: "Museum".to_string(),
            address: "5th Ave".to_string(),
            location: LatLng::new(40.7, -73.9),
        });

        let response = app(places)
            .oneshot(get("/places/resolve?query=museum", Some("tok")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["address"], "5th Ave");
        assert_eq!(json["location"]["lat"], 40.7);
    }

    #[tokio::test]
    async fn resolve_without_match_is_404_text() {
        let response = app(ScriptedPlaces::new())
            .oneshot(get("/places/resolve?query=nowhere", Some("tok")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("nowhere"));
    }

    #[tokio::test]
    async fn nearby_provider_failure_is_a_notice() {
        let places = ScriptedPlaces::new().then_nearby_error("UNKNOWN_ERROR");

        let response = app(places)
            .oneshot(get("/places/nearby?lat=40.01&lng=-73.01", Some("tok")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["candidates"].as_array().unwrap().len(), 0);
        assert!(json["notice"].is_string());
    }

    #[tokio::test]
    async fn nearby_returns_ranked_candidates() {
        let places = ScriptedPlaces::new()
            .then_nearby(vec![candidate("low", Some(3.1)), candidate("high", Some(4.7))])
            .with_open_status("high", Some(true));

        let response = app(places)
            .oneshot(get("/places/nearby?lat=40.01&lng=-73.01", Some("tok")))
            .await
            .unwrap();

        let json = body_json(response).await;
        assert_eq!(json["candidates"][0]["place_id"], "high");
        assert_eq!(json["candidates"][0]["open_now"], true);
        // Unknown open status is omitted rather than reported as closed.
        assert!(json["candidates"][1].get("open_now").is_none());
        assert!(json.get("notice").is_none());
    }

    #[tokio::test]
    async fn nearby_rejects_out_of_range_coordinates() {
        let response = app(ScriptedPlaces::new())
            .oneshot(get("/places/nearby?lat=123&lng=0", Some("tok")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn details_found_and_missing() {
        let places = ScriptedPlaces::new().with_details(VenueDetail {
            place_id: "p9".to_string(),
            name: "Cafe Nine".to_string(),
            price_level: Some(2),
            ..Default::default()
        });
        let app = app(places);

        let found = app
            .clone()
            .oneshot(get("/places/p9/details", Some("tok")))
            .await
            .unwrap();
        assert_eq!(found.status(), StatusCode::OK);
        assert_eq!(body_json(found).await["name"], "Cafe Nine");

        let missing = app
            .oneshot(get("/places/p10/details", Some("tok")))
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }
}

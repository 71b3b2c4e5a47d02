//! Integration tests for `Geocoder` using wiremock HTTP mocks.

use repairfinder_geo::{GeocodeError, Geocoder};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn geocoder(base_url: &str) -> Geocoder {
    Geocoder::new(base_url, 5, "repairfinder-test").expect("geocoder construction should not fail")
}

#[tokio::test]
async fn geocode_returns_first_match() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Koramangala"))
        .and(query_param("format", "json"))
        .and(query_param("limit", "1"))
        .and(header("user-agent", "repairfinder-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {
                "place_id": 1,
                "lat": "12.9352",
                "lon": "77.6245",
                "display_name": "Koramangala, Bengaluru, Karnataka, India"
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let result = geocoder(&server.uri())
        .geocode("  Koramangala ")
        .await
        .expect("should geocode");

    assert!((result.lat - 12.9352).abs() < 1e-9);
    assert!((result.lng - 77.6245).abs() < 1e-9);
    assert_eq!(result.display_name, "Koramangala, Bengaluru, Karnataka, India");
}

#[tokio::test]
async fn empty_result_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let err = geocoder(&server.uri()).geocode("nowhere").await.expect_err("no match");
    assert!(matches!(err, GeocodeError::NotFound));
}

#[tokio::test]
async fn upstream_error_carries_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(403).set_body_string("blocked"))
        .mount(&server)
        .await;

    let err = geocoder(&server.uri()).geocode("Indiranagar").await.expect_err("403");
    match err {
        GeocodeError::Upstream { details } => assert_eq!(details, "blocked"),
        other => panic!("expected Upstream, got {other:?}"),
    }
}

#[tokio::test]
async fn non_numeric_coordinates_are_upstream_errors() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "lat": "north", "lon": "77.6", "display_name": "Somewhere" }
        ])))
        .mount(&server)
        .await;

    let err = geocoder(&server.uri()).geocode("Somewhere").await.expect_err("bad lat");
    assert!(matches!(err, GeocodeError::Upstream { .. }));
}

#[tokio::test]
async fn blank_query_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let err = geocoder(&server.uri()).geocode("").await.expect_err("blank");
    assert!(matches!(err, GeocodeError::EmptyQuery));
}

//! Integration tests for `KakaoLocalClient` using wiremock HTTP mocks.

use fitmap_core::Coordinate;
use fitmap_places::{KakaoLocalClient, PlaceSearchProvider, PlacesError, SearchStatus};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CITY_HALL: Coordinate = Coordinate {
    lat: 37.5665,
    lng: 126.978,
};

fn test_client(base_url: &str) -> KakaoLocalClient {
    KakaoLocalClient::with_base_url("test-key", 30, "fitmap-test", base_url)
        .expect("client construction should not fail")
}

fn document(id: &str, name: &str, x: &str, y: &str, distance: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "place_name": name,
        "category_name": "여행 > 공원",
        "category_group_code": "AT4",
        "phone": "02-120",
        "address_name": "서울 중구 예장동 8-1",
        "road_address_name": "",
        "x": x,
        "y": y,
        "place_url": format!("http://place.map.kakao.com/{id}"),
        "distance": distance
    })
}

fn envelope(documents: Vec<serde_json::Value>) -> serde_json::Value {
    let count = documents.len();
    serde_json::json!({
        "meta": {
            "total_count": count,
            "pageable_count": count,
            "is_end": true
        },
        "documents": documents
    })
}

#[tokio::test]
async fn search_keyword_sends_location_params_and_auth_header() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/local/search/keyword.json"))
        .and(header("authorization", "KakaoAK test-key"))
        .and(query_param("query", "공원"))
        .and(query_param("x", "126.978"))
        .and(query_param("y", "37.5665"))
        .and(query_param("radius", "2000"))
        .and(query_param("sort", "distance"))
        .and(query_param("size", "15"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(vec![document(
            "8134506",
            "남산공원",
            "126.990",
            "37.5507",
            "1873",
        )])))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let places = client
        .search_keyword("공원", Some(CITY_HALL), 2000, 15)
        .await
        .expect("should parse places");

    assert_eq!(places.len(), 1);
    let park = &places[0];
    assert_eq!(park.id, "8134506");
    assert_eq!(park.name, "남산공원");
    assert_eq!(park.distance_meters, Some(1873));
    assert_eq!(park.category, "여행 > 공원");
    // Road address is empty, so the lot address is used.
    assert_eq!(park.address.as_deref(), Some("서울 중구 예장동 8-1"));
    let location = park.coordinate.expect("coordinate should parse");
    assert!((location.lat - 37.5507).abs() < 1e-9);
    assert!((location.lng - 126.990).abs() < 1e-9);
}

#[tokio::test]
async fn malformed_coordinates_are_kept_without_location() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/local/search/keyword.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(vec![
            document("1", "좌표 없음", "", "", ""),
            document("2", "범위 밖", "200.0", "95.0", "10"),
            document("3", "정상", "126.98", "37.57", "40"),
        ])))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let places = client
        .search_keyword("공원", Some(CITY_HALL), 2000, 15)
        .await
        .expect("should parse places");

    assert_eq!(places.len(), 3);
    assert!(places[0].coordinate.is_none());
    assert_eq!(places[0].distance_meters, None);
    assert!(places[1].coordinate.is_none());
    assert!(places[2].coordinate.is_some());
}

#[tokio::test]
async fn unauthorized_maps_to_status_error_with_api_message() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
            "errorType": "AccessDeniedError",
            "message": "cannot find appkey"
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .search_keyword("헬스장", Some(CITY_HALL), 2000, 15)
        .await
        .expect_err("401 should be an error");

    match err {
        PlacesError::Status { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "AccessDeniedError: cannot find appkey");
        }
        other => panic!("expected Status error, got {other:?}"),
    }
}

#[tokio::test]
async fn server_error_without_body_still_reports_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .search_keyword("요가", None, 2000, 15)
        .await
        .expect_err("503 should be an error");

    assert!(matches!(
        err,
        PlacesError::Status { status: 503, ref message } if message == "no error message"
    ));
}

#[tokio::test]
async fn unexpected_body_is_a_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client
        .search_keyword("수영장", None, 2000, 15)
        .await
        .expect_err("html body should not parse");

    assert!(matches!(err, PlacesError::Deserialize { .. }));
}

#[tokio::test]
async fn provider_search_reports_no_result_for_empty_documents() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(Vec::new())))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let response = client.search("둘레길", CITY_HALL, 2000, 15).await;

    assert_eq!(response.status, SearchStatus::NoResult);
    assert!(response.places.is_empty());
}

#[tokio::test]
async fn provider_search_reports_error_status_instead_of_failing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let response = client.search("운동장", CITY_HALL, 2000, 15).await;

    match response.status {
        SearchStatus::Error(message) => assert!(message.contains("500"), "{message}"),
        other => panic!("expected Error status, got {other:?}"),
    }
    assert!(response.places.is_empty());
}

//! Backend client tests against a mock conversion service.

use relink_config::Route;
use relink_convert::{BackendClient, ConversionBackend, ConversionRequest};
use relink_core::RelinkError;
use serde_json::json;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request(link: &str, route: Route) -> ConversionRequest {
    ConversionRequest::build(link, route).expect("request should build")
}

#[tokio::test]
async fn test_convert_sends_encoded_link_as_path_segment() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(
            "/api/v1/convert-link/https%3A%2F%2Fopen.spotify.com%2Ftrack%2F3tYxhPqkioZEV5el3DJxLQ",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "links": ["https://tidal.com/browse/track/126102208"]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = BackendClient::with_base_url(mock_server.uri()).unwrap();
    let links = client
        .convert(&request(
            "https://open.spotify.com/track/3tYxhPqkioZEV5el3DJxLQ",
            Route::Link,
        ))
        .await
        .expect("conversion should succeed");

    assert_eq!(links, vec!["https://tidal.com/browse/track/126102208"]);
}

#[tokio::test]
async fn test_convert_category_route() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/convert/album/126102201"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "links": ["https://open.spotify.com/album/6JLO3HVtVEKLHqbgs6ujdw", "https://x"]
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = BackendClient::with_base_url(mock_server.uri()).unwrap();
    let links = client
        .convert(&request(
            "https://tidal.com/browse/album/126102201?u",
            Route::Category,
        ))
        .await
        .unwrap();

    assert_eq!(links.len(), 2);
    assert_eq!(links[0], "https://open.spotify.com/album/6JLO3HVtVEKLHqbgs6ujdw");
}

#[tokio::test]
async fn test_convert_error_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/api/v1/convert-link/"))
        .respond_with(ResponseTemplate::new(502).set_body_string("upstream down"))
        .mount(&mock_server)
        .await;

    let client = BackendClient::with_base_url(mock_server.uri()).unwrap();
    let result = client
        .convert(&request("https://tidal.com/browse/track/1", Route::Link))
        .await;

    match result {
        Err(RelinkError::Api { status, body }) => {
            assert_eq!(status, 502);
            assert_eq!(body, "upstream down");
        }
        other => panic!("Expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_convert_null_and_empty_bodies() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path_regex(r"track"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(null)))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"album"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "links": [] })))
        .mount(&mock_server)
        .await;

    let client = BackendClient::with_base_url(mock_server.uri()).unwrap();

    let result = client
        .convert(&request("https://tidal.com/browse/track/1", Route::Link))
        .await;
    assert!(matches!(result, Err(RelinkError::EmptyResponse)));

    let result = client
        .convert(&request("https://tidal.com/browse/album/1", Route::Link))
        .await;
    assert!(matches!(result, Err(RelinkError::EmptyResponse)));
}

#[tokio::test]
async fn test_convert_unexpected_body_is_parse_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "link": "/tidal.com/browse/track/126102208?u"
        })))
        .mount(&mock_server)
        .await;

    let client = BackendClient::with_base_url(mock_server.uri()).unwrap();
    let result = client
        .convert(&request("https://tidal.com/browse/track/126102208", Route::Link))
        .await;

    assert!(matches!(result, Err(RelinkError::Parse(_))));
}

#[tokio::test]
async fn test_convert_unreachable_backend_is_network_error() {
    let mock_server = MockServer::start().await;
    let uri = mock_server.uri();
    drop(mock_server);

    let client = BackendClient::with_base_url(uri).unwrap();
    let result = client
        .convert(&request("https://tidal.com/browse/track/1", Route::Link))
        .await;

    assert!(matches!(result, Err(RelinkError::Network(_))));
}

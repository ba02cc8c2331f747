//! Catalog backend client tests
//!
//! Tests endpoint paths, response parsing, and error handling against a
//! mocked backend.

use mockito::{Matcher, Server};
use iptvtui::api::{ApiStatus, CatalogClient, CatalogError};
use iptvtui::models::{ContentType, Credential};

fn credential() -> Credential {
    Credential {
        playlist_name: Some("Home".into()),
        username: "user".into(),
        password: "pass".into(),
        server_url: "http://provider.example".into(),
    }
}

// =============================================================================
// Setup and Connection Tests
// =============================================================================

#[tokio::test]
async fn test_setup_posts_credential() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("POST", "/api/setup")
        .match_body(Matcher::PartialJsonString(
            r#"{"username": "user", "password": "pass"}"#.to_string(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status": "success", "message": "Connected to provider"}"#)
        .create_async()
        .await;

    let client = CatalogClient::new(server.url());
    let check = client.setup(&credential()).await.unwrap();

    mock.assert_async().await;
    assert_eq!(check.status, ApiStatus::Success);
    assert_eq!(check.message.as_deref(), Some("Connected to provider"));
}

#[tokio::test]
async fn test_connection_test_demo_mode() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/api/xtream/test")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status": "demo_mode", "message": "Using demo data"}"#)
        .create_async()
        .await;

    let client = CatalogClient::new(server.url());
    let check = client.test_connection().await.unwrap();

    mock.assert_async().await;
    assert_eq!(check.status, ApiStatus::DemoMode);
}

#[tokio::test]
async fn test_connection_test_reports_category_count() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/api/xtream/test")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status": "success", "categories_count": 42}"#)
        .create_async()
        .await;

    let client = CatalogClient::new(server.url());
    let check = client.test_connection().await.unwrap();

    assert_eq!(check.status, ApiStatus::Success);
    assert_eq!(check.categories_count, Some(42));
}

#[tokio::test]
async fn test_health_endpoint() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/api/health")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status": "ok", "iptv_configured": true}"#)
        .create_async()
        .await;

    let client = CatalogClient::new(server.url());
    let health = client.health().await.unwrap();

    assert_eq!(health.status, "ok");
    assert!(health.iptv_configured);
}

#[tokio::test]
async fn test_playlist_info_tolerates_missing_fields() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/api/playlist-info")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"name": "My Playlist"}"#)
        .create_async()
        .await;

    let client = CatalogClient::new(server.url());
    let info = client.playlist_info().await.unwrap();

    assert_eq!(info.name.as_deref(), Some("My Playlist"));
    assert!(info.server.is_none());
}

// =============================================================================
// Categories and Streams Tests
// =============================================================================

#[tokio::test]
async fn test_categories_parses_numeric_and_string_ids() {
    let mut server = Server::new_async().await;

    // Providers send category_id as either a number or a string
    let mock = server
        .mock("GET", "/api/categories/live")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"categories": [
                {"category_id": 7, "category_name": "News"},
                {"category_id": "12", "category_name": "Sports"}
            ]}"#,
        )
        .create_async()
        .await;

    let client = CatalogClient::new(server.url());
    let categories = client.categories(ContentType::Live).await.unwrap();

    mock.assert_async().await;
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0].category_id, "7");
    assert_eq!(categories[1].category_id, "12");
    assert_eq!(categories[1].category_name, "Sports");
}

#[tokio::test]
async fn test_streams_all_categories() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/api/streams/vod")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"streams": [
                {"stream_id": 101, "name": "Movie One", "stream_url": "http://s/101.mp4"},
                {"stream_id": 102, "name": "Movie Two", "stream_url": "http://s/102.mp4"}
            ]}"#,
        )
        .create_async()
        .await;

    let client = CatalogClient::new(server.url());
    let streams = client.streams(ContentType::Vod, None).await.unwrap();

    mock.assert_async().await;
    assert_eq!(streams.len(), 2);
    assert_eq!(streams[0].name, "Movie One");
    assert!(streams[0].is_playable());
}

#[tokio::test]
async fn test_streams_with_category_filter() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/api/streams/live")
        .match_query(Matcher::UrlEncoded("category_id".into(), "news 7".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"streams": [{"stream_id": 5, "name": "Channel 5"}]}"#)
        .create_async()
        .await;

    let client = CatalogClient::new(server.url());
    let streams = client
        .streams(ContentType::Live, Some("news 7"))
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(streams.len(), 1);
}

#[tokio::test]
async fn test_series_items_have_no_stream_url() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/api/streams/series")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"streams": [{"series_id": 900, "name": "Some Show"}]}"#)
        .create_async()
        .await;

    let client = CatalogClient::new(server.url());
    let streams = client.streams(ContentType::Series, None).await.unwrap();

    assert_eq!(streams[0].id(), 900);
    assert!(!streams[0].is_playable());
}

// =============================================================================
// Search Tests
// =============================================================================

#[tokio::test]
async fn test_search_encodes_query_and_splits_by_type() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/api/search")
        .match_query(Matcher::UrlEncoded("q".into(), "blade runner".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{
                "live": [],
                "vod": [
                    {"stream_id": 1, "name": "Blade Runner", "stream_url": "http://s/1.mp4"},
                    {"stream_id": 2, "name": "Blade Runner 2049", "stream_url": "http://s/2.mp4"}
                ],
                "series": [{"series_id": 3, "name": "Blade Runner: Black Lotus"}]
            }"#,
        )
        .create_async()
        .await;

    let client = CatalogClient::new(server.url());
    let results = client.search("blade runner").await.unwrap();

    mock.assert_async().await;
    assert_eq!(results.total(), 3);
    assert!(results.for_tab(ContentType::Live).is_empty());
    assert_eq!(results.for_tab(ContentType::Vod).len(), 2);
    assert_eq!(results.for_tab(ContentType::Series).len(), 1);
}

// =============================================================================
// EPG Tests
// =============================================================================

#[tokio::test]
async fn test_epg_returns_raw_json() {
    let mut server = Server::new_async().await;

    let mock = server
        .mock("GET", "/api/epg/55")
        .match_query(Matcher::UrlEncoded("limit".into(), "4".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"epg": [{"title": "Evening News", "start": "20:00"}]}"#)
        .create_async()
        .await;

    let client = CatalogClient::new(server.url());
    let epg = client.epg(55, 4).await.unwrap();

    mock.assert_async().await;
    assert_eq!(epg[0]["title"], "Evening News");
}

// =============================================================================
// Error Handling Tests
// =============================================================================

#[tokio::test]
async fn test_not_found_maps_to_error() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/api/streams/live")
        .with_status(404)
        .create_async()
        .await;

    let client = CatalogClient::new(server.url());
    let err = client.streams(ContentType::Live, None).await.unwrap_err();
    assert!(matches!(err, CatalogError::NotFound));
}

#[tokio::test]
async fn test_server_error_carries_status() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/api/categories/vod")
        .with_status(502)
        .create_async()
        .await;

    let client = CatalogClient::new(server.url());
    let err = client.categories(ContentType::Vod).await.unwrap_err();
    assert!(matches!(err, CatalogError::ServerError(502)));
}

#[tokio::test]
async fn test_malformed_json_is_invalid_response() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/api/xtream/test")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("not json at all")
        .create_async()
        .await;

    let client = CatalogClient::new(server.url());
    let err = client.test_connection().await.unwrap_err();
    assert!(matches!(err, CatalogError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_empty_payload_defaults_to_empty_list() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/api/streams/live")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("{}")
        .create_async()
        .await;

    let client = CatalogClient::new(server.url());
    let streams = client.streams(ContentType::Live, None).await.unwrap();
    assert!(streams.is_empty());
}

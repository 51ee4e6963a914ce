//! Integration tests for `SearchClient` and the lookup pipeline using
//! wiremock HTTP mocks.

use prodpix_core::RetailerTag;
use prodpix_search::{lookup_image, Lookup, LookupState, SearchClient, SearchError};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(base_url: &str) -> SearchClient {
    SearchClient::with_base_url("test-key", "engine-1", 5, base_url)
        .expect("client construction should not fail")
}

fn items_with_images(images: &[&str]) -> serde_json::Value {
    let items: Vec<serde_json::Value> = images
        .iter()
        .map(|src| json!({"title": "hit", "pagemap": {"cse_image": [{"src": src}]}}))
        .collect();
    json!({"kind": "customsearch#search", "items": items})
}

#[tokio::test]
async fn search_sends_credentials_and_query() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/customsearch/v1"))
        .and(query_param("key", "test-key"))
        .and(query_param("cx", "engine-1"))
        .and(query_param("q", "Home Depot 1000123456"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(items_with_images(&["https://images.thdstatic.com/a.jpg"])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let results = client
        .search("Home Depot 1000123456")
        .await
        .expect("should parse results");

    assert_eq!(results.items.len(), 1);
    assert_eq!(
        results.items[0].first_image(),
        Some("https://images.thdstatic.com/a.jpg")
    );
}

#[tokio::test]
async fn search_without_items_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/customsearch/v1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"kind": "customsearch#search"})),
        )
        .mount(&server)
        .await;

    let results = test_client(&server.uri())
        .search("anything")
        .await
        .expect("empty results are not an error");
    assert!(results.items.is_empty());
}

#[tokio::test]
async fn search_non_2xx_is_unexpected_status() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/customsearch/v1"))
        .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .search("anything")
        .await
        .expect_err("429 should fail");

    match err {
        SearchError::UnexpectedStatus { status, url } => {
            assert_eq!(status, 429);
            assert!(!url.contains("test-key"), "key leaked into error: {url}");
        }
        other => panic!("expected UnexpectedStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn search_malformed_body_is_deserialize_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/customsearch/v1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = test_client(&server.uri())
        .search("anything")
        .await
        .expect_err("html body should fail");
    assert!(matches!(err, SearchError::Deserialize { .. }), "got {err:?}");
}

#[tokio::test]
async fn lookup_image_resolves_preferred_candidate() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("q", "Target 12345678"))
        .respond_with(ResponseTemplate::new(200).set_body_json(items_with_images(&[
            "https://other.cdn/x.jpg",
            "https://target.scene7.com/is/image/Target/GUEST_y",
        ])))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let image = lookup_image(&client, RetailerTag::Target.profile(), " 12345678 ")
        .await
        .expect("search succeeds")
        .expect("image resolved");

    assert_eq!(
        image.as_str(),
        "https://target.scene7.com/is/image/Target/GUEST_y?qlt=85&fmt=webp&hei=1200&wid=1200"
    );
}

#[tokio::test]
async fn lookup_image_blank_term_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(0)
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = lookup_image(&client, RetailerTag::Walmart.profile(), "   ")
        .await
        .expect_err("blank term should be rejected");
    assert!(matches!(err, SearchError::EmptyTerm));
}

#[tokio::test]
async fn lookup_state_machine_reaches_each_terminal_state() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(query_param("q", "Walmart found"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(items_with_images(&["https://anything/z.png"])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("q", "Target missing"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(items_with_images(&["https://other.cdn/x.jpg"])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("q", "Lowes broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());

    let mut lookup = Lookup::new();
    let state = lookup
        .run(&client, RetailerTag::Walmart.profile(), "found")
        .await;
    match state {
        LookupState::Resolved(image) => assert_eq!(image.as_str(), "https://anything/z.png"),
        other => panic!("expected Resolved, got {other:?}"),
    }

    let mut lookup = Lookup::new();
    let state = lookup
        .run(&client, RetailerTag::Target.profile(), "missing")
        .await;
    assert_eq!(state, &LookupState::NotFound);

    let mut lookup = Lookup::new();
    let state = lookup
        .run(&client, RetailerTag::Lowes.profile(), "broken")
        .await;
    assert!(
        matches!(state, LookupState::Errored(msg) if msg.contains("500")),
        "got {state:?}"
    );
}

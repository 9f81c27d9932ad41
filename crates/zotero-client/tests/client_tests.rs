//! Mock-based tests for list, fetch and search operations.

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use zotero_client::config::{Config, LibraryType};
use zotero_client::models::SearchParams;
use zotero_client::{ClientError, ZoteroClient};

fn test_client(mock_server: &MockServer) -> ZoteroClient {
    ZoteroClient::new(Config::for_testing(&mock_server.uri())).unwrap()
}

/// Sample collection envelope JSON.
fn sample_collection(key: &str, name: &str) -> serde_json::Value {
    json!({
        "key": key,
        "version": 3,
        "data": { "name": name, "parentCollection": false }
    })
}

/// Sample item envelope JSON.
fn sample_item(key: &str, title: &str) -> serde_json::Value {
    json!({
        "key": key,
        "version": 10,
        "data": {
            "itemType": "journalArticle",
            "title": title,
            "collections": [],
            "tags": [{"tag": "methods"}]
        }
    })
}

// =============================================================================
// List Operations
// =============================================================================

#[tokio::test]
async fn test_list_collections_defaults() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/12345/collections"))
        .and(query_param("limit", "25"))
        .and(query_param("start", "0"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Total-Results", "42")
                .set_body_json(json!([sample_collection("COLL1111", "Readings")])),
        )
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let page = client.list_collections(None, None).await.unwrap();

    assert_eq!(page.items.len(), 1);
    assert_eq!(page.total_results, 42);
    assert_eq!(page.offset, 0);
    assert_eq!(page.limit, 25);
    assert_eq!(page.items[0].data.name, "Readings");
}

#[tokio::test]
async fn test_list_items_with_explicit_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/12345/items"))
        .and(query_param("limit", "10"))
        .and(query_param("start", "5"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Total-Results", "99")
                .set_body_json(json!([sample_item("ITEM1111", "On Things")])),
        )
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let page = client.list_items(Some(10), Some(5)).await.unwrap();

    assert_eq!(page.offset, 5);
    assert_eq!(page.limit, 10);
    assert_eq!(page.total_results, 99);
}

#[tokio::test]
async fn test_list_total_falls_back_to_item_count() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/12345/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            sample_item("A", "One"),
            sample_item("B", "Two"),
        ])))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let page = client.list_items(None, None).await.unwrap();

    assert_eq!(page.total_results, 2);
}

#[tokio::test]
async fn test_group_library_prefix() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/groups/777/collections"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let mut config = Config::for_testing(&mock_server.uri());
    config.library_id = "777".to_string();
    config.library_type = LibraryType::Group;
    let client = ZoteroClient::new(config).unwrap();

    let page = client.list_collections(None, None).await.unwrap();
    assert!(page.items.is_empty());
}

// =============================================================================
// Headers
// =============================================================================

#[tokio::test]
async fn test_requests_carry_version_and_key_headers() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/12345/items"))
        .and(header("Zotero-API-Version", "3"))
        .and(header("Zotero-API-Key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    client.list_items(None, None).await.unwrap();
}

#[tokio::test]
async fn test_local_mode_omits_key_header() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/0/items"))
        .and(header("Zotero-API-Version", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let mut config = Config::local();
    config.base_url = mock_server.uri();
    config.min_request_interval = std::time::Duration::ZERO;
    // A stale key must still be ignored in local mode.
    config.api_key = Some("should-not-be-sent".to_string());
    let client = ZoteroClient::new(config).unwrap();

    client.list_items(None, None).await.unwrap();

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert!(!requests[0].headers.contains_key("Zotero-API-Key"));
}

// =============================================================================
// Fetch and Search
// =============================================================================

#[tokio::test]
async fn test_get_item() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/12345/items/ITEM1111"))
        .respond_with(ResponseTemplate::new(200).set_body_json(sample_item("ITEM1111", "On Things")))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let item = client.get_item("ITEM1111").await.unwrap();

    assert_eq!(item.key, "ITEM1111");
    assert_eq!(item.version, 10);
    assert_eq!(item.data.title.as_deref(), Some("On Things"));
}

#[tokio::test]
async fn test_get_item_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/12345/items/MISSING1"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Item not found"))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client.get_item("MISSING1").await.unwrap_err();

    assert!(matches!(err, ClientError::NotFound { .. }));
    assert!(err.to_string().contains("Item not found"));
}

#[tokio::test]
async fn test_list_forbidden_carries_diagnostics() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/12345/items"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Invalid key"))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let err = client.list_items(None, None).await.unwrap_err();

    assert!(matches!(err, ClientError::Forbidden { .. }));
    assert_eq!(err.operation(), Some("list_items"));
    assert!(err.to_string().contains("Invalid key"));
}

#[tokio::test]
async fn test_search_defaults_and_tag_passthrough() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/12345/items"))
        .and(query_param("q", "attention"))
        .and(query_param("qmode", "titleCreatorYear"))
        .and(query_param("sort", "dateModified"))
        .and(query_param("direction", "desc"))
        .and(query_param("itemType", "journalArticle"))
        .and(query_param("tag", "ml || -deprecated"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Total-Results", "7")
                .set_body_json(json!([sample_item("ITEM2222", "Attention Is All You Need")])),
        )
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let params = SearchParams::new("attention")
        .item_type("journalArticle")
        .tag("ml || -deprecated");
    let page = client.search_items(&params).await.unwrap();

    assert_eq!(page.total_results, 7);
    assert_eq!(page.items[0].data.title.as_deref(), Some("Attention Is All You Need"));
}

#[tokio::test]
async fn test_children_filter_to_attachments() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/12345/items/PARENT11/children"))
        .and(query_param("itemType", "attachment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "key": "ATTACH11",
            "version": 4,
            "data": {
                "itemType": "attachment",
                "linkMode": "imported_file",
                "contentType": "application/pdf",
                "filename": "paper.pdf"
            }
        }])))
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let children = client.get_item_children("PARENT11", true).await.unwrap();

    assert_eq!(children.len(), 1);
    assert!(children[0].data.is_attachment());
    assert!(children[0].data.is_pdf());
}

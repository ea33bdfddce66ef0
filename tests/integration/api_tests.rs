//! HTTP fetcher and lookup behavior against a mock API

use crate::common::{create_fetcher, create_test_config, thread_json, USER_AGENT};
use chan_archiver::api::{FetchError, Fetcher};
use chan_archiver::archive::AttachmentRef;
use chan_archiver::{Archiver, ArchiverError};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_fetch_thread_decodes_posts() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/g/thread/500.json"))
        .and(header("user-agent", USER_AGENT))
        .respond_with(ResponseTemplate::new(200).set_body_json(thread_json(4, true)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = create_fetcher(&mock_server);
    let snapshot = fetcher.fetch_thread("g", 500).await.unwrap();

    assert_eq!(snapshot.len(), 4);
    assert!(snapshot.is_closed());
    assert_eq!(snapshot.posts[1].resto, 500);
    assert_eq!(snapshot.posts[3].ext.as_deref(), Some(".png"));
    assert_eq!(snapshot.posts[1].plain_comment(), "post 501\n>quoted");
}

#[tokio::test]
async fn test_missing_thread_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/g/thread/1.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let fetcher = create_fetcher(&mock_server);
    let result = fetcher.fetch_thread("g", 1).await;
    assert!(matches!(result, Err(FetchError::NotFound { .. })));

    let config = create_test_config(&mock_server, "unused");
    let archiver = Archiver::from_config(&config).unwrap();
    assert!(matches!(
        archiver.get_thread("g", 1).await,
        Err(ArchiverError::ThreadNotFound { thread: 1, .. })
    ));
}

#[tokio::test]
async fn test_server_error_is_status() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/g/catalog.json"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let fetcher = create_fetcher(&mock_server);
    let result = fetcher.fetch_catalog("g").await;
    assert!(matches!(result, Err(FetchError::Status { status: 503, .. })));
}

#[tokio::test]
async fn test_malformed_json_is_decode_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/g/thread/2.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"posts\": [{\"no\": "))
        .mount(&mock_server)
        .await;

    let fetcher = create_fetcher(&mock_server);
    let result = fetcher.fetch_thread("g", 2).await;
    assert!(matches!(result, Err(FetchError::Decode { .. })));
}

#[tokio::test]
async fn test_attachment_comes_from_media_host() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/media/wg/1700000000123.jpg"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xFF, 0xD8, 0xFF]))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = create_fetcher(&mock_server);
    let bytes = fetcher
        .fetch_attachment(&AttachmentRef {
            board: "wg".to_string(),
            tim: 1700000000123,
            ext: ".jpg".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(bytes, vec![0xFF, 0xD8, 0xFF]);
}

#[tokio::test]
async fn test_board_lookup() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/boards.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "boards": [
                {"board": "g", "title": "Technology", "ws_board": 1, "per_page": 15,
                 "pages": 10, "max_filesize": 4194304, "code_tags": 1},
                {"board": "k", "title": "Weapons", "ws_board": 1}
            ]
        })))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server, "unused");
    let archiver = Archiver::from_config(&config).unwrap();

    let board = archiver.get_board_info("g").await.unwrap();
    assert_eq!(board.title, "Technology");
    assert_eq!(board.max_filesize, 4194304);
    assert_eq!(board.extra.get("code_tags"), Some(&json!(1)));

    assert!(matches!(
        archiver.get_board_info("zz").await,
        Err(ArchiverError::BoardNotFound(code)) if code == "zz"
    ));
}

#[tokio::test]
async fn test_catalog_and_archive_listing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/g/catalog.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"page": 1, "threads": [{"no": 10, "resto": 0, "sub": "First", "replies": 2}]},
            {"page": 2, "threads": [{"no": 20, "resto": 0, "replies": 0}]}
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/g/archive.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([31, 32, 33])))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/zz/catalog.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let config = create_test_config(&mock_server, "unused");
    let archiver = Archiver::from_config(&config).unwrap();

    let pages = archiver.get_catalog("g").await.unwrap();
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].threads[0].op.sub.as_deref(), Some("First"));
    assert_eq!(pages[1].threads[0].op.no, 20);

    let archived = archiver.get_archived_threads("g").await.unwrap();
    assert_eq!(archived, vec![31, 32, 33]);

    assert!(matches!(
        archiver.get_catalog("zz").await,
        Err(ArchiverError::BoardNotFound(_))
    ));
}

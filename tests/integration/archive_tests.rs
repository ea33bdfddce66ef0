//! End-to-end archive sessions against a mock API

use crate::common::{attachment_path, create_fetcher, create_test_config, thread_json};
use chan_archiver::archive::{thread_dir, ArchiveStore, DiffStrategy, ATTACHMENTS_DIR};
use chan_archiver::{Archiver, ArchiverError, SessionConfig, TerminationReason};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_attachment(server: &MockServer, no: u64, expected: u64) {
    Mock::given(method("GET"))
        .and(path(attachment_path("g", no)))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(format!("image {}", no)))
        .expect(expected)
        .mount(server)
        .await;
}

fn fast_archiver(server: &MockServer, diff_strategy: DiffStrategy) -> Archiver {
    Archiver::new(
        Arc::new(create_fetcher(server)),
        SessionConfig {
            poll_interval: Duration::from_millis(50),
            max_concurrent_downloads: 2,
            diff_strategy,
        },
    )
}

#[tokio::test]
async fn test_single_shot_archive() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/g/thread/500.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(thread_json(5, false)))
        .expect(2)
        .mount(&mock_server)
        .await;

    // Each attachment is downloaded once across both sessions
    mount_attachment(&mock_server, 500, 1).await;
    mount_attachment(&mock_server, 503, 1).await;

    let config = create_test_config(&mock_server, &output.path().to_string_lossy());
    let archiver = Archiver::from_config(&config).unwrap();

    let report = archiver
        .start_session("g", 500, output.path(), false)
        .await
        .unwrap();

    assert_eq!(report.cycles, 1);
    assert_eq!(report.posts_archived, 5);
    assert_eq!(report.attachments_downloaded, 2);
    assert_eq!(report.termination, Some(TerminationReason::SingleShot));

    let dir = thread_dir(output.path(), "g", 500);
    let image = std::fs::read(dir.join(ATTACHMENTS_DIR).join("1700000000500.png")).unwrap();
    assert_eq!(image, b"image 500");

    let rows = ArchiveStore::open(&dir).unwrap().read_rows().unwrap();
    let numbers: Vec<u64> = rows.iter().map(|r| r.no).collect();
    assert_eq!(numbers, vec![500, 501, 502, 503, 504]);
    assert_eq!(rows[1].text.as_deref(), Some("post 501\n>quoted"));
    assert_eq!(rows[3].filename.as_deref(), Some("image503"));

    // A second run over an unchanged thread appends nothing
    let again = archiver
        .start_session("g", 500, output.path(), false)
        .await
        .unwrap();

    assert_eq!(again.posts_archived, 0);
    assert_eq!(again.attachments_downloaded, 0);
    assert_eq!(ArchiveStore::open(&dir).unwrap().current_count(), 5);
}

#[tokio::test]
async fn test_monitor_until_thread_closes() {
    for strategy in [DiffStrategy::Count, DiffStrategy::PostId] {
        let mock_server = MockServer::start().await;
        let output = TempDir::new().unwrap();

        Mock::given(method("GET"))
            .and(path("/g/thread/500.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(thread_json(3, false)))
            .up_to_n_times(1)
            .mount(&mock_server)
            .await;

        Mock::given(method("GET"))
            .and(path("/g/thread/500.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(thread_json(5, true)))
            .mount(&mock_server)
            .await;

        mount_attachment(&mock_server, 500, 1).await;
        mount_attachment(&mock_server, 503, 1).await;

        let report = fast_archiver(&mock_server, strategy)
            .start_session("g", 500, output.path(), true)
            .await
            .unwrap();

        assert_eq!(report.cycles, 2, "{:?}", strategy);
        assert_eq!(report.posts_archived, 5);
        assert_eq!(report.attachments_downloaded, 2);
        assert_eq!(report.termination, Some(TerminationReason::ThreadClosed));

        let dir = thread_dir(output.path(), "g", 500);
        assert_eq!(ArchiveStore::open(&dir).unwrap().current_count(), 5);
    }
}

#[tokio::test]
async fn test_failed_attachment_keeps_posts() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/g/thread/500.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(thread_json(4, false)))
        .mount(&mock_server)
        .await;

    mount_attachment(&mock_server, 500, 1).await;

    Mock::given(method("GET"))
        .and(path(attachment_path("g", 503)))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let report = fast_archiver(&mock_server, DiffStrategy::PostId)
        .start_session("g", 500, output.path(), false)
        .await
        .unwrap();

    assert_eq!(report.posts_archived, 4);
    assert_eq!(report.attachments_downloaded, 1);
    assert_eq!(report.attachments_failed, 1);
    assert_eq!(report.failed_attachments, vec!["1700000000503.png".to_string()]);

    let attachments = thread_dir(output.path(), "g", 500).join(ATTACHMENTS_DIR);
    assert!(!attachments.join("1700000000503.png").exists());
}

#[tokio::test]
async fn test_missing_thread_fails_session() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/g/thread/404.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let result = fast_archiver(&mock_server, DiffStrategy::PostId)
        .start_session("g", 404, output.path(), true)
        .await;

    assert!(matches!(
        result,
        Err(ArchiverError::ThreadNotFound { thread: 404, .. })
    ));
}

#[tokio::test]
async fn test_thread_deleted_while_monitoring() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/g/thread/500.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(thread_json(2, false)))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/g/thread/500.json"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    mount_attachment(&mock_server, 500, 1).await;

    let report = fast_archiver(&mock_server, DiffStrategy::PostId)
        .start_session("g", 500, output.path(), true)
        .await
        .unwrap();

    assert_eq!(report.cycles, 1);
    assert_eq!(report.posts_archived, 2);
    assert!(matches!(
        report.termination,
        Some(TerminationReason::FetchFailed(_))
    ));
}

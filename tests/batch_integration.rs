//! Integration tests for concurrent batch downloads.
//!
//! Verify fan-out across a bounded pool, per-URL failure isolation, and
//! submission-order result collection against mock HTTP servers.

use std::time::Duration;

use dataset_fetcher::{BatchDownloader, HeaderProvider, HttpClient, RetryPolicy, Workspace};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_downloader(root: &std::path::Path) -> BatchDownloader {
    let client = HttpClient::new(&HeaderProvider::from_env());
    BatchDownloader::with_policy(
        client,
        Workspace::new(root),
        RetryPolicy::with_base_delay(Duration::from_millis(10)),
    )
}

async fn mount_file(server: &MockServer, path_str: &str, content: &[u8]) {
    Mock::given(method("GET"))
        .and(path(path_str))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content.to_vec()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_batch_partial_failure_returns_only_successes() {
    let mock_server = MockServer::start().await;
    mount_file(&mock_server, "/one.txt", b"first file").await;
    mount_file(&mock_server, "/three.txt", b"third file").await;
    Mock::given(method("GET"))
        .and(path("/missing.txt"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let temp = TempDir::new().expect("temp dir");
    let downloader = test_downloader(temp.path());

    let urls = [
        format!("{}/one.txt", mock_server.uri()),
        format!("{}/missing.txt", mock_server.uri()),
        format!("{}/three.txt", mock_server.uri()),
    ];
    let paths = downloader
        .download_files_from_urls("job-partial", urls)
        .await
        .expect("batch never fails for individual URLs");

    // Exactly the two successes, in submission order.
    assert_eq!(paths.len(), 2);
    assert_eq!(std::fs::read(&paths[0]).expect("readable"), b"first file");
    assert_eq!(std::fs::read(&paths[1]).expect("readable"), b"third file");
    for p in &paths {
        assert!(p.is_absolute(), "returned paths are absolute: {p:?}");
        assert!(p.starts_with(temp.path().join("jobs/job-partial/downloaded_files")));
    }
}

#[tokio::test]
async fn test_batch_empty_urls_are_skipped() {
    let mock_server = MockServer::start().await;
    mount_file(&mock_server, "/only.txt", b"content").await;

    let temp = TempDir::new().expect("temp dir");
    let downloader = test_downloader(temp.path());

    let urls = [String::new(), format!("{}/only.txt", mock_server.uri())];
    let paths = downloader
        .download_files_from_urls("job-empties", urls)
        .await
        .expect("batch succeeds");

    assert_eq!(paths.len(), 1);
}

#[tokio::test]
async fn test_batch_generates_distinct_names_for_identical_urls() {
    let mock_server = MockServer::start().await;
    mount_file(&mock_server, "/same.txt", b"same content").await;

    let temp = TempDir::new().expect("temp dir");
    let downloader = test_downloader(temp.path());

    let url = format!("{}/same.txt", mock_server.uri());
    let paths = downloader
        .download_files_from_urls("job-dup", [url.clone(), url.clone(), url])
        .await
        .expect("batch succeeds");

    assert_eq!(paths.len(), 3);
    let mut unique = paths.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), 3, "every download gets its own file");
}

#[tokio::test]
async fn test_single_url_convenience_normalizes_to_batch() {
    let mock_server = MockServer::start().await;
    mount_file(&mock_server, "/solo.csv", b"a,b,c").await;

    let temp = TempDir::new().expect("temp dir");
    let downloader = test_downloader(temp.path());

    let url = format!("{}/solo.csv", mock_server.uri());
    let file = downloader
        .download_file_from_url("job-solo", &url)
        .await
        .expect("batch succeeds")
        .expect("the one URL succeeds");

    assert!(file.to_string_lossy().ends_with(".csv"));
    assert_eq!(std::fs::read(&file).expect("readable"), b"a,b,c");
}

#[tokio::test]
async fn test_batch_failed_url_consumes_full_retry_budget() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/always-500.bin"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    let temp = TempDir::new().expect("temp dir");
    let downloader = test_downloader(temp.path());

    let paths = downloader
        .download_files_from_urls(
            "job-retry",
            [format!("{}/always-500.bin", mock_server.uri())],
        )
        .await
        .expect("batch succeeds despite the failing URL");

    assert!(paths.is_empty());
}

#[tokio::test]
async fn test_batch_larger_than_pool_completes() {
    let mock_server = MockServer::start().await;
    mount_file(&mock_server, "/item.bin", b"payload").await;

    let temp = TempDir::new().expect("temp dir");
    let downloader = test_downloader(temp.path());

    // More URLs than workers; the semaphore drains them all.
    let count = downloader.concurrency() * 2 + 3;
    let urls: Vec<String> = (0..count)
        .map(|_| format!("{}/item.bin", mock_server.uri()))
        .collect();

    let paths = downloader
        .download_files_from_urls("job-wide", urls)
        .await
        .expect("batch succeeds");

    assert_eq!(paths.len(), count);
}

//! Integration tests for phrase search
//!
//! Hosts are activated against wiremock servers, then searched. Request
//! counts on the mocks show which endpoints were served from the cache.

use phrase_crawl::config::{Config, FetcherConfig, SearchConfig, StorageConfig};
use phrase_crawl::crawler::Coordinator;
use phrase_crawl::storage::{EndpointStore, PageMatch};
use phrase_crawl::CrawlError;
use std::collections::HashSet;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate, Times};

fn create_test_config(dir: &TempDir) -> Config {
    Config {
        search: SearchConfig {
            host_time_budget_secs: 10,
            global_time_budget_secs: 20,
            max_concurrent_fetches: 4,
            activation_time_budget_secs: 10,
        },
        fetcher: FetcherConfig {
            scheme: "http".to_string(),
            request_timeout_secs: 5,
            user_agent: "TestCrawler/1.0".to_string(),
        },
        storage: StorageConfig {
            database_path: dir.path().join("crawl.db").to_string_lossy().into_owned(),
        },
        hosts: vec![],
    }
}

async fn mount_page(server: &MockServer, route: &str, body: &str, times: impl Into<Times>) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(times)
        .mount(server)
        .await;
}

/// Serves a front page linking to `/home` and `/golang`
async fn mount_go_site(server: &MockServer, page_fetches: impl Into<Times> + Clone) {
    mount_page(
        server,
        "/",
        r#"<a href="/home">Home</a> <a href="/golang">Golang</a>"#,
        1,
    )
    .await;
    mount_page(
        server,
        "/home",
        "<html><title>Home</title><body>Welcome to Go</body></html>",
        page_fetches.clone(),
    )
    .await;
    mount_page(
        server,
        "/golang",
        "<html><title>Go Lang</title><body>Go is a language</body></html>",
        page_fetches,
    )
    .await;
}

fn as_set(pages: &[PageMatch]) -> HashSet<PageMatch> {
    pages.iter().cloned().collect()
}

#[tokio::test]
async fn test_second_search_is_served_from_cache() {
    let mock_server = MockServer::start().await;
    let host = mock_server.uri();
    // Activation fetches each page once, the first search once more
    mount_go_site(&mock_server, 2).await;

    let dir = TempDir::new().unwrap();
    let coordinator = Coordinator::from_config(&create_test_config(&dir)).unwrap();
    let cancel = CancellationToken::new();

    coordinator.activate(&[host.clone()], &cancel).await.unwrap();

    let expected: HashSet<PageMatch> = [
        PageMatch::new("/home", "Home"),
        PageMatch::new("/golang", "Go Lang"),
    ]
    .into_iter()
    .collect();

    let first = coordinator.search("Go", &cancel).await.unwrap();
    assert_eq!(first.len(), 1);
    assert_eq!(first[0].host, host);
    assert_eq!(as_set(&first[0].pages), expected);

    let second = coordinator.search("Go", &cancel).await.unwrap();
    assert_eq!(as_set(&second[0].pages), expected);

    let record = coordinator.store().get_host(&host).unwrap().unwrap();
    assert_eq!(
        coordinator.store().list_endpoint_phrases(&record, "/golang").unwrap(),
        vec!["Go"]
    );
}

#[tokio::test]
async fn test_absent_phrase_returns_nothing() {
    let mock_server = MockServer::start().await;
    let host = mock_server.uri();
    mount_go_site(&mock_server, 2).await;

    let dir = TempDir::new().unwrap();
    let coordinator = Coordinator::from_config(&create_test_config(&dir)).unwrap();
    let cancel = CancellationToken::new();

    coordinator.activate(&[host.clone()], &cancel).await.unwrap();

    let groups = coordinator.search("Rust", &cancel).await.unwrap();
    assert!(groups.is_empty());

    let record = coordinator.store().get_host(&host).unwrap().unwrap();
    assert!(coordinator
        .store()
        .get_confirmed_endpoints(&record, "Rust")
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_unreachable_host_fails_whole_search() {
    let healthy = MockServer::start().await;
    // The search may be aborted before this host's pages are fetched again
    mount_go_site(&healthy, 1..=2).await;

    let dir = TempDir::new().unwrap();
    let coordinator = Coordinator::from_config(&create_test_config(&dir)).unwrap();
    let cancel = CancellationToken::new();

    coordinator
        .activate(&[healthy.uri()], &cancel)
        .await
        .unwrap();

    let gone_host = {
        let doomed = MockServer::start().await;
        mount_page(&doomed, "/", r#"<a href="/page">Page</a>"#, 1).await;
        mount_page(&doomed, "/page", "<title>Page</title>", 1).await;
        coordinator
            .activate(&[doomed.uri()], &cancel)
            .await
            .unwrap();
        doomed.uri()
    };

    let result = coordinator.search("Go", &cancel).await;
    assert!(matches!(result, Err(CrawlError::Fetch(_))));

    let record = coordinator.store().get_host(&gone_host).unwrap().unwrap();
    assert!(coordinator
        .store()
        .get_confirmed_endpoints(&record, "Go")
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_slow_host_times_out() {
    let mock_server = MockServer::start().await;
    let host = mock_server.uri();
    mount_page(&mock_server, "/", r#"<a href="/slow">Slow</a>"#, 1).await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<title>Slow</title>"))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("<title>Slow</title>needle")
                .set_delay(std::time::Duration::from_secs(4)),
        )
        .mount(&mock_server)
        .await;

    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(&dir);
    config.search.host_time_budget_secs = 1;
    let coordinator = Coordinator::from_config(&config).unwrap();
    let cancel = CancellationToken::new();

    coordinator.activate(&[host.clone()], &cancel).await.unwrap();

    let result = coordinator.search("needle", &cancel).await;
    match result {
        Err(CrawlError::Timeout { scope, .. }) => assert!(scope.contains(&host)),
        other => panic!("expected host timeout, got {:?}", other),
    }
}

#[tokio::test]
async fn test_blank_phrase_rejected() {
    let dir = TempDir::new().unwrap();
    let coordinator = Coordinator::from_config(&create_test_config(&dir)).unwrap();

    let result = coordinator.search("  ", &CancellationToken::new()).await;
    assert!(matches!(result, Err(CrawlError::Validation(_))));
}

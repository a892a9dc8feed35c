//! Integration tests for host activation
//!
//! These tests use wiremock to serve a host's front page and endpoint pages
//! and check what activation leaves in an on-disk database.

use phrase_crawl::config::{Config, FetcherConfig, SearchConfig, StorageConfig};
use phrase_crawl::crawler::Coordinator;
use phrase_crawl::storage::{EndpointStore, PageMatch};
use phrase_crawl::CrawlError;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at a database inside `dir`
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

async fn mount_page(server: &MockServer, route: &str, body: &str, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_activate_single_host() {
    let mock_server = MockServer::start().await;
    let host = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r##"<html><head><title>Home</title></head><body>
        <a href="/about">About</a>
        <a class="nav" href='/blog'>Blog</a>
        <a href="#">Top</a>
        <a href="https://elsewhere.example/">Away</a>
        <a href="/about">About again</a>
        </body></html>"##,
        1,
    )
    .await;
    mount_page(&mock_server, "/about", "<title>About Us</title>", 1).await;
    mount_page(&mock_server, "/blog", "<title>Blog</title><p>posts</p>", 1).await;

    let dir = TempDir::new().unwrap();
    let coordinator = Coordinator::from_config(&create_test_config(&dir)).unwrap();

    let added = coordinator
        .activate(&[host.clone()], &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(added, 2);

    let store = coordinator.store();
    let record = store.get_host(&host).unwrap().unwrap();
    assert!(record.is_searchable);

    let mut endpoints = store.list_endpoints(&record).unwrap();
    endpoints.sort_by(|a, b| a.path.cmp(&b.path));
    assert_eq!(
        endpoints,
        vec![
            PageMatch::new("/about", "About Us"),
            PageMatch::new("/blog", "Blog"),
        ]
    );
}

#[tokio::test]
async fn test_activation_persists_across_reopen() {
    let mock_server = MockServer::start().await;
    let host = mock_server.uri();

    mount_page(&mock_server, "/", r#"<a href="/docs">Docs</a>"#, 1).await;
    mount_page(&mock_server, "/docs", "<title>Docs</title>", 1).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&dir);

    {
        let coordinator = Coordinator::from_config(&config).unwrap();
        coordinator
            .activate(&[host.clone()], &CancellationToken::new())
            .await
            .unwrap();
    }

    let coordinator = Coordinator::from_config(&config).unwrap();
    let hosts = coordinator.store().list_hosts_with_endpoints().unwrap();
    assert_eq!(hosts.len(), 1);
    assert!(hosts[0].is_searchable);
    assert_eq!(hosts[0].endpoints, vec![PageMatch::new("/docs", "Docs")]);
}

#[tokio::test]
async fn test_unreachable_host_aborts_activation() {
    let dir = TempDir::new().unwrap();
    let coordinator = Coordinator::from_config(&create_test_config(&dir)).unwrap();

    let result = coordinator
        .activate(
            &["http://127.0.0.1:1".to_string()],
            &CancellationToken::new(),
        )
        .await;

    assert!(matches!(result, Err(CrawlError::Fetch(_))));
    let host = coordinator
        .store()
        .get_host("http://127.0.0.1:1")
        .unwrap()
        .unwrap();
    assert!(!host.is_searchable);
}

//! Integration tests for the crawler against a mock site

mod common;

use common::{html_page, test_config};
use recx::cancel::CancelToken;
use recx::crawler::Crawler;
use recx::http::HttpClient;
use recx::models::{ScanConfig, Target};
use recx::queue::{param_queue, ParamReceiver};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer};

fn crawler_for(server_uri: &str, config: &ScanConfig) -> (Arc<Crawler>, ParamReceiver) {
    let target = Target::parse(server_uri).expect("valid target");
    let client = HttpClient::from_config(config).expect("failed to create client");
    let (tx, rx) = param_queue(config.queue_capacity);
    let crawler = Crawler::new(Arc::new(client), &target, config, tx, CancelToken::new());
    (crawler, rx)
}

async fn drain(rx: &ParamReceiver) -> Vec<String> {
    let mut names = Vec::new();
    while let Some(name) = rx.next().await {
        names.push(name);
    }
    names
}

#[tokio::test]
async fn test_each_page_fetched_once() {
    let mock_server = MockServer::start().await;

    let pages = [
        ("/", r#"<a href="/a">A</a><a href="/b">B</a><a href="/a">A again</a>"#),
        ("/a", r#"<a href="/b">B</a><a href="/">Home</a><a href="/a">Self</a>"#),
        ("/b", r#"<a href="/a">A</a><a href="/">Home</a>"#),
    ];
    for (page, body) in pages {
        Mock::given(method("GET"))
            .and(path(page))
            .respond_with(html_page(body))
            .expect(1)
            .mount(&mock_server)
            .await;
    }

    let (crawler, _rx) = crawler_for(&mock_server.uri(), &test_config());
    crawler.run(&mock_server.uri()).await;

    assert_eq!(crawler.state().visited_count(), 3);
}

#[tokio::test]
async fn test_depth_limit() {
    let mock_server = MockServer::start().await;

    for depth in 0..=5 {
        Mock::given(method("GET"))
            .and(path(format!("/d{depth}")))
            .respond_with(html_page(&format!(r#"<a href="/d{}">next</a>"#, depth + 1)))
            .expect(1)
            .mount(&mock_server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/d6"))
        .respond_with(html_page(""))
        .expect(0)
        .mount(&mock_server)
        .await;

    let (crawler, _rx) = crawler_for(&mock_server.uri(), &test_config());
    crawler.run(&format!("{}/d0", mock_server.uri())).await;
}

#[tokio::test]
async fn test_url_limit() {
    let mock_server = MockServer::start().await;

    let links: String = (0..40).map(|i| format!(r#"<a href="/p{i}">{i}</a>"#)).collect();
    Mock::given(method("GET"))
        .respond_with(html_page(&links))
        .mount(&mock_server)
        .await;

    let config = ScanConfig {
        max_urls: 12,
        ..test_config()
    };
    let (crawler, _rx) = crawler_for(&mock_server.uri(), &config);
    crawler.run(&mock_server.uri()).await;

    let requests = mock_server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 12);
    assert_eq!(crawler.state().claimed(), 12);
}

#[tokio::test]
async fn test_offsite_links_not_crawled_but_params_queued() {
    let mock_server = MockServer::start().await;
    let offsite = MockServer::start().await;

    // The target is addressed by IP, the other site by name, so their hosts differ
    let offsite_link = format!(
        "{}/track?campaign=spring",
        offsite.uri().replace("127.0.0.1", "localhost")
    );
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(&format!(
            r#"<a href="/search?q=shoes&sort=asc">s</a><a href="{offsite_link}">o</a>"#
        )))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(html_page("no results"))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .respond_with(html_page(""))
        .expect(0)
        .mount(&offsite)
        .await;

    let (crawler, rx) = crawler_for(&mock_server.uri(), &test_config());
    crawler.run(&mock_server.uri()).await;
    drop(crawler);

    let names = drain(&rx).await;
    for expected in ["q", "sort", "campaign"] {
        assert!(
            names.contains(&expected.to_string()),
            "expected '{expected}' in {names:?}"
        );
    }
}

#[tokio::test]
async fn test_failed_pages_are_skipped() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page(
            r#"<a href="/slow">slow</a><a href="/ok?page=2">ok</a>"#,
        ))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html_page("late").set_delay(std::time::Duration::from_secs(3)))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/ok"))
        .respond_with(html_page("fine"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = ScanConfig {
        timeout_secs: 1,
        ..test_config()
    };
    let (crawler, _rx) = crawler_for(&mock_server.uri(), &config);
    crawler.run(&mock_server.uri()).await;

    // The timed-out page still counts as visited
    assert_eq!(crawler.state().visited_count(), 3);
}

//! Integration tests for the reflection prober against echoing mock servers

mod common;

use common::{html_page, query_value, test_config, EchoParam, StickyEcho};
use recx::cancel::CancelToken;
use recx::http::HttpClient;
use recx::models::SPECIAL_CHARS;
use recx::scanner::markers::RandomMarkers;
use recx::scanner::reflection::ReflectionProber;
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn prober(strict: bool) -> ReflectionProber {
    let client = HttpClient::from_config(&test_config()).expect("failed to create client");
    ReflectionProber::new(
        Arc::new(client),
        Arc::new(RandomMarkers),
        strict,
        CancelToken::new(),
    )
}

#[tokio::test]
async fn test_raw_echo_reports_every_character() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(EchoParam::raw("q"))
        .mount(&mock_server)
        .await;

    let finding = prober(false)
        .probe(&mock_server.uri(), "q")
        .await
        .expect("q should be reported as reflected");

    assert_eq!(finding.param, "q");
    assert_eq!(finding.base_url, mock_server.uri());
    assert_eq!(finding.unfiltered_chars(), SPECIAL_CHARS);
    assert_eq!(
        finding.to_string(),
        format!(
            "{}?q=REFLECTED (unfiltered:{} )",
            mock_server.uri(),
            SPECIAL_CHARS
        )
    );
}

#[tokio::test]
async fn test_entity_encoded_brackets_are_filtered() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(EchoParam {
            param: "q",
            encoded: &['<', '>'],
        })
        .mount(&mock_server)
        .await;

    let finding = prober(false)
        .probe(&mock_server.uri(), "q")
        .await
        .expect("q should be reported as reflected");

    let expected: String = SPECIAL_CHARS.chars().filter(|c| *c != '<' && *c != '>').collect();
    assert_eq!(finding.unfiltered_chars(), expected);
}

#[tokio::test]
async fn test_sticky_echo_rejected_by_second_marker() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(StickyEcho::new("q"))
        .mount(&mock_server)
        .await;

    let finding = prober(false).probe(&mock_server.uri(), "q").await;
    assert!(finding.is_none(), "stale echo must not be reported");

    // Two verification requests and no character probes
    let requests = mock_server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_static_page_not_reflected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(html_page("<h1>Welcome</h1>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    assert!(prober(false).probe(&mock_server.uri(), "q").await.is_none());
}

#[tokio::test]
async fn test_fully_filtered_reflection_not_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(EchoParam {
            param: "q",
            encoded: &['\'', '<', '>', '$', '|', '(', ')', '`', ';', '{', '}'],
        })
        .mount(&mock_server)
        .await;

    let prober = prober(false);
    assert!(prober.probe(&mock_server.uri(), "q").await.is_none());
    assert!(prober
        .check_unfiltered_chars(&mock_server.uri(), "q")
        .await
        .is_empty());
}

#[tokio::test]
async fn test_strict_mode_skips_attribute_reflection() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(|request: &wiremock::Request| {
            let value = query_value(request, "next").unwrap_or_default();
            ResponseTemplate::new(200)
                .set_body_string(format!(r#"<a href="/login?next={value}">Log in</a>"#))
        })
        .mount(&mock_server)
        .await;

    assert!(prober(true).probe(&mock_server.uri(), "next").await.is_none());
    assert!(prober(false).probe(&mock_server.uri(), "next").await.is_some());
}

use std::time::Duration;

use repricer_engine::{FailureKind, FetchSettings, Fetcher, ReqwestFetcher};
use wiremock::matchers::{header_exists, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher(settings: FetchSettings) -> ReqwestFetcher {
    ReqwestFetcher::new(settings).expect("client builds")
}

async fn serve(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .mount(server)
        .await;
}

fn redirect_to(location: &str) -> ResponseTemplate {
    ResponseTemplate::new(302).insert_header("Location", location)
}

#[tokio::test]
async fn fetches_listing_html_with_browser_headers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/itm/1"))
        .and(header_exists("user-agent"))
        .and(header_exists("accept-language"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<html>ok</html>", "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    let url = format!("{}/itm/1", server.uri());
    let output = fetcher(FetchSettings::default())
        .fetch(&url)
        .await
        .expect("fetch ok");

    assert_eq!(output.metadata.final_url, url);
    assert!(output
        .metadata
        .content_type
        .unwrap()
        .starts_with("text/html"));
    assert_eq!(output.bytes, b"<html>ok</html>");
}

#[tokio::test]
async fn non_success_status_is_reported_with_its_code() {
    let server = MockServer::start().await;
    serve(&server, "/itm/gone", ResponseTemplate::new(404)).await;

    let err = fetcher(FetchSettings::default())
        .fetch(&format!("{}/itm/gone", server.uri()))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
}

#[tokio::test]
async fn slow_page_times_out() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/itm/slow",
        ResponseTemplate::new(200)
            .set_delay(Duration::from_millis(250))
            .set_body_string("slow"),
    )
    .await;

    let settings = FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::default()
    };
    let err = fetcher(settings)
        .fetch(&format!("{}/itm/slow", server.uri()))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn oversized_page_is_rejected() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/itm/large",
        ResponseTemplate::new(200)
            .insert_header("Content-Type", "text/html")
            .set_body_string("01234567890"),
    )
    .await;

    let settings = FetchSettings {
        max_bytes: 10,
        ..FetchSettings::default()
    };
    let err = fetcher(settings)
        .fetch(&format!("{}/itm/large", server.uri()))
        .await
        .unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 10,
            actual: 11
        }
    );
}

#[tokio::test]
async fn non_html_content_is_rejected() {
    let server = MockServer::start().await;
    serve(
        &server,
        "/api/item",
        ResponseTemplate::new(200).set_body_raw("{}", "application/json"),
    )
    .await;

    let err = fetcher(FetchSettings::default())
        .fetch(&format!("{}/api/item", server.uri()))
        .await
        .unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::UnsupportedContentType {
            content_type: "application/json".to_string()
        }
    );
}

#[tokio::test]
async fn redirects_are_followed_within_the_limit() {
    let server = MockServer::start().await;
    serve(&server, "/itm/old", redirect_to("/itm/new")).await;
    serve(
        &server,
        "/itm/new",
        ResponseTemplate::new(200).set_body_raw("<p>moved</p>", "text/html"),
    )
    .await;

    let output = fetcher(FetchSettings::default())
        .fetch(&format!("{}/itm/old", server.uri()))
        .await
        .expect("fetch ok");
    assert_eq!(output.metadata.final_url, format!("{}/itm/new", server.uri()));
    assert_eq!(output.bytes, b"<p>moved</p>");
}

#[tokio::test]
async fn redirect_chain_past_the_limit_fails() {
    let server = MockServer::start().await;
    serve(&server, "/r/1", redirect_to("/r/2")).await;
    serve(&server, "/r/2", redirect_to("/r/3")).await;
    serve(
        &server,
        "/r/3",
        ResponseTemplate::new(200).set_body_raw("<p>end</p>", "text/html"),
    )
    .await;

    let settings = FetchSettings {
        redirect_limit: 1,
        ..FetchSettings::default()
    };
    let err = fetcher(settings)
        .fetch(&format!("{}/r/1", server.uri()))
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::RedirectLimitExceeded);
}

#[tokio::test]
async fn unparseable_url_fails_before_any_request() {
    let err = fetcher(FetchSettings::default())
        .fetch("not-a-url")
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}

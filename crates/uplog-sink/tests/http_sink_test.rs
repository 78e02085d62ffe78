//! HTTP sink integration tests against a wiremock backend.

use uplog_core::ports::IRemoteSink;
use uplog_sink::HttpSink;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Starts a mock backend accepting both delivery endpoints and returns an
/// enabled sink pointing at it.
async fn setup_sink() -> (MockServer, HttpSink) {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/logs"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/errors"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let sink = HttpSink::new(server.uri());
    sink.set_collection_enabled(true).await.unwrap();

    (server, sink)
}

#[tokio::test]
async fn log_posts_line_to_logs_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/logs"))
        .and(body_partial_json(serde_json::json!({
            "line": "[LOG] hello"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let sink = HttpSink::new(server.uri());
    sink.set_collection_enabled(true).await.unwrap();
    sink.log("[LOG] hello").await.unwrap();
}

#[tokio::test]
async fn record_error_posts_description_to_errors_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/errors"))
        .and(body_partial_json(serde_json::json!({
            "description": "[ERROR] boom ctx"
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let sink = HttpSink::new(server.uri());
    sink.set_collection_enabled(true).await.unwrap();
    sink.record_error("[ERROR] boom ctx").await.unwrap();
}

#[tokio::test]
async fn identity_attributes_ride_along_with_payloads() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/logs"))
        .and(body_partial_json(serde_json::json!({
            "user_id": "u-7",
            "attributes": {
                "platform": "linux",
                "app_version": "0.1.0"
            }
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let sink = HttpSink::new(server.uri());
    sink.set_collection_enabled(true).await.unwrap();
    sink.set_user_id("u-7").await.unwrap();
    sink.set_attribute("platform", "linux").await.unwrap();
    sink.set_attribute("app_version", "0.1.0").await.unwrap();

    sink.log("[LOG] tagged").await.unwrap();
}

#[tokio::test]
async fn disabled_sink_sends_nothing_and_succeeds() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let sink = HttpSink::new(server.uri());
    // Never enabled.
    sink.log("[LOG] local only").await.unwrap();
    sink.record_error("[ERROR] local only").await.unwrap();
}

#[tokio::test]
async fn server_error_surfaces_as_delivery_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/logs"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let sink = HttpSink::new(server.uri());
    sink.set_collection_enabled(true).await.unwrap();

    assert!(sink.log("[LOG] doomed").await.is_err());
}

#[tokio::test]
async fn sequential_deliveries_reuse_the_sink() {
    let (server, sink) = setup_sink().await;

    sink.log("[LOG] one").await.unwrap();
    sink.log("[WARN] two").await.unwrap();
    sink.record_error("[ERROR] three").await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);
}

//! Integration tests for the Gemini HTTP client.
//!
//! Each test runs an in-process axum stub standing in for the
//! `generateContent` endpoint.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{json, Value};

use stardust::{AnswerGenerator, ErrorKind, GeminiClient, GeminiConfig};

#[derive(Debug, Clone)]
struct CapturedRequest {
    path: String,
    query: Option<String>,
    api_key: Option<String>,
    body: Value,
}

type Captured = Arc<Mutex<Vec<CapturedRequest>>>;

/// Serve `status` + `body` for every request and record what was received.
async fn spawn_stub(status: StatusCode, body: String, delay: Duration) -> (String, Captured) {
    let captured: Captured = Arc::new(Mutex::new(Vec::new()));
    let log = captured.clone();

    let app = axum::Router::new().fallback(
        move |headers: HeaderMap, uri: Uri, Json(payload): Json<Value>| {
            let log = log.clone();
            let body = body.clone();
            async move {
                log.lock().unwrap().push(CapturedRequest {
                    path: uri.path().to_string(),
                    query: uri.query().map(str::to_string),
                    api_key: headers
                        .get("x-goog-api-key")
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string),
                    body: payload,
                });
                tokio::time::sleep(delay).await;
                (
                    status,
                    [(axum::http::header::CONTENT_TYPE, "application/json")],
                    body,
                )
                    .into_response()
            }
        },
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind stub listener");
    let addr = listener.local_addr().expect("Stub has no address");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Stub server failed");
    });

    (format!("http://{addr}"), captured)
}

fn client_for(base_url: &str) -> GeminiClient {
    GeminiClient::new(
        GeminiConfig::new("test-key")
            .with_base_url(base_url)
            .with_model("test-model"),
    )
    .expect("Failed to build client")
}

fn answer_body(text: &str) -> String {
    json!({
        "candidates": [
            { "content": { "parts": [ { "text": text } ], "role": "model" }, "finishReason": "STOP" }
        ]
    })
    .to_string()
}

#[tokio::test]
async fn test_successful_exchange_sends_question_only() {
    let (base, captured) =
        spawn_stub(StatusCode::OK, answer_body("**Hello** from stub"), Duration::ZERO).await;
    let client = client_for(&base);

    let answer = client
        .generate(" What is AI? ")
        .await
        .expect("Exchange should succeed");

    assert_eq!(answer, "**Hello** from stub");

    let requests = captured.lock().unwrap().clone();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.path, "/v1beta/models/test-model:generateContent");
    assert_eq!(request.query, None, "credentials must not travel in the URL");
    assert_eq!(request.api_key.as_deref(), Some("test-key"));
    assert_eq!(
        request.body,
        json!({ "contents": [ { "parts": [ { "text": " What is AI? " } ] } ] })
    );
}

#[tokio::test]
async fn test_server_error_carries_server_message() {
    let body = json!({
        "error": {
            "code": 400,
            "message": "API key not valid. Please pass a valid API key.",
            "status": "INVALID_ARGUMENT"
        }
    })
    .to_string();
    let (base, _) = spawn_stub(StatusCode::BAD_REQUEST, body, Duration::ZERO).await;

    let err = client_for(&base).generate("q").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ServerError);
    assert_eq!(
        err.user_message(),
        "Error: API key not valid. Please pass a valid API key."
    );
}

#[tokio::test]
async fn test_server_error_without_message_uses_fallback() {
    let (base, _) = spawn_stub(
        StatusCode::SERVICE_UNAVAILABLE,
        "<html>unavailable</html>".to_string(),
        Duration::ZERO,
    )
    .await;

    let err = client_for(&base).generate("q").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ServerError);
    assert_eq!(err.user_message(), "Error: Unable to generate an answer.");
}

#[tokio::test]
async fn test_missing_candidates_is_client_error() {
    let body = json!({ "promptFeedback": { "blockReason": "SAFETY" } }).to_string();
    let (base, _) = spawn_stub(StatusCode::OK, body, Duration::ZERO).await;

    let err = client_for(&base).generate("q").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::ClientError);
    assert_eq!(err.user_message(), "Error occurred while fetching the answer.");
}

#[tokio::test]
async fn test_unreachable_server_is_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let addr = listener.local_addr().expect("No address");
    drop(listener);

    let err = client_for(&format!("http://{addr}"))
        .generate("q")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NetworkError);
    assert_eq!(
        err.user_message(),
        "Network error: Unable to connect to the server."
    );
}

#[tokio::test]
async fn test_configured_timeout_is_network_error() {
    let (base, _) = spawn_stub(StatusCode::OK, answer_body("late"), Duration::from_secs(5)).await;
    let client = GeminiClient::new(
        GeminiConfig::new("test-key")
            .with_base_url(&base)
            .with_model("test-model")
            .with_timeout(Duration::from_millis(200)),
    )
    .expect("Failed to build client");

    let err = client.generate("q").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NetworkError);
}

#[tokio::test]
async fn test_identical_questions_are_not_cached() {
    let (base, captured) = spawn_stub(StatusCode::OK, answer_body("same"), Duration::ZERO).await;
    let client = client_for(&base);

    client.generate("repeat").await.expect("first call");
    client.generate("repeat").await.expect("second call");

    assert_eq!(captured.lock().unwrap().len(), 2);
}

//! Drives `GroqClient` against a local server that mimics the chat completions API.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use fortuneapi::{
    core::prelude::*,
    domain::prelude::*,
    generator::{FortuneGenerator, GenerationParams, GroqClient, TextGenerator, FORTUNE_PROMPT},
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Clone)]
struct FakeGroq {
    status: StatusCode,
    reply: Value,
    seen: Arc<Mutex<Vec<(Option<String>, Value)>>>,
}

async fn completions(
    State(fake): State<FakeGroq>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    fake.seen.lock().await.push((auth, body));
    (fake.status, Json(fake.reply.clone()))
}

/// Starts the fake server and returns its base url.
async fn serve(fake: FakeGroq) -> String {
    let app = Router::new()
        .route("/openai/v1/chat/completions", post(completions))
        .with_state(fake);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/openai/v1")
}

fn fake(status: StatusCode, reply: Value) -> FakeGroq {
    FakeGroq {
        status,
        reply,
        seen: Arc::new(Mutex::new(Vec::new())),
    }
}

fn completion(content: &str) -> Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": content },
            "finish_reason": "stop"
        }]
    })
}

#[tokio::test]
async fn sends_prompt_and_returns_first_choice() {
    let fake = fake(StatusCode::OK, completion("{\"message\": \"Hello\"}"));
    let seen = fake.seen.clone();
    let client = GroqClient::new(serve(fake).await, "test-key");

    let text = client.generate_text(&GenerationParams::default()).await.unwrap();
    assert_eq!(text, "{\"message\": \"Hello\"}");

    let seen = seen.lock().await;
    let (auth, body) = &seen[0];
    assert_eq!(auth.as_deref(), Some("Bearer test-key"));
    assert_eq!(body["model"], "llama-3.1-8b-instant");
    assert_eq!(body["max_tokens"], 500);
    assert!((body["temperature"].as_f64().unwrap() - 0.8).abs() < 1e-6);
    assert_eq!(body["messages"][0]["role"], "user");
    assert_eq!(body["messages"][0]["content"], FORTUNE_PROMPT);
}

#[tokio::test]
async fn error_status_is_a_backend_error() {
    let fake = fake(
        StatusCode::TOO_MANY_REQUESTS,
        json!({ "error": { "message": "Rate limit reached" } }),
    );
    let client = GroqClient::new(serve(fake).await, "test-key");

    let err = client
        .generate_text(&GenerationParams::default())
        .await
        .unwrap_err();
    match err {
        BackendError::Status { status, body } => {
            assert_eq!(status.as_u16(), 429);
            assert!(body.contains("Rate limit reached"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn missing_choices_is_an_empty_completion() {
    let fake = fake(StatusCode::OK, json!({ "choices": [] }));
    let client = GroqClient::new(serve(fake).await, "test-key");

    let err = client
        .generate_text(&GenerationParams::default())
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::EmptyCompletion));
}

#[tokio::test]
async fn unreachable_backend_fails_generation() {
    // reserve a port, then free it so nothing is listening there
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = GroqClient::new(format!("http://{addr}/openai/v1"), "test-key");
    let generator = FortuneGenerator::new(Arc::new(client), GenerationParams::default());

    assert_eq!(generator.generate().await.unwrap_err(), GenerationError::Failed);
}

#[tokio::test]
async fn generator_parses_reply_from_groq() {
    let content = "Of course! Here is your fortune:\n```json\n{\"message\": \"Fortune favors you.\", \"luckyNumbers\": [2, 4, 6]}\n```";
    let fake = fake(StatusCode::OK, completion(content));
    let client = GroqClient::new(serve(fake).await, "test-key");
    let generator = FortuneGenerator::new(Arc::new(client), GenerationParams::default());

    let record = generator.generate().await.unwrap();
    assert_eq!(record.message, "Fortune favors you.");
    assert_eq!(record.lucky_numbers, "2, 4, 6");
    assert_eq!(record.interpretation, FortuneRecord::DEFAULT_INTERPRETATION);
}

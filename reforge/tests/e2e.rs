use history::{HistoryStore, JsonFileStore};
use instruct::EnhancementRequest;
use provider::MockCompletionClient;
use reforge::{App, EnhanceClient, TransportError};
use std::sync::Arc;
use tempfile::TempDir;

async fn spawn_relay(client: Arc<MockCompletionClient>) -> String {
    let state = relay::AppState {
        client,
        model: "gpt-3.5-turbo".into(),
    };
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}/api/enhance", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, relay::router(state)).await.unwrap();
    });
    url
}

fn request(prompt: &str) -> EnhancementRequest {
    EnhancementRequest {
        raw_prompt: prompt.into(),
        tones: vec!["cinematic".into(), "technical".into()],
        max_output_tokens: 120,
        suppress_filler: false,
    }
}

#[tokio::test]
async fn full_pipeline_streams_and_records() {
    let endpoint = spawn_relay(Arc::new(MockCompletionClient::new(vec![
        "Hel".into(),
        "lo, ".into(),
        "world".into(),
    ])))
    .await;
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.json");
    let mut app = App::new(
        EnhanceClient::new(endpoint),
        Box::new(JsonFileStore::new(&path)),
    );

    let mut seen = String::new();
    let entry = app
        .enhance_with(&request("draw a fantasy landscape"), |fragment| {
            seen.push_str(fragment);
        })
        .await
        .unwrap();

    assert_eq!(entry.enhanced_text, "Hello, world");
    assert_eq!(seen, "Hello, world");

    // The record survives the session: a fresh store re-reads it from disk.
    let reloaded = JsonFileStore::new(&path).load().unwrap();
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded[0].raw_prompt, "draw a fantasy landscape");
    assert_eq!(reloaded[0].enhanced_text, "Hello, world");
}

#[tokio::test]
async fn empty_prompt_is_still_submitted() {
    let endpoint =
        spawn_relay(Arc::new(MockCompletionClient::new(vec!["rewritten".into()]))).await;
    let dir = TempDir::new().unwrap();
    let mut app = App::new(
        EnhanceClient::new(endpoint),
        Box::new(JsonFileStore::new(dir.path().join("history.json"))),
    );

    let entry = app.enhance(&request("")).await.unwrap();
    assert_eq!(entry.raw_prompt, "");
    assert_eq!(entry.enhanced_text, "rewritten");
}

#[tokio::test]
async fn rejected_provider_surfaces_as_status_error() {
    let endpoint = spawn_relay(Arc::new(MockCompletionClient::rejecting(401))).await;
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("history.json");
    let mut app = App::new(
        EnhanceClient::new(endpoint),
        Box::new(JsonFileStore::new(&path)),
    );

    let result = app.enhance(&request("x")).await;
    assert!(matches!(result, Err(TransportError::Status(502))));
    assert!(app.history().is_empty());
    assert!(JsonFileStore::new(&path).load().unwrap().is_empty());
}

#[tokio::test]
async fn unreachable_endpoint_is_a_request_error() {
    let dir = TempDir::new().unwrap();
    let mut app = App::new(
        EnhanceClient::new("http://127.0.0.1:1/api/enhance"),
        Box::new(JsonFileStore::new(dir.path().join("history.json"))),
    );

    let result = app.enhance(&request("x")).await;
    assert!(matches!(result, Err(TransportError::Request(_))));
    assert!(app.history().is_empty());
}

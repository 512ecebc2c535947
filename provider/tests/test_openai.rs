use provider::{ChatRequest, CompletionClient, OpenAiClient, ProviderError};
use tokio_stream::StreamExt;

use mock_server::{spawn_sse_server, spawn_with_status};

fn chat_request() -> ChatRequest {
    ChatRequest {
        model: "gpt-3.5-turbo".into(),
        system: "You are an expert prompt-engineer.".into(),
        user: "draw a fantasy landscape".into(),
        max_tokens: 140,
    }
}

#[tokio::test]
async fn streams_deltas_in_arrival_order() {
    let (url, server) = spawn_sse_server(vec![
        "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"lo, \"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"world\"}}]}\n\ndata: [DONE]\n\n",
    ])
    .await;
    let client = OpenAiClient::new(url.as_str(), "test-key");
    let mut stream = client.stream_chat(chat_request()).await.unwrap();
    let mut deltas = Vec::new();
    while let Some(delta) = stream.next().await {
        deltas.push(delta.unwrap());
    }
    assert_eq!(deltas, vec!["Hel", "lo, ", "world"]);
    server.abort();
}

#[tokio::test]
async fn role_and_empty_deltas_are_not_forwarded() {
    let (url, server) = spawn_sse_server(vec![
        "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"\"}}]}\n\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"only\"}}]}\n\ndata: [DONE]\n\n",
    ])
    .await;
    let client = OpenAiClient::new(url.as_str(), "test-key");
    let mut stream = client.stream_chat(chat_request()).await.unwrap();
    let mut deltas = Vec::new();
    while let Some(delta) = stream.next().await {
        deltas.push(delta.unwrap());
    }
    assert_eq!(deltas, vec!["only"]);
    server.abort();
}

#[tokio::test]
async fn rejected_call_surfaces_the_status() {
    let (url, server) = spawn_with_status(vec!["quota exceeded"], 429).await;
    let client = OpenAiClient::new(url.as_str(), "test-key");
    let err = client.stream_chat(chat_request()).await.err().unwrap();
    match err {
        ProviderError::Status { code, detail } => {
            assert_eq!(code, 429);
            assert_eq!(detail, "quota exceeded");
        }
        other => panic!("unexpected error: {other}"),
    }
    server.abort();
}

#[tokio::test]
async fn unreachable_host_is_a_network_error() {
    let client = OpenAiClient::new("http://127.0.0.1:1", "test-key");
    let err = client.stream_chat(chat_request()).await.err().unwrap();
    assert!(matches!(err, ProviderError::Network(_)));
}

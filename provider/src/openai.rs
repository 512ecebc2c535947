//! HTTP client for an OpenAI-compatible chat-completions endpoint.
//!
//! [`OpenAiClient`] implements [`CompletionClient`] by issuing a single
//! streaming request and decoding the `data:` lines of the response with a
//! [`DeltaDecoder`]. Lines may be split across transport chunks, so the
//! decoder buffers until a full line is available.

use crate::traits::{ChatRequest, CompletionClient, ProviderError, TokenStream};
use async_trait::async_trait;
use futures_util::StreamExt;
use std::collections::VecDeque;

/// Client for a chat-completions endpoint speaking the OpenAI wire protocol.
pub struct OpenAiClient {
    base_url: String,
    api_key: String,
    http: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            http: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn stream_chat(&self, request: ChatRequest) -> Result<TokenStream, ProviderError> {
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = serde_json::json!({
            "model": request.model,
            "messages": [
                { "role": "system", "content": request.system },
                { "role": "user", "content": request.user },
            ],
            "max_tokens": request.max_tokens,
            "stream": true,
        });
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::Network(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                code: status.as_u16(),
                detail,
            });
        }

        log::debug!("provider stream opened for model {}", request.model);
        let source = Box::pin(response.bytes_stream());
        let state = (source, DeltaDecoder::new(), VecDeque::new());
        let deltas = futures_util::stream::unfold(
            state,
            |(mut source, mut decoder, mut queued)| async move {
                loop {
                    if let Some(delta) = queued.pop_front() {
                        return Some((Ok(delta), (source, decoder, queued)));
                    }
                    if decoder.finished() {
                        return None;
                    }
                    match source.next().await {
                        Some(Ok(bytes)) => queued.extend(decoder.push(&bytes)),
                        Some(Err(e)) => {
                            decoder.close();
                            return Some((
                                Err(ProviderError::Network(e.to_string())),
                                (source, decoder, queued),
                            ));
                        }
                        None => return None,
                    }
                }
            },
        );
        Ok(Box::pin(deltas))
    }
}

/// Incremental decoder for the provider's server-sent event framing.
///
/// Feed raw transport chunks with [`DeltaDecoder::push`]; complete `data:`
/// lines are parsed and their non-empty `delta.content` values returned in
/// order. `data: [DONE]` marks the end of the stream.
#[derive(Debug, Default)]
pub struct DeltaDecoder {
    buffer: String,
    done: bool,
}

impl DeltaDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once the terminator was seen or the decoder was closed.
    pub fn finished(&self) -> bool {
        self.done
    }

    /// Stop decoding; later pushes yield nothing.
    pub fn close(&mut self) {
        self.done = true;
    }

    /// Consume a transport chunk, returning the deltas completed by it.
    pub fn push(&mut self, bytes: &[u8]) -> Vec<String> {
        let mut deltas = Vec::new();
        if self.done {
            return deltas;
        }
        self.buffer.push_str(&String::from_utf8_lossy(bytes));
        while let Some(pos) = self.buffer.find('\n') {
            let line: String = self.buffer.drain(..=pos).collect();
            let line = line.trim();
            let Some(data) = line.strip_prefix("data:") else {
                continue;
            };
            let data = data.trim();
            if data == "[DONE]" {
                self.done = true;
                break;
            }
            if let Some(content) = delta_content(data) {
                if !content.is_empty() {
                    deltas.push(content);
                }
            }
        }
        deltas
    }
}

fn delta_content(data: &str) -> Option<String> {
    let event: serde_json::Value = serde_json::from_str(data).ok()?;
    event
        .get("choices")?
        .get(0)?
        .get("delta")?
        .get("content")?
        .as_str()
        .map(str::to_string)
}

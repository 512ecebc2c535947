use async_trait::async_trait;
use futures_core::Stream;
use std::pin::Pin;
use thiserror::Error;

/// Ordered sequence of text deltas, terminated by the stream ending.
pub type TokenStream = Pin<Box<dyn Stream<Item = Result<String, ProviderError>> + Send>>;

/// One streaming chat-completion call: a system instruction and a single
/// user turn.
#[derive(Clone, Debug, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub system: String,
    pub user: String,
    pub max_tokens: u32,
}

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("provider returned status {code}: {detail}")]
    Status { code: u16, detail: String },
    #[error("invalid response")]
    InvalidResponse,
}

/// Interface for opening a streaming completion call.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Open exactly one streaming request for `request`.
    ///
    /// The returned stream yields non-empty deltas in arrival order and ends
    /// when the provider signals completion. A rejected request fails here;
    /// a mid-flight failure surfaces as an `Err` item on the stream.
    async fn stream_chat(&self, request: ChatRequest) -> Result<TokenStream, ProviderError>;
}

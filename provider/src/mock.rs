//! In-process [`CompletionClient`] used by relay and consumer tests.

use crate::traits::{ChatRequest, CompletionClient, ProviderError, TokenStream};
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

/// Scripted provider: emits canned fragments, then optionally fails.
///
/// Records the last [`ChatRequest`] it received so tests can assert on the
/// compiled instruction and the requested token cap.
#[derive(Default)]
pub struct MockCompletionClient {
    fragments: Vec<String>,
    fail_mid_stream: bool,
    reject_status: Option<u16>,
    delay_between: Option<Duration>,
    last: Mutex<Option<ChatRequest>>,
}

impl MockCompletionClient {
    /// Emit `fragments` in order, then end the stream normally.
    pub fn new(fragments: Vec<String>) -> Self {
        Self {
            fragments,
            ..Self::default()
        }
    }

    /// Emit `fragments` in order, then fail mid-stream.
    pub fn failing_after(fragments: Vec<String>) -> Self {
        Self {
            fragments,
            fail_mid_stream: true,
            ..Self::default()
        }
    }

    /// Reject the call outright with `code` (no stream is opened).
    pub fn rejecting(code: u16) -> Self {
        Self {
            reject_status: Some(code),
            ..Self::default()
        }
    }

    /// Pause between fragments so each is forwarded as its own chunk.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay_between = Some(delay);
        self
    }

    /// The most recent request passed to [`CompletionClient::stream_chat`].
    pub fn last_request(&self) -> Option<ChatRequest> {
        self.last.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn stream_chat(&self, request: ChatRequest) -> Result<TokenStream, ProviderError> {
        *self.last.lock().unwrap() = Some(request);
        if let Some(code) = self.reject_status {
            return Err(ProviderError::Status {
                code,
                detail: "scripted rejection".into(),
            });
        }
        let mut items: Vec<Result<String, ProviderError>> =
            self.fragments.iter().cloned().map(Ok).collect();
        if self.fail_mid_stream {
            items.push(Err(ProviderError::Network(
                "connection reset by provider".into(),
            )));
        }
        let delay = self.delay_between;
        let stream = futures_util::stream::unfold(items.into_iter(), move |mut items| async move {
            let item = items.next()?;
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            Some((item, items))
        });
        Ok(Box::pin(stream))
    }
}

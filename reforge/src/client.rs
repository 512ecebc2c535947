//! Consumer side of the enhancement endpoint.
//!
//! [`EnhanceClient::open`] issues the request and hands back a
//! [`FragmentStream`]: one suspension point per chunk, text out, no
//! buffering of the whole response.

use futures_core::Stream;
use futures_util::StreamExt;
use instruct::EnhancementRequest;
use std::pin::Pin;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Request(String),
    #[error("server returned status {0}")]
    Status(u16),
    #[error("stream read failed: {0}")]
    Read(String),
}

/// HTTP client for the relay's enhancement endpoint.
pub struct EnhanceClient {
    endpoint: String,
    http: reqwest::Client,
}

impl EnhanceClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Submit `request` and return the response as a fragment stream.
    ///
    /// An empty prompt is submitted like any other; the server decides what
    /// to make of it.
    pub async fn open(&self, request: &EnhancementRequest) -> Result<FragmentStream, TransportError> {
        let response = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }
        let fragments = response.bytes_stream().map(|chunk| {
            chunk
                .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
                .map_err(|e| TransportError::Read(e.to_string()))
        });
        Ok(FragmentStream::new(fragments))
    }
}

/// Ordered fragments of the enhanced text, decoded as they arrive.
///
/// Fragments carry no boundary guarantees (one may split a word); their
/// concatenation in arrival order is the final text.
pub struct FragmentStream {
    inner: Pin<Box<dyn Stream<Item = Result<String, TransportError>> + Send>>,
}

impl FragmentStream {
    pub fn new(inner: impl Stream<Item = Result<String, TransportError>> + Send + 'static) -> Self {
        Self {
            inner: Box::pin(inner),
        }
    }

    /// Await the next fragment; `Ok(None)` signals natural completion.
    pub async fn next_fragment(&mut self) -> Result<Option<String>, TransportError> {
        match self.inner.next().await {
            Some(Ok(fragment)) => Ok(Some(fragment)),
            Some(Err(e)) => Err(e),
            None => Ok(None),
        }
    }
}

//! Environment-driven construction of provider clients.

use crate::openai::OpenAiClient;
use crate::traits::ProviderError;

/// Model requested when `OPENAI_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

/// Create an [`OpenAiClient`] from `OPENAI_API_KEY` and `OPENAI_BASE_URL`.
///
/// A missing or empty key is a configuration error; the caller surfaces it
/// as a failed response rather than opening a doomed stream.
pub fn client_from_env() -> Result<OpenAiClient, ProviderError> {
    let api_key = std::env::var("OPENAI_API_KEY")
        .ok()
        .filter(|key| !key.is_empty())
        .ok_or_else(|| ProviderError::Configuration("OPENAI_API_KEY is not set".into()))?;
    let base_url =
        std::env::var("OPENAI_BASE_URL").unwrap_or_else(|_| "https://api.openai.com".into());
    Ok(OpenAiClient::new(base_url, api_key))
}

/// Read the chat model name from the `OPENAI_MODEL` environment variable.
pub fn model_from_env() -> String {
    std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.into())
}

//! Abstractions for streaming chat completions from a language-model provider.
//!
//! The crate defines a [`CompletionClient`] trait along with the concrete
//! [`OpenAiClient`] implementation, which decodes the provider's server-sent
//! event stream into an ordered sequence of text deltas. A
//! [`MockCompletionClient`] is provided for tests.

pub mod mock;
pub mod openai;
pub mod runner;
pub mod traits;

pub use mock::MockCompletionClient;
pub use openai::{DeltaDecoder, OpenAiClient};
pub use runner::{client_from_env, model_from_env, DEFAULT_MODEL};
pub use traits::{ChatRequest, CompletionClient, ProviderError, TokenStream};

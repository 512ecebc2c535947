//! HTTP relay between the composer and the model provider.
//!
//! One route, `POST /api/enhance`: compile the submission into a system
//! instruction, open the provider stream, and forward each delta to the
//! caller as a chunk of a plain-text body. Closing the body is the
//! completion signal; no sentinel is written. Each request is independent;
//! the only shared state is the provider handle.
//!
//! Authentication is an upstream concern; callers reach this router only
//! after the outer layer has admitted them.

use axum::body::Body;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use futures_util::StreamExt;
use instruct::EnhancementRequest;
use provider::{ChatRequest, CompletionClient};
use std::sync::Arc;
use tracing::{debug, error};

/// State shared across enhancement requests.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<dyn CompletionClient>,
    pub model: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/enhance", post(enhance))
        .with_state(state)
}

/// Compile the instruction, open the provider stream, and relay it.
///
/// The provider call requests a small margin above the nominal cap so the
/// visible truncation point is governed by the instruction itself. A
/// mid-flight provider failure aborts the body; the caller must resubmit.
async fn enhance(
    State(state): State<AppState>,
    Json(request): Json<EnhancementRequest>,
) -> Response {
    let instruction = request.system_instruction();
    debug!(%instruction, "compiled system instruction");

    let chat = ChatRequest {
        model: state.model.clone(),
        system: instruction,
        user: request.raw_prompt.clone(),
        max_tokens: request.provider_token_limit(),
    };
    match state.client.stream_chat(chat).await {
        Ok(stream) => {
            let body = Body::from_stream(stream.map(|delta| {
                delta.map_err(|e| {
                    error!("provider stream failed mid-flight: {e}");
                    std::io::Error::other(e.to_string())
                })
            }));
            (
                [
                    (header::CONTENT_TYPE, "text/plain; charset=utf-8"),
                    (header::CACHE_CONTROL, "no-cache"),
                ],
                body,
            )
                .into_response()
        }
        Err(e) => {
            error!("provider call could not be established: {e}");
            (StatusCode::BAD_GATEWAY, e.to_string()).into_response()
        }
    }
}

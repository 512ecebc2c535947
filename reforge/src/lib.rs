//! Application wiring for the prompt-enhancement pipeline.
//!
//! [`client`] drives the relay endpoint and exposes the response as a
//! [`client::FragmentStream`]; [`app`] owns the live enhanced text and the
//! history list and records completed runs.

pub mod app;
pub mod client;
pub mod logging;

pub use app::App;
pub use client::{EnhanceClient, FragmentStream, TransportError};
pub use logging::init_logging;

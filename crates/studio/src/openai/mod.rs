//! `OpenAI` API integration for design generation.
//!
//! Two capabilities are used: chat completions (the designer persona) and
//! image generation (concept renders). Both are plain REST calls; failures
//! surface as [`OpenAiError`] and the designer service decides how to
//! degrade.

mod client;
mod error;
mod types;

pub use client::OpenAiClient;
pub use error::{ApiErrorResponse, OpenAiError};
pub use types::{ChatCompletionRequest, ChatCompletionResponse, ChatTurn, ImageRequest, ImageResponse};

//! `OpenAI` API client for chat completions and image generation.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::instrument;

use crate::config::OpenAiConfig;

use super::error::{ApiErrorResponse, OpenAiError};
use super::types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatTurn, ImageRequest, ImageResponse,
};

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const IMAGE_GENERATIONS_URL: &str = "https://api.openai.com/v1/images/generations";
const CHAT_MAX_TOKENS: u32 = 1000;
const IMAGE_SIZE: &str = "1024x1024";

/// `OpenAI` API client.
///
/// Provides chat completions for the designer conversation and image
/// generation for concept renders.
#[derive(Clone)]
pub struct OpenAiClient {
    inner: Arc<OpenAiClientInner>,
}

struct OpenAiClientInner {
    client: reqwest::Client,
    chat_model: String,
    image_model: String,
}

impl OpenAiClient {
    /// Create a new `OpenAI` client.
    ///
    /// # Arguments
    ///
    /// * `config` - `OpenAI` configuration containing API key and model IDs
    ///
    /// # Panics
    ///
    /// Panics if the API key contains invalid header characters.
    #[must_use]
    pub fn new(config: &OpenAiConfig) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.api_key.expose_secret()))
                .expect("Invalid API key for header"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            inner: Arc::new(OpenAiClientInner {
                client,
                chat_model: config.chat_model.clone(),
                image_model: config.image_model.clone(),
            }),
        }
    }

    /// Send the conversation to the chat completions API and return the
    /// assistant's reply text.
    ///
    /// # Arguments
    ///
    /// * `turns` - Conversation turns, system instruction first
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API returns an error
    /// response, or the response carries no text.
    #[instrument(skip(self, turns), fields(model = %self.inner.chat_model, turns = turns.len()))]
    pub async fn complete_chat(&self, turns: Vec<ChatTurn>) -> Result<String, OpenAiError> {
        let request = ChatCompletionRequest {
            model: self.inner.chat_model.clone(),
            messages: turns,
            max_tokens: CHAT_MAX_TOKENS,
        };

        let response = self
            .inner
            .client
            .post(CHAT_COMPLETIONS_URL)
            .json(&request)
            .send()
            .await?;

        let completion: ChatCompletionResponse = self.handle_response(response).await?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| OpenAiError::EmptyResponse("no completion text".to_string()))
    }

    /// Generate a concept image and return its transient URL.
    ///
    /// The URL expires; callers must copy the bytes to durable storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the API returns an error
    /// response, or the response carries no image URL.
    #[instrument(skip(self, prompt), fields(model = %self.inner.image_model))]
    pub async fn generate_image(&self, prompt: &str) -> Result<String, OpenAiError> {
        let request = ImageRequest {
            model: self.inner.image_model.clone(),
            prompt: prompt.to_string(),
            n: 1,
            size: IMAGE_SIZE.to_string(),
        };

        let response = self
            .inner
            .client
            .post(IMAGE_GENERATIONS_URL)
            .json(&request)
            .send()
            .await?;

        let images: ImageResponse = self.handle_response(response).await?;

        images
            .data
            .into_iter()
            .next()
            .and_then(|image| image.url)
            .ok_or_else(|| OpenAiError::EmptyResponse("no image URL".to_string()))
    }

    /// Handle a successful response.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, OpenAiError> {
        let status = response.status();

        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body)
                .map_err(|e| OpenAiError::Parse(format!("Failed to parse response: {e}")))
        } else {
            Err(Self::handle_error_status(status, response).await)
        }
    }

    /// Handle an error status code.
    async fn handle_error_status(
        status: reqwest::StatusCode,
        response: reqwest::Response,
    ) -> OpenAiError {
        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok())
                .unwrap_or(60);
            return OpenAiError::RateLimited(retry_after);
        }

        // Check for unauthorized
        if status == reqwest::StatusCode::UNAUTHORIZED {
            return OpenAiError::Unauthorized("Invalid API key".to_string());
        }

        // Try to parse API error response
        match response.text().await {
            Ok(body) => {
                if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&body) {
                    OpenAiError::Api {
                        error_type: api_error.error.error_type,
                        message: api_error.error.message,
                    }
                } else {
                    OpenAiError::Api {
                        error_type: "unknown".to_string(),
                        message: body,
                    }
                }
            }
            Err(e) => OpenAiError::Http(e),
        }
    }
}

//! Reqwest implementation of the design studio transport.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use aurelia_core::DesignSessionId;

use crate::api::{
    ApiError, DesignBrief, DesignSession, DesignerApi, SessionDetail, TurnReply,
};

/// HTTP client for the design studio API.
///
/// Carries the customer's bearer token; one instance per signed-in customer.
#[derive(Clone)]
pub struct HttpDesignerApi {
    client: reqwest::Client,
    base_url: String,
}

impl std::fmt::Debug for HttpDesignerApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpDesignerApi")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

/// Error envelope returned by the studio API.
#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Serialize)]
struct SendMessageBody<'a> {
    session_id: DesignSessionId,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reference_image_url: Option<&'a str>,
    is_initial: bool,
}

#[derive(Debug, Serialize)]
struct FavoriteToggleBody {
    session_id: DesignSessionId,
}

#[derive(Debug, serde::Deserialize)]
struct FavoriteToggleReply {
    is_favorite: bool,
}

impl HttpDesignerApi {
    /// Create a new API client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Studio base URL (no trailing slash required)
    /// * `token` - The customer's bearer token
    ///
    /// # Panics
    ///
    /// Panics if the token contains invalid header characters.
    #[must_use]
    pub fn new(base_url: &str, token: &SecretString) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .expect("Invalid token for header"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Decode a response, mapping error envelopes to [`ApiError::Api`].
    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map_or(body, |envelope| envelope.error);
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))
    }
}

#[async_trait]
impl DesignerApi for HttpDesignerApi {
    async fn list_sessions(&self) -> Result<Vec<DesignSession>, ApiError> {
        let response = self
            .client
            .get(self.url("/api/design/sessions"))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn start_session(&self, brief: &DesignBrief) -> Result<DesignSession, ApiError> {
        let response = self
            .client
            .post(self.url("/api/design/start-session"))
            .json(brief)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn get_session(&self, id: DesignSessionId) -> Result<SessionDetail, ApiError> {
        let response = self
            .client
            .get(self.url(&format!("/api/design/session/{id}")))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn send_message(
        &self,
        session_id: DesignSessionId,
        message: &str,
        reference_image_url: Option<&str>,
        is_initial: bool,
    ) -> Result<TurnReply, ApiError> {
        let response = self
            .client
            .post(self.url("/api/design/send-message"))
            .json(&SendMessageBody {
                session_id,
                message,
                reference_image_url,
                is_initial,
            })
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn toggle_favorite(&self, id: DesignSessionId) -> Result<bool, ApiError> {
        let response = self
            .client
            .post(self.url("/api/design/favorite-toggle"))
            .json(&FavoriteToggleBody { session_id: id })
            .send()
            .await?;
        let reply: FavoriteToggleReply = Self::decode(response).await?;
        Ok(reply.is_favorite)
    }

    async fn delete_session(&self, id: DesignSessionId) -> Result<(), ApiError> {
        let response = self
            .client
            .delete(self.url(&format!("/api/design/session/{id}")))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map_or(body, |envelope| envelope.error);
            return Err(ApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

//! Object storage client for generated design images.
//!
//! Generated images come back from the image backend on transient URLs, so
//! each one is fetched and re-uploaded under a stable path keyed by customer
//! and session. The public URL of the uploaded object is what gets persisted
//! with the assistant message.

use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::instrument;

use crate::config::StorageConfig;

/// Errors that can occur when talking to object storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Storage service rejected the request.
    #[error("storage error ({status}): {message}")]
    Service {
        /// HTTP status returned by the storage service.
        status: u16,
        /// Response body.
        message: String,
    },
}

/// Object storage client.
#[derive(Clone)]
pub struct StorageClient {
    /// HTTP client.
    client: Client,
    /// Storage service base URL.
    base_url: String,
    /// Bucket holding generated design images.
    bucket: String,
    /// Service-role key.
    service_key: SecretString,
}

impl std::fmt::Debug for StorageClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageClient")
            .field("base_url", &self.base_url)
            .field("bucket", &self.bucket)
            .field("service_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl StorageClient {
    /// Create a new storage client.
    #[must_use]
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            bucket: config.bucket.clone(),
            service_key: config.service_key.clone(),
        }
    }

    /// Fetch the bytes behind a transient image URL.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the URL does not resolve.
    #[instrument(skip(self, url))]
    pub async fn fetch_transient(&self, url: &str) -> Result<Vec<u8>, StorageError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StorageError::Service {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }

    /// Upload a PNG under the given object path and return its public URL.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the storage service rejects the
    /// upload.
    #[instrument(skip(self, bytes), fields(path = %path, bytes = bytes.len()))]
    pub async fn upload_png(&self, path: &str, bytes: Vec<u8>) -> Result<String, StorageError> {
        let upload_url = format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, path);

        let response = self
            .client
            .post(&upload_url)
            .header(
                AUTHORIZATION,
                format!("Bearer {}", self.service_key.expose_secret()),
            )
            .header(CONTENT_TYPE, "image/png")
            .header(CACHE_CONTROL, "max-age=3600")
            .body(bytes)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(StorageError::Service {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        Ok(self.public_url(path))
    }

    /// Durable public URL of an object in the bucket.
    #[must_use]
    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, path
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> StorageClient {
        StorageClient::new(&StorageConfig {
            base_url: "https://storage.example.com/".to_string(),
            bucket: "ai-generated-designs".to_string(),
            service_key: SecretString::from("service-key"),
        })
    }

    #[test]
    fn test_public_url_shape() {
        let url = client().public_url("user/session/image.png");
        assert_eq!(
            url,
            "https://storage.example.com/storage/v1/object/public/ai-generated-designs/user/session/image.png"
        );
    }

    #[test]
    fn test_debug_redacts_service_key() {
        let debug_output = format!("{:?}", client());
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("service-key"));
    }
}

//! Wire types and the transport trait for the design studio API.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use aurelia_core::{
    DesignSessionId, DesignStyle, DiamondOption, JewelryCategory, MessageSender, MetalType,
    SessionStatus,
};

/// Errors that can occur when talking to the studio API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with an error envelope.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message from the envelope.
        message: String,
    },

    /// Failed to parse a response body.
    #[error("parse error: {0}")]
    Parse(String),
}

/// A design session as the API reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignSession {
    pub id: DesignSessionId,
    pub category: JewelryCategory,
    pub metal_type: MetalType,
    pub style: DesignStyle,
    pub diamond_type: DiamondOption,
    pub description: String,
    pub reference_image_url: Option<String>,
    pub title: String,
    pub status: SessionStatus,
    pub is_favorite: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub last_message_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// A conversation message as the API reports it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMessage {
    pub id: Uuid,
    pub sender: MessageSender,
    pub body: String,
    pub image_url: Option<String>,
    pub seq: i32,
    pub created_at: DateTime<Utc>,
}

/// A session with its conversation history.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionDetail {
    pub session: DesignSession,
    pub messages: Vec<ConversationMessage>,
}

/// A design brief for starting a session.
#[derive(Debug, Clone, Serialize)]
pub struct DesignBrief {
    pub category: JewelryCategory,
    pub metal_type: MetalType,
    pub style: DesignStyle,
    pub diamond_type: DiamondOption,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_image_url: Option<String>,
}

/// The assistant's side of a completed turn.
#[derive(Debug, Clone, Deserialize)]
pub struct TurnReply {
    pub message: String,
    pub image_url: Option<String>,
}

/// Transport boundary for the design studio API.
///
/// [`SessionStore`](crate::store::SessionStore) is generic over this trait so
/// its transitions can be exercised without a network.
#[async_trait]
pub trait DesignerApi: Send + Sync {
    /// List the customer's sessions, most recent activity first.
    async fn list_sessions(&self) -> Result<Vec<DesignSession>, ApiError>;

    /// Create a session from a design brief.
    async fn start_session(&self, brief: &DesignBrief) -> Result<DesignSession, ApiError>;

    /// Fetch a session with its conversation history.
    async fn get_session(&self, id: DesignSessionId) -> Result<SessionDetail, ApiError>;

    /// Execute one conversation turn.
    async fn send_message(
        &self,
        session_id: DesignSessionId,
        message: &str,
        reference_image_url: Option<&str>,
        is_initial: bool,
    ) -> Result<TurnReply, ApiError>;

    /// Toggle a session's favorite flag, returning the new state.
    async fn toggle_favorite(&self, id: DesignSessionId) -> Result<bool, ApiError>;

    /// Delete a session and its conversation.
    async fn delete_session(&self, id: DesignSessionId) -> Result<(), ApiError>;
}

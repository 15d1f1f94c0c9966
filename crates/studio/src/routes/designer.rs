//! Design API route handlers.
//!
//! All routes require bearer authentication; every operation is scoped to
//! the authenticated customer.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use aurelia_core::{
    DesignSessionId, DesignStyle, DiamondOption, JewelryCategory, MetalType, SessionStatus,
};

use crate::error::{AppError, FieldError};
use crate::middleware::RequireUser;
use crate::models::{DesignMessage, DesignSession};
use crate::routes::ApiJson;
use crate::services::{DesignBrief, DesignerService, SendTurn};
use crate::state::AppState;

const MIN_DESCRIPTION_CHARS: usize = 10;
const MAX_DESCRIPTION_CHARS: usize = 500;

/// Build the design API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/design/sessions", get(list_sessions))
        .route("/api/design/start-session", post(start_session))
        .route("/api/design/send-message", post(send_message))
        .route(
            "/api/design/session/{id}",
            get(get_session).delete(delete_session),
        )
        .route("/api/design/favorite-toggle", post(favorite_toggle))
}

// =============================================================================
// Request/Response Types
// =============================================================================

/// Request to start a design session.
#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    pub category: JewelryCategory,
    pub metal_type: MetalType,
    pub style: DesignStyle,
    pub diamond_type: DiamondOption,
    pub description: String,
    pub reference_image_url: Option<String>,
    /// Request favorite status immediately; subject to the per-customer cap.
    #[serde(default)]
    pub is_favorite: bool,
}

impl StartSessionRequest {
    fn validate(&self) -> Result<(), AppError> {
        let mut errors = Vec::new();

        let chars = self.description.chars().count();
        if chars < MIN_DESCRIPTION_CHARS {
            errors.push(FieldError::new(
                "description",
                format!("must be at least {MIN_DESCRIPTION_CHARS} characters"),
            ));
        } else if chars > MAX_DESCRIPTION_CHARS {
            errors.push(FieldError::new(
                "description",
                format!("must be at most {MAX_DESCRIPTION_CHARS} characters"),
            ));
        }

        if let Some(url) = &self.reference_image_url {
            if url::Url::parse(url).is_err() {
                errors.push(FieldError::new("reference_image_url", "must be a valid URL"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

/// Response for a design session.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub id: Uuid,
    pub category: JewelryCategory,
    pub metal_type: MetalType,
    pub style: DesignStyle,
    pub diamond_type: DiamondOption,
    pub description: String,
    pub reference_image_url: Option<String>,
    pub title: String,
    pub status: SessionStatus,
    pub is_favorite: bool,
    pub expires_at: Option<String>,
    pub last_message_at: String,
    pub created_at: String,
}

impl From<DesignSession> for SessionResponse {
    fn from(session: DesignSession) -> Self {
        Self {
            id: session.id.as_uuid(),
            category: session.category,
            metal_type: session.metal_type,
            style: session.style,
            diamond_type: session.diamond_type,
            description: session.description,
            reference_image_url: session.reference_image_url,
            title: session.title,
            status: session.status,
            is_favorite: session.is_favorite,
            expires_at: session.expires_at.map(|at| at.to_rfc3339()),
            last_message_at: session.last_message_at.to_rfc3339(),
            created_at: session.created_at.to_rfc3339(),
        }
    }
}

/// Response for a conversation message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub id: Uuid,
    pub sender: String,
    pub body: String,
    pub image_url: Option<String>,
    pub seq: i32,
    pub created_at: String,
}

impl From<DesignMessage> for MessageResponse {
    fn from(msg: DesignMessage) -> Self {
        Self {
            id: msg.id.as_uuid(),
            sender: msg.sender.as_str().to_string(),
            body: msg.body,
            image_url: msg.image_url,
            seq: msg.seq,
            created_at: msg.created_at.to_rfc3339(),
        }
    }
}

/// Response for a session with its conversation history.
#[derive(Debug, Serialize)]
pub struct SessionWithMessagesResponse {
    pub session: SessionResponse,
    pub messages: Vec<MessageResponse>,
}

/// Request to send a message.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub session_id: Uuid,
    pub message: String,
    pub reference_image_url: Option<String>,
    /// True for the automatic first turn right after session creation.
    #[serde(default)]
    pub is_initial: bool,
}

impl SendMessageRequest {
    fn validate(&self) -> Result<(), AppError> {
        let mut errors = Vec::new();

        if self.message.is_empty() {
            errors.push(FieldError::new("message", "must not be empty"));
        }

        if let Some(url) = &self.reference_image_url {
            if url::Url::parse(url).is_err() {
                errors.push(FieldError::new("reference_image_url", "must be a valid URL"));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(errors))
        }
    }
}

/// Response for a completed conversation turn.
#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub message: String,
    pub image_url: Option<String>,
}

/// Request to toggle favorite status.
#[derive(Debug, Deserialize)]
pub struct FavoriteToggleRequest {
    pub session_id: Uuid,
}

/// Response for a favorite toggle.
#[derive(Debug, Serialize)]
pub struct FavoriteToggleResponse {
    pub is_favorite: bool,
}

/// Response for a session deletion.
#[derive(Debug, Serialize)]
pub struct DeleteSessionResponse {
    pub message: String,
}

// =============================================================================
// Route Handlers
// =============================================================================

/// List the customer's design sessions, most recent activity first.
///
/// GET /api/design/sessions
async fn list_sessions(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
) -> Result<Json<Vec<SessionResponse>>, AppError> {
    let service = DesignerService::new(state.pool(), state.openai(), state.storage());

    let sessions = service.list_sessions(user.id).await?;

    Ok(Json(sessions.into_iter().map(Into::into).collect()))
}

/// Create a design session from a brief.
///
/// POST /api/design/start-session
async fn start_session(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    ApiJson(request): ApiJson<StartSessionRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    request.validate()?;

    let service = DesignerService::new(state.pool(), state.openai(), state.storage());

    let session = service
        .start_session(
            user.id,
            DesignBrief {
                category: request.category,
                metal_type: request.metal_type,
                style: request.style,
                diamond_type: request.diamond_type,
                description: request.description,
                reference_image_url: request.reference_image_url,
                is_favorite: request.is_favorite,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(session.into())))
}

/// Execute one conversation turn.
///
/// POST /api/design/send-message
///
/// Always answers 200 once the user message is persisted: generation-backend
/// failures degrade to a fallback reply and/or a missing image.
async fn send_message(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    ApiJson(request): ApiJson<SendMessageRequest>,
) -> Result<Json<SendMessageResponse>, AppError> {
    request.validate()?;

    let service = DesignerService::new(state.pool(), state.openai(), state.storage());

    let reply = service
        .send_message(SendTurn {
            session_id: DesignSessionId::new(request.session_id),
            user_id: user.id,
            message: request.message,
            reference_image_url: request.reference_image_url,
            is_initial: request.is_initial,
        })
        .await?;

    Ok(Json(SendMessageResponse {
        message: reply.message,
        image_url: reply.image_url,
    }))
}

/// Get a session with its conversation history.
///
/// GET /api/design/session/{id}
async fn get_session(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionWithMessagesResponse>, AppError> {
    let service = DesignerService::new(state.pool(), state.openai(), state.storage());

    let (session, messages) = service
        .get_session(DesignSessionId::new(id), user.id)
        .await?;

    Ok(Json(SessionWithMessagesResponse {
        session: session.into(),
        messages: messages.into_iter().map(Into::into).collect(),
    }))
}

/// Delete a session and its conversation.
///
/// DELETE /api/design/session/{id}
async fn delete_session(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteSessionResponse>, AppError> {
    let service = DesignerService::new(state.pool(), state.openai(), state.storage());

    service
        .delete_session(DesignSessionId::new(id), user.id)
        .await?;

    Ok(Json(DeleteSessionResponse {
        message: "Session deleted successfully".to_string(),
    }))
}

/// Toggle a session's favorite status.
///
/// POST /api/design/favorite-toggle
async fn favorite_toggle(
    State(state): State<AppState>,
    RequireUser(user): RequireUser,
    ApiJson(request): ApiJson<FavoriteToggleRequest>,
) -> Result<Json<FavoriteToggleResponse>, AppError> {
    let service = DesignerService::new(state.pool(), state.openai(), state.storage());

    let is_favorite = service
        .toggle_favorite(DesignSessionId::new(request.session_id), user.id)
        .await?;

    Ok(Json(FavoriteToggleResponse { is_favorite }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start_request(description: &str, reference_image_url: Option<&str>) -> StartSessionRequest {
        StartSessionRequest {
            category: JewelryCategory::Ring,
            metal_type: MetalType::Gold,
            style: DesignStyle::Modern,
            diamond_type: DiamondOption::None,
            description: description.to_string(),
            reference_image_url: reference_image_url.map(String::from),
            is_favorite: false,
        }
    }

    #[test]
    fn test_start_session_description_too_short() {
        let result = start_request("too short", None).validate();
        assert!(result.is_err());
    }

    #[test]
    fn test_start_session_description_bounds() {
        assert!(start_request(&"x".repeat(10), None).validate().is_ok());
        assert!(start_request(&"x".repeat(500), None).validate().is_ok());
        assert!(start_request(&"x".repeat(501), None).validate().is_err());
    }

    #[test]
    fn test_start_session_bad_reference_url() {
        let result = start_request(&"x".repeat(20), Some("not a url")).validate();
        assert!(result.is_err());
    }

    #[test]
    fn test_start_session_request_parses_wire_format() {
        let request: StartSessionRequest = serde_json::from_str(
            r#"{
                "category": "ring",
                "metal_type": "rose-gold",
                "style": "vintage",
                "diamond_type": "small",
                "description": "An heirloom-style ring with milgrain detail"
            }"#,
        )
        .expect("deserialize");

        assert_eq!(request.metal_type, MetalType::RoseGold);
        assert!(!request.is_favorite);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_send_message_empty_body_rejected() {
        let request = SendMessageRequest {
            session_id: Uuid::new_v4(),
            message: String::new(),
            reference_image_url: None,
            is_initial: false,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_send_message_ignores_unknown_fields() {
        // Older clients send form_data with the initial turn; it is derived
        // from the session row server-side and ignored on the wire.
        let request: SendMessageRequest = serde_json::from_str(
            r#"{
                "session_id": "7c0ffd4a-3f88-4f5a-9a5e-1f2b3c4d5e6f",
                "message": "Let's begin",
                "is_initial": true,
                "form_data": { "category": "ring" }
            }"#,
        )
        .expect("deserialize");

        assert!(request.is_initial);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_session_response_serializes_expires_at_null_for_favorites() {
        use chrono::Utc;

        let session = crate::models::DesignSession {
            id: DesignSessionId::generate(),
            user_id: aurelia_core::UserId::generate(),
            category: JewelryCategory::Ring,
            metal_type: MetalType::Gold,
            style: DesignStyle::Modern,
            diamond_type: DiamondOption::None,
            description: "A simple modern gold band".to_string(),
            reference_image_url: None,
            title: "ring in gold (modern)".to_string(),
            status: SessionStatus::Active,
            is_favorite: true,
            expires_at: None,
            last_message_at: Utc::now(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(SessionResponse::from(session)).expect("serialize");
        assert_eq!(json["is_favorite"], true);
        assert!(json["expires_at"].is_null());
    }
}

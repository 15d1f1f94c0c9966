//! Wire-format compatibility between the studio API and the client crate.
//!
//! The client crate defines its own view of the HTTP surface; these tests
//! pin the two sides together so a studio response change that would break
//! frontends fails here first.

use axum::response::IntoResponse;
use chrono::Utc;

use aurelia_core::{
    DesignMessageId, DesignSessionId, DesignStyle, DiamondOption, JewelryCategory, MessageSender,
    MetalType, SessionStatus, UserId,
};
use aurelia_studio::error::{AppError, FieldError};
use aurelia_studio::models::{DesignMessage, DesignSession};
use aurelia_studio::routes::designer::{MessageResponse, SessionResponse, StartSessionRequest};
use aurelia_studio::services::DesignerError;

fn studio_session() -> DesignSession {
    DesignSession {
        id: DesignSessionId::generate(),
        user_id: UserId::generate(),
        category: JewelryCategory::Necklace,
        metal_type: MetalType::RoseGold,
        style: DesignStyle::Vintage,
        diamond_type: DiamondOption::Small,
        description: "A vintage rose-gold pendant necklace".to_string(),
        reference_image_url: Some("https://cdn.example.com/ref.png".to_string()),
        title: "necklace in rose-gold (vintage)".to_string(),
        status: SessionStatus::Active,
        is_favorite: false,
        expires_at: Some(Utc::now()),
        last_message_at: Utc::now(),
        created_at: Utc::now(),
    }
}

#[test]
fn test_session_response_parses_as_client_session() {
    let model = studio_session();
    let expected_id = model.id;

    let response = SessionResponse::from(model);
    let json = serde_json::to_value(&response).expect("serialize studio response");

    let parsed: aurelia_client::DesignSession =
        serde_json::from_value(json).expect("client parses studio session");

    assert_eq!(parsed.id, expected_id);
    assert_eq!(parsed.metal_type, MetalType::RoseGold);
    assert_eq!(parsed.status, SessionStatus::Active);
    assert!(parsed.expires_at.is_some());
}

#[test]
fn test_message_response_parses_as_client_message() {
    let message = DesignMessage {
        id: DesignMessageId::generate(),
        session_id: DesignSessionId::generate(),
        sender: MessageSender::Assistant,
        body: "A cascade setting would suit this".to_string(),
        image_url: Some("https://cdn.example.com/design.png".to_string()),
        seq: 4,
        created_at: Utc::now(),
    };

    let response = MessageResponse::from(message);
    let json = serde_json::to_value(&response).expect("serialize studio response");

    let parsed: aurelia_client::ConversationMessage =
        serde_json::from_value(json).expect("client parses studio message");

    assert_eq!(parsed.sender, MessageSender::Assistant);
    assert_eq!(parsed.seq, 4);
}

#[test]
fn test_client_brief_parses_as_studio_request() {
    let brief = aurelia_client::DesignBrief {
        category: JewelryCategory::Earrings,
        metal_type: MetalType::Silver,
        style: DesignStyle::Minimalist,
        diamond_type: DiamondOption::None,
        description: "Small geometric silver studs".to_string(),
        reference_image_url: None,
    };

    let json = serde_json::to_value(&brief).expect("serialize client brief");
    let request: StartSessionRequest =
        serde_json::from_value(json).expect("studio parses client brief");

    assert_eq!(request.category, JewelryCategory::Earrings);
    assert!(!request.is_favorite);
}

#[tokio::test]
async fn test_validation_error_envelope_shape() {
    let error = AppError::Validation(vec![FieldError::new(
        "description",
        "must be at least 10 characters",
    )]);

    let response = error.into_response();
    assert_eq!(response.status(), 400);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");

    assert_eq!(body["error"], "Validation failed");
    assert_eq!(body["details"][0]["field"], "description");
}

#[tokio::test]
async fn test_limit_exceeded_envelope_carries_cap_message() {
    let error: AppError = DesignerError::FavoriteLimitExceeded.into();

    let response = error.into_response();
    assert_eq!(response.status(), 400);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");

    assert_eq!(body["error"], "You can only have up to 5 favorite sessions");
    assert!(body.get("details").is_none());
}

#[tokio::test]
async fn test_internal_errors_never_leak_detail() {
    let error = AppError::Internal("connection pool exhausted at 10.0.0.3".to_string());

    let response = error.into_response();
    assert_eq!(response.status(), 500);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");

    assert_eq!(body["error"], "Internal server error");
}

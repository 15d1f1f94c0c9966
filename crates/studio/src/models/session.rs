//! Design session and conversation message models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use aurelia_core::{
    DesignMessageId, DesignSessionId, DesignStyle, DiamondOption, JewelryCategory, MessageSender,
    MetalType, SessionStatus, UserId,
};

/// An AI design session owned by a single customer.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DesignSession {
    /// Unique session ID.
    pub id: DesignSessionId,
    /// Customer who owns this session. Every query is scoped by this.
    pub user_id: UserId,
    /// Jewelry category being designed.
    pub category: JewelryCategory,
    /// Metal the piece is made of.
    pub metal_type: MetalType,
    /// Aesthetic direction.
    pub style: DesignStyle,
    /// Diamond configuration.
    pub diamond_type: DiamondOption,
    /// Free-text design brief (validated 10-500 chars at the boundary).
    pub description: String,
    /// Optional customer-supplied reference image.
    pub reference_image_url: Option<String>,
    /// Derived display title, e.g. "ring in gold (modern)".
    pub title: String,
    /// Session status.
    pub status: SessionStatus,
    /// Favorited sessions are exempt from expiration (capped per user).
    pub is_favorite: bool,
    /// Expiration timestamp. `None` exactly when `is_favorite` is true.
    pub expires_at: Option<DateTime<Utc>>,
    /// When the conversation last advanced.
    pub last_message_at: DateTime<Utc>,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
}

/// A single message in a design conversation.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct DesignMessage {
    /// Unique message ID.
    pub id: DesignMessageId,
    /// Session this message belongs to.
    pub session_id: DesignSessionId,
    /// Who sent the message.
    pub sender: MessageSender,
    /// Message text. May be empty for a degraded assistant reply.
    pub body: String,
    /// Reference image (user) or generated design image (assistant).
    pub image_url: Option<String>,
    /// Per-session monotonic sequence number; replay order.
    pub seq: i32,
    /// When the message was created.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_session() -> DesignSession {
        DesignSession {
            id: DesignSessionId::generate(),
            user_id: UserId::generate(),
            category: JewelryCategory::Ring,
            metal_type: MetalType::Gold,
            style: DesignStyle::Modern,
            diamond_type: DiamondOption::None,
            description: "A simple modern gold band".to_string(),
            reference_image_url: None,
            title: "ring in gold (modern)".to_string(),
            status: SessionStatus::Active,
            is_favorite: false,
            expires_at: Some(Utc::now()),
            last_message_at: Utc::now(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_session_serialization_uses_kebab_case_attributes() {
        let session = sample_session();
        let json = serde_json::to_value(&session).expect("serialize");
        assert_eq!(json["category"], "ring");
        assert_eq!(json["metal_type"], "gold");
        assert_eq!(json["is_favorite"], false);
    }

    #[test]
    fn test_message_serialization() {
        let message = DesignMessage {
            id: DesignMessageId::generate(),
            session_id: DesignSessionId::generate(),
            sender: MessageSender::Assistant,
            body: String::new(),
            image_url: Some("https://cdn.example.com/design.png".to_string()),
            seq: 2,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&message).expect("serialize");
        assert_eq!(json["sender"], "assistant");
        assert_eq!(json["seq"], 2);
        assert_eq!(json["body"], "");
    }
}

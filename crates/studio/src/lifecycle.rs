//! Session lifecycle policy.
//!
//! Pure decision logic for expiration and favorite eligibility. Nothing here
//! touches storage; the repositories and services apply these decisions.

use chrono::{DateTime, Duration, Utc};

use aurelia_core::{DesignStyle, JewelryCategory, MetalType};

use crate::models::DesignSession;

/// How long a non-favorited session lives without being favorited.
pub const SESSION_TTL_DAYS: i64 = 15;

/// Maximum favorited sessions per customer.
pub const MAX_FAVORITES: i64 = 5;

/// Expiration for a freshly created, non-favorited session.
#[must_use]
pub fn initial_expiration(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::days(SESSION_TTL_DAYS)
}

/// Expiration after a favorite toggle.
///
/// Favoriting clears the expiration; unfavoriting restarts the TTL from now.
#[must_use]
pub fn expiration_after_toggle(
    marking_favorite: bool,
    now: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    if marking_favorite {
        None
    } else {
        Some(initial_expiration(now))
    }
}

/// Whether a customer with `current_count` favorites may add another.
#[must_use]
pub const fn can_mark_favorite(current_count: i64) -> bool {
    current_count < MAX_FAVORITES
}

/// Whether a session is past its expiration.
///
/// Favorited sessions never expire; a missing expiration on a non-favorited
/// session (impossible under the schema constraint) also reads as not expired.
#[must_use]
pub fn is_expired(session: &DesignSession, now: DateTime<Utc>) -> bool {
    !session.is_favorite && session.expires_at.is_some_and(|at| at < now)
}

/// Display title derived from the design brief, e.g. "ring in gold (modern)".
#[must_use]
pub fn derived_title(category: JewelryCategory, metal: MetalType, style: DesignStyle) -> String {
    format!(
        "{} in {} ({})",
        category.as_str(),
        metal.as_str(),
        style.as_str()
    )
}

#[cfg(test)]
mod tests {
    use aurelia_core::{DesignSessionId, DiamondOption, SessionStatus, UserId};

    use super::*;

    fn session(is_favorite: bool, expires_at: Option<DateTime<Utc>>) -> DesignSession {
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
            is_favorite,
            expires_at,
            last_message_at: Utc::now(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_initial_expiration_is_fifteen_days_out() {
        let now = Utc::now();
        assert_eq!(initial_expiration(now), now + Duration::days(15));
    }

    #[test]
    fn test_favoriting_clears_expiration() {
        assert_eq!(expiration_after_toggle(true, Utc::now()), None);
    }

    #[test]
    fn test_unfavoriting_restarts_ttl() {
        let now = Utc::now();
        assert_eq!(
            expiration_after_toggle(false, now),
            Some(now + Duration::days(SESSION_TTL_DAYS))
        );
    }

    #[test]
    fn test_toggle_twice_restores_expiration_shape() {
        let now = Utc::now();
        // favorite -> expiration gone
        let favorited = expiration_after_toggle(true, now);
        assert!(favorited.is_none());
        // unfavorite -> expiration back
        let unfavorited = expiration_after_toggle(false, now);
        assert!(unfavorited.is_some());
        // favorite again -> gone again
        assert!(expiration_after_toggle(true, now).is_none());
    }

    #[test]
    fn test_favorite_cap() {
        assert!(can_mark_favorite(0));
        assert!(can_mark_favorite(4));
        assert!(!can_mark_favorite(5));
        assert!(!can_mark_favorite(6));
    }

    #[test]
    fn test_expired_session() {
        let past = Utc::now() - Duration::seconds(1);
        assert!(is_expired(&session(false, Some(past)), Utc::now()));
    }

    #[test]
    fn test_favorited_session_never_expires() {
        let past = Utc::now() - Duration::seconds(1);
        // Even with a stale expires_at value, favorite wins.
        assert!(!is_expired(&session(true, Some(past)), Utc::now()));
        assert!(!is_expired(&session(true, None), Utc::now()));
    }

    #[test]
    fn test_future_expiration_is_not_expired() {
        let future = Utc::now() + Duration::days(1);
        assert!(!is_expired(&session(false, Some(future)), Utc::now()));
    }

    #[test]
    fn test_derived_title() {
        assert_eq!(
            derived_title(
                JewelryCategory::Ring,
                MetalType::RoseGold,
                DesignStyle::Vintage
            ),
            "ring in rose-gold (vintage)"
        );
    }
}

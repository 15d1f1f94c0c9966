//! Integration tests for the session lifecycle policy.
//!
//! These verify the expiration/favorite invariants end to end at the policy
//! level: favorite implies no expiration, the TTL restarts on unfavorite,
//! and the per-customer cap gates favoriting.

use chrono::{Duration, Utc};

use aurelia_core::{
    DesignSessionId, DesignStyle, DiamondOption, JewelryCategory, MetalType, SessionStatus, UserId,
};
use aurelia_studio::lifecycle::{
    self, MAX_FAVORITES, SESSION_TTL_DAYS, can_mark_favorite, expiration_after_toggle, is_expired,
};
use aurelia_studio::models::DesignSession;

fn session(is_favorite: bool, expires_at: Option<chrono::DateTime<Utc>>) -> DesignSession {
    DesignSession {
        id: DesignSessionId::generate(),
        user_id: UserId::generate(),
        category: JewelryCategory::Ring,
        metal_type: MetalType::Gold,
        style: DesignStyle::Modern,
        diamond_type: DiamondOption::None,
        description: "A simple modern gold band, 10+ chars".to_string(),
        reference_image_url: None,
        title: "ring in gold (modern)".to_string(),
        status: SessionStatus::Active,
        is_favorite,
        expires_at,
        last_message_at: Utc::now(),
        created_at: Utc::now(),
    }
}

// =============================================================================
// Invariant: favorite == true  <=>  expires_at == None
// =============================================================================

#[test]
fn test_favorite_toggle_maintains_expiration_invariant() {
    let now = Utc::now();

    // Marking favorite always clears the expiration.
    assert_eq!(expiration_after_toggle(true, now), None);

    // Unmarking always restores one, fifteen days out.
    let restored = expiration_after_toggle(false, now).expect("expiration restored");
    assert_eq!(restored, now + Duration::days(SESSION_TTL_DAYS));
}

#[test]
fn test_toggle_twice_restores_cleared_expiration() {
    let now = Utc::now();

    // favorite -> unfavorite -> favorite leaves the session unexpirable again
    assert!(expiration_after_toggle(true, now).is_none());
    assert!(expiration_after_toggle(false, now).is_some());
    assert!(expiration_after_toggle(true, now).is_none());
}

#[test]
fn test_new_session_expires_fifteen_days_out() {
    let now = Utc::now();
    let expires = lifecycle::initial_expiration(now);
    assert_eq!(expires - now, Duration::days(15));
}

// =============================================================================
// Invariant: at most MAX_FAVORITES favorited sessions per customer
// =============================================================================

#[test]
fn test_favorite_cap_is_five() {
    assert_eq!(MAX_FAVORITES, 5);
    for count in 0..5 {
        assert!(can_mark_favorite(count), "count {count} should be allowed");
    }
    assert!(!can_mark_favorite(5));
    assert!(!can_mark_favorite(100));
}

// =============================================================================
// Expiry predicate (the sweeper's selection rule)
// =============================================================================

#[test]
fn test_session_one_second_past_expiration_is_swept() {
    let now = Utc::now();
    let expired = session(false, Some(now - Duration::seconds(1)));
    assert!(is_expired(&expired, now));
}

#[test]
fn test_favorited_session_with_same_timestamp_is_untouched() {
    let now = Utc::now();
    let favorited = session(true, Some(now - Duration::seconds(1)));
    assert!(!is_expired(&favorited, now));
}

#[test]
fn test_unexpired_session_is_untouched() {
    let now = Utc::now();
    let fresh = session(false, Some(now + Duration::days(14)));
    assert!(!is_expired(&fresh, now));
}

#[test]
fn test_derived_title_matches_creation_scenario() {
    assert_eq!(
        lifecycle::derived_title(JewelryCategory::Ring, MetalType::Gold, DesignStyle::Modern),
        "ring in gold (modern)"
    );
}

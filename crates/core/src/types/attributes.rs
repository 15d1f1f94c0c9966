//! Jewelry design attribute enums.
//!
//! These enums form the design brief vocabulary shared by the HTTP surface,
//! the database layer, and the generation prompts. Wire and database
//! representations both use the kebab-case form (`"rose-gold"`).

use serde::{Deserialize, Serialize};

/// Jewelry category a design session is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "jewelry_category", rename_all = "kebab-case")
)]
#[serde(rename_all = "kebab-case")]
pub enum JewelryCategory {
    Ring,
    Necklace,
    Earrings,
    Bracelet,
    Pendant,
}

impl JewelryCategory {
    /// Kebab-case name as used on the wire and in prompts.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ring => "ring",
            Self::Necklace => "necklace",
            Self::Earrings => "earrings",
            Self::Bracelet => "bracelet",
            Self::Pendant => "pendant",
        }
    }
}

/// Metal a piece is made of.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "metal_type", rename_all = "kebab-case")
)]
#[serde(rename_all = "kebab-case")]
pub enum MetalType {
    Gold,
    Silver,
    Platinum,
    RoseGold,
}

impl MetalType {
    /// Kebab-case name as used on the wire and in prompts.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gold => "gold",
            Self::Silver => "silver",
            Self::Platinum => "platinum",
            Self::RoseGold => "rose-gold",
        }
    }
}

/// Overall aesthetic direction of a design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "design_style", rename_all = "kebab-case")
)]
#[serde(rename_all = "kebab-case")]
pub enum DesignStyle {
    Modern,
    Classic,
    Vintage,
    Minimalist,
    Statement,
}

impl DesignStyle {
    /// Kebab-case name as used on the wire and in prompts.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Modern => "modern",
            Self::Classic => "classic",
            Self::Vintage => "vintage",
            Self::Minimalist => "minimalist",
            Self::Statement => "statement",
        }
    }
}

/// Diamond configuration for a design.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "diamond_option", rename_all = "kebab-case")
)]
#[serde(rename_all = "kebab-case")]
pub enum DiamondOption {
    None,
    Small,
    Medium,
    Large,
    Multiple,
}

impl DiamondOption {
    /// Kebab-case name as used on the wire and in prompts.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
            Self::Multiple => "multiple",
        }
    }

    /// Whether the design includes diamonds at all.
    #[must_use]
    pub const fn has_diamonds(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Design session status.
///
/// Only `active` is currently produced; the enum mirrors the storage column
/// so future states do not require a schema change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "session_status", rename_all = "kebab-case")
)]
#[serde(rename_all = "kebab-case")]
pub enum SessionStatus {
    #[default]
    Active,
    Archived,
}

/// Sender of a design conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "message_sender", rename_all = "kebab-case")
)]
#[serde(rename_all = "kebab-case")]
pub enum MessageSender {
    User,
    Assistant,
}

impl MessageSender {
    /// Role string as replayed to the text-generation backend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metal_type_wire_format_is_kebab_case() {
        let json = serde_json::to_string(&MetalType::RoseGold).expect("serialize");
        assert_eq!(json, "\"rose-gold\"");

        let parsed: MetalType = serde_json::from_str("\"rose-gold\"").expect("deserialize");
        assert_eq!(parsed, MetalType::RoseGold);
    }

    #[test]
    fn test_category_rejects_unknown_value() {
        let result: Result<JewelryCategory, _> = serde_json::from_str("\"tiara\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_as_str_matches_serde_form() {
        for category in [
            JewelryCategory::Ring,
            JewelryCategory::Necklace,
            JewelryCategory::Earrings,
            JewelryCategory::Bracelet,
            JewelryCategory::Pendant,
        ] {
            let json = serde_json::to_string(&category).expect("serialize");
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
    }

    #[test]
    fn test_diamond_option_has_diamonds() {
        assert!(!DiamondOption::None.has_diamonds());
        assert!(DiamondOption::Small.has_diamonds());
        assert!(DiamondOption::Multiple.has_diamonds());
    }

    #[test]
    fn test_message_sender_roles() {
        assert_eq!(MessageSender::User.as_str(), "user");
        assert_eq!(MessageSender::Assistant.as_str(), "assistant");
    }
}

//! # Domain Enums
//!
//! Enumeration types for marketplace concepts.
//!
//! - [`Role`] — account capability level
//! - [`NotificationKind`] — chat versus system notifications
//! - [`SortKey`] — catalog sort orders
//!
//! All enums implement `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`,
//! `Display`, `FromStr`, and Serde traits.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when parsing an enum from a string fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseEnumError {
    /// The value does not name a variant of the enum.
    #[error("invalid {0} value: {1}")]
    InvalidValue(&'static str, String),
}

/// Capability level of an identity.
///
/// Moderation actions require [`Role::Admin`]; everything else is open to
/// both roles. This is a capability predicate, not a permission hierarchy.
///
/// # Examples
///
/// ```
/// use campus_market::domain::value_objects::enums::Role;
///
/// assert!(Role::Admin.is_admin());
/// assert!(!Role::Student.is_admin());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum Role {
    /// Regular account: can list, buy, review and follow.
    #[default]
    Student = 0,
    /// Moderation authority: can additionally ban identities and listings.
    Admin = 1,
}

impl Role {
    /// Returns true if this role carries moderation capability.
    #[inline]
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Student => write!(f, "STUDENT"),
            Self::Admin => write!(f, "ADMIN"),
        }
    }
}

impl FromStr for Role {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "STUDENT" => Ok(Self::Student),
            "ADMIN" => Ok(Self::Admin),
            _ => Err(ParseEnumError::InvalidValue("Role", s.to_string())),
        }
    }
}

/// Kind of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum NotificationKind {
    /// Peer-to-peer chat message.
    #[default]
    Chat = 0,
    /// Message emitted by the marketplace itself as a side effect of a
    /// listing transition.
    System = 1,
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Chat => write!(f, "CHAT"),
            Self::System => write!(f, "SYSTEM"),
        }
    }
}

impl FromStr for NotificationKind {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "CHAT" => Ok(Self::Chat),
            "SYSTEM" => Ok(Self::System),
            _ => Err(ParseEnumError::InvalidValue(
                "NotificationKind",
                s.to_string(),
            )),
        }
    }
}

/// Secondary sort order for catalog queries.
///
/// Applied after the compatibility tie-break that places active listings
/// ahead of every other status.
///
/// The string forms match the upstream query parameters (`price_asc`,
/// `price_desc`, `views_desc`); anything else falls back to
/// [`SortKey::CreatedDesc`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum SortKey {
    /// Cheapest first.
    PriceAsc = 0,
    /// Most expensive first.
    PriceDesc = 1,
    /// Most viewed first.
    ViewsDesc = 2,
    /// Newest first.
    #[default]
    CreatedDesc = 3,
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PriceAsc => write!(f, "price_asc"),
            Self::PriceDesc => write!(f, "price_desc"),
            Self::ViewsDesc => write!(f, "views_desc"),
            Self::CreatedDesc => write!(f, "created_desc"),
        }
    }
}

impl FromStr for SortKey {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "price_asc" => Ok(Self::PriceAsc),
            "price_desc" => Ok(Self::PriceDesc),
            "views_desc" => Ok(Self::ViewsDesc),
            "created_desc" => Ok(Self::CreatedDesc),
            _ => Err(ParseEnumError::InvalidValue("SortKey", s.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn role_capability() {
        assert!(Role::Admin.is_admin());
        assert!(!Role::Student.is_admin());
    }

    #[test]
    fn role_parse_roundtrip() {
        assert_eq!("admin".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("STUDENT".parse::<Role>().unwrap(), Role::Student);
        assert!("FACULTY".parse::<Role>().is_err());
    }

    #[test]
    fn role_serde_uppercase() {
        assert_eq!(serde_json::to_string(&Role::Student).unwrap(), "\"STUDENT\"");
        let back: Role = serde_json::from_str("\"ADMIN\"").unwrap();
        assert_eq!(back, Role::Admin);
    }

    #[test]
    fn notification_kind_parse() {
        assert_eq!(
            "system".parse::<NotificationKind>().unwrap(),
            NotificationKind::System
        );
        assert_eq!(NotificationKind::Chat.to_string(), "CHAT");
    }

    #[test]
    fn sort_key_matches_query_params() {
        assert_eq!("price_asc".parse::<SortKey>().unwrap(), SortKey::PriceAsc);
        assert_eq!("views_desc".parse::<SortKey>().unwrap(), SortKey::ViewsDesc);
        assert!("popularity".parse::<SortKey>().is_err());
    }

    #[test]
    fn sort_key_default_is_created_desc() {
        assert_eq!(SortKey::default(), SortKey::CreatedDesc);
    }
}

//! # Listing Status
//!
//! Listing lifecycle state machine.
//!
//! # State Machine
//!
//! ```text
//! Active → Sold → Received
//!   ↓       ↓
//!   └───────┴→ Banned
//! ```
//!
//! `Received` and `Banned` are terminal: no transition leaves them.
//!
//! # Examples
//!
//! ```
//! use campus_market::domain::value_objects::listing_status::ListingStatus;
//!
//! let status = ListingStatus::Active;
//! assert!(status.can_transition_to(ListingStatus::Sold));
//! assert!(!status.can_transition_to(ListingStatus::Received));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::value_objects::enums::ParseEnumError;

/// Lifecycle state of a listing.
///
/// Transitions are enforced via
/// [`can_transition_to`](ListingStatus::can_transition_to); the listing
/// aggregate is the only writer.
///
/// # Terminal States
///
/// - [`Received`](ListingStatus::Received) — buyer confirmed delivery and
///   the seller has been settled
/// - [`Banned`](ListingStatus::Banned) — removed by moderation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[repr(u8)]
pub enum ListingStatus {
    /// Offered for sale, visible in the catalog.
    #[default]
    Active = 0,

    /// Purchased; delivery pending, seller unpaid.
    Sold = 1,

    /// Delivery confirmed by the buyer; seller settled (terminal).
    Received = 2,

    /// Taken down by moderation (terminal).
    Banned = 3,
}

impl ListingStatus {
    /// Returns true if this is a terminal state.
    ///
    /// # Examples
    ///
    /// ```
    /// use campus_market::domain::value_objects::listing_status::ListingStatus;
    ///
    /// assert!(!ListingStatus::Active.is_terminal());
    /// assert!(!ListingStatus::Sold.is_terminal());
    /// assert!(ListingStatus::Received.is_terminal());
    /// assert!(ListingStatus::Banned.is_terminal());
    /// ```
    #[inline]
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Received | Self::Banned)
    }

    /// Returns true if this state can transition to the target state.
    ///
    /// Enforces the listing state machine:
    /// - Active → Sold, Banned
    /// - Sold → Received, Banned
    /// - Received, Banned → (none)
    ///
    /// # Examples
    ///
    /// ```
    /// use campus_market::domain::value_objects::listing_status::ListingStatus;
    ///
    /// assert!(ListingStatus::Sold.can_transition_to(ListingStatus::Received));
    /// assert!(!ListingStatus::Received.can_transition_to(ListingStatus::Active));
    /// ```
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Active, Self::Sold)
                | (Self::Active, Self::Banned)
                | (Self::Sold, Self::Received)
                | (Self::Sold, Self::Banned)
        )
    }

    /// Returns the valid next states from this state.
    #[must_use]
    pub fn valid_transitions(&self) -> Vec<Self> {
        match self {
            Self::Active => vec![Self::Sold, Self::Banned],
            Self::Sold => vec![Self::Received, Self::Banned],
            Self::Received | Self::Banned => Vec::new(),
        }
    }
}

impl fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "ACTIVE"),
            Self::Sold => write!(f, "SOLD"),
            Self::Received => write!(f, "RECEIVED"),
            Self::Banned => write!(f, "BANNED"),
        }
    }
}

impl FromStr for ListingStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "ACTIVE" => Ok(Self::Active),
            "SOLD" => Ok(Self::Sold),
            "RECEIVED" => Ok(Self::Received),
            "BANNED" => Ok(Self::Banned),
            _ => Err(ParseEnumError::InvalidValue("ListingStatus", s.to_string())),
        }
    }
}

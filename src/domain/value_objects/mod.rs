//! # Value Objects
//!
//! Immutable types with validation and domain semantics.
//!
//! ## Identity Types
//!
//! - [`IdentityId`], [`ListingId`]: opaque string identifiers
//! - [`NotificationId`], [`ReviewId`]: UUID-based identifiers
//!
//! ## Numeric Types
//!
//! - [`Money`]: non-negative decimal amount with checked arithmetic
//!
//! ## Domain Enums
//!
//! - [`Role`]: Student or Admin
//! - [`ListingStatus`]: listing lifecycle states
//! - [`NotificationKind`]: chat or system
//! - [`SortKey`]: catalog sort orders

pub mod enums;
pub mod ids;
pub mod listing_status;
pub mod money;
pub mod timestamp;

pub use enums::{NotificationKind, ParseEnumError, Role, SortKey};
pub use ids::{IdentityId, ListingId, NotificationId, ReviewId};
pub use listing_status::ListingStatus;
pub use money::{ArithmeticError, ArithmeticResult, Money};
pub use timestamp::Timestamp;

//! # Repository Traits
//!
//! Port definitions for persistence abstraction.
//!
//! This module defines the repository traits (ports) that abstract
//! persistence operations. Implementations can use different backends;
//! the crate ships an in-memory one.
//!
//! Two primitives here carry the transaction engine's correctness:
//!
//! - [`ListingRepository::update_if_status`] — a conditional update that
//!   persists a listing only while the stored row is still in the expected
//!   status. Exactly one of N concurrent purchases of the same listing can
//!   win this write; the rest observe [`RepositoryError::Conflict`].
//! - [`IdentityRepository::credit_wallet`] /
//!   [`IdentityRepository::debit_wallet`] — wallet mutations applied inside
//!   the store's critical section, so a debit can never observe a stale
//!   balance.

use crate::domain::entities::identity::Identity;
use crate::domain::entities::listing::Listing;
use crate::domain::entities::notification::Notification;
use crate::domain::entities::review::Review;
use crate::domain::errors::DomainError;
use crate::domain::value_objects::{
    IdentityId, ListingId, ListingStatus, Money, NotificationId,
};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Error type for repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Entity not found.
    #[error("entity not found: {entity_type} with id {id}")]
    NotFound {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// Duplicate entity.
    #[error("duplicate entity: {entity_type} with id {id} already exists")]
    Duplicate {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// A conditional update lost the race: the stored record no longer
    /// matches the expected prior state.
    #[error("conflict: {entity_type} with id {id} has been modified")]
    Conflict {
        /// Type of entity.
        entity_type: &'static str,
        /// Entity identifier.
        id: String,
    },

    /// The store applied the write path but a domain rule rejected the
    /// mutation (e.g. a debit beyond the balance).
    #[error("rejected: {0}")]
    Rejected(#[from] DomainError),

    /// The backing store is unreachable or failed. Fatal, surfaced as a
    /// 5xx-equivalent.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl RepositoryError {
    /// Creates a not found error.
    #[must_use]
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a duplicate error.
    #[must_use]
    pub fn duplicate(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::Duplicate {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates a conflict error.
    #[must_use]
    pub fn conflict(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::Conflict {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an unavailable error.
    #[must_use]
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns true if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns true if this is a conflict error.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Returns true if this is a domain-rule rejection.
    #[must_use]
    pub fn is_rejected(&self) -> bool {
        matches!(self, Self::Rejected(_))
    }
}

/// Result type for repository operations.
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Repository for identity aggregates.
///
/// `save` uses optimistic locking via the aggregate's version field; the
/// wallet primitives bypass it and are atomic on their own.
#[async_trait]
pub trait IdentityRepository: Send + Sync + fmt::Debug {
    /// Inserts a new identity.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Duplicate` if the id is already taken.
    async fn insert(&self, identity: &Identity) -> RepositoryResult<()>;

    /// Saves an existing identity.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the identity does not exist,
    /// `RepositoryError::Conflict` if it was modified since it was loaded.
    async fn save(&self, identity: &Identity) -> RepositoryResult<()>;

    /// Gets an identity by id.
    ///
    /// Returns `None` if the identity does not exist.
    async fn get(&self, id: &IdentityId) -> RepositoryResult<Option<Identity>>;

    /// Gets all identities.
    async fn get_all(&self) -> RepositoryResult<Vec<Identity>>;

    /// Atomically credits the wallet via [`Identity::credit`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the identity does not exist,
    /// `RepositoryError::Rejected` if the domain mutator refuses the
    /// amount.
    async fn credit_wallet(&self, id: &IdentityId, amount: Money) -> RepositoryResult<Identity>;

    /// Atomically debits the wallet via [`Identity::debit`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the identity does not exist,
    /// `RepositoryError::Rejected` on invalid amounts or insufficient
    /// funds; a rejected debit leaves the balance untouched.
    async fn debit_wallet(&self, id: &IdentityId, amount: Money) -> RepositoryResult<Identity>;

    /// Counts all identities.
    async fn count(&self) -> RepositoryResult<u64>;
}

/// Repository for listing aggregates.
#[async_trait]
pub trait ListingRepository: Send + Sync + fmt::Debug {
    /// Inserts a new listing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Duplicate` if the id is already taken.
    async fn insert(&self, listing: &Listing) -> RepositoryResult<()>;

    /// Saves an existing listing with optimistic locking.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the listing does not exist,
    /// `RepositoryError::Conflict` if it was modified since it was loaded.
    async fn save(&self, listing: &Listing) -> RepositoryResult<()>;

    /// Gets a listing by id.
    ///
    /// Returns `None` if the listing does not exist.
    async fn get(&self, id: &ListingId) -> RepositoryResult<Option<Listing>>;

    /// Gets all listings.
    async fn get_all(&self) -> RepositoryResult<Vec<Listing>>;

    /// Conditional update: persists `listing` only if the stored copy is
    /// still in `expected` status.
    ///
    /// This is the compare-and-swap the purchase flow relies on; callers
    /// translate a conflict into the operation-appropriate business error
    /// and never retry it silently.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the listing does not exist,
    /// `RepositoryError::Conflict` if the stored status differs from
    /// `expected`.
    async fn update_if_status(
        &self,
        listing: &Listing,
        expected: ListingStatus,
    ) -> RepositoryResult<()>;

    /// Atomically increments the view counter.
    ///
    /// Returns the updated listing, or `None` if it does not exist.
    async fn record_view(&self, id: &ListingId) -> RepositoryResult<Option<Listing>>;

    /// Finds listings offered by the given seller.
    async fn find_by_seller(&self, seller: &IdentityId) -> RepositoryResult<Vec<Listing>>;

    /// Finds listings bought by the given buyer.
    async fn find_by_buyer(&self, buyer: &IdentityId) -> RepositoryResult<Vec<Listing>>;

    /// Counts all listings.
    async fn count(&self) -> RepositoryResult<u64>;
}

/// Repository for notifications.
#[async_trait]
pub trait NotificationRepository: Send + Sync + fmt::Debug {
    /// Inserts a notification.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the store cannot accept
    /// the write.
    async fn insert(&self, notification: &Notification) -> RepositoryResult<()>;

    /// Gets a notification by id.
    async fn get(&self, id: &NotificationId) -> RepositoryResult<Option<Notification>>;

    /// Finds notifications addressed to the given receiver, newest first.
    async fn find_by_receiver(&self, receiver: &IdentityId)
    -> RepositoryResult<Vec<Notification>>;

    /// Marks a notification read.
    ///
    /// Returns the updated notification, or `None` if it does not exist.
    async fn mark_read(&self, id: &NotificationId) -> RepositoryResult<Option<Notification>>;

    /// Counts all notifications.
    async fn count(&self) -> RepositoryResult<u64>;
}

/// Repository for seller reviews.
#[async_trait]
pub trait ReviewRepository: Send + Sync + fmt::Debug {
    /// Inserts a review.
    async fn insert(&self, review: &Review) -> RepositoryResult<()>;

    /// Finds reviews about the given seller, newest first.
    async fn find_by_seller(&self, seller: &IdentityId) -> RepositoryResult<Vec<Review>>;

    /// Counts all reviews.
    async fn count(&self) -> RepositoryResult<u64>;
}

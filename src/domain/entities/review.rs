//! # Review Entity
//!
//! A buyer's rating of a seller after a completed purchase.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{IdentityId, ListingId, ReviewId, Timestamp};
use serde::{Deserialize, Serialize};

/// Lowest accepted rating.
pub const MIN_RATING: i32 = 1;
/// Highest accepted rating.
pub const MAX_RATING: i32 = 5;

/// A rating left by the buyer of a received listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    /// Generated identifier.
    id: ReviewId,
    /// Seller being reviewed.
    seller: IdentityId,
    /// Buyer writing the review.
    buyer: IdentityId,
    /// Listing the purchase concerned.
    listing: ListingId,
    /// Star rating in `1..=5`.
    rating: i32,
    /// Free-text comment.
    content: String,
    /// When the review was written.
    created_at: Timestamp,
}

impl Review {
    /// Creates a review with rating validation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidRating` if `rating` is outside `1..=5`.
    pub fn new(
        seller: IdentityId,
        buyer: IdentityId,
        listing: ListingId,
        rating: i32,
        content: impl Into<String>,
    ) -> DomainResult<Self> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(DomainError::InvalidRating(rating));
        }
        Ok(Self {
            id: ReviewId::new_v4(),
            seller,
            buyer,
            listing,
            rating,
            content: content.into(),
            created_at: Timestamp::now(),
        })
    }

    /// Returns the review id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> ReviewId {
        self.id
    }

    /// Returns the reviewed seller.
    #[inline]
    #[must_use]
    pub fn seller(&self) -> &IdentityId {
        &self.seller
    }

    /// Returns the reviewing buyer.
    #[inline]
    #[must_use]
    pub fn buyer(&self) -> &IdentityId {
        &self.buyer
    }

    /// Returns the listing the review concerns.
    #[inline]
    #[must_use]
    pub fn listing(&self) -> &ListingId {
        &self.listing
    }

    /// Returns the star rating.
    #[inline]
    #[must_use]
    pub fn rating(&self) -> i32 {
        self.rating
    }

    /// Returns the comment text.
    #[inline]
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the creation time.
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }
}

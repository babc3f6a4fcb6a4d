//! # Review Service
//!
//! Seller reviews, gated on a completed purchase: only the recorded buyer
//! of a `Received` listing may leave one.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::entities::review::Review;
use crate::domain::value_objects::{IdentityId, ListingId, ListingStatus};
use crate::infrastructure::persistence::{ListingRepository, ReviewRepository};
use std::sync::Arc;

/// Creates and serves seller reviews.
#[derive(Debug, Clone)]
pub struct ReviewService {
    reviews: Arc<dyn ReviewRepository>,
    listings: Arc<dyn ListingRepository>,
}

impl ReviewService {
    /// Creates a review service over the given repositories.
    #[must_use]
    pub fn new(reviews: Arc<dyn ReviewRepository>, listings: Arc<dyn ListingRepository>) -> Self {
        Self { reviews, listings }
    }

    /// Creates a review of the listing's seller.
    ///
    /// # Errors
    ///
    /// - `ApplicationError::NotFound` if the listing does not exist
    /// - `ApplicationError::Forbidden` if the requester is not the
    ///   recorded buyer
    /// - `ApplicationError::InvalidState` if the listing is not
    ///   `Received`
    /// - `ApplicationError::Validation` for ratings outside 1..=5
    pub async fn create(
        &self,
        requester: &IdentityId,
        listing_id: &ListingId,
        rating: i32,
        content: &str,
    ) -> ApplicationResult<Review> {
        let listing = self
            .listings
            .get(listing_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Listing", listing_id.as_str()))?;

        if listing.buyer() != Some(requester) {
            return Err(ApplicationError::forbidden(
                "only the buyer of a listing can review its seller",
            ));
        }
        if listing.status() != ListingStatus::Received {
            return Err(ApplicationError::invalid_state(
                "reviews open once delivery is confirmed",
            ));
        }

        let review = Review::new(
            listing.seller().clone(),
            requester.clone(),
            listing_id.clone(),
            rating,
            content,
        )?;
        self.reviews.insert(&review).await?;
        Ok(review)
    }

    /// Lists the reviews about a seller, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Persistence` if the store fails.
    pub async fn for_seller(&self, seller: &IdentityId) -> ApplicationResult<Vec<Review>> {
        Ok(self.reviews.find_by_seller(seller).await?)
    }
}

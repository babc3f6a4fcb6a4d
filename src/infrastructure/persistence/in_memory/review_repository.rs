//! # In-Memory Review Repository
//!
//! In-memory implementation of [`ReviewRepository`].

use crate::domain::entities::review::Review;
use crate::domain::value_objects::IdentityId;
use crate::infrastructure::persistence::traits::{ReviewRepository, RepositoryResult};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of [`ReviewRepository`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryReviewRepository {
    storage: Arc<RwLock<Vec<Review>>>,
}

impl InMemoryReviewRepository {
    /// Creates a new empty in-memory review repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReviewRepository for InMemoryReviewRepository {
    async fn insert(&self, review: &Review) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        storage.push(review.clone());
        Ok(())
    }

    async fn find_by_seller(&self, seller: &IdentityId) -> RepositoryResult<Vec<Review>> {
        let storage = self.storage.read().await;
        let mut reviews: Vec<Review> = storage
            .iter()
            .filter(|r| r.seller() == seller)
            .cloned()
            .collect();
        reviews.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(reviews)
    }

    async fn count(&self) -> RepositoryResult<u64> {
        let storage = self.storage.read().await;
        Ok(storage.len() as u64)
    }
}

//! # In-Memory Listing Repository
//!
//! In-memory implementation of [`ListingRepository`].
//!
//! The conditional update checks the stored status and swaps in the new
//! snapshot in one critical section, so concurrent purchases of the same
//! listing serialize here: one wins, the rest observe a conflict.

use crate::domain::entities::listing::Listing;
use crate::domain::value_objects::{IdentityId, ListingId, ListingStatus};
use crate::infrastructure::persistence::traits::{
    ListingRepository, RepositoryError, RepositoryResult,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of [`ListingRepository`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryListingRepository {
    storage: Arc<RwLock<HashMap<ListingId, Listing>>>,
}

impl InMemoryListingRepository {
    /// Creates a new empty in-memory listing repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all listings from the repository.
    pub async fn clear(&self) {
        let mut storage = self.storage.write().await;
        storage.clear();
    }
}

#[async_trait]
impl ListingRepository for InMemoryListingRepository {
    async fn insert(&self, listing: &Listing) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        if storage.contains_key(listing.id()) {
            return Err(RepositoryError::duplicate("Listing", listing.id().as_str()));
        }
        storage.insert(listing.id().clone(), listing.clone());
        Ok(())
    }

    async fn save(&self, listing: &Listing) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        match storage.get(listing.id()) {
            None => Err(RepositoryError::not_found("Listing", listing.id().as_str())),
            Some(existing) if existing.version() >= listing.version() => {
                Err(RepositoryError::conflict("Listing", listing.id().as_str()))
            }
            Some(_) => {
                storage.insert(listing.id().clone(), listing.clone());
                Ok(())
            }
        }
    }

    async fn get(&self, id: &ListingId) -> RepositoryResult<Option<Listing>> {
        let storage = self.storage.read().await;
        Ok(storage.get(id).cloned())
    }

    async fn get_all(&self) -> RepositoryResult<Vec<Listing>> {
        let storage = self.storage.read().await;
        Ok(storage.values().cloned().collect())
    }

    async fn update_if_status(
        &self,
        listing: &Listing,
        expected: ListingStatus,
    ) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        let existing = storage
            .get(listing.id())
            .ok_or_else(|| RepositoryError::not_found("Listing", listing.id().as_str()))?;
        if existing.status() != expected {
            return Err(RepositoryError::conflict("Listing", listing.id().as_str()));
        }
        storage.insert(listing.id().clone(), listing.clone());
        Ok(())
    }

    async fn record_view(&self, id: &ListingId) -> RepositoryResult<Option<Listing>> {
        let mut storage = self.storage.write().await;
        Ok(storage.get_mut(id).map(|listing| {
            listing.record_view();
            listing.clone()
        }))
    }

    async fn find_by_seller(&self, seller: &IdentityId) -> RepositoryResult<Vec<Listing>> {
        let storage = self.storage.read().await;
        Ok(storage
            .values()
            .filter(|l| l.seller() == seller)
            .cloned()
            .collect())
    }

    async fn find_by_buyer(&self, buyer: &IdentityId) -> RepositoryResult<Vec<Listing>> {
        let storage = self.storage.read().await;
        Ok(storage
            .values()
            .filter(|l| l.buyer() == Some(buyer))
            .cloned()
            .collect())
    }

    async fn count(&self) -> RepositoryResult<u64> {
        let storage = self.storage.read().await;
        Ok(storage.len() as u64)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Money;

    fn lamp(id: &str, seller: &str) -> Listing {
        Listing::builder(
            ListingId::new(id),
            IdentityId::new(seller),
            "Desk lamp",
            Money::from_major(45),
        )
        .build()
        .unwrap()
    }

    #[tokio::test]
    async fn insert_and_get() {
        let repo = InMemoryListingRepository::new();
        let listing = lamp("p1", "u1");
        repo.insert(&listing).await.unwrap();

        let found = repo.get(listing.id()).await.unwrap().unwrap();
        assert_eq!(found.id(), listing.id());
    }

    #[tokio::test]
    async fn insert_duplicate_fails() {
        let repo = InMemoryListingRepository::new();
        repo.insert(&lamp("p1", "u1")).await.unwrap();
        let result = repo.insert(&lamp("p1", "u2")).await;
        assert!(matches!(result, Err(RepositoryError::Duplicate { .. })));
    }

    #[tokio::test]
    async fn update_if_status_swaps_when_expected_matches() {
        let repo = InMemoryListingRepository::new();
        let mut listing = lamp("p1", "u1");
        repo.insert(&listing).await.unwrap();

        listing.mark_sold(IdentityId::new("u2")).unwrap();
        repo.update_if_status(&listing, ListingStatus::Active)
            .await
            .unwrap();

        let stored = repo.get(listing.id()).await.unwrap().unwrap();
        assert_eq!(stored.status(), ListingStatus::Sold);
        assert_eq!(stored.buyer(), Some(&IdentityId::new("u2")));
    }

    #[tokio::test]
    async fn update_if_status_conflicts_on_stale_expectation() {
        let repo = InMemoryListingRepository::new();
        let listing = lamp("p1", "u1");
        repo.insert(&listing).await.unwrap();

        // First buyer transitions the stored row.
        let mut won = listing.clone();
        won.mark_sold(IdentityId::new("u2")).unwrap();
        repo.update_if_status(&won, ListingStatus::Active)
            .await
            .unwrap();

        // Second buyer raced from the same Active snapshot.
        let mut lost = listing.clone();
        lost.mark_sold(IdentityId::new("u3")).unwrap();
        let result = repo.update_if_status(&lost, ListingStatus::Active).await;
        assert!(matches!(result, Err(RepositoryError::Conflict { .. })));

        // The winner's buyer is preserved.
        let stored = repo.get(listing.id()).await.unwrap().unwrap();
        assert_eq!(stored.buyer(), Some(&IdentityId::new("u2")));
    }

    #[tokio::test]
    async fn update_if_status_unknown_listing_fails() {
        let repo = InMemoryListingRepository::new();
        let listing = lamp("p1", "u1");
        let result = repo.update_if_status(&listing, ListingStatus::Active).await;
        assert!(matches!(result, Err(RepositoryError::NotFound { .. })));
    }

    #[tokio::test]
    async fn record_view_increments() {
        let repo = InMemoryListingRepository::new();
        repo.insert(&lamp("p1", "u1")).await.unwrap();

        repo.record_view(&ListingId::new("p1")).await.unwrap();
        let viewed = repo
            .record_view(&ListingId::new("p1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(viewed.view_count(), 2);
    }

    #[tokio::test]
    async fn record_view_unknown_listing_is_none() {
        let repo = InMemoryListingRepository::new();
        let result = repo.record_view(&ListingId::new("ghost")).await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn find_by_seller_and_buyer() {
        let repo = InMemoryListingRepository::new();
        repo.insert(&lamp("p1", "u1")).await.unwrap();
        repo.insert(&lamp("p2", "u1")).await.unwrap();

        let mut sold = lamp("p3", "u9");
        repo.insert(&sold).await.unwrap();
        sold.mark_sold(IdentityId::new("u2")).unwrap();
        repo.update_if_status(&sold, ListingStatus::Active)
            .await
            .unwrap();

        assert_eq!(
            repo.find_by_seller(&IdentityId::new("u1"))
                .await
                .unwrap()
                .len(),
            2
        );
        assert_eq!(
            repo.find_by_buyer(&IdentityId::new("u2"))
                .await
                .unwrap()
                .len(),
            1
        );
    }
}

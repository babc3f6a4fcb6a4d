//! # In-Memory Identity Repository
//!
//! In-memory implementation of [`IdentityRepository`].
//!
//! Uses a thread-safe `HashMap` for storage. Wallet primitives run the
//! domain mutators under the write lock, which gives the single-store
//! atomicity the engine contract requires.

use crate::domain::entities::identity::Identity;
use crate::domain::value_objects::{IdentityId, Money};
use crate::infrastructure::persistence::traits::{
    IdentityRepository, RepositoryError, RepositoryResult,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of [`IdentityRepository`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryIdentityRepository {
    storage: Arc<RwLock<HashMap<IdentityId, Identity>>>,
}

impl InMemoryIdentityRepository {
    /// Creates a new empty in-memory identity repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all identities from the repository.
    pub async fn clear(&self) {
        let mut storage = self.storage.write().await;
        storage.clear();
    }
}

#[async_trait]
impl IdentityRepository for InMemoryIdentityRepository {
    async fn insert(&self, identity: &Identity) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        if storage.contains_key(identity.id()) {
            return Err(RepositoryError::duplicate(
                "Identity",
                identity.id().as_str(),
            ));
        }
        storage.insert(identity.id().clone(), identity.clone());
        Ok(())
    }

    async fn save(&self, identity: &Identity) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        match storage.get(identity.id()) {
            None => Err(RepositoryError::not_found(
                "Identity",
                identity.id().as_str(),
            )),
            Some(existing) if existing.version() >= identity.version() => Err(
                RepositoryError::conflict("Identity", identity.id().as_str()),
            ),
            Some(_) => {
                storage.insert(identity.id().clone(), identity.clone());
                Ok(())
            }
        }
    }

    async fn get(&self, id: &IdentityId) -> RepositoryResult<Option<Identity>> {
        let storage = self.storage.read().await;
        Ok(storage.get(id).cloned())
    }

    async fn get_all(&self) -> RepositoryResult<Vec<Identity>> {
        let storage = self.storage.read().await;
        Ok(storage.values().cloned().collect())
    }

    async fn credit_wallet(&self, id: &IdentityId, amount: Money) -> RepositoryResult<Identity> {
        let mut storage = self.storage.write().await;
        let identity = storage
            .get_mut(id)
            .ok_or_else(|| RepositoryError::not_found("Identity", id.as_str()))?;
        identity.credit(amount)?;
        Ok(identity.clone())
    }

    async fn debit_wallet(&self, id: &IdentityId, amount: Money) -> RepositoryResult<Identity> {
        let mut storage = self.storage.write().await;
        let identity = storage
            .get_mut(id)
            .ok_or_else(|| RepositoryError::not_found("Identity", id.as_str()))?;
        identity.debit(amount)?;
        Ok(identity.clone())
    }

    async fn count(&self) -> RepositoryResult<u64> {
        let storage = self.storage.read().await;
        Ok(storage.len() as u64)
    }
}

//! # In-Memory Notification Repository
//!
//! In-memory implementation of [`NotificationRepository`].

use crate::domain::entities::notification::Notification;
use crate::domain::value_objects::{IdentityId, NotificationId};
use crate::infrastructure::persistence::traits::{
    NotificationRepository, RepositoryResult,
};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory implementation of [`NotificationRepository`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotificationRepository {
    storage: Arc<RwLock<HashMap<NotificationId, Notification>>>,
}

impl InMemoryNotificationRepository {
    /// Creates a new empty in-memory notification repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationRepository for InMemoryNotificationRepository {
    async fn insert(&self, notification: &Notification) -> RepositoryResult<()> {
        let mut storage = self.storage.write().await;
        storage.insert(notification.id(), notification.clone());
        Ok(())
    }

    async fn get(&self, id: &NotificationId) -> RepositoryResult<Option<Notification>> {
        let storage = self.storage.read().await;
        Ok(storage.get(id).cloned())
    }

    async fn find_by_receiver(
        &self,
        receiver: &IdentityId,
    ) -> RepositoryResult<Vec<Notification>> {
        let storage = self.storage.read().await;
        let mut inbox: Vec<Notification> = storage
            .values()
            .filter(|n| n.receiver() == receiver)
            .cloned()
            .collect();
        inbox.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(inbox)
    }

    async fn mark_read(&self, id: &NotificationId) -> RepositoryResult<Option<Notification>> {
        let mut storage = self.storage.write().await;
        Ok(storage.get_mut(id).map(|notification| {
            notification.mark_read();
            notification.clone()
        }))
    }

    async fn count(&self) -> RepositoryResult<u64> {
        let storage = self.storage.read().await;
        Ok(storage.len() as u64)
    }
}

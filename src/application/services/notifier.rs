//! # Notifier
//!
//! Creates system notifications as a side effect of listing transitions.
//!
//! The sender of every system message is a single configured identity,
//! resolved once at process start; there is no runtime lookup of "some
//! admin account". Templates are fixed per transition kind. Delivery
//! failure is surfaced to the caller and never rolls back the transition
//! it accompanies.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::entities::notification::Notification;
use crate::domain::value_objects::{IdentityId, NotificationId};
use crate::infrastructure::persistence::NotificationRepository;
use std::sync::Arc;

/// Emits templated system notifications and serves the inbox.
#[derive(Debug, Clone)]
pub struct Notifier {
    repository: Arc<dyn NotificationRepository>,
    system_sender: IdentityId,
    default_takedown_reason: String,
}

impl Notifier {
    /// Creates a notifier bound to the configured system sender identity.
    #[must_use]
    pub fn new(
        repository: Arc<dyn NotificationRepository>,
        system_sender: IdentityId,
        default_takedown_reason: impl Into<String>,
    ) -> Self {
        Self {
            repository,
            system_sender,
            default_takedown_reason: default_takedown_reason.into(),
        }
    }

    /// Returns the configured system sender identity.
    #[inline]
    #[must_use]
    pub fn system_sender(&self) -> &IdentityId {
        &self.system_sender
    }

    /// Notifies a seller that their listing has been purchased.
    ///
    /// The message carries the buyer's delivery address so the seller can
    /// ship without a follow-up round trip.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotificationDeliveryFailed` if the store
    /// rejects the write.
    pub async fn purchase_confirmation(
        &self,
        seller: &IdentityId,
        listing_title: &str,
        delivery_address: &str,
    ) -> ApplicationResult<Notification> {
        let content = format!(
            "Congratulations! Your listing '{listing_title}' has been purchased. \
             Deliver to: {delivery_address}"
        );
        self.deliver(seller, content).await
    }

    /// Notifies a seller that moderation took their listing down.
    ///
    /// A blank reason falls back to the configured default text.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotificationDeliveryFailed` if the store
    /// rejects the write.
    pub async fn takedown_notice(
        &self,
        seller: &IdentityId,
        listing_title: &str,
        reason: &str,
    ) -> ApplicationResult<Notification> {
        let reason = if reason.trim().is_empty() {
            self.default_takedown_reason.as_str()
        } else {
            reason
        };
        let content = format!(
            "Your listing '{listing_title}' has been removed by moderation. Reason: {reason}"
        );
        self.deliver(seller, content).await
    }

    /// Returns the receiver's notifications, newest first.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Persistence` if the store fails.
    pub async fn inbox(&self, receiver: &IdentityId) -> ApplicationResult<Vec<Notification>> {
        Ok(self.repository.find_by_receiver(receiver).await?)
    }

    /// Marks a notification read.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotFound` if the notification does not
    /// exist.
    pub async fn mark_read(&self, id: NotificationId) -> ApplicationResult<Notification> {
        self.repository
            .mark_read(&id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Notification", id.to_string()))
    }

    /// Fetches a notification by id.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotFound` if the notification does not
    /// exist.
    pub async fn get(&self, id: NotificationId) -> ApplicationResult<Notification> {
        self.repository
            .get(&id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Notification", id.to_string()))
    }

    async fn deliver(
        &self,
        receiver: &IdentityId,
        content: String,
    ) -> ApplicationResult<Notification> {
        let notification =
            Notification::system(self.system_sender.clone(), receiver.clone(), content);
        self.repository
            .insert(&notification)
            .await
            .map_err(|e| ApplicationError::NotificationDeliveryFailed(e.to_string()))?;
        Ok(notification)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::infrastructure::persistence::in_memory::InMemoryNotificationRepository;

    fn notifier() -> Notifier {
        Notifier::new(
            Arc::new(InMemoryNotificationRepository::new()),
            IdentityId::new("system"),
            "violation of marketplace policy",
        )
    }

    #[tokio::test]
    async fn purchase_confirmation_carries_address() {
        let notifier = notifier();
        let note = notifier
            .purchase_confirmation(&IdentityId::new("u1"), "Desk lamp", "Room 12")
            .await
            .unwrap();

        assert_eq!(note.receiver(), &IdentityId::new("u1"));
        assert_eq!(note.sender(), &IdentityId::new("system"));
        assert!(note.content().contains("Desk lamp"));
        assert!(note.content().contains("Room 12"));
    }

    #[tokio::test]
    async fn takedown_notice_carries_reason() {
        let notifier = notifier();
        let note = notifier
            .takedown_notice(&IdentityId::new("u1"), "Desk lamp", "policy violation")
            .await
            .unwrap();

        assert!(note.content().contains("policy violation"));
    }

    #[tokio::test]
    async fn blank_takedown_reason_uses_default() {
        let notifier = notifier();
        let note = notifier
            .takedown_notice(&IdentityId::new("u1"), "Desk lamp", "  ")
            .await
            .unwrap();

        assert!(note.content().contains("violation of marketplace policy"));
    }

    #[tokio::test]
    async fn inbox_and_mark_read() {
        let notifier = notifier();
        let note = notifier
            .purchase_confirmation(&IdentityId::new("u1"), "Desk lamp", "Room 12")
            .await
            .unwrap();

        let inbox = notifier.inbox(&IdentityId::new("u1")).await.unwrap();
        assert_eq!(inbox.len(), 1);

        let read = notifier.mark_read(note.id()).await.unwrap();
        assert!(read.is_read());
    }

    #[tokio::test]
    async fn mark_read_unknown_notification_fails() {
        let notifier = notifier();
        let result = notifier.mark_read(NotificationId::new_v4()).await;
        assert!(matches!(result, Err(ApplicationError::NotFound { .. })));
    }
}

//! # Notification Entity
//!
//! A message delivered to an identity's inbox.
//!
//! System notifications are created exclusively by the notifier as a side
//! effect of a listing transition; they are immutable once created apart
//! from the read flag.

use crate::domain::value_objects::{IdentityId, NotificationId, NotificationKind, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A chat or system message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Generated identifier.
    id: NotificationId,
    /// Sending identity; the configured system identity for system messages.
    sender: IdentityId,
    /// Receiving identity.
    receiver: IdentityId,
    /// Rendered message text.
    content: String,
    /// Chat or system.
    kind: NotificationKind,
    /// When the notification was created.
    created_at: Timestamp,
    /// Whether the receiver has read it.
    is_read: bool,
}

impl Notification {
    /// Creates a system notification.
    #[must_use]
    pub fn system(sender: IdentityId, receiver: IdentityId, content: impl Into<String>) -> Self {
        Self::new(sender, receiver, content, NotificationKind::System)
    }

    /// Creates a notification of the given kind.
    #[must_use]
    pub fn new(
        sender: IdentityId,
        receiver: IdentityId,
        content: impl Into<String>,
        kind: NotificationKind,
    ) -> Self {
        Self {
            id: NotificationId::new_v4(),
            sender,
            receiver,
            content: content.into(),
            kind,
            created_at: Timestamp::now(),
            is_read: false,
        }
    }

    /// Returns the notification id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> NotificationId {
        self.id
    }

    /// Returns the sender id.
    #[inline]
    #[must_use]
    pub fn sender(&self) -> &IdentityId {
        &self.sender
    }

    /// Returns the receiver id.
    #[inline]
    #[must_use]
    pub fn receiver(&self) -> &IdentityId {
        &self.receiver
    }

    /// Returns the message text.
    #[inline]
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the notification kind.
    #[inline]
    #[must_use]
    pub fn kind(&self) -> NotificationKind {
        self.kind
    }

    /// Returns the creation time.
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns true if the receiver has read the notification.
    #[inline]
    #[must_use]
    pub fn is_read(&self) -> bool {
        self.is_read
    }

    /// Marks the notification as read.
    pub fn mark_read(&mut self) {
        self.is_read = true;
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Notification({} {} -> {})",
            self.kind, self.sender, self.receiver
        )
    }
}

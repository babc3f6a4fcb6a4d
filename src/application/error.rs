//! # Application Errors
//!
//! Error types for the application layer.
//!
//! Every business-rule violation is recovered at the engine boundary and
//! returned as one of these variants — never as an uncaught fault. The
//! REST layer owns the mapping to HTTP statuses.
//!
//! Persistence conflicts deserve a note: for the write operations of the
//! transaction engine a lost conditional update is translated into the
//! operation-appropriate business error (`ListingUnavailable` for
//! purchase, `InvalidState` for receipt confirmation) and never retried
//! silently, since a retried purchase could hand the listing to a second
//! buyer.

use crate::domain::errors::DomainError;
use crate::infrastructure::auth::AuthError;
use crate::infrastructure::persistence::RepositoryError;
use thiserror::Error;

/// Application layer error.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// The listing is not open for purchase.
    #[error("listing unavailable: {0}")]
    ListingUnavailable(String),

    /// The listing is not in the state the operation requires.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Wallet mutation amount was zero or negative.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Withdrawal exceeds the wallet balance.
    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),

    /// The caller lacks the capability or ownership the operation
    /// requires.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Missing or invalid bearer token.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The buyer named in a purchase does not exist.
    #[error("buyer not found: {0}")]
    BuyerNotFound(String),

    /// Resource not found.
    #[error("not found: {resource_type} with id {id}")]
    NotFound {
        /// Type of resource.
        resource_type: &'static str,
        /// Resource identifier.
        id: String,
    },

    /// Request validation failed.
    #[error("validation error: {0}")]
    Validation(String),

    /// A concurrent write won; the caller may re-read and decide.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A notification could not be delivered. When the accompanying state
    /// transition succeeded this travels as a response warning, not as an
    /// error.
    #[error("notification delivery failed: {0}")]
    NotificationDeliveryFailed(String),

    /// The persistence layer is unavailable or failed internally.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApplicationError {
    /// Creates a listing unavailable error.
    #[must_use]
    pub fn listing_unavailable(message: impl Into<String>) -> Self {
        Self::ListingUnavailable(message.into())
    }

    /// Creates an invalid state error.
    #[must_use]
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    /// Creates a forbidden error.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    /// Creates an unauthorized error.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    /// Creates a buyer not found error.
    #[must_use]
    pub fn buyer_not_found(id: impl Into<String>) -> Self {
        Self::BuyerNotFound(id.into())
    }

    /// Creates a not found error.
    #[must_use]
    pub fn not_found(resource_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type,
            id: id.into(),
        }
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Returns true if this is a not found style error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::BuyerNotFound(_))
    }

    /// Returns true if this is an authorization failure.
    #[must_use]
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Forbidden(_))
    }
}

impl From<DomainError> for ApplicationError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::InvalidAmount(msg) => Self::InvalidAmount(msg),
            DomainError::InsufficientFunds { .. } => Self::InsufficientFunds(err.to_string()),
            DomainError::InvalidStateTransition { .. } => Self::InvalidState(err.to_string()),
            DomainError::CannotFollowSelf(_) | DomainError::InvalidRating(_) => {
                Self::Validation(err.to_string())
            }
            DomainError::ValidationError(msg) => Self::Validation(msg),
            DomainError::Arithmetic(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity_type, id } => Self::NotFound {
                resource_type: entity_type,
                id,
            },
            RepositoryError::Duplicate { .. } | RepositoryError::Conflict { .. } => {
                Self::Conflict(err.to_string())
            }
            RepositoryError::Rejected(domain) => domain.into(),
            RepositoryError::Unavailable(msg) | RepositoryError::Internal(msg) => {
                Self::Persistence(msg)
            }
        }
    }
}

impl From<AuthError> for ApplicationError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Banned(id) => Self::Forbidden(format!("identity {id} is banned")),
            AuthError::TokenCreation(msg) => Self::Internal(msg),
            AuthError::InvalidToken(msg) => Self::Unauthorized(msg),
        }
    }
}

/// Result type for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{IdentityId, ListingStatus, Money};

    #[test]
    fn domain_insufficient_funds_maps() {
        let err: ApplicationError = DomainError::InsufficientFunds {
            requested: Money::from_major(50),
            available: Money::from_major(45),
        }
        .into();
        assert!(matches!(err, ApplicationError::InsufficientFunds(_)));
    }

    #[test]
    fn domain_transition_maps_to_invalid_state() {
        let err: ApplicationError = DomainError::InvalidStateTransition {
            from: ListingStatus::Received,
            to: ListingStatus::Sold,
        }
        .into();
        assert!(matches!(err, ApplicationError::InvalidState(_)));
    }

    #[test]
    fn repository_rejection_unwraps_to_domain_mapping() {
        let err: ApplicationError =
            RepositoryError::Rejected(DomainError::invalid_amount("must be positive")).into();
        assert!(matches!(err, ApplicationError::InvalidAmount(_)));
    }

    #[test]
    fn repository_not_found_maps() {
        let err: ApplicationError = RepositoryError::not_found("Listing", "p1").into();
        assert!(err.is_not_found());
    }

    #[test]
    fn repository_conflict_maps() {
        let err: ApplicationError = RepositoryError::conflict("Listing", "p1").into();
        assert!(matches!(err, ApplicationError::Conflict(_)));
    }

    #[test]
    fn auth_errors_map() {
        let err: ApplicationError = AuthError::InvalidToken("expired".into()).into();
        assert!(matches!(err, ApplicationError::Unauthorized(_)));

        let err: ApplicationError = AuthError::Banned(IdentityId::new("u1")).into();
        assert!(err.is_forbidden());
    }
}

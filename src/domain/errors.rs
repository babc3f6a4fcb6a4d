//! # Domain Errors
//!
//! Error types for business-rule violations.
//!
//! Every invariant enforced by the aggregates surfaces as a [`DomainError`]
//! variant; the application layer translates these into caller-facing
//! errors and HTTP statuses.

use crate::domain::value_objects::money::ArithmeticError;
use crate::domain::value_objects::{IdentityId, ListingStatus, Money};
use thiserror::Error;

/// Error type for domain rule violations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Wallet mutation amount was zero or negative.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Debit exceeds the current wallet balance.
    #[error("insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds {
        /// Amount the caller tried to debit.
        requested: Money,
        /// Balance at the time of the attempt.
        available: Money,
    },

    /// Listing state machine rejected the transition.
    #[error("invalid state transition: {from} -> {to}")]
    InvalidStateTransition {
        /// State the listing was in.
        from: ListingStatus,
        /// State the caller asked for.
        to: ListingStatus,
    },

    /// An identity tried to follow itself.
    #[error("identity {0} cannot follow itself")]
    CannotFollowSelf(IdentityId),

    /// Review rating outside the 1..=5 range.
    #[error("invalid rating: {0} (expected 1..=5)")]
    InvalidRating(i32),

    /// Generic validation failure.
    #[error("validation error: {0}")]
    ValidationError(String),

    /// Checked decimal arithmetic failed.
    #[error("arithmetic error: {0}")]
    Arithmetic(#[from] ArithmeticError),
}

impl DomainError {
    /// Creates an invalid amount error.
    #[must_use]
    pub fn invalid_amount(message: impl Into<String>) -> Self {
        Self::InvalidAmount(message.into())
    }

    /// Creates a validation error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// Returns true if this is an insufficient funds error.
    #[must_use]
    pub fn is_insufficient_funds(&self) -> bool {
        matches!(self, Self::InsufficientFunds { .. })
    }

    /// Returns true if this is a state transition error.
    #[must_use]
    pub fn is_invalid_transition(&self) -> bool {
        matches!(self, Self::InvalidStateTransition { .. })
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_funds_message() {
        let err = DomainError::InsufficientFunds {
            requested: Money::from_major(50),
            available: Money::from_major(45),
        };
        assert!(err.is_insufficient_funds());
        assert!(err.to_string().contains("50.00"));
        assert!(err.to_string().contains("45.00"));
    }

    #[test]
    fn transition_message_names_states() {
        let err = DomainError::InvalidStateTransition {
            from: ListingStatus::Received,
            to: ListingStatus::Active,
        };
        assert!(err.is_invalid_transition());
        assert!(err.to_string().contains("RECEIVED"));
        assert!(err.to_string().contains("ACTIVE"));
    }

    #[test]
    fn arithmetic_error_converts() {
        let err: DomainError = ArithmeticError::Overflow.into();
        assert!(err.to_string().contains("overflow"));
    }
}

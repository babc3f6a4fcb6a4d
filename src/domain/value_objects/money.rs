//! # Money Value Object
//!
//! Non-negative fixed-point amount with checked arithmetic.
//!
//! All wallet balances and listing prices in the marketplace are carried as
//! [`Money`]. The type wraps [`rust_decimal::Decimal`] and maintains a
//! single invariant: the amount is never negative. Arithmetic is checked,
//! so overflow and underflow surface as [`ArithmeticError`] instead of
//! wrapping or panicking.
//!
//! # Examples
//!
//! ```
//! use campus_market::domain::value_objects::money::Money;
//! use rust_decimal::Decimal;
//!
//! let price = Money::new(Decimal::new(4500, 2)).unwrap(); // 45.00
//! let balance = Money::zero().checked_add(price).unwrap();
//!
//! assert_eq!(balance, price);
//! assert!(Money::new(Decimal::new(-1, 0)).is_err());
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error type for money construction and arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArithmeticError {
    /// Amount would be negative.
    #[error("amount must not be negative: {0}")]
    Negative(Decimal),

    /// Addition overflowed the decimal range.
    #[error("amount overflow")]
    Overflow,

    /// Subtraction would produce a negative amount.
    #[error("amount underflow: {minuend} - {subtrahend}")]
    Underflow {
        /// Left-hand side of the subtraction.
        minuend: Decimal,
        /// Right-hand side of the subtraction.
        subtrahend: Decimal,
    },
}

/// Result type for money arithmetic.
pub type ArithmeticResult<T> = Result<T, ArithmeticError>;

/// A non-negative fixed-point monetary amount.
///
/// # Invariants
///
/// - The wrapped decimal is never negative.
///
/// # Examples
///
/// ```
/// use campus_market::domain::value_objects::money::Money;
///
/// let a = Money::from_major(45);
/// let b = Money::from_major(5);
///
/// assert_eq!(a.checked_sub(b).unwrap(), Money::from_major(40));
/// assert!(b.checked_sub(a).is_err());
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Money(Decimal);

impl Money {
    /// The zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Creates a money value, rejecting negative amounts.
    ///
    /// # Errors
    ///
    /// Returns [`ArithmeticError::Negative`] if `value` is below zero.
    pub fn new(value: Decimal) -> ArithmeticResult<Self> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(ArithmeticError::Negative(value));
        }
        Ok(Self(value))
    }

    /// Creates a zero amount.
    #[inline]
    #[must_use]
    pub const fn zero() -> Self {
        Self::ZERO
    }

    /// Creates an amount from whole currency units.
    #[must_use]
    pub fn from_major(units: u64) -> Self {
        Self(Decimal::from(units))
    }

    /// Returns the wrapped decimal amount.
    #[inline]
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns true if the amount is zero.
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns true if the amount is strictly positive.
    #[inline]
    #[must_use]
    pub fn is_positive(&self) -> bool {
        !self.0.is_zero()
    }

    /// Adds two amounts with overflow checking.
    ///
    /// # Errors
    ///
    /// Returns [`ArithmeticError::Overflow`] if the sum exceeds the decimal
    /// range.
    pub fn checked_add(self, other: Self) -> ArithmeticResult<Self> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or(ArithmeticError::Overflow)
    }

    /// Subtracts `other` from `self`, keeping the result non-negative.
    ///
    /// # Errors
    ///
    /// Returns [`ArithmeticError::Underflow`] if `other` exceeds `self`.
    pub fn checked_sub(self, other: Self) -> ArithmeticResult<Self> {
        if other.0 > self.0 {
            return Err(ArithmeticError::Underflow {
                minuend: self.0,
                subtrahend: other.0,
            });
        }
        self.0
            .checked_sub(other.0)
            .map(Self)
            .ok_or(ArithmeticError::Overflow)
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl TryFrom<Decimal> for Money {
    type Error = ArithmeticError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

//! # Identity Aggregate
//!
//! A marketplace account: role, ban flag, wallet balance, wishlist and
//! follow graph.
//!
//! The wallet balance can only change through [`Identity::credit`] and
//! [`Identity::debit`]; no other code path in the crate touches it. Both
//! mutators keep the balance non-negative and are driven exclusively by the
//! transaction engine (settlement on confirmed delivery, withdrawals).
//!
//! # Examples
//!
//! ```
//! use campus_market::domain::entities::identity::Identity;
//! use campus_market::domain::value_objects::{IdentityId, Money, Role};
//!
//! let mut seller = Identity::new(IdentityId::new("u1"), "alice", Role::Student);
//! seller.credit(Money::from_major(45)).unwrap();
//!
//! assert_eq!(seller.wallet_balance(), Money::from_major(45));
//! assert!(seller.debit(Money::from_major(50)).is_err());
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{IdentityId, ListingId, Money, Role, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Credit score assigned to newly registered accounts.
pub const DEFAULT_CREDIT_SCORE: i32 = 600;

/// A marketplace account.
///
/// # Invariants
///
/// - `wallet_balance` is never negative at any observable point
/// - an identity never appears in its own `following` set
/// - `role` is immutable after creation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Stable opaque identifier.
    id: IdentityId,
    /// Public display name.
    username: String,
    /// Avatar image URL, possibly empty.
    avatar_url: String,
    /// Free-text profile blurb.
    bio: String,
    /// Capability level, fixed at registration.
    role: Role,
    /// Reputation score.
    credit_score: i32,
    /// Set by moderation; banned identities cannot buy or log in.
    is_banned: bool,
    /// Wallet balance, mutated only via `credit`/`debit`.
    wallet_balance: Money,
    /// Listings the account has bookmarked.
    wishlist: BTreeSet<ListingId>,
    /// Identities this account follows (directed, asymmetric).
    following: BTreeSet<IdentityId>,
    /// When the account was registered.
    join_date: Timestamp,
    /// Version for optimistic locking.
    version: u64,
}

impl Identity {
    /// Creates a freshly registered identity with default score and an
    /// empty wallet.
    #[must_use]
    pub fn new(id: IdentityId, username: impl Into<String>, role: Role) -> Self {
        Self {
            id,
            username: username.into(),
            avatar_url: String::new(),
            bio: String::new(),
            role,
            credit_score: DEFAULT_CREDIT_SCORE,
            is_banned: false,
            wallet_balance: Money::ZERO,
            wishlist: BTreeSet::new(),
            following: BTreeSet::new(),
            join_date: Timestamp::now(),
            version: 1,
        }
    }

    /// Sets the avatar URL at construction time.
    #[must_use]
    pub fn with_avatar_url(mut self, url: impl Into<String>) -> Self {
        self.avatar_url = url.into();
        self
    }

    /// Sets the profile blurb at construction time.
    #[must_use]
    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = bio.into();
        self
    }

    /// Reconstructs an identity from stored parts.
    ///
    /// Bypasses registration defaults; intended for trusted storage only.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: IdentityId,
        username: String,
        avatar_url: String,
        bio: String,
        role: Role,
        credit_score: i32,
        is_banned: bool,
        wallet_balance: Money,
        wishlist: BTreeSet<ListingId>,
        following: BTreeSet<IdentityId>,
        join_date: Timestamp,
        version: u64,
    ) -> Self {
        Self {
            id,
            username,
            avatar_url,
            bio,
            role,
            credit_score,
            is_banned,
            wallet_balance,
            wishlist,
            following,
            join_date,
            version,
        }
    }

    // ========== Accessors ==========

    /// Returns the identity id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> &IdentityId {
        &self.id
    }

    /// Returns the display name.
    #[inline]
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Returns the avatar URL.
    #[inline]
    #[must_use]
    pub fn avatar_url(&self) -> &str {
        &self.avatar_url
    }

    /// Returns the profile blurb.
    #[inline]
    #[must_use]
    pub fn bio(&self) -> &str {
        &self.bio
    }

    /// Returns the account role.
    #[inline]
    #[must_use]
    pub fn role(&self) -> Role {
        self.role
    }

    /// Returns the credit score.
    #[inline]
    #[must_use]
    pub fn credit_score(&self) -> i32 {
        self.credit_score
    }

    /// Returns true if moderation has banned this account.
    #[inline]
    #[must_use]
    pub fn is_banned(&self) -> bool {
        self.is_banned
    }

    /// Returns the current wallet balance.
    #[inline]
    #[must_use]
    pub fn wallet_balance(&self) -> Money {
        self.wallet_balance
    }

    /// Returns the wishlist.
    #[inline]
    #[must_use]
    pub fn wishlist(&self) -> &BTreeSet<ListingId> {
        &self.wishlist
    }

    /// Returns the set of followed identities.
    #[inline]
    #[must_use]
    pub fn following(&self) -> &BTreeSet<IdentityId> {
        &self.following
    }

    /// Returns the registration time.
    #[inline]
    #[must_use]
    pub fn join_date(&self) -> Timestamp {
        self.join_date
    }

    /// Returns the version for optimistic locking.
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Capability predicate consumed by moderation actions.
    #[inline]
    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    // ========== Wallet ==========

    /// Credits the wallet.
    ///
    /// The only crediting path in the system; called when a buyer confirms
    /// delivery of one of this account's listings.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAmount` if `amount` is not strictly
    /// positive, `DomainError::Arithmetic` on decimal overflow.
    pub fn credit(&mut self, amount: Money) -> DomainResult<Money> {
        if !amount.is_positive() {
            return Err(DomainError::invalid_amount(
                "credit amount must be positive",
            ));
        }
        self.wallet_balance = self.wallet_balance.checked_add(amount)?;
        self.touch();
        Ok(self.wallet_balance)
    }

    /// Debits the wallet.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAmount` if `amount` is not strictly
    /// positive, `DomainError::InsufficientFunds` if `amount` exceeds the
    /// current balance. A failed debit leaves the balance untouched.
    pub fn debit(&mut self, amount: Money) -> DomainResult<Money> {
        if !amount.is_positive() {
            return Err(DomainError::invalid_amount("debit amount must be positive"));
        }
        if amount > self.wallet_balance {
            return Err(DomainError::InsufficientFunds {
                requested: amount,
                available: self.wallet_balance,
            });
        }
        self.wallet_balance = self.wallet_balance.checked_sub(amount)?;
        self.touch();
        Ok(self.wallet_balance)
    }

    // ========== Social ==========

    /// Adds the listing to the wishlist, or removes it if already present.
    ///
    /// Returns true if the listing is on the wishlist afterwards.
    pub fn toggle_wishlist(&mut self, listing_id: ListingId) -> bool {
        let added = if self.wishlist.contains(&listing_id) {
            self.wishlist.remove(&listing_id);
            false
        } else {
            self.wishlist.insert(listing_id);
            true
        };
        self.touch();
        added
    }

    /// Follows the target identity, or unfollows it if already followed.
    ///
    /// Returns true if the target is followed afterwards.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::CannotFollowSelf` if `target` is this identity.
    pub fn toggle_follow(&mut self, target: IdentityId) -> DomainResult<bool> {
        if target == self.id {
            return Err(DomainError::CannotFollowSelf(target));
        }
        let added = if self.following.contains(&target) {
            self.following.remove(&target);
            false
        } else {
            self.following.insert(target);
            true
        };
        self.touch();
        Ok(added)
    }

    // ========== Moderation ==========

    /// Sets the ban flag. Moderation-only path.
    pub fn set_banned(&mut self, banned: bool) {
        self.is_banned = banned;
        self.touch();
    }

    fn touch(&mut self) {
        self.version = self.version.saturating_add(1);
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({} {} [{}])", self.id, self.username, self.role)
    }
}

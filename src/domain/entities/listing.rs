//! # Listing Aggregate
//!
//! A product offered for sale and its lifecycle.
//!
//! # State Machine
//!
//! ```text
//! Active → Sold → Received
//!   ↓       ↓
//!   └───────┴→ Banned
//! ```
//!
//! Status transitions happen only through [`Listing::mark_sold`],
//! [`Listing::confirm_received`] and [`Listing::moderate`]; content fields
//! (price, tags, title) are immutable once the listing exists, so every
//! transition leaves them untouched.
//!
//! # Examples
//!
//! ```
//! use campus_market::domain::entities::listing::Listing;
//! use campus_market::domain::value_objects::{IdentityId, ListingId, ListingStatus, Money};
//!
//! let mut listing = Listing::builder(
//!     ListingId::new("p1"),
//!     IdentityId::new("u1"),
//!     "Desk lamp",
//!     Money::from_major(45),
//! )
//! .build()
//! .unwrap();
//!
//! listing.mark_sold(IdentityId::new("u2")).unwrap();
//! assert_eq!(listing.status(), ListingStatus::Sold);
//! ```

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::value_objects::{IdentityId, ListingId, ListingStatus, Money, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A product offered for sale by a seller identity.
///
/// # Invariants
///
/// - `buyer` is `None` while the listing has never left `Active`
/// - `buyer` is `Some` from the moment the listing is sold, including a
///   later ban of the sold listing
/// - `price` and `tags` never change after creation
/// - `view_count` is monotonic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    /// Stable opaque identifier.
    id: ListingId,
    /// Owning seller; required and immutable.
    seller: IdentityId,
    /// Buyer, set exactly once when the listing is sold.
    buyer: Option<IdentityId>,
    /// Short product title.
    title: String,
    /// Longer free-text description.
    description: String,
    /// Category label used by catalog filters.
    category: String,
    /// Product image URL, possibly empty.
    image_url: String,
    /// Asking price; strictly positive, immutable.
    price: Money,
    /// Current lifecycle state.
    status: ListingStatus,
    /// Monotonic view counter.
    view_count: u64,
    /// Free-form tags, immutable after creation.
    tags: BTreeSet<String>,
    /// When the listing was created.
    created_at: Timestamp,
    /// Version for optimistic locking.
    version: u64,
}

impl Listing {
    /// Returns a builder for constructing a listing.
    #[must_use]
    pub fn builder(
        id: ListingId,
        seller: IdentityId,
        title: impl Into<String>,
        price: Money,
    ) -> ListingBuilder {
        ListingBuilder::new(id, seller, title, price)
    }

    /// Reconstructs a listing from stored parts.
    ///
    /// Bypasses validation; intended for trusted storage only.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn from_parts(
        id: ListingId,
        seller: IdentityId,
        buyer: Option<IdentityId>,
        title: String,
        description: String,
        category: String,
        image_url: String,
        price: Money,
        status: ListingStatus,
        view_count: u64,
        tags: BTreeSet<String>,
        created_at: Timestamp,
        version: u64,
    ) -> Self {
        Self {
            id,
            seller,
            buyer,
            title,
            description,
            category,
            image_url,
            price,
            status,
            view_count,
            tags,
            created_at,
            version,
        }
    }

    // ========== Accessors ==========

    /// Returns the listing id.
    #[inline]
    #[must_use]
    pub fn id(&self) -> &ListingId {
        &self.id
    }

    /// Returns the seller id.
    #[inline]
    #[must_use]
    pub fn seller(&self) -> &IdentityId {
        &self.seller
    }

    /// Returns the buyer id, if the listing has been sold.
    #[inline]
    #[must_use]
    pub fn buyer(&self) -> Option<&IdentityId> {
        self.buyer.as_ref()
    }

    /// Returns the title.
    #[inline]
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[inline]
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the category label.
    #[inline]
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Returns the image URL.
    #[inline]
    #[must_use]
    pub fn image_url(&self) -> &str {
        &self.image_url
    }

    /// Returns the asking price.
    #[inline]
    #[must_use]
    pub fn price(&self) -> Money {
        self.price
    }

    /// Returns the current status.
    #[inline]
    #[must_use]
    pub fn status(&self) -> ListingStatus {
        self.status
    }

    /// Returns the view counter.
    #[inline]
    #[must_use]
    pub fn view_count(&self) -> u64 {
        self.view_count
    }

    /// Returns the tags.
    #[inline]
    #[must_use]
    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Returns the creation time.
    #[inline]
    #[must_use]
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Returns the version for optimistic locking.
    #[inline]
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns true if the listing is still purchasable.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self.status, ListingStatus::Active)
    }

    // ========== State Transitions ==========

    /// Marks the listing as sold to `buyer`.
    ///
    /// Transitions: Active → Sold. The wallet is deliberately untouched
    /// here; settlement happens on confirmed delivery.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` if the listing is not
    /// `Active`.
    pub fn mark_sold(&mut self, buyer: IdentityId) -> DomainResult<()> {
        self.transition_to(ListingStatus::Sold)?;
        self.buyer = Some(buyer);
        Ok(())
    }

    /// Marks the listing as received by the buyer.
    ///
    /// Transitions: Sold → Received. The caller settles the seller wallet
    /// after this succeeds.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` if the listing is not
    /// `Sold`.
    pub fn confirm_received(&mut self) -> DomainResult<()> {
        self.transition_to(ListingStatus::Received)
    }

    /// Applies a moderation transition.
    ///
    /// The only legal moderation target is `Banned` (from `Active` or
    /// `Sold`); a sold listing keeps its buyer reference through the ban.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStateTransition` for any target other
    /// than `Banned` or when the listing is already terminal.
    pub fn moderate(&mut self, target: ListingStatus) -> DomainResult<()> {
        if target != ListingStatus::Banned {
            return Err(DomainError::InvalidStateTransition {
                from: self.status,
                to: target,
            });
        }
        self.transition_to(target)
    }

    /// Increments the view counter.
    ///
    /// Deliberately does not bump the version: concurrent views must never
    /// make a purchase lose its conditional update.
    pub fn record_view(&mut self) {
        self.view_count = self.view_count.saturating_add(1);
    }

    fn transition_to(&mut self, target: ListingStatus) -> DomainResult<()> {
        if !self.status.can_transition_to(target) {
            return Err(DomainError::InvalidStateTransition {
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        self.version = self.version.saturating_add(1);
        Ok(())
    }
}

impl fmt::Display for Listing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Listing({} '{}' {} [{}])",
            self.id, self.title, self.price, self.status
        )
    }
}

/// Builder for constructing [`Listing`] instances.
///
/// # Examples
///
/// ```
/// use campus_market::domain::entities::listing::Listing;
/// use campus_market::domain::value_objects::{IdentityId, ListingId, Money};
///
/// let listing = Listing::builder(
///     ListingId::new("p1"),
///     IdentityId::new("u1"),
///     "Calculus textbook",
///     Money::from_major(20),
/// )
/// .description("Second edition, good condition")
/// .category("books")
/// .tag("math")
/// .build()
/// .unwrap();
///
/// assert_eq!(listing.category(), "books");
/// ```
#[derive(Debug, Clone)]
pub struct ListingBuilder {
    id: ListingId,
    seller: IdentityId,
    title: String,
    price: Money,
    description: String,
    category: String,
    image_url: String,
    tags: BTreeSet<String>,
}

impl ListingBuilder {
    /// Creates a new builder with the required fields.
    #[must_use]
    pub fn new(
        id: ListingId,
        seller: IdentityId,
        title: impl Into<String>,
        price: Money,
    ) -> Self {
        Self {
            id,
            seller,
            title: title.into(),
            price,
            description: String::new(),
            category: String::new(),
            image_url: String::new(),
            tags: BTreeSet::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the category label.
    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Sets the image URL.
    #[must_use]
    pub fn image_url(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = image_url.into();
        self
    }

    /// Adds a single tag.
    #[must_use]
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    /// Replaces the tag set.
    #[must_use]
    pub fn tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }

    /// Builds the listing with validation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAmount` if the price is not strictly
    /// positive, `DomainError::ValidationError` if the title is blank.
    pub fn build(self) -> DomainResult<Listing> {
        if !self.price.is_positive() {
            return Err(DomainError::invalid_amount("price must be positive"));
        }
        if self.title.trim().is_empty() {
            return Err(DomainError::validation("title must not be blank"));
        }
        Ok(Listing {
            id: self.id,
            seller: self.seller,
            buyer: None,
            title: self.title,
            description: self.description,
            category: self.category,
            image_url: self.image_url,
            price: self.price,
            status: ListingStatus::Active,
            view_count: 0,
            tags: self.tags,
            created_at: Timestamp::now(),
            version: 1,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn lamp() -> Listing {
        Listing::builder(
            ListingId::new("p1"),
            IdentityId::new("u1"),
            "Desk lamp",
            Money::from_major(45),
        )
        .description("Warm light, barely used")
        .category("home")
        .tag("lighting")
        .tag("dorm")
        .build()
        .unwrap()
    }

    mod construction {
        use super::*;

        #[test]
        fn builder_creates_active_listing() {
            let listing = lamp();
            assert_eq!(listing.status(), ListingStatus::Active);
            assert!(listing.buyer().is_none());
            assert_eq!(listing.view_count(), 0);
            assert_eq!(listing.version(), 1);
        }

        #[test]
        fn build_rejects_zero_price() {
            let result = Listing::builder(
                ListingId::new("p1"),
                IdentityId::new("u1"),
                "Free stuff",
                Money::ZERO,
            )
            .build();
            assert!(matches!(result, Err(DomainError::InvalidAmount(_))));
        }

        #[test]
        fn build_rejects_blank_title() {
            let result = Listing::builder(
                ListingId::new("p1"),
                IdentityId::new("u1"),
                "   ",
                Money::from_major(5),
            )
            .build();
            assert!(matches!(result, Err(DomainError::ValidationError(_))));
        }
    }

    mod transitions {
        use super::*;

        #[test]
        fn mark_sold_sets_buyer() {
            let mut listing = lamp();
            listing.mark_sold(IdentityId::new("u2")).unwrap();

            assert_eq!(listing.status(), ListingStatus::Sold);
            assert_eq!(listing.buyer(), Some(&IdentityId::new("u2")));
            assert_eq!(listing.version(), 2);
        }

        #[test]
        fn mark_sold_twice_fails() {
            let mut listing = lamp();
            listing.mark_sold(IdentityId::new("u2")).unwrap();

            let result = listing.mark_sold(IdentityId::new("u3"));
            assert!(matches!(
                result,
                Err(DomainError::InvalidStateTransition { .. })
            ));
            // The first buyer is preserved.
            assert_eq!(listing.buyer(), Some(&IdentityId::new("u2")));
        }

        #[test]
        fn confirm_received_from_sold() {
            let mut listing = lamp();
            listing.mark_sold(IdentityId::new("u2")).unwrap();
            listing.confirm_received().unwrap();
            assert_eq!(listing.status(), ListingStatus::Received);
        }

        #[test]
        fn confirm_received_requires_sold() {
            let mut listing = lamp();
            let result = listing.confirm_received();
            assert!(matches!(
                result,
                Err(DomainError::InvalidStateTransition { .. })
            ));
        }

        #[test]
        fn received_is_terminal() {
            let mut listing = lamp();
            listing.mark_sold(IdentityId::new("u2")).unwrap();
            listing.confirm_received().unwrap();

            assert!(listing.confirm_received().is_err());
            assert!(listing.moderate(ListingStatus::Banned).is_err());
            assert!(listing.mark_sold(IdentityId::new("u3")).is_err());
        }

        #[test]
        fn moderate_bans_active_listing() {
            let mut listing = lamp();
            listing.moderate(ListingStatus::Banned).unwrap();
            assert_eq!(listing.status(), ListingStatus::Banned);
            assert!(listing.buyer().is_none());
        }

        #[test]
        fn moderate_bans_sold_listing_keeping_buyer() {
            let mut listing = lamp();
            listing.mark_sold(IdentityId::new("u2")).unwrap();
            listing.moderate(ListingStatus::Banned).unwrap();

            assert_eq!(listing.status(), ListingStatus::Banned);
            assert_eq!(listing.buyer(), Some(&IdentityId::new("u2")));
        }

        #[test]
        fn moderate_rejects_non_ban_targets() {
            let mut listing = lamp();
            for target in [
                ListingStatus::Active,
                ListingStatus::Sold,
                ListingStatus::Received,
            ] {
                assert!(matches!(
                    listing.moderate(target),
                    Err(DomainError::InvalidStateTransition { .. })
                ));
            }
            assert_eq!(listing.status(), ListingStatus::Active);
        }

        #[test]
        fn price_and_tags_survive_transitions() {
            let mut listing = lamp();
            let price = listing.price();
            let tags = listing.tags().clone();

            listing.mark_sold(IdentityId::new("u2")).unwrap();
            listing.confirm_received().unwrap();

            assert_eq!(listing.price(), price);
            assert_eq!(listing.tags(), &tags);
        }
    }

    mod views {
        use super::*;

        #[test]
        fn record_view_is_monotonic() {
            let mut listing = lamp();
            listing.record_view();
            listing.record_view();
            assert_eq!(listing.view_count(), 2);
        }

        #[test]
        fn record_view_does_not_bump_version() {
            let mut listing = lamp();
            let version = listing.version();
            listing.record_view();
            assert_eq!(listing.version(), version);
        }
    }

    mod serde_behavior {
        use super::*;

        #[test]
        fn roundtrip() {
            let listing = lamp();
            let json = serde_json::to_string(&listing).unwrap();
            let back: Listing = serde_json::from_str(&json).unwrap();
            assert_eq!(back, listing);
        }
    }
}

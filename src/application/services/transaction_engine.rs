//! # Transaction Engine
//!
//! Orchestrates the purchase flow, delivery confirmation, moderation
//! takedowns and wallet withdrawals.
//!
//! The engine is logic, not storage: every status change is written
//! through the persistence layer's conditional update ("swap only while
//! the row is still in the expected status"), so two concurrent purchases
//! of the same listing cannot both succeed — one wins the swap, the other
//! comes back as a conflict and is translated into the business error the
//! caller expects. Conflicts on these writes are never retried silently.
//!
//! Money moves exactly once per listing: the seller is credited when the
//! buyer confirms delivery, not at purchase time. Until then the price is
//! only a number on the listing — an escrow-style hold that protects the
//! buyer against non-delivery.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::application::services::notifier::Notifier;
use crate::domain::entities::listing::Listing;
use crate::domain::value_objects::{IdentityId, ListingId, ListingStatus, Money};
use crate::infrastructure::persistence::{
    IdentityRepository, ListingRepository, RepositoryError,
};
use std::sync::Arc;

/// Result of a successful purchase.
#[derive(Debug, Clone)]
pub struct PurchaseOutcome {
    /// The listing after the transition to `Sold`.
    pub listing: Listing,
    /// Set when the seller notification could not be delivered; the
    /// purchase itself stands.
    pub warning: Option<String>,
}

/// Result of a successful delivery confirmation.
#[derive(Debug, Clone)]
pub struct ReceiptOutcome {
    /// The listing after the transition to `Received`.
    pub listing: Listing,
    /// Seller wallet balance after settlement.
    pub seller_balance: Money,
}

/// Result of a successful moderation action.
#[derive(Debug, Clone)]
pub struct ModerationOutcome {
    /// The listing after the transition.
    pub listing: Listing,
    /// Set when the takedown notice could not be delivered.
    pub warning: Option<String>,
}

/// Result of a successful withdrawal.
#[derive(Debug, Clone)]
pub struct WithdrawalOutcome {
    /// Wallet balance after the debit.
    pub balance: Money,
    /// Where the payout should go. Recorded and echoed only; no external
    /// payout is executed here.
    pub payout_target: String,
}

/// The purchase/escrow state machine over listings and wallets.
#[derive(Debug, Clone)]
pub struct TransactionEngine {
    identities: Arc<dyn IdentityRepository>,
    listings: Arc<dyn ListingRepository>,
    notifier: Notifier,
    /// Deployment policy: whether moderation may ban a listing that has
    /// already been sold.
    allow_ban_sold: bool,
}

impl TransactionEngine {
    /// Creates an engine over the given repositories.
    #[must_use]
    pub fn new(
        identities: Arc<dyn IdentityRepository>,
        listings: Arc<dyn ListingRepository>,
        notifier: Notifier,
        allow_ban_sold: bool,
    ) -> Self {
        Self {
            identities,
            listings,
            notifier,
            allow_ban_sold,
        }
    }

    /// Purchases an active listing on behalf of `buyer_id`.
    ///
    /// The wallet is deliberately untouched here: funds settle when the
    /// buyer confirms delivery. The seller receives a system notification
    /// carrying the delivery address; if that notification cannot be
    /// delivered the purchase still stands and the failure is returned as
    /// a warning.
    ///
    /// # Errors
    ///
    /// - `ApplicationError::BuyerNotFound` if the buyer does not exist
    /// - `ApplicationError::Forbidden` if the buyer is banned
    /// - `ApplicationError::NotFound` if the listing does not exist
    /// - `ApplicationError::ListingUnavailable` if the listing is not
    ///   `Active`, including when a concurrent purchase wins the race
    pub async fn purchase(
        &self,
        listing_id: &ListingId,
        buyer_id: &IdentityId,
        delivery_address: &str,
    ) -> ApplicationResult<PurchaseOutcome> {
        let buyer = self
            .identities
            .get(buyer_id)
            .await?
            .ok_or_else(|| ApplicationError::buyer_not_found(buyer_id.as_str()))?;
        if buyer.is_banned() {
            return Err(ApplicationError::forbidden(format!(
                "buyer {buyer_id} is banned"
            )));
        }

        let mut listing = self
            .listings
            .get(listing_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Listing", listing_id.as_str()))?;

        listing.mark_sold(buyer.id().clone()).map_err(|_| {
            ApplicationError::listing_unavailable(format!(
                "listing {listing_id} is not open for purchase"
            ))
        })?;

        self.listings
            .update_if_status(&listing, ListingStatus::Active)
            .await
            .map_err(|err| match err {
                RepositoryError::Conflict { .. } => ApplicationError::listing_unavailable(
                    format!("listing {listing_id} was purchased by someone else"),
                ),
                other => other.into(),
            })?;

        tracing::info!(listing = %listing_id, buyer = %buyer_id, "listing purchased");

        let warning = match self
            .notifier
            .purchase_confirmation(listing.seller(), listing.title(), delivery_address)
            .await
        {
            Ok(_) => None,
            Err(err) => {
                tracing::warn!(
                    listing = %listing_id,
                    error = %err,
                    "purchase stands but seller notification was not delivered"
                );
                Some(err.to_string())
            }
        };

        Ok(PurchaseOutcome { listing, warning })
    }

    /// Confirms delivery of a sold listing and settles the seller.
    ///
    /// This is the only point at which a seller is paid. The requester
    /// must be the recorded buyer; the ownership check runs before the
    /// state check.
    ///
    /// # Errors
    ///
    /// - `ApplicationError::NotFound` if the listing does not exist
    /// - `ApplicationError::Forbidden` if the requester is not the
    ///   recorded buyer
    /// - `ApplicationError::InvalidState` if the listing is not `Sold`,
    ///   including when a concurrent transition wins the race
    pub async fn confirm_receipt(
        &self,
        listing_id: &ListingId,
        requester: &IdentityId,
    ) -> ApplicationResult<ReceiptOutcome> {
        let mut listing = self
            .listings
            .get(listing_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Listing", listing_id.as_str()))?;

        if listing.buyer() != Some(requester) {
            return Err(ApplicationError::forbidden(
                "only the recorded buyer can confirm receipt",
            ));
        }

        listing.confirm_received()?;

        self.listings
            .update_if_status(&listing, ListingStatus::Sold)
            .await
            .map_err(|err| match err {
                RepositoryError::Conflict { .. } => ApplicationError::invalid_state(format!(
                    "listing {listing_id} is no longer awaiting delivery confirmation"
                )),
                other => other.into(),
            })?;

        let seller = self
            .identities
            .credit_wallet(listing.seller(), listing.price())
            .await?;

        tracing::info!(
            listing = %listing_id,
            seller = %listing.seller(),
            amount = %listing.price(),
            "delivery confirmed, seller settled"
        );

        Ok(ReceiptOutcome {
            seller_balance: seller.wallet_balance(),
            listing,
        })
    }

    /// Applies a moderation transition to a listing.
    ///
    /// Only admins may moderate. The only legal target is `Banned`
    /// (from `Active`, or from `Sold` when deployment policy allows).
    /// Entering `Banned` emits a takedown notice to the seller; a blank
    /// reason falls back to the configured default text. The notice
    /// always addresses the seller, even when a buyer exists and funds
    /// are conceptually held.
    ///
    /// # Errors
    ///
    /// - `ApplicationError::Forbidden` if the caller is not an admin
    /// - `ApplicationError::NotFound` if the listing does not exist
    /// - `ApplicationError::InvalidState` for illegal targets, terminal
    ///   listings, or a lost race
    pub async fn moderate(
        &self,
        listing_id: &ListingId,
        moderator_id: &IdentityId,
        target: ListingStatus,
        reason: &str,
    ) -> ApplicationResult<ModerationOutcome> {
        let moderator = self
            .identities
            .get(moderator_id)
            .await?
            .ok_or_else(|| ApplicationError::forbidden("unknown moderator"))?;
        if !moderator.is_admin() {
            return Err(ApplicationError::forbidden(
                "moderation requires the admin role",
            ));
        }

        let mut listing = self
            .listings
            .get(listing_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Listing", listing_id.as_str()))?;

        let previous = listing.status();
        if target == ListingStatus::Banned
            && previous == ListingStatus::Sold
            && !self.allow_ban_sold
        {
            return Err(ApplicationError::invalid_state(
                "sold listings cannot be banned under the current policy",
            ));
        }

        listing.moderate(target)?;

        self.listings
            .update_if_status(&listing, previous)
            .await
            .map_err(|err| match err {
                RepositoryError::Conflict { .. } => ApplicationError::invalid_state(format!(
                    "listing {listing_id} changed state during moderation"
                )),
                other => other.into(),
            })?;

        tracing::info!(
            listing = %listing_id,
            moderator = %moderator_id,
            from = %previous,
            to = %target,
            "listing moderated"
        );

        let warning = match self
            .notifier
            .takedown_notice(listing.seller(), listing.title(), reason)
            .await
        {
            Ok(_) => None,
            Err(err) => {
                tracing::warn!(
                    listing = %listing_id,
                    error = %err,
                    "takedown stands but seller notification was not delivered"
                );
                Some(err.to_string())
            }
        };

        Ok(ModerationOutcome { listing, warning })
    }

    /// Debits the identity's wallet for an external payout.
    ///
    /// No payout is executed in this system; `payout_target` is recorded
    /// and echoed back only. A failed withdrawal never mutates the
    /// balance.
    ///
    /// # Errors
    ///
    /// - `ApplicationError::InvalidAmount` if the amount is not positive
    /// - `ApplicationError::InsufficientFunds` if the amount exceeds the
    ///   balance
    /// - `ApplicationError::NotFound` if the identity does not exist
    pub async fn withdraw(
        &self,
        identity_id: &IdentityId,
        amount: Money,
        payout_target: &str,
    ) -> ApplicationResult<WithdrawalOutcome> {
        if !amount.is_positive() {
            return Err(ApplicationError::InvalidAmount(
                "withdrawal amount must be positive".to_owned(),
            ));
        }

        let identity = self.identities.debit_wallet(identity_id, amount).await?;

        tracing::info!(
            identity = %identity_id,
            amount = %amount,
            payout_target,
            "withdrawal recorded"
        );

        Ok(WithdrawalOutcome {
            balance: identity.wallet_balance(),
            payout_target: payout_target.to_owned(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::entities::identity::Identity;
    use crate::domain::value_objects::Role;
    use crate::infrastructure::persistence::NotificationRepository;
    use crate::infrastructure::persistence::in_memory::{
        InMemoryIdentityRepository, InMemoryListingRepository, InMemoryNotificationRepository,
    };

    struct Fixture {
        engine: TransactionEngine,
        identities: Arc<InMemoryIdentityRepository>,
        listings: Arc<InMemoryListingRepository>,
        notifications: Arc<InMemoryNotificationRepository>,
    }

    async fn fixture() -> Fixture {
        fixture_with_policy(true).await
    }

    async fn fixture_with_policy(allow_ban_sold: bool) -> Fixture {
        let identities = Arc::new(InMemoryIdentityRepository::new());
        let listings = Arc::new(InMemoryListingRepository::new());
        let notifications = Arc::new(InMemoryNotificationRepository::new());

        let system = Identity::new(IdentityId::new("system"), "system", Role::Admin);
        identities.insert(&system).await.unwrap();
        identities
            .insert(&Identity::new(IdentityId::new("u1"), "alice", Role::Student))
            .await
            .unwrap();
        identities
            .insert(&Identity::new(IdentityId::new("u2"), "bob", Role::Student))
            .await
            .unwrap();
        identities
            .insert(&Identity::new(IdentityId::new("a1"), "mod", Role::Admin))
            .await
            .unwrap();

        let listing = Listing::builder(
            ListingId::new("p1"),
            IdentityId::new("u1"),
            "Desk lamp",
            Money::from_major(45),
        )
        .tag("lighting")
        .build()
        .unwrap();
        listings.insert(&listing).await.unwrap();

        let notifier = Notifier::new(
            notifications.clone(),
            IdentityId::new("system"),
            "violation of marketplace policy",
        );
        let engine = TransactionEngine::new(
            identities.clone(),
            listings.clone(),
            notifier,
            allow_ban_sold,
        );

        Fixture {
            engine,
            identities,
            listings,
            notifications,
        }
    }

    mod purchase {
        use super::*;

        #[tokio::test]
        async fn happy_path_transitions_and_notifies() {
            let f = fixture().await;

            let outcome = f
                .engine
                .purchase(&ListingId::new("p1"), &IdentityId::new("u2"), "Room 12")
                .await
                .unwrap();

            assert_eq!(outcome.listing.status(), ListingStatus::Sold);
            assert_eq!(outcome.listing.buyer(), Some(&IdentityId::new("u2")));
            assert!(outcome.warning.is_none());

            // Seller got a system notification mentioning the address.
            let inbox = f
                .notifications
                .find_by_receiver(&IdentityId::new("u1"))
                .await
                .unwrap();
            assert_eq!(inbox.len(), 1);
            assert!(inbox[0].content().contains("Room 12"));

            // No wallet movement at purchase time.
            let seller = f.identities.get(&IdentityId::new("u1")).await.unwrap();
            assert!(seller.unwrap().wallet_balance().is_zero());
        }

        #[tokio::test]
        async fn unknown_buyer_fails() {
            let f = fixture().await;
            let result = f
                .engine
                .purchase(&ListingId::new("p1"), &IdentityId::new("ghost"), "Room 12")
                .await;
            assert!(matches!(result, Err(ApplicationError::BuyerNotFound(_))));
        }

        #[tokio::test]
        async fn banned_buyer_is_forbidden() {
            let f = fixture().await;
            let mut buyer = f
                .identities
                .get(&IdentityId::new("u2"))
                .await
                .unwrap()
                .unwrap();
            buyer.set_banned(true);
            f.identities.save(&buyer).await.unwrap();

            let result = f
                .engine
                .purchase(&ListingId::new("p1"), &IdentityId::new("u2"), "Room 12")
                .await;
            assert!(matches!(result, Err(ApplicationError::Forbidden(_))));
        }

        #[tokio::test]
        async fn sold_listing_is_unavailable() {
            let f = fixture().await;
            f.engine
                .purchase(&ListingId::new("p1"), &IdentityId::new("u2"), "Room 12")
                .await
                .unwrap();

            let result = f
                .engine
                .purchase(&ListingId::new("p1"), &IdentityId::new("u2"), "Room 13")
                .await;
            assert!(matches!(
                result,
                Err(ApplicationError::ListingUnavailable(_))
            ));
        }

        #[tokio::test]
        async fn unknown_listing_fails() {
            let f = fixture().await;
            let result = f
                .engine
                .purchase(&ListingId::new("ghost"), &IdentityId::new("u2"), "Room 12")
                .await;
            assert!(matches!(result, Err(ApplicationError::NotFound { .. })));
        }
    }

    mod confirm_receipt {
        use super::*;

        #[tokio::test]
        async fn settles_seller_exactly_once() {
            let f = fixture().await;
            f.engine
                .purchase(&ListingId::new("p1"), &IdentityId::new("u2"), "Room 12")
                .await
                .unwrap();

            let outcome = f
                .engine
                .confirm_receipt(&ListingId::new("p1"), &IdentityId::new("u2"))
                .await
                .unwrap();

            assert_eq!(outcome.listing.status(), ListingStatus::Received);
            assert_eq!(outcome.seller_balance, Money::from_major(45));

            // Second confirmation must fail and not pay twice.
            let result = f
                .engine
                .confirm_receipt(&ListingId::new("p1"), &IdentityId::new("u2"))
                .await;
            assert!(matches!(result, Err(ApplicationError::InvalidState(_))));

            let seller = f
                .identities
                .get(&IdentityId::new("u1"))
                .await
                .unwrap()
                .unwrap();
            assert_eq!(seller.wallet_balance(), Money::from_major(45));
        }

        #[tokio::test]
        async fn stranger_cannot_confirm() {
            let f = fixture().await;
            f.identities
                .insert(&Identity::new(IdentityId::new("u3"), "eve", Role::Student))
                .await
                .unwrap();
            f.engine
                .purchase(&ListingId::new("p1"), &IdentityId::new("u2"), "Room 12")
                .await
                .unwrap();

            let result = f
                .engine
                .confirm_receipt(&ListingId::new("p1"), &IdentityId::new("u3"))
                .await;
            assert!(matches!(result, Err(ApplicationError::Forbidden(_))));
        }

        #[tokio::test]
        async fn active_listing_has_no_buyer_to_confirm() {
            let f = fixture().await;
            let result = f
                .engine
                .confirm_receipt(&ListingId::new("p1"), &IdentityId::new("u2"))
                .await;
            assert!(matches!(result, Err(ApplicationError::Forbidden(_))));
        }
    }

    mod moderate {
        use super::*;

        #[tokio::test]
        async fn admin_bans_active_listing_with_notice() {
            let f = fixture().await;

            let outcome = f
                .engine
                .moderate(
                    &ListingId::new("p1"),
                    &IdentityId::new("a1"),
                    ListingStatus::Banned,
                    "policy violation",
                )
                .await
                .unwrap();

            assert_eq!(outcome.listing.status(), ListingStatus::Banned);

            let inbox = f
                .notifications
                .find_by_receiver(&IdentityId::new("u1"))
                .await
                .unwrap();
            assert_eq!(inbox.len(), 1);
            assert!(inbox[0].content().contains("policy violation"));
        }

        #[tokio::test]
        async fn blank_reason_falls_back_to_default() {
            let f = fixture().await;
            f.engine
                .moderate(
                    &ListingId::new("p1"),
                    &IdentityId::new("a1"),
                    ListingStatus::Banned,
                    "",
                )
                .await
                .unwrap();

            let inbox = f
                .notifications
                .find_by_receiver(&IdentityId::new("u1"))
                .await
                .unwrap();
            assert!(inbox[0].content().contains("violation of marketplace policy"));
        }

        #[tokio::test]
        async fn student_cannot_moderate() {
            let f = fixture().await;
            let result = f
                .engine
                .moderate(
                    &ListingId::new("p1"),
                    &IdentityId::new("u2"),
                    ListingStatus::Banned,
                    "nope",
                )
                .await;
            assert!(matches!(result, Err(ApplicationError::Forbidden(_))));

            // Status untouched.
            let listing = f
                .listings
                .get(&ListingId::new("p1"))
                .await
                .unwrap()
                .unwrap();
            assert_eq!(listing.status(), ListingStatus::Active);
        }

        #[tokio::test]
        async fn sold_listing_ban_follows_policy() {
            let f = fixture_with_policy(false).await;
            f.engine
                .purchase(&ListingId::new("p1"), &IdentityId::new("u2"), "Room 12")
                .await
                .unwrap();

            let result = f
                .engine
                .moderate(
                    &ListingId::new("p1"),
                    &IdentityId::new("a1"),
                    ListingStatus::Banned,
                    "fraud",
                )
                .await;
            assert!(matches!(result, Err(ApplicationError::InvalidState(_))));
        }

        #[tokio::test]
        async fn sold_listing_ban_notifies_seller_only() {
            let f = fixture().await;
            f.engine
                .purchase(&ListingId::new("p1"), &IdentityId::new("u2"), "Room 12")
                .await
                .unwrap();

            f.engine
                .moderate(
                    &ListingId::new("p1"),
                    &IdentityId::new("a1"),
                    ListingStatus::Banned,
                    "counterfeit",
                )
                .await
                .unwrap();

            // The buyer gets nothing; the seller gets purchase + takedown.
            let buyer_inbox = f
                .notifications
                .find_by_receiver(&IdentityId::new("u2"))
                .await
                .unwrap();
            assert!(buyer_inbox.is_empty());

            let seller_inbox = f
                .notifications
                .find_by_receiver(&IdentityId::new("u1"))
                .await
                .unwrap();
            assert_eq!(seller_inbox.len(), 2);
        }

        #[tokio::test]
        async fn non_ban_targets_are_rejected() {
            let f = fixture().await;
            for target in [ListingStatus::Sold, ListingStatus::Received] {
                let result = f
                    .engine
                    .moderate(&ListingId::new("p1"), &IdentityId::new("a1"), target, "")
                    .await;
                assert!(matches!(result, Err(ApplicationError::InvalidState(_))));
            }
        }
    }

    mod withdraw {
        use super::*;

        #[tokio::test]
        async fn debits_and_reports_new_balance() {
            let f = fixture().await;
            f.identities
                .credit_wallet(&IdentityId::new("u1"), Money::from_major(45))
                .await
                .unwrap();

            let outcome = f
                .engine
                .withdraw(&IdentityId::new("u1"), Money::from_major(20), "bank:DE00")
                .await
                .unwrap();

            assert_eq!(outcome.balance, Money::from_major(25));
            assert_eq!(outcome.payout_target, "bank:DE00");
        }

        #[tokio::test]
        async fn overdraft_fails_without_mutation() {
            let f = fixture().await;
            f.identities
                .credit_wallet(&IdentityId::new("u1"), Money::from_major(45))
                .await
                .unwrap();

            let result = f
                .engine
                .withdraw(&IdentityId::new("u1"), Money::from_major(50), "bank:DE00")
                .await;
            assert!(matches!(
                result,
                Err(ApplicationError::InsufficientFunds(_))
            ));

            let identity = f
                .identities
                .get(&IdentityId::new("u1"))
                .await
                .unwrap()
                .unwrap();
            assert_eq!(identity.wallet_balance(), Money::from_major(45));
        }

        #[tokio::test]
        async fn zero_amount_is_invalid() {
            let f = fixture().await;
            let result = f
                .engine
                .withdraw(&IdentityId::new("u1"), Money::ZERO, "bank:DE00")
                .await;
            assert!(matches!(result, Err(ApplicationError::InvalidAmount(_))));
        }

        #[tokio::test]
        async fn unknown_identity_fails() {
            let f = fixture().await;
            let result = f
                .engine
                .withdraw(&IdentityId::new("ghost"), Money::from_major(1), "bank:DE00")
                .await;
            assert!(matches!(result, Err(ApplicationError::NotFound { .. })));
        }
    }
}

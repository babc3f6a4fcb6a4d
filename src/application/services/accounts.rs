//! # Account Service
//!
//! Registration, profiles, wishlist and follow toggles, and the
//! admin-side identity moderation (ban/unban, account listing).

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::entities::identity::Identity;
use crate::domain::entities::listing::Listing;
use crate::domain::value_objects::{IdentityId, ListingId, ListingStatus, Role};
use crate::infrastructure::persistence::{IdentityRepository, ListingRepository};
use std::sync::Arc;
use uuid::Uuid;

/// Parameters for a new account.
#[derive(Debug, Clone)]
pub struct NewIdentity {
    /// Optional caller-chosen id; generated when absent.
    pub id: Option<IdentityId>,
    /// Public display name.
    pub username: String,
    /// Avatar image URL.
    pub avatar_url: String,
    /// Profile blurb.
    pub bio: String,
}

/// The profile bundle served on the profile page.
#[derive(Debug, Clone)]
pub struct ProfileData {
    /// The account itself.
    pub identity: Identity,
    /// Active listings the account is selling.
    pub listings: Vec<Listing>,
    /// Sold listings awaiting delivery confirmation.
    pub sold: Vec<Listing>,
    /// Listings the account has bought.
    pub bought: Vec<Listing>,
    /// Wishlist contents, resolved to listings.
    pub wishlist: Vec<Listing>,
    /// Accounts this one follows.
    pub followed: Vec<Identity>,
}

/// Account registration, profiles and identity moderation.
#[derive(Debug, Clone)]
pub struct AccountService {
    identities: Arc<dyn IdentityRepository>,
    listings: Arc<dyn ListingRepository>,
}

impl AccountService {
    /// Creates an account service over the given repositories.
    #[must_use]
    pub fn new(
        identities: Arc<dyn IdentityRepository>,
        listings: Arc<dyn ListingRepository>,
    ) -> Self {
        Self {
            identities,
            listings,
        }
    }

    /// Registers a new student account.
    ///
    /// Admin accounts are not created through registration; the system
    /// identity is provisioned at startup from configuration.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Validation` for a blank username,
    /// `ApplicationError::Conflict` if the id is taken.
    pub async fn register(&self, new: NewIdentity) -> ApplicationResult<Identity> {
        if new.username.trim().is_empty() {
            return Err(ApplicationError::validation("username must not be blank"));
        }
        let id = new
            .id
            .unwrap_or_else(|| IdentityId::new(Uuid::new_v4().to_string()));
        let identity = Identity::new(id, new.username, Role::Student)
            .with_avatar_url(new.avatar_url)
            .with_bio(new.bio);

        self.identities.insert(&identity).await?;
        tracing::info!(identity = %identity.id(), "account registered");
        Ok(identity)
    }

    /// Fetches a single identity.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotFound` if the identity does not
    /// exist.
    pub async fn get(&self, id: &IdentityId) -> ApplicationResult<Identity> {
        self.identities
            .get(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Identity", id.as_str()))
    }

    /// Assembles the profile bundle for an identity.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotFound` if the identity does not
    /// exist.
    pub async fn profile(&self, id: &IdentityId) -> ApplicationResult<ProfileData> {
        let identity = self.get(id).await?;

        let offered = self.listings.find_by_seller(id).await?;
        let (listings, sold): (Vec<Listing>, Vec<Listing>) = offered
            .into_iter()
            .filter(|l| matches!(l.status(), ListingStatus::Active | ListingStatus::Sold))
            .partition(Listing::is_active);

        let bought = self.listings.find_by_buyer(id).await?;

        let mut wishlist = Vec::with_capacity(identity.wishlist().len());
        for listing_id in identity.wishlist() {
            if let Some(listing) = self.listings.get(listing_id).await? {
                wishlist.push(listing);
            }
        }

        let mut followed = Vec::with_capacity(identity.following().len());
        for followed_id in identity.following() {
            if let Some(other) = self.identities.get(followed_id).await? {
                followed.push(other);
            }
        }

        Ok(ProfileData {
            identity,
            listings,
            sold,
            bought,
            wishlist,
            followed,
        })
    }

    /// Adds or removes a listing from the identity's wishlist.
    ///
    /// Returns the updated identity.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotFound` if either side does not
    /// exist, `ApplicationError::Conflict` when a concurrent profile
    /// write wins.
    pub async fn toggle_wishlist(
        &self,
        id: &IdentityId,
        listing_id: &ListingId,
    ) -> ApplicationResult<Identity> {
        if self.listings.get(listing_id).await?.is_none() {
            return Err(ApplicationError::not_found("Listing", listing_id.as_str()));
        }
        let mut identity = self.get(id).await?;
        identity.toggle_wishlist(listing_id.clone());
        self.identities.save(&identity).await?;
        Ok(identity)
    }

    /// Follows or unfollows the target identity.
    ///
    /// Returns the updated identity.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotFound` if either identity does not
    /// exist, `ApplicationError::Validation` on a self-follow,
    /// `ApplicationError::Conflict` when a concurrent profile write wins.
    pub async fn toggle_follow(
        &self,
        id: &IdentityId,
        target: &IdentityId,
    ) -> ApplicationResult<Identity> {
        if self.identities.get(target).await?.is_none() {
            return Err(ApplicationError::not_found("Identity", target.as_str()));
        }
        let mut identity = self.get(id).await?;
        identity.toggle_follow(target.clone())?;
        self.identities.save(&identity).await?;
        Ok(identity)
    }

    /// Bans or unbans an identity. Admin only.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Forbidden` if the caller is not an
    /// admin, `ApplicationError::NotFound` if the target does not exist.
    pub async fn set_banned(
        &self,
        moderator_id: &IdentityId,
        target: &IdentityId,
        banned: bool,
    ) -> ApplicationResult<Identity> {
        self.require_admin(moderator_id).await?;
        let mut identity = self.get(target).await?;
        identity.set_banned(banned);
        self.identities.save(&identity).await?;
        tracing::info!(
            identity = %target,
            moderator = %moderator_id,
            banned,
            "identity ban flag updated"
        );
        Ok(identity)
    }

    /// Lists every account. Admin only.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Forbidden` if the caller is not an
    /// admin.
    pub async fn list_all(&self, moderator_id: &IdentityId) -> ApplicationResult<Vec<Identity>> {
        self.require_admin(moderator_id).await?;
        let mut all = self.identities.get_all().await?;
        all.sort_by(|a, b| a.id().cmp(b.id()));
        Ok(all)
    }

    async fn require_admin(&self, moderator_id: &IdentityId) -> ApplicationResult<()> {
        let moderator = self
            .identities
            .get(moderator_id)
            .await?
            .ok_or_else(|| ApplicationError::forbidden("unknown moderator"))?;
        if !moderator.is_admin() {
            return Err(ApplicationError::forbidden(
                "identity moderation requires the admin role",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::value_objects::{ListingStatus, Money};
    use crate::infrastructure::persistence::in_memory::{
        InMemoryIdentityRepository, InMemoryListingRepository,
    };

    struct Fixture {
        accounts: AccountService,
        identities: Arc<InMemoryIdentityRepository>,
        listings: Arc<InMemoryListingRepository>,
    }

    async fn fixture() -> Fixture {
        let identities = Arc::new(InMemoryIdentityRepository::new());
        let listings = Arc::new(InMemoryListingRepository::new());
        identities
            .insert(&Identity::new(IdentityId::new("a1"), "mod", Role::Admin))
            .await
            .unwrap();
        Fixture {
            accounts: AccountService::new(identities.clone(), listings.clone()),
            identities,
            listings,
        }
    }

    fn new_identity(id: &str, username: &str) -> NewIdentity {
        NewIdentity {
            id: Some(IdentityId::new(id)),
            username: username.to_owned(),
            avatar_url: String::new(),
            bio: String::new(),
        }
    }

    async fn seed_listing(f: &Fixture, id: &str, seller: &str) -> Listing {
        let listing = Listing::builder(
            ListingId::new(id),
            IdentityId::new(seller),
            "Desk lamp",
            Money::from_major(45),
        )
        .build()
        .unwrap();
        f.listings.insert(&listing).await.unwrap();
        listing
    }

    mod register {
        use super::*;

        #[tokio::test]
        async fn registers_student() {
            let f = fixture().await;
            let identity = f
                .accounts
                .register(new_identity("u1", "alice"))
                .await
                .unwrap();
            assert_eq!(identity.role(), Role::Student);
            assert!(!identity.is_admin());
        }

        #[tokio::test]
        async fn rejects_blank_username() {
            let f = fixture().await;
            let result = f.accounts.register(new_identity("u1", "  ")).await;
            assert!(matches!(result, Err(ApplicationError::Validation(_))));
        }

        #[tokio::test]
        async fn duplicate_id_conflicts() {
            let f = fixture().await;
            f.accounts
                .register(new_identity("u1", "alice"))
                .await
                .unwrap();
            let result = f.accounts.register(new_identity("u1", "bob")).await;
            assert!(matches!(result, Err(ApplicationError::Conflict(_))));
        }
    }

    mod profile {
        use super::*;

        #[tokio::test]
        async fn bundles_listings_by_role_in_trade() {
            let f = fixture().await;
            f.accounts
                .register(new_identity("u1", "alice"))
                .await
                .unwrap();
            f.accounts
                .register(new_identity("u2", "bob"))
                .await
                .unwrap();

            seed_listing(&f, "p1", "u1").await;
            let mut sold = seed_listing(&f, "p2", "u1").await;
            sold.mark_sold(IdentityId::new("u2")).unwrap();
            f.listings
                .update_if_status(&sold, ListingStatus::Active)
                .await
                .unwrap();

            let profile = f.accounts.profile(&IdentityId::new("u1")).await.unwrap();
            assert_eq!(profile.listings.len(), 1);
            assert_eq!(profile.sold.len(), 1);

            let buyer_profile = f.accounts.profile(&IdentityId::new("u2")).await.unwrap();
            assert_eq!(buyer_profile.bought.len(), 1);
        }

        #[tokio::test]
        async fn unknown_identity_fails() {
            let f = fixture().await;
            let result = f.accounts.profile(&IdentityId::new("ghost")).await;
            assert!(matches!(result, Err(ApplicationError::NotFound { .. })));
        }
    }

    mod wishlist_and_follow {
        use super::*;

        #[tokio::test]
        async fn wishlist_toggle_roundtrip() {
            let f = fixture().await;
            f.accounts
                .register(new_identity("u1", "alice"))
                .await
                .unwrap();
            seed_listing(&f, "p1", "u1").await;

            let identity = f
                .accounts
                .toggle_wishlist(&IdentityId::new("u1"), &ListingId::new("p1"))
                .await
                .unwrap();
            assert!(identity.wishlist().contains(&ListingId::new("p1")));

            let identity = f
                .accounts
                .toggle_wishlist(&IdentityId::new("u1"), &ListingId::new("p1"))
                .await
                .unwrap();
            assert!(identity.wishlist().is_empty());
        }

        #[tokio::test]
        async fn wishlist_requires_existing_listing() {
            let f = fixture().await;
            f.accounts
                .register(new_identity("u1", "alice"))
                .await
                .unwrap();
            let result = f
                .accounts
                .toggle_wishlist(&IdentityId::new("u1"), &ListingId::new("ghost"))
                .await;
            assert!(matches!(result, Err(ApplicationError::NotFound { .. })));
        }

        #[tokio::test]
        async fn follow_toggle_and_self_follow() {
            let f = fixture().await;
            f.accounts
                .register(new_identity("u1", "alice"))
                .await
                .unwrap();
            f.accounts
                .register(new_identity("u2", "bob"))
                .await
                .unwrap();

            let identity = f
                .accounts
                .toggle_follow(&IdentityId::new("u1"), &IdentityId::new("u2"))
                .await
                .unwrap();
            assert!(identity.following().contains(&IdentityId::new("u2")));

            let result = f
                .accounts
                .toggle_follow(&IdentityId::new("u1"), &IdentityId::new("u1"))
                .await;
            assert!(matches!(result, Err(ApplicationError::Validation(_))));
        }
    }

    mod moderation {
        use super::*;

        #[tokio::test]
        async fn admin_bans_and_unbans() {
            let f = fixture().await;
            f.accounts
                .register(new_identity("u1", "alice"))
                .await
                .unwrap();

            let banned = f
                .accounts
                .set_banned(&IdentityId::new("a1"), &IdentityId::new("u1"), true)
                .await
                .unwrap();
            assert!(banned.is_banned());

            let unbanned = f
                .accounts
                .set_banned(&IdentityId::new("a1"), &IdentityId::new("u1"), false)
                .await
                .unwrap();
            assert!(!unbanned.is_banned());
        }

        #[tokio::test]
        async fn student_cannot_ban() {
            let f = fixture().await;
            f.accounts
                .register(new_identity("u1", "alice"))
                .await
                .unwrap();
            f.accounts
                .register(new_identity("u2", "bob"))
                .await
                .unwrap();

            let result = f
                .accounts
                .set_banned(&IdentityId::new("u1"), &IdentityId::new("u2"), true)
                .await;
            assert!(matches!(result, Err(ApplicationError::Forbidden(_))));
        }

        #[tokio::test]
        async fn list_all_is_admin_gated() {
            let f = fixture().await;
            f.accounts
                .register(new_identity("u1", "alice"))
                .await
                .unwrap();

            let all = f.accounts.list_all(&IdentityId::new("a1")).await.unwrap();
            assert_eq!(all.len(), 2);

            let result = f.accounts.list_all(&IdentityId::new("u1")).await;
            assert!(matches!(result, Err(ApplicationError::Forbidden(_))));
        }
    }
}

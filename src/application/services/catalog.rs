//! # Catalog Service
//!
//! Listing creation and the query layer: search, filtering, sorting and
//! pagination. No interesting invariants live here; the transaction
//! engine owns every status transition.

use crate::application::error::{ApplicationError, ApplicationResult};
use crate::domain::entities::listing::Listing;
use crate::domain::value_objects::{IdentityId, ListingId, ListingStatus, Money, SortKey};
use crate::infrastructure::persistence::{IdentityRepository, ListingRepository};
use std::sync::Arc;
use uuid::Uuid;

/// Default page size for catalog queries.
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Parameters for a new listing.
#[derive(Debug, Clone)]
pub struct NewListing {
    /// Optional caller-chosen id; generated when absent.
    pub id: Option<ListingId>,
    /// Product title.
    pub title: String,
    /// Free-text description.
    pub description: String,
    /// Category label.
    pub category: String,
    /// Image URL.
    pub image_url: String,
    /// Asking price.
    pub price: Money,
    /// Free-form tags.
    pub tags: Vec<String>,
}

/// Catalog query parameters.
#[derive(Debug, Clone)]
pub struct ListingQuery {
    /// Case-insensitive text match over title and description.
    pub search: Option<String>,
    /// Excludes `Sold` listings (and only those) when set.
    pub hide_sold: bool,
    /// Secondary sort, applied after the active-first tie-break.
    pub sort: SortKey,
    /// 1-based page number.
    pub page: usize,
    /// Page size.
    pub per_page: usize,
}

impl Default for ListingQuery {
    fn default() -> Self {
        Self {
            search: None,
            hide_sold: false,
            sort: SortKey::default(),
            page: 1,
            per_page: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of query results.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Total matching items across all pages.
    pub total: usize,
    /// 1-based page number.
    pub page: usize,
    /// Page size used.
    pub per_page: usize,
}

/// Listing creation and catalog queries.
#[derive(Debug, Clone)]
pub struct CatalogService {
    listings: Arc<dyn ListingRepository>,
    identities: Arc<dyn IdentityRepository>,
}

impl CatalogService {
    /// Creates a catalog service over the given repositories.
    #[must_use]
    pub fn new(
        listings: Arc<dyn ListingRepository>,
        identities: Arc<dyn IdentityRepository>,
    ) -> Self {
        Self {
            listings,
            identities,
        }
    }

    /// Creates a listing for the given seller.
    ///
    /// # Errors
    ///
    /// - `ApplicationError::NotFound` if the seller does not exist
    /// - `ApplicationError::Forbidden` if the seller is banned
    /// - `ApplicationError::InvalidAmount` / `Validation` from listing
    ///   validation
    /// - `ApplicationError::Conflict` if the chosen id is taken
    pub async fn create_listing(
        &self,
        seller_id: &IdentityId,
        new: NewListing,
    ) -> ApplicationResult<Listing> {
        let seller = self
            .identities
            .get(seller_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Identity", seller_id.as_str()))?;
        if seller.is_banned() {
            return Err(ApplicationError::forbidden(format!(
                "seller {seller_id} is banned"
            )));
        }

        let id = new
            .id
            .unwrap_or_else(|| ListingId::new(Uuid::new_v4().to_string()));
        let listing = Listing::builder(id, seller.id().clone(), new.title, new.price)
            .description(new.description)
            .category(new.category)
            .image_url(new.image_url)
            .tags(new.tags)
            .build()?;

        self.listings.insert(&listing).await?;
        tracing::info!(listing = %listing.id(), seller = %seller_id, "listing created");
        Ok(listing)
    }

    /// Fetches a single listing, counting the view.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::NotFound` if the listing does not exist.
    pub async fn view_listing(&self, id: &ListingId) -> ApplicationResult<Listing> {
        self.listings
            .record_view(id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Listing", id.as_str()))
    }

    /// Runs a catalog query.
    ///
    /// Default ordering places `Active` listings before any other status,
    /// then applies the requested secondary sort.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Persistence` if the store fails.
    pub async fn browse(&self, query: &ListingQuery) -> ApplicationResult<Page<Listing>> {
        let mut listings = self.listings.get_all().await?;

        if let Some(needle) = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            let needle = needle.to_lowercase();
            listings.retain(|l| {
                l.title().to_lowercase().contains(&needle)
                    || l.description().to_lowercase().contains(&needle)
            });
        }

        if query.hide_sold {
            listings.retain(|l| l.status() != ListingStatus::Sold);
        }

        Self::sort(&mut listings, query.sort);

        let total = listings.len();
        let per_page = query.per_page.max(1);
        let page = query.page.max(1);
        let items: Vec<Listing> = listings
            .into_iter()
            .skip((page - 1) * per_page)
            .take(per_page)
            .collect();

        Ok(Page {
            items,
            total,
            page,
            per_page,
        })
    }

    fn sort(listings: &mut [Listing], sort: SortKey) {
        let rank = |l: &Listing| u8::from(!l.is_active());
        listings.sort_by(|a, b| {
            rank(a).cmp(&rank(b)).then_with(|| match sort {
                SortKey::PriceAsc => a.price().cmp(&b.price()),
                SortKey::PriceDesc => b.price().cmp(&a.price()),
                SortKey::ViewsDesc => b.view_count().cmp(&a.view_count()),
                SortKey::CreatedDesc => b.created_at().cmp(&a.created_at()),
            })
        });
    }
}

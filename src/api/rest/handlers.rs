//! # REST Handlers
//!
//! Axum handlers, request/response DTOs and the HTTP error mapping.
//!
//! Wire fields are camelCase to match the upstream clients (`sellerId`,
//! `viewCount`, …). Engine responses carry an optional `warning` string
//! when a notification could not be delivered alongside an otherwise
//! successful transition.

use crate::application::error::ApplicationError;
use crate::application::services::{
    AccountService, CatalogService, ListingQuery, NewIdentity, NewListing, Notifier,
    ReviewService, TransactionEngine,
};
use crate::domain::entities::identity::Identity;
use crate::domain::entities::listing::Listing;
use crate::domain::entities::notification::Notification;
use crate::domain::entities::review::Review;
use crate::domain::value_objects::{
    IdentityId, ListingId, ListingStatus, Money, NotificationId, NotificationKind, ReviewId, Role,
    SortKey,
};
use crate::infrastructure::auth::{AuthContext, AuthService};
use crate::infrastructure::persistence::IdentityRepository;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    /// The purchase/escrow engine.
    pub engine: TransactionEngine,
    /// Catalog queries and listing creation.
    pub catalog: CatalogService,
    /// Accounts and identity moderation.
    pub accounts: AccountService,
    /// Seller reviews.
    pub reviews: ReviewService,
    /// Notification emitter and inbox.
    pub notifier: Notifier,
    /// Token issuance and validation.
    pub auth: Arc<AuthService>,
    /// Identity lookups for token issuance.
    pub identities: Arc<dyn IdentityRepository>,
}

type Auth = Option<TypedHeader<Authorization<Bearer>>>;

fn authenticate(state: &AppState, header: &Auth) -> Result<AuthContext, ApplicationError> {
    let bearer = header
        .as_ref()
        .ok_or_else(|| ApplicationError::unauthorized("missing bearer token"))?;
    Ok(state.auth.verify(bearer.token())?)
}

fn require_self_or_admin(ctx: &AuthContext, id: &IdentityId) -> Result<(), ApplicationError> {
    if ctx.is_self(id) || ctx.is_admin() {
        Ok(())
    } else {
        Err(ApplicationError::forbidden(
            "callers may only act on their own account",
        ))
    }
}

// ========== Error mapping ==========

/// Error body returned on every failure.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable message.
    pub error: String,
    /// Stable machine-readable code.
    pub code: &'static str,
}

impl IntoResponse for ApplicationError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            Self::ListingUnavailable(_) => (StatusCode::BAD_REQUEST, "LISTING_UNAVAILABLE"),
            Self::InvalidState(_) => (StatusCode::BAD_REQUEST, "INVALID_STATE"),
            Self::InvalidAmount(_) => (StatusCode::BAD_REQUEST, "INVALID_AMOUNT"),
            Self::InsufficientFunds(_) => (StatusCode::BAD_REQUEST, "INSUFFICIENT_FUNDS"),
            Self::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            Self::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::BuyerNotFound(_) => (StatusCode::NOT_FOUND, "BUYER_NOT_FOUND"),
            Self::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::NotificationDeliveryFailed(_) => {
                (StatusCode::BAD_GATEWAY, "NOTIFICATION_DELIVERY_FAILED")
            }
            Self::Persistence(_) => (StatusCode::INTERNAL_SERVER_ERROR, "PERSISTENCE_ERROR"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = ErrorResponse {
            error: self.to_string(),
            code,
        };
        (status, Json(body)).into_response()
    }
}

// ========== Response DTOs ==========

/// Wire shape of an identity.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityResponse {
    /// Identity id.
    pub id: IdentityId,
    /// Display name.
    pub username: String,
    /// Avatar URL.
    pub avatar: String,
    /// Role.
    pub role: Role,
    /// Credit score.
    pub credit_score: i32,
    /// Profile blurb.
    pub bio: String,
    /// Ban flag.
    pub is_banned: bool,
    /// Wallet balance.
    pub wallet_balance: Money,
    /// Wishlisted listing ids.
    pub wishlist: Vec<ListingId>,
    /// Followed identity ids.
    pub following: Vec<IdentityId>,
    /// Registration time, ISO 8601.
    pub join_date: String,
}

impl From<&Identity> for IdentityResponse {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id().clone(),
            username: identity.username().to_owned(),
            avatar: identity.avatar_url().to_owned(),
            role: identity.role(),
            credit_score: identity.credit_score(),
            bio: identity.bio().to_owned(),
            is_banned: identity.is_banned(),
            wallet_balance: identity.wallet_balance(),
            wishlist: identity.wishlist().iter().cloned().collect(),
            following: identity.following().iter().cloned().collect(),
            join_date: identity.join_date().to_iso8601(),
        }
    }
}

/// Wire shape of a listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingResponse {
    /// Listing id.
    pub id: ListingId,
    /// Seller id.
    pub seller_id: IdentityId,
    /// Buyer id, once sold.
    pub buyer_id: Option<IdentityId>,
    /// Title.
    pub title: String,
    /// Price.
    pub price: Money,
    /// Description.
    pub description: String,
    /// Category label.
    pub category: String,
    /// Image URL.
    pub image: String,
    /// Lifecycle status.
    pub status: ListingStatus,
    /// View counter.
    pub view_count: u64,
    /// Tags.
    pub tags: Vec<String>,
    /// Creation time, ISO 8601.
    pub created_at: String,
}

impl From<&Listing> for ListingResponse {
    fn from(listing: &Listing) -> Self {
        Self {
            id: listing.id().clone(),
            seller_id: listing.seller().clone(),
            buyer_id: listing.buyer().cloned(),
            title: listing.title().to_owned(),
            price: listing.price(),
            description: listing.description().to_owned(),
            category: listing.category().to_owned(),
            image: listing.image_url().to_owned(),
            status: listing.status(),
            view_count: listing.view_count(),
            tags: listing.tags().iter().cloned().collect(),
            created_at: listing.created_at().to_iso8601(),
        }
    }
}

/// Wire shape of a notification.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    /// Notification id.
    pub id: NotificationId,
    /// Sender id.
    pub sender_id: IdentityId,
    /// Receiver id.
    pub receiver_id: IdentityId,
    /// Message text.
    pub content: String,
    /// Chat or system.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Creation time, ISO 8601.
    pub created_at: String,
    /// Read flag.
    pub is_read: bool,
}

impl From<&Notification> for NotificationResponse {
    fn from(n: &Notification) -> Self {
        Self {
            id: n.id(),
            sender_id: n.sender().clone(),
            receiver_id: n.receiver().clone(),
            content: n.content().to_owned(),
            kind: n.kind(),
            created_at: n.created_at().to_iso8601(),
            is_read: n.is_read(),
        }
    }
}

/// Wire shape of a review.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    /// Review id.
    pub id: ReviewId,
    /// Reviewed seller.
    pub seller_id: IdentityId,
    /// Reviewing buyer.
    pub buyer_id: IdentityId,
    /// Listing concerned.
    pub listing_id: ListingId,
    /// Star rating.
    pub rating: i32,
    /// Comment.
    pub content: String,
    /// Creation time, ISO 8601.
    pub created_at: String,
}

impl From<&Review> for ReviewResponse {
    fn from(review: &Review) -> Self {
        Self {
            id: review.id(),
            seller_id: review.seller().clone(),
            buyer_id: review.buyer().clone(),
            listing_id: review.listing().clone(),
            rating: review.rating(),
            content: review.content().to_owned(),
            created_at: review.created_at().to_iso8601(),
        }
    }
}

/// Paginated response envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Total matching items.
    pub total: usize,
    /// 1-based page number.
    pub page: usize,
    /// Page size.
    pub per_page: usize,
}

/// Health check body.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process serves requests.
    pub status: &'static str,
}

// ========== Health ==========

/// `GET /health`.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// ========== Auth ==========

/// Body of `POST /auth/token`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokenRequest {
    /// Identity to issue a token for.
    pub identity_id: IdentityId,
}

/// Response of `POST /auth/token`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthTokenResponse {
    /// Bearer token.
    pub token: String,
    /// The identity the token names.
    pub identity: IdentityResponse,
}

/// `POST /auth/token` — issues a bearer token.
///
/// Banned identities are refused.
pub async fn issue_token(
    State(state): State<AppState>,
    Json(req): Json<AuthTokenRequest>,
) -> Result<Json<AuthTokenResponse>, ApplicationError> {
    let identity = state
        .identities
        .get(&req.identity_id)
        .await
        .map_err(ApplicationError::from)?
        .ok_or_else(|| ApplicationError::not_found("Identity", req.identity_id.as_str()))?;
    let token = state.auth.issue(&identity)?;
    Ok(Json(AuthTokenResponse {
        token,
        identity: IdentityResponse::from(&identity),
    }))
}

// ========== Identities ==========

/// Body of `POST /identities`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    /// Optional caller-chosen id.
    pub id: Option<IdentityId>,
    /// Display name.
    pub username: String,
    /// Avatar URL.
    #[serde(default)]
    pub avatar: String,
    /// Profile blurb.
    #[serde(default)]
    pub bio: String,
}

/// `POST /identities` — registers a student account.
pub async fn register_identity(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<IdentityResponse>), ApplicationError> {
    let identity = state
        .accounts
        .register(NewIdentity {
            id: req.id,
            username: req.username,
            avatar_url: req.avatar,
            bio: req.bio,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(IdentityResponse::from(&identity))))
}

/// `GET /identities` — admin listing of all accounts.
pub async fn list_identities(
    State(state): State<AppState>,
    auth: Auth,
) -> Result<Json<Vec<IdentityResponse>>, ApplicationError> {
    let ctx = authenticate(&state, &auth)?;
    let identities = state.accounts.list_all(&ctx.identity_id).await?;
    Ok(Json(identities.iter().map(IdentityResponse::from).collect()))
}

/// `GET /identities/{id}` — public account lookup.
pub async fn get_identity(
    State(state): State<AppState>,
    Path(id): Path<IdentityId>,
) -> Result<Json<IdentityResponse>, ApplicationError> {
    let identity = state.accounts.get(&id).await?;
    Ok(Json(IdentityResponse::from(&identity)))
}

/// Response of `GET /identities/{id}/profile`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    /// The account itself.
    pub identity: IdentityResponse,
    /// Active listings offered.
    pub listings: Vec<ListingResponse>,
    /// Sold listings awaiting confirmation.
    pub sold: Vec<ListingResponse>,
    /// Purchases.
    pub bought: Vec<ListingResponse>,
    /// Wishlist contents.
    pub wishlist: Vec<ListingResponse>,
    /// Followed accounts.
    pub followed_users: Vec<IdentityResponse>,
}

/// `GET /identities/{id}/profile` — the profile-page bundle.
pub async fn get_profile(
    State(state): State<AppState>,
    Path(id): Path<IdentityId>,
) -> Result<Json<ProfileResponse>, ApplicationError> {
    let profile = state.accounts.profile(&id).await?;
    Ok(Json(ProfileResponse {
        identity: IdentityResponse::from(&profile.identity),
        listings: profile.listings.iter().map(ListingResponse::from).collect(),
        sold: profile.sold.iter().map(ListingResponse::from).collect(),
        bought: profile.bought.iter().map(ListingResponse::from).collect(),
        wishlist: profile.wishlist.iter().map(ListingResponse::from).collect(),
        followed_users: profile.followed.iter().map(IdentityResponse::from).collect(),
    }))
}

/// Body of `POST /identities/{id}/wishlist`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistRequest {
    /// Listing to toggle.
    pub product_id: ListingId,
}

/// `POST /identities/{id}/wishlist` — toggles a wishlist entry.
pub async fn toggle_wishlist(
    State(state): State<AppState>,
    Path(id): Path<IdentityId>,
    auth: Auth,
    Json(req): Json<WishlistRequest>,
) -> Result<Json<IdentityResponse>, ApplicationError> {
    let ctx = authenticate(&state, &auth)?;
    require_self_or_admin(&ctx, &id)?;
    let identity = state.accounts.toggle_wishlist(&id, &req.product_id).await?;
    Ok(Json(IdentityResponse::from(&identity)))
}

/// Body of `POST /identities/{id}/following`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowRequest {
    /// Identity to follow or unfollow.
    pub target_id: IdentityId,
}

/// `POST /identities/{id}/following` — toggles a follow edge.
pub async fn toggle_follow(
    State(state): State<AppState>,
    Path(id): Path<IdentityId>,
    auth: Auth,
    Json(req): Json<FollowRequest>,
) -> Result<Json<IdentityResponse>, ApplicationError> {
    let ctx = authenticate(&state, &auth)?;
    require_self_or_admin(&ctx, &id)?;
    let identity = state.accounts.toggle_follow(&id, &req.target_id).await?;
    Ok(Json(IdentityResponse::from(&identity)))
}

/// Body of `POST /identities/{id}/ban`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BanRequest {
    /// Desired ban flag.
    #[serde(default)]
    pub is_banned: bool,
}

/// `POST /identities/{id}/ban` — admin ban/unban.
pub async fn set_ban(
    State(state): State<AppState>,
    Path(id): Path<IdentityId>,
    auth: Auth,
    Json(req): Json<BanRequest>,
) -> Result<Json<IdentityResponse>, ApplicationError> {
    let ctx = authenticate(&state, &auth)?;
    let identity = state
        .accounts
        .set_banned(&ctx.identity_id, &id, req.is_banned)
        .await?;
    Ok(Json(IdentityResponse::from(&identity)))
}

/// Body of `POST /identities/{id}/withdraw`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawRequest {
    /// Amount to withdraw.
    pub amount: Decimal,
    /// Opaque payout destination, recorded only.
    #[serde(default)]
    pub payout_target: String,
}

/// Response of `POST /identities/{id}/withdraw`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawResponse {
    /// Always `"success"`.
    pub status: &'static str,
    /// Balance after the debit.
    pub new_balance: Money,
    /// Echo of the payout destination.
    pub payout_target: String,
}

/// `POST /identities/{id}/withdraw` — wallet withdrawal.
pub async fn withdraw(
    State(state): State<AppState>,
    Path(id): Path<IdentityId>,
    auth: Auth,
    Json(req): Json<WithdrawRequest>,
) -> Result<Json<WithdrawResponse>, ApplicationError> {
    let ctx = authenticate(&state, &auth)?;
    if !ctx.is_self(&id) {
        return Err(ApplicationError::forbidden(
            "withdrawals are limited to the wallet owner",
        ));
    }
    let amount = Money::new(req.amount).map_err(|_| {
        ApplicationError::InvalidAmount("withdrawal amount must be positive".to_owned())
    })?;
    let outcome = state
        .engine
        .withdraw(&id, amount, &req.payout_target)
        .await?;
    Ok(Json(WithdrawResponse {
        status: "success",
        new_balance: outcome.balance,
        payout_target: outcome.payout_target,
    }))
}

// ========== Listings ==========

/// Query parameters of `GET /listings`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingsQueryParams {
    /// Case-insensitive text search.
    pub search: Option<String>,
    /// Excludes sold listings when true.
    #[serde(default)]
    pub hide_sold: bool,
    /// Sort key (`price_asc`, `price_desc`, `views_desc`); anything else
    /// means newest first.
    pub sort: Option<String>,
    /// 1-based page number.
    pub page: Option<usize>,
    /// Page size.
    pub per_page: Option<usize>,
}

/// `GET /listings` — catalog query.
pub async fn list_listings(
    State(state): State<AppState>,
    Query(params): Query<ListingsQueryParams>,
) -> Result<Json<PaginatedResponse<ListingResponse>>, ApplicationError> {
    let query = ListingQuery {
        search: params.search,
        hide_sold: params.hide_sold,
        sort: params
            .sort
            .as_deref()
            .and_then(|s| s.parse::<SortKey>().ok())
            .unwrap_or_default(),
        page: params.page.unwrap_or(1),
        per_page: params
            .per_page
            .unwrap_or(crate::application::services::DEFAULT_PAGE_SIZE),
    };
    let page = state.catalog.browse(&query).await?;
    Ok(Json(PaginatedResponse {
        items: page.items.iter().map(ListingResponse::from).collect(),
        total: page.total,
        page: page.page,
        per_page: page.per_page,
    }))
}

/// Body of `POST /listings`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateListingRequest {
    /// Optional caller-chosen id.
    pub id: Option<ListingId>,
    /// Title.
    pub title: String,
    /// Asking price.
    pub price: Decimal,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Category label.
    #[serde(default)]
    pub category: String,
    /// Image URL.
    #[serde(default)]
    pub image: String,
    /// Tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// `POST /listings` — creates a listing owned by the caller.
pub async fn create_listing(
    State(state): State<AppState>,
    auth: Auth,
    Json(req): Json<CreateListingRequest>,
) -> Result<(StatusCode, Json<ListingResponse>), ApplicationError> {
    let ctx = authenticate(&state, &auth)?;
    let price = Money::new(req.price)
        .map_err(|_| ApplicationError::InvalidAmount("price must be positive".to_owned()))?;
    let listing = state
        .catalog
        .create_listing(
            &ctx.identity_id,
            NewListing {
                id: req.id,
                title: req.title,
                description: req.description,
                category: req.category,
                image_url: req.image,
                price,
                tags: req.tags,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(ListingResponse::from(&listing))))
}

/// `GET /listings/{id}` — single listing, counting the view.
pub async fn get_listing(
    State(state): State<AppState>,
    Path(id): Path<ListingId>,
) -> Result<Json<ListingResponse>, ApplicationError> {
    let listing = state.catalog.view_listing(&id).await?;
    Ok(Json(ListingResponse::from(&listing)))
}

/// Body of `POST /listings/{id}/purchase`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    /// Buying identity.
    pub buyer_id: IdentityId,
    /// Delivery address forwarded to the seller.
    pub address: String,
}

/// Response of `POST /listings/{id}/purchase`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseResponse {
    /// Always `"success"`.
    pub status: &'static str,
    /// The listing after the transition.
    pub listing: ListingResponse,
    /// Present when the seller notification was not delivered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// `POST /listings/{id}/purchase` — buys an active listing.
pub async fn purchase_listing(
    State(state): State<AppState>,
    Path(id): Path<ListingId>,
    auth: Auth,
    Json(req): Json<PurchaseRequest>,
) -> Result<Json<PurchaseResponse>, ApplicationError> {
    let ctx = authenticate(&state, &auth)?;
    require_self_or_admin(&ctx, &req.buyer_id)?;
    let outcome = state.engine.purchase(&id, &req.buyer_id, &req.address).await?;
    Ok(Json(PurchaseResponse {
        status: "success",
        listing: ListingResponse::from(&outcome.listing),
        warning: outcome.warning,
    }))
}

/// Body of `POST /listings/{id}/confirm-receipt`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmReceiptRequest {
    /// The buyer confirming delivery.
    pub buyer_id: IdentityId,
}

/// Response of `POST /listings/{id}/confirm-receipt`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmReceiptResponse {
    /// Always `"success"`.
    pub status: &'static str,
    /// The listing after the transition.
    pub listing: ListingResponse,
}

/// `POST /listings/{id}/confirm-receipt` — settles the seller.
pub async fn confirm_receipt(
    State(state): State<AppState>,
    Path(id): Path<ListingId>,
    auth: Auth,
    Json(req): Json<ConfirmReceiptRequest>,
) -> Result<Json<ConfirmReceiptResponse>, ApplicationError> {
    let ctx = authenticate(&state, &auth)?;
    require_self_or_admin(&ctx, &req.buyer_id)?;
    let outcome = state.engine.confirm_receipt(&id, &req.buyer_id).await?;
    Ok(Json(ConfirmReceiptResponse {
        status: "success",
        listing: ListingResponse::from(&outcome.listing),
    }))
}

/// Body of `POST /listings/{id}/moderate`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerateRequest {
    /// Target status; only `BANNED` is accepted.
    pub status: ListingStatus,
    /// Free-text reason forwarded to the seller.
    #[serde(default)]
    pub reason: String,
}

/// Response of `POST /listings/{id}/moderate`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerateResponse {
    /// Always `"success"`.
    pub status: &'static str,
    /// The listing after the transition.
    pub listing: ListingResponse,
    /// Present when the takedown notice was not delivered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// `POST /listings/{id}/moderate` — admin takedown.
pub async fn moderate_listing(
    State(state): State<AppState>,
    Path(id): Path<ListingId>,
    auth: Auth,
    Json(req): Json<ModerateRequest>,
) -> Result<Json<ModerateResponse>, ApplicationError> {
    let ctx = authenticate(&state, &auth)?;
    let outcome = state
        .engine
        .moderate(&id, &ctx.identity_id, req.status, &req.reason)
        .await?;
    Ok(Json(ModerateResponse {
        status: "success",
        listing: ListingResponse::from(&outcome.listing),
        warning: outcome.warning,
    }))
}

// ========== Reviews ==========

/// Query parameters of `GET /reviews`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewsQueryParams {
    /// Seller whose reviews to list.
    pub seller_id: IdentityId,
}

/// `GET /reviews?sellerId=…` — reviews about a seller.
pub async fn list_reviews(
    State(state): State<AppState>,
    Query(params): Query<ReviewsQueryParams>,
) -> Result<Json<Vec<ReviewResponse>>, ApplicationError> {
    let reviews = state.reviews.for_seller(&params.seller_id).await?;
    Ok(Json(reviews.iter().map(ReviewResponse::from).collect()))
}

/// Body of `POST /reviews`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewRequest {
    /// Listing the review concerns.
    pub listing_id: ListingId,
    /// Star rating, 1..=5.
    pub rating: i32,
    /// Comment.
    #[serde(default)]
    pub content: String,
}

/// `POST /reviews` — buyer reviews the seller of a received listing.
pub async fn create_review(
    State(state): State<AppState>,
    auth: Auth,
    Json(req): Json<CreateReviewRequest>,
) -> Result<(StatusCode, Json<ReviewResponse>), ApplicationError> {
    let ctx = authenticate(&state, &auth)?;
    let review = state
        .reviews
        .create(&ctx.identity_id, &req.listing_id, req.rating, &req.content)
        .await?;
    Ok((StatusCode::CREATED, Json(ReviewResponse::from(&review))))
}

// ========== Notifications ==========

/// Query parameters of `GET /notifications`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsQueryParams {
    /// Inbox owner.
    pub receiver_id: IdentityId,
}

/// `GET /notifications?receiverId=…` — the caller's inbox.
pub async fn list_notifications(
    State(state): State<AppState>,
    Query(params): Query<NotificationsQueryParams>,
    auth: Auth,
) -> Result<Json<Vec<NotificationResponse>>, ApplicationError> {
    let ctx = authenticate(&state, &auth)?;
    require_self_or_admin(&ctx, &params.receiver_id)?;
    let inbox = state.notifier.inbox(&params.receiver_id).await?;
    Ok(Json(inbox.iter().map(NotificationResponse::from).collect()))
}

/// `POST /notifications/{id}/read` — marks one notification read.
pub async fn mark_notification_read(
    State(state): State<AppState>,
    Path(id): Path<NotificationId>,
    auth: Auth,
) -> Result<Json<NotificationResponse>, ApplicationError> {
    let ctx = authenticate(&state, &auth)?;
    let notification = state.notifier.get(id).await?;
    require_self_or_admin(&ctx, notification.receiver())?;
    let updated = state.notifier.mark_read(id).await?;
    Ok(Json(NotificationResponse::from(&updated)))
}

//! # REST API
//!
//! REST endpoints using axum.
//!
//! # Endpoints
//!
//! ## Auth
//! - `POST /api/v1/auth/token` - Issue a bearer token
//!
//! ## Identities
//! - `POST /api/v1/identities` - Register
//! - `GET /api/v1/identities` - List all accounts (admin)
//! - `GET /api/v1/identities/{id}` - Fetch one account
//! - `GET /api/v1/identities/{id}/profile` - Profile bundle
//! - `POST /api/v1/identities/{id}/wishlist` - Toggle wishlist entry
//! - `POST /api/v1/identities/{id}/following` - Toggle follow edge
//! - `POST /api/v1/identities/{id}/ban` - Ban/unban (admin)
//! - `POST /api/v1/identities/{id}/withdraw` - Wallet withdrawal
//!
//! ## Listings
//! - `GET /api/v1/listings` - Search/filter/sort/paginate
//! - `POST /api/v1/listings` - Create listing
//! - `GET /api/v1/listings/{id}` - Fetch one listing (counts the view)
//! - `POST /api/v1/listings/{id}/purchase` - Purchase
//! - `POST /api/v1/listings/{id}/confirm-receipt` - Confirm delivery
//! - `POST /api/v1/listings/{id}/moderate` - Takedown (admin)
//!
//! ## Reviews
//! - `GET /api/v1/reviews?sellerId=…` - Reviews about a seller
//! - `POST /api/v1/reviews` - Create review
//!
//! ## Notifications
//! - `GET /api/v1/notifications?receiverId=…` - Inbox
//! - `POST /api/v1/notifications/{id}/read` - Mark read
//!
//! ## Health
//! - `GET /api/v1/health` - Health check
//!
//! # Usage
//!
//! ```ignore
//! use campus_market::api::rest::{AppState, create_router};
//!
//! let router = create_router(state);
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, router).await?;
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    AppState, ErrorResponse, HealthResponse, IdentityResponse, ListingResponse,
    NotificationResponse, PaginatedResponse, ProfileResponse, ReviewResponse,
};
pub use routes::create_router;

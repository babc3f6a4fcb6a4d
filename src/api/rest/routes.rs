//! # Router
//!
//! REST route table and middleware stack.

use crate::api::rest::handlers::{self, AppState};
use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Creates the application router.
#[must_use]
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Health
        .route("/health", get(handlers::health_check))
        // Auth
        .route("/auth/token", post(handlers::issue_token))
        // Identities
        .route(
            "/identities",
            get(handlers::list_identities).post(handlers::register_identity),
        )
        .route("/identities/{id}", get(handlers::get_identity))
        .route("/identities/{id}/profile", get(handlers::get_profile))
        .route("/identities/{id}/wishlist", post(handlers::toggle_wishlist))
        .route("/identities/{id}/following", post(handlers::toggle_follow))
        .route("/identities/{id}/ban", post(handlers::set_ban))
        .route("/identities/{id}/withdraw", post(handlers::withdraw))
        // Listings
        .route(
            "/listings",
            get(handlers::list_listings).post(handlers::create_listing),
        )
        .route("/listings/{id}", get(handlers::get_listing))
        .route("/listings/{id}/purchase", post(handlers::purchase_listing))
        .route(
            "/listings/{id}/confirm-receipt",
            post(handlers::confirm_receipt),
        )
        .route("/listings/{id}/moderate", post(handlers::moderate_listing))
        // Reviews
        .route(
            "/reviews",
            get(handlers::list_reviews).post(handlers::create_review),
        )
        // Notifications
        .route("/notifications", get(handlers::list_notifications))
        .route(
            "/notifications/{id}/read",
            post(handlers::mark_notification_read),
        );

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

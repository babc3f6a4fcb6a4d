//! Server binary: wires configuration, repositories and services, then
//! serves the REST API.

use anyhow::Context;
use campus_market::api::rest::{AppState, create_router};
use campus_market::application::services::{
    AccountService, CatalogService, Notifier, ReviewService, TransactionEngine,
};
use campus_market::config::AppConfig;
use campus_market::domain::entities::identity::Identity;
use campus_market::domain::value_objects::{IdentityId, Role};
use campus_market::infrastructure::auth::AuthService;
use campus_market::infrastructure::persistence::IdentityRepository;
use campus_market::infrastructure::persistence::in_memory::{
    InMemoryIdentityRepository, InMemoryListingRepository, InMemoryNotificationRepository,
    InMemoryReviewRepository,
};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::load().context("loading configuration")?;

    let identities: Arc<InMemoryIdentityRepository> =
        Arc::new(InMemoryIdentityRepository::new());
    let listings = Arc::new(InMemoryListingRepository::new());
    let notifications = Arc::new(InMemoryNotificationRepository::new());
    let reviews = Arc::new(InMemoryReviewRepository::new());

    // The system notification sender is resolved once here, never looked
    // up per request.
    let system_id = IdentityId::new(config.market.system_identity.clone());
    if identities.get(&system_id).await?.is_none() {
        identities
            .insert(&Identity::new(system_id.clone(), "system", Role::Admin))
            .await?;
        tracing::info!(identity = %system_id, "provisioned system identity");
    }

    let notifier = Notifier::new(
        notifications,
        system_id,
        config.market.default_takedown_reason.clone(),
    );
    let engine = TransactionEngine::new(
        identities.clone(),
        listings.clone(),
        notifier.clone(),
        config.market.allow_ban_sold,
    );
    let catalog = CatalogService::new(listings.clone(), identities.clone());
    let accounts = AccountService::new(identities.clone(), listings.clone());
    let review_service = ReviewService::new(reviews, listings);
    let auth = Arc::new(AuthService::new(
        &config.auth.jwt_secret,
        config.auth.token_ttl_secs,
    ));

    let state = AppState {
        engine,
        catalog,
        accounts,
        reviews: review_service,
        notifier,
        auth,
        identities,
    };

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, "campus-market listening");

    axum::serve(listener, create_router(state))
        .await
        .context("serving")?;
    Ok(())
}

//! # campus-market
//!
//! Campus marketplace backend: accounts, product listings, an
//! escrow-style peer-to-peer purchase flow, notifications and reviews,
//! exposed over HTTP with bearer-token authentication.
//!
//! The heart of the crate is the transaction engine
//! ([`application::services::TransactionEngine`]): a one-directional
//! listing state machine (`Active → Sold → Received`, with moderation
//! bans) and a wallet ledger in which the seller is paid exactly once,
//! when the buyer confirms delivery. Purchases are written through a
//! conditional update at the persistence boundary, so concurrent buyers
//! of the same listing cannot both win.
//!
//! # Layers
//!
//! - [`domain`] — aggregates, value objects and business rules
//! - [`application`] — use-case services and the error taxonomy
//! - [`infrastructure`] — persistence ports/adapters and token auth
//! - [`api`] — the REST surface
//! - [`config`] — layered runtime configuration

pub mod api;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

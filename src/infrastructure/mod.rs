//! # Infrastructure Layer
//!
//! Adapters for concerns outside the domain: persistence and
//! authentication.

pub mod auth;
pub mod persistence;

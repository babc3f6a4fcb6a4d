//! # Domain Layer
//!
//! Aggregates, value objects and business rules. This layer has no
//! dependency on persistence or transport; everything here is plain data
//! plus invariant-enforcing methods.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use errors::{DomainError, DomainResult};

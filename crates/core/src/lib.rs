//! Worthline Core - Domain entities, services, and traits.
//!
//! This crate contains the net worth business logic. It is database-agnostic
//! and defines repository traits that are implemented by the
//! `storage-sqlite` crate.

pub mod constants;
pub mod errors;
pub mod net_worth;
pub mod positions;
pub mod quotes;
pub mod transactions;
pub mod utils;
pub mod valuations;

// Re-export error types
pub use errors::Error;
pub use errors::Result;

//! SQLite storage implementation for Worthline.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `worthline-core` and contains:
//! - Database connection pooling and the single writer actor
//! - Embedded Diesel migrations
//! - Repository implementations for valuations, transactions, positions and snapshots
//!
//! ```text
//!        core (domain, traits)
//!                  │
//!                  ▼
//!          storage-sqlite (this crate)
//!                  │
//!                  ▼
//!              SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod net_worth;
pub mod positions;
pub mod transactions;
pub mod valuations;

#[cfg(test)]
mod test_utils;

pub use db::{
    create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool,
    WriteHandle,
};

pub use errors::{IntoCore, StorageError};

pub use net_worth::SnapshotRepository;
pub use positions::PositionRepository;
pub use transactions::{CategoryRepository, TransactionRepository};
pub use valuations::ValuationRepository;

// Re-export from worthline-core for convenience
pub use worthline_core::errors::{DatabaseError, Error, Result};

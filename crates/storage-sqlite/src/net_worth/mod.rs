//! SQLite storage implementation for the derived snapshot series.

mod model;
mod repository;

pub use model::SnapshotDB;
pub use repository::SnapshotRepository;

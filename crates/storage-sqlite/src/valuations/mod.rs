//! SQLite storage implementation for valuation points.

mod model;
mod repository;

pub use model::ValuationDB;
pub use repository::ValuationRepository;

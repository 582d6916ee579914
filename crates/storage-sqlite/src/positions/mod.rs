//! SQLite storage implementation for stock positions.

mod model;
mod repository;

pub use model::PositionDB;
pub use repository::PositionRepository;

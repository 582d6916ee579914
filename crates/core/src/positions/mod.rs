//! Positions module - stock holdings valued through market quotes.

mod positions_model;
mod positions_service;
mod positions_traits;


pub use positions_model::{
    aggregate_positions, AggregatedPosition, NewPosition, Position, PositionUpdate, PositionValue,
};
pub use positions_service::PositionService;
pub use positions_traits::{PositionRepositoryTrait, PositionServiceTrait};

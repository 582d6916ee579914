use async_trait::async_trait;

use super::positions_model::{
    AggregatedPosition, NewPosition, Position, PositionUpdate, PositionValue,
};
use crate::errors::Result;

/// Trait for position repository operations
#[async_trait]
pub trait PositionRepositoryTrait: Send + Sync {
    fn list_positions(&self) -> Result<Vec<Position>>;
    fn get_position(&self, position_id: &str) -> Result<Position>;
    async fn insert_position(&self, position: Position) -> Result<Position>;
    async fn update_position(&self, position: Position) -> Result<Position>;
    async fn delete_position(&self, position_id: String) -> Result<usize>;
}

/// Trait for position service operations
#[async_trait]
pub trait PositionServiceTrait: Send + Sync {
    fn get_positions(&self) -> Result<Vec<Position>>;
    fn get_aggregated_positions(&self) -> Result<Vec<AggregatedPosition>>;
    async fn create_position(&self, new_position: NewPosition) -> Result<Position>;
    async fn update_position(
        &self,
        position_id: String,
        update: PositionUpdate,
    ) -> Result<Position>;
    async fn delete_position(&self, position_id: String) -> Result<usize>;
    /// Aggregated positions priced with latest quotes, largest market value first.
    async fn get_position_values(&self) -> Result<Vec<PositionValue>>;
}

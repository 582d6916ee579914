use std::sync::Arc;

use async_trait::async_trait;
use log::debug;
use uuid::Uuid;

use super::positions_model::{
    aggregate_positions, AggregatedPosition, NewPosition, Position, PositionUpdate, PositionValue,
};
use super::positions_traits::{PositionRepositoryTrait, PositionServiceTrait};
use crate::errors::Result;
use crate::quotes::QuoteServiceTrait;

pub struct PositionService {
    repository: Arc<dyn PositionRepositoryTrait>,
    quote_service: Arc<dyn QuoteServiceTrait>,
}

impl PositionService {
    pub fn new(
        repository: Arc<dyn PositionRepositoryTrait>,
        quote_service: Arc<dyn QuoteServiceTrait>,
    ) -> Self {
        PositionService {
            repository,
            quote_service,
        }
    }
}

#[async_trait]
impl PositionServiceTrait for PositionService {
    fn get_positions(&self) -> Result<Vec<Position>> {
        self.repository.list_positions()
    }

    fn get_aggregated_positions(&self) -> Result<Vec<AggregatedPosition>> {
        Ok(aggregate_positions(&self.repository.list_positions()?))
    }

    async fn create_position(&self, new_position: NewPosition) -> Result<Position> {
        new_position.validate()?;
        let position = new_position.into_position(Uuid::now_v7().to_string());
        debug!("Adding {} shares of {}", position.shares, position.symbol);
        self.repository.insert_position(position).await
    }

    async fn update_position(
        &self,
        position_id: String,
        update: PositionUpdate,
    ) -> Result<Position> {
        update.validate()?;
        let existing = self.repository.get_position(&position_id)?;
        self.repository
            .update_position(update.apply_to(existing))
            .await
    }

    async fn delete_position(&self, position_id: String) -> Result<usize> {
        self.repository.delete_position(position_id).await
    }

    async fn get_position_values(&self) -> Result<Vec<PositionValue>> {
        let aggregated = self.get_aggregated_positions()?;
        let symbols: Vec<String> = aggregated.iter().map(|a| a.symbol.clone()).collect();
        let prices = self.quote_service.get_latest_prices(&symbols).await;

        let mut values: Vec<PositionValue> = aggregated
            .iter()
            .map(|a| PositionValue::from_aggregate(a, prices.get(&a.symbol).copied()))
            .collect();
        values.sort_by(|a, b| b.market_value.cmp(&a.market_value));
        Ok(values)
    }
}

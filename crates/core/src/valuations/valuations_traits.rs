use async_trait::async_trait;

use crate::errors::Result;
use crate::valuations::valuations_model::{NewValuationPoint, ValuationPoint, ValuationUpdate};

/// Trait for valuation repository operations
#[async_trait]
pub trait ValuationRepositoryTrait: Send + Sync {
    fn list_valuations(&self) -> Result<Vec<ValuationPoint>>;
    fn get_valuation(&self, valuation_id: &str) -> Result<ValuationPoint>;
    fn count_valuations(&self) -> Result<i64>;
    async fn insert_valuations(&self, points: Vec<ValuationPoint>) -> Result<usize>;
    async fn update_valuation(
        &self,
        valuation_id: String,
        update: ValuationUpdate,
    ) -> Result<ValuationPoint>;
    async fn delete_valuation(&self, valuation_id: String) -> Result<usize>;
}

/// Trait for valuation service operations
#[async_trait]
pub trait ValuationServiceTrait: Send + Sync {
    fn get_valuations(&self) -> Result<Vec<ValuationPoint>>;
    /// Newest first by `date`.
    fn get_recent_valuations(&self, limit: usize) -> Result<Vec<ValuationPoint>>;
    async fn create_valuation(&self, new_point: NewValuationPoint) -> Result<ValuationPoint>;
    async fn update_valuation(
        &self,
        valuation_id: String,
        update: ValuationUpdate,
    ) -> Result<ValuationPoint>;
    async fn delete_valuation(&self, valuation_id: String) -> Result<usize>;
    /// Inserts the demo balance sheet when no valuations exist. Returns the number inserted.
    async fn seed_demo_valuations(&self) -> Result<usize>;
}

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use super::valuations_model::{NewValuationPoint, ValuationKind, ValuationPoint, ValuationUpdate};
use super::valuations_traits::{ValuationRepositoryTrait, ValuationServiceTrait};
use crate::errors::Result;
use crate::utils::time_utils::month_start_utc;
use crate::utils::Month;

pub struct ValuationService {
    repository: Arc<dyn ValuationRepositoryTrait>,
}

impl ValuationService {
    pub fn new(repository: Arc<dyn ValuationRepositoryTrait>) -> Self {
        ValuationService { repository }
    }

    /// Demo balance sheet: each item valued twelve months ago and in `current`.
    fn demo_points(current: Month) -> Vec<NewValuationPoint> {
        let seed: [(ValuationKind, &str, Decimal, Decimal); 4] = [
            (ValuationKind::Asset, "House", dec!(400000), dec!(440000)),
            (ValuationKind::Asset, "Car", dec!(25000), dec!(21000)),
            (ValuationKind::Liability, "Mortgage", dec!(320000), dec!(280000)),
            (ValuationKind::Asset, "Cash", dec!(10000), dec!(12000)),
        ];

        let year_ago = current.add_months(-12);
        let mut points = Vec::with_capacity(seed.len() * 2);
        for (kind, name, then, now) in seed {
            for (month, value) in [(year_ago, then), (current, now)] {
                points.push(NewValuationPoint {
                    kind,
                    name: name.to_string(),
                    value,
                    date: month_start_utc(month),
                    month: Some(month),
                    desc: None,
                });
            }
        }
        points
    }
}

#[async_trait]
impl ValuationServiceTrait for ValuationService {
    fn get_valuations(&self) -> Result<Vec<ValuationPoint>> {
        self.repository.list_valuations()
    }

    fn get_recent_valuations(&self, limit: usize) -> Result<Vec<ValuationPoint>> {
        let mut points = self.repository.list_valuations()?;
        points.sort_by(|a, b| b.date.cmp(&a.date));
        points.truncate(limit);
        Ok(points)
    }

    async fn create_valuation(&self, new_point: NewValuationPoint) -> Result<ValuationPoint> {
        new_point.validate()?;
        let point = new_point.into_point(Uuid::now_v7().to_string());
        debug!(
            "Recording {} '{}' = {} for {}",
            point.kind, point.name, point.value, point.month
        );
        self.repository.insert_valuations(vec![point.clone()]).await?;
        Ok(point)
    }

    async fn update_valuation(
        &self,
        valuation_id: String,
        update: ValuationUpdate,
    ) -> Result<ValuationPoint> {
        update.validate()?;
        self.repository.update_valuation(valuation_id, update).await
    }

    async fn delete_valuation(&self, valuation_id: String) -> Result<usize> {
        self.repository.delete_valuation(valuation_id).await
    }

    async fn seed_demo_valuations(&self) -> Result<usize> {
        if self.repository.count_valuations()? > 0 {
            debug!("Valuations already present, skipping demo seed");
            return Ok(0);
        }

        let points: Vec<ValuationPoint> = Self::demo_points(Month::current())
            .into_iter()
            .map(|p| p.into_point(Uuid::now_v7().to_string()))
            .collect();
        let inserted = self.repository.insert_valuations(points).await?;
        info!("Seeded {} demo valuations", inserted);
        Ok(inserted)
    }
}

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;

use worthline_core::errors::{Error, Result};
use worthline_core::valuations::{ValuationPoint, ValuationRepositoryTrait, ValuationUpdate};

use super::model::ValuationDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::valuations;
use crate::utils::decimal_to_text;

pub struct ValuationRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl ValuationRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        ValuationRepository { pool, writer }
    }
}

fn find_valuation(conn: &mut SqliteConnection, valuation_id: &str) -> Result<ValuationPoint> {
    let row = valuations::table
        .find(valuation_id)
        .select(ValuationDB::as_select())
        .first(conn)
        .optional()
        .into_core()?
        .ok_or_else(|| Error::not_found(format!("Valuation {}", valuation_id)))?;
    Ok(ValuationPoint::try_from(row)?)
}

#[async_trait]
impl ValuationRepositoryTrait for ValuationRepository {
    /// Ordered by recorded date, then id, which the snapshot engine treats as input order.
    fn list_valuations(&self) -> Result<Vec<ValuationPoint>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = valuations::table
            .order((valuations::date.asc(), valuations::id.asc()))
            .select(ValuationDB::as_select())
            .load(&mut conn)
            .into_core()?;
        Ok(rows
            .into_iter()
            .map(ValuationPoint::try_from)
            .collect::<std::result::Result<Vec<_>, StorageError>>()?)
    }

    fn get_valuation(&self, valuation_id: &str) -> Result<ValuationPoint> {
        let mut conn = get_connection(&self.pool)?;
        find_valuation(&mut conn, valuation_id)
    }

    fn count_valuations(&self) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        valuations::table.count().get_result(&mut conn).into_core()
    }

    async fn insert_valuations(&self, points: Vec<ValuationPoint>) -> Result<usize> {
        let rows: Vec<ValuationDB> = points.into_iter().map(ValuationDB::from).collect();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::insert_into(valuations::table)
                    .values(&rows)
                    .execute(conn)
                    .into_core()
            })
            .await
    }

    async fn update_valuation(
        &self,
        valuation_id: String,
        update: ValuationUpdate,
    ) -> Result<ValuationPoint> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<ValuationPoint> {
                let target = valuations::table.find(&valuation_id);
                let new_value = decimal_to_text(update.value);
                let affected = match update.desc {
                    Some(new_desc) => diesel::update(target)
                        .set((
                            valuations::value.eq(new_value),
                            valuations::description.eq(new_desc),
                        ))
                        .execute(conn),
                    None => diesel::update(target)
                        .set(valuations::value.eq(new_value))
                        .execute(conn),
                }
                .into_core()?;
                if affected == 0 {
                    return Err(Error::not_found(format!("Valuation {}", valuation_id)));
                }
                find_valuation(conn, &valuation_id)
            })
            .await
    }

    async fn delete_valuation(&self, valuation_id: String) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::delete(valuations::table.find(valuation_id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }
}

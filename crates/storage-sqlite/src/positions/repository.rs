use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;

use worthline_core::errors::{Error, Result};
use worthline_core::positions::{Position, PositionRepositoryTrait};

use super::model::PositionDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::positions;

pub struct PositionRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl PositionRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        PositionRepository { pool, writer }
    }
}

fn find_position(conn: &mut SqliteConnection, position_id: &str) -> Result<Position> {
    let row = positions::table
        .find(position_id)
        .select(PositionDB::as_select())
        .first(conn)
        .optional()
        .into_core()?
        .ok_or_else(|| Error::not_found(format!("Position {}", position_id)))?;
    Ok(Position::try_from(row)?)
}

#[async_trait]
impl PositionRepositoryTrait for PositionRepository {
    /// Ordered by the date each lot was added.
    fn list_positions(&self) -> Result<Vec<Position>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = positions::table
            .order((positions::added_date.asc(), positions::id.asc()))
            .select(PositionDB::as_select())
            .load(&mut conn)
            .into_core()?;
        Ok(rows
            .into_iter()
            .map(Position::try_from)
            .collect::<std::result::Result<Vec<_>, StorageError>>()?)
    }

    fn get_position(&self, position_id: &str) -> Result<Position> {
        let mut conn = get_connection(&self.pool)?;
        find_position(&mut conn, position_id)
    }

    async fn insert_position(&self, position: Position) -> Result<Position> {
        let row = PositionDB::from(position);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Position> {
                let stored = diesel::insert_into(positions::table)
                    .values(&row)
                    .returning(PositionDB::as_returning())
                    .get_result(conn)
                    .into_core()?;
                Ok(Position::try_from(stored)?)
            })
            .await
    }

    async fn update_position(&self, position: Position) -> Result<Position> {
        let row = PositionDB::from(position);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Position> {
                let affected = diesel::update(positions::table.find(&row.id))
                    .set(&row)
                    .execute(conn)
                    .into_core()?;
                if affected == 0 {
                    return Err(Error::not_found(format!("Position {}", row.id)));
                }
                find_position(conn, &row.id)
            })
            .await
    }

    async fn delete_position(&self, position_id: String) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::delete(positions::table.find(position_id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }
}

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use log::debug;

use worthline_core::errors::Result;
use worthline_core::net_worth::{MonthlySnapshot, SnapshotRepositoryTrait};

use super::model::SnapshotDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::net_worth_snapshots;

pub struct SnapshotRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SnapshotRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        SnapshotRepository { pool, writer }
    }
}

#[async_trait]
impl SnapshotRepositoryTrait for SnapshotRepository {
    fn list_snapshots(&self) -> Result<Vec<MonthlySnapshot>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = net_worth_snapshots::table
            .order(net_worth_snapshots::month.asc())
            .select(SnapshotDB::as_select())
            .load(&mut conn)
            .into_core()?;
        Ok(rows
            .into_iter()
            .map(MonthlySnapshot::try_from)
            .collect::<std::result::Result<Vec<_>, StorageError>>()?)
    }

    /// Delete and insert run in one writer job, so readers never see a partial series.
    async fn replace_snapshots(&self, snapshots: Vec<MonthlySnapshot>) -> Result<usize> {
        let rows: Vec<SnapshotDB> = snapshots.into_iter().map(SnapshotDB::from).collect();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let removed = diesel::delete(net_worth_snapshots::table)
                    .execute(conn)
                    .into_core()?;
                let inserted = if rows.is_empty() {
                    0
                } else {
                    diesel::insert_into(net_worth_snapshots::table)
                        .values(&rows)
                        .execute(conn)
                        .into_core()?
                };
                debug!("Replaced {} cached snapshots with {}", removed, inserted);
                Ok(inserted)
            })
            .await
    }
}

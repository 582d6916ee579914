use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use uuid::Uuid;

use worthline_core::errors::{Error, Result};
use worthline_core::transactions::{
    Category, CategoryRepositoryTrait, Transaction, TransactionRepositoryTrait,
};

use super::model::{CategoryDB, TransactionDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::{categories, transactions};

pub struct TransactionRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl TransactionRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        TransactionRepository { pool, writer }
    }
}

fn find_transaction(conn: &mut SqliteConnection, transaction_id: &str) -> Result<Transaction> {
    let row = transactions::table
        .find(transaction_id)
        .select(TransactionDB::as_select())
        .first(conn)
        .optional()
        .into_core()?
        .ok_or_else(|| Error::not_found(format!("Transaction {}", transaction_id)))?;
    Ok(Transaction::try_from(row)?)
}

#[async_trait]
impl TransactionRepositoryTrait for TransactionRepository {
    fn list_transactions(&self) -> Result<Vec<Transaction>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = transactions::table
            .order((transactions::date.asc(), transactions::id.asc()))
            .select(TransactionDB::as_select())
            .load(&mut conn)
            .into_core()?;
        Ok(rows
            .into_iter()
            .map(Transaction::try_from)
            .collect::<std::result::Result<Vec<_>, StorageError>>()?)
    }

    fn get_transaction(&self, transaction_id: &str) -> Result<Transaction> {
        let mut conn = get_connection(&self.pool)?;
        find_transaction(&mut conn, transaction_id)
    }

    async fn insert_transactions(&self, new_transactions: Vec<Transaction>) -> Result<usize> {
        if new_transactions.is_empty() {
            return Ok(0);
        }
        let rows: Vec<TransactionDB> = new_transactions
            .into_iter()
            .map(TransactionDB::from)
            .collect();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::insert_into(transactions::table)
                    .values(&rows)
                    .execute(conn)
                    .into_core()
            })
            .await
    }

    async fn update_transaction(&self, transaction: Transaction) -> Result<Transaction> {
        let row = TransactionDB::from(transaction);
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<Transaction> {
                let affected = diesel::update(transactions::table.find(&row.id))
                    .set(&row)
                    .execute(conn)
                    .into_core()?;
                if affected == 0 {
                    return Err(Error::not_found(format!("Transaction {}", row.id)));
                }
                find_transaction(conn, &row.id)
            })
            .await
    }

    async fn delete_transaction(&self, transaction_id: String) -> Result<usize> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                diesel::delete(transactions::table.find(transaction_id))
                    .execute(conn)
                    .into_core()
            })
            .await
    }
}

pub struct CategoryRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl CategoryRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        CategoryRepository { pool, writer }
    }
}

#[async_trait]
impl CategoryRepositoryTrait for CategoryRepository {
    fn list_categories(&self) -> Result<Vec<Category>> {
        let mut conn = get_connection(&self.pool)?;
        let rows = categories::table
            .order(categories::name.asc())
            .select(CategoryDB::as_select())
            .load(&mut conn)
            .into_core()?;
        Ok(rows.into_iter().map(Category::from).collect())
    }

    async fn ensure_categories(&self, names: Vec<String>) -> Result<usize> {
        let rows: Vec<CategoryDB> = names
            .into_iter()
            .map(|name| CategoryDB {
                id: Uuid::now_v7().to_string(),
                name,
            })
            .collect();
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<usize> {
                let mut inserted = 0;
                for row in &rows {
                    inserted += diesel::insert_or_ignore_into(categories::table)
                        .values(row)
                        .execute(conn)
                        .into_core()?;
                }
                Ok(inserted)
            })
            .await
    }
}

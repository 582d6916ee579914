use async_trait::async_trait;

use super::csv_import::{CsvColumnMapping, CsvPreview, ImportSummary};
use super::transactions_model::{
    Category, NewTransaction, Transaction, TransactionFilter, TransactionUpdate,
};
use crate::errors::Result;

/// Trait for transaction repository operations
#[async_trait]
pub trait TransactionRepositoryTrait: Send + Sync {
    fn list_transactions(&self) -> Result<Vec<Transaction>>;
    fn get_transaction(&self, transaction_id: &str) -> Result<Transaction>;
    async fn insert_transactions(&self, transactions: Vec<Transaction>) -> Result<usize>;
    async fn update_transaction(&self, transaction: Transaction) -> Result<Transaction>;
    async fn delete_transaction(&self, transaction_id: String) -> Result<usize>;
}

/// Trait for category repository operations
#[async_trait]
pub trait CategoryRepositoryTrait: Send + Sync {
    fn list_categories(&self) -> Result<Vec<Category>>;
    /// Inserts the names that do not exist yet. Returns the number inserted.
    async fn ensure_categories(&self, names: Vec<String>) -> Result<usize>;
}

/// Trait for transaction service operations
#[async_trait]
pub trait TransactionServiceTrait: Send + Sync {
    /// Matching transactions, newest first.
    fn get_transactions(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>>;
    async fn create_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction>;
    async fn update_transaction(
        &self,
        transaction_id: String,
        update: TransactionUpdate,
    ) -> Result<Transaction>;
    async fn delete_transaction(&self, transaction_id: String) -> Result<usize>;
    fn get_categories(&self) -> Result<Vec<Category>>;
    async fn create_category(&self, name: String) -> Result<Category>;
    fn preview_csv(&self, content: &str) -> Result<CsvPreview>;
    async fn import_csv(&self, content: &str, mapping: CsvColumnMapping) -> Result<ImportSummary>;
}

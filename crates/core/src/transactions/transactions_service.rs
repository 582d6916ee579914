use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};
use uuid::Uuid;

use super::csv_import::{self, CsvColumnMapping, CsvPreview, ImportSummary};
use super::transactions_model::{
    Category, NewTransaction, Transaction, TransactionFilter, TransactionUpdate,
};
use super::transactions_traits::{
    CategoryRepositoryTrait, TransactionRepositoryTrait, TransactionServiceTrait,
};
use crate::errors::{Error, Result};

pub struct TransactionService {
    transaction_repository: Arc<dyn TransactionRepositoryTrait>,
    category_repository: Arc<dyn CategoryRepositoryTrait>,
}

impl TransactionService {
    pub fn new(
        transaction_repository: Arc<dyn TransactionRepositoryTrait>,
        category_repository: Arc<dyn CategoryRepositoryTrait>,
    ) -> Self {
        TransactionService {
            transaction_repository,
            category_repository,
        }
    }

    /// Registers every category used by `transactions`.
    async fn register_categories(&self, transactions: &[Transaction]) -> Result<()> {
        let names: BTreeSet<String> = transactions.iter().map(|t| t.category.clone()).collect();
        if names.is_empty() {
            return Ok(());
        }
        let added = self
            .category_repository
            .ensure_categories(names.into_iter().collect())
            .await?;
        if added > 0 {
            debug!("Registered {} new categories", added);
        }
        Ok(())
    }
}

#[async_trait]
impl TransactionServiceTrait for TransactionService {
    fn get_transactions(&self, filter: &TransactionFilter) -> Result<Vec<Transaction>> {
        let mut transactions: Vec<Transaction> = self
            .transaction_repository
            .list_transactions()?
            .into_iter()
            .filter(|t| filter.matches(t))
            .collect();
        transactions.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(transactions)
    }

    async fn create_transaction(&self, new_transaction: NewTransaction) -> Result<Transaction> {
        let transaction = new_transaction.into_transaction(Uuid::now_v7().to_string());
        self.transaction_repository
            .insert_transactions(vec![transaction.clone()])
            .await?;
        self.register_categories(std::slice::from_ref(&transaction))
            .await?;
        Ok(transaction)
    }

    async fn update_transaction(
        &self,
        transaction_id: String,
        update: TransactionUpdate,
    ) -> Result<Transaction> {
        let existing = self.transaction_repository.get_transaction(&transaction_id)?;
        let updated = self
            .transaction_repository
            .update_transaction(update.apply_to(existing))
            .await?;
        self.register_categories(std::slice::from_ref(&updated))
            .await?;
        Ok(updated)
    }

    async fn delete_transaction(&self, transaction_id: String) -> Result<usize> {
        self.transaction_repository
            .delete_transaction(transaction_id)
            .await
    }

    fn get_categories(&self) -> Result<Vec<Category>> {
        let mut categories = self.category_repository.list_categories()?;
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn create_category(&self, name: String) -> Result<Category> {
        let name = Category::validate_name(&name)?;
        self.category_repository
            .ensure_categories(vec![name.clone()])
            .await?;
        self.category_repository
            .list_categories()?
            .into_iter()
            .find(|c| c.name == name)
            .ok_or_else(|| Error::Repository(format!("Category '{}' was not stored", name)))
    }

    fn preview_csv(&self, content: &str) -> Result<CsvPreview> {
        csv_import::preview_csv(content)
    }

    async fn import_csv(&self, content: &str, mapping: CsvColumnMapping) -> Result<ImportSummary> {
        let parsed = csv_import::parse_csv(content)?;
        let (new_transactions, row_errors) = mapping.map_rows(&parsed)?;

        let transactions: Vec<Transaction> = new_transactions
            .into_iter()
            .map(|t| t.into_transaction(Uuid::now_v7().to_string()))
            .collect();

        let imported = if transactions.is_empty() {
            0
        } else {
            let count = self
                .transaction_repository
                .insert_transactions(transactions.clone())
                .await?;
            self.register_categories(&transactions).await?;
            count
        };

        info!(
            "CSV import finished: {} imported, {} failed",
            imported,
            row_errors.len()
        );

        Ok(ImportSummary {
            imported,
            errors: row_errors.len(),
            row_errors,
        })
    }
}

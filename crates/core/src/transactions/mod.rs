//! Transactions module - dated cash flows, categories and CSV import.

mod csv_import;
mod transactions_model;
mod transactions_service;
mod transactions_traits;


pub use csv_import::{
    parse_amount, parse_csv, preview_csv, CsvColumnMapping, CsvPreview, ImportRowError, ImportSummary,
    ParsedCsv,
};
pub use transactions_model::{
    Category, NewTransaction, Transaction, TransactionFilter, TransactionUpdate,
};
pub use transactions_service::TransactionService;
pub use transactions_traits::{
    CategoryRepositoryTrait, TransactionRepositoryTrait, TransactionServiceTrait,
};

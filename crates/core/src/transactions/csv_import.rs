//! CSV parsing and column mapping for transaction imports.
//!
//! The first record is the header row. Values are trimmed, quoted fields may
//! contain `""` escapes, and rows whose column count differs from the header
//! are skipped.

use csv::{ReaderBuilder, Trim};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::transactions_model::NewTransaction;
use crate::constants::CSV_PREVIEW_ROWS;
use crate::errors::{Error, Result, ValidationError};
use crate::utils::time_utils::parse_date_input;

lazy_static! {
    /// Everything that is not part of a plain signed decimal
    static ref NON_NUMERIC_REGEX: Regex = Regex::new(r"[^0-9.\-]").expect("Invalid regex pattern");
}

/// Header row plus data rows of a CSV document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedCsv {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Rows dropped because their column count did not match the header
    pub skipped_rows: usize,
}

/// First rows of a CSV document, used to choose a column mapping.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvPreview {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub total_rows: usize,
}

/// Which header feeds which transaction field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CsvColumnMapping {
    pub date: String,
    pub amount: String,
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub account: Option<String>,
}

/// A data row that could not be imported.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImportRowError {
    /// Zero-based index into the data rows (header excluded)
    pub row_index: usize,
    pub message: String,
}

/// Outcome of a CSV import.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub imported: usize,
    pub errors: usize,
    pub row_errors: Vec<ImportRowError>,
}

/// Parses CSV text into a header row and the rows that match its width.
pub fn parse_csv(content: &str) -> Result<ParsedCsv> {
    let content = content.trim_start_matches('\u{feff}');

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(content.as_bytes());

    let mut records = reader
        .records()
        .map(|r| r.map(|record| record.iter().map(str::to_string).collect::<Vec<String>>()))
        .filter(|r| match r {
            Ok(row) => !row.iter().all(|cell| cell.is_empty()),
            Err(_) => true,
        });

    let headers = match records.next() {
        Some(row) => row?,
        None => {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "CSV file is empty".to_string(),
            )))
        }
    };

    let mut rows = Vec::new();
    let mut skipped_rows = 0;
    for record in records {
        let row = record?;
        if row.len() != headers.len() {
            skipped_rows += 1;
            continue;
        }
        rows.push(row);
    }

    if skipped_rows > 0 {
        debug!("Skipped {} CSV rows with a mismatched column count", skipped_rows);
    }

    Ok(ParsedCsv {
        headers,
        rows,
        skipped_rows,
    })
}

/// Headers and the first rows of a CSV document.
pub fn preview_csv(content: &str) -> Result<CsvPreview> {
    let parsed = parse_csv(content)?;
    let total_rows = parsed.rows.len();
    Ok(CsvPreview {
        headers: parsed.headers,
        rows: parsed.rows.into_iter().take(CSV_PREVIEW_ROWS).collect(),
        total_rows,
    })
}

/// Parses a money amount, ignoring currency symbols, separators and spaces.
///
/// `"$1,234.50"` is 1234.50 and `"-45.00 USD"` is -45.
pub fn parse_amount(raw: &str) -> Result<Decimal> {
    let cleaned = NON_NUMERIC_REGEX.replace_all(raw, "");
    if cleaned.is_empty() {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "Amount '{}' has no digits",
            raw
        ))));
    }
    cleaned
        .parse::<Decimal>()
        .map_err(|e| Error::Validation(ValidationError::DecimalParse(e)))
}

/// Column positions resolved from a mapping.
struct ResolvedColumns {
    date: usize,
    amount: usize,
    description: usize,
    category: Option<usize>,
    account: Option<usize>,
}

fn column_index(headers: &[String], name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| {
            Error::Validation(ValidationError::InvalidInput(format!(
                "Column '{}' not found in CSV header",
                name
            )))
        })
}

fn optional_column(headers: &[String], name: Option<&str>) -> Result<Option<usize>> {
    match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => column_index(headers, name).map(Some),
        None => Ok(None),
    }
}

impl CsvColumnMapping {
    fn resolve(&self, headers: &[String]) -> Result<ResolvedColumns> {
        Ok(ResolvedColumns {
            date: column_index(headers, &self.date)?,
            amount: column_index(headers, &self.amount)?,
            description: column_index(headers, &self.description)?,
            category: optional_column(headers, self.category.as_deref())?,
            account: optional_column(headers, self.account.as_deref())?,
        })
    }

    /// Maps parsed rows to transactions. Rows that fail are reported, not fatal.
    ///
    /// An unknown column name in the mapping is an error for the whole batch.
    pub fn map_rows(
        &self,
        parsed: &ParsedCsv,
    ) -> Result<(Vec<NewTransaction>, Vec<ImportRowError>)> {
        let columns = self.resolve(&parsed.headers)?;
        let mut transactions = Vec::with_capacity(parsed.rows.len());
        let mut row_errors = Vec::new();

        for (row_index, row) in parsed.rows.iter().enumerate() {
            match map_row(row, &columns) {
                Ok(transaction) => transactions.push(transaction),
                Err(e) => row_errors.push(ImportRowError {
                    row_index,
                    message: e.to_string(),
                }),
            }
        }

        Ok((transactions, row_errors))
    }
}

fn map_row(row: &[String], columns: &ResolvedColumns) -> Result<NewTransaction> {
    let date_raw = &row[columns.date];
    let amount_raw = &row[columns.amount];
    if date_raw.is_empty() {
        return Err(Error::Validation(ValidationError::MissingField(
            "date".to_string(),
        )));
    }
    if amount_raw.is_empty() {
        return Err(Error::Validation(ValidationError::MissingField(
            "amount".to_string(),
        )));
    }

    Ok(NewTransaction {
        date: parse_date_input(date_raw)?,
        amount: parse_amount(amount_raw)?,
        description: Some(row[columns.description].clone()),
        category: columns.category.map(|i| row[i].clone()),
        account: columns.account.map(|i| row[i].clone()),
        notes: None,
    })
}

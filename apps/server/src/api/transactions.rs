use std::sync::Arc;

use crate::{api::shared::trigger_snapshot_recompute, error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use worthline_core::errors::Error as CoreError;
use worthline_core::transactions::{
    Category, CsvColumnMapping, CsvPreview, ImportSummary, NewTransaction, Transaction,
    TransactionFilter, TransactionUpdate,
};

async fn get_transactions(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<TransactionFilter>,
) -> ApiResult<Json<Vec<Transaction>>> {
    let transactions = state.transaction_service.get_transactions(&filter)?;
    Ok(Json(transactions))
}

async fn create_transaction(
    State(state): State<Arc<AppState>>,
    Json(new_transaction): Json<NewTransaction>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    let transaction = state
        .transaction_service
        .create_transaction(new_transaction)
        .await?;
    trigger_snapshot_recompute(state);
    Ok((StatusCode::CREATED, Json(transaction)))
}

async fn update_transaction(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(update): Json<TransactionUpdate>,
) -> ApiResult<Json<Transaction>> {
    let transaction = state
        .transaction_service
        .update_transaction(id, update)
        .await?;
    trigger_snapshot_recompute(state);
    Ok(Json(transaction))
}

async fn delete_transaction(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    let deleted = state
        .transaction_service
        .delete_transaction(id.clone())
        .await?;
    if deleted == 0 {
        return Err(CoreError::not_found(format!("Transaction {}", id)).into());
    }
    trigger_snapshot_recompute(state);
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Deserialize)]
struct CsvPreviewBody {
    content: String,
}

async fn preview_import(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CsvPreviewBody>,
) -> ApiResult<Json<CsvPreview>> {
    let preview = state.transaction_service.preview_csv(&body.content)?;
    Ok(Json(preview))
}

#[derive(Deserialize)]
struct CsvImportBody {
    content: String,
    mapping: CsvColumnMapping,
}

async fn import_transactions(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CsvImportBody>,
) -> ApiResult<Json<ImportSummary>> {
    let summary = state
        .transaction_service
        .import_csv(&body.content, body.mapping)
        .await?;
    if summary.imported > 0 {
        trigger_snapshot_recompute(state);
    }
    Ok(Json(summary))
}

async fn get_categories(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Category>>> {
    let categories = state.transaction_service.get_categories()?;
    Ok(Json(categories))
}

#[derive(Deserialize)]
struct NewCategoryBody {
    name: String,
}

async fn create_category(
    State(state): State<Arc<AppState>>,
    Json(body): Json<NewCategoryBody>,
) -> ApiResult<Json<Category>> {
    let category = state.transaction_service.create_category(body.name).await?;
    Ok(Json(category))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/transactions",
            get(get_transactions).post(create_transaction),
        )
        .route("/transactions/import/preview", post(preview_import))
        .route("/transactions/import", post(import_transactions))
        .route(
            "/transactions/{id}",
            put(update_transaction).delete(delete_transaction),
        )
        .route("/categories", get(get_categories).post(create_category))
}

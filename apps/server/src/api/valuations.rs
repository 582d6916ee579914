use std::sync::Arc;

use crate::{
    api::shared::{trigger_snapshot_recompute, LimitQuery},
    error::ApiResult,
    main_lib::AppState,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use worthline_core::errors::Error as CoreError;
use worthline_core::valuations::{NewValuationPoint, ValuationPoint, ValuationUpdate};

async fn get_valuations(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<ValuationPoint>>> {
    let points = state.valuation_service.get_valuations()?;
    Ok(Json(points))
}

async fn get_recent_valuations(
    State(state): State<Arc<AppState>>,
    Query(q): Query<LimitQuery>,
) -> ApiResult<Json<Vec<ValuationPoint>>> {
    let points = state.valuation_service.get_recent_valuations(q.limit())?;
    Ok(Json(points))
}

async fn create_valuation(
    State(state): State<Arc<AppState>>,
    Json(new_point): Json<NewValuationPoint>,
) -> ApiResult<(StatusCode, Json<ValuationPoint>)> {
    let point = state.valuation_service.create_valuation(new_point).await?;
    trigger_snapshot_recompute(state);
    Ok((StatusCode::CREATED, Json(point)))
}

async fn update_valuation(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(update): Json<ValuationUpdate>,
) -> ApiResult<Json<ValuationPoint>> {
    let point = state.valuation_service.update_valuation(id, update).await?;
    trigger_snapshot_recompute(state);
    Ok(Json(point))
}

async fn delete_valuation(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    let deleted = state.valuation_service.delete_valuation(id.clone()).await?;
    if deleted == 0 {
        return Err(CoreError::not_found(format!("Valuation {}", id)).into());
    }
    trigger_snapshot_recompute(state);
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SeedResponse {
    inserted: usize,
}

async fn seed_demo_valuations(State(state): State<Arc<AppState>>) -> ApiResult<Json<SeedResponse>> {
    let inserted = state.valuation_service.seed_demo_valuations().await?;
    if inserted > 0 {
        trigger_snapshot_recompute(state);
    }
    Ok(Json(SeedResponse { inserted }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/valuations", get(get_valuations).post(create_valuation))
        .route("/valuations/recent", get(get_recent_valuations))
        .route("/valuations/seed-demo", post(seed_demo_valuations))
        .route(
            "/valuations/{id}",
            put(update_valuation).delete(delete_valuation),
        )
}

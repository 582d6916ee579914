use std::sync::Arc;

use crate::{api::shared::trigger_snapshot_recompute, error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use worthline_core::errors::Error as CoreError;
use worthline_core::positions::{
    AggregatedPosition, NewPosition, Position, PositionUpdate, PositionValue,
};

async fn get_positions(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Position>>> {
    let positions = state.position_service.get_positions()?;
    Ok(Json(positions))
}

async fn get_aggregated_positions(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<AggregatedPosition>>> {
    let aggregated = state.position_service.get_aggregated_positions()?;
    Ok(Json(aggregated))
}

async fn get_position_values(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<PositionValue>>> {
    let values = state.position_service.get_position_values().await?;
    Ok(Json(values))
}

async fn create_position(
    State(state): State<Arc<AppState>>,
    Json(new_position): Json<NewPosition>,
) -> ApiResult<(StatusCode, Json<Position>)> {
    let position = state.position_service.create_position(new_position).await?;
    trigger_snapshot_recompute(state);
    Ok((StatusCode::CREATED, Json(position)))
}

async fn update_position(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(update): Json<PositionUpdate>,
) -> ApiResult<Json<Position>> {
    let position = state.position_service.update_position(id, update).await?;
    trigger_snapshot_recompute(state);
    Ok(Json(position))
}

async fn delete_position(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    let deleted = state.position_service.delete_position(id.clone()).await?;
    if deleted == 0 {
        return Err(CoreError::not_found(format!("Position {}", id)).into());
    }
    trigger_snapshot_recompute(state);
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/positions", get(get_positions).post(create_position))
        .route("/positions/aggregated", get(get_aggregated_positions))
        .route("/positions/values", get(get_position_values))
        .route(
            "/positions/{id}",
            put(update_position).delete(delete_position),
        )
}

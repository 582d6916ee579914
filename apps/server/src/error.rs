use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use worthline_core::errors::{DatabaseError, Error as CoreError};
use worthline_market_data::MarketDataError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

fn market_data_status(err: &MarketDataError) -> StatusCode {
    match err {
        MarketDataError::NoProvidersAvailable => StatusCode::SERVICE_UNAVAILABLE,
        MarketDataError::SymbolNotFound(_) | MarketDataError::NoDataForRange => {
            StatusCode::NOT_FOUND
        }
        MarketDataError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        MarketDataError::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
        MarketDataError::ValidationFailed { .. } => StatusCode::BAD_REQUEST,
        MarketDataError::NotSupported { .. } => StatusCode::NOT_IMPLEMENTED,
        _ => StatusCode::BAD_GATEWAY,
    }
}

fn core_status(err: &CoreError) -> StatusCode {
    match err {
        CoreError::Validation(_) => StatusCode::BAD_REQUEST,
        CoreError::ConstraintViolation(_) => StatusCode::CONFLICT,
        CoreError::Database(DatabaseError::NotFound(_)) => StatusCode::NOT_FOUND,
        CoreError::Database(DatabaseError::UniqueViolation(_)) => StatusCode::CONFLICT,
        CoreError::MarketData(e) => market_data_status(e),
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Core(e) => core_status(e),
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Anyhow(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use worthline_core::errors::ValidationError;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_of(CoreError::Validation(ValidationError::MissingField("date".into())).into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(CoreError::not_found("Valuation x").into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(CoreError::MarketData(MarketDataError::NoProvidersAvailable).into()),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_of(CoreError::Unexpected("boom".into()).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

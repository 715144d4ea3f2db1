use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Json,
};
use common::PriceTable;
use tracing::{info, instrument};

use crate::helpers::converters::{HandlerError, compute_error_response, resolution_to_rows};
use crate::schemas::{ApiResponse, AppState, ErrorResponse, PricesQuery};

/// Get the scored price table for a date range
///
/// Missing dates default to today. When history cannot be read the forecast
/// horizon is returned and the message says so.
#[utoipa::path(
    get,
    path = "/api/v1/prices",
    tag = "prices",
    params(
        ("start_date" = Option<String>, Query, description = "Start date (YYYY-MM-DD)"),
        ("end_date" = Option<String>, Query, description = "End date (YYYY-MM-DD)"),
    ),
    responses(
        (status = 200, description = "Scored price rows", body = ApiResponse<PriceTable>),
        (status = 400, description = "End date before start date", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_prices(
    Query(query): Query<PricesQuery>,
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<PriceTable>>, HandlerError> {
    let today = state.today();
    let start = query.start_date.unwrap_or(today);
    let end = query.end_date.unwrap_or(today);

    let range = state.validator.validate(start, end).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: e.to_string(),
                code: "INVALID_DATE_RANGE".to_string(),
                success: false,
            }),
        )
    })?;

    let resolution = state
        .pipeline
        .resolve(range, today)
        .await
        .map_err(compute_error_response)?;
    let table = PriceTable::new(resolution_to_rows(&resolution)?);
    info!(rows = table.len(), fallback = resolution.is_fallback(), "Prices resolved");

    let message = match resolution.notice() {
        Some(notice) => notice.message,
        None => "Prices retrieved successfully".to_string(),
    };

    Ok(Json(ApiResponse {
        data: table,
        message,
        success: true,
    }))
}

use axum::{extract::State, response::Json};
use common::SummaryTiles;
use compute::summary::summarize;
use tracing::instrument;

use crate::helpers::converters::{HandlerError, compute_error_response};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Get today's summary tiles, averaged over the forecast horizon
#[utoipa::path(
    get,
    path = "/api/v1/summary",
    tag = "summary",
    responses(
        (status = 200, description = "Summary tiles", body = ApiResponse<SummaryTiles>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_summary(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<SummaryTiles>>, HandlerError> {
    let tiles = summarize(state.pipeline.forecast(), state.today()).map_err(compute_error_response)?;

    Ok(Json(ApiResponse {
        data: tiles,
        message: "Summary retrieved successfully".to_string(),
        success: true,
    }))
}

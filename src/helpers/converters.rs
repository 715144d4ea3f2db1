use axum::{http::StatusCode, response::Json};
use common::PricePoint;
use compute::error::ComputeError;
use compute::pipeline::Resolution;
use compute::table::to_price_points;
use tracing::error;

use crate::schemas::ErrorResponse;

pub type HandlerError = (StatusCode, Json<ErrorResponse>);

/// Maps a pipeline failure to an HTTP error.
///
/// Schema mismatches mean the model and its inputs disagree, which no request
/// can fix, so they are reported as server errors with their own code.
pub fn compute_error_response(e: ComputeError) -> HandlerError {
    let code = match &e {
        ComputeError::Schema(_) => "SCHEMA_MISMATCH",
        ComputeError::Model(_) => "MODEL_ERROR",
        ComputeError::Database(_) => "DATABASE_ERROR",
        _ => "COMPUTE_ERROR",
    };
    error!(code, error = %e, "Request failed");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: e.to_string(),
            code: code.to_string(),
            success: false,
        }),
    )
}

/// Transport rows for a resolved table.
pub fn resolution_to_rows(resolution: &Resolution) -> Result<Vec<PricePoint>, HandlerError> {
    to_price_points(resolution.table()).map_err(compute_error_response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_maps_to_schema_mismatch() {
        let (status, Json(body)) =
            compute_error_response(ComputeError::Schema("missing feature".to_string()));

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.code, "SCHEMA_MISMATCH");
        assert!(!body.success);
        assert!(body.error.contains("missing feature"));
    }

    #[test]
    fn test_other_errors_map_to_generic_code() {
        let (_, Json(body)) =
            compute_error_response(ComputeError::HistorySource("down".to_string()));
        assert_eq!(body.code, "COMPUTE_ERROR");
    }
}

use axum::{extract::State, response::Json};
use chrono::NaiveDate;
use common::{DashboardView, FilterRequest, Selection};
use compute::dashboard::{Action, Transition, apply, calculating_notice, chart_spec};
use compute::summary::summarize;
use tracing::{debug, instrument};

use crate::helpers::converters::{HandlerError, compute_error_response, resolution_to_rows};
use crate::schemas::{ApiResponse, AppState, ErrorResponse};

/// Turns a transition into the view the client renders.
///
/// Data is resolved only when the transition asks for a refresh; otherwise
/// `rows` is `None` and the client keeps its current table.
async fn render(
    state: &AppState,
    transition: Transition,
    today: NaiveDate,
) -> Result<DashboardView, HandlerError> {
    let Transition {
        selection,
        inputs,
        refresh,
        mut notices,
    } = transition;

    let rows = if refresh {
        notices.push(calculating_notice());
        let resolution = state
            .pipeline
            .resolve(selection.range, today)
            .await
            .map_err(compute_error_response)?;
        if let Some(notice) = resolution.notice() {
            notices.push(notice);
        }
        Some(resolution_to_rows(&resolution)?)
    } else {
        debug!("Selection unchanged, no data resolved");
        None
    };

    let summary = summarize(state.pipeline.forecast(), today).map_err(compute_error_response)?;

    Ok(DashboardView {
        selection,
        inputs,
        allowed_range: state.validator.allowed_range(today),
        chart: chart_spec(&selection),
        rows,
        summary,
        notices,
    })
}

fn view_response(view: DashboardView, message: &str) -> Json<ApiResponse<DashboardView>> {
    Json(ApiResponse {
        data: view,
        message: message.to_string(),
        success: true,
    })
}

/// Initial dashboard: today only, line plot, recorded price hidden
#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    tag = "dashboard",
    responses(
        (status = 200, description = "Initial dashboard view", body = ApiResponse<DashboardView>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn get_dashboard(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DashboardView>>, HandlerError> {
    let today = state.today();
    let selection = Selection::for_today(today);
    let transition = Transition {
        selection,
        inputs: selection.range,
        refresh: true,
        notices: Vec::new(),
    };

    let view = render(&state, transition, today).await?;
    Ok(view_response(view, "Dashboard loaded"))
}

/// Apply the date pickers and display options ("Show")
#[utoipa::path(
    post,
    path = "/api/v1/dashboard/filter",
    tag = "dashboard",
    request_body = FilterRequest,
    responses(
        (status = 200, description = "Dashboard view after the filter; rejected ranges carry an error notice", body = ApiResponse<DashboardView>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn filter_dashboard(
    State(state): State<AppState>,
    Json(request): Json<FilterRequest>,
) -> Result<Json<ApiResponse<DashboardView>>, HandlerError> {
    let today = state.today();
    let current = request
        .selection
        .unwrap_or_else(|| Selection::for_today(today));
    let action = Action::Filter {
        start: request.start_date,
        end: request.end_date,
        plot_type: request.plot_type,
        show_recorded_price: request.show_recorded_price,
    };

    let transition = apply(current, action, &state.validator, today);
    let message = if transition.refresh {
        "Filter applied"
    } else {
        "Filter rejected"
    };

    let view = render(&state, transition, today).await?;
    Ok(view_response(view, message))
}

/// Reset the dashboard to today with default display options
#[utoipa::path(
    post,
    path = "/api/v1/dashboard/reset",
    tag = "dashboard",
    responses(
        (status = 200, description = "Dashboard view after the reset", body = ApiResponse<DashboardView>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[instrument(skip(state))]
pub async fn reset_dashboard(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DashboardView>>, HandlerError> {
    let today = state.today();
    let transition = apply(
        Selection::for_today(today),
        Action::Reset,
        &state.validator,
        today,
    );

    let view = render(&state, transition, today).await?;
    Ok(view_response(view, "Dashboard reset"))
}

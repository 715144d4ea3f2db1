use chrono::NaiveDate;
use common::{
    ChartKind, ChartSpec, DashboardView, DateRange, FilterRequest, Notice, NoticeLevel, PlotType,
    PricePoint, PriceTable, Selection, SummaryTiles,
};
use compute::pipeline::Pipeline;
use compute::range::RangeValidator;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};

pub use common::ApiResponse;

use crate::config::current_day;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection
    pub db: DatabaseConnection,
    /// Forecast snapshot, model and history source
    pub pipeline: Arc<Pipeline>,
    pub validator: RangeValidator,
    /// Fixed "today", `None` to follow the clock
    pub today: Option<NaiveDate>,
}

impl AppState {
    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(current_day)
    }
}

/// Query parameters for the prices endpoint
#[derive(Debug, Deserialize, ToSchema)]
pub struct PricesQuery {
    /// Start date (YYYY-MM-DD), defaults to today
    pub start_date: Option<NaiveDate>,
    /// End date (YYYY-MM-DD), defaults to today
    pub end_date: Option<NaiveDate>,
}

/// Error response
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Error code
    pub code: String,
    /// Success status (always false for errors)
    pub success: bool,
}

/// Health check response
#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Database connection status
    pub database: String,
    /// Rows in the scored forecast snapshot
    pub forecast_rows: usize,
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::health::health_check,
        crate::handlers::dashboard::get_dashboard,
        crate::handlers::dashboard::filter_dashboard,
        crate::handlers::dashboard::reset_dashboard,
        crate::handlers::prices::get_prices,
        crate::handlers::summary::get_summary,
    ),
    components(
        schemas(
            ApiResponse<DashboardView>,
            ApiResponse<PriceTable>,
            ApiResponse<SummaryTiles>,
            ErrorResponse,
            HealthResponse,
            PricesQuery,
            DashboardView,
            FilterRequest,
            Selection,
            DateRange,
            PlotType,
            ChartSpec,
            ChartKind,
            Notice,
            NoticeLevel,
            PriceTable,
            PricePoint,
            SummaryTiles,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "dashboard", description = "Dashboard state and actions"),
        (name = "prices", description = "Scored price tables"),
        (name = "summary", description = "Summary tiles for today"),
    ),
    info(
        title = "SpotCast API",
        description = "Electricity spot-price forecast dashboard backend",
        version = "0.1.0",
    )
)]
pub struct ApiDoc;

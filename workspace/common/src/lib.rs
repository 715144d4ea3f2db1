//! Common transport-layer types shared between the backend and any dashboard UI.
//! These structs mirror the backend handlers' request/response payloads
//! so a frontend can deserialize API responses without duplicating shapes.

mod dashboard;
mod prices;

pub use dashboard::{
    ChartKind, ChartSpec, DashboardView, DateRange, FilterRequest, Notice, NoticeLevel, PlotType,
    Selection,
};
pub use prices::{PricePoint, PriceTable, SummaryTiles};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Generic API response wrapper used by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// Response data
    pub data: T,
    /// Response message
    pub message: String,
    /// Success flag
    pub success: bool,
}

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::prices::{PricePoint, SummaryTiles};

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct DateRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl DateRange {
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self { start_date, end_date }
    }

    /// The range covering only `day`.
    pub fn single_day(day: NaiveDate) -> Self {
        Self::new(day, day)
    }

    pub fn ends_on(&self, day: NaiveDate) -> bool {
        self.end_date == day
    }

    pub fn is_single_day(&self, day: NaiveDate) -> bool {
        self.start_date == day && self.end_date == day
    }
}

/// How the price series are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PlotType {
    #[default]
    Line,
    Bar,
}

/// The dashboard state owned by one viewer.
///
/// The client keeps it between requests and sends it back with every action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Selection {
    pub range: DateRange,
    pub plot_type: PlotType,
    /// Draw the recorded price next to the prediction.
    pub show_recorded_price: bool,
}

impl Selection {
    /// Default state: today only, line plot, recorded price hidden.
    pub fn for_today(today: NaiveDate) -> Self {
        Self {
            range: DateRange::single_day(today),
            plot_type: PlotType::Line,
            show_recorded_price: false,
        }
    }
}

/// Body of the "Show" action.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FilterRequest {
    /// Selection currently displayed, `None` for a fresh session.
    pub selection: Option<Selection>,
    /// Start date picker value (YYYY-MM-DD)
    pub start_date: NaiveDate,
    /// End date picker value (YYYY-MM-DD)
    pub end_date: NaiveDate,
    #[serde(default)]
    pub plot_type: PlotType,
    #[serde(default)]
    pub show_recorded_price: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Transient, dismissible message for the viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    /// How long the UI should keep the notice on screen.
    pub duration_secs: u32,
}

impl Notice {
    pub fn info(message: impl Into<String>, duration_secs: u32) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
            duration_secs,
        }
    }

    pub fn error(message: impl Into<String>, duration_secs: u32) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
            duration_secs,
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    /// Bars of the same timestamp are grouped side by side.
    GroupedBar,
}

/// What the chart should draw; rendering itself is left to the UI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub x: String,
    pub y: Vec<String>,
    pub x_title: String,
    pub y_title: String,
    pub markers: bool,
}

/// Everything the dashboard needs for one render.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardView {
    pub selection: Selection,
    /// Values the date pickers should show.
    pub inputs: DateRange,
    /// Bounds for the date pickers.
    pub allowed_range: DateRange,
    pub chart: ChartSpec,
    /// Rows for `selection.range`; `None` when the displayed table is unchanged.
    pub rows: Option<Vec<PricePoint>>,
    pub summary: SummaryTiles,
    pub notices: Vec<Notice>,
}

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One scored row of the unified table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PricePoint {
    pub timestamp: NaiveDateTime,
    pub temperature_c: f64,
    pub wind_speed_ms: f64,
    pub solar_irradiance_wm2: f64,
    pub production_kw: f64,
    pub consumption_kwh: f64,
    /// Recorded spot price (c/kWh), absent for hours not yet settled.
    pub price_c_per_kwh: Option<f64>,
    /// Model prediction (c/kWh).
    pub predicted_price: f64,
}

/// Rows returned by the raw prices endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PriceTable {
    pub rows: Vec<PricePoint>,
}

impl PriceTable {
    pub fn new(rows: Vec<PricePoint>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Values of the four averaged tiles plus today's date.
///
/// Averages are rounded to two decimals; `None` when there was nothing to average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SummaryTiles {
    pub today: NaiveDate,
    /// Today formatted for display, e.g. "Mar 01, 2024".
    pub today_label: String,
    /// Average temperature [°C]
    pub avg_temperature_c: Option<f64>,
    /// Average production [MW]
    pub avg_production_mw: Option<f64>,
    /// Average consumption [MWh]
    pub avg_consumption_mwh: Option<f64>,
    /// Average recorded price [c/kWh]
    pub avg_price_c_per_kwh: Option<f64>,
}

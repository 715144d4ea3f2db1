use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use common::{DateRange, Notice};
use polars::prelude::DataFrame;
use tracing::{debug, error, info, instrument};

use crate::error::{ComputeError, Result};
use crate::providers::{ForecastProvider, HistoryProvider};
use crate::scoring::{PredictionModel, score_table};
use crate::table::{concat_tables, empty_scored_table, ensure_timed};

/// Where the rows of a resolved table came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableSource {
    /// The cached forecast horizon.
    Forecast,
    /// Scored history only.
    History,
    /// Scored history followed by the forecast horizon.
    HistoryWithForecast,
}

/// Outcome of [`Pipeline::resolve`].
#[derive(Debug, Clone)]
pub enum Resolution {
    Fresh { table: DataFrame, source: TableSource },
    /// History was unavailable; the cached forecast is served instead.
    Fallback { table: DataFrame, reason: String },
}

impl Resolution {
    pub fn table(&self) -> &DataFrame {
        match self {
            Resolution::Fresh { table, .. } | Resolution::Fallback { table, .. } => table,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Resolution::Fallback { .. })
    }

    /// Notice the viewer should see for this outcome, if any.
    pub fn notice(&self) -> Option<Notice> {
        match self {
            Resolution::Fresh { .. } => None,
            Resolution::Fallback { .. } => {
                Some(Notice::error("Failed to get data from database.", 3))
            }
        }
    }
}

/// Selects, scores and merges the rows shown for a date range.
///
/// The forecast table and the model are fixed at construction and only read afterwards.
pub struct Pipeline {
    history: Box<dyn HistoryProvider>,
    model: Arc<dyn PredictionModel>,
    forecast: DataFrame,
}

impl Pipeline {
    /// Builds a pipeline around an already fetched forecast, scoring it once.
    pub fn new(
        history: Box<dyn HistoryProvider>,
        model: Arc<dyn PredictionModel>,
        forecast: DataFrame,
    ) -> Result<Self> {
        let forecast = score_table(model.as_ref(), forecast)?;
        info!("Forecast table scored with {} rows", forecast.height());

        Ok(Self {
            history,
            model,
            forecast,
        })
    }

    /// Fetches the forecast horizon once and builds the pipeline around it.
    #[instrument(skip_all)]
    pub async fn initialize(
        history: Box<dyn HistoryProvider>,
        forecast_provider: &dyn ForecastProvider,
        model: Arc<dyn PredictionModel>,
    ) -> Result<Self> {
        let forecast = forecast_provider.fetch_horizon().await?;
        Self::new(history, model, forecast)
    }

    /// The scored forecast snapshot.
    pub fn forecast(&self) -> &DataFrame {
        &self.forecast
    }

    /// Resolves the table for `range`, which must already be validated.
    ///
    /// History failures fall back to the forecast; schema errors are returned.
    #[instrument(skip(self), fields(start = %range.start_date, end = %range.end_date, today = %today))]
    pub async fn resolve(&self, range: DateRange, today: NaiveDate) -> Result<Resolution> {
        if range.is_single_day(today) {
            debug!("Range is today only, serving cached forecast");
            return Ok(Resolution::Fresh {
                table: self.forecast.clone(),
                source: TableSource::Forecast,
            });
        }

        let (start, end) = day_bounds(range)?;
        let history = match self.fetch_history(start, end).await {
            Ok(history) => history,
            Err(e) => {
                error!(error = %e, "Error getting data from database");
                return Ok(Resolution::Fallback {
                    table: self.forecast.clone(),
                    reason: e.to_string(),
                });
            }
        };

        let scored = if history.height() == 0 {
            debug!("No history rows in range");
            empty_scored_table()?
        } else {
            score_table(self.model.as_ref(), history)?
        };

        if range.ends_on(today) {
            let combined = concat_tables(scored, &self.forecast)?;
            debug!("Serving history with forecast, {} rows", combined.height());
            return Ok(Resolution::Fresh {
                table: combined,
                source: TableSource::HistoryWithForecast,
            });
        }

        debug!("Serving history, {} rows", scored.height());
        Ok(Resolution::Fresh {
            table: scored,
            source: TableSource::History,
        })
    }

    async fn fetch_history(&self, start: NaiveDateTime, end: NaiveDateTime) -> Result<DataFrame> {
        let table = self.history.fetch(start, end).await?;
        ensure_timed(&table)?;
        Ok(table)
    }
}

/// First and last second covered by `range`.
fn day_bounds(range: DateRange) -> Result<(NaiveDateTime, NaiveDateTime)> {
    let start = range.start_date.and_time(NaiveTime::MIN);
    let end = range
        .end_date
        .and_hms_opt(23, 59, 59)
        .ok_or_else(|| ComputeError::Date(format!("no end of day for {}", range.end_date)))?;
    Ok((start, end))
}

//! Seams to the external data sources.

use async_trait::async_trait;
use chrono::NaiveDateTime;
use polars::prelude::DataFrame;

use crate::error::Result;

/// Source of past observations.
///
/// Must return a zero-row table for an empty range and an error, never a
/// malformed table, when the backing store cannot be queried.
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    /// Rows with `start <= timestamp <= end`.
    async fn fetch(&self, start: NaiveDateTime, end: NaiveDateTime) -> Result<DataFrame>;
}

/// Source of the upcoming forecast horizon. Queried once per process.
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    async fn fetch_horizon(&self) -> Result<DataFrame>;
}

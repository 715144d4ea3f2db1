//! Fixtures shared by the compute tests: in-memory database, synthetic rows,
//! and stub providers/models that record how they were called.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use migration::{Migrator, MigratorTrait};
use polars::prelude::DataFrame;
use sea_orm::{Database, DatabaseConnection, DbErr};

use crate::error::{ComputeError, Result};
use crate::providers::{ForecastProvider, HistoryProvider};
use crate::scoring::{LinearModel, PredictionModel};
use crate::table::{
    CONSUMPTION, Observation, PRODUCTION, SOLAR_IRRADIANCE, TEMPERATURE, WIND_SPEED,
    observations_to_table,
};

pub async fn setup_db() -> std::result::Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;
    Migrator::up(&db, None).await.expect("Migrations failed.");
    Ok(db)
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn ts(year: i32, month: u32, day: u32, hour: u32) -> NaiveDateTime {
    date(year, month, day).and_hms_opt(hour, 0, 0).unwrap()
}

pub fn day_bounds(year: i32, month: u32, day: u32) -> (NaiveDateTime, NaiveDateTime) {
    let day = date(year, month, day);
    (
        day.and_hms_opt(0, 0, 0).unwrap(),
        day.and_hms_opt(23, 59, 59).unwrap(),
    )
}

/// `count` hourly rows starting at `start`, with deterministic values.
pub fn observations(start: NaiveDateTime, count: usize) -> Vec<Observation> {
    (0..count)
        .map(|i| {
            let hour = i as f64;
            Observation {
                timestamp: start + Duration::hours(i as i64),
                temperature_c: -5.0 + (hour % 24.0) * 0.5,
                wind_speed_ms: 3.0 + (hour % 7.0),
                solar_irradiance_wm2: if (8.0..16.0).contains(&(hour % 24.0)) { 250.0 } else { 0.0 },
                production_kw: 7_500_000.0 + hour * 1_000.0,
                consumption_kwh: 9_000_000.0 - hour * 500.0,
                price_c_per_kwh: Some(4.0 + (hour % 12.0)),
            }
        })
        .collect()
}

pub fn default_linear_model() -> LinearModel {
    LinearModel::new(
        vec![
            TEMPERATURE.to_string(),
            WIND_SPEED.to_string(),
            SOLAR_IRRADIANCE.to_string(),
            PRODUCTION.to_string(),
            CONSUMPTION.to_string(),
        ],
        vec![-0.12, -0.35, -0.004, -0.000_001, 0.000_002],
        6.5,
    )
    .unwrap()
}

/// Shared record of the bounds a [`StubHistory`] was queried with.
#[derive(Clone, Default)]
pub struct HistoryCalls(Arc<Mutex<Vec<(NaiveDateTime, NaiveDateTime)>>>);

impl HistoryCalls {
    pub fn count(&self) -> usize {
        self.0.lock().unwrap().len()
    }

    pub fn last_bounds(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        self.0.lock().unwrap().last().copied()
    }
}

enum StubReply {
    Rows(Vec<Observation>),
    Table(DataFrame),
    Fail(String),
}

/// History provider that serves the rows inside the requested bounds.
pub struct StubHistory {
    reply: StubReply,
    calls: HistoryCalls,
}

impl StubHistory {
    pub fn with_rows(rows: Vec<Observation>) -> Self {
        Self {
            reply: StubReply::Rows(rows),
            calls: HistoryCalls::default(),
        }
    }

    /// Returns `table` as-is for any bounds.
    pub fn with_table(table: DataFrame) -> Self {
        Self {
            reply: StubReply::Table(table),
            calls: HistoryCalls::default(),
        }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            reply: StubReply::Fail(reason.to_string()),
            calls: HistoryCalls::default(),
        }
    }

    pub fn calls(&self) -> HistoryCalls {
        self.calls.clone()
    }
}

#[async_trait]
impl HistoryProvider for StubHistory {
    async fn fetch(&self, start: NaiveDateTime, end: NaiveDateTime) -> Result<DataFrame> {
        self.calls.0.lock().unwrap().push((start, end));
        match &self.reply {
            StubReply::Rows(rows) => {
                let inside: Vec<Observation> = rows
                    .iter()
                    .filter(|r| r.timestamp >= start && r.timestamp <= end)
                    .cloned()
                    .collect();
                observations_to_table(&inside)
            }
            StubReply::Table(table) => Ok(table.clone()),
            StubReply::Fail(reason) => Err(ComputeError::HistorySource(reason.clone())),
        }
    }
}

pub struct StubForecast {
    table: DataFrame,
}

impl StubForecast {
    pub fn new(table: DataFrame) -> Self {
        Self { table }
    }
}

#[async_trait]
impl ForecastProvider for StubForecast {
    async fn fetch_horizon(&self) -> Result<DataFrame> {
        Ok(self.table.clone())
    }
}

/// Wraps a model and records each `predict` call.
pub struct CountingModel {
    inner: LinearModel,
    calls: AtomicUsize,
    last_rows: AtomicUsize,
    last_width: AtomicUsize,
}

impl CountingModel {
    pub fn new(inner: LinearModel) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
            last_rows: AtomicUsize::new(0),
            last_width: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_rows(&self) -> usize {
        self.last_rows.load(Ordering::SeqCst)
    }

    pub fn last_width(&self) -> usize {
        self.last_width.load(Ordering::SeqCst)
    }
}

impl PredictionModel for CountingModel {
    fn feature_names(&self) -> &[String] {
        self.inner.feature_names()
    }

    fn predict(&self, features: &DataFrame) -> Result<Vec<f64>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.last_rows.store(features.height(), Ordering::SeqCst);
        self.last_width.store(features.width(), Ordering::SeqCst);
        self.inner.predict(features)
    }
}

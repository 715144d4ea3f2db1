//! Column layout of the price tables and conversions in and out of polars.
//!
//! Every table the pipeline handles is a `DataFrame` with a `timestamp`
//! column, the weather/grid feature columns, the optional recorded price and,
//! once scored, the `predicted_price` column.

use chrono::{DateTime, NaiveDateTime};
use common::PricePoint;
use model::entities::price_history;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{ComputeError, Result};

pub const TIMESTAMP: &str = "timestamp";
pub const TEMPERATURE: &str = "temperature_c";
pub const WIND_SPEED: &str = "wind_speed_ms";
pub const SOLAR_IRRADIANCE: &str = "solar_irradiance_wm2";
pub const PRODUCTION: &str = "production_kw";
pub const CONSUMPTION: &str = "consumption_kwh";
pub const RECORDED_PRICE: &str = "price_c_per_kwh";
pub const PREDICTED_PRICE: &str = "predicted_price";

/// Columns that are never fed to the model.
pub const NON_FEATURE_COLUMNS: [&str; 3] = [TIMESTAMP, RECORDED_PRICE, PREDICTED_PRICE];

/// One unscored hourly row as delivered by a source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub timestamp: NaiveDateTime,
    pub temperature_c: f64,
    pub wind_speed_ms: f64,
    pub solar_irradiance_wm2: f64,
    pub production_kw: f64,
    pub consumption_kwh: f64,
    #[serde(default)]
    pub price_c_per_kwh: Option<f64>,
}

impl From<price_history::Model> for Observation {
    fn from(row: price_history::Model) -> Self {
        Self {
            timestamp: row.timestamp,
            temperature_c: row.temperature_c,
            wind_speed_ms: row.wind_speed_ms,
            solar_irradiance_wm2: row.solar_irradiance_wm2,
            production_kw: row.production_kw,
            consumption_kwh: row.consumption_kwh,
            price_c_per_kwh: row.price_c_per_kwh,
        }
    }
}

/// Builds an unscored table from observations, keeping their order.
///
/// An empty slice yields a zero-row table that still carries every column.
pub fn observations_to_table(rows: &[Observation]) -> Result<DataFrame> {
    trace!("Building table from {} observations", rows.len());

    let timestamps: Vec<NaiveDateTime> = rows.iter().map(|r| r.timestamp).collect();
    let column = |f: fn(&Observation) -> f64| rows.iter().map(f).collect::<Vec<f64>>();
    let prices: Vec<Option<f64>> = rows.iter().map(|r| r.price_c_per_kwh).collect();

    let df = DataFrame::new(vec![
        Series::new(TIMESTAMP.into(), timestamps).into(),
        Series::new(TEMPERATURE.into(), column(|r| r.temperature_c)).into(),
        Series::new(WIND_SPEED.into(), column(|r| r.wind_speed_ms)).into(),
        Series::new(SOLAR_IRRADIANCE.into(), column(|r| r.solar_irradiance_wm2)).into(),
        Series::new(PRODUCTION.into(), column(|r| r.production_kw)).into(),
        Series::new(CONSUMPTION.into(), column(|r| r.consumption_kwh)).into(),
        Series::new(RECORDED_PRICE.into(), prices).into(),
    ])?;

    Ok(df)
}

/// The typed "no data" table: zero rows, full schema, empty prediction column.
pub fn empty_scored_table() -> Result<DataFrame> {
    let mut df = observations_to_table(&[])?;
    df.with_column(Series::new(PREDICTED_PRICE.into(), Vec::<f64>::new()))?;
    Ok(df)
}

/// Checks that a table coming from a source has a timestamp column.
pub fn ensure_timed(df: &DataFrame) -> Result<()> {
    if df.get_column_names().iter().any(|name| name.as_str() == TIMESTAMP) {
        Ok(())
    } else {
        Err(ComputeError::HistorySource(format!(
            "table has no '{}' column (columns: {:?})",
            TIMESTAMP,
            df.get_column_names()
        )))
    }
}

/// Appends `tail` below `head` without re-sorting.
///
/// Both tables must carry the same set of columns; `tail` is reordered to
/// `head`'s layout. A column mismatch or a dtype disagreement is a schema error.
pub fn concat_tables(head: DataFrame, tail: &DataFrame) -> Result<DataFrame> {
    let mut head_columns: Vec<&str> = head.get_column_names().into_iter().map(|n| n.as_str()).collect();
    let mut tail_columns: Vec<&str> = tail.get_column_names().into_iter().map(|n| n.as_str()).collect();
    head_columns.sort_unstable();
    tail_columns.sort_unstable();
    if head_columns != tail_columns {
        return Err(ComputeError::Schema(format!(
            "tables have different columns: {:?} vs {:?}",
            head_columns, tail_columns
        )));
    }

    let tail = tail
        .select(head.get_column_names_owned())
        .map_err(|e| ComputeError::Schema(format!("cannot align tables: {}", e)))?;

    let mut combined = head;
    combined
        .vstack_mut(&tail)
        .map_err(|e| ComputeError::Schema(format!("cannot concatenate tables: {}", e)))?;

    debug!("Concatenated table has {} rows", combined.height());
    Ok(combined)
}

fn timestamps(df: &DataFrame) -> Result<Vec<Option<NaiveDateTime>>> {
    let millis = df
        .column(TIMESTAMP)?
        .as_materialized_series()
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?
        .cast(&DataType::Int64)?;

    let values = millis
        .i64()?
        .into_iter()
        .map(|ms| ms.and_then(DateTime::from_timestamp_millis).map(|dt| dt.naive_utc()))
        .collect();
    Ok(values)
}

/// Reads a column as floats; every value must be present.
pub(crate) fn required_f64(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;

    series
        .f64()?
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            value.ok_or_else(|| {
                ComputeError::Schema(format!("column '{}' is null at row {}", name, row))
            })
        })
        .collect()
}

fn optional_f64(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    Ok(series.f64()?.into_iter().collect())
}

/// Converts a scored table into transport rows.
///
/// Fails when any row lacks a prediction: unscored rows must never reach a viewer.
pub fn to_price_points(df: &DataFrame) -> Result<Vec<PricePoint>> {
    let timestamps = timestamps(df)?;
    let temperature = required_f64(df, TEMPERATURE)?;
    let wind = required_f64(df, WIND_SPEED)?;
    let irradiance = required_f64(df, SOLAR_IRRADIANCE)?;
    let production = required_f64(df, PRODUCTION)?;
    let consumption = required_f64(df, CONSUMPTION)?;
    let recorded = optional_f64(df, RECORDED_PRICE)?;
    let predicted = required_f64(df, PREDICTED_PRICE)?;

    timestamps
        .into_iter()
        .enumerate()
        .map(|(i, timestamp)| {
            let timestamp = timestamp
                .ok_or_else(|| ComputeError::Date(format!("missing timestamp at row {}", i)))?;
            Ok(PricePoint {
                timestamp,
                temperature_c: temperature[i],
                wind_speed_ms: wind[i],
                solar_irradiance_wm2: irradiance[i],
                production_kw: production[i],
                consumption_kwh: consumption[i],
                price_c_per_kwh: recorded[i],
                predicted_price: predicted[i],
            })
        })
        .collect()
}

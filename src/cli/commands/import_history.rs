use anyhow::{Context, Result, bail};
use chrono::NaiveDateTime;
use compute::history::import_observations;
use compute::table::Observation;
use sea_orm::Database;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info, trace};

const TIMESTAMP_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// One line of the history CSV. An empty price cell means "not recorded".
#[derive(Debug, Deserialize)]
struct HistoryRecord {
    timestamp: String,
    temperature_c: f64,
    wind_speed_ms: f64,
    solar_irradiance_wm2: f64,
    production_kw: f64,
    consumption_kwh: f64,
    price_c_per_kwh: Option<f64>,
}

fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    let raw = raw.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .with_context(|| format!("Failed to parse timestamp: {}", raw))
}

fn read_history_csv(csv_path: &Path) -> Result<Vec<Observation>> {
    let mut reader = csv::Reader::from_path(csv_path)
        .with_context(|| format!("Failed to open CSV file {}", csv_path.display()))?;

    let mut rows = Vec::new();
    for (line, result) in reader.deserialize::<HistoryRecord>().enumerate() {
        let record = result.with_context(|| format!("Failed to read CSV record {}", line + 1))?;
        rows.push(Observation {
            timestamp: parse_timestamp(&record.timestamp)?,
            temperature_c: record.temperature_c,
            wind_speed_ms: record.wind_speed_ms,
            solar_irradiance_wm2: record.solar_irradiance_wm2,
            production_kw: record.production_kw,
            consumption_kwh: record.consumption_kwh,
            price_c_per_kwh: record.price_c_per_kwh,
        });
    }
    trace!("Parsed {} CSV records", rows.len());
    Ok(rows)
}

pub async fn import_history(csv_path: &str, database_url: &str) -> Result<()> {
    info!("Importing history from {}", csv_path);
    debug!("Database URL: {}", database_url);

    let rows = read_history_csv(Path::new(csv_path))?;
    if rows.is_empty() {
        bail!("No rows found in {}", csv_path);
    }

    let db = Database::connect(database_url).await?;
    let written = import_observations(&db, &rows).await?;

    info!("Imported {} history rows ({} written)", rows.len(), written);
    Ok(())
}

use anyhow::{Context, Result};
use chrono::NaiveDate;
use common::PriceTable;
use compute::table::to_price_points;
use tracing::{info, warn};

use crate::config::{AppConfig, current_day, initialize_app_state};

/// Resolves `start_date..=end_date` once and prints the scored rows as JSON.
pub async fn predict(config: &AppConfig, start_date: NaiveDate, end_date: NaiveDate) -> Result<()> {
    let state = initialize_app_state(config).await?;
    let today = current_day();

    let range = state.validator.validate(start_date, end_date)?;
    let resolution = state
        .pipeline
        .resolve(range, today)
        .await
        .context("Failed to resolve prices")?;
    if let Some(notice) = resolution.notice() {
        warn!("{}", notice.message);
    }

    let table = PriceTable::new(to_price_points(resolution.table())?);
    info!("Resolved {} rows", table.len());
    println!("{}", serde_json::to_string_pretty(&table)?);
    Ok(())
}

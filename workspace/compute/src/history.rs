use std::collections::HashMap;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use model::entities::price_history;
use polars::prelude::DataFrame;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::{debug, info, instrument, trace};

use crate::error::Result;
use crate::providers::HistoryProvider;
use crate::table::{Observation, observations_to_table};

/// Rows inserted per statement when importing.
const IMPORT_CHUNK: usize = 500;

/// Reads past observations from the `price_history` table.
#[derive(Clone, Debug)]
pub struct DbHistoryProvider {
    db: DatabaseConnection,
}

impl DbHistoryProvider {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl HistoryProvider for DbHistoryProvider {
    #[instrument(skip(self), fields(start = %start, end = %end))]
    async fn fetch(&self, start: NaiveDateTime, end: NaiveDateTime) -> Result<DataFrame> {
        trace!("Querying price history from {} to {}", start, end);

        let rows = price_history::Entity::find()
            .filter(price_history::Column::Timestamp.gte(start))
            .filter(price_history::Column::Timestamp.lte(end))
            .order_by_asc(price_history::Column::Timestamp)
            .all(&self.db)
            .await?;

        debug!("Found {} history rows from {} to {}", rows.len(), start, end);

        let observations: Vec<Observation> = rows.into_iter().map(Observation::from).collect();
        observations_to_table(&observations)
    }
}

/// Upserts observations keyed by timestamp and returns the number of rows written.
#[instrument(skip_all, fields(rows = rows.len()))]
pub async fn import_observations(db: &DatabaseConnection, rows: &[Observation]) -> Result<u64> {
    let rows = latest_per_timestamp(rows);
    let mut written = 0;

    for chunk in rows.chunks(IMPORT_CHUNK) {
        let models = chunk.iter().map(|row| price_history::ActiveModel {
            timestamp: Set(row.timestamp),
            temperature_c: Set(row.temperature_c),
            wind_speed_ms: Set(row.wind_speed_ms),
            solar_irradiance_wm2: Set(row.solar_irradiance_wm2),
            production_kw: Set(row.production_kw),
            consumption_kwh: Set(row.consumption_kwh),
            price_c_per_kwh: Set(row.price_c_per_kwh),
            ..Default::default()
        });

        written += price_history::Entity::insert_many(models)
            .on_conflict(
                OnConflict::column(price_history::Column::Timestamp)
                    .update_columns([
                        price_history::Column::TemperatureC,
                        price_history::Column::WindSpeedMs,
                        price_history::Column::SolarIrradianceWm2,
                        price_history::Column::ProductionKw,
                        price_history::Column::ConsumptionKwh,
                        price_history::Column::PriceCPerKwh,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(db)
            .await?;

        trace!("Imported chunk of {} rows", chunk.len());
    }

    info!("Imported {} history rows", written);
    Ok(written)
}

/// Keeps only the last row for every timestamp, in input order.
///
/// A single upsert statement may not touch the same key twice.
fn latest_per_timestamp(rows: &[Observation]) -> Vec<&Observation> {
    let last: HashMap<NaiveDateTime, usize> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| (row.timestamp, i))
        .collect();

    let kept: Vec<&Observation> = rows
        .iter()
        .enumerate()
        .filter(|(i, row)| last.get(&row.timestamp) == Some(i))
        .map(|(_, row)| row)
        .collect();

    if kept.len() < rows.len() {
        debug!("Dropped {} duplicate timestamps", rows.len() - kept.len());
    }
    kept
}

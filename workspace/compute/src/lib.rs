pub mod dashboard;
pub mod error;
pub mod forecast;
pub mod history;
pub mod pipeline;
pub mod providers;
pub mod range;
pub mod scoring;
pub mod summary;
pub mod table;

#[cfg(test)]
pub(crate) mod testing;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use sea_orm::DatabaseConnection;

use error::Result;
use forecast::HttpForecastProvider;
use history::DbHistoryProvider;
use pipeline::Pipeline;
use scoring::LinearModel;

/// Returns the pipeline used by the service: database history, HTTP forecast
/// and the linear model artifact at `model_path`.
///
/// The forecast horizon is fetched and scored once here.
pub async fn default_pipeline(
    db: DatabaseConnection,
    forecast_url: &str,
    forecast_timeout: Duration,
    model_path: impl AsRef<Path>,
) -> Result<Pipeline> {
    let model = LinearModel::load(model_path)?;
    let forecast = HttpForecastProvider::new(forecast_url, forecast_timeout)?;

    Pipeline::initialize(
        Box::new(DbHistoryProvider::new(db)),
        &forecast,
        Arc::new(model),
    )
    .await
}

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use compute::range::RangeValidator;
use config::{Config, Environment, File};
use sea_orm::Database;
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::schemas::AppState;

/// Where the forecast horizon is fetched from.
#[derive(Debug, Clone, Deserialize)]
pub struct ForecastSettings {
    pub url: String,
    pub timeout_secs: u64,
}

/// Application configuration.
///
/// Sources, lowest precedence first: built-in defaults, the optional config
/// file, `SPOTCAST_*` environment variables (`__` separates nested keys).
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_address: String,
    pub model_path: PathBuf,
    pub forecast: ForecastSettings,
    /// First day the date pickers offer.
    pub allowed_start: NaiveDate,
}

impl AppConfig {
    /// Loads `.env`, then the layered configuration with `file` as the config file name.
    pub fn load(file: &str) -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_sources(file)
    }

    fn from_sources(file: &str) -> Result<Self> {
        let settings = Config::builder()
            .set_default("database_url", "sqlite://spotcast.db")?
            .set_default("bind_address", "0.0.0.0:3000")?
            .set_default("model_path", "model/model.json")?
            .set_default("forecast.url", "http://localhost:8000/forecast")?
            .set_default("forecast.timeout_secs", 10)?
            .set_default("allowed_start", "2024-01-01")?
            .add_source(File::with_name(file).required(false))
            .add_source(
                Environment::with_prefix("SPOTCAST")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .context("Failed to read configuration")?;

        let config: Self = settings
            .try_deserialize()
            .context("Invalid configuration")?;
        debug!(?config, "Configuration loaded");
        Ok(config)
    }

    /// Applies command line overrides.
    pub fn with_overrides(mut self, database_url: Option<String>, bind_address: Option<String>) -> Self {
        if let Some(database_url) = database_url {
            self.database_url = database_url;
        }
        if let Some(bind_address) = bind_address {
            self.bind_address = bind_address;
        }
        self
    }

    pub fn forecast_timeout(&self) -> Duration {
        Duration::from_secs(self.forecast.timeout_secs)
    }
}

/// Connects to the database, loads the model and scores the forecast horizon.
pub async fn initialize_app_state(config: &AppConfig) -> Result<AppState> {
    info!("Connecting to database: {}", config.database_url);
    let db = Database::connect(&config.database_url).await?;

    let pipeline = compute::default_pipeline(
        db.clone(),
        &config.forecast.url,
        config.forecast_timeout(),
        &config.model_path,
    )
    .await
    .context("Failed to initialize prediction pipeline")?;

    Ok(AppState {
        db,
        pipeline: Arc::new(pipeline),
        validator: RangeValidator::new(config.allowed_start),
        today: None,
    })
}

/// Current calendar day on the local clock, which stored timestamps follow.
pub fn current_day() -> NaiveDate {
    Local::now().date_naive()
}

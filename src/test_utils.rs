#[cfg(test)]
pub mod test_utils {
    use crate::router::create_router;
    use crate::schemas::AppState;
    use async_trait::async_trait;
    use axum::Router;
    use chrono::{Duration, NaiveDate, NaiveDateTime};
    use compute::error::{ComputeError, Result as ComputeResult};
    use compute::history::{DbHistoryProvider, import_observations};
    use compute::pipeline::Pipeline;
    use compute::providers::HistoryProvider;
    use compute::range::RangeValidator;
    use compute::scoring::{LinearModel, PredictionModel};
    use compute::table::{Observation, observations_to_table};
    use migration::{Migrator, MigratorTrait};
    use polars::prelude::{DataFrame, NamedFrom, Series};
    use sea_orm::{Database, DatabaseConnection};
    use std::sync::Arc;
    use tracing::Level;
    use tracing_subscriber::FmtSubscriber;

    /// Fixed "today" for every HTTP test.
    pub fn test_today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 20).unwrap()
    }

    pub fn day(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    /// Hours of forecast served for today.
    pub const FORECAST_HOURS: usize = 36;
    /// History is stored hourly from this day up to the day before today.
    pub const HISTORY_START: (u32, u32) = (5, 1);

    /// `count` hourly rows starting at `start`.
    pub fn hourly_rows(start: NaiveDateTime, count: usize) -> Vec<Observation> {
        (0..count)
            .map(|i| {
                let hour = i as f64;
                Observation {
                    timestamp: start + Duration::hours(i as i64),
                    temperature_c: 2.0 + (hour % 24.0) * 0.25,
                    wind_speed_ms: 5.0 + (hour % 5.0),
                    solar_irradiance_wm2: if (8.0..16.0).contains(&(hour % 24.0)) { 180.0 } else { 0.0 },
                    production_kw: 8_000_000.0,
                    consumption_kwh: 9_500_000.0,
                    price_c_per_kwh: Some(5.0 + (hour % 6.0)),
                }
            })
            .collect()
    }

    pub fn test_model() -> LinearModel {
        LinearModel::new(
            vec![
                "temperature_c".to_string(),
                "wind_speed_ms".to_string(),
                "solar_irradiance_wm2".to_string(),
                "production_kw".to_string(),
                "consumption_kwh".to_string(),
            ],
            vec![-0.1, -0.3, -0.005, -0.000_001, 0.000_002],
            6.0,
        )
        .unwrap()
    }

    pub fn forecast_table() -> DataFrame {
        let start = test_today().and_hms_opt(0, 0, 0).unwrap();
        observations_to_table(&hourly_rows(start, FORECAST_HOURS)).unwrap()
    }

    /// History provider that always fails, standing in for an unreachable database.
    pub struct UnavailableHistory;

    #[async_trait]
    impl HistoryProvider for UnavailableHistory {
        async fn fetch(&self, _start: NaiveDateTime, _end: NaiveDateTime) -> ComputeResult<DataFrame> {
            Err(ComputeError::HistorySource("connection refused".to_string()))
        }
    }

    /// Create an in-memory SQLite database for testing
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    /// Database holding hourly history from `HISTORY_START` until the end of yesterday.
    pub async fn setup_history_db() -> DatabaseConnection {
        let db = setup_test_db().await;
        let start = day(HISTORY_START.0, HISTORY_START.1).and_hms_opt(0, 0, 0).unwrap();
        let hours = (test_today() - day(HISTORY_START.0, HISTORY_START.1)).num_hours() as usize;
        import_observations(&db, &hourly_rows(start, hours))
            .await
            .expect("Failed to seed history");
        db
    }

    fn app_state(
        db: DatabaseConnection,
        history: Box<dyn HistoryProvider>,
        model: Arc<dyn PredictionModel>,
    ) -> AppState {
        let pipeline = Pipeline::new(history, model, forecast_table())
            .expect("Failed to build pipeline");

        AppState {
            db,
            pipeline: Arc::new(pipeline),
            validator: RangeValidator::new(day(1, 1)),
            today: Some(test_today()),
        }
    }

    /// Create AppState for testing, backed by a seeded in-memory database
    pub async fn setup_test_app_state() -> AppState {
        let db = setup_history_db().await;
        app_state(
            db.clone(),
            Box::new(DbHistoryProvider::new(db)),
            Arc::new(test_model()),
        )
    }

    /// Initialize tracing for tests with output to STDERR.
    ///
    /// The log level is taken from RUST_LOG, defaulting to WARN.
    fn init_test_tracing() -> tracing::subscriber::DefaultGuard {
        let log_level = std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| match level.to_uppercase().as_str() {
                "ERROR" => Some(Level::ERROR),
                "WARN" => Some(Level::WARN),
                "INFO" => Some(Level::INFO),
                "DEBUG" => Some(Level::DEBUG),
                "TRACE" => Some(Level::TRACE),
                _ => None,
            })
            .unwrap_or(Level::WARN);

        let subscriber = FmtSubscriber::builder()
            .with_max_level(log_level)
            .with_writer(std::io::stderr)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    /// Create axum app for testing
    pub async fn setup_test_app() -> Router {
        let _guard = init_test_tracing();
        create_router(setup_test_app_state().await)
    }

    /// App whose history source is down; every non-today range falls back.
    pub async fn setup_unavailable_history_app() -> Router {
        let db = setup_test_db().await;
        create_router(app_state(
            db,
            Box::new(UnavailableHistory),
            Arc::new(test_model()),
        ))
    }

    /// App whose history tables carry a feature the model was not trained on.
    pub async fn setup_schema_mismatch_app() -> Router {
        let db = setup_test_db().await;
        create_router(app_state(
            db,
            Box::new(ExtraColumnHistory),
            Arc::new(test_model()),
        ))
    }

    /// History provider returning tables with an unexpected feature column.
    pub struct ExtraColumnHistory;

    #[async_trait]
    impl HistoryProvider for ExtraColumnHistory {
        async fn fetch(&self, start: NaiveDateTime, _end: NaiveDateTime) -> ComputeResult<DataFrame> {
            let mut table = observations_to_table(&hourly_rows(start, 3))?;
            table.with_column(Series::new(
                "humidity".into(),
                vec![0.4, 0.5, 0.6],
            ))?;
            Ok(table)
        }
    }
}

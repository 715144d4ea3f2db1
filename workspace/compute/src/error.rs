use thiserror::Error;
use tracing::error;

/// Error types for the compute module
#[derive(Error, Debug)]
pub enum ComputeError {
    /// Error from the database operations
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// Error from Polars DataFrame operations
    #[error("DataFrame error: {0}")]
    DataFrame(String),

    /// Error from Polars Series operations
    #[error("Series error: {0}")]
    Series(String),

    /// The table handed to the model does not match its trained feature set.
    /// Never recovered: it means the deployment is broken, not that a source is flaky.
    #[error("Schema error: {0}")]
    Schema(String),

    /// The history source returned something that is not a usable table.
    #[error("History source error: {0}")]
    HistorySource(String),

    /// Error talking to the forecast API
    #[error("Forecast source error: {0}")]
    ForecastSource(String),

    /// The model artifact could not be read or is inconsistent
    #[error("Model error: {0}")]
    Model(String),

    /// Error from date operations
    #[error("Date error: {0}")]
    Date(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<polars::error::PolarsError> for ComputeError {
    fn from(error: polars::error::PolarsError) -> Self {
        match error {
            polars::error::PolarsError::NoData(_) => {
                let err = ComputeError::DataFrame(format!("No data: {}", error));
                error!(?err, "DataFrame error: No data");
                err
            }
            polars::error::PolarsError::ShapeMismatch(_) => {
                let err = ComputeError::DataFrame(format!("Shape mismatch: {}", error));
                error!(?err, "DataFrame error: Shape mismatch");
                err
            }
            polars::error::PolarsError::SchemaMismatch(_) => {
                let err = ComputeError::DataFrame(format!("Schema mismatch: {}", error));
                error!(?err, "DataFrame error: Schema mismatch");
                err
            }
            polars::error::PolarsError::ColumnNotFound(_) => {
                let err = ComputeError::DataFrame(format!("Column not found: {}", error));
                error!(?err, "DataFrame error: Column not found");
                err
            }
            _ => {
                let err = ComputeError::Series(format!("Series error: {}", error));
                error!(?err, "Series error");
                err
            }
        }
    }
}

impl From<reqwest::Error> for ComputeError {
    fn from(error: reqwest::Error) -> Self {
        ComputeError::ForecastSource(error.to_string())
    }
}

impl From<serde_json::Error> for ComputeError {
    fn from(error: serde_json::Error) -> Self {
        ComputeError::Model(error.to_string())
    }
}

/// Type alias for Result with ComputeError
pub type Result<T> = std::result::Result<T, ComputeError>;

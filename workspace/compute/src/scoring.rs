//! Prediction model interface and the scoring step that feeds it.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::error::{ComputeError, Result};
use crate::table::{NON_FEATURE_COLUMNS, PREDICTED_PRICE, required_f64};

/// A pre-trained model mapping feature rows to a predicted price.
pub trait PredictionModel: Send + Sync {
    /// Feature columns the model was trained on, in input order.
    fn feature_names(&self) -> &[String];

    /// One prediction per row of `features`, in row order.
    ///
    /// `features` holds exactly [`Self::feature_names`] as non-null Float64 columns.
    fn predict(&self, features: &DataFrame) -> Result<Vec<f64>>;
}

/// Linear regression persisted as a JSON artifact.
///
/// ```json
/// {"feature_names": ["temperature_c", "wind_speed_ms"], "coefficients": [-0.12, -0.31], "intercept": 6.4}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    feature_names: Vec<String>,
    coefficients: Vec<f64>,
    intercept: f64,
}

impl LinearModel {
    pub fn new(feature_names: Vec<String>, coefficients: Vec<f64>, intercept: f64) -> Result<Self> {
        let model = Self {
            feature_names,
            coefficients,
            intercept,
        };
        model.check()?;
        Ok(model)
    }

    /// Loads an artifact written by the training job.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path.as_ref()).map_err(|e| {
            ComputeError::Model(format!(
                "cannot read model artifact {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        let model: Self = serde_json::from_str(&raw)?;
        model.check()?;

        info!(
            features = model.feature_names.len(),
            "Loaded prediction model"
        );
        Ok(model)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    fn check(&self) -> Result<()> {
        if self.feature_names.is_empty() {
            return Err(ComputeError::Model("model has no features".to_string()));
        }
        if self.feature_names.len() != self.coefficients.len() {
            return Err(ComputeError::Model(format!(
                "{} feature names but {} coefficients",
                self.feature_names.len(),
                self.coefficients.len()
            )));
        }
        let unique: BTreeSet<&str> = self.feature_names.iter().map(String::as_str).collect();
        if unique.len() != self.feature_names.len() {
            return Err(ComputeError::Model("duplicate feature names".to_string()));
        }
        Ok(())
    }
}

impl PredictionModel for LinearModel {
    fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    fn predict(&self, features: &DataFrame) -> Result<Vec<f64>> {
        let mut predictions = vec![self.intercept; features.height()];

        for (name, coefficient) in self.feature_names.iter().zip(&self.coefficients) {
            let values = required_f64(features, name)?;
            for (prediction, value) in predictions.iter_mut().zip(values) {
                *prediction += coefficient * value;
            }
        }

        Ok(predictions)
    }
}

fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Float64
            | DataType::Float32
            | DataType::Int64
            | DataType::Int32
            | DataType::UInt64
            | DataType::UInt32
    )
}

/// Extracts the model input from a table: every column except timestamp and
/// prices, in the model's order, as Float64.
///
/// Missing or unexpected columns, non-numeric columns and null values are all
/// schema errors.
pub fn feature_frame(model: &dyn PredictionModel, table: &DataFrame) -> Result<DataFrame> {
    let present: BTreeSet<&str> = table
        .get_column_names()
        .into_iter()
        .map(|name| name.as_str())
        .filter(|name| !NON_FEATURE_COLUMNS.contains(name))
        .collect();
    let expected: BTreeSet<&str> = model.feature_names().iter().map(String::as_str).collect();

    if present != expected {
        let missing: Vec<&str> = expected.difference(&present).copied().collect();
        let unexpected: Vec<&str> = present.difference(&expected).copied().collect();
        return Err(ComputeError::Schema(format!(
            "feature columns do not match the model: missing {:?}, unexpected {:?}",
            missing, unexpected
        )));
    }

    let mut columns = Vec::with_capacity(model.feature_names().len());
    for name in model.feature_names() {
        let column = table.column(name)?;
        if !is_numeric(column.dtype()) {
            return Err(ComputeError::Schema(format!(
                "feature '{}' has non-numeric type {}",
                name,
                column.dtype()
            )));
        }
        if column.null_count() > 0 {
            return Err(ComputeError::Schema(format!(
                "feature '{}' has {} missing values",
                name,
                column.null_count()
            )));
        }
        columns.push(column.cast(&DataType::Float64)?);
    }

    Ok(DataFrame::new(columns)?)
}

/// Attaches `predicted_price` to `table`, replacing any previous prediction.
///
/// A zero-row table gets a typed empty column and the model is not called.
#[instrument(skip_all, fields(rows = table.height()))]
pub fn score_table(model: &dyn PredictionModel, mut table: DataFrame) -> Result<DataFrame> {
    let predictions = if table.height() == 0 {
        debug!("Empty table, attaching empty prediction column");
        Vec::new()
    } else {
        let features = feature_frame(model, &table)?;
        let predictions = model.predict(&features)?;
        if predictions.len() != table.height() {
            return Err(ComputeError::Schema(format!(
                "model returned {} predictions for {} rows",
                predictions.len(),
                table.height()
            )));
        }
        predictions
    };

    table.with_column(Series::new(PREDICTED_PRICE.into(), predictions))?;
    Ok(table)
}

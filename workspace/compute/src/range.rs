use chrono::NaiveDate;
use common::{DateRange, Notice};
use thiserror::Error;
use tracing::warn;

/// Rejected date picker input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("end date {end} is before start date {start}")]
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
}

impl RangeError {
    pub fn notice(&self) -> Notice {
        Notice::error("Invalid start date selected.", 2)
    }
}

/// Checks user-entered ranges before anything is fetched.
#[derive(Debug, Clone, Copy)]
pub struct RangeValidator {
    /// Earliest day the date pickers offer.
    allowed_start: NaiveDate,
}

impl RangeValidator {
    pub fn new(allowed_start: NaiveDate) -> Self {
        Self { allowed_start }
    }

    /// Bounds published to the date pickers; the upper bound moves with `today`.
    pub fn allowed_range(&self, today: NaiveDate) -> DateRange {
        DateRange::new(self.allowed_start.min(today), today)
    }

    pub fn validate(&self, start: NaiveDate, end: NaiveDate) -> Result<DateRange, RangeError> {
        if end < start {
            warn!(%start, %end, "Rejected date range");
            return Err(RangeError::EndBeforeStart { start, end });
        }
        Ok(DateRange::new(start, end))
    }
}

//! Metrics error types.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur during metrics aggregation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MetricsError {
    /// Invalid date range.
    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange {
        /// Start date.
        start: NaiveDate,
        /// End date.
        end: NaiveDate,
    },
}

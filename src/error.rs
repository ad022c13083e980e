// ⚠️ Error Types
// The two outward-facing kinds (DataUnavailable, UndefinedMetric) plus the
// low-level failures the data source classifies before deciding to fall back.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashboardError {
    /// Neither loading nor generating a dataset succeeded. Fatal at startup.
    #[error("Data unavailable at {}: {reason}", .path.display())]
    DataUnavailable { path: PathBuf, reason: String },

    /// A scalar metric has no defined value (zero denominator, missing year).
    #[error("Undefined metric: {0}")]
    UndefinedMetric(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// File read fine but is not a registrations table
    #[error("Format error: {0}")]
    Format(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DashboardError {
    pub fn unavailable(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        DashboardError::DataUnavailable {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn undefined(metric: impl Into<String>) -> Self {
        DashboardError::UndefinedMetric(metric.into())
    }

    /// True for the "render a no-data indicator" kind of error
    pub fn is_undefined_metric(&self) -> bool {
        matches!(self, DashboardError::UndefinedMetric(_))
    }
}

pub type Result<T> = std::result::Result<T, DashboardError>;

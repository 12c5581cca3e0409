//! Fatal error taxonomy for the planner.
//!
//! Per-row target problems are *not* errors at this level: they are collected
//! as [`crate::models::RowError`] values and reported without aborting the
//! run. Everything here stops the run before or during processing.

use std::path::PathBuf;

/// Result type for planner operations.
pub type PlannerResult<T> = Result<T, PlannerError>;

#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    /// Missing or inconsistent run configuration. Raised before any target
    /// is processed.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Filesystem failure, with the path that failed.
    #[error("i/o error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A table file that could not be understood.
    #[error("table format error in {path}: {message}")]
    TableFormat { path: PathBuf, message: String },

    /// Refusing to replace an existing output without `--overwrite`.
    #[error("output file {0} already exists (pass --overwrite to replace it)")]
    OutputExists(PathBuf),
}

impl PlannerError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PlannerError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn table_format(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        PlannerError::TableFormat {
            path: path.into(),
            message: message.into(),
        }
    }
}

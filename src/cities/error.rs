use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CityError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error in {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A required column is absent from a table header
    #[error("column `{0}` not found")]
    MissingColumn(String),

    #[error("bubble text must not be empty")]
    EmptyText,

    /// The series has no measurement for the requested year
    #[error("no data for year {0}")]
    NoDataForYear(i32),

    /// No bubble exists for the requested year
    #[error("no bubble for year {0}")]
    UnknownYear(i32),
}

pub type CityResult<T> = std::result::Result<T, CityError>;

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or extracting a gridded dataset.
#[derive(Debug, Error)]
pub enum GridError {
    /// Input file does not exist
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// None of the accepted names for a required variable is present
    #[error("required {role} variable not found (tried: {candidates})")]
    MissingVariable { role: &'static str, candidates: String },

    /// Array shape disagrees with the coordinate axes
    #[error("shape error: {0}")]
    Shape(String),

    /// Downsample stride must be at least one
    #[error("invalid downsample stride {0}, expected a value >= 1")]
    InvalidStride(usize),

    #[cfg(feature = "netcdf")]
    #[error("NetCDF error: {0}")]
    NetCdf(#[from] netcdf::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type GridResult<T> = std::result::Result<T, GridError>;

//! Gridded PM2.5 data: loading, slicing, downsampling and point lookup.

pub mod aliases;
pub mod dataset;
pub mod error;
pub mod extract;
pub mod layout;
pub mod lookup;
#[cfg(feature = "netcdf")]
pub mod netcdf_file;

pub use aliases::VariableAliases;
pub use dataset::{GridDataset, GridSlice};
pub use error::{GridError, GridResult};
pub use extract::{extract, ExtractConfig, Extraction, SparsePoint, SparsePointSet};
pub use lookup::NearestLookup;
#[cfg(feature = "netcdf")]
pub use netcdf_file::open_grid;

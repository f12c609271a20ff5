//! Handles serialising and saving data to disk in the _parquet_ file format.

pub mod coords;
pub mod points;

pub use coords::save_coords;
pub use points::save_points;

//! City-level data: the cities PM2.5 table, coordinate joins and per-city
//! annotation documents.

pub mod error;
pub mod header;
pub mod series;
pub mod table;
pub mod world;

pub use error::{CityError, CityResult};
pub use header::{series_file_name, split_header, CityHeader};
pub use series::{index_dir, search, Bubble, CitySeries, IndexEntry, YearValue};
pub use table::{parse_year, CitiesTable};
pub use world::{CityCoords, JoinReport, MatchMode, WorldCities};

pub mod annotate;
pub mod coords;
pub mod extract;
pub mod inspect;
pub mod lookup;
pub mod offsets;
pub mod split;

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use serde::Serialize;

pub use annotate::annotate;
pub use coords::coords;
pub use extract::extract;
pub use inspect::inspect;
pub use lookup::lookup;
pub use offsets::offsets;
pub use split::split;

use crate::grid::SparsePointSet;

pub fn make_parquet_file_name(kind: &str) -> PathBuf {
    let today = Local::now();
    let file_name = format!(
        "pm25-{}-{}-{:02}-{:02}.parquet",
        kind,
        today.year(),
        today.month(),
        today.day()
    );

    dirs::home_dir().unwrap_or_default().join(file_name)
}

/// Writes `value` as pretty-printed JSON, creating parent directories.
pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;

    Ok(())
}

/// Reads a dashboard data file.
pub fn read_points(path: &Path) -> Result<SparsePointSet> {
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let points = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing {}", path.display()))?;

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{extract::ExtractConfig, GridDataset};
    use tempfile::TempDir;

    #[test]
    fn should_name_parquet_file_by_date() {
        let path = make_parquet_file_name("grid");
        let name = path.file_name().unwrap().to_string_lossy().to_string();

        assert!(name.starts_with("pm25-grid-"));
        assert!(name.ends_with(".parquet"));
        assert_eq!(name.len(), "pm25-grid-2022-01-01.parquet".len());
    }

    #[test]
    fn should_write_and_read_points() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("public").join("pm25.json");
        let grid = GridDataset::new(vec![1.0, 2.0], vec![3.0], None, vec![4.0, f64::NAN]).unwrap();
        let set = crate::grid::extract(&grid, &ExtractConfig::default())
            .unwrap()
            .points;

        write_json(&set, &path).unwrap();

        assert_eq!(read_points(&path).unwrap(), set);
    }

    #[test]
    fn should_fail_on_missing_points_file() {
        assert!(read_points(Path::new("missing/pm25.json")).is_err());
    }
}

//! Summarises a dashboard data file.

use std::path::Path;

use anyhow::Result;

use crate::grid::{SparsePoint, SparsePointSet};

use super::read_points;

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub lat_count: usize,
    pub lon_count: usize,
    pub points: usize,
    pub value_min: Option<f64>,
    pub value_max: Option<f64>,
    pub value_mean: Option<f64>,
    pub lat_extent: Option<[f64; 2]>,
    pub lon_extent: Option<[f64; 2]>,
}

pub async fn inspect(input: &Path) -> Result<()> {
    let set = read_points(input)?;
    let summary = summarise(&set);

    println!("=== PM2.5 Data Structure Analysis ===");
    println!("\n--- Metadata ---");
    let m = &set.metadata;
    println!("description: {}", m.description);
    println!("units: {}", m.units);
    println!("source: {}", m.source);
    println!("lat_range: {:?}", m.lat_range);
    println!("lon_range: {:?}", m.lon_range);
    println!("grid_size: {:?}", m.grid_size);
    println!("downsample_factor: {}", m.downsample_factor);

    println!("\n--- Coordinate Information ---");
    println!("Number of latitudes: {}", summary.lat_count);
    println!("Number of longitudes: {}", summary.lon_count);

    println!("\n--- Data Point Information ---");
    println!("Total number of data points: {}", summary.points);
    for (i, p) in set.data.iter().take(5).enumerate() {
        println!(
            "  {}: lat={:.2}, lon={:.2}, value={:.2}",
            i + 1,
            p.lat,
            p.lon,
            p.value
        );
    }

    if let (Some(min), Some(max), Some(mean)) =
        (summary.value_min, summary.value_max, summary.value_mean)
    {
        println!("\nPM2.5 Value Statistics:");
        println!("  Minimum: {:.2}", min);
        println!("  Maximum: {:.2}", max);
        println!("  Average: {:.2}", mean);
    }

    if let (Some(lat), Some(lon)) = (summary.lat_extent, summary.lon_extent) {
        println!("\nActual Data Geographical Distribution:");
        println!("  Latitude range: {:.2} to {:.2}", lat[0], lat[1]);
        println!("  Longitude range: {:.2} to {:.2}", lon[0], lon[1]);
    }

    println!("\nEach data point is the PM2.5 concentration ({}) at one grid point.", m.units);
    println!("A location takes the value of the nearest grid point within 1 degree.");

    Ok(())
}

pub fn summarise(set: &SparsePointSet) -> Summary {
    let values: Vec<f64> = set.data.iter().map(|p| p.value).collect();

    Summary {
        lat_count: set.coordinates.lats.len(),
        lon_count: set.coordinates.lons.len(),
        points: set.data.len(),
        value_min: values.iter().copied().reduce(f64::min),
        value_max: values.iter().copied().reduce(f64::max),
        value_mean: (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64),
        lat_extent: extent(&set.data, |p| p.lat),
        lon_extent: extent(&set.data, |p| p.lon),
    }
}

fn extent(points: &[SparsePoint], f: impl Fn(&SparsePoint) -> f64) -> Option<[f64; 2]> {
    let min = points.iter().map(&f).reduce(f64::min)?;
    let max = points.iter().map(&f).reduce(f64::max)?;

    Some([min, max])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{extract, ExtractConfig, GridDataset};

    #[test]
    fn should_summarise_points() {
        let grid = GridDataset::new(
            vec![10.0, 20.0],
            vec![0.0, 5.0],
            None,
            vec![1.0, 2.0, f64::NAN, 6.0],
        )
        .unwrap();
        let config = ExtractConfig {
            stride: 1,
            ..ExtractConfig::default()
        };
        let set = extract(&grid, &config).unwrap().points;

        let s = summarise(&set);

        assert_eq!(s.points, 3);
        assert_eq!(s.lat_count, 2);
        assert_eq!(s.value_min, Some(1.0));
        assert_eq!(s.value_max, Some(6.0));
        assert_eq!(s.value_mean, Some(3.0));
        assert_eq!(s.lat_extent, Some([10.0, 20.0]));
        assert_eq!(s.lon_extent, Some([0.0, 5.0]));
    }

    #[test]
    fn should_summarise_empty_set() {
        let grid = GridDataset::new(vec![0.0], vec![0.0], None, vec![f64::NAN]).unwrap();
        let set = extract(&grid, &ExtractConfig::default()).unwrap().points;

        let s = summarise(&set);

        assert_eq!(s.points, 0);
        assert_eq!(s.value_mean, None);
        assert_eq!(s.lat_extent, None);
    }
}

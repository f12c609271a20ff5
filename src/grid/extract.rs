//! Time-slice selection, validity masking and stride downsampling of a grid
//! into the sparse point set consumed by the dashboard.

use serde::{Deserialize, Serialize};
use tracing::info;

use super::{GridDataset, GridError, GridResult, GridSlice};

/// Extraction settings that the original tooling kept as constants.
#[derive(Debug, Clone)]
pub struct ExtractConfig {
    pub stride: usize,
    pub description: String,
    pub units: String,
    pub source: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        ExtractConfig {
            stride: 4,
            description: "PM2.5 concentration data for 2022".to_string(),
            units: "µg/m³".to_string(),
            source: "concat_weighted_output.nc".to_string(),
        }
    }
}

/// Dashboard data file.
///
/// `data` is sparse: grid points whose source value was missing, infinite or
/// negative are left out. A consumer resolves an arbitrary location to the
/// value of the nearest listed point (see [`NearestLookup`](super::NearestLookup));
/// no interpolation is performed, so the effective resolution is that of the
/// downsampled grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparsePointSet {
    pub metadata: Metadata,
    pub coordinates: Coordinates,
    pub data: Vec<SparsePoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub description: String,
    pub units: String,
    pub source: String,
    pub lat_range: [f64; 2],
    pub lon_range: [f64; 2],
    pub grid_size: [usize; 2],
    pub downsample_factor: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lats: Vec<f64>,
    pub lons: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SparsePoint {
    pub lat: f64,
    pub lon: f64,
    pub value: f64,
}

/// Counts over the full-resolution slice, before downsampling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceStats {
    pub cells: usize,
    pub valid: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct Extraction {
    pub points: SparsePointSet,
    pub stats: SliceStats,
    pub time_index: usize,
}

/// A measurement is usable only when finite and non-negative.
pub fn is_valid(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

/// Indices `0, k, 2k, ...` below `len`.
pub fn stride_indices(len: usize, stride: usize) -> Vec<usize> {
    (0..len).step_by(stride).collect()
}

pub fn extract(dataset: &GridDataset, config: &ExtractConfig) -> GridResult<Extraction> {
    if config.stride == 0 {
        return Err(GridError::InvalidStride(config.stride));
    }

    let slice = dataset.latest_slice();
    if let Some(times) = dataset.times() {
        info!(
            steps = times.len(),
            time_index = slice.time_index(),
            "Using last time step"
        );
    }

    let stats = slice_stats(&slice);
    info!(
        valid = stats.valid,
        cells = stats.cells,
        min = ?stats.min,
        max = ?stats.max,
        "Slice statistics"
    );

    let points = downsample(&slice, config);
    info!(
        rows = points.metadata.grid_size[0],
        cols = points.metadata.grid_size[1],
        points = points.data.len(),
        "Downsampled grid"
    );

    Ok(Extraction {
        points,
        stats,
        time_index: slice.time_index(),
    })
}

fn downsample(slice: &GridSlice<'_>, config: &ExtractConfig) -> SparsePointSet {
    let lat_indices = stride_indices(slice.rows(), config.stride);
    let lon_indices = stride_indices(slice.cols(), config.stride);

    let lats: Vec<f64> = lat_indices.iter().map(|&i| slice.lats()[i]).collect();
    let lons: Vec<f64> = lon_indices.iter().map(|&j| slice.lons()[j]).collect();

    let mut data = Vec::new();
    for (&i, &lat) in lat_indices.iter().zip(&lats) {
        for (&j, &lon) in lon_indices.iter().zip(&lons) {
            let value = slice.get(i, j);
            if is_valid(value) {
                data.push(SparsePoint { lat, lon, value });
            }
        }
    }

    SparsePointSet {
        metadata: Metadata {
            description: config.description.clone(),
            units: config.units.clone(),
            source: config.source.clone(),
            lat_range: range(&lats),
            lon_range: range(&lons),
            grid_size: [lats.len(), lons.len()],
            downsample_factor: config.stride,
        },
        coordinates: Coordinates { lats, lons },
        data,
    }
}

fn slice_stats(slice: &GridSlice<'_>) -> SliceStats {
    let mut stats = SliceStats {
        cells: 0,
        valid: 0,
        min: None,
        max: None,
    };

    for value in slice.values() {
        stats.cells += 1;
        if is_valid(value) {
            stats.valid += 1;
            stats.min = Some(stats.min.map_or(value, |m| m.min(value)));
            stats.max = Some(stats.max.map_or(value, |m| m.max(value)));
        }
    }

    stats
}

fn range(values: &[f64]) -> [f64; 2] {
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    [min, max]
}

// -- Tests -------------------------------------------------------------------

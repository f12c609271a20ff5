//! In-memory gridded dataset addressed by `(lat, lon, time)` index triples.

use super::{GridError, GridResult};

/// A latitude × longitude × time grid stored as a flat arena of floats.
///
/// Values are laid out with time varying fastest, then longitude, then
/// latitude. A dataset without a time axis is a plain `lat × lon` grid.
#[derive(Debug, Clone)]
pub struct GridDataset {
    lats: Vec<f64>,
    lons: Vec<f64>,
    times: Option<Vec<f64>>,
    values: Vec<f64>,
}

impl GridDataset {
    pub fn new(
        lats: Vec<f64>,
        lons: Vec<f64>,
        times: Option<Vec<f64>>,
        values: Vec<f64>,
    ) -> GridResult<Self> {
        if lats.is_empty() || lons.is_empty() {
            return Err(GridError::Shape(format!(
                "empty coordinate axis ({} lats, {} lons)",
                lats.len(),
                lons.len()
            )));
        }

        let steps = match &times {
            Some(t) if t.is_empty() => {
                return Err(GridError::Shape("time axis has no steps".to_string()))
            }
            Some(t) => t.len(),
            None => 1,
        };

        let expected = lats.len() * lons.len() * steps;
        if values.len() != expected {
            return Err(GridError::Shape(format!(
                "expected {} values for a {}x{}x{} grid, found {}",
                expected,
                lats.len(),
                lons.len(),
                steps,
                values.len()
            )));
        }

        Ok(GridDataset {
            lats,
            lons,
            times,
            values,
        })
    }

    pub fn lats(&self) -> &[f64] {
        &self.lats
    }

    pub fn lons(&self) -> &[f64] {
        &self.lons
    }

    pub fn times(&self) -> Option<&[f64]> {
        self.times.as_deref()
    }

    fn steps(&self) -> usize {
        self.times.as_ref().map_or(1, Vec::len)
    }

    /// Value at `(lat_index, lon_index, time_index)`.
    pub fn value(&self, lat_index: usize, lon_index: usize, time_index: usize) -> f64 {
        let steps = self.steps();
        self.values[(lat_index * self.lons.len() + lon_index) * steps + time_index]
    }

    /// The slice at the last index of the time axis, or the whole grid when
    /// there is no time axis.
    pub fn latest_slice(&self) -> GridSlice<'_> {
        GridSlice {
            dataset: self,
            time_index: self.steps() - 1,
        }
    }
}

/// A 2-D `lat × lon` view of one time step.
#[derive(Debug, Clone, Copy)]
pub struct GridSlice<'a> {
    dataset: &'a GridDataset,
    time_index: usize,
}

impl<'a> GridSlice<'a> {
    pub fn time_index(&self) -> usize {
        self.time_index
    }

    pub fn rows(&self) -> usize {
        self.dataset.lats.len()
    }

    pub fn cols(&self) -> usize {
        self.dataset.lons.len()
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.dataset.value(row, col, self.time_index)
    }

    pub fn lats(&self) -> &'a [f64] {
        &self.dataset.lats
    }

    pub fn lons(&self) -> &'a [f64] {
        &self.dataset.lons
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.rows()).flat_map(move |i| (0..self.cols()).map(move |j| self.get(i, j)))
    }
}

// -- Tests -------------------------------------------------------------------

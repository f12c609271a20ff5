//! Mapping a variable's on-disk dimension order onto the canonical
//! `(lat, lon, time)` arena used by [`GridDataset`](super::GridDataset).

use super::{GridError, GridResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Lat,
    Lon,
    Time,
}

/// Assigns a role to each dimension of the measurement variable.
///
/// Dimensions are matched by name against the coordinate dimensions. When
/// the names don't identify every axis exactly once, the positional layout
/// `(lat, lon)` or `(lat, lon, time)` is assumed.
pub fn resolve_axes(
    dim_names: &[String],
    lat_dim: &str,
    lon_dim: &str,
    time_dim: Option<&str>,
) -> GridResult<Vec<Axis>> {
    let positional = match (dim_names.len(), time_dim) {
        (2, _) => vec![Axis::Lat, Axis::Lon],
        (3, Some(_)) => vec![Axis::Lat, Axis::Lon, Axis::Time],
        (rank, _) => {
            return Err(GridError::Shape(format!(
                "data dimensions do not match expectations: rank {} ({})",
                rank,
                dim_names.join(", ")
            )))
        }
    };

    let named: Vec<Option<Axis>> = dim_names
        .iter()
        .map(|name| {
            if name == lat_dim {
                Some(Axis::Lat)
            } else if name == lon_dim {
                Some(Axis::Lon)
            } else if Some(name.as_str()) == time_dim {
                Some(Axis::Time)
            } else {
                None
            }
        })
        .collect();

    let complete = positional
        .iter()
        .all(|axis| named.iter().filter(|n| **n == Some(*axis)).count() == 1);

    if complete {
        Ok(named.into_iter().flatten().collect())
    } else {
        Ok(positional)
    }
}

/// Reorders row-major `values` of the given `shape` and `axes` into the
/// canonical arena order.
pub fn canonicalise(values: Vec<f64>, axes: &[Axis], shape: &[usize]) -> GridResult<Vec<f64>> {
    if axes.len() != shape.len() {
        return Err(GridError::Shape(format!(
            "{} axes for a rank {} array",
            axes.len(),
            shape.len()
        )));
    }

    let total: usize = shape.iter().product();
    if values.len() != total {
        return Err(GridError::Shape(format!(
            "expected {} values for shape {:?}, found {}",
            total,
            shape,
            values.len()
        )));
    }

    let canonical = [Axis::Lat, Axis::Lon, Axis::Time];
    if axes.iter().zip(canonical.iter()).all(|(a, c)| a == c) {
        return Ok(values);
    }

    let mut strides = vec![1; shape.len()];
    for d in (0..shape.len().saturating_sub(1)).rev() {
        strides[d] = strides[d + 1] * shape[d + 1];
    }

    let extent = |axis: Axis| {
        axes.iter()
            .position(|a| *a == axis)
            .map_or((1, 0), |d| (shape[d], strides[d]))
    };
    let (rows, lat_stride) = extent(Axis::Lat);
    let (cols, lon_stride) = extent(Axis::Lon);
    let (steps, time_stride) = extent(Axis::Time);

    let mut out = Vec::with_capacity(total);
    for i in 0..rows {
        for j in 0..cols {
            for k in 0..steps {
                out.push(values[i * lat_stride + j * lon_stride + k * time_stride]);
            }
        }
    }

    Ok(out)
}

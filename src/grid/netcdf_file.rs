//! Loads a PM2.5 grid from a NetCDF file.

use std::path::Path;

use tracing::{debug, info};

use super::{
    aliases::resolve,
    layout::{canonicalise, resolve_axes},
    GridDataset, GridError, GridResult, VariableAliases,
};

/// Names resolved from the file's variables.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedVariables {
    pub latitude: String,
    pub longitude: String,
    pub measurement: String,
    pub time: Option<String>,
}

/// Opens `path` and reads the measurement variable into a [`GridDataset`].
///
/// Stored `_FillValue`/`missing_value` entries become NaN and
/// `scale_factor`/`add_offset` are applied, so downstream code sees the
/// same masked values a CF-aware reader would.
pub fn open_grid(path: &Path, aliases: &VariableAliases) -> GridResult<(GridDataset, ResolvedVariables)> {
    if !path.exists() {
        return Err(GridError::NotFound(path.to_path_buf()));
    }

    info!(path = %path.display(), "Reading NetCDF file");
    let file = netcdf::open(path)?;

    let names: Vec<String> = file.variables().map(|v| v.name()).collect();
    debug!(variables = ?names, "File variables");

    let exists = |name: &str| names.iter().any(|n| n == name);
    let resolved = ResolvedVariables {
        latitude: resolve(&aliases.latitude, exists)
            .ok_or_else(|| missing("latitude", &aliases.latitude))?,
        longitude: resolve(&aliases.longitude, exists)
            .ok_or_else(|| missing("longitude", &aliases.longitude))?,
        measurement: resolve(&aliases.measurement, exists)
            .ok_or_else(|| missing("measurement", &aliases.measurement))?,
        time: resolve(&aliases.time, exists),
    };
    info!(
        lat = %resolved.latitude,
        lon = %resolved.longitude,
        measurement = %resolved.measurement,
        time = ?resolved.time,
        "Resolved variables"
    );

    let lat_var = variable(&file, &resolved.latitude)?;
    let lon_var = variable(&file, &resolved.longitude)?;
    let lats: Vec<f64> = lat_var.get_values(..)?;
    let lons: Vec<f64> = lon_var.get_values(..)?;

    let (times, time_dim) = match &resolved.time {
        Some(name) => {
            let time_var = variable(&file, name)?;
            let times: Vec<f64> = time_var.get_values(..)?;
            (Some(times), Some(first_dimension(&time_var)))
        }
        None => (None, None),
    };

    let var = variable(&file, &resolved.measurement)?;
    let dim_names: Vec<String> = var.dimensions().iter().map(|d| d.name()).collect();
    let shape: Vec<usize> = var.dimensions().iter().map(|d| d.len()).collect();
    info!(shape = ?shape, dimensions = ?dim_names, "Measurement variable");

    let axes = resolve_axes(
        &dim_names,
        &first_dimension(&lat_var),
        &first_dimension(&lon_var),
        time_dim.as_deref(),
    )?;

    let raw: Vec<f64> = var.get_values(..)?;
    let values = unpack(raw, &var);
    let values = canonicalise(values, &axes, &shape)?;

    // A 2-D measurement is used as-is even when the file carries a time axis.
    let times = if axes.len() == 3 { times } else { None };

    let dataset = GridDataset::new(lats, lons, times, values)?;

    Ok((dataset, resolved))
}

fn missing(role: &'static str, candidates: &[String]) -> GridError {
    GridError::MissingVariable {
        role,
        candidates: candidates.join(", "),
    }
}

fn variable<'f>(file: &'f netcdf::File, name: &str) -> GridResult<netcdf::Variable<'f>> {
    file.variable(name)
        .ok_or_else(|| missing("named", &[name.to_string()]))
}

fn first_dimension(var: &netcdf::Variable) -> String {
    var.dimensions()
        .first()
        .map(|d| d.name())
        .unwrap_or_else(|| var.name())
}

/// netCDF default fill for `double` variables without a `_FillValue`.
const NC_FILL_DOUBLE: f64 = 9.969_209_968_386_869e36;

/// netCDF default fill for `float` variables, as read back into `f64`.
const NC_FILL_FLOAT: f32 = 9.969_21e36;

fn is_default_fill(v: f64) -> bool {
    v == NC_FILL_DOUBLE || v == f64::from(NC_FILL_FLOAT)
}

fn unpack(raw: Vec<f64>, var: &netcdf::Variable) -> Vec<f64> {
    let fill = f64_attr(var, "_FillValue");
    let missing = f64_attr(var, "missing_value");
    let scale = f64_attr(var, "scale_factor").unwrap_or(1.0);
    let offset = f64_attr(var, "add_offset").unwrap_or(0.0);

    raw.into_iter()
        .map(|v| {
            if Some(v) == fill || Some(v) == missing || (fill.is_none() && is_default_fill(v)) {
                f64::NAN
            } else {
                v * scale + offset
            }
        })
        .collect()
}

fn f64_attr(var: &netcdf::Variable, name: &str) -> Option<f64> {
    if !var.attributes().any(|attr| attr.name() == name) {
        return None;
    }
    let value = var.attribute_value(name)?.ok()?;
    f64::try_from(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_fixture(path: &Path, measurement: &str) {
        let mut file = netcdf::create(path).unwrap();
        file.add_dimension("lat", 2).unwrap();
        file.add_dimension("lon", 3).unwrap();
        file.add_dimension("time", 2).unwrap();

        {
            let mut lat = file.add_variable::<f64>("lat", &["lat"]).unwrap();
            lat.put_values(&[10.0, 20.0], ..).unwrap();
        }
        {
            let mut lon = file.add_variable::<f64>("lon", &["lon"]).unwrap();
            lon.put_values(&[1.0, 2.0, 3.0], ..).unwrap();
        }
        {
            let mut time = file.add_variable::<f64>("time", &["time"]).unwrap();
            time.put_values(&[2021.0, 2022.0], ..).unwrap();
        }

        // stored as (time, lat, lon)
        let mut pm = file
            .add_variable::<f32>(measurement, &["time", "lat", "lon"])
            .unwrap();
        pm.put_attribute("_FillValue", -999.0f32).unwrap();
        let values: Vec<f32> = vec![
            1.0, 2.0, 3.0, 4.0, 5.0, 6.0, // 2021
            11.0, -999.0, 13.0, 14.0, 15.0, 16.0, // 2022
        ];
        pm.put_values(&values, ..).unwrap();
    }

    #[test]
    fn should_load_last_step_in_canonical_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("grid.nc");
        write_fixture(&path, "PM25");

        let (grid, resolved) = open_grid(&path, &VariableAliases::default()).unwrap();
        let slice = grid.latest_slice();

        assert_eq!(resolved.measurement, "PM25");
        assert_eq!(resolved.time, Some("time".to_string()));
        assert_eq!(grid.lats(), &[10.0, 20.0]);
        assert_eq!(slice.get(0, 0), 11.0);
        assert!(slice.get(0, 1).is_nan());
        assert_eq!(slice.get(1, 2), 16.0);
        assert_eq!(grid.value(1, 2, 0), 6.0);
    }

    #[test]
    fn should_report_missing_measurement() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("grid.nc");
        write_fixture(&path, "temperature");

        let result = open_grid(&path, &VariableAliases::default());

        assert!(matches!(
            result,
            Err(GridError::MissingVariable {
                role: "measurement",
                ..
            })
        ));
    }

    #[test]
    fn should_report_missing_file() {
        let result = open_grid(Path::new("no/such/file.nc"), &VariableAliases::default());

        assert!(matches!(result, Err(GridError::NotFound(_))));
    }

    #[test]
    fn should_mask_default_fill_without_fill_attribute() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("grid.nc");
        {
            let mut file = netcdf::create(&path).unwrap();
            file.add_dimension("lat", 1).unwrap();
            file.add_dimension("lon", 3).unwrap();
            {
                let mut lat = file.add_variable::<f64>("lat", &["lat"]).unwrap();
                lat.put_values(&[10.0], ..).unwrap();
            }
            {
                let mut lon = file.add_variable::<f64>("lon", &["lon"]).unwrap();
                lon.put_values(&[1.0, 2.0, 3.0], ..).unwrap();
            }
            let mut pm = file.add_variable::<f32>("PM25", &["lat", "lon"]).unwrap();
            pm.put_values(&[4.0f32, NC_FILL_FLOAT, 6.0], ..).unwrap();
        }

        let (grid, _) = open_grid(&path, &VariableAliases::default()).unwrap();
        let slice = grid.latest_slice();

        assert_eq!(slice.get(0, 0), 4.0);
        assert!(slice.get(0, 1).is_nan());
        assert_eq!(slice.get(0, 2), 6.0);
    }

    #[test]
    fn should_recognise_default_fill_of_both_widths() {
        assert!(is_default_fill(NC_FILL_DOUBLE));
        assert!(is_default_fill(f64::from(NC_FILL_FLOAT)));
        assert!(!is_default_fill(9.9e36));
        assert!(!is_default_fill(0.0));
    }
}

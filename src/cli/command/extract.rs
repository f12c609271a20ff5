use std::{fs, path::Path};

use anyhow::{Context, Result};
use tracing::info;

use crate::{
    cli::{create_spinner, ExtractArgs},
    grid::{self, ExtractConfig, GridDataset, VariableAliases},
    parquet,
};

use super::{make_parquet_file_name, write_json};

pub async fn extract(args: &ExtractArgs) -> Result<String> {
    let aliases = match &args.variable {
        Some(name) => VariableAliases::default().with_measurement(name),
        None => VariableAliases::default(),
    };

    let bar = create_spinner("Reading NetCDF file...".to_string());
    let dataset = load_grid(&args.input, &aliases);
    bar.finish_and_clear();
    let dataset = dataset?;

    let config = ExtractConfig {
        stride: args.stride,
        description: args.description.clone(),
        units: args.units.clone(),
        source: source_name(&args.input),
    };

    let extraction = grid::extract(&dataset, &config)
        .with_context(|| format!("extracting {}", args.input.display()))?;

    println!(
        "Valid data points: {} / {}",
        extraction.stats.valid, extraction.stats.cells
    );
    if let (Some(min), Some(max)) = (extraction.stats.min, extraction.stats.max) {
        println!("PM2.5 range: {:.2} to {:.2}", min, max);
    }
    println!(
        "Grid size after downsampling: {} x {}",
        extraction.points.metadata.grid_size[0], extraction.points.metadata.grid_size[1]
    );
    println!("Number of valid data points: {}", extraction.points.data.len());

    write_json(&extraction.points, &args.output)?;
    let size = fs::metadata(&args.output)?.len();
    info!(path = %args.output.display(), bytes = size, "Saved dashboard data");
    println!("Output file size: {:.2} MB", size as f64 / 1024.0 / 1024.0);

    if args.parquet {
        let parquet_path = args
            .parquet_path
            .clone()
            .unwrap_or_else(|| make_parquet_file_name("grid"));
        parquet::save_points(&extraction.points.data, &parquet_path)?;
        println!("Parquet copy saved to `{}`", parquet_path.display());
    }

    Ok(args.output.to_string_lossy().to_string())
}

#[cfg(feature = "netcdf")]
fn load_grid(path: &Path, aliases: &VariableAliases) -> Result<GridDataset> {
    let (dataset, _) =
        grid::open_grid(path, aliases).with_context(|| format!("reading {}", path.display()))?;

    Ok(dataset)
}

#[cfg(not(feature = "netcdf"))]
fn load_grid(path: &Path, _aliases: &VariableAliases) -> Result<GridDataset> {
    Err(anyhow::anyhow!(
        "cannot read {}: built without the `netcdf` feature",
        path.display()
    ))
}

fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_name_source_after_file() {
        assert_eq!(
            source_name(Path::new("public/concat_weighted_output.nc")),
            "concat_weighted_output.nc"
        );
    }

    #[tokio::test]
    async fn should_not_write_output_when_input_missing() {
        let dir = tempfile::TempDir::new().unwrap();
        let output = dir.path().join("pm25.json");
        let args = ExtractArgs {
            input: dir.path().join("missing.nc"),
            output: output.clone(),
            stride: 4,
            variable: None,
            description: String::new(),
            units: String::new(),
            parquet: false,
            parquet_path: None,
        };

        assert!(extract(&args).await.is_err());
        assert!(!output.exists());
    }

    #[cfg(feature = "netcdf")]
    fn write_grid(path: &Path, last_step: &[f32]) {
        let mut file = netcdf::create(path).unwrap();
        file.add_dimension("lat", 2).unwrap();
        file.add_dimension("lon", 2).unwrap();
        file.add_dimension("time", 2).unwrap();

        {
            let mut lat = file.add_variable::<f64>("lat", &["lat"]).unwrap();
            lat.put_values(&[10.0, 20.0], ..).unwrap();
        }
        {
            let mut lon = file.add_variable::<f64>("lon", &["lon"]).unwrap();
            lon.put_values(&[30.0, 40.0], ..).unwrap();
        }
        {
            let mut time = file.add_variable::<f64>("time", &["time"]).unwrap();
            time.put_values(&[2021.0, 2022.0], ..).unwrap();
        }

        let mut pm = file
            .add_variable::<f32>("PM25_WEIGHTED", &["time", "lat", "lon"])
            .unwrap();
        pm.put_attribute("_FillValue", -999.0f32).unwrap();
        let mut values = vec![7.0f32, 8.0, 9.0, 10.0];
        values.extend_from_slice(last_step);
        pm.put_values(&values, ..).unwrap();
    }

    #[cfg(feature = "netcdf")]
    fn args_for(dir: &Path) -> ExtractArgs {
        ExtractArgs {
            input: dir.join("grid.nc"),
            output: dir.join("pm25.json"),
            stride: 1,
            variable: None,
            description: "test".to_string(),
            units: "µg/m³".to_string(),
            parquet: true,
            parquet_path: Some(dir.join("pm25.parquet")),
        }
    }

    #[cfg(feature = "netcdf")]
    #[tokio::test]
    async fn should_write_empty_data_for_all_fill_last_step() {
        let dir = tempfile::TempDir::new().unwrap();
        let args = args_for(dir.path());
        write_grid(&args.input, &[-999.0; 4]);

        extract(&args).await.unwrap();

        let set = super::super::read_points(&args.output).unwrap();
        assert!(set.data.is_empty());
        assert_eq!(set.metadata.grid_size, [2, 2]);
        assert_eq!(set.metadata.source, "grid.nc");
        assert!(args.parquet_path.as_ref().unwrap().exists());
    }

    #[cfg(feature = "netcdf")]
    #[tokio::test]
    async fn should_extract_valid_cells_of_last_step() {
        use ::parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

        let dir = tempfile::TempDir::new().unwrap();
        let args = args_for(dir.path());
        write_grid(&args.input, &[1.5, -999.0, -3.0, 4.5]);

        extract(&args).await.unwrap();

        let set = super::super::read_points(&args.output).unwrap();
        let values: Vec<f64> = set.data.iter().map(|p| p.value).collect();
        assert_eq!(values, vec![1.5, 4.5]);
        assert_eq!((set.data[1].lat, set.data[1].lon), (20.0, 40.0));

        let file = fs::File::open(args.parquet_path.as_ref().unwrap()).unwrap();
        let rows: usize = ParquetRecordBatchReaderBuilder::try_new(file)
            .unwrap()
            .build()
            .unwrap()
            .map(|batch| batch.unwrap().num_rows())
            .sum();
        assert_eq!(rows, 2);
    }
}

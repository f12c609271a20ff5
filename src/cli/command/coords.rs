use anyhow::{Context, Result};
use tracing::info;

use crate::{
    cities::{CitiesTable, MatchMode, WorldCities},
    cli::CoordsArgs,
    parquet,
};

use super::write_json;

pub async fn coords(args: &CoordsArgs) -> Result<String> {
    let table = CitiesTable::load(&args.cities)
        .with_context(|| format!("reading {}", args.cities.display()))?;
    let world = WorldCities::load(&args.world)
        .with_context(|| format!("reading {}", args.world.display()))?;

    let (headers, mode) = if args.exact {
        (table.headers(), MatchMode::Exact)
    } else {
        (table.headers_lenient(), MatchMode::Lenient)
    };

    info!(
        columns = table.columns().len(),
        years = table.years().len(),
        world_rows = world.rows().len(),
        "Loaded inputs"
    );

    let report = world.join(&headers, mode);
    write_json(&report.matched, &args.output)?;

    println!("Matched cities: {}", report.matched.len());
    println!("Unmatched cities: {}", report.unmatched.len());
    if world.skipped() > 0 {
        println!("Skipped world city rows: {}", world.skipped());
    }
    if !report.unmatched.is_empty() {
        println!("List of unmatched cities:");
        for h in &report.unmatched {
            println!("{}, {}", h.city, h.country);
        }
    }

    if let Some(parquet_path) = &args.parquet_path {
        parquet::save_coords(&report.matched, parquet_path)?;
        println!("Parquet copy saved to `{}`", parquet_path.display());
    }

    Ok(args.output.to_string_lossy().to_string())
}

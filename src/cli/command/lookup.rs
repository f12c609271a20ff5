use std::path::Path;

use anyhow::Result;
use tracing::debug;

use crate::grid::NearestLookup;

use super::read_points;

pub async fn lookup(lat: f64, lon: f64, input: &Path) -> Result<()> {
    let set = read_points(input)?;
    let lookup = NearestLookup::new(&set.data);
    debug!(points = lookup.len(), "Grid lookup created");

    match lookup.value_at(lat, lon) {
        Some(value) => println!(
            "PM2.5 at ({:.2}, {:.2}): {:.2} {}",
            lat, lon, value, set.metadata.units
        ),
        None => println!("No grid point within 1 degree of ({:.2}, {:.2})", lat, lon),
    }

    Ok(())
}

use std::{fs, io, path::Path};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::{
    cities::{parse_year, CitiesTable},
    cli::OffsetsArgs,
    offset::OffsetStrategy,
};

/// A bubble cell whose (city, year) has no measurement in the cities table.
#[derive(Debug, Clone, PartialEq)]
pub struct MissingCell {
    pub city: String,
    pub year: i32,
}

pub async fn offsets(args: &OffsetsArgs) -> Result<String> {
    let table = CitiesTable::load(&args.cities)
        .with_context(|| format!("reading {}", args.cities.display()))?;
    let bubbles = fs::File::open(&args.bubbles)
        .with_context(|| format!("opening {}", args.bubbles.display()))?;
    if let Some(parent) = args.output.parent() {
        fs::create_dir_all(parent)?;
    }
    let output = fs::File::create(&args.output)?;

    let missing = pivot_offsets(&table, bubbles, output, &args.strategy)?;
    for m in &missing {
        println!("No PM2.5 data for {} in {}", m.city, m.year);
    }

    Ok(args.output.to_string_lossy().to_string())
}

/// Rewrites a bubble-text pivot (year column, then one column per city) as
/// an offset pivot of the same shape. Cells with text become `"ox,oy"` when
/// the table has a value for that city and year, and empty otherwise.
pub fn pivot_offsets<R, W>(
    table: &CitiesTable,
    bubbles: R,
    output: W,
    strategy: &dyn OffsetStrategy,
) -> Result<Vec<MissingCell>>
where
    R: io::Read,
    W: io::Write,
{
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(bubbles);
    let mut writer = csv::Writer::from_writer(output);

    let header = reader.headers()?.clone();
    writer.write_record(&header)?;
    let cities: Vec<&str> = header.iter().skip(1).collect();

    let mut missing = Vec::new();
    for record in reader.records() {
        let record = record?;
        let raw_year = record.get(0).unwrap_or_default();

        let Some(year) = parse_year(raw_year) else {
            warn!(year = raw_year, "Row year is not an integer, copied unchanged");
            writer.write_record(&record)?;
            continue;
        };

        let mut row = vec![raw_year.to_string()];
        for (c, city) in cities.iter().enumerate() {
            let text = record.get(c + 1).unwrap_or_default().trim();
            if text.is_empty() {
                row.push(String::new());
                continue;
            }

            match table.value(city, year) {
                Some(value) => {
                    let (ox, oy) = strategy.compute_offset(value, year);
                    debug!(city, year, value, ox, oy, "Offset computed");
                    row.push(format!("{},{}", ox, oy));
                }
                None => {
                    missing.push(MissingCell {
                        city: city.to_string(),
                        year,
                    });
                    row.push(String::new());
                }
            }
        }
        writer.write_record(&row)?;
    }
    writer.flush()?;

    Ok(missing)
}

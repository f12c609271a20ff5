//! Save joined city coordinates to a parquet file.

use std::{fs::File, path::Path, sync::Arc};

use anyhow::Result;
use arrow::{
    array::{ArrayRef, Float64Array, StringArray},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use parquet::{arrow::ArrowWriter, file::properties::WriterProperties};

use crate::cities::CityCoords;

pub fn save_coords(cities: &[CityCoords], file_path: &Path) -> Result<()> {
    let file = File::create(file_path)?;

    let schema = Arc::new(Schema::new(vec![
        Field::new("city", DataType::Utf8, false),
        Field::new("country", DataType::Utf8, false),
        Field::new("lat", DataType::Float64, false),
        Field::new("lng", DataType::Float64, false),
    ]));

    let props = WriterProperties::builder()
        .set_compression(parquet::basic::Compression::SNAPPY)
        .build();

    let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;

    let num_rows = cities.len();

    let mut names = Vec::with_capacity(num_rows);
    let mut countries = Vec::with_capacity(num_rows);
    let mut lats = Vec::with_capacity(num_rows);
    let mut lngs = Vec::with_capacity(num_rows);

    for c in cities {
        names.push(c.city.as_str());
        countries.push(c.country.as_str());
        lats.push(c.lat);
        lngs.push(c.lng);
    }

    let columns: Vec<(&str, ArrayRef)> = vec![
        ("city", Arc::new(StringArray::from(names))),
        ("country", Arc::new(StringArray::from(countries))),
        ("lat", Arc::new(Float64Array::from(lats))),
        ("lng", Arc::new(Float64Array::from(lngs))),
    ];

    let batch = RecordBatch::try_from_iter_with_nullable(
        columns.into_iter().map(|(name, col)| (name, col, false)),
    )?;

    writer.write(&batch)?;

    writer.close()?;

    Ok(())
}

//! Save a sparse point set to a parquet file.

use std::{fs::File, path::Path, sync::Arc};

use anyhow::Result;
use arrow::{
    array::{ArrayRef, Float64Array},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use parquet::{arrow::ArrowWriter, file::properties::WriterProperties};

use crate::{cli::create_progress_bar, grid::SparsePoint};

const CHUNK_SIZE: usize = 100_000;

pub fn save_points(points: &[SparsePoint], file_path: &Path) -> Result<()> {
    let file = File::create(file_path)?;

    let schema = Arc::new(Schema::new(vec![
        Field::new("lat", DataType::Float64, false),
        Field::new("lon", DataType::Float64, false),
        Field::new("value", DataType::Float64, false),
    ]));

    let props = WriterProperties::builder()
        .set_compression(parquet::basic::Compression::SNAPPY)
        .build();

    let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;

    let pb = create_progress_bar(points.len() as u64, "Writing parquet file chunks".to_string());

    for chunk in points.chunks(CHUNK_SIZE) {
        let lats: Vec<f64> = chunk.iter().map(|p| p.lat).collect();
        let lons: Vec<f64> = chunk.iter().map(|p| p.lon).collect();
        let values: Vec<f64> = chunk.iter().map(|p| p.value).collect();

        let columns: Vec<ArrayRef> = vec![
            Arc::new(Float64Array::from(lats)),
            Arc::new(Float64Array::from(lons)),
            Arc::new(Float64Array::from(values)),
        ];

        let batch = RecordBatch::try_new(schema.clone(), columns)?;
        writer.write(&batch)?;

        pb.inc(chunk.len() as u64);
    }

    pb.finish_with_message("Finished writing parquet file");

    writer.close()?;

    Ok(())
}

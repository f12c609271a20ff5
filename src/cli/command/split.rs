use std::{fs, path::Path};

use anyhow::{Context, Result};

use crate::{
    cities::{series_file_name, CitiesTable, CityHeader},
    cli::create_progress_bar,
};

pub async fn split(input: &Path, output_dir: &Path) -> Result<String> {
    let table =
        CitiesTable::load(input).with_context(|| format!("reading {}", input.display()))?;
    let series = table.to_series();
    if let (Some(first), Some(last)) = (table.years().first(), table.years().last()) {
        println!(
            "Cities table: {} columns, years {} to {}",
            table.columns().len(),
            first,
            last
        );
    }

    fs::create_dir_all(output_dir)?;

    let pb = create_progress_bar(series.len() as u64, "Writing city documents...".to_string());
    for s in &series {
        let name = series_file_name(&CityHeader {
            city: s.city.clone(),
            country: s.country.clone(),
        });
        s.save(&output_dir.join(name))?;
        pb.inc(1);
    }
    pb.finish_with_message("City documents written");

    println!(
        "Generated JSON files for {} cities in `{}`",
        series.len(),
        output_dir.display()
    );

    Ok(output_dir.to_string_lossy().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cities::CitySeries;
    use tempfile::TempDir;

    #[tokio::test]
    async fn should_write_one_document_per_city() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("cities.csv");
        let out = dir.path().join("cities_json");
        fs::write(
            &input,
            "Year,\"Accra, Ghana\",\"São Paulo, Brazil\"\n2021,10.5,\n2022,11.0,14.2\n",
        )
        .unwrap();

        split(&input, &out).await.unwrap();

        let accra = CitySeries::load(&out.join("Accra_Ghana.json")).unwrap();
        assert_eq!(accra.data.len(), 2);
        assert_eq!(accra.value_for(2022), Some(11.0));

        let sao = CitySeries::load(&out.join("São_Paulo_Brazil.json")).unwrap();
        assert_eq!(sao.data[0].value, None);
        assert_eq!(fs::read_dir(&out).unwrap().count(), 2);
    }
}

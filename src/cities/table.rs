//! The cities PM2.5 table: a `Year` column followed by one column per
//! `"City, Country"`.

use std::{fs::File, io::Read, path::Path};

use tracing::{info, warn};

use super::{
    header::{split_header, split_header_lenient},
    CityError, CityHeader, CityResult, CitySeries, YearValue,
};

#[derive(Debug, Clone, Default)]
pub struct CitiesTable {
    columns: Vec<String>,
    years: Vec<i32>,
    // rows[r][c] is the value of column c in years[r]
    rows: Vec<Vec<Option<f64>>>,
}

impl CitiesTable {
    pub fn load(path: &Path) -> CityResult<Self> {
        let table = Self::from_reader(File::open(path)?)?;
        info!(
            path = %path.display(),
            cities = table.columns.len(),
            years = table.years.len(),
            "Loaded cities table"
        );

        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R) -> CityResult<Self> {
        let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

        let headers = reader.headers()?.clone();
        let mut fields = headers.iter().map(|h| h.trim_start_matches('\u{feff}').trim());
        match fields.next() {
            Some(first) if first.eq_ignore_ascii_case("year") => {}
            _ => return Err(CityError::MissingColumn("Year".to_string())),
        }
        let columns: Vec<String> = fields.map(str::to_string).collect();

        let mut table = CitiesTable {
            columns,
            ..Default::default()
        };

        for record in reader.records() {
            let record = record?;
            let raw_year = record.get(0).unwrap_or("").trim();
            let Some(year) = parse_year(raw_year) else {
                warn!(year = raw_year, "Skipping row with unparseable year");
                continue;
            };

            let values = (0..table.columns.len())
                .map(|c| record.get(c + 1).and_then(parse_value))
                .collect();

            table.years.push(year);
            table.rows.push(values);
        }

        Ok(table)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// Headers that split into `(city, country)`, in column order.
    pub fn headers(&self) -> Vec<CityHeader> {
        self.columns.iter().filter_map(|c| split_header(c)).collect()
    }

    /// Headers split leniently: a column without a comma becomes a city
    /// with no country.
    pub fn headers_lenient(&self) -> Vec<CityHeader> {
        self.columns.iter().map(|c| split_header_lenient(c)).collect()
    }

    pub fn value(&self, column: &str, year: i32) -> Option<f64> {
        let c = self.columns.iter().position(|name| name == column)?;
        let r = self.years.iter().position(|y| *y == year)?;

        self.rows[r][c]
    }

    /// One series per city column. Columns whose name doesn't split into
    /// city and country are skipped.
    pub fn to_series(&self) -> Vec<CitySeries> {
        let mut series = Vec::with_capacity(self.columns.len());

        for (c, column) in self.columns.iter().enumerate() {
            let Some(header) = split_header(column) else {
                warn!(column = %column, "Skipping column without a country");
                continue;
            };

            let data = self
                .years
                .iter()
                .zip(&self.rows)
                .map(|(&year, row)| YearValue {
                    year,
                    value: row[c],
                })
                .collect();

            series.push(CitySeries {
                city: header.city,
                country: header.country,
                data,
                bubbles: Vec::new(),
            });
        }

        series
    }
}

/// Accepts `2005` as well as `2005.0`.
pub fn parse_year(s: &str) -> Option<i32> {
    let s = s.trim();
    s.parse::<i32>().ok().or_else(|| {
        s.parse::<f64>()
            .ok()
            .filter(|y| y.fract() == 0.0 && y.abs() < i32::MAX as f64)
            .map(|y| y as i32)
    })
}

fn parse_value(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

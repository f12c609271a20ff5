//! World cities reference table and the coordinate join against the cities
//! table header.

use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{CityError, CityHeader, CityResult};

#[derive(Debug, Clone, PartialEq)]
pub struct WorldCity {
    pub city: String,
    pub country: String,
    pub lat: f64,
    pub lng: f64,
}

/// Output row of the join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityCoords {
    pub city: String,
    pub country: String,
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// `(city, country)` must match exactly.
    Exact,
    /// Case-insensitive `(city, country)`, falling back to the first row with
    /// the same city name.
    Lenient,
}

#[derive(Debug, Default)]
pub struct JoinReport {
    pub matched: Vec<CityCoords>,
    pub unmatched: Vec<CityHeader>,
}

#[derive(Debug, Default)]
pub struct WorldCities {
    rows: Vec<WorldCity>,
    skipped: usize,
}

impl WorldCities {
    pub fn load(path: &Path) -> CityResult<Self> {
        let mut first_line = String::new();
        BufReader::new(File::open(path)?).read_line(&mut first_line)?;
        let delimiter = if first_line.contains('\t') { b'\t' } else { b',' };

        let table = Self::from_reader(File::open(path)?, delimiter)?;
        info!(
            path = %path.display(),
            rows = table.rows.len(),
            skipped = table.skipped,
            "Loaded world cities"
        );

        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> CityResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let column = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
                .ok_or_else(|| CityError::MissingColumn(name.to_string()))
        };
        let city_col = column("city")?;
        let country_col = column("country")?;
        let lat_col = column("lat")?;
        let lng_col = column("lng")?;

        let mut table = WorldCities::default();
        for (line, record) in reader.records().enumerate() {
            let record = record?;
            let field = |i: usize| record.get(i).unwrap_or("").trim();

            match (field(lat_col).parse::<f64>(), field(lng_col).parse::<f64>()) {
                (Ok(lat), Ok(lng)) => table.rows.push(WorldCity {
                    city: field(city_col).to_string(),
                    country: field(country_col).to_string(),
                    lat,
                    lng,
                }),
                _ => {
                    warn!(line = line + 2, city = field(city_col), "Skipping row with bad coordinates");
                    table.skipped += 1;
                }
            }
        }

        Ok(table)
    }

    pub fn rows(&self) -> &[WorldCity] {
        &self.rows
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    fn find(&self, header: &CityHeader, mode: MatchMode) -> Option<CityCoords> {
        let found = match mode {
            MatchMode::Exact => self
                .rows
                .iter()
                .find(|r| r.city == header.city && r.country == header.country)
                .map(|r| (r, header.country.clone())),
            MatchMode::Lenient => {
                let city = header.city.to_lowercase();
                let country = header.country.to_lowercase();
                self.rows
                    .iter()
                    .find(|r| r.city.to_lowercase() == city && r.country.to_lowercase() == country)
                    .map(|r| (r, header.country.clone()))
                    .or_else(|| {
                        self.rows
                            .iter()
                            .find(|r| r.city.to_lowercase() == city)
                            .map(|r| (r, title_case(&r.country)))
                    })
            }
        };

        found.map(|(row, country)| CityCoords {
            city: header.city.clone(),
            country,
            lat: row.lat,
            lng: row.lng,
        })
    }

    /// Looks up every header; misses are collected rather than dropped.
    pub fn join(&self, headers: &[CityHeader], mode: MatchMode) -> JoinReport {
        let mut report = JoinReport::default();

        for header in headers {
            match self.find(header, mode) {
                Some(coords) => report.matched.push(coords),
                None => report.unmatched.push(header.clone()),
            }
        }

        report
    }
}

/// Upper-cases the first letter of each word and lower-cases the rest.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut start = true;

    for c in s.chars() {
        if c.is_alphabetic() {
            if start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            start = false;
        } else {
            out.push(c);
            start = true;
        }
    }

    out
}

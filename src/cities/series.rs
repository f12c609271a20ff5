//! Per-city JSON documents: a yearly PM2.5 series plus annotation bubbles.

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{header::search_form, CityError, CityResult};
use crate::offset::OffsetStrategy;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CitySeries {
    pub city: String,
    pub country: String,
    pub data: Vec<YearValue>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bubbles: Vec<Bubble>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearValue {
    pub year: i32,
    pub value: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bubble {
    pub year: i32,
    pub text: String,
    pub offset_x: i32,
    pub offset_y: i32,
}

impl CitySeries {
    pub fn load(path: &Path) -> CityResult<Self> {
        let reader = BufReader::new(File::open(path)?);
        serde_json::from_reader(reader).map_err(|source| CityError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Writes the document pretty-printed with non-ASCII text kept as is.
    pub fn save(&self, path: &Path) -> CityResult<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self).map_err(|source| CityError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        writer.flush()?;

        Ok(())
    }

    pub fn label(&self) -> String {
        format!("{}, {}", self.city, self.country)
    }

    /// Measurement for `year`, if present and not null.
    pub fn value_for(&self, year: i32) -> Option<f64> {
        self.data
            .iter()
            .find(|d| d.year == year)
            .and_then(|d| d.value)
    }

    pub fn bubble(&self, year: i32) -> Option<&Bubble> {
        self.bubbles.iter().find(|b| b.year == year)
    }

    /// Adds a bubble for `year`, replacing any existing one, and returns it.
    pub fn upsert_bubble(
        &mut self,
        year: i32,
        text: &str,
        strategy: &dyn OffsetStrategy,
    ) -> CityResult<&Bubble> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CityError::EmptyText);
        }

        let value = self.value_for(year).ok_or(CityError::NoDataForYear(year))?;
        let (offset_x, offset_y) = strategy.compute_offset(value, year);
        debug!(year, value, offset_x, offset_y, "Computed bubble offset");

        self.bubbles.retain(|b| b.year != year);
        self.bubbles.push(Bubble {
            year,
            text: text.to_string(),
            offset_x,
            offset_y,
        });
        self.bubbles.sort_by_key(|b| b.year);

        self.bubble(year).ok_or(CityError::UnknownYear(year))
    }

    /// Like [`upsert_bubble`](Self::upsert_bubble) but the bubble must exist.
    pub fn update_bubble(
        &mut self,
        year: i32,
        text: &str,
        strategy: &dyn OffsetStrategy,
    ) -> CityResult<&Bubble> {
        if self.bubble(year).is_none() {
            return Err(CityError::UnknownYear(year));
        }

        self.upsert_bubble(year, text, strategy)
    }

    /// Removes the bubble for `year`. Returns whether one was removed.
    pub fn remove_bubble(&mut self, year: i32) -> bool {
        let before = self.bubbles.len();
        self.bubbles.retain(|b| b.year != year);

        self.bubbles.len() != before
    }

    /// Recomputes every bubble's offset from the series data. Returns the
    /// years whose offset could not be recomputed for lack of data.
    pub fn recompute_offsets(&mut self, strategy: &dyn OffsetStrategy) -> Vec<i32> {
        let mut missing = Vec::new();

        for i in 0..self.bubbles.len() {
            let year = self.bubbles[i].year;
            match self.value_for(year) {
                Some(value) => {
                    let (ox, oy) = strategy.compute_offset(value, year);
                    self.bubbles[i].offset_x = ox;
                    self.bubbles[i].offset_y = oy;
                }
                None => missing.push(year),
            }
        }

        missing
    }
}

/// A city document found in a directory.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry {
    pub path: PathBuf,
    pub city: String,
    pub country: String,
}

/// Lists the `.json` city documents in `dir`, sorted by file name.
/// Unreadable documents are skipped.
pub fn index_dir(dir: &Path) -> CityResult<Vec<IndexEntry>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let mut index = Vec::with_capacity(paths.len());
    for path in paths {
        match CitySeries::load(&path) {
            Ok(series) => index.push(IndexEntry {
                path,
                city: series.city,
                country: series.country,
            }),
            Err(e) => warn!(path = %path.display(), error = %e, "Skipping unreadable document"),
        }
    }

    Ok(index)
}

/// Case-insensitive, punctuation-agnostic match on city or country.
pub fn search<'a>(index: &'a [IndexEntry], term: &str) -> Vec<&'a IndexEntry> {
    let term = search_form(term);
    let term = term.trim();
    if term.is_empty() {
        return Vec::new();
    }

    index
        .iter()
        .filter(|e| search_form(&e.city).contains(term) || search_form(&e.country).contains(term))
        .collect()
}

// -- Tests -------------------------------------------------------------------

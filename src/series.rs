//! Year-to-series classification.
//!
//! The mapping is plain data: the built-in table covers the four Tom and
//! Jerry runs, and a JSON file with the same shape can replace it without
//! touching the matching code.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeriesTableError {
    #[error("failed to read series table {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid series table JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("series '{name}' has first_year {first_year} after last_year {last_year}")]
    InvertedRange {
        name: String,
        first_year: u32,
        last_year: u32,
    },

    #[error("series '{first}' and '{second}' overlap")]
    Overlap { first: String, second: String },
}

/// Inclusive year range mapped to a series name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesRange {
    pub first_year: u32,
    pub last_year: u32,
    pub name: String,
}

impl SeriesRange {
    pub fn new(first_year: u32, last_year: u32, name: impl Into<String>) -> Self {
        Self {
            first_year,
            last_year,
            name: name.into(),
        }
    }

    fn contains(&self, year: u32) -> bool {
        self.first_year <= year && year <= self.last_year
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesTable {
    ranges: Vec<SeriesRange>,
}

impl SeriesTable {
    /// Build a table, rejecting inverted or overlapping ranges.
    pub fn new(ranges: Vec<SeriesRange>) -> Result<Self, SeriesTableError> {
        for range in &ranges {
            if range.first_year > range.last_year {
                return Err(SeriesTableError::InvertedRange {
                    name: range.name.clone(),
                    first_year: range.first_year,
                    last_year: range.last_year,
                });
            }
        }

        for (i, a) in ranges.iter().enumerate() {
            for b in &ranges[i + 1..] {
                if a.first_year <= b.last_year && b.first_year <= a.last_year {
                    return Err(SeriesTableError::Overlap {
                        first: a.name.clone(),
                        second: b.name.clone(),
                    });
                }
            }
        }

        Ok(Self { ranges })
    }

    pub fn from_json(json: &str) -> Result<Self, SeriesTableError> {
        let ranges: Vec<SeriesRange> = serde_json::from_str(json)?;
        Self::new(ranges)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SeriesTableError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| SeriesTableError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Series name for `year`, or `None` when no range covers it.
    pub fn classify(&self, year: u32) -> Option<&str> {
        self.ranges
            .iter()
            .find(|range| range.contains(year))
            .map(|range| range.name.as_str())
    }

    /// Same as [`classify`](Self::classify) for a year still in text form.
    pub fn classify_str(&self, year: &str) -> Option<&str> {
        year.trim().parse::<u32>().ok().and_then(|y| self.classify(y))
    }

    pub fn ranges(&self) -> &[SeriesRange] {
        &self.ranges
    }
}

impl Default for SeriesTable {
    fn default() -> Self {
        Self {
            ranges: vec![
                SeriesRange::new(1940, 1967, "Tom and Jerry"),
                SeriesRange::new(1975, 1975, "The Tom & Jerry Show"),
                SeriesRange::new(1990, 1993, "Tom and Jerry Kids Show"),
                SeriesRange::new(2005, 2008, "Tom and Jerry Tales"),
            ],
        }
    }
}

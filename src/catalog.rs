//! Canonical episode catalog.
//!
//! The listing is a plain text file of line triples: episode code, title,
//! then an air date whose last comma-separated token is the year.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use thiserror::Error;
use tracing::{debug, error, warn};

use crate::normalize::normalize_title;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to open catalog {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeRecord {
    pub code: String,
    pub normalized_title: String,
    pub original_title: String,
    pub year: String,
}

impl EpisodeRecord {
    pub fn new(code: &str, title: &str, air_date: &str) -> Self {
        let year = air_date.rsplit(',').next().unwrap_or_default().trim();

        Self {
            code: code.trim().to_string(),
            normalized_title: normalize_title(title),
            original_title: title.trim().to_string(),
            year: year.to_string(),
        }
    }
}

/// Read-only, ordered set of episodes for one run.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    episodes: Vec<EpisodeRecord>,
}

impl Catalog {
    /// Build from records, keeping the first record for any repeated code.
    pub fn from_records(records: impl IntoIterator<Item = EpisodeRecord>) -> Self {
        let mut seen = HashSet::new();
        let mut episodes = Vec::new();

        for record in records {
            if seen.insert(record.code.clone()) {
                episodes.push(record);
            } else {
                warn!(
                    "Duplicate episode code {} ('{}'), keeping the first entry",
                    record.code, record.original_title
                );
            }
        }

        Self { episodes }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| CatalogError::Open {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::from_reader(BufReader::new(file)))
    }

    /// Parse line triples until the stream ends.
    ///
    /// A trailing partial record is dropped. A read error stops the loop and
    /// keeps whatever was parsed before it.
    pub fn from_reader<R: BufRead>(reader: R) -> Self {
        let mut lines = reader.lines();
        let mut records = Vec::new();

        loop {
            let mut triple = Vec::with_capacity(3);
            for _ in 0..3 {
                match lines.next() {
                    Some(Ok(line)) => triple.push(line),
                    Some(Err(e)) => {
                        error!("Error reading catalog: {}", e);
                        return Self::from_records(records);
                    }
                    None => break,
                }
            }

            if triple.len() < 3 {
                if triple.iter().any(|l| !l.trim().is_empty()) {
                    debug!("Discarding partial catalog record: {:?}", triple);
                }
                break;
            }

            records.push(EpisodeRecord::new(&triple[0], &triple[1], &triple[2]));
        }

        Self::from_records(records)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EpisodeRecord> {
        self.episodes.iter()
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    pub fn get(&self, code: &str) -> Option<&EpisodeRecord> {
        self.episodes.iter().find(|episode| episode.code == code)
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a EpisodeRecord;
    type IntoIter = std::slice::Iter<'a, EpisodeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

//! CSV report tables.
//!
//! Three tables come out of a run: results (always written), errors and
//! outliers (only written when they have rows). Each is a header row
//! followed by plain string columns.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::rename_engine::{RenameOutcome, RenameStatus};

pub const RESULTS_HEADER: [&str; 2] = ["Original Name", "New Name"];
pub const ERRORS_HEADER: [&str; 3] = ["Original Name", "Attempted New Name", "Error"];
pub const OUTLIERS_HEADER: [&str; 2] = ["Original Name", "New Name"];

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("report I/O failed for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRow {
    #[serde(rename = "Original Name")]
    pub original_name: String,
    #[serde(rename = "New Name")]
    pub new_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRow {
    #[serde(rename = "Original Name")]
    pub original_name: String,
    #[serde(rename = "Attempted New Name")]
    pub attempted_new_name: String,
    #[serde(rename = "Error")]
    pub error: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlierRow {
    #[serde(rename = "Original Name")]
    pub original_name: String,
    #[serde(rename = "New Name")]
    pub new_name: String,
}

/// Where the three tables live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub results: PathBuf,
    pub errors: PathBuf,
    pub outliers: PathBuf,
}

impl ReportPaths {
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            results: dir.join("results.csv"),
            errors: dir.join("errors.csv"),
            outliers: dir.join("outlier.csv"),
        }
    }

    /// Delete tables left behind by an earlier run.
    pub fn clear(&self) -> Result<(), ReportError> {
        for path in [&self.results, &self.errors, &self.outliers] {
            remove_table(path)?;
        }
        Ok(())
    }
}

/// Delete one table if it exists.
pub fn remove_table(path: &Path) -> Result<(), ReportError> {
    match fs::remove_file(path) {
        Ok(()) => {
            debug!("Removed previous report {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(source) => Err(ReportError::Io {
            path: path.display().to_string(),
            source,
        }),
    }
}

impl From<&RenameOutcome> for ResultRow {
    fn from(outcome: &RenameOutcome) -> Self {
        Self {
            original_name: outcome.original_name.clone(),
            new_name: outcome.new_name.clone(),
        }
    }
}

pub fn result_rows(outcomes: &[RenameOutcome]) -> Vec<ResultRow> {
    outcomes.iter().map(ResultRow::from).collect()
}

pub fn error_rows(outcomes: &[RenameOutcome]) -> Vec<ErrorRow> {
    outcomes
        .iter()
        .filter_map(|outcome| match &outcome.status {
            RenameStatus::Error(message) => Some(ErrorRow {
                original_name: outcome.original_name.clone(),
                attempted_new_name: outcome.new_name.clone(),
                error: message.clone(),
            }),
            _ => None,
        })
        .collect()
}

/// Write a table with an explicit header so an empty table still has one.
pub fn write_table<T: Serialize>(
    path: &Path,
    header: &[&str],
    rows: &[T],
) -> Result<(), ReportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ReportError::Io {
            path: parent.display().to_string(),
            source,
        })?;
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(header)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(|source| ReportError::Io {
        path: path.display().to_string(),
        source,
    })?;

    Ok(())
}

pub fn read_table<T>(path: &Path) -> Result<Vec<T>, ReportError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut reader = csv::Reader::from_path(path)?;
    let rows = reader.deserialize().collect::<Result<Vec<T>, _>>()?;
    Ok(rows)
}

pub fn read_results(path: &Path) -> Result<Vec<ResultRow>, ReportError> {
    read_table(path)
}

/// Write the results table and, when any rename failed, the errors table.
pub fn write_rename_reports(
    paths: &ReportPaths,
    outcomes: &[RenameOutcome],
) -> Result<(), ReportError> {
    let results = result_rows(outcomes);
    write_table(&paths.results, &RESULTS_HEADER, &results)?;
    info!("Wrote {} result row(s) to {}", results.len(), paths.results.display());

    let errors = error_rows(outcomes);
    if !errors.is_empty() {
        write_table(&paths.errors, &ERRORS_HEADER, &errors)?;
        info!("Wrote {} error row(s) to {}", errors.len(), paths.errors.display());
    }

    Ok(())
}

pub fn write_outliers(path: &Path, rows: &[OutlierRow]) -> Result<(), ReportError> {
    write_table(path, &OUTLIERS_HEADER, rows)
}

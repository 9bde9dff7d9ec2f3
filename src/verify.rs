//! Post-run cross-check of the results table.

use std::path::Path;

use tracing::{info, warn};

use crate::rename_engine::NO_MATCH_MESSAGE;
use crate::report::{self, OutlierRow, ReportError, ReportPaths, ResultRow};
use crate::series::SeriesTable;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerificationReport {
    pub unmatched: Vec<OutlierRow>,
    pub needs_review: Vec<OutlierRow>,
}

impl VerificationReport {
    pub fn is_clean(&self) -> bool {
        self.unmatched.is_empty() && self.needs_review.is_empty()
    }

    /// Unmatched rows first, then the ones flagged for review.
    pub fn outliers(&self) -> Vec<OutlierRow> {
        self.unmatched
            .iter()
            .chain(&self.needs_review)
            .cloned()
            .collect()
    }
}

/// Everything before the last `[`, trimmed.
pub fn strip_year_tag(name: &str) -> &str {
    name.rsplit_once('[').map_or(name, |(head, _)| head).trim()
}

fn year_tag(name: &str) -> Option<&str> {
    let (_, tail) = name.rsplit_once('[')?;
    tail.split(']').next()
}

pub fn verify_rows(rows: &[ResultRow], series: &SeriesTable) -> VerificationReport {
    let mut report = VerificationReport::default();

    for row in rows {
        let original = strip_year_tag(&row.original_name);

        if row.new_name.contains(NO_MATCH_MESSAGE) {
            report.unmatched.push(OutlierRow {
                original_name: original.to_string(),
                new_name: "No match found".to_string(),
            });
            continue;
        }

        let has_series_prefix = year_tag(&row.original_name)
            .and_then(|year| series.classify_str(year))
            .is_some_and(|name| row.new_name.starts_with(&format!("{name}.")));
        let title_carried_over = row
            .new_name
            .to_lowercase()
            .contains(&original.to_lowercase());

        if !has_series_prefix || !title_carried_over {
            report.needs_review.push(OutlierRow {
                original_name: row.original_name.clone(),
                new_name: row.new_name.clone(),
            });
        }
    }

    report
}

/// Check the results table and write the outlier table when anything looks
/// off. A clean pass removes any outlier table from an earlier check.
pub fn verify_results(
    paths: &ReportPaths,
    series: &SeriesTable,
) -> Result<VerificationReport, ReportError> {
    let rows = report::read_results(&paths.results)?;
    let verification = verify_rows(&rows, series);

    if verification.is_clean() {
        report::remove_table(&paths.outliers)?;
        info!("No mismatches found.");
    } else {
        write_outlier_report(&paths.outliers, &verification)?;
        warn!(
            "{} unmatched and {} suspicious rename(s) written to {}",
            verification.unmatched.len(),
            verification.needs_review.len(),
            paths.outliers.display()
        );
    }

    Ok(verification)
}

fn write_outlier_report(path: &Path, verification: &VerificationReport) -> Result<(), ReportError> {
    report::write_outliers(path, &verification.outliers())
}

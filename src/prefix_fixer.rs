//! Corrects the series prefix of files that were already renamed to
//! `<series>.<code>.<title>.<year>.avi` before the series table knew about
//! every run.

use std::path::Path;
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;
use tracing::{info, warn};

use crate::rename_engine::{RenameMode, RenameOutcome, RenameStatus, list_files, rename_in_dir};
use crate::series::SeriesTable;

/// Series assumed for a year the table does not cover.
pub const DEFAULT_SERIES: &str = "Tom and Jerry";

static YEAR_SUFFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.(\d{4})\.avi$").unwrap());

/// The name `filename` should have, or `None` if it is already right or is
/// not one of ours.
///
/// Only a leading segment that is a known series name (or the default) is
/// replaced, so unrelated files that happen to end in `.<year>.avi` are left
/// alone.
pub fn corrected_name(filename: &str, series: &SeriesTable) -> Option<String> {
    let captures = YEAR_SUFFIX.captures(filename)?;
    let year: u32 = captures[1].parse().ok()?;
    let expected = series.classify(year).unwrap_or(DEFAULT_SERIES);

    let (current, rest) = filename.split_once('.')?;
    let known = current == DEFAULT_SERIES || series.ranges().iter().any(|r| r.name == current);
    if !known || current == expected {
        return None;
    }

    Some(format!("{expected}.{rest}"))
}

pub fn fix_prefixes(
    directory: &Path,
    series: &SeriesTable,
    mode: RenameMode,
) -> Result<Vec<RenameOutcome>> {
    let files = list_files(directory)?;

    let mut outcomes = Vec::new();
    for filename in files {
        let Some(new_name) = corrected_name(&filename, series) else {
            continue;
        };

        let status = match mode {
            RenameMode::DryRun => {
                info!("Would rename '{}' to '{}'", filename, new_name);
                RenameStatus::DryRun
            }
            RenameMode::Execute => match rename_in_dir(directory, &filename, &new_name) {
                Ok(()) => {
                    info!("Renamed '{}' to '{}'", filename, new_name);
                    RenameStatus::Renamed
                }
                Err(e) => {
                    warn!("Error renaming {} to {}: {}", filename, new_name, e);
                    RenameStatus::Error(e.to_string())
                }
            },
        };

        outcomes.push(RenameOutcome {
            original_name: filename,
            new_name,
            status,
        });
    }

    Ok(outcomes)
}

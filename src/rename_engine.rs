use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use regex::Regex;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::matcher::{MatchResult, SimilarityScorer, TokenSetRatio, find_best_match};
use crate::normalize::normalize_title;
use crate::series::SeriesTable;

/// Extension every renamed file gets.
pub const TARGET_EXTENSION: &str = "avi";

/// Text written in place of a new name when nothing in the catalog matched.
pub const NO_MATCH_MESSAGE: &str = "No match found. Skipping.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenameMode {
    #[default]
    DryRun,
    Execute,
}

#[derive(Debug, Clone)]
pub struct RenameConfig {
    pub directory: PathBuf,
    pub mode: RenameMode,
}

/// A media filename split into its named parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    pub raw_filename: String,
    pub leading_index: Option<String>,
    pub extracted_title: String,
    pub extracted_year: String,
    pub extension: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameStatus {
    Renamed,
    DryRun,
    NoMatchSkipped,
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameOutcome {
    pub original_name: String,
    pub new_name: String,
    pub status: RenameStatus,
}

impl RenameOutcome {
    pub fn is_error(&self) -> bool {
        matches!(self.status, RenameStatus::Error(_))
    }

    pub fn error_message(&self) -> Option<&str> {
        match &self.status {
            RenameStatus::Error(message) => Some(message),
            _ => None,
        }
    }
}

pub struct RenameEngine<S = TokenSetRatio> {
    config: RenameConfig,
    catalog: Catalog,
    series: SeriesTable,
    scorer: S,
    filename_pattern: Regex,
}

impl RenameEngine {
    pub fn new(config: RenameConfig, catalog: Catalog, series: SeriesTable) -> Result<Self> {
        Self::with_scorer(config, catalog, series, TokenSetRatio)
    }
}

impl<S: SimilarityScorer> RenameEngine<S> {
    pub fn with_scorer(
        config: RenameConfig,
        catalog: Catalog,
        series: SeriesTable,
        scorer: S,
    ) -> Result<Self> {
        // The greedy stem puts the split on the last '[' in the name.
        let filename_pattern = Regex::new(
            r"^(?P<stem>.*)\[(?P<year>\d{4})\]\s*(?:\.(?P<extension>[^.\s]+))?$",
        )?;

        Ok(Self {
            config,
            catalog,
            series,
            scorer,
            filename_pattern,
        })
    }

    pub fn config(&self) -> &RenameConfig {
        &self.config
    }

    pub fn scan_directory(&self) -> Result<Vec<String>> {
        list_files(&self.config.directory)
    }

    /// Split a filename into index, title, year and extension.
    ///
    /// Returns `None` when the name has no bracketed four-digit year tag,
    /// which is the only reason a name is rejected.
    pub fn parse_candidate(&self, filename: &str) -> Option<FileCandidate> {
        let captures = self.filename_pattern.captures(filename)?;

        let stem = captures.name("stem").map_or("", |m| m.as_str());
        let mut words = stem.split_whitespace();
        let leading_index = words.next().map(str::to_string);
        let extracted_title = words.collect::<Vec<_>>().join(" ");

        Some(FileCandidate {
            raw_filename: filename.to_string(),
            leading_index,
            extracted_title,
            extracted_year: captures["year"].to_string(),
            extension: captures.name("extension").map(|m| m.as_str().to_string()),
        })
    }

    /// Work out the outcome for one file without touching the disk.
    ///
    /// `None` means the file was skipped by policy and gets no report row.
    pub fn plan_file(&self, filename: &str) -> Option<RenameOutcome> {
        let Some(candidate) = self.parse_candidate(filename) else {
            info!("No bracketed year tag, skipping: {}", filename);
            return None;
        };

        let Some(series_title) = self.series.classify_str(&candidate.extracted_year) else {
            info!(
                "Year {} does not match any known series, skipping: {}",
                candidate.extracted_year, filename
            );
            return None;
        };

        let normalized = normalize_title(&candidate.extracted_title);
        let result = find_best_match(
            &normalized,
            &candidate.extracted_year,
            &self.catalog,
            &self.scorer,
        );

        let outcome = match result {
            MatchResult::Matched(episode) => {
                let new_name = format!(
                    "{}.{}.{}.{}.{}",
                    series_title,
                    episode.code,
                    sanitize_filename(&episode.original_title),
                    episode.year,
                    TARGET_EXTENSION
                );
                RenameOutcome {
                    original_name: filename.to_string(),
                    new_name,
                    status: RenameStatus::DryRun,
                }
            }
            MatchResult::NoMatch => {
                info!("No catalog match for '{}': {}", normalized, filename);
                RenameOutcome {
                    original_name: filename.to_string(),
                    new_name: NO_MATCH_MESSAGE.to_string(),
                    status: RenameStatus::NoMatchSkipped,
                }
            }
        };

        Some(outcome)
    }

    /// Plan one file and, in execute mode, rename it.
    pub fn process_file(&self, filename: &str) -> Option<RenameOutcome> {
        let mut outcome = self.plan_file(filename)?;

        if outcome.status == RenameStatus::DryRun && self.config.mode == RenameMode::Execute {
            outcome.status = match self.rename_file(&outcome.original_name, &outcome.new_name) {
                Ok(()) => {
                    info!("Renamed '{}' -> '{}'", outcome.original_name, outcome.new_name);
                    RenameStatus::Renamed
                }
                Err(e) => {
                    warn!(
                        "Error renaming {} to {}: {}",
                        outcome.original_name, outcome.new_name, e
                    );
                    RenameStatus::Error(e.to_string())
                }
            };
        } else if outcome.status == RenameStatus::DryRun {
            debug!("Dry run: '{}' -> '{}'", outcome.original_name, outcome.new_name);
        }

        Some(outcome)
    }

    fn rename_file(&self, original_name: &str, new_name: &str) -> io::Result<()> {
        rename_in_dir(&self.config.directory, original_name, new_name)
    }

    /// Run the whole directory. Per-file failures end up in the outcomes;
    /// only a failed directory listing is returned as an error.
    pub fn rename_files(&self) -> Result<Vec<RenameOutcome>> {
        let files = self.scan_directory()?;
        info!(
            "Processing {} file(s) in {} against {} catalog episodes",
            files.len(),
            self.config.directory.display(),
            self.catalog.len()
        );

        Ok(files
            .iter()
            .filter_map(|filename| self.process_file(filename))
            .collect())
    }
}

/// Regular files in `directory`, sorted by name.
pub fn list_files(directory: &Path) -> Result<Vec<String>> {
    if !directory.is_dir() {
        return Err(anyhow::anyhow!("Directory does not exist: {:?}", directory));
    }

    let mut files: Vec<String> = fs::read_dir(directory)
        .with_context(|| format!("Failed to list {}", directory.display()))?
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().map(|ft| ft.is_file()).unwrap_or(false))
        .map(|entry| entry.file_name().to_string_lossy().to_string())
        .collect();
    files.sort();

    Ok(files)
}

/// Rename within `directory`, refusing to replace an existing file.
pub fn rename_in_dir(directory: &Path, original_name: &str, new_name: &str) -> io::Result<()> {
    if original_name == new_name {
        return Ok(());
    }

    let new_path = directory.join(new_name);
    if new_path.exists() {
        return Err(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("target already exists: {}", new_path.display()),
        ));
    }

    fs::rename(directory.join(original_name), new_path)
}

/// Strip characters Windows does not allow in filenames. Nothing is put in
/// their place.
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .filter(|c| !matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*'))
        .collect()
}

pub struct ConfigBuilder {
    directory: Option<PathBuf>,
    mode: RenameMode,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            directory: None,
            mode: RenameMode::DryRun,
        }
    }

    pub fn directory<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.directory = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn mode(mut self, mode: RenameMode) -> Self {
        self.mode = mode;
        self
    }

    /// Shorthand for picking [`RenameMode::Execute`] from a `--run` flag.
    pub fn execute(self, execute: bool) -> Self {
        self.mode(if execute {
            RenameMode::Execute
        } else {
            RenameMode::DryRun
        })
    }

    pub fn build(self) -> Result<RenameConfig> {
        let directory = self
            .directory
            .ok_or_else(|| anyhow::anyhow!("Directory is required"))?;

        Ok(RenameConfig {
            directory,
            mode: self.mode,
        })
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//! Turns a listing copied from an episode guide page into the three lines per
//! episode format that [`Catalog`](crate::catalog::Catalog) reads.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use tracing::info;

// Column header row of the scraped table.
static HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*Name\s+First Aired\s+Runtime\s+Image\s*\n").unwrap()
});

// Code, title, air date, then an optional network/rating pair or finale marker.
static EPISODE_GROUP: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(S\d+E\d+)\s+([^\t\n]+)\s*\n([^\n]+)\n([A-Z]+\n\s*\d+\s*|season finale\n*)?")
        .unwrap()
});

static SEASON_FINALE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)\s*season finale\s*\n").unwrap());

static TRAILING_NETWORK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)[A-Z]+\n\s*\d+\s*$").unwrap());

pub fn clean_listing(text: &str) -> String {
    let text = HEADER.replace_all(text, "");
    let text = EPISODE_GROUP.replace_all(&text, "${1}\n${2}\n${3}\n");
    let text = SEASON_FINALE.replace_all(&text, "\n");
    TRAILING_NETWORK.replace_all(&text, "").into_owned()
}

/// Clean `input` into `output`. The input is emptied afterwards unless
/// `keep_input` is set, so the next paste starts from a blank file.
pub fn clean_file(input: &Path, output: &Path, keep_input: bool) -> Result<()> {
    let text = fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let cleaned = clean_listing(&text);

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(output, &cleaned)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    if !keep_input {
        fs::write(input, "").with_context(|| format!("Failed to clear {}", input.display()))?;
    }

    info!(
        "Cleaned text has been written to {}{}",
        output.display(),
        if keep_input {
            String::new()
        } else {
            format!(" and {} has been cleared", input.display())
        }
    );

    Ok(())
}

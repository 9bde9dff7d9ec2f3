use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "episode-rename",
    version,
    about = "Match loosely named episode files against a catalog and rename them"
)]
pub struct Cli {
    /// Log at debug level (RUST_LOG overrides this)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Match every file in a directory and rename it (dry run by default)
    Rename {
        /// Path to the episodes folder
        directory: PathBuf,
        /// Actually rename the files. Without this only a dry run is done
        #[arg(long)]
        run: bool,
        /// Episode listing: code, title and air date on consecutive lines
        #[arg(long, default_value = "episodes.csv")]
        catalog: PathBuf,
        /// Directory for results.csv, errors.csv and outlier.csv
        #[arg(long, default_value = "output")]
        output_dir: PathBuf,
        /// JSON file replacing the built-in year to series table
        #[arg(long)]
        series_table: Option<PathBuf>,
    },

    /// Re-check an existing results.csv and write outlier.csv
    Verify {
        #[arg(long, default_value = "output")]
        output_dir: PathBuf,
        #[arg(long)]
        series_table: Option<PathBuf>,
    },

    /// Turn a scraped episode guide into the catalog format
    Clean {
        #[arg(long, default_value = "cleaning/to_clean.csv")]
        input: PathBuf,
        #[arg(long, default_value = "cleaning/cleaned.csv")]
        output: PathBuf,
        /// Do not empty the input file afterwards
        #[arg(long)]
        keep_input: bool,
    },

    /// Fix the series prefix of already renamed files from their year
    #[command(alias = "fix")]
    FixPrefix {
        directory: PathBuf,
        #[arg(long)]
        run: bool,
        #[arg(long)]
        series_table: Option<PathBuf>,
    },
}

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::catalog::Catalog;
use crate::cleaning;
use crate::cli::{Cli, Command};
use crate::prefix_fixer;
use crate::rename_engine::{ConfigBuilder, RenameEngine, RenameMode, RenameOutcome, RenameStatus};
use crate::report::{self, ReportPaths};
use crate::series::SeriesTable;
use crate::verify;

pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Rename {
            directory,
            run,
            catalog,
            output_dir,
            series_table,
        } => {
            let series = load_series(series_table.as_deref())?;
            let paths = ReportPaths::in_dir(&output_dir);
            paths.clear().context("Failed to remove previous reports")?;

            let catalog = Catalog::load(&catalog).context("Failed to load episode catalog")?;
            if catalog.is_empty() {
                warn!("Episode catalog is empty, nothing can match");
            } else {
                info!("Loaded {} episodes", catalog.len());
            }

            let config = ConfigBuilder::new()
                .directory(&directory)
                .execute(run)
                .build()?;
            let engine = RenameEngine::new(config, catalog, series.clone())?;
            let outcomes = engine.rename_files()?;

            report::write_rename_reports(&paths, &outcomes)
                .context("Failed to write rename reports")?;
            print_summary(&outcomes, engine.config().mode);

            verify::verify_results(&paths, &series).context("Failed to verify results")?;
            Ok(())
        }
        Command::Verify {
            output_dir,
            series_table,
        } => {
            let series = load_series(series_table.as_deref())?;
            let paths = ReportPaths::in_dir(&output_dir);
            let verification =
                verify::verify_results(&paths, &series).context("Failed to verify results")?;

            if verification.is_clean() {
                println!("✓ No mismatches found.");
            } else {
                println!(
                    "⚠ {} unmatched, {} to review. See {}",
                    verification.unmatched.len(),
                    verification.needs_review.len(),
                    paths.outliers.display()
                );
            }
            Ok(())
        }
        Command::Clean {
            input,
            output,
            keep_input,
        } => cleaning::clean_file(&input, &output, keep_input),
        Command::FixPrefix {
            directory,
            run,
            series_table,
        } => {
            let series = load_series(series_table.as_deref())?;
            let mode = if run {
                RenameMode::Execute
            } else {
                RenameMode::DryRun
            };
            let outcomes = prefix_fixer::fix_prefixes(&directory, &series, mode)?;
            print_summary(&outcomes, mode);
            Ok(())
        }
    }
}

fn load_series(path: Option<&Path>) -> Result<SeriesTable> {
    match path {
        Some(path) => SeriesTable::load(path)
            .with_context(|| format!("Failed to load series table {}", path.display())),
        None => Ok(SeriesTable::default()),
    }
}

fn print_summary(outcomes: &[RenameOutcome], mode: RenameMode) {
    let count = |wanted: fn(&RenameStatus) -> bool| {
        outcomes.iter().filter(|o| wanted(&o.status)).count()
    };
    let renamed = count(|s| matches!(s, RenameStatus::Renamed));
    let planned = count(|s| matches!(s, RenameStatus::DryRun));
    let unmatched = count(|s| matches!(s, RenameStatus::NoMatchSkipped));
    let failed = count(|s| matches!(s, RenameStatus::Error(_)));

    println!("===================");
    match mode {
        RenameMode::DryRun => println!(
            "Summary: {} rename(s) planned, {} unmatched (dry run, nothing was touched)",
            planned, unmatched
        ),
        RenameMode::Execute => println!(
            "Summary: {} renamed, {} failed, {} unmatched",
            renamed, failed, unmatched
        ),
    }

    if failed > 0 {
        println!("✗ {} file(s) could not be renamed.", failed);
    } else if unmatched > 0 {
        println!("⚠ Some files had no catalog match.");
    } else if renamed + planned > 0 {
        println!("✓ All files matched.");
    } else {
        println!("ℹ No files to rename.");
    }
}

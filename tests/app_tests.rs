// Command-level tests: parse a command line and run it against temp dirs

use std::fs;
use std::path::Path;

use clap::Parser;
use episode_rename::app;
use episode_rename::cli::Cli;
use episode_rename::report::{self, OutlierRow, ReportPaths, ResultRow};
use tempfile::TempDir;

const CATALOG: &str = "S01E01\nPuss Gets the Boot\nFebruary 10, 1940\n\
S01E05\nPuss n Toots\nMay 30, 1942\n";

fn run(args: &[&str]) -> anyhow::Result<()> {
    let cli = Cli::try_parse_from(args).unwrap();
    app::run(cli)
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_rename_command_end_to_end() {
    let work = TempDir::new().unwrap();
    let catalog = work.path().join("episodes.csv");
    fs::write(&catalog, CATALOG).unwrap();
    let media = work.path().join("media");
    fs::create_dir(&media).unwrap();
    fs::write(media.join("03 Puss n Toots[1942].avi"), b"").unwrap();
    fs::write(media.join("04 Heavenly Puss[1949].avi"), b"").unwrap();

    let output = work.path().join("output");
    let paths = ReportPaths::in_dir(&output);
    fs::create_dir(&output).unwrap();
    fs::write(&paths.errors, "stale").unwrap();

    run(&[
        "episode-rename",
        "rename",
        path_arg(&media),
        "--run",
        "--catalog",
        path_arg(&catalog),
        "--output-dir",
        path_arg(&output),
    ])
    .unwrap();

    assert!(media.join("Tom and Jerry.S01E05.Puss n Toots.1942.avi").exists());
    assert!(media.join("04 Heavenly Puss[1949].avi").exists());
    assert!(!paths.errors.exists());

    let results = report::read_results(&paths.results).unwrap();
    assert_eq!(
        results,
        vec![
            ResultRow {
                original_name: "03 Puss n Toots[1942].avi".to_string(),
                new_name: "Tom and Jerry.S01E05.Puss n Toots.1942.avi".to_string(),
            },
            ResultRow {
                original_name: "04 Heavenly Puss[1949].avi".to_string(),
                new_name: "No match found. Skipping.".to_string(),
            },
        ]
    );

    // The automatic verification pass runs after the reports are written.
    let outliers: Vec<OutlierRow> = report::read_table(&paths.outliers).unwrap();
    assert_eq!(outliers[0].original_name, "04 Heavenly Puss");
}

#[test]
fn test_rename_command_dry_run_leaves_files() {
    let work = TempDir::new().unwrap();
    let catalog = work.path().join("episodes.csv");
    fs::write(&catalog, CATALOG).unwrap();
    let media = work.path().join("media");
    fs::create_dir(&media).unwrap();
    fs::write(media.join("01 Puss Gets the Boot[1940].avi"), b"").unwrap();
    let output = work.path().join("output");

    run(&[
        "episode-rename",
        "rename",
        path_arg(&media),
        "--catalog",
        path_arg(&catalog),
        "--output-dir",
        path_arg(&output),
    ])
    .unwrap();

    assert!(media.join("01 Puss Gets the Boot[1940].avi").exists());
    let results = report::read_results(&ReportPaths::in_dir(&output).results).unwrap();
    assert_eq!(results[0].new_name, "Tom and Jerry.S01E01.Puss Gets the Boot.1940.avi");
}

#[test]
fn test_rename_command_missing_catalog_fails() {
    let work = TempDir::new().unwrap();
    let media = work.path().join("media");
    fs::create_dir(&media).unwrap();
    let missing = work.path().join("missing.csv");

    let result = run(&[
        "episode-rename",
        "rename",
        path_arg(&media),
        "--catalog",
        path_arg(&missing),
        "--output-dir",
        path_arg(work.path()),
    ]);
    assert!(result.is_err());
}

#[test]
fn test_verify_command_clean_pass() {
    let work = TempDir::new().unwrap();
    let paths = ReportPaths::in_dir(work.path());
    let rows = vec![ResultRow {
        original_name: "Puss n Toots[1942].avi".to_string(),
        new_name: "Tom and Jerry.S01E05.Puss n Toots.1942.avi".to_string(),
    }];
    report::write_table(&paths.results, &report::RESULTS_HEADER, &rows).unwrap();
    fs::write(&paths.outliers, "stale").unwrap();

    run(&["episode-rename", "verify", "--output-dir", path_arg(work.path())]).unwrap();
    assert!(!paths.outliers.exists());
}

#[test]
fn test_fix_alias_dry_run() {
    let dir = TempDir::new().unwrap();
    let wrong = "Tom and Jerry.S05E01.Photo Finish.1975.avi";
    fs::write(dir.path().join(wrong), b"").unwrap();

    run(&["episode-rename", "fix", path_arg(dir.path())]).unwrap();
    assert!(dir.path().join(wrong).exists());
}

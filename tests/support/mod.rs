//! Shared fixtures for the integration tests.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use hetplan::api::{PlannerConfig, Trimester, TrimesterBudget};

/// Quiet, once-only logger so test output stays readable.
pub fn init_test_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A self-contained run directory: targets file, capacity table, and a
/// configuration pointing at them (trimester 2020-1, losses off for
/// deterministic round numbers).
pub struct Fixture {
    pub dir: TempDir,
    pub config: PlannerConfig,
}

pub fn fixture(targets: &str, capacity: &str) -> Fixture {
    let dir = TempDir::new().expect("create fixture dir");

    let capacity_dir = dir.path().join("capacity");
    fs::create_dir_all(&capacity_dir).unwrap();
    fs::write(capacity_dir.join("allvisits_by_lst_2020-1.dat"), capacity).unwrap();

    let targets_path = dir.path().join("targets.dat");
    fs::write(&targets_path, targets).unwrap();

    let mut config = PlannerConfig::new(2020, Trimester::First);
    config.target_input = targets_path;
    config.data_dir = dir.path().to_path_buf();
    config.output_stem = dir.path().join("out/run").to_string_lossy().into_owned();
    config.include_losses = false;
    config.site.trimesters.push(TrimesterBudget {
        year: 2020,
        index: 1,
        dark_hours: 120.0,
        gray_hours: 80.0,
    });

    Fixture { dir, config }
}

/// A flat capacity table covering the whole trimester-1 frame.
pub fn flat_capacity_table() -> String {
    let mut out = String::from("lst all dark gray hetdex\n");
    for i in 0..=96 {
        let lst = 20.0 + i as f64 * 0.25;
        out.push_str(&format!("{lst:.2} 50.0 20.0 10.0 5.0\n"));
    }
    out
}

/// Path under the repository's data directory.
pub fn repo_data_path(file_name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("data")
        .join(file_name)
}

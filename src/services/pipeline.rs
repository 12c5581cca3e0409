//! The calculation pipeline: loader → visit calculator → queue aggregator.
//!
//! One call computes everything a run needs; writing the output files is the
//! caller's job (see [`crate::io::output`] and [`super::report`]), so library
//! users can consume the tables directly.

use anyhow::{Context, Result};
use log::{info, warn};

use crate::config::PlannerConfig;
use crate::io::{read_capacity_table, read_target_table};
use crate::models::{CapacityTable, RowError, TargetResult};
use crate::services::queue::{accumulate_demand, apply_hetdex_subtraction, summarize, RunSummary};
use crate::services::tracking::TrackGeometry;
use crate::services::visits::evaluate_targets;

/// Everything a run produces.
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// The enriched target table, one row per valid target.
    pub results: Vec<TargetResult>,
    /// The capacity table with per-bin demand filled in.
    pub capacity: CapacityTable,
    pub summary: RunSummary,
    /// Rows excluded from the run, already logged.
    pub row_errors: Vec<RowError>,
}

/// Run the whole calculation for one configuration.
///
/// Configuration problems (missing trimester budget or capacity table) abort
/// before any target is processed; per-row target problems are collected in
/// [`PipelineOutput::row_errors`] instead.
pub fn run_pipeline(config: &PlannerConfig) -> Result<PipelineOutput> {
    let budget = config.budget()?;

    let capacity_path = config.capacity_table_path();
    let mut capacity = read_capacity_table(&capacity_path).with_context(|| {
        format!(
            "loading the capacity table for trimester {}-{}",
            config.year, config.trimester
        )
    })?;

    let loaded = read_target_table(&config.target_input)
        .with_context(|| format!("loading targets from {}", config.target_input.display()))?;

    let geometry = TrackGeometry::from_site(&config.site);
    let (results, geometry_errors) = evaluate_targets(
        &loaded.targets,
        &geometry,
        config.trimester,
        config.setup_time,
    );

    let mut row_errors = loaded.errors;
    row_errors.extend(geometry_errors);
    for error in &row_errors {
        warn!("excluded target {error}");
    }

    if config.include_hetdex {
        apply_hetdex_subtraction(&mut capacity);
    }
    accumulate_demand(&mut capacity, &results);

    let summary = summarize(config, &budget, &results, row_errors.len());
    info!(
        "{} targets demand {} visits against a capacity of {:.0} ({}-{})",
        summary.n_targets,
        summary.demanded_visits,
        summary.total_visit_capacity,
        config.year,
        config.trimester
    );

    Ok(PipelineOutput {
        results,
        capacity,
        summary,
        row_errors,
    })
}

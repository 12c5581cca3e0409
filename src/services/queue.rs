//! Queue capacity aggregation.
//!
//! Turns the per-LST capacity table and the enriched targets into the
//! numbers a proposer actually compares: demanded visits per LST bin,
//! aggregate visit capacity from the trimester's grey/dark hour budgets,
//! and a feasibility verdict.

use serde::{Deserialize, Serialize};

use crate::config::{PlannerConfig, TrimesterBudget};
use crate::models::{CapacityTable, TargetResult, Trimester};

/// Monthly fraction of queue time lost to weather, January through December.
/// Program-review time is charged after weathered-out nights.
const FRACTIONS_WEATHER_LOST: [f64; 12] = [
    0.359, 0.337, 0.379, 0.335, 0.335, 0.339, 0.499, 0.428, 0.476, 0.314, 0.246, 0.346,
];
const FRACTION_PR_LOST: f64 = 0.056;

/// Mean fraction of queue time that survives weather and program-review
/// losses over the trimester's months.
pub fn good_time_fraction(trimester: Trimester) -> f64 {
    let mean_weather: f64 = trimester
        .months()
        .iter()
        .map(|&m| FRACTIONS_WEATHER_LOST[(m - 1) as usize])
        .sum::<f64>()
        / 4.0;
    (1.0 - mean_weather) * (1.0 - FRACTION_PR_LOST)
}

/// Subtract HETDEX survey allocations from the available queue time.
///
/// Each bin loses `min(hetdex, dark)` visits from both the `all` and `dark`
/// columns; bins where the two are exactly equal lose nothing (operational
/// rule, preserved as-is).
pub fn apply_hetdex_subtraction(table: &mut CapacityTable) {
    for row in &mut table.rows {
        let to_lose = if row.hetdex < row.dark {
            row.hetdex
        } else if row.hetdex > row.dark {
            row.dark
        } else {
            0.0
        };
        row.all -= to_lose;
        row.dark -= to_lose;
    }
}

/// Fill the per-bin demand columns from the targets' LST windows.
///
/// Dual-track targets count toward `east_tracks`/`west_tracks` for bins
/// inside the respective window; single-track targets toward
/// `single_tracks`. Each hit adds that track's full needed-visit count,
/// i.e. a bin shows how many visits *could* land on it.
pub fn accumulate_demand(table: &mut CapacityTable, results: &[TargetResult]) {
    for row in &mut table.rows {
        for result in results {
            match (&result.track1, &result.track2) {
                (Some(east), Some(west)) => {
                    if east.contains(row.lst) {
                        row.east_tracks += east.visits as f64;
                    }
                    if west.contains(row.lst) {
                        row.west_tracks += west.visits as f64;
                    }
                }
                (Some(window), None) | (None, Some(window)) => {
                    if window.contains(row.lst) {
                        row.single_tracks += window.visits as f64;
                    }
                }
                (None, None) => {}
            }
        }
    }
}

/// Aggregate demand vs. capacity for one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub site: String,
    pub year: i32,
    pub trimester: Trimester,
    /// First night of the trimester.
    pub period_start: Option<chrono::NaiveDate>,
    /// Last night of the trimester.
    pub period_stop: Option<chrono::NaiveDate>,
    /// Targets that survived validation.
    pub n_targets: usize,
    /// Rows excluded by validation or geometry.
    pub n_excluded: usize,
    /// Targets whose every track needs more visits than requested.
    pub n_insufficient_coverage: usize,
    /// Total visits the targets demand from the queue.
    pub demanded_visits: u32,
    pub nominal_visit_hours: f64,
    /// Visit capacity from the dark-time budget.
    pub dark_visit_capacity: f64,
    /// Visit capacity from the grey-time budget.
    pub gray_visit_capacity: f64,
    pub total_visit_capacity: f64,
    /// Derating applied for weather/program-review losses (1.0 when losses
    /// are not included).
    pub good_time_fraction: f64,
    pub feasible: bool,
}

/// Build the run summary from the trimester budget and the target results.
pub fn summarize(
    config: &PlannerConfig,
    budget: &TrimesterBudget,
    results: &[TargetResult],
    n_excluded: usize,
) -> RunSummary {
    let fraction = if config.include_losses {
        good_time_fraction(config.trimester)
    } else {
        1.0
    };

    let per_visit = config.site.nominal_visit_hours;
    let dark_visit_capacity = budget.dark_hours / per_visit * fraction;
    let gray_visit_capacity = budget.gray_hours / per_visit * fraction;
    let total_visit_capacity = dark_visit_capacity + gray_visit_capacity;

    let demanded_visits: u32 = results.iter().map(TargetResult::demanded_visits).sum();
    let n_insufficient_coverage = results
        .iter()
        .filter(|r| r.insufficient_coverage)
        .count();

    let period = config.trimester.period(config.year);

    RunSummary {
        site: config.site.name.clone(),
        year: config.year,
        trimester: config.trimester,
        period_start: period.map(|(start, _)| start),
        period_stop: period.map(|(_, stop)| stop),
        n_targets: results.len(),
        n_excluded,
        n_insufficient_coverage,
        demanded_visits,
        nominal_visit_hours: per_visit,
        dark_visit_capacity,
        gray_visit_capacity,
        total_visit_capacity,
        good_time_fraction: fraction,
        feasible: (demanded_visits as f64) <= total_visit_capacity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::models::{CapacityRow, LstWindow, Target};

    fn table_with(rows: Vec<CapacityRow>) -> CapacityTable {
        CapacityTable { rows }
    }

    fn result(track1: Option<LstWindow>, track2: Option<LstWindow>) -> TargetResult {
        TargetResult {
            target: Target::new("t", 10.0, 30.0, 600.0, 1),
            track1,
            track2,
            insufficient_coverage: false,
        }
    }

    fn window(start: f64, stop: f64, visits: u32) -> LstWindow {
        LstWindow {
            start: start.into(),
            stop: stop.into(),
            visits,
        }
    }

    #[test]
    fn test_hetdex_subtraction_takes_minimum() {
        let mut table = table_with(vec![
            CapacityRow::new(20.0, 50.0, 10.0, 5.0, 4.0), // hetdex < dark
            CapacityRow::new(20.25, 50.0, 3.0, 5.0, 4.0), // hetdex > dark
            CapacityRow::new(20.5, 50.0, 4.0, 5.0, 4.0),  // equal: untouched
        ]);
        apply_hetdex_subtraction(&mut table);
        assert_eq!(table.rows[0].dark, 6.0);
        assert_eq!(table.rows[0].all, 46.0);
        assert_eq!(table.rows[1].dark, 0.0);
        assert_eq!(table.rows[1].all, 47.0);
        assert_eq!(table.rows[2].dark, 4.0);
        assert_eq!(table.rows[2].all, 50.0);
    }

    #[test]
    fn test_demand_classifies_tracks() {
        let mut table = table_with(vec![
            CapacityRow::new(10.0, 0.0, 0.0, 0.0, 0.0),
            CapacityRow::new(14.0, 0.0, 0.0, 0.0, 0.0),
        ]);
        let dual = result(Some(window(9.0, 11.0, 2)), Some(window(13.0, 15.0, 2)));
        let single = result(Some(window(9.5, 10.5, 3)), None);
        accumulate_demand(&mut table, &[dual, single]);

        assert_eq!(table.rows[0].east_tracks, 2.0);
        assert_eq!(table.rows[0].west_tracks, 0.0);
        assert_eq!(table.rows[0].single_tracks, 3.0);
        assert_eq!(table.rows[1].west_tracks, 2.0);
        assert_eq!(table.rows[1].single_tracks, 0.0);
    }

    #[test]
    fn test_demand_bounds_are_exclusive() {
        let mut table = table_with(vec![CapacityRow::new(10.0, 0.0, 0.0, 0.0, 0.0)]);
        let edge = result(Some(window(10.0, 11.0, 1)), None);
        accumulate_demand(&mut table, &[edge]);
        assert_eq!(table.rows[0].single_tracks, 0.0);
    }

    fn test_config() -> (PlannerConfig, TrimesterBudget) {
        let mut config = PlannerConfig::new(2020, Trimester::First);
        config.site = SiteConfig::default();
        config.include_losses = false;
        let budget = TrimesterBudget {
            year: 2020,
            index: 1,
            dark_hours: 120.0,
            gray_hours: 60.0,
        };
        (config, budget)
    }

    #[test]
    fn test_capacity_formula() {
        let (config, budget) = test_config();
        let summary = summarize(&config, &budget, &[], 0);
        // nominal_visit_hours defaults to 1.0
        assert_eq!(summary.dark_visit_capacity, 120.0);
        assert_eq!(summary.gray_visit_capacity, 60.0);
        assert_eq!(summary.total_visit_capacity, 180.0);
        assert_eq!(summary.good_time_fraction, 1.0);
        assert!(summary.feasible);
    }

    #[test]
    fn test_losses_derate_capacity() {
        let (mut config, budget) = test_config();
        config.include_losses = true;
        let summary = summarize(&config, &budget, &[], 0);
        let fraction = good_time_fraction(Trimester::First);
        assert!(fraction > 0.5 && fraction < 0.75);
        assert!((summary.total_visit_capacity - 180.0 * fraction).abs() < 1e-9);
    }

    #[test]
    fn test_summary_counts_demand_and_feasibility() {
        let (config, budget) = test_config();
        let results = vec![
            result(Some(window(9.0, 11.0, 150)), Some(window(13.0, 15.0, 120))),
            result(Some(window(9.0, 11.0, 100)), None),
        ];
        let summary = summarize(&config, &budget, &results, 3);
        // Dual-track target demands its cheaper track.
        assert_eq!(summary.demanded_visits, 220);
        assert_eq!(summary.n_targets, 2);
        assert_eq!(summary.n_excluded, 3);
        assert!(!summary.feasible);
    }

    #[test]
    fn test_good_time_fraction_is_per_trimester() {
        // Summer trimester has the worst monsoon weather.
        assert!(good_time_fraction(Trimester::Second) < good_time_fraction(Trimester::First));
    }
}

//! Run and site configuration.
//!
//! Two layers, both read-only for the run:
//!
//! - [`SiteConfig`]: telescope geometry and per-trimester queue budgets,
//!   loaded from a TOML file (`data/het_site.toml` by default). Field
//!   defaults match HET's published geometry, so a minimal file only needs
//!   the trimester budgets.
//! - [`PlannerConfig`]: everything a single run needs — the trimester, file
//!   locations, per-visit setup overhead, and feature toggles — assembled
//!   from CLI flags plus the site file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PlannerError, PlannerResult};
use crate::models::Trimester;

/// Telescope site geometry and queue-time budgets from the site TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_site_name")]
    pub name: String,
    /// Site latitude in decimal degrees.
    #[serde(default = "default_latitude_deg")]
    pub latitude_deg: f64,
    /// Site longitude in decimal degrees (east positive). Descriptive only;
    /// the computation works entirely in the LST frame.
    #[serde(default = "default_longitude_deg")]
    pub longitude_deg: f64,
    /// Site elevation in meters above sea level.
    #[serde(default = "default_elevation_m")]
    pub elevation_m: f64,
    /// Fixed telescope altitude in degrees.
    #[serde(default = "default_fixed_altitude_deg")]
    pub fixed_altitude_deg: f64,
    /// Angular reach of the tracker around the fixed pointing, in degrees.
    #[serde(default = "default_tracker_reach_deg")]
    pub tracker_reach_deg: f64,
    /// Hour angles beyond this many hours from transit are unobservable.
    #[serde(default = "default_max_hour_angle_h")]
    pub max_hour_angle_h: f64,
    /// Nominal duration of one queue visit in hours, used to turn grey/dark
    /// hour budgets into visit capacities.
    #[serde(default = "default_nominal_visit_hours")]
    pub nominal_visit_hours: f64,
    /// Per-trimester queue-time budgets.
    #[serde(default, rename = "trimester")]
    pub trimesters: Vec<TrimesterBudget>,
}

/// Available queue hours for one (year, trimester) pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrimesterBudget {
    pub year: i32,
    pub index: u8,
    /// Available dark-time hours (moon below the configured illumination cut).
    pub dark_hours: f64,
    /// Available grey-time hours.
    pub gray_hours: f64,
}

fn default_site_name() -> String {
    "HET".to_string()
}

fn default_latitude_deg() -> f64 {
    30.6814
}

fn default_longitude_deg() -> f64 {
    -104.0147
}

fn default_elevation_m() -> f64 {
    2026.0
}

fn default_fixed_altitude_deg() -> f64 {
    55.0
}

fn default_tracker_reach_deg() -> f64 {
    8.0
}

fn default_max_hour_angle_h() -> f64 {
    5.0
}

fn default_nominal_visit_hours() -> f64 {
    1.0
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            name: default_site_name(),
            latitude_deg: default_latitude_deg(),
            longitude_deg: default_longitude_deg(),
            elevation_m: default_elevation_m(),
            fixed_altitude_deg: default_fixed_altitude_deg(),
            tracker_reach_deg: default_tracker_reach_deg(),
            max_hour_angle_h: default_max_hour_angle_h(),
            nominal_visit_hours: default_nominal_visit_hours(),
            trimesters: Vec::new(),
        }
    }
}

impl SiteConfig {
    /// Load the site configuration from a TOML file.
    ///
    /// # Returns
    /// * `Ok(SiteConfig)` if the file reads and parses
    /// * `Err(PlannerError)` with the failing path otherwise
    pub fn from_file<P: AsRef<Path>>(path: P) -> PlannerResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| PlannerError::io(path, e))?;
        let config: SiteConfig = toml::from_str(&content).map_err(|e| {
            PlannerError::Configuration(format!(
                "failed to parse site config {}: {e}",
                path.display()
            ))
        })?;
        config.check()?;
        Ok(config)
    }

    fn check(&self) -> PlannerResult<()> {
        if !(-90.0..=90.0).contains(&self.latitude_deg) {
            return Err(PlannerError::Configuration(format!(
                "site latitude {} deg outside [-90, 90]",
                self.latitude_deg
            )));
        }
        if !(0.0..90.0).contains(&self.fixed_altitude_deg) {
            return Err(PlannerError::Configuration(format!(
                "fixed telescope altitude {} deg outside (0, 90)",
                self.fixed_altitude_deg
            )));
        }
        if self.tracker_reach_deg <= 0.0 {
            return Err(PlannerError::Configuration(format!(
                "tracker reach {} deg must be positive",
                self.tracker_reach_deg
            )));
        }
        if self.nominal_visit_hours <= 0.0 {
            return Err(PlannerError::Configuration(format!(
                "nominal visit duration {} h must be positive",
                self.nominal_visit_hours
            )));
        }
        Ok(())
    }

    /// Queue budget for the given year and trimester, if configured.
    pub fn budget_for(&self, year: i32, trimester: Trimester) -> Option<&TrimesterBudget> {
        self.trimesters
            .iter()
            .find(|b| b.year == year && b.index == trimester.index())
    }
}

/// All settings for one planner run.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// The year of the observation.
    pub year: i32,
    /// The trimester within that year.
    pub trimester: Trimester,
    /// Subtract HETDEX survey allocations from the available queue time.
    pub include_hetdex: bool,
    /// Derate aggregate capacity by weather and program-review losses.
    pub include_losses: bool,
    /// Estimated per-visit setup overhead.
    pub setup_time: qtty::Seconds,
    /// Location of the target input table.
    pub target_input: PathBuf,
    /// Stem (path prefix) for all output files.
    pub output_stem: String,
    /// Directory holding the capacity tables (`capacity/*.dat`).
    pub data_dir: PathBuf,
    /// Replace existing output files instead of failing.
    pub overwrite: bool,
    /// Render the overview plot.
    pub render_plot: bool,
    pub site: SiteConfig,
}

impl PlannerConfig {
    /// Planner defaults mirroring the operational tool, with site geometry
    /// from [`SiteConfig::default`]. Used as the base the CLI layers onto.
    pub fn new(year: i32, trimester: Trimester) -> Self {
        Self {
            year,
            trimester,
            include_hetdex: true,
            include_losses: true,
            setup_time: qtty::Seconds::new(300.0),
            target_input: PathBuf::from("data/example_targets.dat"),
            output_stem: "output/lst_visits_pi".to_string(),
            data_dir: PathBuf::from("data"),
            overwrite: false,
            render_plot: true,
            site: SiteConfig::default(),
        }
    }

    /// Path of the capacity table for this run's year and trimester.
    pub fn capacity_table_path(&self) -> PathBuf {
        self.data_dir.join("capacity").join(format!(
            "allvisits_by_lst_{}-{}.dat",
            self.year, self.trimester
        ))
    }

    /// Path of the enriched output target table.
    pub fn targets_output_path(&self) -> PathBuf {
        PathBuf::from(format!("{}_targets.dat", self.output_stem))
    }

    /// Path of the JSON run summary.
    pub fn summary_output_path(&self) -> PathBuf {
        PathBuf::from(format!("{}_summary.json", self.output_stem))
    }

    /// Path of the overview plot.
    pub fn plot_output_path(&self) -> PathBuf {
        PathBuf::from(format!(
            "{}_{}-{}_overview.png",
            self.output_stem, self.year, self.trimester
        ))
    }

    /// The queue budget this run draws from.
    ///
    /// Missing budgets abort the run before any target is processed.
    pub fn budget(&self) -> PlannerResult<TrimesterBudget> {
        self.site
            .budget_for(self.year, self.trimester)
            .copied()
            .ok_or_else(|| {
                PlannerError::Configuration(format!(
                    "no queue budget configured for {}-{} in site '{}'",
                    self.year, self.trimester, self.site.name
                ))
            })
    }
}

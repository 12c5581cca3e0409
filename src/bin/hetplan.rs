//! Command-line entry point for the HET visit planner.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::LevelFilter;

use hetplan::api::{PlannerConfig, SiteConfig, Trimester};
use hetplan::io::{write_result_table, write_summary};
use hetplan::services::{render_overview_plot, run_pipeline};

/// HET PI targets: LST visit calculator.
#[derive(Parser, Debug)]
#[command(name = "hetplan", version, about = "HET PI targets: LST visit calculator")]
struct Args {
    /// Location of the targets file
    #[arg(long, default_value = "data/example_targets.dat")]
    targets: PathBuf,

    /// The year of the observation
    #[arg(long, default_value_t = 2020)]
    year: i32,

    /// Desired trimester number (1, 2, 3)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=3))]
    trimester: u8,

    /// Estimated per-visit setup time in seconds
    #[arg(long, default_value_t = 300)]
    setup_time: u32,

    /// Stem (path prefix) for the output files
    #[arg(long, default_value = "output/lst_visits_pi")]
    output_stem: String,

    /// Site configuration TOML file
    #[arg(long, default_value = "data/het_site.toml")]
    site_config: PathBuf,

    /// Directory holding the capacity tables
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Do not subtract HETDEX survey allocations from the queue time
    #[arg(long)]
    no_hetdex: bool,

    /// Do not derate capacity for weather/program-review losses
    #[arg(long)]
    no_losses: bool,

    /// Skip rendering the overview plot
    #[arg(long)]
    no_plot: bool,

    /// Automatically overwrite existing output files
    #[arg(short, long)]
    overwrite: bool,

    /// Print verbose output during the calculations
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn into_config(self) -> Result<PlannerConfig> {
        let trimester = Trimester::try_from(self.trimester)
            .map_err(|e| anyhow::anyhow!(e))?;
        let mut config = PlannerConfig::new(self.year, trimester);
        config.site = SiteConfig::from_file(&self.site_config)
            .with_context(|| format!("loading site config {}", self.site_config.display()))?;
        config.include_hetdex = !self.no_hetdex;
        config.include_losses = !self.no_losses;
        config.setup_time = qtty::Seconds::new(self.setup_time as f64);
        config.target_input = self.targets;
        config.output_stem = self.output_stem;
        config.data_dir = self.data_dir;
        config.overwrite = self.overwrite;
        config.render_plot = !self.no_plot;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(if args.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        })
        .parse_default_env()
        .init();

    let config = args.into_config()?;
    let output = run_pipeline(&config)?;

    write_result_table(config.targets_output_path(), &output.results, config.overwrite)?;
    write_summary(config.summary_output_path(), &output.summary, config.overwrite)?;
    if config.render_plot {
        render_overview_plot(
            &config.plot_output_path(),
            &output.capacity,
            &config,
            config.overwrite,
        )?;
    }

    let summary = &output.summary;
    println!(
        "{}-{}: {} targets ({} excluded), {} visits demanded, {:.0} available ({:.0} dark + {:.0} gray)",
        summary.year,
        summary.trimester,
        summary.n_targets,
        summary.n_excluded,
        summary.demanded_visits,
        summary.total_visit_capacity,
        summary.dark_visit_capacity,
        summary.gray_visit_capacity,
    );
    if !summary.feasible {
        println!(
            "WARNING: demand exceeds the available queue time by {:.0} visits",
            summary.demanded_visits as f64 - summary.total_visit_capacity
        );
    }
    if summary.n_insufficient_coverage > 0 {
        println!(
            "{} target(s) need more visits than requested on every available track",
            summary.n_insufficient_coverage
        );
    }

    Ok(())
}

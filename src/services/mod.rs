//! Service layer: the calculation pipeline and its stages.
//!
//! The stages mirror the tool's control flow — track geometry, per-target
//! visit placement, queue aggregation, reporting — and are usable on their
//! own, but most callers want [`pipeline::run_pipeline`].

pub mod pipeline;
pub mod queue;
pub mod report;
pub mod tracking;
pub mod visits;

pub use pipeline::{run_pipeline, PipelineOutput};
pub use queue::{accumulate_demand, apply_hetdex_subtraction, good_time_fraction, RunSummary};
pub use report::render_overview_plot;
pub use tracking::{HourAngleTrack, TrackGeometry, TrackSolution};
pub use visits::evaluate_targets;

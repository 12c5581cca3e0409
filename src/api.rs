//! Public API surface for the planner library.
//!
//! This file consolidates the types a library user needs: the configuration
//! object, the pipeline entry point, and the result tables it returns.

pub use crate::config::{PlannerConfig, SiteConfig, TrimesterBudget};
pub use crate::error::{PlannerError, PlannerResult};
pub use crate::models::{
    CapacityRow, CapacityTable, LocalSiderealTime, LstWindow, RowError, RowErrorReason, Target,
    TargetResult, Trimester,
};
pub use crate::services::{run_pipeline, PipelineOutput, RunSummary};

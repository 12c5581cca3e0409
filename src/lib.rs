//! # hetplan
//!
//! Visit-count and LST feasibility calculator for HET queue proposals.
//!
//! Given a table of observation targets (coordinates plus requested exposure
//! time), this crate computes how many telescope visits each target needs at
//! the Hobby-Eberly Telescope's fixed-altitude tracker geometry, which LST
//! windows those visits must land in for a given observing trimester, and
//! how the aggregate demand compares to the trimester's available grey/dark
//! queue time.
//!
//! ## Features
//!
//! - **Input loading**: whitespace ascii target tables with legacy column
//!   aliases and per-row error reporting
//! - **Track geometry**: east/west/single hour-angle windows from the
//!   fixed-altitude annulus
//! - **Visit calculation**: required visit counts and trimester-framed LST
//!   windows per target
//! - **Queue aggregation**: per-LST-bin demand and grey/dark visit capacity
//! - **Reporting**: enriched output table, JSON run summary, overview plot
//!
//! ## Architecture
//!
//! - [`api`]: consolidated public types
//! - [`config`]: run settings and the site TOML file
//! - [`models`]: targets, LST values, trimesters, capacity bins
//! - [`io`]: ascii table readers and writers
//! - [`services`]: the pipeline stages; [`services::pipeline::run_pipeline`]
//!   is the single entry point
//!
//! The binary (`hetplan`) is a thin CLI over the same pipeline.

pub mod api;
pub mod config;
pub mod error;
pub mod io;
pub mod models;
pub mod services;

//! Queue capacity per LST bin.

use serde::{Deserialize, Serialize};

/// One LST bin of the trimester capacity table.
///
/// The `all`/`dark`/`gray`/`hetdex` columns come from the observatory's
/// capacity file and count visits available at that LST; the `*_tracks`
/// columns are filled in by the queue aggregator with the visit demand that
/// lands in the bin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapacityRow {
    /// Bin center LST in hours, already in the trimester plotting frame.
    pub lst: f64,
    /// Visits available across all moon conditions.
    pub all: f64,
    /// Dark-time visits available.
    pub dark: f64,
    /// Grey-time visits available.
    pub gray: f64,
    /// Visits already allocated to the HETDEX survey.
    pub hetdex: f64,
    /// Demanded visits from dual-track targets on their east track.
    pub east_tracks: f64,
    /// Demanded visits from dual-track targets on their west track.
    pub west_tracks: f64,
    /// Demanded visits from single-track targets.
    pub single_tracks: f64,
}

impl CapacityRow {
    pub fn new(lst: f64, all: f64, dark: f64, gray: f64, hetdex: f64) -> Self {
        Self {
            lst,
            all,
            dark,
            gray,
            hetdex,
            east_tracks: 0.0,
            west_tracks: 0.0,
            single_tracks: 0.0,
        }
    }
}

/// The per-LST capacity table for one trimester, one row per LST bin.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CapacityTable {
    pub rows: Vec<CapacityRow>,
}

impl CapacityTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

//! Observation targets and their enriched per-run results.

use qtty::{Degrees, Seconds};
use serde::{Deserialize, Serialize};

use super::LocalSiderealTime;

/// Sentinel written to the output table for absent LST windows,
/// matching the operational convention.
pub const MISSING_LST: f64 = -99.0;

/// A single requested observation target, as loaded from the input table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    /// Unique target identifier.
    pub target_id: String,
    /// Right ascension in decimal degrees, `[0, 360)`.
    pub ra: Degrees,
    /// Declination in decimal degrees, `[-90, 90]`.
    pub dec: Degrees,
    /// Total requested exposure time in seconds.
    pub t_exp: Seconds,
    /// Number of visits the proposer wants the exposure split across.
    pub num_visits: u32,
}

impl Target {
    pub fn new(
        target_id: impl Into<String>,
        ra_deg: f64,
        dec_deg: f64,
        t_exp_s: f64,
        num_visits: u32,
    ) -> Self {
        Self {
            target_id: target_id.into(),
            ra: Degrees::new(ra_deg),
            dec: Degrees::new(dec_deg),
            t_exp: Seconds::new(t_exp_s),
            num_visits: num_visits.max(1),
        }
    }

    /// Check coordinate and exposure ranges.
    ///
    /// # Returns
    /// The first violated constraint, if any. Callers report the error for
    /// this row and continue with the rest of the run.
    pub fn validate(&self) -> Result<(), RowErrorReason> {
        let ra = self.ra.value();
        if !(0.0..360.0).contains(&ra) || !ra.is_finite() {
            return Err(RowErrorReason::RaOutOfRange(ra));
        }
        let dec = self.dec.value();
        if !(-90.0..=90.0).contains(&dec) || !dec.is_finite() {
            return Err(RowErrorReason::DecOutOfRange(dec));
        }
        let t_exp = self.t_exp.value();
        if !(t_exp > 0.0) || !t_exp.is_finite() {
            return Err(RowErrorReason::NonPositiveExposure(t_exp));
        }
        Ok(())
    }

    /// Right ascension expressed in hours.
    pub fn ra_hours(&self) -> qtty::Hours {
        qtty::Hours::new(self.ra.value() / 15.0)
    }
}

/// Why a target row was excluded from the run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RowErrorReason {
    #[error("right ascension {0} deg outside [0, 360)")]
    RaOutOfRange(f64),
    #[error("declination {0} deg outside [-90, 90]")]
    DecOutOfRange(f64),
    #[error("requested exposure time {0} s is not positive")]
    NonPositiveExposure(f64),
    #[error("declination {0} deg never enters the tracker annulus")]
    UnreachableDeclination(f64),
    #[error("duplicate target_id")]
    DuplicateId,
    #[error("malformed row: {0}")]
    Malformed(String),
}

/// A per-row validation failure. Collected, reported, never fatal.
#[derive(Debug, Clone, PartialEq)]
pub struct RowError {
    /// Identifier of the offending target, or a line label for rows that
    /// could not be parsed far enough to have one.
    pub target_id: String,
    /// 1-based input line number, when known.
    pub line: Option<usize>,
    pub reason: RowErrorReason,
}

impl std::fmt::Display for RowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "{} (line {}): {}", self.target_id, line, self.reason),
            None => write!(f, "{}: {}", self.target_id, self.reason),
        }
    }
}

/// An LST window in which visits to a target can be placed, with the number
/// of visits that must fit in it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LstWindow {
    pub start: LocalSiderealTime,
    pub stop: LocalSiderealTime,
    /// Visits needed on this track: the requested count when the per-visit
    /// time fits, more when the track is too short.
    pub visits: u32,
}

impl LstWindow {
    /// Whether the given LST (in the trimester plotting frame) falls inside
    /// this window. Bounds are exclusive, matching the binning convention.
    pub fn contains(&self, lst_h: f64) -> bool {
        self.start.value() < lst_h && lst_h < self.stop.value()
    }
}

/// One row of the enriched result table.
///
/// `track1` is the east track for declinations the tracker crosses twice,
/// or the single meridian track otherwise; `track2` is the west track and
/// absent for single-track targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetResult {
    pub target: Target,
    pub track1: Option<LstWindow>,
    pub track2: Option<LstWindow>,
    /// Set when every available track needs more visits than requested.
    pub insufficient_coverage: bool,
}

impl TargetResult {
    /// Whether the target can be observed on both an east and a west track.
    pub fn has_dual_tracks(&self) -> bool {
        self.track1.is_some() && self.track2.is_some()
    }

    /// Visits this target demands from the queue: the smaller of the track
    /// requirements, since dual-track visits may be placed on either side.
    pub fn demanded_visits(&self) -> u32 {
        match (&self.track1, &self.track2) {
            (Some(a), Some(b)) => a.visits.min(b.visits),
            (Some(a), None) => a.visits,
            (None, Some(b)) => b.visits,
            (None, None) => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_sane_target() {
        let t = Target::new("ngc1275", 49.95, 41.51, 1800.0, 2);
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_ra() {
        let t = Target::new("t", 360.0, 10.0, 100.0, 1);
        assert!(matches!(t.validate(), Err(RowErrorReason::RaOutOfRange(_))));
        let t = Target::new("t", -0.1, 10.0, 100.0, 1);
        assert!(matches!(t.validate(), Err(RowErrorReason::RaOutOfRange(_))));
    }

    #[test]
    fn test_validate_rejects_bad_dec() {
        let t = Target::new("t", 10.0, 90.5, 100.0, 1);
        assert!(matches!(t.validate(), Err(RowErrorReason::DecOutOfRange(_))));
    }

    #[test]
    fn test_validate_rejects_non_positive_exposure() {
        let t = Target::new("t", 10.0, 10.0, 0.0, 1);
        assert!(matches!(
            t.validate(),
            Err(RowErrorReason::NonPositiveExposure(_))
        ));
        let t = Target::new("t", 10.0, 10.0, -3600.0, 1);
        assert!(t.validate().is_err());
    }

    #[test]
    fn test_num_visits_floor_is_one() {
        let t = Target::new("t", 10.0, 10.0, 100.0, 0);
        assert_eq!(t.num_visits, 1);
    }

    #[test]
    fn test_ra_hours() {
        let t = Target::new("t", 180.0, 0.0, 100.0, 1);
        assert!((t.ra_hours().value() - 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_window_contains_is_exclusive() {
        let w = LstWindow {
            start: 22.0.into(),
            stop: 24.5.into(),
            visits: 1,
        };
        assert!(w.contains(23.0));
        assert!(!w.contains(22.0));
        assert!(!w.contains(24.5));
    }

    #[test]
    fn test_demanded_visits_takes_cheaper_track() {
        let mk = |visits| LstWindow {
            start: 0.0.into(),
            stop: 1.0.into(),
            visits,
        };
        let result = TargetResult {
            target: Target::new("t", 10.0, 30.0, 100.0, 1),
            track1: Some(mk(4)),
            track2: Some(mk(2)),
            insufficient_coverage: false,
        };
        assert_eq!(result.demanded_visits(), 2);

        let single = TargetResult {
            track2: None,
            ..result.clone()
        };
        assert_eq!(single.demanded_visits(), 4);
    }
}

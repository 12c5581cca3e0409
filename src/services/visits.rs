//! Per-target visit counts and LST windows.
//!
//! For each valid target this module places the requested visits on the
//! available tracks: the per-visit time (exposure split over the visits,
//! plus setup) is centered on the track midpoint and converted to an LST
//! window via the target's right ascension. When the per-visit time does not
//! fit in a track, the visit count is raised until the exposure does.

use log::warn;
use qtty::{Hour, Hours, Seconds};

use crate::models::{LstWindow, RowError, Target, TargetResult, Trimester};
use crate::services::tracking::{HourAngleTrack, TrackGeometry, TrackSolution};

/// Compute results for every target, collecting per-row failures.
///
/// Rows failing validation or track geometry are excluded from the results
/// and reported in the error list; the run always continues.
pub fn evaluate_targets(
    targets: &[Target],
    geometry: &TrackGeometry,
    trimester: Trimester,
    setup_time: Seconds,
) -> (Vec<TargetResult>, Vec<RowError>) {
    let mut results = Vec::with_capacity(targets.len());
    let mut errors = Vec::new();

    for target in targets {
        match evaluate_target(target, geometry, trimester, setup_time) {
            Ok(result) => results.push(result),
            Err(reason) => errors.push(RowError {
                target_id: target.target_id.clone(),
                line: None,
                reason,
            }),
        }
    }

    (results, errors)
}

fn evaluate_target(
    target: &Target,
    geometry: &TrackGeometry,
    trimester: Trimester,
    setup_time: Seconds,
) -> Result<TargetResult, crate::models::RowErrorReason> {
    target.validate()?;

    let (track1, track2) = match geometry.track_windows(target.dec)? {
        TrackSolution::Dual { east, west } => (
            window_for_track(target, &east, trimester, setup_time),
            Some(window_for_track(target, &west, trimester, setup_time)),
        ),
        TrackSolution::Single(track) => {
            (window_for_track(target, &track, trimester, setup_time), None)
        }
    };

    // Coverage is insufficient only when every available track needs more
    // visits than the proposer asked for.
    let insufficient_coverage = match &track2 {
        Some(west) => track1.visits > target.num_visits && west.visits > target.num_visits,
        None => false,
    };

    Ok(TargetResult {
        target: target.clone(),
        track1: Some(track1),
        track2,
        insufficient_coverage,
    })
}

/// Time one visit occupies the telescope, in hours.
fn requested_time_per_visit(target: &Target, setup_time: Seconds, n_visits: u32) -> Hours {
    let exposure_per_visit = Seconds::new(target.t_exp.value() / n_visits as f64);
    Seconds::new(exposure_per_visit.value() + setup_time.value()).to::<Hour>()
}

fn window_for_track(
    target: &Target,
    track: &HourAngleTrack,
    trimester: Trimester,
    setup_time: Seconds,
) -> LstWindow {
    let track_length = track.length();
    let mut visits = target.num_visits;
    let mut per_visit = requested_time_per_visit(target, setup_time, visits);

    if per_visit.value() > track_length.value() {
        let t_exp_h = target.t_exp.to::<Hour>().value();
        // The 1e-9 slack keeps exact multiples (3600 s over 1200 s tracks)
        // from rounding up one visit too many.
        visits = (t_exp_h / track_length.value() - 1e-9).ceil().max(1.0) as u32;
        if visits <= target.num_visits {
            // Setup overhead alone pushed the visit over the track.
            visits = target.num_visits + 1;
        }
        warn!(
            "target {}: only {:.2} h per track, but {:.2} h requested per ({}) visit; \
             raising to {} visits",
            target.target_id,
            track_length.value(),
            per_visit.value(),
            target.num_visits,
            visits
        );
        per_visit = requested_time_per_visit(target, setup_time, visits);
    }

    // Spread the visit time symmetrically around the track midpoint and move
    // into the LST frame of the trimester. The frame shift is applied to the
    // midpoint so a window can never invert across the frame seam.
    let ra_h = target.ra_hours().value();
    let half = per_visit.value() / 2.0;
    let mid = trimester.adjust_lst(ra_h + track.center.value());

    LstWindow {
        start: (mid - half).into(),
        stop: (mid + half).into(),
        visits,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;

    fn het_geometry() -> TrackGeometry {
        TrackGeometry::from_site(&SiteConfig::default())
    }

    fn no_setup() -> Seconds {
        Seconds::new(0.0)
    }

    fn track(half_width_h: f64) -> HourAngleTrack {
        HourAngleTrack {
            center: Hours::new(0.0),
            half_width: Hours::new(half_width_h),
        }
    }

    #[test]
    fn test_visits_raised_by_exposure_over_track_length() {
        // 3600 s of exposure on a track holding 1200 s per visit: 3 visits.
        let target = Target::new("t", 150.0, 30.0, 3600.0, 1);
        let window = window_for_track(
            &target,
            &track(1200.0 / 3600.0 / 2.0),
            Trimester::Second,
            no_setup(),
        );
        assert_eq!(window.visits, 3);
    }

    #[test]
    fn test_requested_visits_kept_when_time_fits() {
        let target = Target::new("t", 150.0, 30.0, 3600.0, 2);
        // 0.5 h + setup per visit easily fits a 2 h track.
        let window = window_for_track(&target, &track(1.0), Trimester::Second, Seconds::new(300.0));
        assert_eq!(window.visits, 2);
    }

    #[test]
    fn test_window_is_centered_on_track() {
        let target = Target::new("t", 180.0, 30.0, 3600.0, 1);
        let window = window_for_track(&target, &track(1.0), Trimester::Second, no_setup());
        // ra 12 h, center 0, 1 h visit -> 11.5 .. 12.5
        assert!((window.start.value() - 11.5).abs() < 1e-9);
        assert!((window.stop.value() - 12.5).abs() < 1e-9);
    }

    #[test]
    fn test_window_wraps_into_trimester_frame() {
        let target = Target::new("t", 30.0, 30.0, 3600.0, 1);
        // ra 2 h in trimester 1 wraps to the 24 h-shifted night segment.
        let window = window_for_track(&target, &track(1.0), Trimester::First, no_setup());
        assert!(window.start.value() > 22.0);
        assert!(window.stop.value() > window.start.value());
    }

    #[test]
    fn test_setup_time_counts_against_track_budget() {
        let target = Target::new("t", 150.0, 30.0, 3000.0, 1);
        // Exposure alone fits exactly; setup pushes it over.
        let window = window_for_track(
            &target,
            &track(3000.0 / 3600.0 / 2.0),
            Trimester::Second,
            Seconds::new(300.0),
        );
        assert!(window.visits > 1);
    }

    #[test]
    fn test_invalid_rows_excluded_not_fatal() {
        let targets = vec![
            Target::new("good", 150.0, 30.0, 1800.0, 1),
            Target::new("bad_exp", 150.0, 30.0, -10.0, 1),
            Target::new("bad_dec", 150.0, -45.0, 1800.0, 1),
        ];
        let (results, errors) =
            evaluate_targets(&targets, &het_geometry(), Trimester::Second, no_setup());
        assert_eq!(results.len(), 1);
        assert_eq!(errors.len(), 2);
        assert_eq!(results[0].target.target_id, "good");
        assert!(errors.iter().all(|e| e.line.is_none()));
    }

    #[test]
    fn test_dual_track_target_gets_two_windows() {
        let targets = vec![Target::new("dual", 150.0, 30.0, 1800.0, 1)];
        let (results, _) =
            evaluate_targets(&targets, &het_geometry(), Trimester::Second, no_setup());
        assert!(results[0].has_dual_tracks());
        let w1 = results[0].track1.unwrap();
        let w2 = results[0].track2.unwrap();
        assert!(w1.start.value() < w2.start.value());
    }

    #[test]
    fn test_single_track_target_gets_one_window() {
        let targets = vec![Target::new("single", 150.0, -8.0, 600.0, 1)];
        let (results, _) =
            evaluate_targets(&targets, &het_geometry(), Trimester::Second, no_setup());
        assert!(results[0].track1.is_some());
        assert!(results[0].track2.is_none());
        assert!(!results[0].insufficient_coverage);
    }

    #[test]
    fn test_insufficient_coverage_needs_both_tracks_over() {
        // Long exposure on a dual-track dec with one requested visit.
        let targets = vec![Target::new("deep", 150.0, 30.0, 12.0 * 3600.0, 1)];
        let (results, _) =
            evaluate_targets(&targets, &het_geometry(), Trimester::Second, no_setup());
        let result = &results[0];
        assert!(result.track1.unwrap().visits > 1);
        assert!(result.track2.unwrap().visits > 1);
        assert!(result.insufficient_coverage);
    }
}

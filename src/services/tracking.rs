//! Track-window geometry for a fixed-altitude telescope.
//!
//! The telescope observes on a fixed-altitude circle: the primary stays put
//! and the tracker follows a target while it drifts through the annulus of
//! angular radius `tracker_reach` around the pointing. Visibility therefore
//! reduces to hour-angle windows around the moments the target's diurnal
//! circle meets the altitude ring:
//!
//! - Declinations that culminate *above* the ring cross it twice, once
//!   rising (east track) and once setting (west track), at hour angles
//!   `±H₀` with `cos H₀ = (sin a₀ − sin φ sin δ) / (cos φ cos δ)`.
//! - Declinations that culminate within `tracker_reach` *below* the ring
//!   get one track straddling the meridian.
//! - Anything else never enters the annulus and is rejected per row.
//!
//! Windows are expressed in hours of hour angle (15° per hour); the
//! solar/sidereal rate distinction is far below the fidelity of this model.

use qtty::{Degrees, Hours};

use crate::config::SiteConfig;
use crate::models::RowErrorReason;

/// Hour-angle degrees per hour.
const DEG_PER_HOUR: f64 = 15.0;

/// Site constants needed to solve track windows.
#[derive(Debug, Clone, Copy)]
pub struct TrackGeometry {
    latitude: Degrees,
    fixed_altitude: Degrees,
    tracker_reach: Degrees,
    max_hour_angle: Hours,
}

/// One track: a symmetric hour-angle window around its center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourAngleTrack {
    /// Hour angle of the track center relative to transit, in hours
    /// (negative east of the meridian).
    pub center: Hours,
    pub half_width: Hours,
}

impl HourAngleTrack {
    pub fn start(&self) -> Hours {
        Hours::new(self.center.value() - self.half_width.value())
    }

    pub fn stop(&self) -> Hours {
        Hours::new(self.center.value() + self.half_width.value())
    }

    /// Full usable track length.
    pub fn length(&self) -> Hours {
        Hours::new(2.0 * self.half_width.value())
    }
}

/// The tracks available for one declination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackSolution {
    /// The diurnal circle crosses the altitude ring twice.
    Dual {
        east: HourAngleTrack,
        west: HourAngleTrack,
    },
    /// One meridian-straddling track.
    Single(HourAngleTrack),
}

impl TrackGeometry {
    pub fn from_site(site: &SiteConfig) -> Self {
        Self {
            latitude: Degrees::new(site.latitude_deg),
            fixed_altitude: Degrees::new(site.fixed_altitude_deg),
            tracker_reach: Degrees::new(site.tracker_reach_deg),
            max_hour_angle: Hours::new(site.max_hour_angle_h),
        }
    }

    /// Altitude the declination reaches at upper culmination.
    pub fn culmination_altitude(&self, dec: Degrees) -> Degrees {
        Degrees::new(90.0 - (self.latitude.value() - dec.value()).abs())
    }

    /// Solve the track windows for a declination.
    ///
    /// # Returns
    /// * `TrackSolution::Dual` east/west tracks for declinations crossing
    ///   the altitude ring
    /// * `TrackSolution::Single` for declinations grazing it from below
    /// * `Err(RowErrorReason::UnreachableDeclination)` when the target never
    ///   enters the tracker annulus, or only at hour angles beyond the
    ///   configured limit
    pub fn track_windows(&self, dec: Degrees) -> Result<TrackSolution, RowErrorReason> {
        let a_max = self.culmination_altitude(dec);
        let a0 = self.fixed_altitude.value();
        let reach = self.tracker_reach.value();

        let half_width_from = |cross_width_deg: f64| {
            Hours::new(cross_width_deg / (DEG_PER_HOUR * dec.cos().abs()))
        };

        if a_max.value() > a0 {
            // Crosses the ring: solve cos H0 from the altitude equation.
            let cos_h0 = (self.fixed_altitude.sin() - self.latitude.sin() * dec.sin())
                / (self.latitude.cos() * dec.cos());
            // Numerical guard for declinations culminating just above the ring.
            let h0_deg = cos_h0.clamp(-1.0, 1.0).acos().to_degrees();
            let center = Hours::new(h0_deg / DEG_PER_HOUR);
            let half_width = half_width_from(reach);

            if center.value() + half_width.value() > self.max_hour_angle.value() {
                return Err(RowErrorReason::UnreachableDeclination(dec.value()));
            }
            let east = HourAngleTrack {
                center: Hours::new(-center.value()),
                half_width,
            };
            let west = HourAngleTrack { center, half_width };
            Ok(TrackSolution::Dual { east, west })
        } else {
            // Grazes the ring from below, if the tracker reaches that deep.
            let deficit = a0 - a_max.value();
            if deficit >= reach {
                return Err(RowErrorReason::UnreachableDeclination(dec.value()));
            }
            let cross = (reach * reach - deficit * deficit).sqrt();
            let half_width = half_width_from(cross);
            if half_width.value() > self.max_hour_angle.value() || half_width.value() <= 0.0 {
                return Err(RowErrorReason::UnreachableDeclination(dec.value()));
            }
            Ok(TrackSolution::Single(HourAngleTrack {
                center: Hours::new(0.0),
                half_width,
            }))
        }
    }
}

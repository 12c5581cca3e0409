//! Observing trimesters and their LST conventions.
//!
//! HET splits the year into three four-month scheduling trimesters. Each
//! trimester comes with an LST offset that defines the continuous 24-hour
//! window used for visit windows and the overview plot: instead of wrapping
//! at 24 h, times are shifted so one observing season occupies one contiguous
//! range (e.g. 22 h … 46 h in trimester 1).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A four-month observing scheduling period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Trimester {
    /// December through March.
    First,
    /// April through July.
    Second,
    /// August through November.
    Third,
}

impl Trimester {
    /// One-based trimester index (1, 2, 3).
    pub fn index(&self) -> u8 {
        match self {
            Trimester::First => 1,
            Trimester::Second => 2,
            Trimester::Third => 3,
        }
    }

    /// Calendar months covered by this trimester.
    pub fn months(&self) -> [u32; 4] {
        match self {
            Trimester::First => [12, 1, 2, 3],
            Trimester::Second => [4, 5, 6, 7],
            Trimester::Third => [8, 9, 10, 11],
        }
    }

    /// First and last night of the trimester for the given year.
    ///
    /// Trimester 1 of year `y` starts on December 1 of `y - 1`.
    pub fn period(&self, year: i32) -> Option<(NaiveDate, NaiveDate)> {
        match self {
            Trimester::First => Some((
                NaiveDate::from_ymd_opt(year - 1, 12, 1)?,
                NaiveDate::from_ymd_opt(year, 3, 31)?,
            )),
            Trimester::Second => Some((
                NaiveDate::from_ymd_opt(year, 4, 1)?,
                NaiveDate::from_ymd_opt(year, 7, 31)?,
            )),
            Trimester::Third => Some((
                NaiveDate::from_ymd_opt(year, 8, 1)?,
                NaiveDate::from_ymd_opt(year, 11, 30)?,
            )),
        }
    }

    /// LST offset of the trimester's plotting frame, in hours.
    ///
    /// The frame covers `offset … offset + 24` so that the observing season
    /// is contiguous on the time axis.
    pub fn lst_offset(&self) -> qtty::Hours {
        let hours = match self {
            Trimester::First => 20.0,
            Trimester::Second => 2.0,
            Trimester::Third => 12.0,
        };
        qtty::Hours::new(hours)
    }

    /// Shift an LST value (hours) into this trimester's plotting frame.
    ///
    /// Trimester 1 keeps values above 22 h, trimester 2 maps into (1, 25],
    /// trimester 3 into (12, 36]. The trimester 2 lower threshold of 2 h is
    /// inherited from the operational tool.
    pub fn adjust_lst(&self, time_h: f64) -> f64 {
        match self {
            Trimester::First => {
                if time_h <= 22.0 {
                    time_h + 24.0
                } else {
                    time_h
                }
            }
            Trimester::Second => {
                if time_h > 25.0 {
                    time_h - 24.0
                } else if time_h < 2.0 {
                    time_h + 24.0
                } else {
                    time_h
                }
            }
            Trimester::Third => {
                if time_h < 12.0 {
                    time_h + 24.0
                } else if time_h > 36.0 {
                    time_h - 24.0
                } else {
                    time_h
                }
            }
        }
    }
}

impl From<Trimester> for u8 {
    fn from(t: Trimester) -> u8 {
        t.index()
    }
}

impl TryFrom<u8> for Trimester {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Trimester::First),
            2 => Ok(Trimester::Second),
            3 => Ok(Trimester::Third),
            other => Err(format!("trimester index must be 1, 2 or 3, got {other}")),
        }
    }
}

impl std::fmt::Display for Trimester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.index())
    }
}

//! Simulation time.
//!
//! Event logs stamp every event with seconds since simulation midnight as a
//! float.  Runs may extend past 24:00, so `SimTime` is not wrapped to a day.

use std::fmt;

/// An event timestamp in seconds since simulation start of day.
#[derive(Copy, Clone, PartialEq, PartialOrd, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimTime(pub f64);

impl SimTime {
    #[inline]
    pub fn secs(self) -> f64 {
        self.0
    }

    /// Seconds elapsed from `earlier` to `self`.  Negative if `earlier` is
    /// actually later.
    #[inline]
    pub fn since(self, earlier: SimTime) -> f64 {
        self.0 - earlier.0
    }
}

impl std::ops::Sub for SimTime {
    type Output = f64;
    #[inline]
    fn sub(self, rhs: SimTime) -> f64 {
        self.0 - rhs.0
    }
}

impl From<f64> for SimTime {
    fn from(secs: f64) -> Self {
        SimTime(secs)
    }
}

impl fmt::Display for SimTime {
    /// `HH:MM:SS`, hours unbounded (e.g. `26:15:00` on the second day).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let total = self.0.max(0.0) as u64;
        let h = total / 3_600;
        let m = (total % 3_600) / 60;
        let s = total % 60;
        write!(f, "{h:02}:{m:02}:{s:02}")
    }
}

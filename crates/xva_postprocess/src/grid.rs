//! Profile date grid: today followed by the simulation dates.
//!
//! Profile index 0 is the as-of date; profile index `k >= 1` is simulation
//! date `k - 1` of the cube. Shifts by a number of calendar days (margin
//! period of risk, DIM horizon) are mapped to the nearest grid date rather
//! than interpolated.

use chrono::{Duration, NaiveDate};
use xva_core::types::DayCountConvention;

/// Dates and Act/365F times of an exposure profile.
#[derive(Clone, Debug, PartialEq)]
pub struct DateGrid {
    dates: Vec<NaiveDate>,
    times: Vec<f64>,
}

impl DateGrid {
    /// Builds the grid from the as-of date and the simulation dates.
    pub fn new(as_of: NaiveDate, simulation_dates: &[NaiveDate]) -> Self {
        let dates: Vec<NaiveDate> = std::iter::once(as_of)
            .chain(simulation_dates.iter().copied())
            .collect();
        let times = dates
            .iter()
            .map(|&d| DayCountConvention::Actual365Fixed.year_fraction(as_of, d))
            .collect();
        Self { dates, times }
    }

    /// Number of profile points (simulation dates + 1).
    #[inline]
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// Always false; the grid contains at least today.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// As-of date.
    #[inline]
    pub fn as_of(&self) -> NaiveDate {
        self.dates[0]
    }

    /// Profile dates.
    #[inline]
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Act/365F times from the as-of date.
    #[inline]
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Grid index closest to `target`; ties go to the earlier date.
    pub fn nearest_index(&self, target: NaiveDate) -> usize {
        let i = self.dates.partition_point(|&d| d < target);
        if i == 0 {
            return 0;
        }
        if i == self.dates.len() {
            return i - 1;
        }
        let before = (target - self.dates[i - 1]).num_days();
        let after = (self.dates[i] - target).num_days();
        if after < before {
            i
        } else {
            i - 1
        }
    }

    /// Grid index whose exposure drives margin calls at `k` under a
    /// margin period of risk of `days`; never later than `k`.
    pub fn lag_index(&self, k: usize, days: u32) -> usize {
        if days == 0 {
            return k;
        }
        let target = self.dates[k] - Duration::days(i64::from(days));
        self.nearest_index(target).min(k)
    }

    /// Grid index closest to `days` after `k`, strictly after `k`.
    /// `None` at the last grid point.
    pub fn horizon_index(&self, k: usize, days: u32) -> Option<usize> {
        if k + 1 >= self.dates.len() {
            return None;
        }
        let target = self.dates[k] + Duration::days(i64::from(days));
        Some(self.nearest_index(target).max(k + 1))
    }

    /// Last grid index of the regulatory averaging window ending at `limit`.
    ///
    /// The first simulation date is always included; a grid without
    /// simulation dates yields 0.
    pub fn window_end(&self, limit: NaiveDate) -> usize {
        if self.dates.len() < 2 {
            return 0;
        }
        let last = self.dates.partition_point(|&d| d <= limit);
        last.saturating_sub(1).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn weekly() -> DateGrid {
        // today, +7d, +14d, +21d, +28d
        let as_of = date(2024, 1, 1);
        let sims: Vec<NaiveDate> = (1..=4).map(|w| as_of + Duration::days(7 * w)).collect();
        DateGrid::new(as_of, &sims)
    }

    #[test]
    fn test_times() {
        let g = weekly();
        assert_eq!(g.len(), 5);
        assert_eq!(g.times()[0], 0.0);
        assert_relative_eq!(g.times()[2], 14.0 / 365.0, epsilon = 1e-15);
    }

    #[test]
    fn test_nearest_index_ties_go_earlier() {
        let g = weekly();
        assert_eq!(g.nearest_index(date(2024, 1, 4)), 0);
        assert_eq!(g.nearest_index(date(2024, 1, 5)), 1);
        // 2024-01-11 is 3 days after index 1 and 4 days before index 2
        assert_eq!(g.nearest_index(date(2024, 1, 11)), 1);
        assert_eq!(g.nearest_index(date(2025, 1, 1)), 4);
        assert_eq!(g.nearest_index(date(2023, 1, 1)), 0);
    }

    #[test]
    fn test_lag_index() {
        let g = weekly();
        assert_eq!(g.lag_index(3, 0), 3);
        assert_eq!(g.lag_index(3, 14), 1);
        // 2024-01-12 is 4 days after index 1 and 3 days before index 2
        assert_eq!(g.lag_index(3, 10), 2);
        assert_eq!(g.lag_index(1, 30), 0);
    }

    #[test]
    fn test_horizon_index() {
        let g = weekly();
        assert_eq!(g.horizon_index(0, 14), Some(2));
        assert_eq!(g.horizon_index(2, 1), Some(3));
        assert_eq!(g.horizon_index(3, 14), Some(4));
        assert_eq!(g.horizon_index(4, 14), None);
    }

    #[test]
    fn test_window_end() {
        let g = weekly();
        assert_eq!(g.window_end(date(2024, 1, 16)), 2);
        assert_eq!(g.window_end(date(2024, 1, 2)), 1);
        assert_eq!(g.window_end(date(2030, 1, 1)), 4);
        assert_eq!(DateGrid::new(date(2024, 1, 1), &[]).window_end(date(2030, 1, 1)), 0);
    }
}

//! Dense (id, date, sample) value cubes.
//!
//! The same container carries the input trade NPV cube, the netted and
//! collateralised netting-set cube, and the DIM cube. Each id also has a
//! "today" value (T0) that is never discounted.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised while building or reading a cube.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CubeError {
    /// Dates must be strictly increasing and after the as-of date.
    #[error("Invalid cube date grid: {0}")]
    InvalidDates(String),

    /// The same id appears twice.
    #[error("Duplicate cube id: {0}")]
    DuplicateId(String),

    /// Lookup of an id that is not in the cube.
    #[error("Unknown cube id: {0}")]
    UnknownId(String),

    /// Cube without ids, dates or samples.
    #[error("Cube dimension '{0}' is empty")]
    EmptyDimension(&'static str),
}

/// Cube of values indexed by id, simulation date and sample.
///
/// Storage is contiguous per (id, date) so that the cross-sample
/// distribution at one date is a single slice.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use xva_postprocess::cube::NpvCube;
/// use xva_postprocess::portfolio::TradeId;
///
/// let as_of = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let dates = vec![
///     NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
/// ];
/// let mut cube = NpvCube::new(as_of, dates, vec![TradeId::new("T1")], 3).unwrap();
/// cube.set(0, 1, 2, 42.0);
/// cube.set_t0(0, 10.0);
///
/// assert_eq!(cube.samples(0, 1), &[0.0, 0.0, 42.0]);
/// assert_eq!(cube.t0(0), 10.0);
/// assert_eq!(cube.index_of(&TradeId::new("T1")), Some(0));
/// ```
#[derive(Clone, Debug)]
pub struct NpvCube<Id> {
    as_of: NaiveDate,
    dates: Vec<NaiveDate>,
    ids: Vec<Id>,
    id_index: HashMap<Id, usize>,
    n_samples: usize,
    t0: Vec<f64>,
    values: Vec<f64>,
}

impl<Id> NpvCube<Id>
where
    Id: Clone + Eq + Hash + fmt::Display,
{
    /// Creates a zero-filled cube.
    ///
    /// # Errors
    ///
    /// - `CubeError::EmptyDimension` if there are no dates, ids or samples
    /// - `CubeError::InvalidDates` if dates are not strictly increasing after `as_of`
    /// - `CubeError::DuplicateId` if an id repeats
    pub fn new(
        as_of: NaiveDate,
        dates: Vec<NaiveDate>,
        ids: Vec<Id>,
        n_samples: usize,
    ) -> Result<Self, CubeError> {
        if dates.is_empty() {
            return Err(CubeError::EmptyDimension("dates"));
        }
        if ids.is_empty() {
            return Err(CubeError::EmptyDimension("ids"));
        }
        if n_samples == 0 {
            return Err(CubeError::EmptyDimension("samples"));
        }
        let mut previous = as_of;
        for &date in &dates {
            if date <= previous {
                return Err(CubeError::InvalidDates(format!(
                    "{date} does not follow {previous}"
                )));
            }
            previous = date;
        }

        let mut id_index = HashMap::with_capacity(ids.len());
        for (i, id) in ids.iter().enumerate() {
            if id_index.insert(id.clone(), i).is_some() {
                return Err(CubeError::DuplicateId(id.to_string()));
            }
        }

        let size = ids.len() * dates.len() * n_samples;
        Ok(Self {
            as_of,
            t0: vec![0.0; ids.len()],
            values: vec![0.0; size],
            dates,
            ids,
            id_index,
            n_samples,
        })
    }

    /// Creates an empty cube with the same date grid and sample count.
    pub fn with_same_grid<Other>(&self, ids: Vec<Other>) -> Result<NpvCube<Other>, CubeError>
    where
        Other: Clone + Eq + Hash + fmt::Display,
    {
        NpvCube::new(self.as_of, self.dates.clone(), ids, self.n_samples)
    }

    /// Valuation date.
    #[inline]
    pub fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    /// Simulation dates (excluding today).
    #[inline]
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    /// Ids in cube order.
    #[inline]
    pub fn ids(&self) -> &[Id] {
        &self.ids
    }

    /// Number of ids.
    #[inline]
    pub fn n_ids(&self) -> usize {
        self.ids.len()
    }

    /// Number of simulation dates.
    #[inline]
    pub fn n_dates(&self) -> usize {
        self.dates.len()
    }

    /// Number of samples.
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Position of an id.
    #[inline]
    pub fn index_of(&self, id: &Id) -> Option<usize> {
        self.id_index.get(id).copied()
    }

    /// Position of an id, failing on unknown ids.
    pub fn require_index(&self, id: &Id) -> Result<usize, CubeError> {
        self.index_of(id)
            .ok_or_else(|| CubeError::UnknownId(id.to_string()))
    }

    #[inline]
    fn offset(&self, id: usize, date: usize) -> usize {
        (id * self.dates.len() + date) * self.n_samples
    }

    /// Today's value of an id.
    #[inline]
    pub fn t0(&self, id: usize) -> f64 {
        self.t0[id]
    }

    /// Sets today's value of an id.
    #[inline]
    pub fn set_t0(&mut self, id: usize, value: f64) {
        self.t0[id] = value;
    }

    /// Value at (id, date, sample).
    ///
    /// # Panics
    ///
    /// Panics if any index is out of range.
    #[inline]
    pub fn get(&self, id: usize, date: usize, sample: usize) -> f64 {
        debug_assert!(sample < self.n_samples);
        self.values[self.offset(id, date) + sample]
    }

    /// Sets the value at (id, date, sample).
    ///
    /// # Panics
    ///
    /// Panics if any index is out of range.
    #[inline]
    pub fn set(&mut self, id: usize, date: usize, sample: usize, value: f64) {
        debug_assert!(sample < self.n_samples);
        let offset = self.offset(id, date);
        self.values[offset + sample] = value;
    }

    /// Cross-sample values of an id at a date.
    #[inline]
    pub fn samples(&self, id: usize, date: usize) -> &[f64] {
        let start = self.offset(id, date);
        &self.values[start..start + self.n_samples]
    }

    /// Mutable cross-sample values of an id at a date.
    #[inline]
    pub fn samples_mut(&mut self, id: usize, date: usize) -> &mut [f64] {
        let start = self.offset(id, date);
        let n = self.n_samples;
        &mut self.values[start..start + n]
    }

    /// Writes a whole (date x sample) block for one id, as produced by a
    /// per-id computation, plus its T0 value.
    pub(crate) fn write_block(&mut self, id: usize, t0: f64, block: &[f64]) {
        debug_assert_eq!(block.len(), self.dates.len() * self.n_samples);
        self.t0[id] = t0;
        let start = self.offset(id, 0);
        self.values[start..start + block.len()].copy_from_slice(block);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::{NettingSetId, TradeId};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn grid() -> Vec<NaiveDate> {
        vec![date(2024, 4, 1), date(2024, 7, 1), date(2024, 10, 1)]
    }

    #[test]
    fn test_layout_is_contiguous_per_date() {
        let mut cube = NpvCube::new(
            date(2024, 1, 1),
            grid(),
            vec![TradeId::new("A"), TradeId::new("B")],
            2,
        )
        .unwrap();
        cube.set(1, 2, 0, 5.0);
        cube.set(1, 2, 1, 6.0);
        cube.samples_mut(0, 0)[1] = -1.0;
        assert_eq!(cube.samples(1, 2), &[5.0, 6.0]);
        assert_eq!(cube.get(0, 0, 1), -1.0);
        assert_eq!(cube.get(1, 1, 0), 0.0);
    }

    #[test]
    fn test_dates_must_follow_as_of() {
        let err = NpvCube::new(date(2024, 4, 1), grid(), vec![TradeId::new("A")], 1).unwrap_err();
        assert!(matches!(err, CubeError::InvalidDates(_)));
        let unsorted = vec![date(2024, 7, 1), date(2024, 4, 1)];
        assert!(NpvCube::new(date(2024, 1, 1), unsorted, vec![TradeId::new("A")], 1).is_err());
    }

    #[test]
    fn test_duplicate_and_unknown_ids() {
        let dup = NpvCube::new(
            date(2024, 1, 1),
            grid(),
            vec![TradeId::new("A"), TradeId::new("A")],
            1,
        );
        assert_eq!(dup.unwrap_err(), CubeError::DuplicateId("A".to_string()));

        let cube = NpvCube::new(date(2024, 1, 1), grid(), vec![TradeId::new("A")], 1).unwrap();
        assert!(cube.require_index(&TradeId::new("Z")).is_err());
    }

    #[test]
    fn test_with_same_grid() {
        let cube = NpvCube::new(date(2024, 1, 1), grid(), vec![TradeId::new("A")], 4).unwrap();
        let other = cube.with_same_grid(vec![NettingSetId::new("NS")]).unwrap();
        assert_eq!(other.dates(), cube.dates());
        assert_eq!(other.n_samples(), 4);
    }

    #[test]
    fn test_write_block() {
        let mut cube = NpvCube::new(date(2024, 1, 1), grid(), vec![TradeId::new("A")], 2).unwrap();
        cube.write_block(0, 1.5, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(cube.t0(0), 1.5);
        assert_eq!(cube.samples(0, 1), &[3.0, 4.0]);
    }
}

//! Trade records as seen by the exposure post-processor.
//!
//! Only the attributes needed for aggregation are kept: the netting set the
//! trade belongs to, its maturity, and optional break (mutual termination)
//! dates.

use chrono::NaiveDate;

use super::ids::{NettingSetId, TradeId};

/// A trade in the simulated portfolio.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use xva_postprocess::portfolio::{NettingSetId, Trade, TradeId};
///
/// let maturity = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
/// let trade = Trade::new(TradeId::new("T1"), NettingSetId::new("NS1"), maturity)
///     .with_break_dates([NaiveDate::from_ymd_opt(2027, 1, 1).unwrap()]);
///
/// let as_of = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// assert_eq!(trade.effective_maturity(as_of, false), maturity);
/// assert_eq!(
///     trade.effective_maturity(as_of, true),
///     NaiveDate::from_ymd_opt(2027, 1, 1).unwrap()
/// );
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Trade {
    id: TradeId,
    netting_set_id: NettingSetId,
    maturity: NaiveDate,
    break_dates: Vec<NaiveDate>,
}

impl Trade {
    /// Creates a trade without break dates.
    pub fn new(id: TradeId, netting_set_id: NettingSetId, maturity: NaiveDate) -> Self {
        Self {
            id,
            netting_set_id,
            maturity,
            break_dates: Vec::new(),
        }
    }

    /// Sets the break dates, kept sorted and deduplicated.
    pub fn with_break_dates(mut self, dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        self.break_dates = dates.into_iter().collect();
        self.break_dates.sort();
        self.break_dates.dedup();
        self
    }

    /// Returns the trade identifier.
    #[inline]
    pub fn id(&self) -> &TradeId {
        &self.id
    }

    /// Returns the netting set identifier.
    #[inline]
    pub fn netting_set_id(&self) -> &NettingSetId {
        &self.netting_set_id
    }

    /// Returns the contractual maturity.
    #[inline]
    pub fn maturity(&self) -> NaiveDate {
        self.maturity
    }

    /// Returns the sorted break dates.
    #[inline]
    pub fn break_dates(&self) -> &[NaiveDate] {
        &self.break_dates
    }

    /// Date after which the trade contributes no exposure.
    ///
    /// With `exercise_next_break` the first break date strictly after
    /// `as_of` terminates the trade early.
    pub fn effective_maturity(&self, as_of: NaiveDate, exercise_next_break: bool) -> NaiveDate {
        if exercise_next_break {
            if let Some(&next) = self.break_dates.iter().find(|&&d| d > as_of) {
                return next.min(self.maturity);
            }
        }
        self.maturity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_break_dates_sorted() {
        let trade = Trade::new("T".into(), "NS".into(), date(2030, 1, 1))
            .with_break_dates([date(2028, 1, 1), date(2026, 1, 1), date(2028, 1, 1)]);
        assert_eq!(trade.break_dates(), &[date(2026, 1, 1), date(2028, 1, 1)]);
    }

    #[test]
    fn test_past_break_dates_ignored() {
        let trade = Trade::new("T".into(), "NS".into(), date(2030, 1, 1))
            .with_break_dates([date(2023, 6, 1), date(2026, 1, 1)]);
        assert_eq!(
            trade.effective_maturity(date(2024, 1, 1), true),
            date(2026, 1, 1)
        );
    }

    #[test]
    fn test_no_break_dates() {
        let trade = Trade::new("T".into(), "NS".into(), date(2030, 1, 1));
        assert_eq!(
            trade.effective_maturity(date(2024, 1, 1), true),
            date(2030, 1, 1)
        );
    }
}

//! `OvernightIndex` — overnight rate index (SONIA and friends).
//!
//! An overnight rate accrues from its value date to the next business day.
//! Fixings follow the same rule as [`IborIndex`](crate::IborIndex): past
//! dates need a recorded fixing, today's uses one if present, later dates
//! are forecast off the supplied curve.

use crate::index::{FixingStore, Index};
use ql_core::{
    errors::{Error, Result},
    Natural, Rate,
};
use ql_termstructures::YieldTermStructure;
use ql_time::{BusinessDayConvention, Calendar, Date, DayCounter, Period, TimeUnit};
use std::sync::Arc;

/// An overnight rate index.
#[derive(Debug, Clone)]
pub struct OvernightIndex {
    name: String,
    fixing_days: Natural,
    calendar: Arc<dyn Calendar>,
    day_counter: Arc<dyn DayCounter>,
    fixings: FixingStore,
}

impl OvernightIndex {
    /// Create a new overnight index.
    pub fn new(
        name: impl Into<String>,
        fixing_days: Natural,
        calendar: impl Calendar + 'static,
        day_counter: impl DayCounter + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            fixing_days,
            calendar: Arc::new(calendar),
            day_counter: Arc::new(day_counter),
            fixings: FixingStore::new(),
        }
    }

    /// Always one day.
    pub fn tenor(&self) -> Period {
        Period::new(1, TimeUnit::Days)
    }

    /// Business days between fixing and value date.
    pub fn fixing_days(&self) -> Natural {
        self.fixing_days
    }

    /// Accrual day counter of the overnight rate.
    pub fn day_counter(&self) -> &dyn DayCounter {
        &*self.day_counter
    }

    /// Shared day counter, for legs that accrue on the index basis.
    pub fn day_counter_arc(&self) -> Arc<dyn DayCounter> {
        Arc::clone(&self.day_counter)
    }

    /// Shared fixing calendar.
    pub fn calendar_arc(&self) -> Arc<dyn Calendar> {
        Arc::clone(&self.calendar)
    }

    fn business_days(&self, date: Date, n: i32) -> Result<Date> {
        self.calendar
            .advance(date, n, TimeUnit::Days, BusinessDayConvention::Following, false)
    }

    /// Start of the overnight period fixed on `fixing_date`.
    pub fn value_date(&self, fixing_date: Date) -> Result<Date> {
        self.business_days(fixing_date, i32::try_from(self.fixing_days).unwrap_or(i32::MAX))
    }

    /// Next business day after `value_date`.
    pub fn maturity_date(&self, value_date: Date) -> Result<Date> {
        self.business_days(value_date, 1)
    }

    /// Project the overnight fixing for `fixing_date` off `curve`.
    pub fn forecast_fixing(&self, fixing_date: Date, curve: &dyn YieldTermStructure) -> Result<Rate> {
        let value = self.value_date(fixing_date)?;
        let maturity = self.maturity_date(value)?;
        Ok(curve.forward_rate(value, maturity, &*self.day_counter))
    }

    /// Fixing for `fixing_date` as seen on `evaluation_date`.
    ///
    /// # Errors
    /// [`Error::MissingFixing`] if the fixing date is in the past and no
    /// historical fixing was recorded.
    pub fn fixing(
        &self,
        fixing_date: Date,
        forecast_curve: &dyn YieldTermStructure,
        evaluation_date: Date,
    ) -> Result<Rate> {
        if !self.is_valid_fixing_date(fixing_date) {
            return Err(Error::InvalidArgument(format!(
                "{fixing_date} is not a valid {} fixing date",
                self.name
            )));
        }
        if fixing_date < evaluation_date {
            return self.past_fixing(fixing_date).ok_or_else(|| Error::MissingFixing {
                index: self.name.clone(),
                date: fixing_date.to_string(),
            });
        }
        if fixing_date == evaluation_date {
            if let Some(fixing) = self.past_fixing(fixing_date) {
                return Ok(fixing);
            }
        }
        self.forecast_fixing(fixing_date, forecast_curve)
    }
}

impl Index for OvernightIndex {
    fn name(&self) -> &str {
        &self.name
    }

    fn fixing_calendar(&self) -> &dyn Calendar {
        &*self.calendar
    }

    fn fixing_store(&self) -> &FixingStore {
        &self.fixings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ql_termstructures::FlatForward;
    use ql_time::{Actual360, Actual365Fixed, WeekendsOnly};

    fn date(y: u16, m: u8, d: u8) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn make_test_on() -> OvernightIndex {
        OvernightIndex::new("TEST-ON", 0, WeekendsOnly, Actual360)
    }

    #[test]
    fn overnight_period_spans_the_weekend() {
        let idx = make_test_on();
        assert_eq!(idx.tenor(), Period::new(1, TimeUnit::Days));
        // Friday fixing accrues to Monday
        let friday = date(2016, 10, 7);
        assert_eq!(idx.value_date(friday).unwrap(), friday);
        assert_eq!(idx.maturity_date(friday).unwrap(), date(2016, 10, 10));
    }

    #[test]
    fn forecast_and_history() {
        let idx = make_test_on();
        let today = date(2016, 10, 4);
        let curve = FlatForward::new(today, 0.002, Actual365Fixed);
        let tomorrow = date(2016, 10, 5);
        let expected = (curve.discount_date(tomorrow) / curve.discount_date(date(2016, 10, 6)) - 1.0)
            / Actual360.year_fraction(tomorrow, date(2016, 10, 6));
        assert_abs_diff_eq!(idx.fixing(tomorrow, &curve, today).unwrap(), expected, epsilon = 1e-15);

        let yesterday = date(2016, 10, 3);
        assert!(matches!(
            idx.fixing(yesterday, &curve, today),
            Err(Error::MissingFixing { .. })
        ));
        idx.add_fixing(yesterday, 0.0021);
        assert_eq!(idx.fixing(yesterday, &curve, today).unwrap(), 0.0021);
        assert!(matches!(
            idx.fixing(date(2016, 10, 8), &curve, today),
            Err(Error::InvalidArgument(_))
        ));
    }
}

//! `IborIndex` — interbank offered-rate index.
//!
//! A fixing on `fixing_date` is resolved against the evaluation date:
//!
//! | fixing date | source |
//! |-------------|--------|
//! | before evaluation | historical store, `MissingFixing` if absent |
//! | on evaluation | historical store if recorded, otherwise forecast |
//! | after evaluation | forecast from the supplied curve |
//!
//! The forecast is the simple forward `(P(v)/P(m) - 1) / τ(v, m)` between the
//! value date `v` and the index maturity `m`.

use crate::index::{FixingStore, Index};
use ql_core::{
    errors::{Error, Result},
    Natural, Rate,
};
use ql_termstructures::YieldTermStructure;
use ql_time::{BusinessDayConvention, Calendar, Date, DayCounter, Period, TimeUnit};
use std::sync::Arc;

/// An Interbank Offered Rate index (e.g. Euribor, GBP LIBOR).
#[derive(Debug, Clone)]
pub struct IborIndex {
    name: String,
    tenor: Period,
    fixing_days: Natural,
    calendar: Arc<dyn Calendar>,
    convention: BusinessDayConvention,
    end_of_month: bool,
    day_counter: Arc<dyn DayCounter>,
    fixings: FixingStore,
}

impl IborIndex {
    /// Create a new IBOR index.
    pub fn new(
        name: impl Into<String>,
        tenor: Period,
        fixing_days: Natural,
        calendar: impl Calendar + 'static,
        convention: BusinessDayConvention,
        end_of_month: bool,
        day_counter: impl DayCounter + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            tenor,
            fixing_days,
            calendar: Arc::new(calendar),
            convention,
            end_of_month,
            day_counter: Arc::new(day_counter),
            fixings: FixingStore::new(),
        }
    }

    /// Index tenor.
    pub fn tenor(&self) -> Period {
        self.tenor
    }

    /// Business days between fixing and value date.
    pub fn fixing_days(&self) -> Natural {
        self.fixing_days
    }

    /// Accrual day counter of the index rate.
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

    /// Convention used to roll the maturity date.
    pub fn business_day_convention(&self) -> BusinessDayConvention {
        self.convention
    }

    /// End-of-month rule for the maturity date.
    pub fn end_of_month(&self) -> bool {
        self.end_of_month
    }

    fn fixing_days_signed(&self) -> i32 {
        i32::try_from(self.fixing_days).unwrap_or(i32::MAX)
    }

    /// Fixing date for an accrual period starting on `value_date`.
    pub fn fixing_date(&self, value_date: Date) -> Result<Date> {
        self.calendar.advance(
            value_date,
            -self.fixing_days_signed(),
            TimeUnit::Days,
            BusinessDayConvention::Following,
            false,
        )
    }

    /// Start of the deposit period fixed on `fixing_date`.
    pub fn value_date(&self, fixing_date: Date) -> Result<Date> {
        self.calendar.advance(
            fixing_date,
            self.fixing_days_signed(),
            TimeUnit::Days,
            BusinessDayConvention::Following,
            false,
        )
    }

    /// End of the deposit period starting on `value_date`.
    pub fn maturity_date(&self, value_date: Date) -> Result<Date> {
        self.calendar
            .advance_period(value_date, self.tenor, self.convention, self.end_of_month)
    }

    /// Project the fixing for `fixing_date` off `curve`.
    pub fn forecast_fixing(&self, fixing_date: Date, curve: &dyn YieldTermStructure) -> Result<Rate> {
        let value = self.value_date(fixing_date)?;
        let maturity = self.maturity_date(value)?;
        let tau = self.day_counter.year_fraction(value, maturity);
        if tau <= 0.0 {
            return Err(Error::Precondition(format!(
                "{}: non-positive accrual between {value} and {maturity}",
                self.name
            )));
        }
        Ok((curve.discount_date(value) / curve.discount_date(maturity) - 1.0) / tau)
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

impl Index for IborIndex {
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

//! Ibor coupons and the floating leg builder.
//!
//! The coupon rate is the index fixing plus a spread. The fixing date is the
//! accrual start moved back by the index fixing days on the index calendar.

use crate::cashflow::{CashFlow, FixingContext, Leg};
use crate::coupon::Coupon;
use ql_core::{errors::Result, Real, Spread};
use ql_indexes::IborIndex;
use ql_time::{BusinessDayConvention, Calendar, Date, DayCounter, NullCalendar, Schedule};
use std::sync::Arc;

// ────────────────────────────────────────────────────────────────────────────
// IborCoupon
// ────────────────────────────────────────────────────────────────────────────

/// A floating-rate coupon linked to an [`IborIndex`].
///
///   `amount = nominal * (fixing + spread) * accrual_period`
#[derive(Debug, Clone)]
pub struct IborCoupon {
    nominal: Real,
    payment_date: Date,
    accrual_start: Date,
    accrual_end: Date,
    fixing_date: Date,
    spread: Spread,
    day_counter: Arc<dyn DayCounter>,
    accrual_period: Real,
    index: Arc<IborIndex>,
}

impl IborCoupon {
    /// Create a new Ibor coupon accruing on `day_counter`.
    pub fn new(
        payment_date: Date,
        nominal: Real,
        accrual_start: Date,
        accrual_end: Date,
        index: Arc<IborIndex>,
        spread: Spread,
        day_counter: Arc<dyn DayCounter>,
    ) -> Result<Self> {
        let fixing_date = index.fixing_date(accrual_start)?;
        let accrual_period = day_counter.year_fraction(accrual_start, accrual_end);
        Ok(Self {
            nominal,
            payment_date,
            accrual_start,
            accrual_end,
            fixing_date,
            spread,
            day_counter,
            accrual_period,
            index,
        })
    }

    /// The fixing date for this coupon.
    pub fn fixing_date(&self) -> Date {
        self.fixing_date
    }

    /// The spread over the index.
    pub fn spread(&self) -> Spread {
        self.spread
    }

    /// The underlying index.
    pub fn ibor_index(&self) -> &IborIndex {
        &self.index
    }

    /// The index fixing, historical or forecast.
    pub fn index_fixing(&self, ctx: &FixingContext<'_>) -> Result<Real> {
        self.index
            .fixing(self.fixing_date, ctx.forecast, ctx.evaluation_date)
    }

    /// End of the index deposit period observed by this coupon.
    pub fn fixing_maturity_date(&self) -> Result<Date> {
        let value = self.index.value_date(self.fixing_date)?;
        self.index.maturity_date(value)
    }
}

impl CashFlow for IborCoupon {
    fn date(&self) -> Date {
        self.payment_date
    }

    fn amount(&self, ctx: &FixingContext<'_>) -> Result<Real> {
        Ok(self.nominal * self.rate(ctx)? * self.accrual_period)
    }
}

impl Coupon for IborCoupon {
    fn nominal(&self) -> Real {
        self.nominal
    }

    fn accrual_start_date(&self) -> Date {
        self.accrual_start
    }

    fn accrual_end_date(&self) -> Date {
        self.accrual_end
    }

    fn accrual_period(&self) -> Real {
        self.accrual_period
    }

    fn day_counter(&self) -> &dyn DayCounter {
        &*self.day_counter
    }

    fn rate(&self, ctx: &FixingContext<'_>) -> Result<Real> {
        Ok(self.index_fixing(ctx)? + self.spread)
    }

    fn latest_relevant_date(&self) -> Result<Date> {
        Ok(self.payment_date.max(self.fixing_maturity_date()?))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Ibor leg builder
// ────────────────────────────────────────────────────────────────────────────

/// Build a floating-rate leg from a schedule and an Ibor index.
///
/// Coupons accrue on the index day counter unless overridden.
pub struct IborLegBuilder<'a> {
    schedule: &'a Schedule,
    index: Arc<IborIndex>,
    notional: Real,
    spread: Spread,
    day_counter: Option<Arc<dyn DayCounter>>,
    payment_calendar: Arc<dyn Calendar>,
    payment_convention: BusinessDayConvention,
}

impl<'a> IborLegBuilder<'a> {
    /// Create a builder from a schedule and an index.
    pub fn new(schedule: &'a Schedule, index: Arc<IborIndex>) -> Self {
        Self {
            schedule,
            index,
            notional: 1.0,
            spread: 0.0,
            day_counter: None,
            payment_calendar: Arc::new(NullCalendar),
            payment_convention: BusinessDayConvention::Unadjusted,
        }
    }

    /// Set the notional.
    pub fn with_notional(mut self, notional: Real) -> Self {
        self.notional = notional;
        self
    }

    /// Set the spread over the index.
    pub fn with_spread(mut self, spread: Spread) -> Self {
        self.spread = spread;
        self
    }

    /// Override the accrual day counter.
    pub fn with_day_counter(mut self, dc: Arc<dyn DayCounter>) -> Self {
        self.day_counter = Some(dc);
        self
    }

    /// Adjust payment dates with `calendar` and `convention`.
    pub fn with_payment_adjustment(
        mut self,
        calendar: Arc<dyn Calendar>,
        convention: BusinessDayConvention,
    ) -> Self {
        self.payment_calendar = calendar;
        self.payment_convention = convention;
        self
    }

    /// Build the leg.
    pub fn build(self) -> Result<Leg> {
        let dc = self
            .day_counter
            .clone()
            .unwrap_or_else(|| self.index.day_counter_arc());
        self.schedule
            .periods()
            .map(|(start, end)| {
                let payment = self.payment_calendar.adjust(end, self.payment_convention);
                let coupon = IborCoupon::new(
                    payment,
                    self.notional,
                    start,
                    end,
                    Arc::clone(&self.index),
                    self.spread,
                    Arc::clone(&dc),
                )?;
                Ok(Arc::new(coupon) as Arc<dyn Coupon>)
            })
            .collect()
    }
}

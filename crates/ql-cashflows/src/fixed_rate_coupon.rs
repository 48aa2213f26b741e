//! Fixed-rate coupons and leg builders.

use crate::cashflow::{CashFlow, FixingContext, Leg};
use crate::coupon::Coupon;
use ql_core::{errors::Result, Rate, Real};
use ql_time::{
    Actual365Fixed, BusinessDayConvention, Calendar, Date, DayCounter, NullCalendar, Schedule,
};
use std::sync::Arc;

/// A coupon paying a simply-compounded fixed rate.
#[derive(Debug, Clone)]
pub struct FixedRateCoupon {
    nominal: Real,
    payment_date: Date,
    rate: Rate,
    accrual_start: Date,
    accrual_end: Date,
    day_counter: Arc<dyn DayCounter>,
    accrual_period: Real,
}

impl FixedRateCoupon {
    /// Create a new fixed-rate coupon.
    pub fn new(
        payment_date: Date,
        nominal: Real,
        rate: Rate,
        accrual_start: Date,
        accrual_end: Date,
        day_counter: Arc<dyn DayCounter>,
    ) -> Self {
        let accrual_period = day_counter.year_fraction(accrual_start, accrual_end);
        Self {
            nominal,
            payment_date,
            rate,
            accrual_start,
            accrual_end,
            day_counter,
            accrual_period,
        }
    }

    /// The fixed rate.
    pub fn fixed_rate(&self) -> Rate {
        self.rate
    }
}

impl CashFlow for FixedRateCoupon {
    fn date(&self) -> Date {
        self.payment_date
    }

    fn amount(&self, _ctx: &FixingContext<'_>) -> Result<Real> {
        Ok(self.nominal * self.rate * self.accrual_period)
    }
}

impl Coupon for FixedRateCoupon {
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

    fn rate(&self, _ctx: &FixingContext<'_>) -> Result<Real> {
        Ok(self.rate)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Fixed-rate leg builder
// ────────────────────────────────────────────────────────────────────────────

/// Build a fixed-rate leg from a schedule and rate.
///
/// Payment dates are the accrual end dates adjusted with the payment
/// calendar and convention (unadjusted by default).
pub struct FixedRateLegBuilder<'a> {
    schedule: &'a Schedule,
    notional: Real,
    coupon_rate: Rate,
    day_counter: Arc<dyn DayCounter>,
    payment_calendar: Arc<dyn Calendar>,
    payment_convention: BusinessDayConvention,
}

impl<'a> FixedRateLegBuilder<'a> {
    /// Create a new builder from a schedule.
    pub fn new(schedule: &'a Schedule) -> Self {
        Self {
            schedule,
            notional: 1.0,
            coupon_rate: 0.0,
            day_counter: Arc::new(Actual365Fixed),
            payment_calendar: Arc::new(NullCalendar),
            payment_convention: BusinessDayConvention::Unadjusted,
        }
    }

    /// Set the notional.
    pub fn with_notional(mut self, notional: Real) -> Self {
        self.notional = notional;
        self
    }

    /// Set the coupon rate.
    pub fn with_coupon_rate(mut self, rate: Rate) -> Self {
        self.coupon_rate = rate;
        self
    }

    /// Set the accrual day counter.
    pub fn with_day_counter(mut self, dc: Arc<dyn DayCounter>) -> Self {
        self.day_counter = dc;
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
    pub fn build(self) -> Leg {
        self.schedule
            .periods()
            .map(|(start, end)| {
                let payment = self.payment_calendar.adjust(end, self.payment_convention);
                Arc::new(FixedRateCoupon::new(
                    payment,
                    self.notional,
                    self.coupon_rate,
                    start,
                    end,
                    Arc::clone(&self.day_counter),
                )) as Arc<dyn Coupon>
            })
            .collect()
    }
}

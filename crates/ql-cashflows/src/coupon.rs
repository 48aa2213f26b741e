//! `Coupon` trait — base for all interest-rate coupons.
//!
//! A coupon accrues interest over `[accrual_start, accrual_end)` and pays on
//! its payment date.

use crate::cashflow::{CashFlow, FixingContext};
use ql_core::{errors::Result, Real};
use ql_time::{Date, DayCounter};

/// Base trait for interest-rate coupons.
pub trait Coupon: CashFlow {
    /// The notional amount.
    fn nominal(&self) -> Real;

    /// Start of the accrual period.
    fn accrual_start_date(&self) -> Date;

    /// End of the accrual period.
    fn accrual_end_date(&self) -> Date;

    /// The accrual period in year-fraction units.
    fn accrual_period(&self) -> Real;

    /// The day counter used for accrual.
    fn day_counter(&self) -> &dyn DayCounter;

    /// The annualized rate of the coupon.
    fn rate(&self, ctx: &FixingContext<'_>) -> Result<Real>;

    /// Latest date the coupon's value depends on (payment date, or the end
    /// of the underlying index period if later).
    fn latest_relevant_date(&self) -> Result<Date> {
        Ok(self.date())
    }
}

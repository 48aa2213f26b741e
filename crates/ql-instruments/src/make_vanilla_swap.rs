//! `MakeVanillaSwap` — builds a [`VanillaSwap`] from a tenor and an index.
//!
//! Unless overridden, the swap starts `settlement_days` index business days
//! after the reference date (plus an optional forward start), the floating
//! leg takes its tenor, convention and day counter from the index, and
//! payments are adjusted with the floating leg convention.

use crate::swap::{SwapType, VanillaSwap};
use ql_core::{errors::Result, Natural, Rate, Real, Spread};
use ql_indexes::IborIndex;
use ql_time::{
    Actual365Fixed, BusinessDayConvention, Calendar, Date, DateGeneration, DayCounter, Period,
    ScheduleBuilder, TimeUnit,
};
use std::sync::Arc;

/// Builder for a fixed-for-floating swap.
#[derive(Debug, Clone)]
pub struct MakeVanillaSwap {
    swap_tenor: Period,
    index: Arc<IborIndex>,
    fixed_rate: Rate,
    forward_start: Period,
    reference_date: Option<Date>,
    effective_date: Option<Date>,
    termination_date: Option<Date>,
    settlement_days: Option<Natural>,
    swap_type: SwapType,
    nominal: Real,
    spread: Spread,
    calendar: Option<Arc<dyn Calendar>>,
    fixed_tenor: Period,
    fixed_convention: BusinessDayConvention,
    fixed_termination_convention: BusinessDayConvention,
    fixed_rule: DateGeneration,
    fixed_day_counter: Arc<dyn DayCounter>,
    floating_tenor: Option<Period>,
    floating_convention: Option<BusinessDayConvention>,
    floating_termination_convention: Option<BusinessDayConvention>,
    floating_rule: DateGeneration,
    floating_day_counter: Option<Arc<dyn DayCounter>>,
    end_of_month: bool,
}

impl MakeVanillaSwap {
    /// Start a swap of length `swap_tenor` on `index`, paying `fixed_rate`,
    /// starting `forward_start` after spot.
    pub fn new(swap_tenor: Period, index: Arc<IborIndex>, fixed_rate: Rate, forward_start: Period) -> Self {
        Self {
            swap_tenor,
            index,
            fixed_rate,
            forward_start,
            reference_date: None,
            effective_date: None,
            termination_date: None,
            settlement_days: None,
            swap_type: SwapType::Payer,
            nominal: 1.0,
            spread: 0.0,
            calendar: None,
            fixed_tenor: Period::years(1),
            fixed_convention: BusinessDayConvention::ModifiedFollowing,
            fixed_termination_convention: BusinessDayConvention::ModifiedFollowing,
            fixed_rule: DateGeneration::Backward,
            fixed_day_counter: Arc::new(Actual365Fixed),
            floating_tenor: None,
            floating_convention: None,
            floating_termination_convention: None,
            floating_rule: DateGeneration::Backward,
            floating_day_counter: None,
            end_of_month: false,
        }
    }

    /// Fixed leg coupon rate.
    pub fn with_fixed_rate(mut self, rate: Rate) -> Self {
        self.fixed_rate = rate;
        self
    }

    /// Date spot is measured from (the evaluation date).
    pub fn with_reference_date(mut self, date: Date) -> Self {
        self.reference_date = Some(date);
        self
    }

    /// Explicit start date; overrides spot and forward start.
    pub fn with_effective_date(mut self, date: Date) -> Self {
        self.effective_date = Some(date);
        self
    }

    /// Explicit end date; overrides the swap tenor.
    pub fn with_termination_date(mut self, date: Date) -> Self {
        self.termination_date = Some(date);
        self
    }

    /// Business days from the reference date to spot (index fixing days by default).
    pub fn with_settlement_days(mut self, days: Natural) -> Self {
        self.settlement_days = Some(days);
        self
    }

    /// Receive fixed instead of paying it.
    pub fn receive_fixed(mut self, flag: bool) -> Self {
        self.swap_type = if flag { SwapType::Receiver } else { SwapType::Payer };
        self
    }

    /// Payer or receiver.
    pub fn with_type(mut self, swap_type: SwapType) -> Self {
        self.swap_type = swap_type;
        self
    }

    /// Notional of both legs.
    pub fn with_nominal(mut self, nominal: Real) -> Self {
        self.nominal = nominal;
        self
    }

    /// Spread over the floating index.
    pub fn with_floating_leg_spread(mut self, spread: Spread) -> Self {
        self.spread = spread;
        self
    }

    /// Calendar of both schedules and of payment adjustment (index calendar by default).
    pub fn with_calendar(mut self, calendar: Arc<dyn Calendar>) -> Self {
        self.calendar = Some(calendar);
        self
    }

    /// Fixed coupon frequency as a period.
    pub fn with_fixed_leg_tenor(mut self, tenor: Period) -> Self {
        self.fixed_tenor = tenor;
        self
    }

    /// Fixed schedule convention.
    pub fn with_fixed_leg_convention(mut self, c: BusinessDayConvention) -> Self {
        self.fixed_convention = c;
        self
    }

    /// Fixed schedule termination-date convention.
    pub fn with_fixed_leg_termination_date_convention(mut self, c: BusinessDayConvention) -> Self {
        self.fixed_termination_convention = c;
        self
    }

    /// Fixed schedule generation rule.
    pub fn with_fixed_leg_rule(mut self, rule: DateGeneration) -> Self {
        self.fixed_rule = rule;
        self
    }

    /// Fixed leg accrual day counter.
    pub fn with_fixed_leg_day_count(mut self, dc: Arc<dyn DayCounter>) -> Self {
        self.fixed_day_counter = dc;
        self
    }

    /// Floating coupon frequency as a period (index tenor by default).
    pub fn with_floating_leg_tenor(mut self, tenor: Period) -> Self {
        self.floating_tenor = Some(tenor);
        self
    }

    /// Floating schedule convention (index convention by default).
    pub fn with_floating_leg_convention(mut self, c: BusinessDayConvention) -> Self {
        self.floating_convention = Some(c);
        self
    }

    /// Floating schedule termination-date convention.
    pub fn with_floating_leg_termination_date_convention(mut self, c: BusinessDayConvention) -> Self {
        self.floating_termination_convention = Some(c);
        self
    }

    /// Floating schedule generation rule.
    pub fn with_floating_leg_rule(mut self, rule: DateGeneration) -> Self {
        self.floating_rule = rule;
        self
    }

    /// Floating leg accrual day counter (index day counter by default).
    pub fn with_floating_leg_day_count(mut self, dc: Arc<dyn DayCounter>) -> Self {
        self.floating_day_counter = Some(dc);
        self
    }

    /// End-of-month rule for both schedules.
    pub fn with_end_of_month(mut self, flag: bool) -> Self {
        self.end_of_month = flag;
        self
    }

    fn start_date(&self) -> Result<Date> {
        if let Some(d) = self.effective_date {
            return Ok(d);
        }
        let reference = self.reference_date.ok_or_else(|| {
            ql_core::Error::Precondition(
                "a reference date or an effective date is required".into(),
            )
        })?;
        let fixing_calendar = self.index.calendar_arc();
        let days = self.settlement_days.unwrap_or_else(|| self.index.fixing_days());
        let spot = fixing_calendar.advance(
            fixing_calendar.adjust(reference, BusinessDayConvention::Following),
            i32::try_from(days).unwrap_or(i32::MAX),
            TimeUnit::Days,
            BusinessDayConvention::Following,
            false,
        )?;
        let start = spot.advance(self.forward_start.length, self.forward_start.unit)?;
        Ok(match self.forward_start.length {
            0 => start,
            n if n < 0 => fixing_calendar.adjust(start, BusinessDayConvention::Preceding),
            _ => fixing_calendar.adjust(start, BusinessDayConvention::Following),
        })
    }

    /// Build the swap.
    pub fn build(self) -> Result<VanillaSwap> {
        let start = self.start_date()?;
        let end = match self.termination_date {
            Some(d) => d,
            None => start.advance(self.swap_tenor.length, self.swap_tenor.unit)?,
        };
        let calendar = self.calendar.clone().unwrap_or_else(|| self.index.calendar_arc());

        let fixed_schedule = ScheduleBuilder::new(start, end, self.fixed_tenor, &*calendar)
            .with_convention(self.fixed_convention)
            .with_termination_convention(self.fixed_termination_convention)
            .with_rule(self.fixed_rule)
            .end_of_month(self.end_of_month)
            .build()?;

        let floating_convention = self
            .floating_convention
            .unwrap_or_else(|| self.index.business_day_convention());
        let floating_schedule = ScheduleBuilder::new(
            start,
            end,
            self.floating_tenor.unwrap_or_else(|| self.index.tenor()),
            &*calendar,
        )
        .with_convention(floating_convention)
        .with_termination_convention(
            self.floating_termination_convention.unwrap_or(floating_convention),
        )
        .with_rule(self.floating_rule)
        .end_of_month(self.end_of_month)
        .build()?;

        let floating_day_counter = self
            .floating_day_counter
            .clone()
            .unwrap_or_else(|| self.index.day_counter_arc());

        VanillaSwap::new(
            self.swap_type,
            self.nominal,
            fixed_schedule,
            self.fixed_rate,
            self.fixed_day_counter,
            floating_schedule,
            self.index,
            self.spread,
            floating_day_counter,
            calendar,
            floating_convention,
        )
    }
}

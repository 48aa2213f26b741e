//! Fixed-for-floating interest-rate swaps.

use ql_cashflows::{FixedRateLegBuilder, IborLegBuilder, Leg};
use ql_core::{errors::Result, Rate, Real, Spread};
use ql_indexes::IborIndex;
use ql_time::{BusinessDayConvention, Calendar, Date, DayCounter, Schedule};
use std::fmt;
use std::sync::Arc;

/// Swap type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SwapType {
    /// Payer (pay fixed, receive floating).
    Payer,
    /// Receiver (receive fixed, pay floating).
    Receiver,
}

impl SwapType {
    /// +1 for Payer, −1 for Receiver.
    pub fn sign(self) -> Real {
        match self {
            SwapType::Payer => 1.0,
            SwapType::Receiver => -1.0,
        }
    }

    /// The opposite side.
    pub fn opposite(self) -> Self {
        match self {
            SwapType::Payer => SwapType::Receiver,
            SwapType::Receiver => SwapType::Payer,
        }
    }
}

impl fmt::Display for SwapType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SwapType::Payer => "payer",
            SwapType::Receiver => "receiver",
        })
    }
}

/// A standard fixed-for-floating interest rate swap.
///
/// Both legs share the same constant notional. Payment dates are the accrual
/// end dates adjusted with the payment calendar and convention.
#[derive(Debug, Clone)]
pub struct VanillaSwap {
    swap_type: SwapType,
    nominal: Real,
    fixed_rate: Rate,
    spread: Spread,
    fixed_schedule: Schedule,
    floating_schedule: Schedule,
    index: Arc<IborIndex>,
    fixed_leg: Leg,
    floating_leg: Leg,
}

impl VanillaSwap {
    /// Create a new vanilla swap.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        swap_type: SwapType,
        nominal: Real,
        fixed_schedule: Schedule,
        fixed_rate: Rate,
        fixed_day_counter: Arc<dyn DayCounter>,
        floating_schedule: Schedule,
        index: Arc<IborIndex>,
        spread: Spread,
        floating_day_counter: Arc<dyn DayCounter>,
        payment_calendar: Arc<dyn Calendar>,
        payment_convention: BusinessDayConvention,
    ) -> Result<Self> {
        let fixed_leg = FixedRateLegBuilder::new(&fixed_schedule)
            .with_notional(nominal)
            .with_coupon_rate(fixed_rate)
            .with_day_counter(fixed_day_counter)
            .with_payment_adjustment(Arc::clone(&payment_calendar), payment_convention)
            .build();
        let floating_leg = IborLegBuilder::new(&floating_schedule, Arc::clone(&index))
            .with_notional(nominal)
            .with_spread(spread)
            .with_day_counter(floating_day_counter)
            .with_payment_adjustment(payment_calendar, payment_convention)
            .build()?;

        Ok(Self {
            swap_type,
            nominal,
            fixed_rate,
            spread,
            fixed_schedule,
            floating_schedule,
            index,
            fixed_leg,
            floating_leg,
        })
    }

    /// Payer or receiver.
    pub fn swap_type(&self) -> SwapType {
        self.swap_type
    }

    /// Notional of both legs.
    pub fn nominal(&self) -> Real {
        self.nominal
    }

    /// Fixed leg coupon rate.
    pub fn fixed_rate(&self) -> Rate {
        self.fixed_rate
    }

    /// Spread over the floating index.
    pub fn spread(&self) -> Spread {
        self.spread
    }

    /// Fixed leg accrual schedule.
    pub fn fixed_schedule(&self) -> &Schedule {
        &self.fixed_schedule
    }

    /// Floating leg accrual schedule.
    pub fn floating_schedule(&self) -> &Schedule {
        &self.floating_schedule
    }

    /// Floating leg index.
    pub fn index(&self) -> &Arc<IborIndex> {
        &self.index
    }

    /// Fixed leg coupons.
    pub fn fixed_leg(&self) -> &Leg {
        &self.fixed_leg
    }

    /// Floating leg coupons.
    pub fn floating_leg(&self) -> &Leg {
        &self.floating_leg
    }

    /// Sign applied to the fixed leg's value: −1 when paying fixed.
    pub fn fixed_leg_sign(&self) -> Real {
        -self.swap_type.sign()
    }

    /// Sign applied to the floating leg's value: +1 when receiving floating.
    pub fn floating_leg_sign(&self) -> Real {
        self.swap_type.sign()
    }

    /// Start of the earliest accrual period.
    pub fn start_date(&self) -> Date {
        self.fixed_schedule
            .start_date()
            .min(self.floating_schedule.start_date())
    }

    /// Last payment date over both legs.
    pub fn maturity_date(&self) -> Date {
        let last = |leg: &Leg| ql_cashflows::maturity_date(leg);
        match (last(&self.fixed_leg), last(&self.floating_leg)) {
            (Some(a), Some(b)) => a.max(b),
            (Some(a), None) | (None, Some(a)) => a,
            (None, None) => self.fixed_schedule.end_date(),
        }
    }

    /// Latest date the swap's value depends on: the last payment date or the
    /// last index maturity, whichever is later.
    pub fn latest_relevant_date(&self) -> Result<Date> {
        let float = ql_cashflows::latest_relevant_date(&self.floating_leg)?;
        Ok(float.map_or(self.maturity_date(), |d| d.max(self.maturity_date())))
    }

    /// The same swap on the other side.
    pub fn reversed(&self) -> Self {
        Self {
            swap_type: self.swap_type.opposite(),
            ..self.clone()
        }
    }
}

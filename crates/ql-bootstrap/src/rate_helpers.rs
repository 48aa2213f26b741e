//! Rate helpers for curve bootstrapping.
//!
//! A *rate helper* ties a market quote to the conventions that turn it into
//! a constraint on the curve at one *pillar date*. The bootstrap moves the
//! discount factor at the pillar until [`RateHelper::quote_error`] vanishes.
//!
//! | helper | quote | implied quote |
//! |--------|-------|---------------|
//! | deposit | simple rate | `(P(s)/P(m) - 1) / τ(s, m)` |
//! | futures | price | `100 · (1 - F(imm, m))` |
//! | FRA | simple rate | `(P(s)/P(m) - 1) / τ(s, m)` |
//! | OIS | par rate | `(P(s) - P(m)) / Σ τ_i P(t_i)` |
//! | swap | par rate | fair fixed rate of the underlying swap |

use ql_core::{ensure, errors::Result, Natural, Rate, Real};
use ql_indexes::{IborIndex, OvernightIndex};
use ql_instruments::{MakeVanillaSwap, VanillaSwap};
use ql_pricingengines::SwapValuator;
use ql_quotes::QuoteHandle;
use ql_termstructures::YieldTermStructure;
use ql_time::{
    BusinessDayConvention, Calendar, Date, DayCounter, Period, Schedule, ScheduleBuilder, TimeUnit,
    IMM,
};
use std::fmt;
use std::sync::Arc;

/// Spot date: `days` business days after the (adjusted) evaluation date.
fn spot_date(calendar: &dyn Calendar, evaluation_date: Date, days: Natural) -> Result<Date> {
    calendar.advance(
        evaluation_date,
        i32::try_from(days).unwrap_or(i32::MAX),
        TimeUnit::Days,
        BusinessDayConvention::Following,
        false,
    )
}

// ── RateHelper trait ──────────────────────────────────────────────────────────

/// A market quote that constrains the curve at a pillar date.
pub trait RateHelper: fmt::Debug + Send + Sync {
    /// The date up to which this helper constrains the curve.
    fn pillar_date(&self) -> Date;

    /// Handle to the market quote.
    fn quote(&self) -> &QuoteHandle;

    /// The quote implied by `curve`.
    fn implied_quote(&self, curve: &dyn YieldTermStructure, evaluation_date: Date) -> Result<Real>;

    /// `implied_quote - quote`; zero on a calibrated curve.
    fn quote_error(&self, curve: &dyn YieldTermStructure, evaluation_date: Date) -> Result<Real> {
        Ok(self.implied_quote(curve, evaluation_date)? - self.quote().value()?)
    }
}

// ── DepositRateHelper ─────────────────────────────────────────────────────────

/// A money-market deposit from spot to spot + tenor.
#[derive(Debug, Clone)]
pub struct DepositRateHelper {
    quote: QuoteHandle,
    start_date: Date,
    maturity_date: Date,
    day_counter: Arc<dyn DayCounter>,
}

impl DepositRateHelper {
    /// Create a deposit helper from a tenor and conventions.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        quote: QuoteHandle,
        tenor: Period,
        settlement_days: Natural,
        calendar: &dyn Calendar,
        convention: BusinessDayConvention,
        end_of_month: bool,
        day_counter: Arc<dyn DayCounter>,
        evaluation_date: Date,
    ) -> Result<Self> {
        let start_date = spot_date(calendar, evaluation_date, settlement_days)?;
        let maturity_date = calendar.advance_period(start_date, tenor, convention, end_of_month)?;
        Ok(Self {
            quote,
            start_date,
            maturity_date,
            day_counter,
        })
    }

    /// Start of the deposit.
    pub fn start_date(&self) -> Date {
        self.start_date
    }

    /// Maturity of the deposit.
    pub fn maturity_date(&self) -> Date {
        self.maturity_date
    }
}

impl RateHelper for DepositRateHelper {
    fn pillar_date(&self) -> Date {
        self.maturity_date
    }

    fn quote(&self) -> &QuoteHandle {
        &self.quote
    }

    fn implied_quote(&self, curve: &dyn YieldTermStructure, _evaluation_date: Date) -> Result<Real> {
        Ok(curve.forward_rate(self.start_date, self.maturity_date, &*self.day_counter))
    }
}

// ── FuturesRateHelper ─────────────────────────────────────────────────────────

/// A short-rate future starting on an IMM date, quoted as a price.
///
/// The underlying period follows the index conventions; no convexity
/// adjustment is applied.
#[derive(Debug, Clone)]
pub struct FuturesRateHelper {
    quote: QuoteHandle,
    imm_date: Date,
    maturity_date: Date,
    day_counter: Arc<dyn DayCounter>,
}

impl FuturesRateHelper {
    /// Create a futures helper on `imm_date` for the period of `index`.
    pub fn new(quote: QuoteHandle, imm_date: Date, index: &IborIndex) -> Result<Self> {
        ensure!(
            IMM::is_imm_date(imm_date, false),
            "{imm_date} is not an IMM date"
        );
        let maturity_date = index.maturity_date(imm_date)?;
        Ok(Self {
            quote,
            imm_date,
            maturity_date,
            day_counter: index.day_counter_arc(),
        })
    }

    /// Start of the underlying period.
    pub fn imm_date(&self) -> Date {
        self.imm_date
    }

    /// End of the underlying period.
    pub fn maturity_date(&self) -> Date {
        self.maturity_date
    }
}

impl RateHelper for FuturesRateHelper {
    fn pillar_date(&self) -> Date {
        self.maturity_date
    }

    fn quote(&self) -> &QuoteHandle {
        &self.quote
    }

    fn implied_quote(&self, curve: &dyn YieldTermStructure, _evaluation_date: Date) -> Result<Real> {
        let forward = curve.forward_rate(self.imm_date, self.maturity_date, &*self.day_counter);
        Ok(100.0 * (1.0 - forward))
    }
}

// ── FraRateHelper ─────────────────────────────────────────────────────────────

/// A forward-rate agreement `start x end` months from spot.
#[derive(Debug, Clone)]
pub struct FraRateHelper {
    quote: QuoteHandle,
    start_date: Date,
    maturity_date: Date,
    day_counter: Arc<dyn DayCounter>,
}

impl FraRateHelper {
    /// Create a FRA helper on the calendar and conventions of `index`.
    pub fn new(
        quote: QuoteHandle,
        months_to_start: u32,
        months_to_end: u32,
        index: &IborIndex,
        evaluation_date: Date,
    ) -> Result<Self> {
        ensure!(
            months_to_end > months_to_start,
            "FRA end ({months_to_end}M) must be after its start ({months_to_start}M)"
        );
        let calendar = index.calendar_arc();
        let spot = spot_date(&*calendar, evaluation_date, index.fixing_days())?;
        let convention = index.business_day_convention();
        let eom = index.end_of_month();
        let to_months = |m: u32| i32::try_from(m).unwrap_or(i32::MAX);
        let start_date =
            calendar.advance(spot, to_months(months_to_start), TimeUnit::Months, convention, eom)?;
        let maturity_date = calendar.advance(
            start_date,
            to_months(months_to_end - months_to_start),
            TimeUnit::Months,
            convention,
            eom,
        )?;
        Ok(Self {
            quote,
            start_date,
            maturity_date,
            day_counter: index.day_counter_arc(),
        })
    }

    /// Start of the forward period.
    pub fn start_date(&self) -> Date {
        self.start_date
    }

    /// End of the forward period.
    pub fn maturity_date(&self) -> Date {
        self.maturity_date
    }
}

impl RateHelper for FraRateHelper {
    fn pillar_date(&self) -> Date {
        self.maturity_date
    }

    fn quote(&self) -> &QuoteHandle {
        &self.quote
    }

    fn implied_quote(&self, curve: &dyn YieldTermStructure, _evaluation_date: Date) -> Result<Real> {
        Ok(curve.forward_rate(self.start_date, self.maturity_date, &*self.day_counter))
    }
}

// ── SwapRateHelper ────────────────────────────────────────────────────────────

/// A spot-starting par swap against an Ibor index.
///
/// The implied quote is the fair fixed rate of the underlying swap, priced
/// by [`SwapValuator`] with the trial curve for both discounting and
/// forecasting. The pillar is the swap's latest relevant date.
#[derive(Debug, Clone)]
pub struct SwapRateHelper {
    quote: QuoteHandle,
    terms: MakeVanillaSwap,
    swap: VanillaSwap,
    pillar_date: Date,
}

impl SwapRateHelper {
    /// Create a swap helper of length `tenor` on `index`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        quote: QuoteHandle,
        tenor: Period,
        index: Arc<IborIndex>,
        calendar: Arc<dyn Calendar>,
        fixed_leg_tenor: Period,
        fixed_leg_convention: BusinessDayConvention,
        fixed_leg_day_counter: Arc<dyn DayCounter>,
        evaluation_date: Date,
    ) -> Result<Self> {
        let terms = MakeVanillaSwap::new(tenor, index, 0.0, Period::months(0))
            .with_reference_date(evaluation_date)
            .with_calendar(calendar)
            .with_fixed_leg_tenor(fixed_leg_tenor)
            .with_fixed_leg_convention(fixed_leg_convention)
            .with_fixed_leg_termination_date_convention(fixed_leg_convention)
            .with_fixed_leg_day_count(fixed_leg_day_counter);
        let swap = terms.clone().build()?;
        let pillar_date = swap.latest_relevant_date()?;
        Ok(Self {
            quote,
            terms,
            swap,
            pillar_date,
        })
    }

    /// The underlying swap (fixed rate 0).
    pub fn swap(&self) -> &VanillaSwap {
        &self.swap
    }

    /// The underlying swap paying `fixed_rate`.
    pub fn swap_at(&self, fixed_rate: Rate) -> Result<VanillaSwap> {
        self.terms.clone().with_fixed_rate(fixed_rate).build()
    }
}

impl RateHelper for SwapRateHelper {
    fn pillar_date(&self) -> Date {
        self.pillar_date
    }

    fn quote(&self) -> &QuoteHandle {
        &self.quote
    }

    fn implied_quote(&self, curve: &dyn YieldTermStructure, evaluation_date: Date) -> Result<Real> {
        let result = SwapValuator::new().price_with_curves(&self.swap, curve, curve, evaluation_date)?;
        Ok(result.fair_rate)
    }
}

// ── OisRateHelper ─────────────────────────────────────────────────────────────

/// A spot-starting overnight indexed swap.
///
/// The fixed leg pays annually (once, below a year) on the index day
/// counter. Compounded overnight fixings projected off the same curve
/// telescope to `P(s) - P(m)`, so the floating leg needs no schedule.
#[derive(Debug, Clone)]
pub struct OisRateHelper {
    quote: QuoteHandle,
    schedule: Schedule,
    day_counter: Arc<dyn DayCounter>,
}

impl OisRateHelper {
    /// Create an OIS helper of length `tenor` on `index`.
    pub fn new(
        quote: QuoteHandle,
        tenor: Period,
        index: &OvernightIndex,
        settlement_days: Natural,
        evaluation_date: Date,
    ) -> Result<Self> {
        let calendar = index.calendar_arc();
        let start = spot_date(&*calendar, evaluation_date, settlement_days)?;
        let end = calendar.advance_period(start, tenor, BusinessDayConvention::ModifiedFollowing, false)?;
        let schedule = ScheduleBuilder::new(start, end, Period::years(1), &*calendar).build()?;
        Ok(Self {
            quote,
            schedule,
            day_counter: index.day_counter_arc(),
        })
    }

    /// Start of the swap.
    pub fn start_date(&self) -> Date {
        self.schedule.start_date()
    }

    /// Last payment date.
    pub fn maturity_date(&self) -> Date {
        self.schedule.end_date()
    }

    /// Fixed leg accrual dates, start included.
    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }
}

impl RateHelper for OisRateHelper {
    fn pillar_date(&self) -> Date {
        self.maturity_date()
    }

    fn quote(&self) -> &QuoteHandle {
        &self.quote
    }

    fn implied_quote(&self, curve: &dyn YieldTermStructure, _evaluation_date: Date) -> Result<Real> {
        let annuity: Real = self
            .schedule
            .periods()
            .map(|(s, e)| self.day_counter.year_fraction(s, e) * curve.discount_date(e))
            .sum();
        ensure!(
            annuity > 0.0,
            "OIS ending {} has a non-positive annuity",
            self.maturity_date()
        );
        let floating = curve.discount_date(self.start_date()) - curve.discount_date(self.maturity_date());
        Ok(floating / annuity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ql_indexes::{gbp_libor, sonia};
    use ql_termstructures::FlatForward;
    use ql_time::{Actual365Fixed, UnitedKingdom};

    fn date(y: u16, m: u8, d: u8) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn today() -> Date {
        date(2016, 10, 4)
    }

    fn libor3m() -> IborIndex {
        gbp_libor(Period::months(3))
    }

    #[test]
    fn deposit_dates_and_implied_rate() {
        let cal = UnitedKingdom::exchange();
        let d2m = DepositRateHelper::new(
            QuoteHandle::detached("D2M", 0.0030),
            Period::months(2),
            0,
            &cal,
            BusinessDayConvention::ModifiedFollowing,
            true,
            Arc::new(Actual365Fixed),
            today(),
        )
        .unwrap();
        assert_eq!(d2m.start_date(), today());
        // 4 Dec 2016 is a Sunday
        assert_eq!(d2m.pillar_date(), date(2016, 12, 5));
        let curve = FlatForward::new(today(), 0.003, Actual365Fixed);
        let implied = d2m.implied_quote(&curve, today()).unwrap();
        let tau: Real = 62.0 / 365.0;
        assert_abs_diff_eq!(implied, ((0.003 * tau).exp() - 1.0) / tau, epsilon = 1e-15);
        assert_abs_diff_eq!(
            d2m.quote_error(&curve, today()).unwrap(),
            implied - 0.0030,
            epsilon = 1e-15
        );
    }

    #[test]
    fn futures_on_imm_dates() {
        let fut = FuturesRateHelper::new(
            QuoteHandle::detached("FUT1", 99.62),
            date(2016, 12, 21),
            &libor3m(),
        )
        .unwrap();
        assert_eq!(fut.pillar_date(), date(2017, 3, 21));
        let curve = FlatForward::new(today(), 0.0, Actual365Fixed);
        assert_abs_diff_eq!(fut.implied_quote(&curve, today()).unwrap(), 100.0, epsilon = 1e-12);

        let not_imm = FuturesRateHelper::new(
            QuoteHandle::detached("FUT1", 99.62),
            date(2016, 12, 20),
            &libor3m(),
        );
        assert!(not_imm.is_err());
    }

    #[test]
    fn fra_period_from_spot() {
        let fra = FraRateHelper::new(QuoteHandle::detached("FRA3X6", 0.0037), 3, 6, &libor3m(), today())
            .unwrap();
        assert_eq!(fra.start_date(), date(2017, 1, 4));
        assert_eq!(fra.maturity_date(), date(2017, 4, 4));
        assert!(FraRateHelper::new(QuoteHandle::detached("X", 0.0), 6, 3, &libor3m(), today()).is_err());
    }

    #[test]
    fn swap_helper_implies_the_par_rate() {
        let s5y = SwapRateHelper::new(
            QuoteHandle::detached("S5Y", 0.0041),
            Period::years(5),
            Arc::new(libor3m()),
            Arc::new(UnitedKingdom::exchange()),
            Period::months(6),
            BusinessDayConvention::Unadjusted,
            Arc::new(Actual365Fixed),
            today(),
        )
        .unwrap();
        assert_eq!(s5y.swap().fixed_leg().len(), 10);
        // the last Libor period starts on 5 Jul 2021 (4 Jul is a Sunday) and
        // matures a day after the swap
        assert_eq!(s5y.swap().maturity_date(), date(2021, 10, 4));
        assert_eq!(s5y.pillar_date(), date(2021, 10, 5));

        let curve = FlatForward::new(today(), 0.01, Actual365Fixed);
        let par = s5y.implied_quote(&curve, today()).unwrap();
        let at_par = s5y.swap_at(par).unwrap();
        let r = SwapValuator::new()
            .price_with_curves(&at_par, &curve, &curve, today())
            .unwrap();
        assert_abs_diff_eq!(r.npv, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(r.fair_rate, par, epsilon = 1e-14);
    }

    #[test]
    fn ois_pays_annually_from_spot() {
        let ois18m = OisRateHelper::new(
            QuoteHandle::detached("OIS18M", 0.0022),
            Period::months(18),
            &sonia(),
            0,
            today(),
        )
        .unwrap();
        assert_eq!(
            ois18m.schedule().dates(),
            [date(2016, 10, 4), date(2017, 4, 4), date(2018, 4, 4)]
        );
        assert_eq!(ois18m.pillar_date(), date(2018, 4, 4));

        let ois1w = OisRateHelper::new(
            QuoteHandle::detached("OIS1W", 0.0021),
            Period::new(1, TimeUnit::Weeks),
            &sonia(),
            0,
            today(),
        )
        .unwrap();
        assert_eq!(ois1w.schedule().size(), 2);
        assert_eq!(ois1w.maturity_date(), date(2016, 10, 11));
    }

    #[test]
    fn ois_par_rate_on_a_flat_curve() {
        let ois1y = OisRateHelper::new(
            QuoteHandle::detached("OIS1Y", 0.0020),
            Period::years(1),
            &sonia(),
            0,
            today(),
        )
        .unwrap();
        // 365 days, so one full Act/365F year
        let curve = FlatForward::new(today(), 0.002, Actual365Fixed);
        let implied = ois1y.implied_quote(&curve, today()).unwrap();
        assert_abs_diff_eq!(implied, 0.002_f64.exp() - 1.0, epsilon = 1e-15);
        assert_abs_diff_eq!(
            ois1y.quote_error(&curve, today()).unwrap(),
            implied - 0.0020,
            epsilon = 1e-15
        );
    }
}

//! Declarative description of calibrating instruments.
//!
//! An [`InstrumentSpec`] row names an instrument kind and the quote it is
//! calibrated to; [`HelperConventions`] supplies everything else. Together
//! they produce a [`CalibratingInstrument`].

use crate::rate_helpers::{
    DepositRateHelper, FraRateHelper, FuturesRateHelper, OisRateHelper, RateHelper, SwapRateHelper,
};
use ql_core::{
    errors::{Error, Result},
    Natural, Real,
};
use ql_indexes::{gbp_libor, sonia, IborIndex, OvernightIndex};
use ql_instruments::VanillaSwap;
use ql_quotes::QuoteHandle;
use ql_time::{
    Actual365Fixed, BusinessDayConvention, Calendar, Date, DayCounter, Period, UnitedKingdom, IMM,
};
use std::fmt;
use std::sync::Arc;

// ── InstrumentKind / InstrumentSpec ───────────────────────────────────────────

/// Kind of market instrument, with its tenor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstrumentKind {
    /// Deposit from spot for `tenor`.
    Deposit {
        /// Deposit length.
        tenor: Period,
    },
    /// Future on the `imm_index`-th main-cycle IMM date after settlement (1-based).
    Future {
        /// Position in the IMM strip.
        imm_index: usize,
    },
    /// FRA `start_months x end_months` from spot.
    Fra {
        /// Months from spot to the start of the forward period.
        start_months: u32,
        /// Months from spot to its end.
        end_months: u32,
    },
    /// Spot-starting overnight indexed swap.
    Ois {
        /// Swap length.
        tenor: Period,
    },
    /// Spot-starting par swap.
    Swap {
        /// Swap length.
        tenor: Period,
    },
}

impl fmt::Display for InstrumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstrumentKind::Deposit { tenor } => write!(f, "{tenor} deposit"),
            InstrumentKind::Future { imm_index } => write!(f, "future {imm_index}"),
            InstrumentKind::Fra {
                start_months,
                end_months,
            } => write!(f, "{start_months}x{end_months} FRA"),
            InstrumentKind::Ois { tenor } => write!(f, "{tenor} OIS"),
            InstrumentKind::Swap { tenor } => write!(f, "{tenor} swap"),
        }
    }
}

/// One row of an instrument table: what to build and which quote drives it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstrumentSpec {
    /// Instrument kind and tenor.
    pub kind: InstrumentKind,
    /// Key of the quote in the quote store.
    pub quote_key: String,
}

impl InstrumentSpec {
    /// A deposit row.
    pub fn deposit(tenor: Period, quote_key: impl Into<String>) -> Self {
        Self {
            kind: InstrumentKind::Deposit { tenor },
            quote_key: quote_key.into(),
        }
    }

    /// A futures row.
    pub fn future(imm_index: usize, quote_key: impl Into<String>) -> Self {
        Self {
            kind: InstrumentKind::Future { imm_index },
            quote_key: quote_key.into(),
        }
    }

    /// A FRA row.
    pub fn fra(start_months: u32, end_months: u32, quote_key: impl Into<String>) -> Self {
        Self {
            kind: InstrumentKind::Fra {
                start_months,
                end_months,
            },
            quote_key: quote_key.into(),
        }
    }

    /// An OIS row.
    pub fn ois(tenor: Period, quote_key: impl Into<String>) -> Self {
        Self {
            kind: InstrumentKind::Ois { tenor },
            quote_key: quote_key.into(),
        }
    }

    /// A swap row.
    pub fn swap(tenor: Period, quote_key: impl Into<String>) -> Self {
        Self {
            kind: InstrumentKind::Swap { tenor },
            quote_key: quote_key.into(),
        }
    }
}

// ── HelperConventions ─────────────────────────────────────────────────────────

/// Market conventions shared by the instruments of one curve.
#[derive(Debug, Clone)]
pub struct HelperConventions {
    /// Calendar for deposits and swap schedules.
    pub calendar: Arc<dyn Calendar>,
    /// Business days from the evaluation date to deposit start.
    pub settlement_days: Natural,
    /// Deposit accrual day counter.
    pub deposit_day_counter: Arc<dyn DayCounter>,
    /// Deposit maturity adjustment.
    pub deposit_convention: BusinessDayConvention,
    /// End-of-month rule for deposits.
    pub deposit_end_of_month: bool,
    /// Index underlying futures, FRAs and the swap floating leg.
    pub float_index: Arc<IborIndex>,
    /// Overnight index of OIS floating legs.
    pub overnight_index: Arc<OvernightIndex>,
    /// Swap fixed leg coupon period.
    pub fixed_leg_tenor: Period,
    /// Swap fixed leg schedule convention.
    pub fixed_leg_convention: BusinessDayConvention,
    /// Swap fixed leg day counter.
    pub fixed_leg_day_counter: Arc<dyn DayCounter>,
}

impl HelperConventions {
    /// Sterling money-market and swap conventions: UK exchange calendar,
    /// same-day settlement, Act/365F deposits (Modified Following,
    /// end-of-month), GBP Libor 3M, semiannual unadjusted Act/365F fixed leg,
    /// SONIA for OIS.
    pub fn sterling() -> Self {
        Self {
            calendar: Arc::new(UnitedKingdom::exchange()),
            settlement_days: 0,
            deposit_day_counter: Arc::new(Actual365Fixed),
            deposit_convention: BusinessDayConvention::ModifiedFollowing,
            deposit_end_of_month: true,
            float_index: Arc::new(gbp_libor(Period::months(3))),
            overnight_index: Arc::new(sonia()),
            fixed_leg_tenor: Period::months(6),
            fixed_leg_convention: BusinessDayConvention::Unadjusted,
            fixed_leg_day_counter: Arc::new(Actual365Fixed),
        }
    }
}

// ── CalibratingInstrument ─────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Helper {
    Deposit(DepositRateHelper),
    Futures(FuturesRateHelper),
    Fra(FraRateHelper),
    Ois(OisRateHelper),
    Swap(SwapRateHelper),
}

/// A market instrument the curve is calibrated to.
///
/// Conventions are fixed at construction; only the quote behind the handle
/// may change afterwards.
#[derive(Debug, Clone)]
pub struct CalibratingInstrument {
    label: String,
    kind: InstrumentKind,
    helper: Helper,
}

impl CalibratingInstrument {
    /// Build the instrument described by `spec` as of `evaluation_date`.
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] for a zero futures position, plus any date
    /// or convention error raised while building the helper.
    pub fn new(
        spec: &InstrumentSpec,
        conventions: &HelperConventions,
        evaluation_date: Date,
        quote: QuoteHandle,
    ) -> Result<Self> {
        let key = quote.key().to_string();
        let (name, helper) = match spec.kind {
            InstrumentKind::Deposit { tenor } => {
                let h = DepositRateHelper::new(
                    quote,
                    tenor,
                    conventions.settlement_days,
                    &*conventions.calendar,
                    conventions.deposit_convention,
                    conventions.deposit_end_of_month,
                    Arc::clone(&conventions.deposit_day_counter),
                    evaluation_date,
                )?;
                (spec.kind.to_string(), Helper::Deposit(h))
            }
            InstrumentKind::Future { imm_index } => {
                if imm_index == 0 {
                    return Err(Error::InvalidArgument(format!(
                        "futures position for {key} must be at least 1"
                    )));
                }
                let imm = IMM::next_dates(evaluation_date, imm_index, true)?
                    .pop()
                    .ok_or_else(|| Error::InvalidArgument(format!("no IMM date for {key}")))?;
                let h = FuturesRateHelper::new(quote, imm, &conventions.float_index)?;
                let name = match IMM::code(imm) {
                    Some(code) => format!("{code} future"),
                    None => spec.kind.to_string(),
                };
                (name, Helper::Futures(h))
            }
            InstrumentKind::Fra {
                start_months,
                end_months,
            } => {
                let h = FraRateHelper::new(
                    quote,
                    start_months,
                    end_months,
                    &conventions.float_index,
                    evaluation_date,
                )?;
                (spec.kind.to_string(), Helper::Fra(h))
            }
            InstrumentKind::Ois { tenor } => {
                let h = OisRateHelper::new(
                    quote,
                    tenor,
                    &conventions.overnight_index,
                    conventions.settlement_days,
                    evaluation_date,
                )?;
                (spec.kind.to_string(), Helper::Ois(h))
            }
            InstrumentKind::Swap { tenor } => {
                let h = SwapRateHelper::new(
                    quote,
                    tenor,
                    Arc::clone(&conventions.float_index),
                    Arc::clone(&conventions.calendar),
                    conventions.fixed_leg_tenor,
                    conventions.fixed_leg_convention,
                    Arc::clone(&conventions.fixed_leg_day_counter),
                    evaluation_date,
                )?;
                (spec.kind.to_string(), Helper::Swap(h))
            }
        };
        Ok(Self {
            label: format!("{name} ({key})"),
            kind: spec.kind,
            helper,
        })
    }

    /// Human-readable name, e.g. `"5Y swap (S5Y)"`.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Instrument kind.
    pub fn kind(&self) -> InstrumentKind {
        self.kind
    }

    /// The rate helper that constrains the curve.
    pub fn helper(&self) -> &dyn RateHelper {
        match &self.helper {
            Helper::Deposit(h) => h,
            Helper::Futures(h) => h,
            Helper::Fra(h) => h,
            Helper::Ois(h) => h,
            Helper::Swap(h) => h,
        }
    }

    /// Key of the driving quote.
    pub fn quote_key(&self) -> &str {
        self.helper().quote().key()
    }

    /// Current value of the driving quote.
    pub fn quote(&self) -> Result<Real> {
        self.helper().quote().value()
    }

    /// Pillar date the instrument adds to the curve.
    pub fn pillar_date(&self) -> Date {
        self.helper().pillar_date()
    }

    /// Return `true` for par swaps.
    pub fn is_swap(&self) -> bool {
        matches!(self.helper, Helper::Swap(_))
    }

    /// The calibrating swap as a standalone instrument paying the quoted rate.
    ///
    /// # Errors
    /// [`Error::InvalidArgument`] if the instrument is not a swap.
    pub fn standalone_swap(&self) -> Result<VanillaSwap> {
        match &self.helper {
            Helper::Swap(h) => h.swap_at(self.quote()?),
            _ => Err(Error::InvalidArgument(format!(
                "{} is not a swap and cannot be priced standalone",
                self.label
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: u16, m: u8, d: u8) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn build(spec: InstrumentSpec, value: Real) -> CalibratingInstrument {
        let quote = QuoteHandle::detached(spec.quote_key.as_str(), value);
        CalibratingInstrument::new(&spec, &HelperConventions::sterling(), date(2016, 10, 4), quote)
            .unwrap()
    }

    #[test]
    fn labels_name_kind_and_quote() {
        assert_eq!(build(InstrumentSpec::swap(Period::years(5), "S5Y"), 0.0041).label(), "5Y swap (S5Y)");
        assert_eq!(build(InstrumentSpec::deposit(Period::months(1), "D1M"), 0.0025).label(), "1M deposit (D1M)");
        assert_eq!(build(InstrumentSpec::fra(3, 6, "FRA3X6"), 0.0037).label(), "3x6 FRA (FRA3X6)");
        assert_eq!(build(InstrumentSpec::future(1, "FUT1"), 99.62).label(), "Z6 future (FUT1)");
        assert_eq!(build(InstrumentSpec::ois(Period::years(2), "OIS2Y"), 0.0020).label(), "2Y OIS (OIS2Y)");
    }

    #[test]
    fn ois_rows_build_on_sonia() {
        let ois = build(InstrumentSpec::ois(Period::months(6), "OIS6M"), 0.0021);
        assert_eq!(ois.kind(), InstrumentKind::Ois { tenor: Period::months(6) });
        assert_eq!(ois.pillar_date(), date(2017, 4, 4));
        assert_eq!(ois.quote_key(), "OIS6M");
        assert!(!ois.is_swap());
        assert!(matches!(ois.standalone_swap(), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn futures_strip_follows_imm_dates() {
        let fut3 = build(InstrumentSpec::future(3, "FUT3"), 99.64);
        assert_eq!(fut3.pillar_date(), date(2017, 9, 21));
        let zero = CalibratingInstrument::new(
            &InstrumentSpec::future(0, "FUT0"),
            &HelperConventions::sterling(),
            date(2016, 10, 4),
            QuoteHandle::detached("FUT0", 99.0),
        );
        assert!(matches!(zero, Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn only_swaps_price_standalone() {
        let s5y = build(InstrumentSpec::swap(Period::years(5), "S5Y"), 0.0041);
        assert!(s5y.is_swap());
        let swap = s5y.standalone_swap().unwrap();
        assert_eq!(swap.fixed_rate(), 0.0041);
        assert_eq!(swap.fixed_leg().len(), 10);

        let d1m = build(InstrumentSpec::deposit(Period::months(1), "D1M"), 0.0025);
        assert!(matches!(d1m.standalone_swap(), Err(Error::InvalidArgument(_))));
    }
}

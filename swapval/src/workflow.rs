//! The revaluation run.
//!
//! One run loads the quotes, then for the base market and every configured
//! scenario rebuilds each curve composition, links it as both discounting
//! and forecasting curve, prices the Euribor swaps and reprices the check
//! swap:
//!
//! ```text
//! Uninitialized → QuotesLoaded → CurveBuilt → Linked → Priced → Verified
//!                                    ↑                             │
//!                                    └──── QuoteMutated ←──────────┘
//! ```
//!
//! Any error moves the run to `Failed`, which is absorbing.

use crate::config::{FixingEntry, MarketConfig, ScenarioEntry};
use crate::report::{ReportRow, ReportSection, ReportSink, ScenarioHeader};
use ql_bootstrap::{Composition, ConsistencyChecker, CurveBuilder, CurveInstrumentSet, HelperConventions};
use ql_core::{
    errors::{Error, Result},
    Rate, Real,
};
use ql_indexes::{euribor_months, IborIndex, Index};
use ql_instruments::{MakeVanillaSwap, VanillaSwap};
use ql_pricingengines::{SwapValuator, ValuationResult};
use ql_quotes::QuoteStore;
use ql_termstructures::{CurveRegistry, YieldTermStructure};
use ql_time::{
    ActualActualIsda, BusinessDayConvention, Calendar, Date, DateGeneration, Period, Thirty360,
    TimeUnit,
};
use std::fmt;
use std::io;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

/// Name of the unshocked scenario.
pub const BASE_SCENARIO: &str = "base";

/// Notional of the priced swaps.
pub const NOMINAL: Real = 1_000_000.0;

/// Fixed rate paid by the priced swaps.
pub const FIXED_RATE: Rate = 0.04;

// ── Run state ─────────────────────────────────────────────────────────────────

/// Where a run stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunState {
    /// Nothing loaded.
    Uninitialized,
    /// Quotes, fixings and instrument sets are in place.
    QuotesLoaded,
    /// A curve was bootstrapped.
    CurveBuilt,
    /// The registries point at the new curve.
    Linked,
    /// The swaps were priced.
    Priced,
    /// The check swap repriced to its quote.
    Verified,
    /// A scenario overwrote a quote.
    QuoteMutated,
    /// A fatal error occurred.
    Failed,
}

impl RunState {
    /// Return `true` if `next` may follow `self`.
    ///
    /// `Verified → CurveBuilt` starts the next curve composition of the same
    /// scenario.
    pub fn can_transition_to(self, next: RunState) -> bool {
        use RunState::*;
        match (self, next) {
            (Failed, _) => false,
            (_, Failed) => true,
            (Uninitialized, QuotesLoaded)
            | (QuotesLoaded | QuoteMutated | Verified, CurveBuilt)
            | (CurveBuilt, Linked)
            | (Linked, Priced)
            | (Priced, Verified)
            | (Verified, QuoteMutated) => true,
            _ => false,
        }
    }

    /// Return `true` for `Verified` and `Failed`.
    pub fn is_terminal(self) -> bool {
        matches!(self, RunState::Verified | RunState::Failed)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

// ── Errors ────────────────────────────────────────────────────────────────────

/// A failed run.
#[derive(Debug, Error)]
pub enum RunError {
    /// Quotes, fixings or instruments could not be set up.
    #[error("market setup: {}", .0.kind())]
    Setup(#[source] Error),
    /// A scenario step failed.
    #[error("scenario '{scenario}', {stage}: {}", .source.kind())]
    Scenario {
        /// Scenario name.
        scenario: String,
        /// What was being done, e.g. `"depo-swap curve"`.
        stage: String,
        /// Library error.
        #[source]
        source: Error,
    },
    /// The report sink failed.
    #[error("report output")]
    Report(#[from] io::Error),
}

impl RunError {
    /// The library error behind the failure, if any.
    pub fn library_error(&self) -> Option<&Error> {
        match self {
            RunError::Setup(e) | RunError::Scenario { source: e, .. } => Some(e),
            RunError::Report(_) => None,
        }
    }
}

// ── Priced swaps ──────────────────────────────────────────────────────────────

/// A swap revalued in every scenario.
#[derive(Debug, Clone)]
pub struct PricedSwap {
    /// Report title.
    pub title: String,
    /// The swap.
    pub swap: VanillaSwap,
}

fn euribor_swap(index: &Arc<IborIndex>, calendar: &Arc<dyn Calendar>, start: Date, length: Period) -> Result<VanillaSwap> {
    let end = start.advance(length.length, length.unit)?;
    MakeVanillaSwap::new(length, Arc::clone(index), FIXED_RATE, Period::months(0))
        .with_effective_date(start)
        .with_termination_date(end)
        .with_nominal(NOMINAL)
        .with_calendar(Arc::clone(calendar))
        .with_fixed_leg_tenor(Period::years(1))
        .with_fixed_leg_convention(BusinessDayConvention::Unadjusted)
        .with_fixed_leg_termination_date_convention(BusinessDayConvention::Unadjusted)
        .with_fixed_leg_rule(DateGeneration::Forward)
        .with_fixed_leg_day_count(Arc::new(Thirty360::european()))
        .with_floating_leg_rule(DateGeneration::Forward)
        .build()
}

/// The 5Y spot and 1Y-forward 5Y payer swaps against `index`.
///
/// Fixed 4% annual, unadjusted, 30/360 European; floating leg on the index
/// tenor with its convention and day counter. The forward start is
/// `calendar.advance(settlement, 1Y)`.
pub fn euribor_swaps(settlement: Date, calendar: Arc<dyn Calendar>, index: Arc<IborIndex>) -> Result<Vec<PricedSwap>> {
    let length = Period::years(5);
    let forward_start = calendar.advance(settlement, 1, TimeUnit::Years, BusinessDayConvention::Following, false)?;
    Ok(vec![
        PricedSwap {
            title: format!("{length} swap paying {:.2} %", FIXED_RATE * 100.0),
            swap: euribor_swap(&index, &calendar, settlement, length)?,
        },
        PricedSwap {
            title: format!("{length} swap, 1Y forward, paying {:.2} %", FIXED_RATE * 100.0),
            swap: euribor_swap(&index, &calendar, forward_start, length)?,
        },
    ])
}

// ── Workflow ──────────────────────────────────────────────────────────────────

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    /// Scenarios run, base included.
    pub scenarios: usize,
    /// Swap valuations performed.
    pub valuations: usize,
    /// Check-swap valuations, one per scenario and curve.
    pub checks: Vec<ValuationResult>,
}

/// Drives curve construction, pricing and checking across scenarios.
#[derive(Debug)]
pub struct Workflow {
    state: RunState,
    evaluation_date: Date,
    quote_table: Vec<(String, Real)>,
    fixings: Vec<FixingEntry>,
    scenarios: Vec<ScenarioEntry>,
    check_quote: String,
    quotes: QuoteStore,
    conventions: HelperConventions,
    builder: CurveBuilder,
    checker: ConsistencyChecker,
    valuator: SwapValuator,
    compositions: Vec<Composition>,
    sets: Vec<CurveInstrumentSet>,
    index: Arc<IborIndex>,
    swaps: Vec<PricedSwap>,
    discounting: CurveRegistry,
    forecasting: CurveRegistry,
}

impl Workflow {
    /// A run over `config` with the sterling conventions and all three
    /// curve compositions.
    pub fn new(config: &MarketConfig) -> Self {
        Self {
            state: RunState::Uninitialized,
            evaluation_date: config.evaluation_date(),
            quote_table: config.quotes.iter().map(|q| (q.key.clone(), q.value)).collect(),
            fixings: config.fixings.clone(),
            scenarios: config.scenarios.clone(),
            check_quote: config.curve.check_quote.clone(),
            quotes: QuoteStore::new(),
            conventions: HelperConventions::sterling(),
            builder: CurveBuilder::new(Arc::new(ActualActualIsda), config.interpolation())
                .with_accuracy(config.curve.tolerance),
            checker: ConsistencyChecker::default(),
            valuator: SwapValuator::new(),
            compositions: Composition::ALL.to_vec(),
            sets: Vec::new(),
            index: Arc::new(euribor_months(6)),
            swaps: Vec::new(),
            discounting: CurveRegistry::new("discounting"),
            forecasting: CurveRegistry::new("forecasting"),
        }
    }

    /// Restrict the run to `compositions`, in the given order.
    pub fn with_compositions(mut self, compositions: Vec<Composition>) -> Self {
        self.compositions = compositions;
        self
    }

    /// Evaluation date, rolled forward to a business day once quotes are loaded.
    pub fn evaluation_date(&self) -> Date {
        self.evaluation_date
    }

    /// Current state.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// The live quote store.
    pub fn quotes(&self) -> &QuoteStore {
        &self.quotes
    }

    /// Registry the swaps discount on.
    pub fn discounting(&self) -> &CurveRegistry {
        &self.discounting
    }

    /// Registry the swaps forecast on.
    pub fn forecasting(&self) -> &CurveRegistry {
        &self.forecasting
    }

    /// The swaps revalued in each scenario.
    pub fn swaps(&self) -> &[PricedSwap] {
        &self.swaps
    }

    /// Instrument sets, one per composition, once quotes are loaded.
    pub fn instrument_sets(&self) -> &[CurveInstrumentSet] {
        &self.sets
    }

    fn transition(&mut self, next: RunState) -> Result<()> {
        if !self.state.can_transition_to(next) {
            return Err(Error::Precondition(format!(
                "run cannot move from {} to {next}",
                self.state
            )));
        }
        debug!(from = %self.state, to = %next, "run state");
        self.state = next;
        Ok(())
    }

    fn fail(&mut self) {
        if self.state != RunState::Failed {
            debug!(from = %self.state, to = %RunState::Failed, "run state");
            self.state = RunState::Failed;
        }
    }

    /// Populate the quote store, record fixings, build the priced swaps and
    /// assemble one instrument set per composition.
    pub fn load_quotes(&mut self) -> Result<()> {
        if !self.state.can_transition_to(RunState::QuotesLoaded) {
            return self.transition(RunState::QuotesLoaded);
        }
        for (key, value) in &self.quote_table {
            self.quotes.insert(key.clone(), *value);
        }
        for fixing in &self.fixings {
            if fixing.index != self.index.name() {
                return Err(Error::InvalidArgument(format!(
                    "fixing for unknown index {} (known: {})",
                    fixing.index,
                    self.index.name()
                )));
            }
            self.index.add_fixing(Date::from_naive(fixing.date), fixing.value);
        }

        let calendar = Arc::clone(&self.conventions.calendar);
        let adjusted = calendar.adjust(self.evaluation_date, BusinessDayConvention::Following);
        if adjusted != self.evaluation_date {
            debug!(configured = %self.evaluation_date, %adjusted, "evaluation date rolled to a business day");
            self.evaluation_date = adjusted;
        }
        let days = i32::try_from(self.conventions.settlement_days).unwrap_or(i32::MAX);
        let settlement = calendar.advance(
            self.evaluation_date,
            days,
            TimeUnit::Days,
            BusinessDayConvention::Following,
            false,
        )?;
        self.swaps = euribor_swaps(settlement, calendar, Arc::clone(&self.index))?;
        self.sets = self
            .compositions
            .iter()
            .map(|c| c.instrument_set(settlement, &self.conventions, &self.quotes))
            .collect::<Result<_>>()?;
        info!(
            quotes = self.quotes.len(),
            fixings = self.fixings.len(),
            %settlement,
            "market loaded"
        );
        self.transition(RunState::QuotesLoaded)
    }

    /// Overwrite one quote; the next cycle rebuilds from it.
    pub fn apply_scenario(&mut self, scenario: &ScenarioEntry) -> Result<()> {
        if !self.state.can_transition_to(RunState::QuoteMutated) {
            return self.transition(RunState::QuoteMutated);
        }
        let before = self.quotes.get(&scenario.quote)?;
        self.quotes.set(&scenario.quote, scenario.value)?;
        info!(
            scenario = scenario.name.as_str(),
            quote = scenario.quote.as_str(),
            before,
            after = scenario.value,
            "quote mutated"
        );
        self.transition(RunState::QuoteMutated)
    }

    /// One rebuild-link-price-verify cycle on the `k`-th instrument set.
    ///
    /// Returns the swap valuations in [`swaps`](Self::swaps) order and the
    /// check-swap valuation.
    pub fn revalue(&mut self, k: usize) -> Result<(Vec<ValuationResult>, ValuationResult)> {
        let set = self
            .sets
            .get(k)
            .ok_or_else(|| Error::InvalidArgument(format!("no instrument set #{k}")))?;
        if !self.state.can_transition_to(RunState::CurveBuilt) {
            return Err(Error::Precondition(format!(
                "run cannot move from {} to {}",
                self.state,
                RunState::CurveBuilt
            )));
        }
        let curve: Arc<dyn YieldTermStructure> = self.builder.build(self.evaluation_date, set)?;
        self.transition(RunState::CurveBuilt)?;

        self.discounting.link_to(Arc::clone(&curve));
        self.forecasting.link_to(curve);
        self.transition(RunState::Linked)?;

        let results = self
            .swaps
            .iter()
            .map(|p| {
                self.valuator
                    .price(&p.swap, &self.discounting, &self.forecasting, self.evaluation_date)
            })
            .collect::<Result<Vec<_>>>()?;
        self.transition(RunState::Priced)?;

        let set = &self.sets[k];
        let instrument = set
            .find(&self.check_quote)
            .ok_or_else(|| Error::KeyNotFound(format!("{} in {}", self.check_quote, set.name())))?;
        let check = self.checker.reprice(
            instrument,
            &self.discounting,
            &self.forecasting,
            self.evaluation_date,
        )?;
        self.transition(RunState::Verified)?;
        Ok((results, check))
    }

    fn header(&self, name: &str) -> Result<ScenarioHeader> {
        let instrument = self
            .sets
            .iter()
            .find_map(|s| s.find(&self.check_quote))
            .ok_or_else(|| Error::KeyNotFound(self.check_quote.clone()))?;
        Ok(ScenarioHeader {
            name: name.to_string(),
            evaluation_date: self.evaluation_date,
            reference: instrument.label().to_string(),
            market_rate: instrument.quote()?,
        })
    }

    fn run_scenario(
        &mut self,
        name: &str,
        sink: &mut dyn ReportSink,
        summary: &mut RunSummary,
    ) -> std::result::Result<(), RunError> {
        info!(scenario = name, "scenario started");
        let failed = |stage: String| {
            let scenario = name.to_string();
            move |source| RunError::Scenario {
                scenario,
                stage,
                source,
            }
        };
        let header = self.header(name).map_err(failed("header".into()))?;

        let mut sections: Vec<ReportSection> = self
            .swaps
            .iter()
            .map(|p| ReportSection {
                title: p.title.clone(),
                rows: Vec::with_capacity(self.sets.len()),
            })
            .collect();
        for k in 0..self.sets.len() {
            let label = self.sets[k].name().to_string();
            let (results, check) = self.revalue(k).map_err(failed(format!("{label} curve")))?;
            for (section, r) in sections.iter_mut().zip(&results) {
                section.rows.push(ReportRow {
                    label: label.clone(),
                    npv: r.npv,
                    fair_spread: r.fair_spread,
                    fair_rate: r.fair_rate,
                });
            }
            summary.valuations += results.len();
            summary.checks.push(check);
        }

        sink.begin_scenario(&header)?;
        for section in &sections {
            sink.section(section)?;
        }
        sink.end_scenario()?;
        summary.scenarios += 1;
        info!(scenario = name, curves = self.sets.len(), "scenario verified");
        Ok(())
    }

    fn run_all(&mut self, sink: &mut dyn ReportSink) -> std::result::Result<RunSummary, RunError> {
        if self.state == RunState::Uninitialized {
            self.load_quotes().map_err(RunError::Setup)?;
        }
        let mut summary = RunSummary {
            scenarios: 0,
            valuations: 0,
            checks: Vec::new(),
        };
        self.run_scenario(BASE_SCENARIO, sink, &mut summary)?;
        for scenario in self.scenarios.clone() {
            self.apply_scenario(&scenario).map_err(|source| RunError::Scenario {
                scenario: scenario.name.clone(),
                stage: "quote update".into(),
                source,
            })?;
            self.run_scenario(&scenario.name, sink, &mut summary)?;
        }
        Ok(summary)
    }

    /// Run the base market and every scenario, reporting to `sink`.
    ///
    /// On error the run is left in [`RunState::Failed`].
    pub fn run(&mut self, sink: &mut dyn ReportSink) -> std::result::Result<RunSummary, RunError> {
        let outcome = self.run_all(sink);
        if outcome.is_err() {
            self.fail();
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ql_time::UnitedKingdom;
    use std::path::Path;

    fn date(y: u16, m: u8, d: u8) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn config(extra: &str) -> MarketConfig {
        let toml = format!(
            r#"
            evaluation_date = "2016-10-04"
            [[quote]]
            key = "D1M"
            value = 0.0025
            [[quote]]
            key = "S5Y"
            value = 0.0041
            {extra}
            "#
        );
        MarketConfig::from_toml_str(&toml, Path::new("inline")).unwrap()
    }

    #[test]
    fn legal_path_and_loops() {
        use RunState::*;
        let path = [
            Uninitialized,
            QuotesLoaded,
            CurveBuilt,
            Linked,
            Priced,
            Verified,
            CurveBuilt,
            Linked,
            Priced,
            Verified,
            QuoteMutated,
            CurveBuilt,
        ];
        assert!(path.windows(2).all(|w| w[0].can_transition_to(w[1])));
        assert!(!Uninitialized.can_transition_to(CurveBuilt));
        assert!(!Linked.can_transition_to(Verified));
        assert!(!QuoteMutated.can_transition_to(Priced));
        assert!(Priced.can_transition_to(Failed));
        assert!(!Failed.can_transition_to(QuotesLoaded));
        assert!(Verified.is_terminal() && Failed.is_terminal() && !Priced.is_terminal());
    }

    #[test]
    fn euribor_swap_dates() {
        let swaps = euribor_swaps(
            date(2016, 10, 4),
            Arc::new(UnitedKingdom::exchange()),
            Arc::new(euribor_months(6)),
        )
        .unwrap();
        assert_eq!(swaps.len(), 2);
        assert_eq!(swaps[0].title, "5Y swap paying 4.00 %");
        assert_eq!(swaps[0].swap.start_date(), date(2016, 10, 4));
        assert_eq!(swaps[0].swap.maturity_date(), date(2021, 10, 4));
        assert_eq!(swaps[1].swap.start_date(), date(2017, 10, 4));
        assert_eq!(swaps[1].swap.maturity_date(), date(2022, 10, 4));
        assert_eq!(swaps[1].swap.fixed_leg().len(), 5);
        assert_eq!(swaps[1].swap.floating_leg().len(), 10);
        assert_eq!(swaps[1].swap.nominal(), NOMINAL);
    }

    #[test]
    fn scenario_before_verification_is_rejected() {
        let market = MarketConfig::embedded().unwrap();
        let mut run = Workflow::new(&market).with_compositions(vec![Composition::DepoSwap]);
        let shock = ScenarioEntry {
            name: "shock".into(),
            quote: "S5Y".into(),
            value: 0.046,
        };
        assert!(matches!(run.apply_scenario(&shock), Err(Error::Precondition(_))));
        run.load_quotes().unwrap();
        assert_eq!(run.state(), RunState::QuotesLoaded);
        assert_eq!(run.instrument_sets().len(), 1);
        assert!(matches!(run.apply_scenario(&shock), Err(Error::Precondition(_))));
        assert_eq!(run.quotes().get("S5Y").unwrap(), 0.0041);
        assert!(matches!(run.load_quotes(), Err(Error::Precondition(_))));

        run.revalue(0).unwrap();
        assert_eq!(run.state(), RunState::Verified);
        run.apply_scenario(&shock).unwrap();
        assert_eq!(run.state(), RunState::QuoteMutated);
        assert_eq!(run.quotes().get("S5Y").unwrap(), 0.046);
    }

    #[test]
    fn weekend_evaluation_date_rolls_to_monday() {
        let mut market = MarketConfig::embedded().unwrap();
        // 8 October 2016 is a Saturday
        market.evaluation_date = chrono::NaiveDate::from_ymd_opt(2016, 10, 8).unwrap();
        let mut run = Workflow::new(&market).with_compositions(vec![Composition::DepoSwap]);
        assert_eq!(run.evaluation_date(), date(2016, 10, 8));
        run.load_quotes().unwrap();
        assert_eq!(run.evaluation_date(), date(2016, 10, 10));
        assert_eq!(run.swaps()[0].swap.start_date(), run.evaluation_date());
        assert_eq!(run.header("base").unwrap().evaluation_date, date(2016, 10, 10));
    }

    #[test]
    fn fixings_must_name_the_priced_index() {
        let mut run = Workflow::new(&config(
            r#"
            [[fixing]]
            index = "GBPLibor3M"
            date = "2016-09-30"
            value = 0.0038
            "#,
        ));
        let err = run.load_quotes().unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(ref m) if m.contains("GBPLibor3M")));
    }

    #[test]
    fn incomplete_market_fails_setup() {
        let mut run = Workflow::new(&config(""));
        let mut sink = crate::report::CollectingReport::new();
        let err = run.run(&mut sink).unwrap_err();
        assert_eq!(err.library_error(), Some(&Error::KeyNotFound("D2M".into())));
        assert!(err.to_string().starts_with("market setup: KeyNotFound"));
        assert_eq!(run.state(), RunState::Failed);
        assert!(sink.scenarios().is_empty());
    }
}

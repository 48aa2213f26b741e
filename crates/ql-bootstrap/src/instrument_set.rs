//! `CurveInstrumentSet` — the ordered instruments one curve is built from.

use crate::instrument::{CalibratingInstrument, HelperConventions, InstrumentSpec};
use ql_core::errors::{Error, Result};
use ql_quotes::QuoteStore;
use ql_time::{Date, Period};
use std::fmt;
use std::str::FromStr;

/// Calibrating instruments sorted by pillar date.
///
/// A valid set is non-empty, every pillar lies after the settlement date
/// and no two instruments share a pillar.
#[derive(Debug, Clone)]
pub struct CurveInstrumentSet {
    name: String,
    settlement_date: Date,
    instruments: Vec<CalibratingInstrument>,
}

impl CurveInstrumentSet {
    /// Sort and validate `instruments`.
    ///
    /// # Errors
    /// [`Error::InvalidInstrumentSet`] if the set is empty, a pillar is on
    /// or before `settlement_date`, or two pillars coincide.
    pub fn new(
        name: impl Into<String>,
        settlement_date: Date,
        mut instruments: Vec<CalibratingInstrument>,
    ) -> Result<Self> {
        let name = name.into();
        if instruments.is_empty() {
            return Err(Error::InvalidInstrumentSet(format!("{name}: no instruments")));
        }
        instruments.sort_by_key(CalibratingInstrument::pillar_date);
        if let Some(first) = instruments.first() {
            if first.pillar_date() <= settlement_date {
                return Err(Error::InvalidInstrumentSet(format!(
                    "{name}: {} has pillar {} on or before settlement {settlement_date}",
                    first.label(),
                    first.pillar_date()
                )));
            }
        }
        if let Some(w) = instruments
            .windows(2)
            .find(|w| w[0].pillar_date() == w[1].pillar_date())
        {
            return Err(Error::InvalidInstrumentSet(format!(
                "{name}: {} and {} share pillar date {}",
                w[0].label(),
                w[1].label(),
                w[0].pillar_date()
            )));
        }
        Ok(Self {
            name,
            settlement_date,
            instruments,
        })
    }

    /// Build a set from a declarative table, binding each row to its quote.
    ///
    /// # Errors
    /// [`Error::KeyNotFound`] for a quote key absent from `quotes`, plus
    /// everything [`new`](Self::new) reports.
    pub fn from_specs(
        name: impl Into<String>,
        settlement_date: Date,
        specs: &[InstrumentSpec],
        conventions: &HelperConventions,
        quotes: &QuoteStore,
    ) -> Result<Self> {
        let name = name.into();
        if specs.is_empty() {
            return Err(Error::InvalidInstrumentSet(format!("{name}: no instruments")));
        }
        let instruments = specs
            .iter()
            .map(|spec| {
                let handle = quotes.handle(&spec.quote_key)?;
                CalibratingInstrument::new(spec, conventions, settlement_date, handle)
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(name, settlement_date, instruments)
    }

    /// Name of the set, e.g. `"depo-swap"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Settlement date the instruments were built from.
    pub fn settlement_date(&self) -> Date {
        self.settlement_date
    }

    /// Instruments in increasing pillar order.
    pub fn instruments(&self) -> &[CalibratingInstrument] {
        &self.instruments
    }

    /// Number of instruments (always at least one).
    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    /// Always `false`: empty sets are rejected at construction.
    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    /// Iterate over the instruments in pillar order.
    pub fn iter(&self) -> std::slice::Iter<'_, CalibratingInstrument> {
        self.instruments.iter()
    }

    /// The instrument driven by `quote_key`, if any.
    pub fn find(&self, quote_key: &str) -> Option<&CalibratingInstrument> {
        self.instruments.iter().find(|i| i.quote_key() == quote_key)
    }
}

impl<'a> IntoIterator for &'a CurveInstrumentSet {
    type Item = &'a CalibratingInstrument;
    type IntoIter = std::slice::Iter<'a, CalibratingInstrument>;

    fn into_iter(self) -> Self::IntoIter {
        self.instruments.iter()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Standard compositions
// ────────────────────────────────────────────────────────────────────────────

/// The three sterling curve compositions of the revaluation report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Composition {
    /// Deposits then swaps.
    DepoSwap,
    /// Deposits, the futures strip, then swaps.
    DepoFutSwap,
    /// Deposits, the FRA strip, then swaps.
    DepoFraSwap,
}

impl Composition {
    /// All compositions in report order.
    pub const ALL: [Composition; 3] = [
        Composition::DepoSwap,
        Composition::DepoFutSwap,
        Composition::DepoFraSwap,
    ];

    /// Report name.
    pub fn name(self) -> &'static str {
        match self {
            Composition::DepoSwap => "depo-swap",
            Composition::DepoFutSwap => "depo-fut-swap",
            Composition::DepoFraSwap => "depo-FRA-swap",
        }
    }

    /// The instrument table: `D1M..D3M`, then `FUT1..FUT8` or
    /// `FRA3X6..FRA21X24` where applicable, then `S3Y..S10Y`.
    pub fn specs(self) -> Vec<InstrumentSpec> {
        let mut specs: Vec<InstrumentSpec> = (1..=3)
            .map(|m| InstrumentSpec::deposit(Period::months(m), format!("D{m}M")))
            .collect();
        match self {
            Composition::DepoSwap => {}
            Composition::DepoFutSwap => {
                specs.extend((1..=8).map(|n| InstrumentSpec::future(n, format!("FUT{n}"))));
            }
            Composition::DepoFraSwap => {
                specs.extend((1..=7u32).map(|i| {
                    let (start, end) = (3 * i, 3 * i + 3);
                    InstrumentSpec::fra(start, end, format!("FRA{start}X{end}"))
                }));
            }
        }
        specs.extend((3..=10).map(|y| InstrumentSpec::swap(Period::years(y), format!("S{y}Y"))));
        specs
    }

    /// Assemble this composition's instrument set.
    pub fn instrument_set(
        self,
        settlement_date: Date,
        conventions: &HelperConventions,
        quotes: &QuoteStore,
    ) -> Result<CurveInstrumentSet> {
        CurveInstrumentSet::from_specs(self.name(), settlement_date, &self.specs(), conventions, quotes)
    }
}

impl fmt::Display for Composition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Composition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Composition::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::InvalidArgument(format!("unknown curve composition '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instrument::InstrumentKind;

    fn date(y: u16, m: u8, d: u8) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn quotes() -> QuoteStore {
        QuoteStore::from_pairs([
            ("D1M", 0.0025),
            ("D2M", 0.0030),
            ("D3M", 0.0038),
            ("FRA3X6", 0.0037),
            ("S3Y", 0.0035),
            ("S5Y", 0.0041),
        ])
    }

    #[test]
    fn instruments_are_sorted_by_pillar() {
        let specs = vec![
            InstrumentSpec::swap(Period::years(5), "S5Y"),
            InstrumentSpec::deposit(Period::months(3), "D3M"),
            InstrumentSpec::fra(3, 6, "FRA3X6"),
            InstrumentSpec::deposit(Period::months(1), "D1M"),
        ];
        let set = CurveInstrumentSet::from_specs(
            "mixed",
            date(2016, 10, 4),
            &specs,
            &HelperConventions::sterling(),
            &quotes(),
        )
        .unwrap();
        let keys: Vec<&str> = set.iter().map(|i| i.quote_key()).collect();
        assert_eq!(keys, ["D1M", "D3M", "FRA3X6", "S5Y"]);
        assert!(set.instruments().windows(2).all(|w| w[0].pillar_date() < w[1].pillar_date()));
        assert_eq!(set.find("S5Y").map(|i| i.kind()), Some(InstrumentKind::Swap { tenor: Period::years(5) }));
    }

    #[test]
    fn empty_set_is_rejected() {
        let r = CurveInstrumentSet::from_specs(
            "empty",
            date(2016, 10, 4),
            &[],
            &HelperConventions::sterling(),
            &quotes(),
        );
        assert!(matches!(r, Err(Error::InvalidInstrumentSet(_))));
    }

    #[test]
    fn duplicate_pillars_name_both_instruments() {
        // the 3M deposit and the 0x3 FRA both mature on 4 Jan 2017
        let specs = vec![
            InstrumentSpec::deposit(Period::months(3), "D3M"),
            InstrumentSpec::fra(0, 3, "FRA3X6"),
        ];
        let err = CurveInstrumentSet::from_specs(
            "dup",
            date(2016, 10, 4),
            &specs,
            &HelperConventions::sterling(),
            &quotes(),
        )
        .unwrap_err();
        let Error::InvalidInstrumentSet(msg) = err else {
            panic!("unexpected error {err:?}");
        };
        assert!(msg.contains("3M deposit (D3M)"), "{msg}");
        assert!(msg.contains("0x3 FRA (FRA3X6)"), "{msg}");
    }

    #[test]
    fn unknown_quote_key() {
        let specs = vec![InstrumentSpec::swap(Period::years(7), "S7Y")];
        let r = CurveInstrumentSet::from_specs(
            "missing",
            date(2016, 10, 4),
            &specs,
            &HelperConventions::sterling(),
            &quotes(),
        );
        assert_eq!(r.unwrap_err(), Error::KeyNotFound("S7Y".into()));
    }

    #[test]
    fn standard_tables() {
        assert_eq!(Composition::DepoSwap.specs().len(), 11);
        assert_eq!(Composition::DepoFutSwap.specs().len(), 19);
        let fra = Composition::DepoFraSwap.specs();
        assert_eq!(fra.len(), 18);
        assert_eq!(fra[3].quote_key, "FRA3X6");
        assert_eq!(fra[9].quote_key, "FRA21X24");
        assert_eq!("depo-fra-swap".parse::<Composition>().unwrap(), Composition::DepoFraSwap);
    }
}

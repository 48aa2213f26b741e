//! Report sinks for revaluation results.
//!
//! The workflow never formats output itself. It hands a [`ScenarioHeader`]
//! and one [`ReportSection`] per priced swap to a [`ReportSink`].

use ql_core::Real;
use ql_time::Date;
use std::io::{self, Write};

/// Opening block of a scenario.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioHeader {
    /// Scenario name (`"base"` for the unshocked market).
    pub name: String,
    /// Evaluation date of the run.
    pub evaluation_date: Date,
    /// Label of the instrument whose quote headlines the scenario.
    pub reference: String,
    /// Market quote of that instrument.
    pub market_rate: Real,
}

/// One valuation under one curve.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    /// Curve composition name.
    pub label: String,
    /// Net present value.
    pub npv: Real,
    /// Floating spread that zeroes the NPV.
    pub fair_spread: Real,
    /// Fixed rate that zeroes the NPV.
    pub fair_rate: Real,
}

/// Valuations of one swap across curves.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSection {
    /// Swap description.
    pub title: String,
    /// One row per curve.
    pub rows: Vec<ReportRow>,
}

/// Consumer of revaluation results.
pub trait ReportSink {
    /// Start a scenario.
    fn begin_scenario(&mut self, header: &ScenarioHeader) -> io::Result<()>;

    /// Emit one table.
    fn section(&mut self, section: &ReportSection) -> io::Result<()>;

    /// Close the current scenario.
    fn end_scenario(&mut self) -> io::Result<()>;
}

// ────────────────────────────────────────────────────────────────────────────
// Console
// ────────────────────────────────────────────────────────────────────────────

const HEADERS: [&str; 4] = ["term structure", "net present value", "fair spread", "fair fixed rate"];
const SEPARATOR: &str = " | ";
const TAB: &str = "        ";

fn line_width() -> usize {
    HEADERS.iter().map(|h| h.len() + SEPARATOR.len()).sum::<usize>() - 1
}

fn percent(rate: Real) -> String {
    format!("{:.2} %", rate * 100.0)
}

/// Fixed-width text tables written to any [`Write`]r.
#[derive(Debug)]
pub struct ConsoleReport<W: Write> {
    out: W,
}

impl<W: Write> ConsoleReport<W> {
    /// Write to `out`.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn cells(&mut self, cells: [&str; 4]) -> io::Result<()> {
        for (cell, header) in cells.iter().zip(HEADERS) {
            write!(self.out, "{cell:>width$}{SEPARATOR}", width = header.len())?;
        }
        writeln!(self.out)
    }
}

impl<W: Write> ReportSink for ConsoleReport<W> {
    fn begin_scenario(&mut self, header: &ScenarioHeader) -> io::Result<()> {
        let rule = "=".repeat(line_width());
        writeln!(self.out, "{rule}")?;
        writeln!(self.out, "{} ({})", header.name, header.evaluation_date)?;
        writeln!(
            self.out,
            "{} market rate = {}",
            header.reference,
            percent(header.market_rate)
        )?;
        writeln!(self.out, "{rule}")
    }

    fn section(&mut self, section: &ReportSection) -> io::Result<()> {
        let rule = "-".repeat(line_width());
        writeln!(self.out, "{TAB}{}", section.title)?;
        self.cells(HEADERS)?;
        writeln!(self.out, "{rule}")?;
        for row in &section.rows {
            let npv = format!("{:.2}", row.npv);
            let spread = percent(row.fair_spread);
            let rate = percent(row.fair_rate);
            self.cells([&row.label, &npv, &spread, &rate])?;
        }
        writeln!(self.out, "{rule}")
    }

    fn end_scenario(&mut self) -> io::Result<()> {
        writeln!(self.out)?;
        self.out.flush()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// In memory
// ────────────────────────────────────────────────────────────────────────────

/// A scenario as received by [`CollectingReport`].
#[derive(Debug, Clone, PartialEq)]
pub struct CollectedScenario {
    /// Scenario header.
    pub header: ScenarioHeader,
    /// Sections in emission order.
    pub sections: Vec<ReportSection>,
    /// Whether `end_scenario` was called.
    pub closed: bool,
}

/// Keeps everything it is sent.
#[derive(Debug, Clone, Default)]
pub struct CollectingReport {
    scenarios: Vec<CollectedScenario>,
}

impl CollectingReport {
    /// An empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scenarios received so far.
    pub fn scenarios(&self) -> &[CollectedScenario] {
        &self.scenarios
    }

    /// All rows of all sections of all scenarios.
    pub fn rows(&self) -> impl Iterator<Item = &ReportRow> {
        self.scenarios
            .iter()
            .flat_map(|s| &s.sections)
            .flat_map(|s| &s.rows)
    }

    fn open(&mut self) -> io::Result<&mut CollectedScenario> {
        match self.scenarios.last_mut() {
            Some(s) if !s.closed => Ok(s),
            _ => Err(io::Error::other("no scenario in progress")),
        }
    }
}

impl ReportSink for CollectingReport {
    fn begin_scenario(&mut self, header: &ScenarioHeader) -> io::Result<()> {
        self.scenarios.push(CollectedScenario {
            header: header.clone(),
            sections: Vec::new(),
            closed: false,
        });
        Ok(())
    }

    fn section(&mut self, section: &ReportSection) -> io::Result<()> {
        self.open()?.sections.push(section.clone());
        Ok(())
    }

    fn end_scenario(&mut self) -> io::Result<()> {
        self.open()?.closed = true;
        Ok(())
    }
}

//! # swapval
//!
//! Sterling curve bootstrapping and Euribor swap revaluation.
//!
//! This crate re-exports the `ql-*` workspace crates and adds the pieces a
//! run needs on top of them: TOML market data ([`config`]), report sinks
//! ([`report`]) and the scenario workflow ([`workflow`]).
//!
//! ```no_run
//! use swapval::{ConsoleReport, MarketConfig, Workflow};
//!
//! let config = MarketConfig::embedded()?;
//! let mut report = ConsoleReport::new(std::io::stdout());
//! Workflow::new(&config).run(&mut report)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// ── Re-exported workspace crates ──────────────────────────────────────────────

/// Core types, aliases, and error definitions.
pub use ql_core as core;

/// Dates, calendars, day counters, schedules and IMM dates.
pub use ql_time as time;

/// Interpolation and 1-D root finding.
pub use ql_math as math;

/// Market quotes and the quote store.
pub use ql_quotes as quotes;

/// Discount curves and curve registries.
pub use ql_termstructures as termstructures;

/// Ibor indexes and historical fixings.
pub use ql_indexes as indexes;

/// Coupons and legs.
pub use ql_cashflows as cashflows;

/// Vanilla swaps.
pub use ql_instruments as instruments;

/// Swap valuation.
pub use ql_pricingengines as pricingengines;

/// Curve calibration and repricing checks.
pub use ql_bootstrap as bootstrap;

// ── Modules ───────────────────────────────────────────────────────────────────

/// Market-data configuration.
pub mod config;

/// Report sinks.
pub mod report;

/// The scenario workflow.
pub mod workflow;

// ── Convenience re-exports ────────────────────────────────────────────────────

pub use config::{ConfigError, MarketConfig};
pub use report::{CollectingReport, ConsoleReport, ReportRow, ReportSection, ReportSink, ScenarioHeader};
pub use workflow::{RunError, RunState, RunSummary, Workflow};

//! Market-data configuration.
//!
//! A run is described by one TOML document: the evaluation date, the quote
//! table, historical index fixings, the quote scenarios to replay and a few
//! curve settings.
//!
//! ```toml
//! evaluation_date = "2016-10-04"
//!
//! [curve]
//! interpolation = "log-cubic"
//!
//! [[quote]]
//! key = "S5Y"
//! value = 0.0041
//!
//! [[fixing]]
//! index = "Euribor6M"
//! date = "2016-09-30"
//! value = -0.00201
//!
//! [[scenario]]
//! name = "5Y shock"
//! quote = "S5Y"
//! value = 0.0460
//! ```

use chrono::NaiveDate;
use ql_core::Real;
use ql_termstructures::InterpolationPolicy;
use ql_time::Date;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// The market data shipped with the binary.
pub const EMBEDDED_MARKET: &str = include_str!("../data/market.toml");

const EMBEDDED_ORIGIN: &str = "<embedded market data>";

/// Configuration error type.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("cannot read {}", .path.display())]
    Io {
        /// File that was opened.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The document is not valid TOML or does not match the schema.
    #[error("{}:{line}: {reason}", .path.display())]
    Parse {
        /// Origin of the document.
        path: PathBuf,
        /// 1-based line of the offending item (0 when unknown).
        line: usize,
        /// Parser message.
        reason: String,
    },
    /// The document parsed but its content is inconsistent.
    #[error("invalid market data: {}", .0.join("; "))]
    Validation(Vec<String>),
}

/// Discount-factor interpolation as spelled in the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Interpolation {
    /// Log-linear discount factors.
    #[default]
    LogLinear,
    /// Natural cubic spline on log discount factors.
    LogCubic,
}

impl From<Interpolation> for InterpolationPolicy {
    fn from(i: Interpolation) -> Self {
        match i {
            Interpolation::LogLinear => InterpolationPolicy::LogLinear,
            Interpolation::LogCubic => InterpolationPolicy::LogCubicNatural,
        }
    }
}

/// `[curve]` table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CurveSettings {
    /// Interpolation of the bootstrapped curves.
    pub interpolation: Interpolation,
    /// Root-finder accuracy per pillar.
    pub tolerance: Real,
    /// Quote key of the calibrating swap checked after every build.
    pub check_quote: String,
}

impl Default for CurveSettings {
    fn default() -> Self {
        Self {
            interpolation: Interpolation::LogLinear,
            tolerance: 1.0e-15,
            check_quote: "S5Y".to_string(),
        }
    }
}

/// One `[[quote]]` row.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuoteEntry {
    /// Quote key, e.g. `"S5Y"`.
    pub key: String,
    /// Rate (or price, for futures).
    pub value: Real,
}

/// One `[[fixing]]` row.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FixingEntry {
    /// Index name, e.g. `"Euribor6M"`.
    pub index: String,
    /// Fixing date.
    pub date: NaiveDate,
    /// Fixed rate.
    pub value: Real,
}

/// One `[[scenario]]` row: a quote overwritten before a revaluation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioEntry {
    /// Scenario name used in the report.
    pub name: String,
    /// Key of the quote to overwrite.
    pub quote: String,
    /// New quote value.
    pub value: Real,
}

/// A complete run description.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MarketConfig {
    /// Evaluation (and settlement) date.
    pub evaluation_date: NaiveDate,
    /// Curve construction settings.
    #[serde(default)]
    pub curve: CurveSettings,
    /// Market quotes.
    #[serde(default, rename = "quote")]
    pub quotes: Vec<QuoteEntry>,
    /// Historical index fixings.
    #[serde(default, rename = "fixing")]
    pub fixings: Vec<FixingEntry>,
    /// Scenarios replayed after the base run, in order.
    #[serde(default, rename = "scenario")]
    pub scenarios: Vec<ScenarioEntry>,
}

impl MarketConfig {
    /// Load configuration from a TOML file and validate it.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content, path)
    }

    /// The embedded 4 October 2016 sterling market.
    pub fn embedded() -> Result<Self, ConfigError> {
        Self::from_toml_str(EMBEDDED_MARKET, Path::new(EMBEDDED_ORIGIN))
    }

    /// Parse and validate a TOML document; `origin` only labels errors.
    pub fn from_toml_str(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: origin.to_path_buf(),
            line: e
                .span()
                .map(|span| content[..span.start.min(content.len())].lines().count().max(1))
                .unwrap_or(0),
            reason: e.message().to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check values the schema alone cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.quotes.is_empty() {
            errors.push("no quotes".to_string());
        }
        let mut seen = HashSet::new();
        for q in &self.quotes {
            if !seen.insert(q.key.as_str()) {
                errors.push(format!("quote {} listed twice", q.key));
            }
            if !q.value.is_finite() {
                errors.push(format!("quote {} is not a finite number", q.key));
            }
        }
        for f in &self.fixings {
            if !f.value.is_finite() {
                errors.push(format!("{} fixing for {} is not a finite number", f.index, f.date));
            }
        }
        for s in &self.scenarios {
            if !s.value.is_finite() {
                errors.push(format!("scenario '{}' sets a non-finite value", s.name));
            }
        }
        if self.curve.tolerance.is_nan() || self.curve.tolerance <= 0.0 {
            errors.push(format!("curve tolerance must be positive, got {}", self.curve.tolerance));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Evaluation date as a workspace [`Date`].
    pub fn evaluation_date(&self) -> Date {
        Date::from_naive(self.evaluation_date)
    }

    /// Curve interpolation policy.
    pub fn interpolation(&self) -> InterpolationPolicy {
        self.curve.interpolation.into()
    }

    /// Override the curve interpolation.
    pub fn with_interpolation(mut self, policy: InterpolationPolicy) -> Self {
        self.curve.interpolation = match policy {
            InterpolationPolicy::LogLinear => Interpolation::LogLinear,
            InterpolationPolicy::LogCubicNatural => Interpolation::LogCubic,
        };
        self
    }
}

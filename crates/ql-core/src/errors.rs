//! Error types for the curve-and-swap revaluation workspace.
//!
//! Every layer reports failures through a single `thiserror`-derived enum.
//! The first six variants form the workflow taxonomy (unknown quote, bad
//! calibration set, bootstrap failure, missing fixing, repricing mismatch,
//! unlinked curve reference); the remaining ones cover argument and
//! precondition checks inside the library layers. Nothing is retried: every
//! error is a data or logic error and propagates to the caller.

use thiserror::Error;

/// The top-level error type used throughout the workspace.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// A quote key was not present in the quote store.
    #[error("quote not found: {0}")]
    KeyNotFound(String),

    /// A calibration set is empty or ambiguous.
    #[error("invalid instrument set: {0}")]
    InvalidInstrumentSet(String),

    /// The root finder could not calibrate a curve node.
    #[error("bootstrap failure at {instrument}: {reason}")]
    BootstrapFailure {
        /// Label of the instrument whose pillar could not be solved.
        instrument: String,
        /// What went wrong.
        reason: String,
    },

    /// A past fixing was needed but is not recorded.
    #[error("missing {index} fixing for {date}")]
    MissingFixing {
        /// Index name.
        index: String,
        /// Fixing date.
        date: String,
    },

    /// A calibrating instrument did not reprice to its own quote.
    #[error(
        "{instrument} mispriced by {:.4e} (fair rate {fair}, quoted {quoted})",
        (.fair - .quoted).abs()
    )]
    RepricingMismatch {
        /// Label of the instrument.
        instrument: String,
        /// Fair rate computed on the bootstrapped curve.
        fair: f64,
        /// Market quote the instrument was calibrated to.
        quoted: f64,
    },

    /// A relinkable reference was resolved before being linked.
    #[error("unlinked reference: {0}")]
    UnlinkedReference(String),

    /// Precondition violated (see [`ensure!`](crate::ensure)).
    #[error("precondition not satisfied: {0}")]
    Precondition(String),

    /// A value was read before it was ever set.
    #[error("null value: {0}")]
    NullValue(String),

    /// Date-related error.
    #[error("date error: {0}")]
    Date(String),

    /// Invalid argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// General runtime error.
    #[error("{0}")]
    Runtime(String),
}

impl Error {
    /// Short name of the error kind, used in one-line diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::KeyNotFound(_) => "KeyNotFound",
            Error::InvalidInstrumentSet(_) => "InvalidInstrumentSet",
            Error::BootstrapFailure { .. } => "BootstrapFailure",
            Error::MissingFixing { .. } => "MissingFixing",
            Error::RepricingMismatch { .. } => "RepricingMismatch",
            Error::UnlinkedReference(_) => "UnlinkedReference",
            Error::Precondition(_) => "Precondition",
            Error::NullValue(_) => "NullValue",
            Error::Date(_) => "Date",
            Error::InvalidArgument(_) => "InvalidArgument",
            Error::Runtime(_) => "Runtime",
        }
    }
}

/// Shorthand `Result` type used throughout the workspace.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Returns `Err(Error::Precondition(...))` if `$cond` is false.
///
/// # Example
/// ```
/// use ql_core::{ensure, errors::Error};
/// fn positive(x: f64) -> ql_core::errors::Result<f64> {
///     ensure!(x > 0.0, "x must be positive, got {x}");
///     Ok(x)
/// }
/// assert!(positive(1.0).is_ok());
/// assert!(matches!(positive(-1.0), Err(Error::Precondition(_))));
/// ```
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($msg:tt)*) => {
        if !$cond {
            return Err($crate::errors::Error::Precondition(
                format!($($msg)*)
            ));
        }
    };
}

/// Returns `Err(Error::Runtime(...))` immediately.
///
/// # Example
/// ```
/// use ql_core::{fail, errors::Error};
/// fn always_err() -> ql_core::errors::Result<()> {
///     fail!("something went wrong");
/// }
/// assert!(always_err().is_err());
/// ```
#[macro_export]
macro_rules! fail {
    ($($msg:tt)*) => {
        return Err($crate::errors::Error::Runtime(format!($($msg)*)))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repricing_mismatch_reports_difference() {
        let e = Error::RepricingMismatch {
            instrument: "5Y swap".into(),
            fair: 0.0042,
            quoted: 0.0041,
        };
        let msg = e.to_string();
        assert!(msg.starts_with("5Y swap mispriced by 1.0000e-4"), "{msg}");
        assert_eq!(e.kind(), "RepricingMismatch");
    }

    #[test]
    fn missing_fixing_names_index_and_date() {
        let e = Error::MissingFixing {
            index: "Euribor6M".into(),
            date: "30 September 2016".into(),
        };
        assert_eq!(e.to_string(), "missing Euribor6M fixing for 30 September 2016");
    }

    #[test]
    fn ensure_macro_returns_precondition() {
        fn check(n: usize) -> Result<()> {
            ensure!(n > 0, "need at least one element");
            Ok(())
        }
        assert_eq!(
            check(0),
            Err(Error::Precondition("need at least one element".into()))
        );
        assert!(check(1).is_ok());
    }
}

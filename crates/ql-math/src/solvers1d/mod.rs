//! 1D root finding: Brent's method on a bracketing interval, plus a
//! geometric bracket expansion for when the initial guess interval does not
//! straddle the root.
//!
//! Objectives are fallible (`FnMut(Real) -> Result<Real>`): pricing a trial
//! curve can itself fail, and such errors are returned unchanged. A
//! non-finite objective value is reported as an error rather than searched
//! through.

use ql_core::{
    errors::{Error, Result},
    Real,
};

const DEFAULT_MAX_ITERATIONS: usize = 100;
const DEFAULT_ACCURACY: Real = 1.0e-11;
const BRACKET_GROWTH: Real = 1.6;

/// Accuracy and iteration limits for a solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverSettings {
    /// Absolute accuracy on `x`.
    pub accuracy: Real,
    /// Maximum number of objective evaluations after the bracket ends.
    pub max_iterations: usize,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            accuracy: DEFAULT_ACCURACY,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

fn eval<F>(f: &mut F, x: Real) -> Result<Real>
where
    F: FnMut(Real) -> Result<Real>,
{
    let y = f(x)?;
    if !y.is_finite() {
        return Err(Error::Runtime(format!("objective is not finite at x = {x}")));
    }
    Ok(y)
}

/// Brent's method for a root of `f` in `[x_min, x_max]`.
///
/// Combines bisection, secant and inverse quadratic interpolation. The
/// endpoints must bracket the root (`f(x_min)·f(x_max) <= 0`).
pub fn brent<F>(mut f: F, x_min: Real, x_max: Real, settings: SolverSettings) -> Result<Real>
where
    F: FnMut(Real) -> Result<Real>,
{
    let acc = if settings.accuracy > 0.0 {
        settings.accuracy
    } else {
        DEFAULT_ACCURACY
    };
    let mut a = x_min;
    let mut b = x_max;
    let mut fa = eval(&mut f, a)?;
    let mut fb = eval(&mut f, b)?;

    if fa * fb > 0.0 {
        return Err(Error::Runtime(format!(
            "root not bracketed: f({a}) = {fa}, f({b}) = {fb}"
        )));
    }
    if fa == 0.0 {
        return Ok(a);
    }
    if fb == 0.0 {
        return Ok(b);
    }

    let mut c = b;
    let mut fc = fb;
    let mut d = b - a;
    let mut e = d;

    for _ in 0..settings.max_iterations {
        if fb * fc > 0.0 {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }
        let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * acc;
        let xm = 0.5 * (c - b);
        if xm.abs() <= tol || fb == 0.0 {
            return Ok(b);
        }
        if e.abs() >= tol && fa.abs() > fb.abs() {
            let s = fb / fa;
            let (p, q) = if a == c {
                (2.0 * xm * s, 1.0 - s)
            } else {
                let q = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * xm * q * (q - r) - (b - a) * (r - 1.0)),
                    (q - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            let (p, q) = if p > 0.0 { (p, -q) } else { (-p, q) };
            if 2.0 * p < (3.0 * xm * q - (tol * q).abs()) && 2.0 * p < (e * q).abs() {
                e = d;
                d = p / q;
            } else {
                d = xm;
                e = d;
            }
        } else {
            d = xm;
            e = d;
        }
        a = b;
        fa = fb;
        b += if d.abs() > tol {
            d
        } else if xm > 0.0 {
            tol
        } else {
            -tol
        };
        fb = eval(&mut f, b)?;
    }
    Err(Error::Runtime(format!(
        "no convergence within {} iterations (last x = {b}, f(x) = {fb})",
        settings.max_iterations
    )))
}

/// Widen `[lo, hi]` geometrically until `f` changes sign on it.
///
/// Each step moves the endpoint with the larger `|f|` away from the other
/// one. `lower_limit` / `upper_limit` clamp the search (e.g. a discount
/// factor must stay positive). Gives up after `max_expansions` steps.
pub fn expand_bracket<F>(
    mut f: F,
    mut lo: Real,
    mut hi: Real,
    lower_limit: Real,
    upper_limit: Real,
    max_expansions: usize,
) -> Result<(Real, Real)>
where
    F: FnMut(Real) -> Result<Real>,
{
    if lo >= hi {
        return Err(Error::InvalidArgument(format!(
            "invalid bracket [{lo}, {hi}]"
        )));
    }
    let mut flo = eval(&mut f, lo)?;
    let mut fhi = eval(&mut f, hi)?;
    for _ in 0..max_expansions {
        if flo * fhi <= 0.0 {
            return Ok((lo, hi));
        }
        let width = hi - lo;
        if flo.abs() < fhi.abs() {
            let next = (lo - BRACKET_GROWTH * width).max(lower_limit);
            if next >= lo {
                break;
            }
            lo = next;
            flo = eval(&mut f, lo)?;
        } else {
            let next = (hi + BRACKET_GROWTH * width).min(upper_limit);
            if next <= hi {
                break;
            }
            hi = next;
            fhi = eval(&mut f, hi)?;
        }
    }
    if flo * fhi <= 0.0 {
        return Ok((lo, hi));
    }
    Err(Error::Runtime(format!(
        "could not bracket a root: f({lo}) = {flo}, f({hi}) = {fhi}"
    )))
}

//! 1D interpolation trait and implementations.
//!
//! Every scheme extrapolates linearly outside its node range, continuing
//! the slope of the first or last segment. Curves built from these
//! interpolations therefore stay defined a little beyond their last pillar,
//! which the bootstrap relies on while later pillars are still unknown.

use ql_core::{ensure, errors::Result, Real};

mod cubic;

pub use cubic::CubicNaturalSpline;

/// A 1D interpolation function `f: R → R` defined by a set of known points.
pub trait Interpolation1D: std::fmt::Debug + Send + Sync {
    /// Evaluate the interpolation at `x`.
    fn value(&self, x: Real) -> Real;

    /// First derivative at `x`.
    fn derivative(&self, x: Real) -> Real;

    /// Lower bound of the node range.
    fn x_min(&self) -> Real;

    /// Upper bound of the node range.
    fn x_max(&self) -> Real;

    /// Return `true` if `x` is within the node range.
    fn is_in_range(&self, x: Real) -> bool {
        x >= self.x_min() && x <= self.x_max()
    }
}

/// Check node vectors shared by every scheme.
pub(crate) fn check_nodes(xs: &[Real], ys: &[Real]) -> Result<()> {
    ensure!(xs.len() >= 2, "need at least 2 points for interpolation, got {}", xs.len());
    ensure!(
        xs.len() == ys.len(),
        "xs and ys must have the same length ({} vs {})",
        xs.len(),
        ys.len()
    );
    ensure!(
        xs.windows(2).all(|w| w[0] < w[1]),
        "interpolation nodes must be strictly increasing"
    );
    ensure!(
        ys.iter().all(|y| y.is_finite()),
        "interpolation values must be finite"
    );
    Ok(())
}

/// Index `i` of the segment `[xs[i], xs[i+1]]` used for `x`, clamped to the
/// first and last segments outside the node range.
pub(crate) fn locate(xs: &[Real], x: Real) -> usize {
    let n = xs.len();
    if x <= xs[0] {
        return 0;
    }
    if x >= xs[n - 1] {
        return n - 2;
    }
    xs.partition_point(|&xi| xi <= x) - 1
}

// ── Linear ────────────────────────────────────────────────────────────────────

/// Piecewise linear interpolation.
#[derive(Debug, Clone)]
pub struct LinearInterpolation {
    xs: Vec<Real>,
    ys: Vec<Real>,
}

impl LinearInterpolation {
    /// Construct from strictly increasing `xs` and matching `ys`.
    pub fn new(xs: &[Real], ys: &[Real]) -> Result<Self> {
        check_nodes(xs, ys)?;
        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
        })
    }

    fn slope(&self, i: usize) -> Real {
        (self.ys[i + 1] - self.ys[i]) / (self.xs[i + 1] - self.xs[i])
    }
}

impl Interpolation1D for LinearInterpolation {
    fn value(&self, x: Real) -> Real {
        let i = locate(&self.xs, x);
        self.ys[i] + (x - self.xs[i]) * self.slope(i)
    }

    fn derivative(&self, x: Real) -> Real {
        self.slope(locate(&self.xs, x))
    }

    fn x_min(&self) -> Real {
        self.xs[0]
    }

    fn x_max(&self) -> Real {
        self.xs[self.xs.len() - 1]
    }
}

// ── Log-space wrapper ─────────────────────────────────────────────────────────

/// Interpolates `ln(y)` with an inner scheme and exponentiates the result.
///
/// `LogInterpolation<LinearInterpolation>` is log-linear interpolation;
/// `LogInterpolation<CubicNaturalSpline>` is the natural log-cubic spline.
#[derive(Debug, Clone)]
pub struct LogInterpolation<I> {
    inner: I,
}

impl<I: Interpolation1D> LogInterpolation<I> {
    /// Wrap a scheme built with `build` on the logarithms of `ys`.
    ///
    /// All `ys` must be strictly positive.
    pub fn new<F>(xs: &[Real], ys: &[Real], build: F) -> Result<Self>
    where
        F: FnOnce(&[Real], &[Real]) -> Result<I>,
    {
        ensure!(
            ys.iter().all(|&y| y > 0.0),
            "log interpolation requires strictly positive values"
        );
        let log_ys: Vec<Real> = ys.iter().map(|y| y.ln()).collect();
        Ok(Self {
            inner: build(xs, &log_ys)?,
        })
    }

    /// The interpolation of `ln(y)`.
    pub fn log_interpolation(&self) -> &I {
        &self.inner
    }
}

impl LogInterpolation<LinearInterpolation> {
    /// Log-linear interpolation.
    pub fn log_linear(xs: &[Real], ys: &[Real]) -> Result<Self> {
        Self::new(xs, ys, LinearInterpolation::new)
    }
}

impl LogInterpolation<CubicNaturalSpline> {
    /// Natural log-cubic spline interpolation.
    pub fn log_cubic(xs: &[Real], ys: &[Real]) -> Result<Self> {
        Self::new(xs, ys, CubicNaturalSpline::new)
    }
}

impl<I: Interpolation1D> Interpolation1D for LogInterpolation<I> {
    fn value(&self, x: Real) -> Real {
        self.inner.value(x).exp()
    }

    fn derivative(&self, x: Real) -> Real {
        self.value(x) * self.inner.derivative(x)
    }

    fn x_min(&self) -> Real {
        self.inner.x_min()
    }

    fn x_max(&self) -> Real {
        self.inner.x_max()
    }
}

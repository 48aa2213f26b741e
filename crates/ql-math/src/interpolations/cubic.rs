//! Natural cubic spline: C2 piecewise cubic with zero second derivative at
//! both end nodes.
//!
//! On each interval `[x_i, x_{i+1}]` the spline is stored as
//!
//!   `f(x) = y_i + dx*(a_i + dx*(b_i + dx*c_i))`,  `dx = x - x_i`.
//!
//! Outside the node range it continues linearly with the end slope, which
//! keeps the extrapolation C2 because the end curvature is zero.

use ql_core::{errors::Result, Real};

use super::{check_nodes, locate, Interpolation1D};

/// Natural cubic spline interpolation.
#[derive(Debug, Clone)]
pub struct CubicNaturalSpline {
    xs: Vec<Real>,
    ys: Vec<Real>,
    a: Vec<Real>,
    b: Vec<Real>,
    c: Vec<Real>,
}

impl CubicNaturalSpline {
    /// Fit the spline through strictly increasing `xs` and matching `ys`.
    pub fn new(xs: &[Real], ys: &[Real]) -> Result<Self> {
        check_nodes(xs, ys)?;
        let m = second_derivatives(xs, ys);
        let n = xs.len();
        let mut a = Vec::with_capacity(n - 1);
        let mut b = Vec::with_capacity(n - 1);
        let mut c = Vec::with_capacity(n - 1);
        for i in 0..n - 1 {
            let h = xs[i + 1] - xs[i];
            a.push((ys[i + 1] - ys[i]) / h - h * (2.0 * m[i] + m[i + 1]) / 6.0);
            b.push(m[i] / 2.0);
            c.push((m[i + 1] - m[i]) / (6.0 * h));
        }
        Ok(Self {
            xs: xs.to_vec(),
            ys: ys.to_vec(),
            a,
            b,
            c,
        })
    }

    fn end_slope(&self) -> Real {
        let i = self.a.len() - 1;
        let h = self.xs[i + 1] - self.xs[i];
        self.a[i] + h * (2.0 * self.b[i] + 3.0 * h * self.c[i])
    }
}

/// Solve the tridiagonal system for the node second derivatives with
/// natural boundary conditions (Thomas algorithm).
fn second_derivatives(xs: &[Real], ys: &[Real]) -> Vec<Real> {
    let n = xs.len();
    let mut m = vec![0.0; n];
    if n < 3 {
        return m;
    }
    let h: Vec<Real> = xs.windows(2).map(|w| w[1] - w[0]).collect();
    let inner = n - 2;
    let mut diag = Vec::with_capacity(inner);
    let mut rhs = Vec::with_capacity(inner);
    for i in 1..n - 1 {
        diag.push(2.0 * (h[i - 1] + h[i]));
        rhs.push(6.0 * ((ys[i + 1] - ys[i]) / h[i] - (ys[i] - ys[i - 1]) / h[i - 1]));
    }
    // forward elimination; sub- and super-diagonal entries are h[k]
    for k in 1..inner {
        let w = h[k] / diag[k - 1];
        diag[k] -= w * h[k];
        rhs[k] -= w * rhs[k - 1];
    }
    m[inner] = rhs[inner - 1] / diag[inner - 1];
    for k in (0..inner - 1).rev() {
        m[k + 1] = (rhs[k] - h[k + 1] * m[k + 2]) / diag[k];
    }
    m
}

impl Interpolation1D for CubicNaturalSpline {
    fn value(&self, x: Real) -> Real {
        let last = self.xs.len() - 1;
        if x < self.xs[0] {
            return self.ys[0] + self.a[0] * (x - self.xs[0]);
        }
        if x > self.xs[last] {
            return self.ys[last] + self.end_slope() * (x - self.xs[last]);
        }
        let i = locate(&self.xs, x);
        let dx = x - self.xs[i];
        self.ys[i] + dx * (self.a[i] + dx * (self.b[i] + dx * self.c[i]))
    }

    fn derivative(&self, x: Real) -> Real {
        if x < self.xs[0] {
            return self.a[0];
        }
        if x > self.xs[self.xs.len() - 1] {
            return self.end_slope();
        }
        let i = locate(&self.xs, x);
        let dx = x - self.xs[i];
        self.a[i] + dx * (2.0 * self.b[i] + 3.0 * dx * self.c[i])
    }

    fn x_min(&self) -> Real {
        self.xs[0]
    }

    fn x_max(&self) -> Real {
        self.xs[self.xs.len() - 1]
    }
}

//! Bracketed scalar root finding.
//!
//! [`solve_root`] drives a residual function toward zero on an interval whose
//! endpoints are expected to have residuals of opposite sign. Each step uses
//! regula falsi (linear interpolation between the bracketing points) and falls
//! back to a bisection step when the same endpoint has been retained twice in a
//! row, which keeps convergence robust for strongly curved residuals.
//!
//! The residual may carry side effects. Equipment controllers use this to
//! simulate a unit at each trial point and read the unit's state afterward, so
//! the solver guarantees that its final evaluation is at the returned root
//! (except for [`RootStatus::BadBracket`], where the last evaluation is at the
//! upper bound).

use std::convert::Infallible;

use tracing::debug;

/// Configuration for [`solve_root`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootConfig {
    /// Convergence tolerance on the absolute residual.
    pub tolerance: f64,

    /// Maximum number of interior iterations.
    pub max_iters: usize,
}

impl RootConfig {
    /// Creates a configuration with the given tolerance and iteration cap.
    #[must_use]
    pub const fn new(tolerance: f64, max_iters: usize) -> Self {
        Self {
            tolerance,
            max_iters,
        }
    }
}

impl Default for RootConfig {
    fn default() -> Self {
        Self::new(0.001, 100)
    }
}

/// Outcome classification of a root solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RootStatus {
    /// The residual at the returned point is within tolerance.
    Converged,

    /// The iteration cap was reached (or the bracket collapsed) first.
    ///
    /// The returned point is the last iterate.
    IterationLimitExceeded,

    /// The residuals at the bounds do not have opposite signs.
    ///
    /// No iteration was attempted and the returned point is the lower bound.
    BadBracket,
}

/// Result of a root solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Root {
    /// Root estimate.
    pub x: f64,

    /// Residual at `x`, or at the lower bound for a bad bracket.
    pub residual: f64,

    /// Number of interior iterations performed.
    pub iters: usize,

    /// Solve status.
    pub status: RootStatus,
}

impl Root {
    /// Returns `true` if the solve converged.
    #[must_use]
    pub fn is_converged(&self) -> bool {
        self.status == RootStatus::Converged
    }
}

/// Finds a root of an infallible residual on `[lo, hi]`.
///
/// See [`try_solve_root`] for the algorithm.
pub fn solve_root(config: &RootConfig, bracket: [f64; 2], mut residual: impl FnMut(f64) -> f64) -> Root {
    match try_solve_root(config, bracket, |x| Ok::<_, Infallible>(residual(x))) {
        Ok(root) => root,
        Err(never) => match never {},
    }
}

/// Finds a root of a fallible residual on `[lo, hi]`.
///
/// The residual is evaluated at both bounds first. If the product of the two
/// residuals is not negative the bracket is rejected with
/// [`RootStatus::BadBracket`] and no interior point is evaluated.
///
/// # Errors
///
/// Returns the first error produced by `residual`, unchanged.
pub fn try_solve_root<E>(
    config: &RootConfig,
    bracket: [f64; 2],
    mut residual: impl FnMut(f64) -> Result<f64, E>,
) -> Result<Root, E> {
    let [mut x_lo, mut x_hi] = bracket;
    let mut y_lo = residual(x_lo)?;
    let mut y_hi = residual(x_hi)?;

    if y_lo * y_hi >= 0.0 || y_lo.is_nan() || y_hi.is_nan() {
        debug!(x_lo, x_hi, y_lo, y_hi, "root bracket rejected");
        return Ok(Root {
            x: x_lo,
            residual: y_lo,
            iters: 0,
            status: RootStatus::BadBracket,
        });
    }

    let mut retained = Retained::Neither;
    let mut iters = 0;

    loop {
        iters += 1;

        let x = match retained {
            Retained::LowerTwice | Retained::UpperTwice => 0.5 * (x_lo + x_hi),
            _ => (y_lo * x_hi - y_hi * x_lo) / (y_lo - y_hi),
        };
        let y = residual(x)?;

        if y.abs() <= config.tolerance {
            return Ok(Root {
                x,
                residual: y,
                iters,
                status: RootStatus::Converged,
            });
        }

        if y_lo * y < 0.0 {
            x_hi = x;
            y_hi = y;
            retained = retained.keep_lower();
        } else {
            x_lo = x;
            y_lo = y;
            retained = retained.keep_upper();
        }

        let collapsed = (x_hi - x_lo).abs() <= f64::EPSILON * x_lo.abs().max(x_hi.abs()).max(1.0);
        if iters >= config.max_iters || collapsed {
            debug!(x, y, iters, collapsed, "root solve stopped before convergence");
            return Ok(Root {
                x,
                residual: y,
                iters,
                status: RootStatus::IterationLimitExceeded,
            });
        }
    }
}

/// Which bracket endpoint survived the most recent updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Retained {
    Neither,
    Lower,
    LowerTwice,
    Upper,
    UpperTwice,
}

impl Retained {
    fn keep_lower(self) -> Self {
        match self {
            Self::Lower => Self::LowerTwice,
            _ => Self::Lower,
        }
    }

    fn keep_upper(self) -> Self {
        match self {
            Self::Upper => Self::UpperTwice,
            _ => Self::Upper,
        }
    }
}

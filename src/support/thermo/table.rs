//! Piecewise-linear lookup over monotonically increasing abscissas.

/// Interpolates `ys` at `x`, returning `None` outside `[xs[0], xs[n-1]]`.
///
/// `xs` must be strictly increasing and the same length as `ys`.
pub(super) fn interpolate(xs: &[f64], ys: &[f64], x: f64) -> Option<f64> {
    debug_assert_eq!(xs.len(), ys.len());

    let (&first, &last) = (xs.first()?, xs.last()?);
    if !(first..=last).contains(&x) {
        return None;
    }

    let upper = xs.iter().position(|&xi| xi >= x)?;
    if upper == 0 {
        return Some(ys[0]);
    }

    let lower = upper - 1;
    let fraction = (x - xs[lower]) / (xs[upper] - xs[lower]);
    Some(ys[lower] + fraction * (ys[upper] - ys[lower]))
}

/// Interpolates `ys` at `x`, holding the end values outside the table.
pub(super) fn interpolate_clamped(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    let lo = xs[0];
    let hi = xs[xs.len() - 1];
    interpolate(xs, ys, x.clamp(lo, hi)).unwrap_or(f64::NAN)
}

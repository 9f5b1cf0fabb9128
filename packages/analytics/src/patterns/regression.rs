//! Ordinary least-squares line fitting.

/// A fitted line `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    /// Change in `y` per unit of `x`.
    pub slope: f64,
    /// Value of `y` at `x = 0`.
    pub intercept: f64,
}

/// Fits a line through `points` by ordinary least squares.
///
/// Returns `None` for fewer than two points, when every `x` is equal, or
/// when the fit is not finite.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn least_squares(points: &[(f64, f64)]) -> Option<LinearFit> {
    if points.len() < 2 {
        return None;
    }

    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, y)| y).sum::<f64>() / n;

    let (sxy, sxx) = points.iter().fold((0.0, 0.0), |(sxy, sxx), (x, y)| {
        let dx = x - mean_x;
        (dx.mul_add(y - mean_y, sxy), dx.mul_add(dx, sxx))
    });

    if sxx == 0.0 {
        return None;
    }

    let slope = sxy / sxx;
    let intercept = slope.mul_add(-mean_x, mean_y);

    (slope.is_finite() && intercept.is_finite()).then_some(LinearFit { slope, intercept })
}

//! Least-squares trend fitting

use nalgebra::{DMatrix, DVector};

/// Fitted trend coefficients with goodness-of-fit diagnostics
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitOutcome {
    /// Value at the time origin (linear) or scale factor (exponential)
    pub intercept: f64,
    /// Rate per day (linear) or exponent per day (exponential)
    pub slope: f64,
    /// R-squared clamped to [0, 1]; 0 for flat signals
    pub r_squared: f64,
    /// Residual standard deviation in the value domain
    pub residual_std: f64,
}

/// Ordinary least squares of `y` against `[1, t]`, solved via SVD.
pub fn linear_fit(t: &[f64], y: &[f64]) -> Option<FitOutcome> {
    let n = t.len();
    if n < 2 || n != y.len() {
        return None;
    }

    let design = DMatrix::from_fn(n, 2, |row, col| if col == 0 { 1.0 } else { t[row] });
    let target = DVector::from_column_slice(y);
    let coeffs = design.clone().svd(true, true).solve(&target, 1e-12).ok()?;

    let intercept = coeffs[0];
    let slope = coeffs[1];
    if !intercept.is_finite() || !slope.is_finite() {
        return None;
    }

    let fitted = design * &coeffs;
    let residuals: Vec<f64> = (0..n).map(|i| y[i] - fitted[i]).collect();
    Some(diagnostics(intercept, slope, y, &residuals))
}

/// Exponential trend `v = a * exp(b * t)` via least squares in log space.
/// Requires strictly positive values; diagnostics are reported in the
/// original value domain.
pub fn exponential_fit(t: &[f64], y: &[f64]) -> Option<FitOutcome> {
    if y.iter().any(|&v| v <= 0.0) {
        return None;
    }

    let logs: Vec<f64> = y.iter().map(|v| v.ln()).collect();
    let log_fit = linear_fit(t, &logs)?;

    let a = log_fit.intercept.exp();
    let b = log_fit.slope;
    if !a.is_finite() {
        return None;
    }

    let residuals: Vec<f64> = t
        .iter()
        .zip(y.iter())
        .map(|(&ti, &yi)| yi - a * (b * ti).exp())
        .collect();
    Some(diagnostics(a, b, y, &residuals))
}

fn diagnostics(intercept: f64, slope: f64, y: &[f64], residuals: &[f64]) -> FitOutcome {
    let n = y.len();
    let mean = y.iter().sum::<f64>() / n as f64;
    let ss_tot: f64 = y.iter().map(|v| (v - mean).powi(2)).sum();
    let ss_res: f64 = residuals.iter().map(|r| r.powi(2)).sum();

    // A flat signal has no variance to explain; define its quality as 0.
    let r_squared = if ss_tot > 1e-10 {
        (1.0 - ss_res / ss_tot).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let dof = n.saturating_sub(2).max(1) as f64;
    let residual_std = (ss_res / dof).sqrt();

    FitOutcome {
        intercept,
        slope,
        r_squared,
        residual_std,
    }
}

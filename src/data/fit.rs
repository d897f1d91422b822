use std::collections::BTreeMap;

use nalgebra::{DMatrix, DVector};

use super::error::{DataError, Result};
use super::model::{FitResult, FunctionType, XySeries};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Fit `model` to the series.
///
/// The series has at least two points (guaranteed by the xy parser).
pub fn fit_curve(series: &XySeries, model: FunctionType) -> Result<FitResult> {
    let (parameters, y_fit) = match model {
        FunctionType::LinearAx => fit_linear_ax(&series.x, &series.y)?,
        FunctionType::Quadratic => fit_quadratic(&series.x, &series.y)?,
        FunctionType::LogNX => fit_log_n_x(&series.x, &series.y)?,
    };
    log::info!("fitted {model} over {} points: {parameters:?}", series.len());

    Ok(FitResult {
        function_type: model,
        x: series.x.clone(),
        y: series.y.clone(),
        y_fit,
        parameters,
    })
}

/// Like [`fit_curve`] but takes the model identifier as sent by a client.
pub fn fit_curve_named(series: &XySeries, function_type: &str) -> Result<FitResult> {
    fit_curve(series, function_type.parse()?)
}

type Fit = (BTreeMap<String, f64>, Vec<f64>);

fn params<const N: usize>(pairs: [(&str, f64); N]) -> BTreeMap<String, f64> {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

// ---------------------------------------------------------------------------
// Models
// ---------------------------------------------------------------------------

/// `y = a·x` through the origin: `a = Σxy / Σx²`.
fn fit_linear_ax(x: &[f64], y: &[f64]) -> Result<Fit> {
    let sxx: f64 = x.iter().map(|v| v * v).sum();
    if sxx == 0.0 {
        return Err(DataError::degenerate("all x are zero"));
    }
    let sxy: f64 = x.iter().zip(y).map(|(a, b)| a * b).sum();
    let a = sxy / sxx;

    let y_fit = x.iter().map(|v| a * v).collect();
    Ok((params([("a", a)]), y_fit))
}

/// Ordinary least squares on the design matrix `[x², x, 1]`.
///
/// Rank-deficient inputs (e.g. repeated x) yield the minimum-norm solution.
fn fit_quadratic(x: &[f64], y: &[f64]) -> Result<Fit> {
    let n = x.len();
    let design = DMatrix::from_fn(n, 3, |r, c| match c {
        0 => x[r] * x[r],
        1 => x[r],
        _ => 1.0,
    });
    let rhs = DVector::from_column_slice(y);

    let svd = design.svd(true, true);
    // Relative cutoff on singular values, as LAPACK-style lstsq does.
    let eps = n.max(3) as f64 * f64::EPSILON * svd.singular_values.max();
    let coeffs = svd
        .solve(&rhs, eps)
        .map_err(|e| DataError::degenerate(format!("cannot fit: {e}")))?;
    if coeffs.iter().any(|v| !v.is_finite()) {
        return Err(DataError::degenerate("cannot fit"));
    }

    let (a, b, c) = (coeffs[0], coeffs[1], coeffs[2]);
    let y_fit = x.iter().map(|v| a * v * v + b * v + c).collect();
    Ok((params([("a", a), ("b", b), ("c", c)]), y_fit))
}

/// `y = log_n(x)`: fit `y = k·ln x`, then `n = e^(1/k)`.
fn fit_log_n_x(x: &[f64], y: &[f64]) -> Result<Fit> {
    if x.iter().any(|v| !(*v > 0.0)) {
        return Err(DataError::degenerate("x must be > 0"));
    }
    let ln_x: Vec<f64> = x.iter().map(|v| v.ln()).collect();

    let denom: f64 = ln_x.iter().map(|l| l * l).sum();
    if denom == 0.0 {
        return Err(DataError::degenerate("cannot fit"));
    }
    let k = y.iter().zip(&ln_x).map(|(yv, l)| yv * l).sum::<f64>() / denom;
    if k == 0.0 {
        return Err(DataError::degenerate("cannot infer base, k=0"));
    }

    let base = (1.0 / k).exp();
    let ln_base = base.ln();
    let y_fit = ln_x.iter().map(|l| l / ln_base).collect();
    Ok((params([("n", base)]), y_fit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn series(x: &[f64], y: &[f64]) -> XySeries {
        XySeries {
            x: x.to_vec(),
            y: y.to_vec(),
        }
    }

    #[test]
    fn linear_exact() {
        let s = series(&[1.0, 2.0, 3.0], &[3.0, 6.0, 9.0]);
        let fit = fit_curve(&s, FunctionType::LinearAx).unwrap();
        assert_eq!(fit.parameter("a"), Some(3.0));
        assert_eq!(fit.y_fit, s.y);
        assert_eq!(fit.parameters.len(), 1);
    }

    #[test]
    fn linear_through_origin_least_squares() {
        // Σxy = 1·1 + 2·3 = 7, Σx² = 5
        let fit = fit_curve(&series(&[1.0, 2.0], &[1.0, 3.0]), FunctionType::LinearAx).unwrap();
        assert_relative_eq!(fit.parameter("a").unwrap(), 1.4);
    }

    #[test]
    fn linear_all_zero_x() {
        let err = fit_curve(&series(&[0.0, 0.0, 0.0], &[1.0, 2.0, 3.0]), FunctionType::LinearAx)
            .unwrap_err();
        assert!(matches!(err, DataError::Degenerate(_)));
        assert_eq!(err.to_string(), "all x are zero");
    }

    #[test]
    fn quadratic_exact() {
        let x = [-2.0, -1.0, 0.0, 1.0, 2.0, 3.0];
        let y: Vec<f64> = x.iter().map(|v| 2.0 * v * v - 3.0 * v + 0.5).collect();
        let fit = fit_curve(&series(&x, &y), FunctionType::Quadratic).unwrap();
        assert_relative_eq!(fit.parameter("a").unwrap(), 2.0, epsilon = 1e-9);
        assert_relative_eq!(fit.parameter("b").unwrap(), -3.0, epsilon = 1e-9);
        assert_relative_eq!(fit.parameter("c").unwrap(), 0.5, epsilon = 1e-9);
        for (f, v) in fit.y_fit.iter().zip(&y) {
            assert_relative_eq!(*f, *v, epsilon = 1e-9);
        }
    }

    #[test]
    fn quadratic_least_squares_on_noisy_data() {
        // Alternating ±0.1 residuals on y = x²; normal equations give
        // a = 1, b = -0.04, c = 0.06.
        let x = [0.0, 1.0, 2.0, 3.0];
        let y = [0.1, 0.9, 4.1, 8.9];
        let fit = fit_curve(&series(&x, &y), FunctionType::Quadratic).unwrap();
        assert_relative_eq!(fit.parameter("a").unwrap(), 1.0, epsilon = 1e-9);
        assert_relative_eq!(fit.parameter("b").unwrap(), -0.04, epsilon = 1e-9);
        assert_relative_eq!(fit.parameter("c").unwrap(), 0.06, epsilon = 1e-9);
        assert_eq!(fit.y_fit.len(), 4);
    }

    #[test]
    fn quadratic_two_points_does_not_fail() {
        let fit = fit_curve(&series(&[1.0, 2.0], &[1.0, 4.0]), FunctionType::Quadratic).unwrap();
        for (f, v) in fit.y_fit.iter().zip(&[1.0, 4.0]) {
            assert_relative_eq!(*f, *v, epsilon = 1e-9);
        }
    }

    #[test]
    fn log_base_two() {
        let s = series(&[1.0, 2.0, 4.0, 8.0], &[0.0, 1.0, 2.0, 3.0]);
        let fit = fit_curve(&s, FunctionType::LogNX).unwrap();
        assert_relative_eq!(fit.parameter("n").unwrap(), 2.0, epsilon = 1e-12);
        for (f, v) in fit.y_fit.iter().zip(&s.y) {
            assert_relative_eq!(*f, *v, epsilon = 1e-12);
        }
    }

    #[test]
    fn log_rejects_non_positive_x() {
        let err = fit_curve(&series(&[0.0, 1.0], &[0.0, 1.0]), FunctionType::LogNX).unwrap_err();
        assert_eq!(err.to_string(), "x must be > 0");
        let err = fit_curve(&series(&[-1.0, 2.0], &[0.0, 1.0]), FunctionType::LogNX).unwrap_err();
        assert_eq!(err.to_string(), "x must be > 0");
    }

    #[test]
    fn log_degenerate_inputs() {
        let err = fit_curve(&series(&[1.0, 1.0], &[2.0, 3.0]), FunctionType::LogNX).unwrap_err();
        assert_eq!(err.to_string(), "cannot fit");

        let err = fit_curve(&series(&[2.0, 4.0], &[0.0, 0.0]), FunctionType::LogNX).unwrap_err();
        assert_eq!(err.to_string(), "cannot infer base, k=0");
    }

    #[test]
    fn unknown_function_type() {
        let s = series(&[1.0, 2.0], &[1.0, 2.0]);
        let err = fit_curve_named(&s, "cubic").unwrap_err();
        assert!(matches!(err, DataError::UnsupportedFunction(_)));
        assert!(fit_curve_named(&s, "linear_ax").is_ok());
    }
}

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::error::DataError;

// ---------------------------------------------------------------------------
// MatrixData – wavelength × time intensity table
// ---------------------------------------------------------------------------

/// A parsed intensity matrix.
///
/// `matrix.len() == times.len()` and every row has `wavelengths.len()` values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatrixData {
    /// Spectral channel labels, one per matrix column.
    pub wavelengths: Vec<f64>,
    /// Sample timestamps, one per matrix row.
    pub times: Vec<f64>,
    /// Intensity rows (time samples) × columns (wavelengths).
    pub matrix: Vec<Vec<f64>>,
}

impl MatrixData {
    /// Number of time samples (rows).
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether no rows were kept.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

// ---------------------------------------------------------------------------
// XySeries – two-column dataset for curve fitting
// ---------------------------------------------------------------------------

/// Parallel `x` / `y` values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XySeries {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl XySeries {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

// ---------------------------------------------------------------------------
// SelectionResult – output of the range averager
// ---------------------------------------------------------------------------

/// Per-time averages over the wavelength columns inside `[min, max]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionResult {
    /// Requested inclusive range `[min, max]`.
    #[serde(rename = "range_nm")]
    pub range: [f64; 2],
    #[serde(rename = "selected_wavelength_count")]
    pub selected_count: usize,
    #[serde(rename = "time_ns")]
    pub times: Vec<f64>,
    #[serde(rename = "avg_intensity")]
    pub averages: Vec<f64>,
}

// ---------------------------------------------------------------------------
// FunctionType – the fixed set of fit models
// ---------------------------------------------------------------------------

/// A supported fit model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionType {
    /// `y = a·x`
    LinearAx,
    /// `y = a·x² + b·x + c`
    Quadratic,
    /// `y = log_n(x)` with `n` inferred.
    #[serde(rename = "log_n_x")]
    LogNX,
}

impl FunctionType {
    pub const ALL: [FunctionType; 3] = [
        FunctionType::LinearAx,
        FunctionType::Quadratic,
        FunctionType::LogNX,
    ];

    /// The identifier accepted by [`FromStr`].
    pub fn as_str(&self) -> &'static str {
        match self {
            FunctionType::LinearAx => "linear_ax",
            FunctionType::Quadratic => "quadratic",
            FunctionType::LogNX => "log_n_x",
        }
    }
}

impl fmt::Display for FunctionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FunctionType {
    type Err = DataError;

    /// Exact, case-sensitive match on the identifier.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FunctionType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| DataError::UnsupportedFunction(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// FitResult – output of the curve fitter
// ---------------------------------------------------------------------------

/// Fitted parameters and curve for one model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FitResult {
    pub function_type: FunctionType,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// Model evaluated at every `x`, same length as `x`.
    pub y_fit: Vec<f64>,
    /// Parameter name → value (`a`; `a, b, c`; or `n`).
    pub parameters: BTreeMap<String, f64>,
}

impl FitResult {
    /// Look up a fitted parameter by name.
    pub fn parameter(&self, name: &str) -> Option<f64> {
        self.parameters.get(name).copied()
    }
}

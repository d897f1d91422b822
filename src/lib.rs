//! Wavelength range averaging and simple curve fitting for spectroscopy
//! tables uploaded as `.csv` or `.xlsx`.
//!
//! * [`data::loader`] turns file bytes into a wavelength × time matrix or an
//!   x/y series, dropping malformed rows instead of failing.
//! * [`data::select`] averages intensity over a wavelength range.
//! * [`data::fit`] fits `linear_ax`, `quadratic` or `log_n_x`.
//! * [`data::export`] writes a `time_ns` / `avg_intensity` series to `.xlsx`.
//! * [`pipeline`] chains these for a single uploaded file.

pub mod data;
pub mod pipeline;

pub use data::error::{DataError, ErrorKind};
pub use data::model::{FitResult, FunctionType, MatrixData, SelectionResult, XySeries};

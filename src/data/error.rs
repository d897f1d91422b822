use std::fmt;

use thiserror::Error;

// ---------------------------------------------------------------------------
// DataError – everything that can go wrong between upload bytes and result
// ---------------------------------------------------------------------------

/// Error raised by the parsers, the averager, the fitter and the exporter.
///
/// The `Display` text is the short message forwarded to the client as-is.
/// None of these are retriable: the same input always fails the same way.
#[derive(Debug, Error)]
pub enum DataError {
    /// File or header is too small to hold a dataset.
    #[error("{0}")]
    Structural(String),

    /// A cell that must hold a number does not.
    #[error("{0}")]
    NotNumeric(String),

    /// The data is well-formed but the model cannot be fitted to it.
    #[error("{0}")]
    Degenerate(String),

    #[error("Only .xlsx and .csv are supported")]
    UnsupportedFormat,

    #[error("unsupported function type: {0}")]
    UnsupportedFunction(String),

    #[error("No wavelength columns in requested range")]
    EmptySelection,

    #[error("min_wavelength_nm must be <= max_wavelength_nm (got {min} > {max})")]
    InvalidRange { min: f64, max: f64 },

    #[error("Uploaded file is empty")]
    EmptyUpload,

    /// Exporter input rejected before anything was written.
    #[error("{0}")]
    Export(String),

    #[error("reading delimited text: {0}")]
    Csv(#[from] csv::Error),

    #[error("reading workbook: {0}")]
    Workbook(#[from] calamine::XlsxError),

    #[error("writing workbook: {0}")]
    WorkbookWrite(#[from] rust_xlsxwriter::XlsxError),
}

/// Coarse classification of a [`DataError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Structural,
    NotNumeric,
    Degenerate,
    Unsupported,
    EmptySelection,
    InvalidRequest,
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Structural => "structural",
            ErrorKind::NotNumeric => "not-numeric",
            ErrorKind::Degenerate => "degenerate-input",
            ErrorKind::Unsupported => "unsupported",
            ErrorKind::EmptySelection => "empty-selection",
            ErrorKind::InvalidRequest => "invalid-request",
            ErrorKind::Io => "io",
        };
        write!(f, "{name}")
    }
}

impl DataError {
    pub(crate) fn structural(msg: impl Into<String>) -> Self {
        DataError::Structural(msg.into())
    }

    pub(crate) fn not_numeric(msg: impl Into<String>) -> Self {
        DataError::NotNumeric(msg.into())
    }

    pub(crate) fn degenerate(msg: impl Into<String>) -> Self {
        DataError::Degenerate(msg.into())
    }

    /// Which class of input problem this is.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DataError::Structural(_) => ErrorKind::Structural,
            DataError::NotNumeric(_) => ErrorKind::NotNumeric,
            DataError::Degenerate(_) => ErrorKind::Degenerate,
            DataError::UnsupportedFormat | DataError::UnsupportedFunction(_) => {
                ErrorKind::Unsupported
            }
            DataError::EmptySelection => ErrorKind::EmptySelection,
            DataError::InvalidRange { .. } | DataError::EmptyUpload | DataError::Export(_) => {
                ErrorKind::InvalidRequest
            }
            DataError::Csv(_) | DataError::Workbook(_) | DataError::WorkbookWrite(_) => {
                ErrorKind::Io
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, DataError>;

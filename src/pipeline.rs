use crate::data::error::{DataError, Result};
use crate::data::export::selection_to_xlsx;
use crate::data::fit::fit_curve_named;
use crate::data::loader::{load_matrix, load_xy};
use crate::data::model::{FitResult, SelectionResult};
use crate::data::select::average_range;

// ---------------------------------------------------------------------------
// Upload handling, independent of the transport that delivered the file
// ---------------------------------------------------------------------------

/// A file as received from a client: original name plus its full contents.
#[derive(Debug, Clone)]
pub struct Upload<'a> {
    pub filename: &'a str,
    pub bytes: &'a [u8],
}

impl<'a> Upload<'a> {
    pub fn new(filename: &'a str, bytes: &'a [u8]) -> Self {
        Upload { filename, bytes }
    }

    fn ensure_not_empty(&self) -> Result<()> {
        if self.bytes.is_empty() {
            log::warn!("rejected empty upload {:?}", self.filename);
            return Err(DataError::EmptyUpload);
        }
        Ok(())
    }
}

/// Parse a matrix upload and average it over `[min, max]` nm.
pub fn analyze_range_upload(upload: &Upload<'_>, min: f64, max: f64) -> Result<SelectionResult> {
    if min > max {
        log::warn!("rejected range [{min}, {max}]");
        return Err(DataError::InvalidRange { min, max });
    }
    upload.ensure_not_empty()?;

    let data = load_matrix(upload.filename, upload.bytes)?;
    average_range(&data, min, max)
}

/// Parse an x/y upload and fit the named model to it.
pub fn fit_upload(upload: &Upload<'_>, function_type: &str) -> Result<FitResult> {
    upload.ensure_not_empty()?;

    let series = load_xy(upload.filename, upload.bytes)?;
    fit_curve_named(&series, function_type)
}

/// Average a matrix upload over `[min, max]` and return the series as `.xlsx`.
pub fn export_range_upload(upload: &Upload<'_>, min: f64, max: f64) -> Result<Vec<u8>> {
    let selection = analyze_range_upload(upload, min, max)?;
    selection_to_xlsx(&selection)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &[u8] = b"400,500,600,time\n1,2,3,0\n4,5,6,1\n";

    #[test]
    fn range_pipeline() {
        let sel = analyze_range_upload(&Upload::new("run.csv", CSV), 450.0, 650.0).unwrap();
        assert_eq!(sel.selected_count, 2);
        assert_eq!(sel.averages, vec![2.5, 5.5]);
    }

    #[test]
    fn range_is_checked_before_parsing() {
        let err = analyze_range_upload(&Upload::new("run.txt", b""), 5.0, 1.0).unwrap_err();
        assert!(matches!(err, DataError::InvalidRange { min, max } if min == 5.0 && max == 1.0));
    }

    #[test]
    fn empty_upload_rejected() {
        let err = analyze_range_upload(&Upload::new("run.csv", b""), 1.0, 5.0).unwrap_err();
        assert!(matches!(err, DataError::EmptyUpload));
        let err = fit_upload(&Upload::new("xy.csv", b""), "linear_ax").unwrap_err();
        assert!(matches!(err, DataError::EmptyUpload));
    }

    #[test]
    fn fit_pipeline() {
        let fit = fit_upload(&Upload::new("xy.CSV", b"1,2\n2,4\n3,6\n"), "linear_ax").unwrap();
        assert_eq!(fit.parameter("a"), Some(2.0));
    }

    #[test]
    fn unsupported_extension_for_both_parsers() {
        let err = analyze_range_upload(&Upload::new("run.txt", CSV), 0.0, 1000.0).unwrap_err();
        assert!(matches!(err, DataError::UnsupportedFormat));
        let err = fit_upload(&Upload::new("xy.txt", b"1,2\n2,4\n"), "linear_ax").unwrap_err();
        assert!(matches!(err, DataError::UnsupportedFormat));
    }
}

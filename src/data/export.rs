use rust_xlsxwriter::{Workbook, Worksheet};

use super::error::{DataError, Result};
use super::model::SelectionResult;

pub const TIME_HEADER: &str = "time_ns";
pub const INTENSITY_HEADER: &str = "avg_intensity";

/// Write a `time_ns` / `avg_intensity` series to an in-memory `.xlsx`.
///
/// One sheet: a header row, then one numeric row per pair in input order.
pub fn to_xlsx(times: &[f64], intensities: &[f64]) -> Result<Vec<u8>> {
    if times.is_empty() || intensities.is_empty() {
        return Err(DataError::Export("time_ns and avg_intensity must not be empty".into()));
    }
    if times.len() != intensities.len() {
        return Err(DataError::Export(format!(
            "time_ns has {} values but avg_intensity has {}",
            times.len(),
            intensities.len()
        )));
    }

    let mut workbook = Workbook::new();
    let mut worksheet = Worksheet::new();

    worksheet.write_string(0, 0, TIME_HEADER)?;
    worksheet.write_string(0, 1, INTENSITY_HEADER)?;
    for (i, (t, v)) in times.iter().zip(intensities).enumerate() {
        let row = (i + 1) as u32;
        worksheet.write_number(row, 0, *t)?;
        worksheet.write_number(row, 1, *v)?;
    }

    workbook.push_worksheet(worksheet);
    let buffer = workbook.save_to_buffer()?;
    log::info!("exported {} rows ({} bytes)", times.len(), buffer.len());
    Ok(buffer)
}

/// Export the averaged series of a range selection.
pub fn selection_to_xlsx(selection: &SelectionResult) -> Result<Vec<u8>> {
    to_xlsx(&selection.times, &selection.averages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_mismatched() {
        assert!(matches!(to_xlsx(&[], &[]), Err(DataError::Export(_))));
        let err = to_xlsx(&[0.0, 1.0], &[1.0]).unwrap_err();
        assert_eq!(err.to_string(), "time_ns has 2 values but avg_intensity has 1");
    }

    #[test]
    fn writes_a_zip_container() {
        let bytes = to_xlsx(&[0.0], &[1.5]).unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }
}

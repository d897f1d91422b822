use std::io::Cursor;

use calamine::{Data, Range, Reader, Xlsx};

use super::error::{DataError, Result};

// ---------------------------------------------------------------------------
// CellValue – what a grid reader hands back for one cell
// ---------------------------------------------------------------------------

/// A single spreadsheet cell, reduced to what the parsers care about.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Number(f64),
    Bool(bool),
    Text(String),
    /// Dates, durations and error cells: present but never numeric.
    Other(String),
}

impl CellValue {
    /// Numeric reading of the cell, if it has one.
    ///
    /// Text is trimmed before parsing; booleans read as 1.0 / 0.0.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(v) => Some(*v),
            CellValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            CellValue::Text(s) => s.trim().parse::<f64>().ok(),
            CellValue::Empty | CellValue::Other(_) => None,
        }
    }

    /// Empty, or text that is only whitespace.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Grid – bounded, 1-based cell access
// ---------------------------------------------------------------------------

/// Read-only rectangular cell region addressed from (1, 1).
///
/// `last_row` / `last_column` bound the region; reads outside it return
/// [`CellValue::Empty`].
pub trait Grid {
    fn last_row(&self) -> usize;
    fn last_column(&self) -> usize;
    fn cell(&self, row: usize, column: usize) -> CellValue;
}

/// Row-major in-memory grid.
#[derive(Debug, Clone, Default)]
pub struct MemoryGrid {
    rows: Vec<Vec<CellValue>>,
    columns: usize,
}

impl MemoryGrid {
    pub fn new(rows: Vec<Vec<CellValue>>) -> Self {
        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        MemoryGrid { rows, columns }
    }

    /// Build a grid of numbers, `None` meaning an empty cell.
    pub fn from_numbers(rows: &[&[Option<f64>]]) -> Self {
        let rows = rows
            .iter()
            .map(|r| {
                r.iter()
                    .map(|v| v.map_or(CellValue::Empty, CellValue::Number))
                    .collect()
            })
            .collect();
        MemoryGrid::new(rows)
    }
}

impl Grid for MemoryGrid {
    fn last_row(&self) -> usize {
        self.rows.len()
    }

    fn last_column(&self) -> usize {
        self.columns
    }

    fn cell(&self, row: usize, column: usize) -> CellValue {
        if row == 0 || column == 0 {
            return CellValue::Empty;
        }
        self.rows
            .get(row - 1)
            .and_then(|r| r.get(column - 1))
            .cloned()
            .unwrap_or(CellValue::Empty)
    }
}

// ---------------------------------------------------------------------------
// XlsxGrid – calamine adapter
// ---------------------------------------------------------------------------

/// First worksheet of an `.xlsx` workbook, addressed absolutely from A1.
pub struct XlsxGrid {
    range: Range<Data>,
}

impl XlsxGrid {
    /// Open a workbook held in memory.
    pub fn from_bytes(raw: &[u8]) -> Result<Self> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(raw))?;
        let range = workbook
            .worksheet_range_at(0)
            .ok_or_else(|| DataError::structural("No sheets found in Excel file"))??;
        log::debug!(
            "opened worksheet: start={:?} end={:?}",
            range.start(),
            range.end()
        );
        Ok(XlsxGrid { range })
    }
}

impl Grid for XlsxGrid {
    // calamine trims leading empty rows/columns from the range; the used
    // extent counted from A1 is therefore `end + 1`.
    fn last_row(&self) -> usize {
        self.range.end().map_or(0, |(r, _)| r as usize + 1)
    }

    fn last_column(&self) -> usize {
        self.range.end().map_or(0, |(_, c)| c as usize + 1)
    }

    fn cell(&self, row: usize, column: usize) -> CellValue {
        if row == 0 || column == 0 {
            return CellValue::Empty;
        }
        let pos = ((row - 1) as u32, (column - 1) as u32);
        match self.range.get_value(pos) {
            None | Some(Data::Empty) => CellValue::Empty,
            Some(Data::Float(v)) => CellValue::Number(*v),
            Some(Data::Int(i)) => CellValue::Number(*i as f64),
            Some(Data::Bool(b)) => CellValue::Bool(*b),
            Some(Data::String(s)) => CellValue::Text(s.clone()),
            Some(other) => CellValue::Other(format!("{other:?}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_numeric_readings() {
        assert_eq!(CellValue::Number(2.5).as_f64(), Some(2.5));
        assert_eq!(CellValue::Text(" 410.5 ".into()).as_f64(), Some(410.5));
        assert_eq!(CellValue::Bool(true).as_f64(), Some(1.0));
        assert_eq!(CellValue::Text("time".into()).as_f64(), None);
        assert_eq!(CellValue::Empty.as_f64(), None);
        assert_eq!(CellValue::Other("DateTime(45293.0)".into()).as_f64(), None);
    }

    #[test]
    fn blank_cells() {
        assert!(CellValue::Empty.is_blank());
        assert!(CellValue::Text("   ".into()).is_blank());
        assert!(!CellValue::Number(0.0).is_blank());
        assert!(!CellValue::Other(String::new()).is_blank());
    }

    #[test]
    fn memory_grid_is_one_based_and_bounded() {
        let grid = MemoryGrid::from_numbers(&[&[Some(1.0), Some(2.0)], &[Some(3.0)]]);
        assert_eq!(grid.last_row(), 2);
        assert_eq!(grid.last_column(), 2);
        assert_eq!(grid.cell(1, 2), CellValue::Number(2.0));
        assert_eq!(grid.cell(2, 2), CellValue::Empty);
        assert_eq!(grid.cell(0, 1), CellValue::Empty);
        assert_eq!(grid.cell(9, 9), CellValue::Empty);
    }

    #[test]
    fn garbage_bytes_are_not_a_workbook() {
        assert!(matches!(
            XlsxGrid::from_bytes(b"not a zip archive"),
            Err(DataError::Workbook(_))
        ));
    }
}

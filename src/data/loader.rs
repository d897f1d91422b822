use csv::{ReaderBuilder, Trim};

use super::error::{DataError, Result};
use super::grid::{CellValue, Grid, XlsxGrid};
use super::model::{MatrixData, XySeries};

/// Header cells needed for a text matrix: two wavelengths plus the time label.
pub const MIN_HEADER_CELLS: usize = 3;
pub const MIN_WAVELENGTHS: usize = 2;
pub const MIN_XY_ROWS: usize = 2;

/// Line breaks besides `\r` / `\n` that end a text row.
const EXTRA_LINE_BREAKS: [char; 8] = [
    '\u{0b}', '\u{0c}', '\u{1c}', '\u{1d}', '\u{1e}', '\u{85}', '\u{2028}', '\u{2029}',
];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// How an uploaded file is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// Comma-delimited text (`.csv`).
    DelimitedText,
    /// Spreadsheet workbook (`.xlsx`).
    SpreadsheetGrid,
}

impl Encoding {
    /// Pick the encoding from the file name suffix, ignoring case.
    pub fn from_filename(name: &str) -> Result<Self> {
        let name = name.to_ascii_lowercase();
        if name.ends_with(".xlsx") {
            Ok(Encoding::SpreadsheetGrid)
        } else if name.ends_with(".csv") {
            Ok(Encoding::DelimitedText)
        } else {
            Err(DataError::UnsupportedFormat)
        }
    }

    /// Parse `raw` as a wavelength × time matrix.
    pub fn parse_matrix(self, raw: &[u8]) -> Result<MatrixData> {
        match self {
            Encoding::DelimitedText => parse_matrix_text(&TextTable::from_bytes(raw)?),
            Encoding::SpreadsheetGrid => parse_matrix_grid(&XlsxGrid::from_bytes(raw)?),
        }
    }

    /// Parse `raw` as an x/y series.
    pub fn parse_xy(self, raw: &[u8]) -> Result<XySeries> {
        match self {
            Encoding::DelimitedText => parse_xy_grid(&TextTable::from_bytes(raw)?),
            Encoding::SpreadsheetGrid => parse_xy_grid(&XlsxGrid::from_bytes(raw)?),
        }
    }
}

/// Load a matrix upload.  Dispatch by extension.
pub fn load_matrix(filename: &str, raw: &[u8]) -> Result<MatrixData> {
    Encoding::from_filename(filename)?.parse_matrix(raw)
}

/// Load an x/y upload.  Dispatch by extension.
pub fn load_xy(filename: &str, raw: &[u8]) -> Result<XySeries> {
    Encoding::from_filename(filename)?.parse_xy(raw)
}

// ---------------------------------------------------------------------------
// TextTable – delimited text split into trimmed cells
// ---------------------------------------------------------------------------

/// Non-blank lines of a comma-delimited file, each split into trimmed cells.
///
/// Cells are split on every comma; quotes carry no meaning.
#[derive(Debug, Clone, Default)]
pub struct TextTable {
    lines: Vec<Vec<String>>,
}

impl TextTable {
    /// Decode `raw` as UTF-8, dropping invalid byte sequences.
    pub fn from_bytes(raw: &[u8]) -> Result<Self> {
        let text: String = raw.utf8_chunks().map(|chunk| chunk.valid()).collect();
        Self::from_text(&text)
    }

    pub fn from_text(text: &str) -> Result<Self> {
        let text = text.replace(&EXTRA_LINE_BREAKS[..], "\n");
        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .trim(Trim::All)
            .from_reader(text.as_bytes());

        let mut lines = Vec::new();
        for record in reader.records() {
            let record = record?;
            let blank = record.len() == 1 && record[0].is_empty();
            if blank {
                continue;
            }
            lines.push(record.iter().map(str::to_string).collect());
        }
        Ok(TextTable { lines })
    }

    pub fn lines(&self) -> &[Vec<String>] {
        &self.lines
    }
}

impl Grid for TextTable {
    fn last_row(&self) -> usize {
        self.lines.len()
    }

    fn last_column(&self) -> usize {
        self.lines.iter().map(Vec::len).max().unwrap_or(0)
    }

    fn cell(&self, row: usize, column: usize) -> CellValue {
        if row == 0 || column == 0 {
            return CellValue::Empty;
        }
        self.lines
            .get(row - 1)
            .and_then(|cells| cells.get(column - 1))
            .map_or(CellValue::Empty, |s| CellValue::Text(s.clone()))
    }
}

// ---------------------------------------------------------------------------
// Matrix parsing
// ---------------------------------------------------------------------------

/// Accumulates accepted rows; rejected rows are logged and dropped.
struct MatrixBuilder {
    wavelengths: Vec<f64>,
    times: Vec<f64>,
    matrix: Vec<Vec<f64>>,
    skipped: usize,
}

impl MatrixBuilder {
    fn new(wavelengths: Vec<f64>) -> Self {
        MatrixBuilder {
            wavelengths,
            times: Vec::new(),
            matrix: Vec::new(),
            skipped: 0,
        }
    }

    fn width(&self) -> usize {
        self.wavelengths.len()
    }

    fn push(&mut self, intensities: Vec<f64>, time: f64) {
        debug_assert_eq!(intensities.len(), self.width());
        self.matrix.push(intensities);
        self.times.push(time);
    }

    fn skip(&mut self, row: usize, reason: &str) {
        log::debug!("skipping row {row}: {reason}");
        self.skipped += 1;
    }

    fn finish(self, empty_message: &str) -> Result<MatrixData> {
        if self.times.is_empty() {
            return Err(DataError::structural(empty_message));
        }
        log::info!(
            "parsed matrix: {} wavelengths, {} rows kept, {} skipped",
            self.wavelengths.len(),
            self.times.len(),
            self.skipped
        );
        Ok(MatrixData {
            wavelengths: self.wavelengths,
            times: self.times,
            matrix: self.matrix,
        })
    }
}

fn parse_cells(cells: &[String]) -> Option<Vec<f64>> {
    cells.iter().map(|c| c.parse::<f64>().ok()).collect()
}

/// Text layout: header `w1,w2,...,wn,<label>` then rows `i1,...,in,t`.
///
/// Rows that are short or hold a non-numeric intensity/time are dropped.
pub fn parse_matrix_text(table: &TextTable) -> Result<MatrixData> {
    let lines = table.lines();
    if lines.len() < 2 {
        return Err(DataError::structural(
            "CSV must have at least header and one data row",
        ));
    }

    let header = &lines[0];
    if header.len() < MIN_HEADER_CELLS {
        return Err(DataError::structural("CSV header is too short"));
    }
    let wavelengths = parse_cells(&header[..header.len() - 1])
        .ok_or_else(|| DataError::not_numeric("Header wavelengths must be numeric"))?;

    let mut builder = MatrixBuilder::new(wavelengths);
    let width = builder.width();

    for (i, cells) in lines.iter().enumerate().skip(1) {
        let row = i + 1;
        if cells.len() < width + 1 {
            builder.skip(row, "too few cells");
            continue;
        }
        let Some(intensities) = parse_cells(&cells[..width]) else {
            builder.skip(row, "non-numeric intensity");
            continue;
        };
        let Ok(time) = cells[width].parse::<f64>() else {
            builder.skip(row, "non-numeric time");
            continue;
        };
        builder.push(intensities, time);
    }

    builder.finish("No valid numeric rows found in CSV")
}

/// Grid layout: row 1 holds wavelengths, read left to right up to the first
/// blank cell; the time column sits right after the last wavelength.
pub fn parse_matrix_grid(grid: &impl Grid) -> Result<MatrixData> {
    let last_row = grid.last_row();
    let last_column = grid.last_column();
    if last_row < 2 || last_column < 3 {
        return Err(DataError::structural("Excel sheet is too small"));
    }

    let mut wavelengths = Vec::new();
    for column in 1..last_column {
        let cell = grid.cell(1, column);
        if cell.is_blank() {
            break;
        }
        let value = cell
            .as_f64()
            .ok_or_else(|| DataError::not_numeric("First row must be numeric wavelengths"))?;
        wavelengths.push(value);
    }
    if wavelengths.len() < MIN_WAVELENGTHS {
        return Err(DataError::structural(
            "Could not parse wavelengths from first row",
        ));
    }

    let mut builder = MatrixBuilder::new(wavelengths);
    let width = builder.width();
    let time_column = width + 1;

    for row in 2..=last_row {
        let intensities: Option<Vec<f64>> =
            (1..=width).map(|column| grid.cell(row, column).as_f64()).collect();
        let Some(intensities) = intensities else {
            builder.skip(row, "blank or non-numeric intensity");
            continue;
        };
        let Some(time) = grid.cell(row, time_column).as_f64() else {
            builder.skip(row, "non-numeric time");
            continue;
        };
        builder.push(intensities, time);
    }

    builder.finish("No valid data rows found")
}

// ---------------------------------------------------------------------------
// XY parsing
// ---------------------------------------------------------------------------

/// Read columns 1 and 2 of every row; rows missing either number are dropped.
///
/// There is no header row: a text header simply fails to parse and is skipped.
pub fn parse_xy_grid(grid: &impl Grid) -> Result<XySeries> {
    let mut x = Vec::new();
    let mut y = Vec::new();
    let mut skipped = 0usize;

    for row in 1..=grid.last_row() {
        match (grid.cell(row, 1).as_f64(), grid.cell(row, 2).as_f64()) {
            (Some(xv), Some(yv)) => {
                x.push(xv);
                y.push(yv);
            }
            _ => {
                log::debug!("skipping row {row}: missing or non-numeric x/y");
                skipped += 1;
            }
        }
    }

    if x.len() < MIN_XY_ROWS {
        return Err(DataError::structural(
            "XY data needs at least two numeric rows",
        ));
    }
    log::info!("parsed xy series: {} rows kept, {} skipped", x.len(), skipped);
    Ok(XySeries { x, y })
}

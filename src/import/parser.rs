//! Row Parser
//!
//! Turns tabular input into candidate employee records. Delimited text and
//! spreadsheet grids both funnel into `RowParser::parse_rows`, which owns
//! the header resolution, the row admission filter and start-date
//! normalization.

use super::dates::normalize;
use super::error::{ImportError, ImportResult};
use super::headers::ColumnMap;
use super::xlsx;
use crate::employee::{EmployeeRecord, Field};
use std::path::Path;

/// A single spreadsheet cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Text(String),
    Number(f64),
}

impl Cell {
    /// Cell contents as trimmed text
    ///
    /// Whole numbers render without a fractional part so that numeric
    /// phone numbers and serial dates survive the round trip.
    pub fn as_text(&self) -> String {
        match self {
            Cell::Empty => String::new(),
            Cell::Text(s) => s.trim().to_string(),
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
            Cell::Number(n) => n.to_string(),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            Cell::Number(_) => false,
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s.to_string())
        }
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        if s.is_empty() {
            Cell::Empty
        } else {
            Cell::Text(s)
        }
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

/// Result of parsing one batch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedBatch {
    /// Admitted records, in file order
    pub records: Vec<EmployeeRecord>,
    /// 1-based row numbers (header is row 1) of non-blank rows that lacked
    /// a first name, last name or email
    pub skipped_rows: Vec<usize>,
    /// Number of rows with no content at all
    pub blank_rows: usize,
}

/// Parser for uploaded employee lists
#[derive(Debug, Clone)]
pub struct RowParser {
    /// Keep unreadable start dates verbatim so the validator flags them
    strict_dates: bool,
}

impl Default for RowParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RowParser {
    /// Create a parser with default settings (strict dates)
    pub fn new() -> Self {
        Self { strict_dates: true }
    }

    /// Set whether unreadable start dates are kept (true) or dropped (false)
    pub fn with_strict_dates(mut self, strict: bool) -> Self {
        self.strict_dates = strict;
        self
    }

    /// Parse delimited text (first line is the header row)
    pub fn parse_text(&self, text: &str) -> ImportResult<ParsedBatch> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(text.trim().as_bytes());

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(Cell::from).collect::<Vec<_>>());
        }

        self.parse_rows(&rows)
    }

    /// Parse a 2-D grid whose first row is the header row
    pub fn parse_rows(&self, rows: &[Vec<Cell>]) -> ImportResult<ParsedBatch> {
        let (header, data) = rows.split_first().ok_or(ImportError::Empty)?;

        let headers: Vec<String> = header.iter().map(Cell::as_text).collect();
        let columns = ColumnMap::from_headers(&headers);

        let missing = columns.missing_required();
        if !missing.is_empty() {
            tracing::warn!(missing = ?missing, "Header row is missing required columns");
            return Err(ImportError::MissingHeaders(missing));
        }

        if data.is_empty() {
            return Err(ImportError::Empty);
        }

        let mut batch = ParsedBatch::default();

        for (idx, row) in data.iter().enumerate() {
            if row.iter().all(Cell::is_blank) {
                batch.blank_rows += 1;
                continue;
            }

            let record = self.build_record(&columns, row);
            if is_admissible(&record) {
                batch.records.push(record);
            } else {
                // +2: 1-based, and the header occupies row 1
                batch.skipped_rows.push(idx + 2);
            }
        }

        if batch.records.is_empty() {
            return Err(ImportError::NoRecords);
        }

        tracing::debug!(
            records = batch.records.len(),
            skipped = batch.skipped_rows.len(),
            blank = batch.blank_rows,
            "Parsed employee batch"
        );

        Ok(batch)
    }

    /// Parse the first sheet of an Excel workbook held in memory
    pub fn parse_workbook_bytes(&self, bytes: Vec<u8>) -> ImportResult<ParsedBatch> {
        let rows = xlsx::read_first_sheet_bytes(bytes)?;
        self.parse_rows(&rows)
    }

    /// Parse a `.csv`, `.xlsx` or `.xls` file, chosen by extension
    pub fn parse_path(&self, path: &Path) -> ImportResult<ParsedBatch> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match extension.as_str() {
            "csv" => {
                let text = std::fs::read_to_string(path)?;
                self.parse_text(&text)
            }
            "xlsx" | "xls" => {
                let rows = xlsx::read_first_sheet(path)?;
                self.parse_rows(&rows)
            }
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }

    fn build_record(&self, columns: &ColumnMap, row: &[Cell]) -> EmployeeRecord {
        let mut record = EmployeeRecord::default();

        for (idx, field) in columns.columns() {
            let cell = row.get(*idx).unwrap_or(&Cell::Empty);
            let value = match field {
                Field::StartDate => self.start_date(cell),
                _ => cell.as_text(),
            };
            record.set(*field, value);
        }

        record
    }

    fn start_date(&self, cell: &Cell) -> String {
        let raw = cell.as_text();
        if raw.is_empty() {
            return raw;
        }

        let normalized = normalize(cell);
        if normalized.is_empty() {
            tracing::debug!(value = %raw, strict = self.strict_dates, "Unreadable start date");
            if self.strict_dates {
                return raw;
            }
        }
        normalized
    }
}

/// Parse-time admission filter: names and email must be present
fn is_admissible(record: &EmployeeRecord) -> bool {
    !record.first_name.is_empty() && !record.last_name.is_empty() && !record.email.is_empty()
}

/// Parse delimited text with default settings
pub fn parse_text(text: &str) -> ImportResult<ParsedBatch> {
    RowParser::new().parse_text(text)
}

/// Parse a cell grid with default settings
pub fn parse_rows(rows: &[Vec<Cell>]) -> ImportResult<ParsedBatch> {
    RowParser::new().parse_rows(rows)
}

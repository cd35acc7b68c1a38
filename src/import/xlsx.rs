//! Excel workbook reading
//!
//! Loads the first worksheet of an `.xlsx`/`.xls` workbook into a grid of
//! `Cell`s for the row parser.

use super::error::{ImportError, ImportResult};
use super::Cell;
use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Reader, Sheets};
use std::io::{Cursor, Read, Seek};
use std::path::Path;

/// Read the first sheet of a workbook on disk
pub fn read_first_sheet(path: &Path) -> ImportResult<Vec<Vec<Cell>>> {
    let workbook = open_workbook_auto(path)?;
    first_sheet(workbook)
}

/// Read the first sheet of a workbook held in memory
pub fn read_first_sheet_bytes(bytes: Vec<u8>) -> ImportResult<Vec<Vec<Cell>>> {
    let workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    first_sheet(workbook)
}

fn first_sheet<RS: Read + Seek>(mut workbook: Sheets<RS>) -> ImportResult<Vec<Vec<Cell>>> {
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| ImportError::Excel("Workbook contains no sheets".to_string()))?;

    let range = workbook.worksheet_range(&sheet_name)?;

    let rows: Vec<Vec<Cell>> = range
        .rows()
        .map(|r| r.iter().map(data_to_cell).collect())
        .collect();

    tracing::debug!(sheet = %sheet_name, rows = rows.len(), "Read worksheet");

    Ok(rows)
}

fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) => Cell::from(s.trim()),
        Data::Float(v) => Cell::Number(*v),
        Data::Int(v) => Cell::Number(*v as f64),
        Data::Bool(v) => Cell::Text(v.to_string()),
        Data::DateTime(v) => Cell::Number(v.as_f64()),
        // Keep only the date part of "2024-01-15T00:00:00"
        Data::DateTimeIso(v) => Cell::from(v.split('T').next().unwrap_or_default()),
        Data::DurationIso(v) => Cell::from(v.as_str()),
    }
}

//! Template export
//!
//! Produces downloadable upload templates: a header row with the canonical
//! field names plus example data.

use super::error::{ImportError, ImportResult};
use crate::employee::{EmployeeRecord, Field};
use rust_xlsxwriter::Workbook;
use std::path::Path;
use std::str::FromStr;

/// Worksheet name used in the Excel template
pub const SHEET_NAME: &str = "Employees";

/// Output format for a template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateFormat {
    Csv,
    Xlsx,
}

impl TemplateFormat {
    /// Conventional download file name
    pub fn file_name(&self) -> &'static str {
        match self {
            TemplateFormat::Csv => "employee_template.csv",
            TemplateFormat::Xlsx => "employee_template.xlsx",
        }
    }
}

impl FromStr for TemplateFormat {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(TemplateFormat::Csv),
            "xlsx" | "excel" => Ok(TemplateFormat::Xlsx),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }
}

/// Header row shared by both formats
pub fn header_row() -> Vec<&'static str> {
    Field::all().iter().map(Field::as_str).collect()
}

/// Example records shipped in the templates
pub fn sample_records() -> Vec<EmployeeRecord> {
    vec![
        EmployeeRecord::new("John", "Doe", "john.doe@company.com")
            .phone("+1234567890")
            .department("Engineering")
            .position("Software Engineer")
            .start_date("2024-01-15"),
        EmployeeRecord::new("Jane", "Smith", "jane.smith@company.com")
            .phone("+1234567891")
            .department("Marketing")
            .position("Marketing Manager")
            .start_date("2024-01-20"),
    ]
}

fn record_row(record: &EmployeeRecord) -> Vec<&str> {
    Field::all().iter().map(|f| record.get(*f)).collect()
}

/// CSV template: header plus one example row
pub fn csv_template() -> ImportResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(header_row())?;
    if let Some(sample) = sample_records().first() {
        writer.write_record(record_row(sample))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ImportError::Template(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ImportError::Template(e.to_string()))
}

/// Excel template: header plus two example rows on an "Employees" sheet
pub fn xlsx_template() -> ImportResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;

    for (col, header) in header_row().iter().enumerate() {
        worksheet.write_string(0, col as u16, *header)?;
    }

    for (i, record) in sample_records().iter().enumerate() {
        let row = (i + 1) as u32;
        for (col, value) in record_row(record).iter().enumerate() {
            worksheet.write_string(row, col as u16, *value)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

/// Write a template in the given format to `path`
pub fn write_template(format: TemplateFormat, path: &Path) -> ImportResult<()> {
    match format {
        TemplateFormat::Csv => std::fs::write(path, csv_template()?)?,
        TemplateFormat::Xlsx => std::fs::write(path, xlsx_template()?)?,
    }
    tracing::info!(path = %path.display(), format = ?format, "Wrote employee template");
    Ok(())
}

//! Import error types
//!
//! Structural failures that abort parsing of a whole batch. Bad values in
//! individual cells are never reported here; they flow through to the
//! validator instead.

use thiserror::Error;

/// Errors that abort a batch parse
#[derive(Error, Debug)]
pub enum ImportError {
    /// Header row lacks columns for required fields
    #[error("Missing required headers: {}", .0.join(", "))]
    MissingHeaders(Vec<String>),

    /// Nothing to parse (no header, or header without data rows)
    #[error("File must contain at least a header row and one data row")]
    Empty,

    /// Rows were present but none passed the admission filter
    #[error("No valid employee data found in the file")]
    NoRecords,

    /// File extension not one of csv, xlsx, xls
    #[error("Unsupported file type '{0}'. Please upload a CSV or Excel file (.csv, .xlsx, .xls)")]
    UnsupportedFormat(String),

    /// Delimited text could not be read
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Workbook could not be opened or has no sheet
    #[error("Excel error: {0}")]
    Excel(String),

    /// Template workbook could not be written
    #[error("Template error: {0}")]
    Template(String),

    /// I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::Excel(err.to_string())
    }
}

impl From<rust_xlsxwriter::XlsxError> for ImportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ImportError::Template(err.to_string())
    }
}

/// Result type alias for import operations
pub type ImportResult<T> = Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_headers_display() {
        let err = ImportError::MissingHeaders(vec!["lastname".into(), "email".into()]);
        assert_eq!(err.to_string(), "Missing required headers: lastname, email");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let import_err: ImportError = io_err.into();
        assert!(matches!(import_err, ImportError::Io(_)));
    }
}

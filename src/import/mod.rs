//! Bulk Import
//!
//! Reads uploaded employee lists into candidate records:
//! - **dates**: spreadsheet dates to ISO `YYYY-MM-DD`
//! - **headers**: header aliasing onto canonical fields
//! - **parser**: delimited text / cell grids to `EmployeeRecord`s
//! - **xlsx**: first-sheet reader for Excel workbooks
//! - **template**: CSV and Excel upload templates
//!
//! ## Error policy
//!
//! Only structural problems (missing header columns, empty or unreadable
//! files) fail a parse. Bad cell values degrade to empty or raw strings and
//! are left for the validator to report.

mod dates;
mod error;
mod headers;
mod parser;
mod template;
mod xlsx;

pub use dates::{batch_normalize, is_iso_date, normalize, serial_to_iso, DateInput};
pub use error::{ImportError, ImportResult};
pub use headers::{header_token, resolve as resolve_header, ColumnMap, REQUIRED_FIELDS};
pub use parser::{parse_rows, parse_text, Cell, ParsedBatch, RowParser};
pub use template::{
    csv_template, header_row, sample_records, write_template, xlsx_template, TemplateFormat,
};

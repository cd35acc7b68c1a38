//! Employee data model
//!
//! Shared by every stage of the import pipeline: the parser produces
//! `EmployeeRecord`s, the validator checks them against `Field` rules and
//! the `Department` list, and the API reports a `BulkSubmissionResult`.

mod types;

pub use types::{BulkSubmissionResult, Department, EmployeeRecord, FailedRecord, Field};

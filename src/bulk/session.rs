//! Bulk Session
//!
//! The in-memory list being edited in one bulk-add session, together with
//! its current validation errors. A session exclusively owns its records;
//! nothing is persisted until a submission succeeds.

use crate::employee::{EmployeeRecord, Field};
use crate::import::ParsedBatch;
use crate::validation::{validate_all, ValidationErrors};

/// Editable list of candidate records
#[derive(Debug, Clone, PartialEq)]
pub struct BulkSession {
    records: Vec<EmployeeRecord>,
    errors: ValidationErrors,
}

impl Default for BulkSession {
    fn default() -> Self {
        Self::new()
    }
}

impl BulkSession {
    /// A session starting with a single blank row
    pub fn new() -> Self {
        Self {
            records: vec![EmployeeRecord::default()],
            errors: ValidationErrors::new(),
        }
    }

    /// A session holding the records of a parsed file
    pub fn from_batch(batch: ParsedBatch) -> Self {
        let mut session = Self::new();
        session.load(batch.records);
        session
    }

    /// Replace the whole list (e.g. after parsing an upload)
    pub fn load(&mut self, records: Vec<EmployeeRecord>) {
        self.records = if records.is_empty() {
            vec![EmployeeRecord::default()]
        } else {
            records
        };
        self.errors.clear();
    }

    /// Back to a single blank row
    pub fn reset(&mut self) {
        self.load(Vec::new());
    }

    pub fn records(&self) -> &[EmployeeRecord] {
        &self.records
    }

    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a blank row
    pub fn add_blank(&mut self) {
        self.records.push(EmployeeRecord::default());
    }

    /// Remove a row; the last remaining row is never removed
    pub fn remove(&mut self, index: usize) -> bool {
        if self.records.len() <= 1 || index >= self.records.len() {
            return false;
        }
        self.records.remove(index);
        self.errors.remove_record(index);
        true
    }

    /// Edit one field, optimistically clearing its error
    pub fn update_field(&mut self, index: usize, field: Field, value: impl Into<String>) -> bool {
        let Some(record) = self.records.get_mut(index) else {
            return false;
        };
        record.set(field, value);
        self.errors.clear_field(index, field);
        true
    }

    /// Re-run validation over the whole list; true if every record passes
    pub fn validate(&mut self) -> bool {
        let (ok, errors) = validate_all(&self.records);
        self.errors = errors;
        ok
    }

    /// Install errors computed elsewhere (e.g. by a rejected submit)
    pub fn set_errors(&mut self, errors: ValidationErrors) {
        self.errors = errors;
    }
}

//! Validation error map
//!
//! Per-record, per-field error messages keyed by the record's position in
//! the in-memory list.

use crate::employee::Field;
use serde::Serialize;
use std::collections::BTreeMap;

/// Field → message for one record
pub type FieldErrors = BTreeMap<Field, String>;

/// Record index → field errors
///
/// An index is present only while at least one of its fields has an
/// error; clearing the last field removes the index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    records: BTreeMap<usize, FieldErrors>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the errors for one record; an empty map is not stored
    pub fn insert(&mut self, index: usize, errors: FieldErrors) {
        if errors.is_empty() {
            self.records.remove(&index);
        } else {
            self.records.insert(index, errors);
        }
    }

    /// Errors for one record
    pub fn get(&self, index: usize) -> Option<&FieldErrors> {
        self.records.get(&index)
    }

    /// Error message for one field of one record
    pub fn field_error(&self, index: usize, field: Field) -> Option<&str> {
        self.records
            .get(&index)
            .and_then(|e| e.get(&field))
            .map(String::as_str)
    }

    /// Drop a single field error (the field was just edited)
    ///
    /// Returns true if an error was removed.
    pub fn clear_field(&mut self, index: usize, field: Field) -> bool {
        let Some(errors) = self.records.get_mut(&index) else {
            return false;
        };
        let removed = errors.remove(&field).is_some();
        if errors.is_empty() {
            self.records.remove(&index);
        }
        removed
    }

    /// Forget a removed record and shift later indices down by one
    pub fn remove_record(&mut self, index: usize) {
        self.records.remove(&index);
        let shifted: Vec<(usize, FieldErrors)> = self
            .records
            .split_off(&index)
            .into_iter()
            .map(|(i, e)| (i - 1, e))
            .collect();
        self.records.extend(shifted);
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records with errors
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Total number of field errors across all records
    pub fn field_count(&self) -> usize {
        self.records.values().map(BTreeMap::len).sum()
    }

    /// Indices with errors, ascending
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.records.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &FieldErrors)> {
        self.records.iter().map(|(i, e)| (*i, e))
    }
}

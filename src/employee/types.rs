//! Core data types for bulk employee import
//!
//! This module defines the values that flow through the pipeline:
//! - `EmployeeRecord`: A candidate employee row (pre-validation)
//! - `Field`: The canonical fields of a record
//! - `Department`: The fixed department enumeration shared with the API
//! - `BulkSubmissionResult`: What the API reports after a bulk create

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A candidate employee record
///
/// Every field is a plain string and may be empty. Records are transient
/// values: they are replaced wholesale on each parse or edit.
///
/// Serializes camelCase. Deserialization also accepts the API's
/// `personalEmail` and `joiningDate` keys, alone or next to `email` and
/// `startDate`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", from = "RecordWire")]
pub struct EmployeeRecord {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub position: String,
    pub start_date: String,
}

/// Lenient incoming shape of an `EmployeeRecord`
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RecordWire {
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
    personal_email: Option<String>,
    phone: Option<String>,
    department: Option<String>,
    position: Option<String>,
    start_date: Option<String>,
    joining_date: Option<String>,
}

impl From<RecordWire> for EmployeeRecord {
    fn from(wire: RecordWire) -> Self {
        fn first_non_empty(primary: Option<String>, fallback: Option<String>) -> String {
            primary
                .filter(|v| !v.is_empty())
                .or(fallback)
                .unwrap_or_default()
        }

        Self {
            first_name: wire.first_name.unwrap_or_default(),
            last_name: wire.last_name.unwrap_or_default(),
            email: first_non_empty(wire.email, wire.personal_email),
            phone: wire.phone.unwrap_or_default(),
            department: wire.department.unwrap_or_default(),
            position: wire.position.unwrap_or_default(),
            start_date: first_non_empty(wire.start_date, wire.joining_date),
        }
    }
}

impl EmployeeRecord {
    /// Create a record with the three admission fields set
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
            ..Default::default()
        }
    }

    /// Builder: set phone
    pub fn phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    /// Builder: set department
    pub fn department(mut self, department: impl Into<String>) -> Self {
        self.department = department.into();
        self
    }

    /// Builder: set position
    pub fn position(mut self, position: impl Into<String>) -> Self {
        self.position = position.into();
        self
    }

    /// Builder: set start date
    pub fn start_date(mut self, start_date: impl Into<String>) -> Self {
        self.start_date = start_date.into();
        self
    }

    /// Read a field by name
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::Department => &self.department,
            Field::Position => &self.position,
            Field::StartDate => &self.start_date,
        }
    }

    /// Overwrite a field by name
    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        let slot = match field {
            Field::FirstName => &mut self.first_name,
            Field::LastName => &mut self.last_name,
            Field::Email => &mut self.email,
            Field::Phone => &mut self.phone,
            Field::Department => &mut self.department,
            Field::Position => &mut self.position,
            Field::StartDate => &mut self.start_date,
        };
        *slot = value.into();
    }

    /// Full display name ("First Last"), trimmed
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// True when every field is empty after trimming
    pub fn is_blank(&self) -> bool {
        Field::all().iter().all(|f| self.get(*f).trim().is_empty())
    }
}

/// Canonical field of an `EmployeeRecord`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    FirstName,
    LastName,
    Email,
    Phone,
    Department,
    Position,
    StartDate,
}

impl Field {
    /// All fields in template column order
    pub fn all() -> &'static [Field] {
        &[
            Field::FirstName,
            Field::LastName,
            Field::Email,
            Field::Phone,
            Field::Department,
            Field::Position,
            Field::StartDate,
        ]
    }

    /// The camelCase name used on the wire and in templates
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::FirstName => "firstName",
            Field::LastName => "lastName",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Department => "department",
            Field::Position => "position",
            Field::StartDate => "startDate",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::all()
            .iter()
            .copied()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown field: {}", s))
    }
}

/// Departments accepted by the remote system
///
/// Must stay in sync with the backend's list; a mismatch surfaces as a
/// validation error on the client or a rejection from the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Department {
    Executive,
    Engineering,
    Product,
    Design,
    Marketing,
    Sales,
    #[serde(rename = "HR")]
    Hr,
    Finance,
    Operations,
    #[serde(rename = "Customer Support")]
    CustomerSupport,
    Legal,
    Other,
}

impl Department {
    /// All departments in the order the backend lists them
    pub fn all() -> &'static [Department] {
        &[
            Department::Executive,
            Department::Engineering,
            Department::Product,
            Department::Design,
            Department::Marketing,
            Department::Sales,
            Department::Hr,
            Department::Finance,
            Department::Operations,
            Department::CustomerSupport,
            Department::Legal,
            Department::Other,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Department::Executive => "Executive",
            Department::Engineering => "Engineering",
            Department::Product => "Product",
            Department::Design => "Design",
            Department::Marketing => "Marketing",
            Department::Sales => "Sales",
            Department::Hr => "HR",
            Department::Finance => "Finance",
            Department::Operations => "Operations",
            Department::CustomerSupport => "Customer Support",
            Department::Legal => "Legal",
            Department::Other => "Other",
        }
    }
}

impl std::fmt::Display for Department {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Department {
    type Err = String;

    /// Exact (trimmed) match against the backend names
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Department::all()
            .iter()
            .copied()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| format!("Unknown department: {}", s))
    }
}

/// One record the API refused, with its reason
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FailedRecord {
    #[serde(alias = "employee")]
    pub record: EmployeeRecord,
    #[serde(alias = "error")]
    pub reason: String,
}

/// Outcome of a bulk create, as reported by the API
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct BulkSubmissionResult {
    pub successful: Vec<EmployeeRecord>,
    pub failed: Vec<FailedRecord>,
}

impl BulkSubmissionResult {
    /// Fold another partial result into this one, keeping order
    pub fn merge(&mut self, other: BulkSubmissionResult) {
        self.successful.extend(other.successful);
        self.failed.extend(other.failed);
    }

    pub fn total(&self) -> usize {
        self.successful.len() + self.failed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_camel_case() {
        let record = EmployeeRecord::new("John", "Doe", "john@x.com").start_date("2024-01-15");
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["firstName"], "John");
        assert_eq!(json["lastName"], "Doe");
        assert_eq!(json["startDate"], "2024-01-15");
        assert_eq!(json["phone"], "");
    }

    #[test]
    fn test_record_deserializes_api_shape() {
        let json = r#"{"name": "Jane Smith", "personalEmail": "jane@x.com", "joiningDate": "2024-02-01"}"#;
        let record: EmployeeRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.email, "jane@x.com");
        assert_eq!(record.start_date, "2024-02-01");
        assert!(record.first_name.is_empty());
    }

    #[test]
    fn test_record_deserializes_submitted_shape() {
        // What bulk create sends, echoed back: both email keys plus extras
        let json = r#"{
            "firstName": "John", "lastName": "Doe",
            "email": "john@x.com", "personalEmail": "john@x.com",
            "startDate": "2024-01-14", "name": "John Doe", "role": "employee"
        }"#;
        let record: EmployeeRecord = serde_json::from_str(json).unwrap();

        assert_eq!(record.email, "john@x.com");
        assert_eq!(record.start_date, "2024-01-14");
        assert_eq!(record.full_name(), "John Doe");

        let json = r#"{"email": "", "personalEmail": "alt@x.com", "phone": null}"#;
        let record: EmployeeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.email, "alt@x.com");
        assert!(record.phone.is_empty());
    }

    #[test]
    fn test_record_serializes_single_email_key() {
        let json = serde_json::to_value(EmployeeRecord::new("A", "B", "a@b.co")).unwrap();
        assert_eq!(json["email"], "a@b.co");
        assert!(json.get("personalEmail").is_none());
    }

    #[test]
    fn test_field_get_set() {
        let mut record = EmployeeRecord::default();
        assert!(record.is_blank());

        record.set(Field::Position, "Engineer");
        assert_eq!(record.get(Field::Position), "Engineer");
        assert!(!record.is_blank());
    }

    #[test]
    fn test_department_parse() {
        assert_eq!("HR".parse::<Department>(), Ok(Department::Hr));
        assert_eq!(
            " Customer Support ".parse::<Department>(),
            Ok(Department::CustomerSupport)
        );
        assert!("Human Resources".parse::<Department>().is_err());
        assert!("engineering".parse::<Department>().is_err());
        assert_eq!(Department::all().len(), 12);
    }

    #[test]
    fn test_failed_record_accepts_alternate_keys() {
        let json = r#"{"employee": {"email": "a@b.co"}, "error": "duplicate"}"#;
        let failed: FailedRecord = serde_json::from_str(json).unwrap();
        assert_eq!(failed.record.email, "a@b.co");
        assert_eq!(failed.reason, "duplicate");
    }
}

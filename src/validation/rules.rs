//! Field rules for employee records

use super::errors::{FieldErrors, ValidationErrors};
use crate::employee::{Department, EmployeeRecord, Field};
use crate::import::is_iso_date;
use regex::Regex;
use std::sync::OnceLock;

/// Phone numbers must reduce to exactly this many digits
pub const PHONE_DIGITS: usize = 10;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    // local@domain.tld, intentionally permissive
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"))
}

/// Check one record; every field is evaluated
pub fn validate_record(record: &EmployeeRecord) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if record.first_name.trim().is_empty() {
        errors.insert(Field::FirstName, "First name is required".to_string());
    }

    if record.last_name.trim().is_empty() {
        errors.insert(Field::LastName, "Last name is required".to_string());
    }

    let email = record.email.trim();
    if email.is_empty() {
        errors.insert(Field::Email, "Email is required".to_string());
    } else if !email_regex().is_match(email) {
        errors.insert(Field::Email, "Invalid email format".to_string());
    }

    if record.department.trim().is_empty() {
        errors.insert(Field::Department, "Department is required".to_string());
    } else if record.department.parse::<Department>().is_err() {
        let names: Vec<&str> = Department::all().iter().map(Department::as_str).collect();
        errors.insert(
            Field::Department,
            format!("Department must be one of: {}", names.join(", ")),
        );
    }

    if record.position.trim().is_empty() {
        errors.insert(Field::Position, "Position is required".to_string());
    }

    let phone = record.phone.trim();
    if !phone.is_empty() && phone_digits(phone).len() != PHONE_DIGITS {
        errors.insert(
            Field::Phone,
            format!("Phone number must contain exactly {} digits", PHONE_DIGITS),
        );
    }

    // Normalization happens upstream; anything else here is an error
    let start_date = record.start_date.trim();
    if !start_date.is_empty() && !is_iso_date(start_date) {
        errors.insert(
            Field::StartDate,
            "Start date must be in YYYY-MM-DD format".to_string(),
        );
    }

    errors
}

/// Digits of a phone number with all punctuation stripped
pub fn phone_digits(phone: &str) -> String {
    phone.chars().filter(char::is_ascii_digit).collect()
}

/// Check every record; records without errors have no entry
pub fn validate(records: &[EmployeeRecord]) -> ValidationErrors {
    let mut map = ValidationErrors::new();
    for (index, record) in records.iter().enumerate() {
        map.insert(index, validate_record(record));
    }
    map
}

/// Check every record and report whether the whole batch may be submitted
pub fn validate_all(records: &[EmployeeRecord]) -> (bool, ValidationErrors) {
    let map = validate(records);
    if !map.is_empty() {
        tracing::debug!(
            records = map.len(),
            fields = map.field_count(),
            "Batch failed validation"
        );
    }
    (map.is_empty(), map)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> EmployeeRecord {
        EmployeeRecord::new("John", "Doe", "john@x.com")
            .department("Engineering")
            .position("Engineer")
    }

    #[test]
    fn test_valid_record() {
        assert!(validate_record(&valid()).is_empty());
        assert!(validate_record(&valid().phone("(555) 123-4567").start_date("2024-01-15")).is_empty());
    }

    #[test]
    fn test_blank_record_reports_every_required_field() {
        let errors = validate_record(&EmployeeRecord::default());
        let fields: Vec<Field> = errors.keys().copied().collect();
        assert_eq!(
            fields,
            vec![
                Field::FirstName,
                Field::LastName,
                Field::Email,
                Field::Department,
                Field::Position
            ]
        );
    }

    #[test]
    fn test_whitespace_only_is_missing() {
        let mut record = valid();
        record.first_name = "   ".into();
        let errors = validate_record(&record);
        assert_eq!(errors.get(&Field::FirstName).unwrap(), "First name is required");
    }

    #[test]
    fn test_email_format() {
        for bad in ["john", "john@x", "john @x.com", "@x.com", "john@@x.com"] {
            let mut record = valid();
            record.email = bad.into();
            assert_eq!(
                validate_record(&record).get(&Field::Email).map(String::as_str),
                Some("Invalid email format"),
                "email {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_department_must_be_known() {
        let errors = validate_record(&valid().department("Human Resources"));
        assert!(errors[&Field::Department].starts_with("Department must be one of"));
        assert!(validate_record(&valid().department("Customer Support")).is_empty());
    }

    #[test]
    fn test_phone_digits() {
        assert!(validate_record(&valid().phone("(555) 123-4567")).is_empty());
        assert!(validate_record(&valid().phone("+1234567890")).is_empty());
        assert!(validate_record(&valid().phone("555-1234")).contains_key(&Field::Phone));
        assert!(validate_record(&valid().phone("+1 (555) 123-4567")).contains_key(&Field::Phone));
    }

    #[test]
    fn test_start_date_must_be_normalized() {
        assert!(validate_record(&valid().start_date("1/15/2024")).contains_key(&Field::StartDate));
        assert!(validate_record(&valid().start_date("45306")).contains_key(&Field::StartDate));
        assert!(validate_record(&valid().start_date("2024-02-30")).contains_key(&Field::StartDate));
    }

    #[test]
    fn test_fixing_fields_removes_index() {
        let mut records = vec![valid(), EmployeeRecord {
            first_name: String::new(),
            phone: "123".into(),
            ..valid()
        }];

        let (ok, errors) = validate_all(&records);
        assert!(!ok);
        assert!(errors.get(0).is_none());
        assert_eq!(errors.get(1).unwrap().len(), 2);

        records[1].first_name = "Jane".into();
        let errors = validate(&records);
        assert_eq!(errors.get(1).unwrap().len(), 1);

        records[1].phone = "5551234567".into();
        let (ok, errors) = validate_all(&records);
        assert!(ok);
        assert!(errors.is_empty());
    }
}

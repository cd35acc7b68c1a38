//! Header aliasing
//!
//! Maps the header cells of an uploaded file onto canonical record fields.
//! Headers are compared as "tokens": lower-cased with every non-alphabetic
//! character removed, so `First Name`, `first_name` and `FirstName` all
//! become `firstname`.

use crate::employee::Field;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Fields a file must provide columns for
pub const REQUIRED_FIELDS: [Field; 3] = [Field::FirstName, Field::LastName, Field::Email];

const ALIASES: &[(&str, Field)] = &[
    ("firstname", Field::FirstName),
    ("fname", Field::FirstName),
    ("lastname", Field::LastName),
    ("lname", Field::LastName),
    ("email", Field::Email),
    ("phone", Field::Phone),
    ("phonenumber", Field::Phone),
    ("mobile", Field::Phone),
    ("department", Field::Department),
    ("position", Field::Position),
    ("startdate", Field::StartDate),
    ("dateofjoining", Field::StartDate),
    ("joindate", Field::StartDate),
];

fn alias_table() -> &'static HashMap<&'static str, Field> {
    static TABLE: OnceLock<HashMap<&'static str, Field>> = OnceLock::new();
    TABLE.get_or_init(|| ALIASES.iter().copied().collect())
}

/// Reduce a raw header to its comparison token
pub fn header_token(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// The canonical token for a field (what a missing-header report names)
pub fn canonical_token(field: Field) -> String {
    header_token(field.as_str())
}

/// Resolve one raw header to a field, if recognized
pub fn resolve(raw: &str) -> Option<Field> {
    alias_table().get(header_token(raw).as_str()).copied()
}

/// Column layout resolved from a header row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    columns: Vec<(usize, Field)>,
}

impl ColumnMap {
    /// Resolve every header cell; unrecognized headers are ignored
    ///
    /// When two columns resolve to the same field the later one wins,
    /// matching a left-to-right assignment over the row.
    pub fn from_headers<S: AsRef<str>>(headers: &[S]) -> Self {
        let columns = headers
            .iter()
            .enumerate()
            .filter_map(|(idx, h)| resolve(h.as_ref()).map(|field| (idx, field)))
            .collect();
        Self { columns }
    }

    /// (column index, field) pairs in column order
    pub fn columns(&self) -> &[(usize, Field)] {
        &self.columns
    }

    pub fn contains(&self, field: Field) -> bool {
        self.columns.iter().any(|(_, f)| *f == field)
    }

    /// Tokens of required fields with no column
    pub fn missing_required(&self) -> Vec<String> {
        REQUIRED_FIELDS
            .iter()
            .filter(|f| !self.contains(**f))
            .map(|f| canonical_token(*f))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_token() {
        assert_eq!(header_token("First Name"), "firstname");
        assert_eq!(header_token("start_date"), "startdate");
        assert_eq!(header_token("E-mail"), "email");
        assert_eq!(header_token("Phone #1"), "phone");
    }

    #[test]
    fn test_aliases() {
        assert_eq!(resolve("FName"), Some(Field::FirstName));
        assert_eq!(resolve("l_name"), Some(Field::LastName));
        assert_eq!(resolve("Date of Joining"), Some(Field::StartDate));
        assert_eq!(resolve("Join Date"), Some(Field::StartDate));
        assert_eq!(resolve("Mobile"), Some(Field::Phone));
        assert_eq!(resolve("Phone Number"), Some(Field::Phone));
        assert_eq!(resolve("employee id"), None);
    }

    #[test]
    fn test_column_map_missing_required() {
        let map = ColumnMap::from_headers(&["firstname", "lastname", "phone"]);
        assert_eq!(map.missing_required(), vec!["email".to_string()]);

        let map = ColumnMap::from_headers(&["fname", "lname", "Email Address"]);
        assert_eq!(map.missing_required(), vec!["email".to_string()]);

        let map = ColumnMap::from_headers(&["fname", "lname", "e-mail", "notes"]);
        assert!(map.missing_required().is_empty());
        assert_eq!(map.columns().len(), 3);
    }
}

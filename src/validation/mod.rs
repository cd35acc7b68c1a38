//! Record Validator
//!
//! Checks candidate records against per-field rules and produces a
//! `ValidationErrors` map. This is the single source of truth for what
//! blocks a submission; it never rewrites values (dates included).

mod errors;
mod rules;

pub use errors::{FieldErrors, ValidationErrors};
pub use rules::{phone_digits, validate, validate_all, validate_record, PHONE_DIGITS};

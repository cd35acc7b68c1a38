//! User-facing messages for bulk submission outcomes

use crate::client::ErrorKind;

/// Message shown for a failed bulk create
pub fn user_message(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Duplicate => {
            "Some employees already exist with the provided email addresses. Please check for duplicates and try again."
        }
        ErrorKind::Validation => {
            "Invalid employee data. Please check all required fields are properly filled."
        }
        ErrorKind::Network => {
            "Network connection failed. Please check your internet connection and try again."
        }
        ErrorKind::Unauthorized => "Session expired. Please log in again to continue.",
        ErrorKind::PermissionDenied => "You do not have permission to perform this action.",
        ErrorKind::NotFound => "The requested information could not be found.",
        ErrorKind::RateLimited => "Too many requests. Please wait a moment and try again.",
        ErrorKind::Server => {
            "Server is temporarily unavailable. Please try again in a few minutes."
        }
        ErrorKind::BulkCreateFailed => {
            "Unable to create employees in bulk. Please try again or create them individually."
        }
        ErrorKind::Unknown => "Unable to create employees. Please check your data and try again.",
    }
}

/// Message for a batch where every record was created
pub fn success_message(created: usize) -> String {
    format!("Successfully created {} employees!", created)
}

/// Message for a batch the API accepted only in part
pub fn partial_message(created: usize, failed: usize) -> String {
    format!("{} created, {} failed", created, failed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_message_is_specific() {
        let kind = ErrorKind::classify(None, "duplicate_employees");
        assert_eq!(kind, ErrorKind::Duplicate);
        assert!(user_message(kind).contains("already exist"));
        assert_ne!(user_message(kind), user_message(ErrorKind::Unknown));
    }

    #[test]
    fn test_count_messages() {
        assert_eq!(success_message(3), "Successfully created 3 employees!");
        assert_eq!(partial_message(2, 1), "2 created, 1 failed");
    }
}

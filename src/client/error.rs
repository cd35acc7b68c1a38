//! Employee API error types
//!
//! `ErrorKind` is the typed classification callers act on. A structured
//! error code from the server is preferred; when the server only sends
//! free text, the kind is sniffed from keywords in the message.

use thiserror::Error;

/// Coarse category of an API failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Duplicate,
    Validation,
    Network,
    Unauthorized,
    PermissionDenied,
    NotFound,
    RateLimited,
    Server,
    BulkCreateFailed,
    Unknown,
}

/// Keyword table for free-text classification, checked in order
const SNIFF_TABLE: &[(&[&str], ErrorKind)] = &[
    (&["duplicate", "already exists", "conflict"], ErrorKind::Duplicate),
    (&["network", "connection", "fetch"], ErrorKind::Network),
    (&["unauthorized", "401"], ErrorKind::Unauthorized),
    (&["permission", "forbidden", "403"], ErrorKind::PermissionDenied),
    (&["validation", "invalid"], ErrorKind::Validation),
    (&["rate limit", "rate_limit", "too many requests"], ErrorKind::RateLimited),
    (&["server", "500", "503"], ErrorKind::Server),
    (&["not found", "not_found", "404"], ErrorKind::NotFound),
    (&["bulk_create_failed"], ErrorKind::BulkCreateFailed),
];

impl ErrorKind {
    /// Map a structured error code sent by the server
    pub fn from_code(code: &str) -> Option<Self> {
        let kind = match code.trim().to_ascii_lowercase().as_str() {
            "duplicate" | "duplicate_employees" | "duplicate_email" | "conflict" => {
                ErrorKind::Duplicate
            }
            "validation_failed" | "validation_error" | "invalid_data" => ErrorKind::Validation,
            "network_error" => ErrorKind::Network,
            "unauthorized" => ErrorKind::Unauthorized,
            "permission_denied" | "forbidden" => ErrorKind::PermissionDenied,
            "not_found" => ErrorKind::NotFound,
            "rate_limited" => ErrorKind::RateLimited,
            "server_error" | "internal_error" => ErrorKind::Server,
            "bulk_create_failed" => ErrorKind::BulkCreateFailed,
            _ => return None,
        };
        Some(kind)
    }

    /// Best-effort classification of free error text
    pub fn sniff(text: &str) -> Option<Self> {
        let lower = text.to_lowercase();
        SNIFF_TABLE
            .iter()
            .find(|(needles, _)| needles.iter().any(|n| lower.contains(n)))
            .map(|(_, kind)| *kind)
    }

    /// Classify using the code if it is recognized, otherwise the text
    pub fn classify(code: Option<&str>, text: &str) -> Self {
        code.and_then(ErrorKind::from_code)
            .or_else(|| ErrorKind::sniff(text))
            .unwrap_or(ErrorKind::Unknown)
    }

    fn from_status(status: u16) -> Option<Self> {
        match status {
            401 => Some(ErrorKind::Unauthorized),
            403 => Some(ErrorKind::PermissionDenied),
            404 => Some(ErrorKind::NotFound),
            409 => Some(ErrorKind::Duplicate),
            429 => Some(ErrorKind::RateLimited),
            s if s >= 500 => Some(ErrorKind::Server),
            _ => None,
        }
    }
}

/// Errors that can occur when talking to the employee API
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Employee API unavailable (network connection failed)")]
    Unavailable,

    #[error("Request timeout")]
    Timeout,

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api {
        status: u16,
        message: String,
        code: Option<String>,
    },

    /// The API answered `success: false`
    #[error("Request rejected: {message}")]
    Rejected {
        message: String,
        code: Option<String>,
    },

    #[error("Invalid response: {0}")]
    Decode(String),
}

impl ApiError {
    /// Map a transport-level failure, separating timeouts and refused connections
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_connect() {
            ApiError::Unavailable
        } else {
            ApiError::Request(err)
        }
    }

    /// Typed classification of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Unavailable | ApiError::Timeout | ApiError::Request(_) => ErrorKind::Network,
            ApiError::Api {
                status,
                message,
                code,
            } => code
                .as_deref()
                .and_then(ErrorKind::from_code)
                .or_else(|| ErrorKind::from_status(*status))
                .or_else(|| ErrorKind::sniff(message))
                .unwrap_or(if *status == 400 {
                    ErrorKind::Validation
                } else {
                    ErrorKind::BulkCreateFailed
                }),
            ApiError::Rejected { message, code } => ErrorKind::classify(code.as_deref(), message),
            ApiError::Decode(_) => ErrorKind::Server,
        }
    }
}

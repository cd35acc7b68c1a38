//! Employee API
//!
//! The remote system of record is an external collaborator. This module
//! pins down what the import pipeline needs from it:
//!
//! - **EmployeeApi**: the trait the coordinator depends on
//! - **HttpEmployeeApi**: the REST implementation (`reqwest`)
//!
//! Tests substitute their own `EmployeeApi` implementations.

mod error;
mod http;

pub use error::{ApiError, ErrorKind};
pub use http::{ApiClientConfig, HttpEmployeeApi};

use crate::employee::{BulkSubmissionResult, EmployeeRecord};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Operations the import pipeline needs from the remote system
#[async_trait]
pub trait EmployeeApi: Send + Sync {
    /// Create a batch of employees for a company in one call
    async fn bulk_create(
        &self,
        company_id: &str,
        records: &[EmployeeRecord],
    ) -> Result<BulkCreateResponse, ApiError>;

    /// Fetch the employees already registered for a company
    async fn list_employees(&self, company_id: &str) -> Result<Vec<EmployeeRecord>, ApiError>;
}

/// Envelope returned by the bulk create endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BulkCreateResponse {
    pub success: bool,
    #[serde(default)]
    pub data: BulkSubmissionResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Structured error code, when the server provides one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl BulkCreateResponse {
    /// A successful response carrying `data`
    pub fn ok(data: BulkSubmissionResult) -> Self {
        Self {
            success: true,
            data,
            message: None,
            code: None,
        }
    }

    /// A `success: false` response
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: BulkSubmissionResult::default(),
            message: Some(message.into()),
            code: None,
        }
    }
}

//! # Roster
//!
//! Bulk employee onboarding - turns an uploaded CSV or Excel employee list
//! into validated records and submits them to the company's employee API
//! in one batch.
//!
//! ## Pipeline
//!
//! ```text
//! file -> import (headers, dates) -> BulkSession -> validation -> BulkSubmitter -> EmployeeApi
//! ```
//!
//! ## Modules
//!
//! - [`employee`]: Record, field and department types
//! - [`import`]: CSV/XLSX parsing, date normalization, templates
//! - [`validation`]: Per-field rules and the error map
//! - [`bulk`]: Editable session and the submission coordinator
//! - [`client`]: Remote employee API trait and HTTP client
//! - [`repository`]: Local per-company employee store
//! - [`config`]: TOML + environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use roster::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let batch = parse_text("firstName,lastName,email,department,position\n\
//!                             John,Doe,john@example.com,Engineering,Engineer")?;
//!     let mut session = BulkSession::from_batch(batch);
//!
//!     let api = Arc::new(HttpEmployeeApi::new(ApiClientConfig::default())?);
//!     let submitter = BulkSubmitter::new(api, SubmitConfig::default());
//!
//!     let report = submitter
//!         .submit_session(&mut session, "company-1", |p| println!("{}%", p))
//!         .await?;
//!     println!("{}", report.message);
//!
//!     Ok(())
//! }
//! ```

pub mod bulk;
pub mod client;
pub mod config;
pub mod employee;
pub mod import;
pub mod repository;
pub mod validation;

// Re-export top-level types for convenience
pub use employee::{BulkSubmissionResult, Department, EmployeeRecord, FailedRecord, Field};

pub use import::{
    normalize as normalize_date, parse_rows, parse_text, Cell, ImportError, ImportResult,
    ParsedBatch, RowParser, TemplateFormat,
};

pub use validation::{validate, validate_all, validate_record, ValidationErrors};

pub use bulk::{
    BulkSession, BulkSubmitter, SubmissionReport, SubmissionState, SubmitConfig, SubmitError,
};

pub use client::{
    ApiClientConfig, ApiError, BulkCreateResponse, EmployeeApi, ErrorKind, HttpEmployeeApi,
};

pub use repository::{
    EmployeeRepository, InMemoryRepository, JsonFileRepository, RepositoryError,
    RepositoryResult,
};

pub use config::{Config, ConfigError};

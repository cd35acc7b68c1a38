//! Bulk Submission Coordinator
//!
//! Drives one bulk create from validation to a terminal outcome:
//!
//! ```text
//! Idle -> Validating -> Submitting -> Succeeded | PartiallyFailed | Failed
//!   ^          |                          |              |
//!   +----------+ (invalid)                +--(delay)-----+--> Idle
//! ```
//!
//! `Failed` stays until `dismiss()` or the next submit. The current state
//! is published on a `watch` channel so a front end can render it.

use super::messages::{partial_message, success_message, user_message};
use super::session::BulkSession;
use crate::client::{ApiError, EmployeeApi, ErrorKind};
use crate::employee::{BulkSubmissionResult, EmployeeRecord, FailedRecord};
use crate::import::batch_normalize;
use crate::repository::EmployeeRepository;
use crate::validation::{validate_all, ValidationErrors};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::watch;

/// Where a submission currently stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Validating,
    Submitting,
    Succeeded { created: usize },
    PartiallyFailed { created: usize, failed: usize },
    Failed { kind: ErrorKind, message: String },
}

impl SubmissionState {
    /// A submission is running (the submit control should be disabled)
    pub fn is_busy(&self) -> bool {
        matches!(self, SubmissionState::Validating | SubmissionState::Submitting)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SubmissionState::Succeeded { .. }
                | SubmissionState::PartiallyFailed { .. }
                | SubmissionState::Failed { .. }
        )
    }
}

/// Configuration for submission behavior
#[derive(Debug, Clone)]
pub struct SubmitConfig {
    /// Split batches larger than this into several requests (None = one request)
    pub chunk_size: Option<usize>,
    /// Pause between chunked requests
    pub chunk_delay: Duration,
    /// How long a success stays visible before returning to Idle
    pub reset_delay: Duration,
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            chunk_size: None,
            chunk_delay: Duration::from_millis(200),
            reset_delay: Duration::from_secs(2),
        }
    }
}

/// Outcome of a submission the API accepted
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionReport {
    /// `Succeeded` or `PartiallyFailed`
    pub state: SubmissionState,
    pub result: BulkSubmissionResult,
    pub message: String,
}

impl SubmissionReport {
    pub fn created(&self) -> usize {
        match self.state {
            SubmissionState::Succeeded { created }
            | SubmissionState::PartiallyFailed { created, .. } => created,
            _ => 0,
        }
    }
}

/// Reasons a submit call did not produce a report
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("Company ID not found. Please ensure you are logged in as a company user.")]
    MissingCompany,

    #[error("No employees to submit")]
    Empty,

    #[error("A submission is already in progress")]
    InFlight,

    #[error("Please fix the validation errors before submitting.")]
    Invalid(ValidationErrors),

    /// Transport failure or `success: false`; `message` is user-facing
    #[error("{message}")]
    Failed {
        kind: ErrorKind,
        message: String,
        #[source]
        source: ApiError,
    },
}

/// Forwards only increasing percentages to the caller's callback
struct Progress<F> {
    callback: F,
    last: u8,
}

impl<F: FnMut(u8)> Progress<F> {
    fn report(&mut self, percent: u8) {
        let percent = percent.min(100);
        if percent > self.last {
            self.last = percent;
            (self.callback)(percent);
        }
    }
}

/// Releases the in-flight slot; if the submit future is dropped early the
/// state goes back to Idle and the outcome is discarded
struct InFlightGuard {
    in_flight: Arc<AtomicBool>,
    state: Arc<watch::Sender<SubmissionState>>,
    finished: bool,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if !self.finished {
            let reset = self.state.send_if_modified(|s| {
                if s.is_busy() {
                    *s = SubmissionState::Idle;
                    true
                } else {
                    false
                }
            });
            if reset {
                tracing::warn!("Bulk submission abandoned before completion");
            }
        }
        self.in_flight.store(false, Ordering::SeqCst);
    }
}

/// Coordinates bulk submissions for one form instance
pub struct BulkSubmitter {
    api: Arc<dyn EmployeeApi>,
    repository: Option<Arc<dyn EmployeeRepository>>,
    config: SubmitConfig,
    state: Arc<watch::Sender<SubmissionState>>,
    generation: Arc<AtomicU64>,
    in_flight: Arc<AtomicBool>,
}

impl BulkSubmitter {
    /// Create a coordinator in the Idle state
    pub fn new(api: Arc<dyn EmployeeApi>, config: SubmitConfig) -> Self {
        let (state, _) = watch::channel(SubmissionState::Idle);
        Self {
            api,
            repository: None,
            config,
            state: Arc::new(state),
            generation: Arc::new(AtomicU64::new(0)),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Record created employees in a local repository as well
    pub fn with_repository(mut self, repository: Arc<dyn EmployeeRepository>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Current state
    pub fn state(&self) -> SubmissionState {
        self.state.borrow().clone()
    }

    /// Watch state transitions
    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
        self.state.subscribe()
    }

    /// Return from a terminal state to Idle
    pub fn dismiss(&self) {
        self.state.send_if_modified(|s| {
            if s.is_terminal() {
                *s = SubmissionState::Idle;
                true
            } else {
                false
            }
        });
    }

    fn set_state(&self, state: SubmissionState) {
        tracing::debug!(state = ?state, "Submission state changed");
        self.state.send_replace(state);
    }

    /// Validate, normalize and submit `records` for `company_id`
    ///
    /// `on_progress` receives increasing percentages ending at 100 when the
    /// API answered. Validation failures leave the coordinator Idle and make
    /// no network call.
    pub async fn submit<F>(
        &self,
        company_id: &str,
        records: &[EmployeeRecord],
        on_progress: F,
    ) -> Result<SubmissionReport, SubmitError>
    where
        F: FnMut(u8) + Send,
    {
        if company_id.trim().is_empty() {
            return Err(SubmitError::MissingCompany);
        }
        if records.is_empty() {
            return Err(SubmitError::Empty);
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(SubmitError::InFlight);
        }

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let mut guard = InFlightGuard {
            in_flight: Arc::clone(&self.in_flight),
            state: Arc::clone(&self.state),
            finished: false,
        };
        let mut progress = Progress {
            callback: on_progress,
            last: 0,
        };

        self.set_state(SubmissionState::Validating);
        let (valid, errors) = validate_all(records);
        if !valid {
            tracing::info!(
                invalid_records = errors.len(),
                "Bulk submission blocked by validation errors"
            );
            self.set_state(SubmissionState::Idle);
            guard.finished = true;
            return Err(SubmitError::Invalid(errors));
        }

        let mut batch = records.to_vec();
        batch_normalize(&mut batch);
        progress.report(10);

        self.set_state(SubmissionState::Submitting);
        let started = std::time::Instant::now();

        let outcome = match self.config.chunk_size {
            Some(size) if size > 0 && batch.len() > size => {
                self.send_chunked(company_id, &batch, size, &mut progress)
                    .await
            }
            _ => self.send_single(company_id, &batch, &mut progress).await,
        };

        let reply = match outcome {
            Ok(result) => {
                let report = self.finish(company_id, &batch, result, generation).await;
                tracing::info!(
                    company_id,
                    created = report.created(),
                    failed = report.result.failed.len(),
                    duration_ms = started.elapsed().as_millis() as u64,
                    "Bulk submission completed"
                );
                Ok(report)
            }
            Err(source) => {
                let kind = source.kind();
                let message = user_message(kind).to_string();
                tracing::error!(company_id, error = %source, kind = ?kind, "Bulk submission failed");
                self.set_state(SubmissionState::Failed {
                    kind,
                    message: message.clone(),
                });
                Err(SubmitError::Failed {
                    kind,
                    message,
                    source,
                })
            }
        };
        guard.finished = true;
        reply
    }

    /// Submit a session's records; validation errors land in the session
    /// and a successful submission clears it
    pub async fn submit_session<F>(
        &self,
        session: &mut BulkSession,
        company_id: &str,
        on_progress: F,
    ) -> Result<SubmissionReport, SubmitError>
    where
        F: FnMut(u8) + Send,
    {
        match self.submit(company_id, session.records(), on_progress).await {
            Ok(report) => {
                session.reset();
                Ok(report)
            }
            Err(SubmitError::Invalid(errors)) => {
                session.set_errors(errors.clone());
                Err(SubmitError::Invalid(errors))
            }
            Err(e) => Err(e),
        }
    }

    async fn send_single<F: FnMut(u8)>(
        &self,
        company_id: &str,
        batch: &[EmployeeRecord],
        progress: &mut Progress<F>,
    ) -> Result<BulkSubmissionResult, ApiError> {
        progress.report(30);
        let response = self.api.bulk_create(company_id, batch).await?;
        if !response.success {
            return Err(ApiError::Rejected {
                message: response
                    .message
                    .unwrap_or_else(|| "Failed to create employees".to_string()),
                code: response.code,
            });
        }
        progress.report(100);
        Ok(response.data)
    }

    /// One request per chunk; a failed chunk reports all its records as failed
    async fn send_chunked<F: FnMut(u8)>(
        &self,
        company_id: &str,
        batch: &[EmployeeRecord],
        size: usize,
        progress: &mut Progress<F>,
    ) -> Result<BulkSubmissionResult, ApiError> {
        let chunks: Vec<&[EmployeeRecord]> = batch.chunks(size).collect();
        let total = chunks.len();
        let mut result = BulkSubmissionResult::default();
        let mut last_error = None;
        let mut accepted_chunks = 0;

        for (i, chunk) in chunks.into_iter().enumerate() {
            progress.report((((i + 1) * 80) as f64 / total as f64).round() as u8 + 10);

            let reason = match self.api.bulk_create(company_id, chunk).await {
                Ok(response) if response.success => {
                    accepted_chunks += 1;
                    result.merge(response.data);
                    None
                }
                Ok(response) => {
                    let message = response
                        .message
                        .unwrap_or_else(|| "Processing failed".to_string());
                    let reason = message.clone();
                    last_error = Some(ApiError::Rejected {
                        message,
                        code: response.code,
                    });
                    Some(reason)
                }
                Err(e) => {
                    let reason = e.to_string();
                    last_error = Some(e);
                    Some(reason)
                }
            };

            if let Some(reason) = reason {
                tracing::warn!(chunk = i + 1, total, reason = %reason, "Chunk failed");
                result.failed.extend(chunk.iter().map(|record| FailedRecord {
                    record: record.clone(),
                    reason: reason.clone(),
                }));
            }

            if i + 1 < total {
                tokio::time::sleep(self.config.chunk_delay).await;
            }
        }

        match last_error {
            Some(err) if accepted_chunks == 0 => Err(err),
            _ => {
                progress.report(100);
                Ok(result)
            }
        }
    }

    async fn finish(
        &self,
        company_id: &str,
        batch: &[EmployeeRecord],
        result: BulkSubmissionResult,
        generation: u64,
    ) -> SubmissionReport {
        let failed = result.failed.len();
        let created = batch.len().saturating_sub(failed);

        let (state, message) = if failed == 0 {
            (
                SubmissionState::Succeeded { created },
                success_message(created),
            )
        } else {
            (
                SubmissionState::PartiallyFailed { created, failed },
                partial_message(created, failed),
            )
        };

        if let Some(repository) = &self.repository {
            let repository = Arc::clone(repository);
            let company = company_id.to_string();
            let stored = created_records(batch, &result);

            // File-backed stores do blocking I/O
            let saved =
                tokio::task::spawn_blocking(move || repository.append(&company, &stored)).await;
            match saved {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    tracing::warn!(error = %e, "Failed to record created employees locally")
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Local employee write did not complete")
                }
            }
        }

        self.set_state(state.clone());
        self.schedule_reset(generation);

        SubmissionReport {
            state,
            result,
            message,
        }
    }

    /// Return to Idle after the display delay unless a newer submission started
    fn schedule_reset(&self, generation: u64) {
        let state = Arc::clone(&self.state);
        let current = Arc::clone(&self.generation);
        let delay = self.config.reset_delay;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if current.load(Ordering::SeqCst) == generation {
                state.send_if_modified(|s| {
                    if s.is_terminal() {
                        *s = SubmissionState::Idle;
                        true
                    } else {
                        false
                    }
                });
            }
        });
    }
}

/// Records to keep locally: what the API echoed back, or else the submitted
/// records minus those reported failed
fn created_records(batch: &[EmployeeRecord], result: &BulkSubmissionResult) -> Vec<EmployeeRecord> {
    if !result.successful.is_empty() {
        return result.successful.clone();
    }
    batch
        .iter()
        .filter(|r| !result.failed.iter().any(|f| f.record.email == r.email))
        .cloned()
        .collect()
}

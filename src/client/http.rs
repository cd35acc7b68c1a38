//! Employee REST API client
//!
//! HTTP implementation of `EmployeeApi` over the platform's JSON API.

use super::error::ApiError;
use super::{BulkCreateResponse, EmployeeApi};
use crate::employee::EmployeeRecord;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};

/// Employee REST API client
pub struct HttpEmployeeApi {
    client: Client,
    config: ApiClientConfig,
}

/// Configuration for the employee API client
#[derive(Debug, Clone)]
pub struct ApiClientConfig {
    /// Base URL including the API prefix (e.g., "http://localhost:5000/api")
    pub base_url: String,
    /// Bearer token for the company session
    pub token: Option<String>,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Maximum attempts for idempotent reads
    pub max_retries: u32,
}

impl Default for ApiClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000/api".to_string(),
            token: None,
            request_timeout_ms: 30_000,
            max_retries: 3,
        }
    }
}

impl HttpEmployeeApi {
    /// Create a new client with the given configuration
    pub fn new(config: ApiClientConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &ApiClientConfig {
        &self.config
    }

    fn company_url(&self, company_id: &str, suffix: &str) -> String {
        format!(
            "{}/companies/{}/employees{}",
            self.config.base_url.trim_end_matches('/'),
            urlencoding::encode(company_id),
            suffix
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header("X-Request-Id", uuid::Uuid::new_v4().to_string());
        match &self.config.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Turn a non-2xx response into an `ApiError`, reading `{message, code}`
    async fn error_from(response: Response) -> ApiError {
        let status = response.status().as_u16();
        let text = response.text().await.unwrap_or_default();

        match serde_json::from_str::<ErrorPayload>(&text) {
            Ok(payload) => ApiError::Api {
                status,
                message: payload.message.or(payload.error).unwrap_or(text),
                code: payload.code,
            },
            Err(_) => ApiError::Api {
                status,
                message: text,
                code: None,
            },
        }
    }

    /// Send a GET request with retry logic
    async fn get_with_retry(&self, url: &str) -> Result<Response, ApiError> {
        let mut last_error = ApiError::Unavailable;

        for attempt in 0..self.config.max_retries.max(1) {
            if attempt > 0 {
                // Backoff: 1s, 4s, 9s...
                let delay = std::time::Duration::from_secs((attempt as u64).pow(2));
                tokio::time::sleep(delay).await;
            }

            match self.authorize(self.client.get(url)).send().await {
                Ok(response) if response.status().is_success() => return Ok(response),
                Ok(response) if response.status().is_server_error() => {
                    last_error = Self::error_from(response).await;
                    tracing::debug!(attempt, error = %last_error, "Retrying employee list");
                }
                Ok(response) => return Err(Self::error_from(response).await),
                Err(e) => {
                    last_error = ApiError::from_transport(e);
                    tracing::debug!(attempt, error = %last_error, "Retrying employee list");
                }
            }
        }

        Err(last_error)
    }
}

#[async_trait]
impl EmployeeApi for HttpEmployeeApi {
    /// POST the whole batch; never retried, since a retry could create
    /// employees twice
    async fn bulk_create(
        &self,
        company_id: &str,
        records: &[EmployeeRecord],
    ) -> Result<BulkCreateResponse, ApiError> {
        let url = self.company_url(company_id, "/bulk");
        let body = BulkCreateRequest {
            employees: records.iter().map(EmployeePayload::from).collect(),
        };

        tracing::info!(company_id, count = records.len(), "Submitting employee batch");

        let response = self
            .authorize(self.client.post(&url).json(&body))
            .send()
            .await
            .map_err(ApiError::from_transport)?;

        if !response.status().is_success() {
            return Err(Self::error_from(response).await);
        }

        response
            .json::<BulkCreateResponse>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    async fn list_employees(&self, company_id: &str) -> Result<Vec<EmployeeRecord>, ApiError> {
        let url = self.company_url(company_id, "");
        let response = self.get_with_retry(&url).await?;

        let body: ListResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;

        Ok(body.data)
    }
}

// ============================================
// Request/Response DTOs
// ============================================

#[derive(Debug, Serialize)]
struct BulkCreateRequest<'a> {
    employees: Vec<EmployeePayload<'a>>,
}

/// One employee as the API expects it: the record plus derived fields
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmployeePayload<'a> {
    #[serde(flatten)]
    record: &'a EmployeeRecord,
    name: String,
    personal_email: &'a str,
    role: &'static str,
}

impl<'a> From<&'a EmployeeRecord> for EmployeePayload<'a> {
    fn from(record: &'a EmployeeRecord) -> Self {
        Self {
            record,
            name: record.full_name(),
            personal_email: &record.email,
            role: "employee",
        }
    }
}

#[derive(Debug, Deserialize)]
struct ErrorPayload {
    message: Option<String>,
    error: Option<String>,
    code: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    data: Vec<EmployeeRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ErrorKind;
    use axum::{
        extract::Path,
        http::StatusCode,
        routing::{get, post},
        Json, Router,
    };
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    /// Serve `app` on an ephemeral port and return its base URL
    async fn spawn(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}/api", addr)
    }

    fn client(base_url: String) -> HttpEmployeeApi {
        client_with_retries(base_url, 1)
    }

    fn client_with_retries(base_url: String, max_retries: u32) -> HttpEmployeeApi {
        HttpEmployeeApi::new(ApiClientConfig {
            base_url,
            token: Some("secret".into()),
            request_timeout_ms: 5_000,
            max_retries,
        })
        .unwrap()
    }

    /// GET /employees router that answers `statuses` in order, then 200
    fn list_router(statuses: Vec<StatusCode>, hits: Arc<AtomicUsize>) -> Router {
        Router::new().route(
            "/api/companies/:id/employees",
            get(move || {
                let hits = Arc::clone(&hits);
                let statuses = statuses.clone();
                async move {
                    let n = hits.fetch_add(1, Ordering::SeqCst);
                    match statuses.get(n) {
                        Some(status) => (
                            *status,
                            Json(json!({"message": format!("failure {}", n + 1)})),
                        ),
                        None => (
                            StatusCode::OK,
                            Json(json!({
                                "data": [{
                                    "firstName": "Ann",
                                    "lastName": "Lee",
                                    "personalEmail": "ann@x.com",
                                    "joiningDate": "2024-01-14"
                                }]
                            })),
                        ),
                    }
                }
            }),
        )
    }

    #[test]
    fn test_default_config() {
        let config = ApiClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:5000/api");
        assert_eq!(config.max_retries, 3);
        assert!(config.token.is_none());
    }

    #[test]
    fn test_company_url_encoding() {
        let api = client("http://example.test/api/".into());
        assert_eq!(
            api.company_url("acme co", "/bulk"),
            "http://example.test/api/companies/acme%20co/employees/bulk"
        );
    }

    #[test]
    fn test_payload_shape() {
        let record = EmployeeRecord::new("John", "Doe", "john@x.com").department("Sales");
        let json = serde_json::to_value(EmployeePayload::from(&record)).unwrap();

        assert_eq!(json["firstName"], "John");
        assert_eq!(json["name"], "John Doe");
        assert_eq!(json["personalEmail"], "john@x.com");
        assert_eq!(json["role"], "employee");
        assert_eq!(json["department"], "Sales");
    }

    #[tokio::test]
    async fn test_bulk_create_round_trip() {
        let seen: Arc<Mutex<Option<(String, Value)>>> = Arc::default();
        let captured = Arc::clone(&seen);

        let app = Router::new().route(
            "/api/companies/:id/employees/bulk",
            post(move |Path(id): Path<String>, Json(body): Json<Value>| {
                let captured = Arc::clone(&captured);
                async move {
                    let first = body["employees"][0].clone();
                    *captured.lock().unwrap() = Some((id, body));
                    Json(json!({
                        "success": true,
                        "data": {"successful": [first], "failed": []}
                    }))
                }
            }),
        );

        let api = client(spawn(app).await);
        let records = vec![EmployeeRecord::new("John", "Doe", "john@x.com")];
        let response = api.bulk_create("c-42", &records).await.unwrap();

        // The echoed record carries both email keys and still decodes
        assert!(response.success);
        assert_eq!(response.data.successful[0].email, "john@x.com");
        assert_eq!(response.data.successful[0].full_name(), "John Doe");

        let (id, body) = seen.lock().unwrap().take().unwrap();
        assert_eq!(id, "c-42");
        assert_eq!(body["employees"].as_array().unwrap().len(), 1);
        assert_eq!(body["employees"][0]["email"], "john@x.com");
        assert_eq!(body["employees"][0]["personalEmail"], "john@x.com");
    }

    #[tokio::test]
    async fn test_bulk_create_error_payload() {
        let app = Router::new().route(
            "/api/companies/:id/employees/bulk",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"message": "Employees already registered", "code": "duplicate_employees"})),
                )
            }),
        );

        let api = client(spawn(app).await);
        let err = api
            .bulk_create("c-1", &[EmployeeRecord::new("A", "B", "a@b.co")])
            .await
            .unwrap_err();

        match &err {
            ApiError::Api { status, code, .. } => {
                assert_eq!(*status, 400);
                assert_eq!(code.as_deref(), Some("duplicate_employees"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(err.kind(), ErrorKind::Duplicate);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_network_error() {
        // Bind then drop to get a port with nothing listening
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let api = client(format!("http://{}/api", addr));
        let err = api.bulk_create("c-1", &[]).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Network);
    }

    #[tokio::test]
    async fn test_list_retries_server_errors() {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = list_router(vec![StatusCode::SERVICE_UNAVAILABLE], Arc::clone(&hits));

        let api = client_with_retries(spawn(app).await, 2);
        let employees = api.list_employees("c-1").await.unwrap();

        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert_eq!(employees.len(), 1);
        assert_eq!(employees[0].email, "ann@x.com");
        assert_eq!(employees[0].start_date, "2024-01-14");
    }

    #[tokio::test]
    async fn test_list_gives_up_after_max_retries() {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = list_router(
            vec![StatusCode::SERVICE_UNAVAILABLE, StatusCode::BAD_GATEWAY],
            Arc::clone(&hits),
        );

        let api = client_with_retries(spawn(app).await, 2);
        let err = api.list_employees("c-1").await.unwrap_err();

        assert_eq!(hits.load(Ordering::SeqCst), 2);
        match &err {
            ApiError::Api {
                status, message, ..
            } => {
                assert_eq!(*status, 502);
                assert_eq!(message, "failure 2");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(err.kind(), ErrorKind::Server);
    }

    #[tokio::test]
    async fn test_list_client_error_is_not_retried() {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = list_router(vec![StatusCode::NOT_FOUND], Arc::clone(&hits));

        let api = client_with_retries(spawn(app).await, 3);
        let err = api.list_employees("missing").await.unwrap_err();

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(matches!(err, ApiError::Api { status: 404, .. }));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}

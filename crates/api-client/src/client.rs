//! HTTP client for the finance service REST API.
//!
//! One typed method per endpoint. The client also implements the sync
//! gateway trait from fintrack-core, which is how the sync engine gets a
//! live HTTP transport without depending on reqwest itself.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;

use fintrack_core::sync::{
    BudgetSyncRequest, BudgetSyncResponse, CategorySyncRequest, CategorySyncResponse,
    ContributionRequest, ExpenseCreateRequest, ExpenseCreateResponse, GatewayError, GatewayResult,
    GoalCreateRequest, GoalServerRecord, RemoteDeleteStatus, SyncGatewayTrait,
};

use crate::error::{ApiError, Result};
use crate::types::*;

/// Default timeout for API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const MAX_LOG_BODY_CHARS: usize = 512;

/// Client for the finance service REST API.
#[derive(Debug, Clone)]
pub struct SyncApiClient {
    client: reqwest::Client,
    base_url: String,
}

impl SyncApiClient {
    /// Create a new API client.
    ///
    /// # Arguments
    ///
    /// * `base_url` - The base URL of the service (e.g., "http://localhost:8080")
    pub fn new(base_url: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn log_response(status: reqwest::StatusCode, body: &str) {
        if status.is_success() {
            debug!("API response status: {}", status);
            return;
        }

        let mut preview = body.chars().take(MAX_LOG_BODY_CHARS).collect::<String>();
        if body.chars().count() > MAX_LOG_BODY_CHARS {
            preview.push_str("...");
        }
        debug!("API response error ({}): {}", status, preview);
    }

    /// Parse a JSON response body.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        let body = response.text().await?;
        Self::log_response(status, &body);

        if !status.is_success() {
            return Err(Self::api_error_from_body(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            log::error!(
                "Failed to deserialize response. Body: {}, Error: {}",
                body,
                e
            );
            ApiError::Json(e)
        })
    }

    /// Decode the service's error shape when possible, otherwise keep the
    /// raw body.
    fn api_error_from_body(status: reqwest::StatusCode, body: &str) -> ApiError {
        if let Ok(error) = serde_json::from_str::<ApiErrorBody>(body) {
            return ApiError::api(status.as_u16(), error.message);
        }
        ApiError::api(status.as_u16(), format!("Request failed: {}", body))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Sync push
    // ─────────────────────────────────────────────────────────────────────────

    /// Register one category and obtain its server id.
    ///
    /// POST /api/categories/sync
    pub async fn sync_category(
        &self,
        request: CategorySyncRequest,
    ) -> Result<CategorySyncResponse> {
        let url = format!("{}/api/categories/sync", self.base_url);
        debug!("Syncing category: {:?}", request);

        let response = self.client.post(&url).json(&request).send().await?;
        Self::parse_response(response).await
    }

    /// Create one expense on the service.
    ///
    /// POST /api/expenses
    pub async fn create_expense(
        &self,
        request: ExpenseCreateRequest,
    ) -> Result<ExpenseCreateResponse> {
        let url = format!("{}/api/expenses", self.base_url);
        debug!("Creating expense: {:?}", request);

        let response = self.client.post(&url).json(&request).send().await?;
        Self::parse_response(response).await
    }

    /// Register one budget and obtain its server id.
    ///
    /// POST /api/budgets/sync
    pub async fn sync_budget(&self, request: BudgetSyncRequest) -> Result<BudgetSyncResponse> {
        let url = format!("{}/api/budgets/sync", self.base_url);
        debug!("Syncing budget: {:?}", request);

        let response = self.client.post(&url).json(&request).send().await?;
        Self::parse_response(response).await
    }

    /// Create one savings goal on the service.
    ///
    /// POST /api/savings
    pub async fn create_savings_goal(
        &self,
        request: GoalCreateRequest,
    ) -> Result<GoalServerRecord> {
        let url = format!("{}/api/savings", self.base_url);
        debug!("Creating savings goal: {:?}", request);

        let response = self.client.post(&url).json(&request).send().await?;
        Self::parse_response(response).await
    }

    /// Add a contribution to a goal, addressed by its server id. The
    /// response echoes the goal with its recomputed running total.
    ///
    /// POST /api/savings/{id}/contribute
    pub async fn add_contribution(
        &self,
        server_goal_id: i64,
        request: ContributionRequest,
    ) -> Result<GoalServerRecord> {
        let url = format!(
            "{}/api/savings/{}/contribute",
            self.base_url, server_goal_id
        );
        debug!("Contributing {} to goal {}", request.amount, server_goal_id);

        let response = self.client.post(&url).json(&request).send().await?;
        Self::parse_response(response).await
    }

    /// Delete a savings goal, addressed by its server id. A 404 reports
    /// the goal as already gone, which callers treat as success.
    ///
    /// DELETE /api/savings/{id}
    pub async fn delete_savings_goal(&self, server_goal_id: i64) -> Result<RemoteDeleteStatus> {
        let url = format!("{}/api/savings/{}", self.base_url, server_goal_id);
        debug!("Deleting savings goal {}", server_goal_id);

        let response = self.client.delete(&url).send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(RemoteDeleteStatus::AlreadyAbsent);
        }
        if status.is_success() {
            return Ok(RemoteDeleteStatus::Deleted);
        }

        let body = response.text().await?;
        Self::log_response(status, &body);
        Err(Self::api_error_from_body(status, &body))
    }

    /// Fetch all savings goals known to the service.
    ///
    /// GET /api/savings
    pub async fn list_savings_goals(&self) -> Result<Vec<GoalServerRecord>> {
        let url = format!("{}/api/savings", self.base_url);

        let response = self.client.get(&url).send().await?;
        Self::parse_response(response).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reports
    // ─────────────────────────────────────────────────────────────────────────

    /// Spending grouped by category, optionally narrowed to one month.
    ///
    /// GET /api/reports/category-spending?month={m}&year={y}
    pub async fn category_spending(
        &self,
        month: Option<i32>,
        year: Option<i32>,
    ) -> Result<Vec<CategorySpendingReport>> {
        let url = format!("{}/api/reports/category-spending", self.base_url);
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(value) = month {
            query.push(("month", value.to_string()));
        }
        if let Some(value) = year {
            query.push(("year", value.to_string()));
        }

        let mut request = self.client.get(&url);
        if !query.is_empty() {
            request = request.query(&query);
        }
        let response = request.send().await?;
        Self::parse_response(response).await
    }

    /// Budget limits against actual spending, per category.
    ///
    /// GET /api/reports/budget-adherence
    pub async fn budget_adherence(&self) -> Result<Vec<BudgetAdherenceReport>> {
        let url = format!("{}/api/reports/budget-adherence", self.base_url);

        let response = self.client.get(&url).send().await?;
        Self::parse_response(response).await
    }

    /// Total spending per calendar month.
    ///
    /// GET /api/reports/monthly-spending
    pub async fn monthly_spending(&self) -> Result<Vec<MonthlySpendingReport>> {
        let url = format!("{}/api/reports/monthly-spending", self.base_url);

        let response = self.client.get(&url).send().await?;
        Self::parse_response(response).await
    }

    /// Cumulative contribution totals over time.
    ///
    /// GET /api/reports/savings-forecast
    pub async fn savings_forecast(&self) -> Result<Vec<SavingsForecastReport>> {
        let url = format!("{}/api/reports/savings-forecast", self.base_url);

        let response = self.client.get(&url).send().await?;
        Self::parse_response(response).await
    }
}

#[async_trait]
impl SyncGatewayTrait for SyncApiClient {
    async fn sync_category(
        &self,
        request: CategorySyncRequest,
    ) -> GatewayResult<CategorySyncResponse> {
        SyncApiClient::sync_category(self, request)
            .await
            .map_err(GatewayError::from)
    }

    async fn create_expense(
        &self,
        request: ExpenseCreateRequest,
    ) -> GatewayResult<ExpenseCreateResponse> {
        SyncApiClient::create_expense(self, request)
            .await
            .map_err(GatewayError::from)
    }

    async fn sync_budget(&self, request: BudgetSyncRequest) -> GatewayResult<BudgetSyncResponse> {
        SyncApiClient::sync_budget(self, request)
            .await
            .map_err(GatewayError::from)
    }

    async fn create_savings_goal(
        &self,
        request: GoalCreateRequest,
    ) -> GatewayResult<GoalServerRecord> {
        SyncApiClient::create_savings_goal(self, request)
            .await
            .map_err(GatewayError::from)
    }

    async fn add_contribution(
        &self,
        server_goal_id: i64,
        request: ContributionRequest,
    ) -> GatewayResult<GoalServerRecord> {
        SyncApiClient::add_contribution(self, server_goal_id, request)
            .await
            .map_err(GatewayError::from)
    }

    async fn delete_savings_goal(
        &self,
        server_goal_id: i64,
    ) -> GatewayResult<RemoteDeleteStatus> {
        SyncApiClient::delete_savings_goal(self, server_goal_id)
            .await
            .map_err(GatewayError::from)
    }

    async fn list_savings_goals(&self) -> GatewayResult<Vec<GoalServerRecord>> {
        SyncApiClient::list_savings_goals(self)
            .await
            .map_err(GatewayError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::{HashMap, VecDeque};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::Mutex as TokioMutex;

    #[derive(Debug, Clone)]
    struct CapturedRequest {
        request_line: String,
        body: String,
    }

    #[derive(Debug, Clone)]
    enum MockOutcome {
        DropConnection,
        Respond { status: u16, body: String },
    }

    fn header_end_offset(buffer: &[u8]) -> Option<usize> {
        buffer.windows(4).position(|window| window == b"\r\n\r\n")
    }

    async fn read_http_request(stream: &mut tokio::net::TcpStream) -> Option<(String, String)> {
        let mut buffer = Vec::new();
        loop {
            let mut chunk = [0_u8; 2048];
            let read = stream.read(&mut chunk).await.ok()?;
            if read == 0 {
                return None;
            }
            buffer.extend_from_slice(&chunk[..read]);
            if header_end_offset(&buffer).is_some() {
                break;
            }
        }

        let header_end = header_end_offset(&buffer)?;
        let head = String::from_utf8_lossy(&buffer[..header_end]).to_string();
        let mut lines = head.lines();
        let request_line = lines.next()?.to_string();

        let mut headers = HashMap::new();
        for line in lines {
            if let Some((name, value)) = line.split_once(':') {
                headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
            }
        }

        let content_length = headers
            .get("content-length")
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(0);

        let mut body = buffer[header_end + 4..].to_vec();
        while body.len() < content_length {
            let mut chunk = [0_u8; 2048];
            let read = stream.read(&mut chunk).await.ok()?;
            if read == 0 {
                break;
            }
            body.extend_from_slice(&chunk[..read]);
        }

        Some((request_line, String::from_utf8_lossy(&body).to_string()))
    }

    fn status_text(status: u16) -> &'static str {
        match status {
            200 => "OK",
            201 => "Created",
            204 => "No Content",
            400 => "Bad Request",
            404 => "Not Found",
            500 => "Internal Server Error",
            _ => "Error",
        }
    }

    async fn write_http_response(
        stream: &mut tokio::net::TcpStream,
        status: u16,
        body: &str,
    ) -> std::io::Result<()> {
        let response = format!(
            "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            status_text(status),
            body.len(),
            body
        );
        stream.write_all(response.as_bytes()).await?;
        stream.flush().await
    }

    async fn start_mock_server(
        outcomes: Vec<MockOutcome>,
    ) -> (
        String,
        Arc<TokioMutex<Vec<CapturedRequest>>>,
        tokio::task::JoinHandle<()>,
    ) {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("listener addr");
        let captured = Arc::new(TokioMutex::new(Vec::<CapturedRequest>::new()));
        let scripted = Arc::new(TokioMutex::new(VecDeque::from(outcomes)));
        let captured_clone = Arc::clone(&captured);
        let scripted_clone = Arc::clone(&scripted);

        let handle = tokio::spawn(async move {
            loop {
                let (mut stream, _) = match listener.accept().await {
                    Ok(value) => value,
                    Err(_) => break,
                };
                let captured_inner = Arc::clone(&captured_clone);
                let scripted_inner = Arc::clone(&scripted_clone);
                tokio::spawn(async move {
                    let Some((request_line, body)) = read_http_request(&mut stream).await else {
                        return;
                    };
                    captured_inner.lock().await.push(CapturedRequest {
                        request_line,
                        body,
                    });

                    let outcome =
                        scripted_inner
                            .lock()
                            .await
                            .pop_front()
                            .unwrap_or(MockOutcome::Respond {
                                status: 500,
                                body: r#"{"message":"unexpected request"}"#.to_string(),
                            });

                    match outcome {
                        MockOutcome::DropConnection => {}
                        MockOutcome::Respond { status, body } => {
                            let _ = write_http_response(&mut stream, status, &body).await;
                        }
                    }
                });
            }
        });

        (format!("http://{}", addr), captured, handle)
    }

    #[tokio::test]
    async fn category_sync_posts_camel_case_payload() {
        let (base_url, captured, server) = start_mock_server(vec![MockOutcome::Respond {
            status: 200,
            body: r#"{"id":101,"localId":4,"name":"Food"}"#.to_string(),
        }])
        .await;

        let client = SyncApiClient::new(&base_url);
        let response = client
            .sync_category(CategorySyncRequest {
                local_id: 4,
                name: "Food".to_string(),
            })
            .await
            .expect("sync category");

        assert_eq!(response.id, 101);
        assert_eq!(response.local_id, 4);

        let requests = captured.lock().await.clone();
        assert_eq!(requests.len(), 1);
        assert!(requests[0]
            .request_line
            .starts_with("POST /api/categories/sync "));
        assert_eq!(requests[0].body, r#"{"localId":4,"name":"Food"}"#);

        server.abort();
    }

    #[tokio::test]
    async fn rejected_request_carries_service_message() {
        let (base_url, _captured, server) = start_mock_server(vec![MockOutcome::Respond {
            status: 400,
            body: r#"{"message":"Category name already exists"}"#.to_string(),
        }])
        .await;

        let client = SyncApiClient::new(&base_url);
        let err = client
            .sync_category(CategorySyncRequest {
                local_id: 1,
                name: "Food".to_string(),
            })
            .await
            .expect_err("must reject");

        match err {
            ApiError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Category name already exists");
            }
            other => panic!("expected API error, got {:?}", other),
        }

        server.abort();
    }

    #[tokio::test]
    async fn plain_text_error_body_is_preserved() {
        let (base_url, _captured, server) = start_mock_server(vec![MockOutcome::Respond {
            status: 500,
            body: "boom".to_string(),
        }])
        .await;

        let client = SyncApiClient::new(&base_url);
        let err = client.list_savings_goals().await.expect_err("must fail");
        match err {
            ApiError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "Request failed: boom");
            }
            other => panic!("expected API error, got {:?}", other),
        }

        server.abort();
    }

    #[tokio::test]
    async fn contribution_posts_exact_two_decimal_amount() {
        let (base_url, captured, server) = start_mock_server(vec![MockOutcome::Respond {
            status: 200,
            body: r#"{"id":12,"userId":1,"name":"Bike","targetAmount":1500.0,"currentAmount":450.0,"targetDate":null}"#
                .to_string(),
        }])
        .await;

        let client = SyncApiClient::new(&base_url);
        let goal = client
            .add_contribution(
                12,
                ContributionRequest {
                    amount: "200.00".to_string(),
                },
            )
            .await
            .expect("contribute");

        assert_eq!(goal.current_amount, dec!(450.0));

        let requests = captured.lock().await.clone();
        assert!(requests[0]
            .request_line
            .starts_with("POST /api/savings/12/contribute "));
        assert_eq!(requests[0].body, r#"{"amount":"200.00"}"#);

        server.abort();
    }

    #[tokio::test]
    async fn delete_treats_missing_goal_as_already_absent() {
        let (base_url, captured, server) = start_mock_server(vec![
            MockOutcome::Respond {
                status: 204,
                body: String::new(),
            },
            MockOutcome::Respond {
                status: 404,
                body: r#"{"message":"Savings goal not found"}"#.to_string(),
            },
        ])
        .await;

        let client = SyncApiClient::new(&base_url);
        let first = client.delete_savings_goal(9).await.expect("delete");
        let second = client.delete_savings_goal(9).await.expect("repeat delete");

        assert_eq!(first, RemoteDeleteStatus::Deleted);
        assert_eq!(second, RemoteDeleteStatus::AlreadyAbsent);

        let requests = captured.lock().await.clone();
        assert!(requests[0]
            .request_line
            .starts_with("DELETE /api/savings/9 "));

        server.abort();
    }

    #[tokio::test]
    async fn dropped_connection_surfaces_as_transport_error() {
        let (base_url, _captured, server) =
            start_mock_server(vec![MockOutcome::DropConnection]).await;

        let client = SyncApiClient::new(&base_url);
        let gateway: &dyn SyncGatewayTrait = &client;
        let err = gateway
            .sync_category(CategorySyncRequest {
                local_id: 1,
                name: "Food".to_string(),
            })
            .await
            .expect_err("must fail");

        assert!(err.is_transport());
        server.abort();
    }

    #[tokio::test]
    async fn category_spending_narrows_by_month_and_year() {
        let (base_url, captured, server) = start_mock_server(vec![MockOutcome::Respond {
            status: 200,
            body: r#"[{"categoryName":"Food","totalAmount":120.5}]"#.to_string(),
        }])
        .await;

        let client = SyncApiClient::new(&base_url);
        let rows = client
            .category_spending(Some(3), Some(2025))
            .await
            .expect("report");

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].category_name, "Food");
        assert_eq!(rows[0].total_amount, dec!(120.5));

        let requests = captured.lock().await.clone();
        assert!(requests[0]
            .request_line
            .contains("/api/reports/category-spending?month=3&year=2025"));

        server.abort();
    }
}

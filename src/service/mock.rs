//! Mock query service for testing and offline demos.
//!
//! Provides deterministic replies based on prompt patterns and records every
//! request it receives.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::{service_failure, QueryService};
use crate::error::{QueryLensError, Result};
use crate::payload::{ErrorBody, QueryRequest, ResponsePayload};

/// What the mock answers with.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// A success response with the given JSON body.
    Payload(Value),
    /// A non-success response with the given status and JSON body.
    Failure { status: u16, body: Value },
    /// The request fails before any response arrives.
    Transport(String),
}

impl MockReply {
    /// Convenience for a failure carrying a string `detail`.
    pub fn detail(status: u16, detail: impl Into<String>) -> Self {
        Self::Failure {
            status,
            body: json!({ "detail": detail.into() }),
        }
    }

    fn resolve(&self) -> Result<ResponsePayload> {
        match self {
            Self::Payload(body) => serde_json::from_value(body.clone()).map_err(|e| {
                QueryLensError::transport(format!("Malformed response from query service: {e}"))
            }),
            Self::Failure { status, body } => {
                let detail = serde_json::from_value::<ErrorBody>(body.clone())
                    .ok()
                    .and_then(|b| b.detail);
                Err(service_failure(*status, detail.as_ref()))
            }
            Self::Transport(msg) => Err(QueryLensError::transport(msg.clone())),
        }
    }
}

/// Mock service that returns canned replies based on the prompt.
///
/// Cloning shares the request log, so a test can keep a handle while the
/// controller owns another.
#[derive(Debug, Clone, Default)]
pub struct MockQueryService {
    /// Custom reply mappings (prompt pattern -> reply).
    custom_replies: Vec<(String, MockReply)>,
    /// Artificial latency before replying.
    delay: Option<Duration>,
    /// Every request received, in order.
    requests: Arc<Mutex<Vec<QueryRequest>>>,
}

impl MockQueryService {
    /// Creates a new mock with default replies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a custom reply.
    ///
    /// When the prompt contains `pattern` (case-insensitive), the mock
    /// answers with `reply`. Earlier mappings win.
    pub fn with_reply(mut self, pattern: impl Into<String>, reply: MockReply) -> Self {
        self.custom_replies.push((pattern.into(), reply));
        self
    }

    /// Delays every reply by `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Returns a copy of every request received so far.
    pub fn requests(&self) -> Vec<QueryRequest> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    /// Number of requests received so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    fn reply_for(&self, prompt: &str) -> MockReply {
        let prompt_lower = prompt.to_lowercase();

        for (pattern, reply) in &self.custom_replies {
            if prompt_lower.contains(&pattern.to_lowercase()) {
                return reply.clone();
            }
        }

        if prompt_lower.contains("fail") {
            return MockReply::detail(400, "Mock service was asked to fail.");
        }

        if prompt_lower.contains("chart") || prompt_lower.contains("visual") {
            return MockReply::Payload(json!({
                "generated_query": "SELECT status, COUNT(*) AS total FROM orders GROUP BY status",
                "query_result": [
                    {"status": "paid", "total": 42},
                    {"status": "pending", "total": 7},
                    {"status": "refunded", "total": 3}
                ],
                "visual": {
                    "type": "bar",
                    "data": {
                        "labels": ["paid", "pending", "refunded"],
                        "datasets": [{"label": "Orders", "data": [42, 7, 3]}]
                    },
                    "options": {"plugins": {"title": {"display": true, "text": "Orders by status"}}}
                },
                "visual_status": "Visualization generated successfully."
            }));
        }

        if prompt_lower.contains("report") {
            return MockReply::Payload(json!({
                "generated_query": "SELECT COUNT(*) AS users FROM users",
                "query_result": [{"users": 3}],
                "report": "# User Report\n\nThere are **3** users.\n\n- 2 active\n- 1 inactive",
                "report_status": "Report generated successfully."
            }));
        }

        if prompt_lower.contains("email") {
            return MockReply::Payload(json!({
                "generated_query": "SELECT name, email FROM users WHERE active",
                "query_result": [
                    {"name": "Alice", "email": "alice@example.com"},
                    {"name": "Bob", "email": "bob@example.com"}
                ],
                "email_status": "Successfully sent 2 emails."
            }));
        }

        MockReply::Payload(json!({
            "analysis": {
                "database_type": "sql",
                "database_name": "postgresql",
                "isEmailRequired": false,
                "isReportGenerationRequired": false,
                "isVisualizationRequired": false
            },
            "generated_query": "SELECT id, name, email FROM users",
            "query_result": [
                {"id": 1, "name": "Alice", "email": "alice@example.com"},
                {"id": 2, "name": "Bob", "email": null}
            ]
        }))
    }
}

#[async_trait]
impl QueryService for MockQueryService {
    async fn query(&self, request: &QueryRequest) -> Result<ResponsePayload> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.reply_for(&request.prompt).resolve()
    }

    async fn health(&self) -> Result<String> {
        Ok("Mock query service".to_string())
    }
}

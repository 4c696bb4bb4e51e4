//! In-process stub of the query service.
//!
//! Replies are chosen by the prompt, so each test can pick its scenario.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Requests the stub has received, in order.
pub type Received = Arc<Mutex<Vec<Value>>>;

/// Starts the stub on a random local port.
///
/// Returns the query endpoint URL and the log of received request bodies.
pub async fn spawn() -> (String, Received) {
    let received: Received = Arc::new(Mutex::new(Vec::new()));

    let app = Router::new()
        .route("/", get(welcome))
        .route("/api/query", post(query))
        .with_state(Arc::clone(&received));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{addr}/api/query"), received)
}

async fn welcome() -> Json<Value> {
    Json(json!({"message": "Welcome to the Natural Language Query API"}))
}

async fn query(State(received): State<Received>, Json(body): Json<Value>) -> Response {
    received.lock().unwrap().push(body.clone());
    let prompt = body["prompt"].as_str().unwrap_or_default();

    match prompt {
        "bad locator" => (
            StatusCode::BAD_REQUEST,
            Json(json!({"detail": "bad locator"})),
        )
            .into_response(),
        "router crash" => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"detail": {
                "error": "An unexpected error occurred in the main router.",
                "detail": "collection not found",
                "generated_query_that_failed": {"collection": "orders", "filter": {}}
            }})),
        )
            .into_response(),
        "html error" => (StatusCode::BAD_GATEWAY, "<html>bad gateway</html>").into_response(),
        "garbage" => (StatusCode::OK, "this is not json").into_response(),
        "slow" => {
            tokio::time::sleep(Duration::from_secs(5)).await;
            Json(json!({})).into_response()
        }
        "mongo" => Json(json!({
            "analysis": {"database_type": "nosql", "database_name": "mongodb"},
            "generated_query": {"collection": "users", "filter": {"active": true}},
            "query_result": []
        }))
        .into_response(),
        _ => Json(json!({
            "query_execution_error": null,
            "generated_query": "SELECT id, name FROM users",
            "query_result": [{"id": 1, "name": "a"}, {"id": 2, "name": null}],
            "query_result_message": "2 rows returned."
        }))
        .into_response(),
    }
}

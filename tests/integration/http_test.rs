//! HTTP query service tests against the stub server.

use super::stub;
use pretty_assertions::assert_eq;
use querylens::error::QueryLensError;
use querylens::payload::{GeneratedQuery, QueryRequest};
use querylens::service::{
    HttpQueryService, HttpServiceConfig, QueryService, GENERIC_ERROR_MESSAGE,
};
use serde_json::json;

fn service(endpoint: &str) -> HttpQueryService {
    HttpQueryService::new(HttpServiceConfig::new(endpoint).unwrap()).unwrap()
}

fn request(prompt: &str) -> QueryRequest {
    QueryRequest {
        database_url: "postgresql://localhost/app".to_string(),
        prompt: prompt.to_string(),
    }
}

#[tokio::test]
async fn test_posts_request_body() {
    let (endpoint, received) = stub::spawn().await;
    service(&endpoint)
        .query(&request("list users"))
        .await
        .unwrap();

    let received = received.lock().unwrap();
    assert_eq!(
        received.as_slice(),
        &[json!({"database_url": "postgresql://localhost/app", "prompt": "list users"})]
    );
}

#[tokio::test]
async fn test_success_decodes_payload() {
    let (endpoint, _) = stub::spawn().await;
    let payload = service(&endpoint)
        .query(&request("list users"))
        .await
        .unwrap();

    assert_eq!(
        payload.generated_query,
        Some(GeneratedQuery::Text("SELECT id, name FROM users".to_string()))
    );
    assert_eq!(payload.query_result.as_ref().map(Vec::len), Some(2));
    assert_eq!(payload.query_execution_error, None);
    assert_eq!(payload.query_result_message.as_deref(), Some("2 rows returned."));
}

#[tokio::test]
async fn test_structured_query_and_analysis() {
    let (endpoint, _) = stub::spawn().await;
    let payload = service(&endpoint).query(&request("mongo")).await.unwrap();

    assert_eq!(
        payload.analysis.as_ref().map(|a| a.label()),
        Some("nosql/mongodb".to_string())
    );
    assert!(matches!(
        payload.generated_query,
        Some(GeneratedQuery::Structured(_))
    ));
    assert_eq!(payload.query_result, Some(vec![]));
}

#[tokio::test]
async fn test_string_detail_becomes_service_error() {
    let (endpoint, _) = stub::spawn().await;
    let err = service(&endpoint)
        .query(&request("bad locator"))
        .await
        .unwrap_err();

    assert_eq!(err, QueryLensError::service(400, "bad locator"));
}

#[tokio::test]
async fn test_structured_detail_carries_failed_query() {
    let (endpoint, _) = stub::spawn().await;
    let err = service(&endpoint)
        .query(&request("router crash"))
        .await
        .unwrap_err();

    let QueryLensError::Service {
        status,
        message,
        failed_query,
    } = err
    else {
        panic!("expected a service error");
    };
    assert_eq!(status, 500);
    assert_eq!(
        message,
        "An unexpected error occurred in the main router: collection not found"
    );
    assert!(failed_query.unwrap().contains("\"collection\": \"orders\""));
}

#[tokio::test]
async fn test_non_json_error_body_uses_generic_message() {
    let (endpoint, _) = stub::spawn().await;
    let err = service(&endpoint)
        .query(&request("html error"))
        .await
        .unwrap_err();

    assert_eq!(err, QueryLensError::service(502, GENERIC_ERROR_MESSAGE));
}

#[tokio::test]
async fn test_malformed_success_body_is_transport_error() {
    let (endpoint, _) = stub::spawn().await;
    let err = service(&endpoint)
        .query(&request("garbage"))
        .await
        .unwrap_err();

    assert!(matches!(err, QueryLensError::Transport(_)));
    assert!(err.to_string().starts_with("Malformed response"));
}

#[tokio::test]
async fn test_timeout_is_transport_error() {
    let (endpoint, _) = stub::spawn().await;
    let service = HttpQueryService::new(
        HttpServiceConfig::new(&endpoint).unwrap().with_timeout(1),
    )
    .unwrap();

    let err = service.query(&request("slow")).await.unwrap_err();
    assert_eq!(err, QueryLensError::transport("Request timed out after 1s."));
}

#[tokio::test]
async fn test_unreachable_service_is_transport_error() {
    // Bind then drop, so nothing is listening on the port.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = service(&format!("http://{addr}/api/query"))
        .query(&request("anything"))
        .await
        .unwrap_err();
    assert!(err.is_request_failure());
    assert!(matches!(err, QueryLensError::Transport(_)));
}

#[tokio::test]
async fn test_health_returns_welcome_message() {
    let (endpoint, _) = stub::spawn().await;
    let greeting = service(&endpoint).health().await.unwrap();
    assert_eq!(greeting, "Welcome to the Natural Language Query API");
}

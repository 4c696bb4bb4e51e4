//! Submission lifecycle over the HTTP service.

use super::stub;
use pretty_assertions::assert_eq;
use querylens::controller::{RequestLifecycleController, SubmissionInput, VALIDATION_MESSAGE};
use querylens::error::QueryLensError;
use querylens::render::{
    Cell, Notice, ResponseDispatcher, SectionBody, SectionKind, TableContent,
};
use querylens::service::{HttpQueryService, HttpServiceConfig, QueryService};
use std::sync::Arc;

async fn controller() -> (RequestLifecycleController, stub::Received) {
    let (endpoint, received) = stub::spawn().await;
    let service: Arc<dyn QueryService> =
        Arc::new(HttpQueryService::new(HttpServiceConfig::new(&endpoint).unwrap()).unwrap());
    (
        RequestLifecycleController::new(service, ResponseDispatcher::terminal()),
        received,
    )
}

#[tokio::test]
async fn test_success_renders_table_query_and_notices() {
    let (mut ctl, _) = controller().await;
    ctl.submit(&SubmissionInput::new("postgresql://localhost/app", "list users"))
        .await
        .unwrap();

    let display = ctl.display();
    assert_eq!(
        display.kinds(),
        vec![
            SectionKind::QueryResult,
            SectionKind::GeneratedQuery,
            SectionKind::Notices
        ]
    );

    let SectionBody::Table(TableContent::Grid { headers, rows }) = &display.sections()[0].body
    else {
        panic!("expected a table");
    };
    assert_eq!(headers, &["id", "name"]);
    assert_eq!(rows[1][1], Cell::Null);

    assert_eq!(
        display.sections()[2].body,
        SectionBody::Notices(vec![Notice {
            label: "Query result".to_string(),
            message: "2 rows returned.".to_string(),
        }])
    );
    assert!(!ctl.is_busy());
}

#[tokio::test]
async fn test_diagnostics_can_be_hidden() {
    let (endpoint, _) = stub::spawn().await;
    let service = Arc::new(HttpQueryService::new(HttpServiceConfig::new(&endpoint).unwrap()).unwrap());
    let mut ctl = RequestLifecycleController::new(
        service,
        ResponseDispatcher::terminal().with_diagnostics(false),
    );
    ctl.submit(&SubmissionInput::new("db", "list users"))
        .await
        .unwrap();

    assert_eq!(
        ctl.display().kinds(),
        vec![SectionKind::QueryResult, SectionKind::GeneratedQuery]
    );
}

#[tokio::test]
async fn test_structured_query_and_empty_result() {
    let (mut ctl, _) = controller().await;
    ctl.submit(&SubmissionInput::new("mongodb://localhost/app", "mongo"))
        .await
        .unwrap();

    let display = ctl.display();
    assert_eq!(display.analysis().map(|a| a.label()).as_deref(), Some("nosql/mongodb"));
    assert_eq!(display.sections()[0].body, SectionBody::Table(TableContent::Empty));
    assert_eq!(
        display.generated_query(),
        Some("{\n  \"collection\": \"users\",\n  \"filter\": {\n    \"active\": true\n  }\n}")
    );
}

#[tokio::test]
async fn test_failure_replaces_previous_display() {
    let (mut ctl, _) = controller().await;
    ctl.submit(&SubmissionInput::new("db", "list users"))
        .await
        .unwrap();
    assert_eq!(ctl.display().len(), 3);

    ctl.submit(&SubmissionInput::new("db", "bad locator"))
        .await
        .unwrap();

    let sections = ctl.display().sections();
    assert_eq!(sections.len(), 1);
    assert_eq!(sections[0].kind, SectionKind::Error);
    assert_eq!(
        sections[0].body,
        SectionBody::Failure {
            message: "bad locator".to_string(),
            failed_query: None,
        }
    );
    assert_eq!(ctl.busy().activations(), 2);
    assert_eq!(ctl.busy().deactivations(), 2);
}

#[tokio::test]
async fn test_blank_input_sends_nothing() {
    let (mut ctl, received) = controller().await;
    let err = ctl
        .submit(&SubmissionInput::new("   ", "list users"))
        .await
        .unwrap_err();

    assert_eq!(err, QueryLensError::validation(VALIDATION_MESSAGE));
    assert!(received.lock().unwrap().is_empty());
    assert!(ctl.display().is_empty());
    assert_eq!(ctl.busy().activations(), 0);
}

#[tokio::test]
async fn test_inputs_are_trimmed_on_the_wire() {
    let (mut ctl, received) = controller().await;
    ctl.submit(&SubmissionInput::new("  db  ", "\nlist users  "))
        .await
        .unwrap();

    let received = received.lock().unwrap();
    assert_eq!(received[0]["database_url"], "db");
    assert_eq!(received[0]["prompt"], "list users");
}

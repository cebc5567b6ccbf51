use crm_assign::adapters::inbound::InMemoryTokenStore;
use crm_assign::adapters::outbound::{FilesystemWorkerSource, HttpBackend, InMemoryGateway, JsonlEventLog};
use crm_assign::domains::assignment::*;
use crm_assign::domains::reminders::ReminderSource;
use crm_assign::GatewayError;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

#[tokio::test]
async fn test_filesystem_worker_source_reads_backend_shape() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("workers.json");
    std::fs::write(
        &path,
        r#"[{"_id":"e1","name":"Ana","role":"sales"},{"id":"e2","label":"Ben","group_id":"support"}]"#,
    )
    .unwrap();

    let source = FilesystemWorkerSource::new(Some(path));
    let workers = source.list_workers().await.unwrap();

    assert_eq!(workers.len(), 2);
    assert_eq!(workers[0], Worker::new("e1", Some(GroupId::from("sales")), "Ana"));
    assert_eq!(workers[1].group_id, Some(GroupId::from("support")));
}

#[tokio::test]
async fn test_filesystem_worker_source_errors() {
    let dir = tempfile::tempdir().unwrap();

    let missing = FilesystemWorkerSource::new(Some(dir.path().join("nope.json")));
    assert!(matches!(missing.list_workers().await, Err(GatewayError::Transport(_))));

    let path = dir.path().join("bad.json");
    std::fs::write(&path, r#"{"employees": []}"#).unwrap();
    let bad = FilesystemWorkerSource::new(Some(path));
    assert!(matches!(bad.list_workers().await, Err(GatewayError::Decode(_))));
}

#[tokio::test]
async fn test_event_log_appends_per_batch() {
    let dir = tempfile::tempdir().unwrap();
    let log = JsonlEventLog::new(dir.path().join("events"));
    let batch = Uuid::new_v4();

    log.append(&AssignmentEvent::submitted(batch, WorkerId::from("e1"), 4, Priority::High), None)
        .await
        .unwrap();
    log.append(
        &AssignmentEvent::failed(batch, WorkerId::from("e2"), 3, "rejected".into()),
        Some("admin".into()),
    )
    .await
    .unwrap();

    let envelopes = log.load(&batch.to_string()).await.unwrap();
    assert_eq!(envelopes.len(), 2);
    assert_eq!(envelopes[0].event_type, "AssignmentSubmitted");
    assert_eq!(envelopes[1].event_type, "AssignmentFailed");
    assert_eq!(envelopes[1].metadata.user_id.as_deref(), Some("admin"));
    assert_eq!(envelopes[0].metadata.correlation_id, Some(batch));
    assert_eq!(envelopes[0].aggregate_type, "AssignmentBatch");

    assert!(log.load(&Uuid::new_v4().to_string()).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_http_backend_without_token_sends_nothing() {
    let backend = HttpBackend::new(
        "http://127.0.0.1:9/api/",
        Duration::from_millis(200),
        Arc::new(InMemoryTokenStore::new()),
    )
    .unwrap();
    assert_eq!(backend.base_url(), "http://127.0.0.1:9/api");

    let request = CreateAssignmentRequest {
        worker_id: WorkerId::from("e1"),
        entity_ids: vec![EntityId::from("u1")],
        priority: Priority::Low,
        notes: None,
    };
    assert_eq!(backend.create_assignment(&request).await, Err(GatewayError::Unauthorized));
    assert_eq!(backend.fetch_reminders().await.unwrap_err(), GatewayError::Unauthorized);
}

#[tokio::test]
async fn test_http_backend_unreachable_is_a_gateway_error() {
    let backend = HttpBackend::new(
        "http://127.0.0.1:9/api",
        Duration::from_millis(500),
        Arc::new(InMemoryTokenStore::with_token("token")),
    )
    .unwrap();

    let err = backend.list_workers().await.unwrap_err();
    assert!(matches!(err, GatewayError::Transport(_) | GatewayError::Timeout { .. }));
}

#[test]
fn test_memory_gateway_records_and_rejects() {
    let gateway = InMemoryGateway::new(vec![Worker::new("e1", None, "Ana")]).fail_for("e2");
    let request = |worker: &str| CreateAssignmentRequest {
        worker_id: WorkerId::from(worker),
        entity_ids: vec![EntityId::from("u1")],
        priority: Priority::Medium,
        notes: Some("walk-in".into()),
    };

    tokio_test::assert_ok!(tokio_test::block_on(gateway.create_assignment(&request("e1"))));
    tokio_test::assert_err!(tokio_test::block_on(gateway.create_assignment(&request("e2"))));

    assert_eq!(gateway.attempts(), 2);
    assert_eq!(gateway.accepted(), vec![request("e1")]);
    assert_eq!(tokio_test::block_on(gateway.list_workers()).unwrap().len(), 1);
}

// tests/store_client.rs

use std::sync::Arc;
use std::time::Duration;

use taskrelay::errors::TaskRelayError;
use taskrelay::store::{RecordPatch, StoreClient, TaskStatus};
use taskrelay_test_utils::alerts::CollectingAlerter;
use taskrelay_test_utils::init_tracing;
use taskrelay_test_utils::stores::RecordingStore;

fn client_for(store: &RecordingStore, alerter: &CollectingAlerter) -> StoreClient {
    StoreClient::new(Arc::new(store.clone()), Arc::new(alerter.clone()))
        .with_retry_policy(3, Duration::from_millis(1))
}

#[tokio::test]
async fn set_status_merges_fields_and_preserves_the_rest() {
    init_tracing();

    let store = RecordingStore::new();
    let alerter = CollectingAlerter::new();
    let client = client_for(&store, &alerter);

    // First write implicitly creates the record.
    client
        .update_atomically(
            "t1",
            RecordPatch {
                output: Some("kept".to_string()),
                ..RecordPatch::default()
            },
        )
        .await
        .unwrap();

    client
        .set_status("t1", TaskStatus::Processing, RecordPatch::default())
        .await
        .unwrap();

    let record = store.record("t1").unwrap();
    assert_eq!(record.status, TaskStatus::Processing);
    assert_eq!(record.output.as_deref(), Some("kept"));
    assert!(record.updated_at.is_some(), "timestamp refreshed on write");
    assert!(alerter.is_empty());
}

#[tokio::test]
async fn set_status_retries_transient_failures() {
    init_tracing();

    let store = RecordingStore::new();
    let alerter = CollectingAlerter::new();
    let client = client_for(&store, &alerter);

    store.fail_next_merges(2);

    client
        .set_status("t1", TaskStatus::Queued, RecordPatch::default())
        .await
        .unwrap();

    assert_eq!(store.merge_count(), 3);
    assert_eq!(store.record("t1").unwrap().status, TaskStatus::Queued);
    assert!(alerter.is_empty(), "successful retries do not alert");
}

#[tokio::test]
async fn set_status_exhaustion_alerts_and_raises() {
    init_tracing();

    let store = RecordingStore::new();
    let alerter = CollectingAlerter::new();
    let client = client_for(&store, &alerter);

    store.fail_all_merges(true);

    let err = client
        .set_status("t1", TaskStatus::Queued, RecordPatch::default())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        TaskRelayError::StoreWrite { attempts: 3, .. }
    ));
    assert_eq!(store.merge_count(), 3);
    assert_eq!(alerter.alerts().len(), 1);
    assert!(store.record("t1").is_none(), "no partial state was written");
}

#[tokio::test]
async fn update_atomically_is_a_single_attempt() {
    init_tracing();

    let store = RecordingStore::new();
    let alerter = CollectingAlerter::new();
    let client = client_for(&store, &alerter);

    store.fail_next_merges(1);

    let result = client
        .update_atomically("t1", RecordPatch::status(TaskStatus::Processing))
        .await;

    assert!(result.is_err());
    assert_eq!(store.merge_count(), 1, "no retry for plain atomic updates");
}

#[tokio::test]
async fn get_outputs_substitutes_empty_string_for_missing_data() {
    init_tracing();

    let store = RecordingStore::new();
    let alerter = CollectingAlerter::new();
    let client = client_for(&store, &alerter);

    // p1 fulfilled with an output, p2 exists without one, p3 never written.
    client
        .update_atomically(
            "p1",
            RecordPatch {
                status: Some(TaskStatus::Fulfilled),
                output: Some("one".to_string()),
                ..RecordPatch::default()
            },
        )
        .await
        .unwrap();
    client
        .update_atomically("p2", RecordPatch::status(TaskStatus::Processing))
        .await
        .unwrap();

    let outputs = client
        .get_outputs(&[
            "p1".to_string(),
            "p2".to_string(),
            "p3".to_string(),
        ])
        .await
        .unwrap();

    assert_eq!(outputs, vec!["one".to_string(), String::new(), String::new()]);
    assert_eq!(store.get_many_count(), 1, "one batched read, not three singles");
}

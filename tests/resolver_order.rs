// tests/resolver_order.rs

use std::sync::Arc;
use std::time::Duration;

use proptest::prelude::*;

use taskrelay::engine::DependencyResolver;
use taskrelay::store::{RecordPatch, StoreClient, TaskStatus, TaskStore};
use taskrelay_test_utils::alerts::CollectingAlerter;
use taskrelay_test_utils::init_tracing;
use taskrelay_test_utils::stores::RecordingStore;

fn resolver_for(store: &RecordingStore) -> DependencyResolver {
    let client = StoreClient::new(
        Arc::new(store.clone()),
        Arc::new(CollectingAlerter::new()),
    )
    .with_retry_policy(3, Duration::from_millis(1));
    DependencyResolver::new(client)
}

#[tokio::test]
async fn empty_parent_list_short_circuits_without_store_access() {
    init_tracing();

    let store = RecordingStore::new();
    let resolver = resolver_for(&store);

    let outputs = resolver.resolve(&[]).await.unwrap();

    assert!(outputs.is_empty());
    assert!(store.ops().is_empty(), "no store access for empty parents");
}

#[tokio::test]
async fn outputs_preserve_declared_parent_order() {
    init_tracing();

    let store = RecordingStore::new();
    let resolver = resolver_for(&store);

    for (id, output) in [("p1", "first"), ("p2", "second"), ("p3", "third")] {
        store
            .memory()
            .merge(
                id,
                RecordPatch {
                    status: Some(TaskStatus::Fulfilled),
                    output: Some(output.to_string()),
                    ..RecordPatch::default()
                },
            )
            .await
            .unwrap();
    }

    // Declared order, not alphabetical or completion order.
    let outputs = resolver
        .resolve(&["p3".to_string(), "p1".to_string(), "p2".to_string()])
        .await
        .unwrap();

    assert_eq!(outputs, vec!["third", "first", "second"]);
    assert_eq!(store.get_many_count(), 1);
}

proptest! {
    /// Position `i` of the result always corresponds to parent `i`, with a
    /// missing record degrading to an empty string.
    #[test]
    fn resolution_is_positional(
        parents in proptest::collection::vec(0..6usize, 0..8),
        present in proptest::collection::vec(any::<bool>(), 6),
    ) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        rt.block_on(async {
            let store = RecordingStore::new();
            let resolver = resolver_for(&store);

            for (idx, present) in present.iter().enumerate() {
                if *present {
                    store
                        .memory()
                        .merge(
                            &format!("p{idx}"),
                            RecordPatch {
                                status: Some(TaskStatus::Fulfilled),
                                output: Some(format!("out{idx}")),
                                ..RecordPatch::default()
                            },
                        )
                        .await
                        .unwrap();
                }
            }

            let parent_ids: Vec<String> =
                parents.iter().map(|idx| format!("p{idx}")).collect();
            let outputs = resolver.resolve(&parent_ids).await.unwrap();

            prop_assert_eq!(outputs.len(), parent_ids.len());
            for (i, idx) in parents.iter().enumerate() {
                let expected = if present[*idx] {
                    format!("out{idx}")
                } else {
                    String::new()
                };
                prop_assert_eq!(&outputs[i], &expected);
            }

            Ok(())
        })?;
    }
}

//! Near-duplicate filter behaviour against deterministic stub embedders.

mod common;

use common::*;
use percolate_signals::dedup::{DedupConfig, DedupPolicy, Deduplicator};
use percolate_signals::embeddings::EmbeddingProvider;
use percolate_signals::types::SignalError;
use proptest::prelude::*;
use std::sync::Arc;

fn dedup_with(embedder: Arc<dyn EmbeddingProvider>) -> Deduplicator {
    Deduplicator::new(embedder)
}

#[tokio::test]
async fn test_empty_and_single_skip_embedder() {
    let embedder = scenario_embedder().shared();
    let dedup = dedup_with(embedder.clone());

    assert!(dedup.deduplicate(Vec::new()).await.unwrap().is_empty());
    assert_eq!(
        dedup.deduplicate(strings(&[APPLE])).await.unwrap(),
        strings(&[APPLE])
    );

    // Even an unknown text passes through untouched
    assert_eq!(
        dedup.deduplicate(strings(&["never embedded"])).await.unwrap(),
        strings(&["never embedded"])
    );
    assert_eq!(embedder.calls(), 0);
}

#[tokio::test]
async fn test_single_item_with_failing_embedder() {
    let embedder = Arc::new(FailingEmbedder::new());
    let dedup = dedup_with(embedder.clone());

    let result = dedup.deduplicate(strings(&["only one"])).await.unwrap();
    assert_eq!(result, strings(&["only one"]));
    assert_eq!(embedder.calls(), 0);
}

#[tokio::test]
async fn test_scenario_drops_both_duplicates() {
    let embedder = scenario_embedder().shared();
    let dedup = dedup_with(embedder.clone());

    let result = dedup
        .deduplicate(strings(&[APPLE, APPLE_DUP, OIL]))
        .await
        .unwrap();

    assert_eq!(result, strings(&[OIL]));
    assert_eq!(embedder.calls(), 1);
}

#[tokio::test]
async fn test_all_distinct_unchanged() {
    let dedup = dedup_with(scenario_embedder().shared());
    let input = strings(&[OIL, APPLE, MERGER]);

    let result = dedup.deduplicate(input.clone()).await.unwrap();
    assert_eq!(result, input);
}

#[tokio::test]
async fn test_exact_duplicates_both_dropped() {
    let embedder = StubEmbedder::new(2)
        .with("a", vec![1.0, 0.0])
        .with("b", vec![0.0, 5.0])
        .shared();
    let dedup = dedup_with(embedder);

    let result = dedup
        .deduplicate(strings(&["a", "b", "a"]))
        .await
        .unwrap();
    assert_eq!(result, strings(&["b"]));
}

#[tokio::test]
async fn test_identical_pair_only() {
    let embedder = StubEmbedder::new(2).with("same", vec![0.3, 0.3]).shared();
    let dedup = dedup_with(embedder);

    let result = dedup
        .deduplicate(strings(&["same", "same"]))
        .await
        .unwrap();
    assert!(result.is_empty());
}

#[tokio::test]
async fn test_threshold_boundary_is_inclusive() {
    // Squared distance 0.15 exactly: not strictly greater, so dropped
    let embedder = StubEmbedder::new(1)
        .with("x", vec![0.0])
        .with("y", vec![0.387_298_34])
        .shared();
    let dedup = Deduplicator::with_config(
        embedder,
        DedupConfig {
            threshold: 0.387_298_34f32 * 0.387_298_34f32,
            policy: DedupPolicy::PerItem,
        },
    );

    let result = dedup.deduplicate(strings(&["x", "y"])).await.unwrap();
    assert!(result.is_empty());
}

#[tokio::test]
async fn test_deterministic_across_runs() {
    let dedup = dedup_with(scenario_embedder().shared());
    let input = strings(&[APPLE, MERGER, APPLE_DUP, OIL]);

    let first = dedup.deduplicate(input.clone()).await.unwrap();
    let second = dedup.deduplicate(input).await.unwrap();
    assert_eq!(first, second);
    assert_eq!(first, strings(&[MERGER, OIL]));
}

#[tokio::test]
async fn test_embedder_failure_propagates() {
    let embedder = Arc::new(FailingEmbedder::new());
    let dedup = dedup_with(embedder.clone());

    let err = dedup
        .deduplicate(strings(&[APPLE, OIL]))
        .await
        .unwrap_err();
    assert!(matches!(err, SignalError::EmbeddingError(_)));
    assert_eq!(embedder.calls(), 1);
}

#[tokio::test]
async fn test_short_embedding_batch_is_fatal() {
    let dedup = dedup_with(Arc::new(ShortEmbedder));

    let err = dedup
        .deduplicate(strings(&["a", "b", "c"]))
        .await
        .unwrap_err();
    assert!(matches!(err, SignalError::EmbeddingError(_)));
}

#[tokio::test]
async fn test_dimension_mismatch_is_fatal() {
    let embedder = StubEmbedder::new(3)
        .with("a", vec![1.0, 0.0, 0.0])
        .with("b", vec![0.0, 1.0])
        .shared();
    let dedup = dedup_with(embedder);

    let err = dedup.deduplicate(strings(&["a", "b"])).await.unwrap_err();
    assert!(matches!(
        err,
        SignalError::DimensionMismatch {
            index: 1,
            expected: 3,
            actual: 2
        }
    ));
}

#[tokio::test]
async fn test_keep_first_keeps_one_representative() {
    let dedup = Deduplicator::with_config(
        scenario_embedder().shared(),
        DedupConfig::with_policy(DedupPolicy::KeepFirst),
    );

    let result = dedup
        .deduplicate(strings(&[APPLE, APPLE_DUP, OIL]))
        .await
        .unwrap();
    assert_eq!(result, strings(&[APPLE, OIL]));
}

#[tokio::test]
async fn test_report_diagnostics() {
    let dedup = dedup_with(scenario_embedder().shared());

    let report = dedup
        .deduplicate_with_report(strings(&[APPLE, OIL, APPLE_DUP]))
        .await
        .unwrap();

    assert_eq!(report.survivors, strings(&[OIL]));
    assert_eq!(report.kept, vec![1]);
    assert_eq!(report.dropped_count(), 2);
    assert_eq!(report.input_len(), 3);
    assert_eq!(report.dimensions, Some(3));
    assert_eq!(report.policy, DedupPolicy::PerItem);

    assert_eq!(report.dropped[0].index, 0);
    assert_eq!(report.dropped[0].nearest, 2);
    assert_eq!(report.dropped[1].index, 2);
    assert_eq!(report.dropped[1].nearest, 0);
    assert!(report.dropped[0].distance < 0.15);
}

#[tokio::test]
async fn test_report_passthrough() {
    let dedup = dedup_with(scenario_embedder().shared());

    let report = dedup
        .deduplicate_with_report(strings(&[OIL]))
        .await
        .unwrap();
    assert_eq!(report.kept, vec![0]);
    assert!(report.dropped.is_empty());
    assert_eq!(report.dimensions, None);
}

#[tokio::test]
async fn test_concurrent_calls_are_independent() {
    let dedup = dedup_with(scenario_embedder().shared());

    let (a, b) = tokio::join!(
        dedup.deduplicate(strings(&[APPLE, APPLE_DUP, OIL])),
        dedup.deduplicate(strings(&[OIL, MERGER])),
    );
    assert_eq!(a.unwrap(), strings(&[OIL]));
    assert_eq!(b.unwrap(), strings(&[OIL, MERGER]));
}

fn points() -> impl Strategy<Value = Vec<Vec<f32>>> {
    prop::collection::vec(prop::collection::vec(-3i8..=3, 2), 0..12).prop_map(|rows| {
        rows.into_iter()
            .map(|row| row.into_iter().map(|v| v as f32 * 0.25).collect())
            .collect()
    })
}

fn run_dedup(vectors: &[Vec<f32>], policy: DedupPolicy) -> (Vec<String>, Vec<String>) {
    let texts: Vec<String> = (0..vectors.len()).map(|i| format!("t{}", i)).collect();
    let mut embedder = StubEmbedder::new(2);
    for (text, vector) in texts.iter().zip(vectors) {
        embedder = embedder.with(text, vector.clone());
    }
    let dedup = Deduplicator::with_config(embedder.shared(), DedupConfig::with_policy(policy));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let survivors = runtime.block_on(dedup.deduplicate(texts.clone())).unwrap();
    (texts, survivors)
}

fn is_subsequence(needle: &[String], haystack: &[String]) -> bool {
    let mut rest = haystack.iter();
    needle.iter().all(|n| rest.any(|h| h == n))
}

proptest! {
    #[test]
    fn prop_output_is_ordered_subsequence(vectors in points()) {
        for policy in [DedupPolicy::PerItem, DedupPolicy::KeepFirst] {
            let (input, output) = run_dedup(&vectors, policy);
            prop_assert!(output.len() <= input.len());
            prop_assert!(is_subsequence(&output, &input));
        }
    }

    #[test]
    fn prop_per_item_survivors_are_isolated(vectors in points()) {
        let (_, output) = run_dedup(&vectors, DedupPolicy::PerItem);
        // Per-item never keeps an item with a close neighbour anywhere in the batch
        for kept in &output {
            let i: usize = kept[1..].parse().unwrap();
            for (j, other) in vectors.iter().enumerate() {
                if i != j {
                    let d: f32 = vectors[i].iter().zip(other).map(|(a, b)| (a - b) * (a - b)).sum();
                    prop_assert!(d > 0.15);
                }
            }
        }
    }

    #[test]
    fn prop_keep_first_survivors_are_separated(vectors in points()) {
        let (input, output) = run_dedup(&vectors, DedupPolicy::KeepFirst);
        let positions: Vec<usize> = output.iter().map(|t| t[1..].parse().unwrap()).collect();
        for (a, &i) in positions.iter().enumerate() {
            for &j in &positions[a + 1..] {
                let d: f32 = vectors[i].iter().zip(&vectors[j]).map(|(x, y)| (x - y) * (x - y)).sum();
                prop_assert!(d > 0.15);
            }
        }
        // The first item always survives a non-trivial batch
        if !input.is_empty() {
            prop_assert_eq!(&output[0], &input[0]);
        }
    }
}

mod common;

use std::collections::HashMap;
use std::sync::Arc;

use clinrag::{
    EmbeddingProvider, IndexStore, InMemoryVectorStore, Passage, RagError, VectorStore,
};
use common::{KeywordEmbedder, RecordingEmbedder};

fn passages(n: usize) -> Vec<Passage> {
    (0..n)
        .map(|i| Passage {
            id: format!("guide_{i}"),
            text: format!("passage number {i}"),
            metadata: HashMap::from([("source".to_string(), "guide".to_string())]),
        })
        .collect()
}

fn index_with(embedder: Arc<dyn EmbeddingProvider>, store: Arc<dyn VectorStore>) -> IndexStore {
    IndexStore::new(embedder, store, "clinical_guidelines", IndexStore::DEFAULT_BATCH_SIZE)
}

#[tokio::test]
async fn upsert_splits_into_batches_of_one_hundred() {
    let embedder = Arc::new(RecordingEmbedder::new());
    let index = index_with(embedder.clone(), Arc::new(InMemoryVectorStore::new()));
    index.recreate().await.unwrap();

    let report = index.upsert(&passages(250)).await;

    assert_eq!(embedder.sizes(), vec![100, 100, 50]);
    assert_eq!(report.batches, 3);
    assert_eq!(report.stored, 250);
    assert!(report.is_complete());
    assert!(report.partial_failure().is_none());
    assert_eq!(index.count().await.unwrap(), 250);
}

#[tokio::test]
async fn failed_batch_is_skipped_and_the_rest_continue() {
    let embedder = Arc::new(RecordingEmbedder::failing(&[1]));
    let index = index_with(embedder.clone(), Arc::new(InMemoryVectorStore::new()));
    index.recreate().await.unwrap();

    let report = index.upsert(&passages(250)).await;

    assert_eq!(embedder.sizes(), vec![100, 100, 50]);
    assert_eq!(report.failed_batches, 1);
    assert_eq!(report.stored, 150);
    assert_eq!(index.count().await.unwrap(), 150);
    assert!(matches!(
        report.partial_failure(),
        Some(RagError::BatchPartialFailure { failed: 1, total: 3 })
    ));
}

#[tokio::test]
async fn recreate_discards_previous_records() {
    let index = index_with(Arc::new(RecordingEmbedder::new()), Arc::new(InMemoryVectorStore::new()));
    index.recreate().await.unwrap();
    index.upsert(&passages(30)).await;
    assert_eq!(index.count().await.unwrap(), 30);

    index.recreate().await.unwrap();
    assert_eq!(index.count().await.unwrap(), 0);
    index.upsert(&passages(5)).await;
    assert_eq!(index.count().await.unwrap(), 5);
}

#[tokio::test]
async fn query_on_empty_collection_returns_nothing() {
    let index = index_with(Arc::new(KeywordEmbedder::new()), Arc::new(InMemoryVectorStore::new()));
    index.recreate().await.unwrap();
    let results = index.query("artesunate dosage", 3).await.unwrap();
    assert!(results.is_empty());
}

#[tokio::test]
async fn query_on_missing_collection_is_not_found() {
    let index = index_with(Arc::new(KeywordEmbedder::new()), Arc::new(InMemoryVectorStore::new()));
    let err = index.query("artesunate dosage", 3).await.unwrap_err();
    assert!(matches!(err, RagError::NotFoundError(_)));
}

#[tokio::test]
async fn query_returns_most_similar_passages_first() {
    let index = index_with(Arc::new(KeywordEmbedder::new()), Arc::new(InMemoryVectorStore::new()));
    index.recreate().await.unwrap();

    let texts = [
        "Artesunate dosage for severe malaria in adults",
        "Insecticide treated nets prevent transmission",
        "Rapid diagnostic tests confirm suspected cases",
    ];
    let docs: Vec<Passage> = texts
        .iter()
        .enumerate()
        .map(|(i, t)| Passage { id: format!("guide_{i}"), text: t.to_string(), metadata: HashMap::new() })
        .collect();
    assert!(index.upsert(&docs).await.is_complete());

    let results = index.query("What is the artesunate dosage?", 2).await.unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].passage.id, "guide_0");
    assert!(results[0].score >= results[1].score);
}

//! Queries against freshly built indexes.

use std::collections::HashMap;
use std::sync::Arc;

use inkdex::persistence::{export_to_store, load_terms, MemoryTermStore};
use inkdex::scan::{ChunkSource, MemorySource};
use inkdex::tokenizer::IdentityNormalizer;
use inkdex::{IndexAggregator, IndexSettings, QueryEngine, ScoredResult, Tokenizer};

fn memory(id: &str, text: &str) -> Arc<dyn ChunkSource> {
    Arc::new(MemorySource::new(id, text))
}

fn scores(results: Vec<ScoredResult>) -> HashMap<String, usize> {
    results
        .into_iter()
        .map(|r| (r.document_id, r.match_count))
        .collect()
}

fn build_engine(aggregator: &IndexAggregator, docs: Vec<Arc<dyn ChunkSource>>) -> QueryEngine {
    let report = aggregator.build_from_sources(docs);
    QueryEngine::new(Arc::new(report.index), aggregator.tokenizer().clone())
}

#[test]
fn test_hello_world_match_counts() {
    let mut settings = IndexSettings::default();
    settings.tokenizer_config.remove_stopwords = false;
    let aggregator = IndexAggregator::new(&settings).unwrap();
    let engine = build_engine(&aggregator, vec![memory("greeting.txt", "Hello world")]);

    assert_eq!(
        engine.search("hello world"),
        vec![ScoredResult {
            document_id: "greeting.txt".to_string(),
            match_count: 2
        }]
    );
    assert_eq!(engine.search("world")[0].match_count, 1);
}

#[test]
fn test_stop_word_query_returns_nothing() {
    let aggregator = IndexAggregator::new(&IndexSettings::default()).unwrap();
    let engine = build_engine(
        &aggregator,
        vec![memory("a.txt", "the quick brown fox is over there")],
    );

    assert!(engine.search("the is over").is_empty());
    assert!(!engine.search("the fox").is_empty());
}

#[test]
fn test_two_document_scenario() {
    let aggregator = IndexAggregator::with_tokenizer(
        &IndexSettings::default(),
        Tokenizer::with_normalizer(Arc::new(IdentityNormalizer)),
    );
    let engine = build_engine(
        &aggregator,
        vec![memory("doc1", "cat dog cat"), memory("doc2", "dog bird")],
    );

    let results = scores(engine.search("dog cat"));
    assert_eq!(results.len(), 2);
    assert_eq!(results["doc1"], 2);
    assert_eq!(results["doc2"], 1);

    // Occurrence count inside a document never inflates the score.
    assert_eq!(scores(engine.search("cat"))["doc1"], 1);
}

#[test]
fn test_stemmed_forms_match_across_build_and_query() {
    let aggregator = IndexAggregator::new(&IndexSettings::default()).unwrap();
    let engine = build_engine(
        &aggregator,
        vec![
            memory("runner.txt", "She was running through the fields"),
            memory("walker.txt", "He walks along the fields"),
        ],
    );

    let results = scores(engine.search("RUNS field"));
    assert_eq!(results["runner.txt"], 2);
    assert_eq!(results["walker.txt"], 1);
}

#[test]
fn test_query_over_term_store_subset() {
    let aggregator = IndexAggregator::with_tokenizer(
        &IndexSettings::default(),
        Tokenizer::with_normalizer(Arc::new(IdentityNormalizer)),
    );
    let report = aggregator.build_from_sources(vec![
        memory("doc1", "cat dog cat"),
        memory("doc2", "dog bird"),
    ]);

    let store = MemoryTermStore::new();
    export_to_store(&report.index, &store).unwrap();

    let tokenizer = aggregator.tokenizer().clone();
    let terms = tokenizer.query_terms("dog cat");
    let partial = load_terms(&store, &terms).unwrap();
    assert_eq!(partial.len(), 2);

    let engine = QueryEngine::new(Arc::new(partial), tokenizer);
    let results = scores(engine.search_terms(&terms));
    assert_eq!(results["doc1"], 2);
    assert_eq!(results["doc2"], 1);
}

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::index::InvertedIndex;
use crate::tokenizer::Tokenizer;

/// A document and how many query terms it matched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredResult {
    #[serde(rename = "filename")]
    pub document_id: String,
    #[serde(rename = "wordCounter")]
    pub match_count: usize,
}

/// Read-only search over a built index
#[derive(Debug, Clone)]
pub struct QueryEngine {
    index: Arc<InvertedIndex>,
    tokenizer: Tokenizer,
}

impl QueryEngine {
    /// `tokenizer` must be the one the index was built with.
    pub fn new(index: Arc<InvertedIndex>, tokenizer: Tokenizer) -> Self {
        Self { index, tokenizer }
    }

    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Normalize a raw query string into terms
    pub fn query_terms(&self, query: &str) -> Vec<String> {
        self.tokenizer.query_terms(query)
    }

    /// Score every document that matches at least one query term
    pub fn search(&self, query: &str) -> Vec<ScoredResult> {
        let terms = self.query_terms(query);
        debug!(query, terms = ?terms, "normalized query");
        self.search_terms(&terms)
    }

    /// Score already-normalized terms. A repeated term counts once per
    /// occurrence.
    ///
    /// Results come back with the highest match count first, ties broken by
    /// document id.
    pub fn search_terms<S: AsRef<str>>(&self, terms: &[S]) -> Vec<ScoredResult> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for term in terms {
            if let Some(documents) = self.index.postings(term.as_ref()) {
                for document in documents {
                    *counts.entry(document.as_str()).or_insert(0) += 1;
                }
            }
        }

        let mut results: Vec<ScoredResult> = counts
            .into_iter()
            .map(|(document, match_count)| ScoredResult {
                document_id: document.to_string(),
                match_count,
            })
            .collect();
        results.sort_by(|a, b| {
            b.match_count
                .cmp(&a.match_count)
                .then_with(|| a.document_id.cmp(&b.document_id))
        });
        results
    }
}

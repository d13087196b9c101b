use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::scan::DocumentTerms;

/// Term → posting list.
///
/// Each document contributes at most one entry to a term's posting list, so
/// a list's length is the number of distinct documents containing the term.
/// Posting order is the order documents finished scanning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvertedIndex {
    postings: HashMap<String, Vec<String>>,
}

impl InvertedIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one document's terms. Only the build consumer calls this.
    pub(crate) fn merge_document(&mut self, doc: &DocumentTerms) {
        for (term, document_id) in doc.pairs() {
            self.postings
                .entry(term.to_string())
                .or_default()
                .push(document_id.to_string());
        }
    }

    pub(crate) fn insert_postings(&mut self, term: String, documents: Vec<String>) {
        self.postings.insert(term, documents);
    }

    pub fn postings(&self, term: &str) -> Option<&[String]> {
        self.postings.get(term).map(Vec::as_slice)
    }

    pub fn contains_term(&self, term: &str) -> bool {
        self.postings.contains_key(term)
    }

    /// Number of distinct terms
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    /// `(term, posting list)` pairs in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.postings
            .iter()
            .map(|(term, docs)| (term.as_str(), docs.as_slice()))
    }

    /// Every document that appears in at least one posting list
    pub fn documents(&self) -> HashSet<&str> {
        self.postings
            .values()
            .flatten()
            .map(String::as_str)
            .collect()
    }

    /// A deterministic view: terms in order, each posting list sorted
    pub fn to_sorted(&self) -> BTreeMap<String, Vec<String>> {
        self.postings
            .iter()
            .map(|(term, docs)| {
                let mut docs = docs.clone();
                docs.sort();
                (term.clone(), docs)
            })
            .collect()
    }
}

impl FromIterator<(String, Vec<String>)> for InvertedIndex {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        Self {
            postings: iter.into_iter().collect(),
        }
    }
}

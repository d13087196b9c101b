use std::collections::HashMap;

use parking_lot::RwLock;
use tracing::{debug, error};

use crate::error::{InkdexError, Result};
use crate::index::InvertedIndex;

/// A key-value store holding one entry per term; the value is the posting
/// list encoded as a JSON array of document ids.
pub trait TermStore: Send + Sync {
    fn put(&self, term: &str, postings_json: &str) -> Result<()>;

    fn get(&self, term: &str) -> Result<Option<String>>;

    /// Drop every entry
    fn clear(&self) -> Result<()>;
}

/// Write every term of `index` to `store`.
///
/// On failure the store is cleared so no partial index is left behind, and
/// the original error is returned.
pub fn export_to_store(index: &InvertedIndex, store: &dyn TermStore) -> Result<()> {
    for (term, documents) in index.iter() {
        let written = serde_json::to_string(documents)
            .map_err(InkdexError::from)
            .and_then(|value| store.put(term, &value));

        if let Err(err) = written {
            error!(term, error = %err, "term export failed, clearing store");
            if let Err(clear_err) = store.clear() {
                error!(error = %clear_err, "failed to clear term store");
            }
            return Err(err);
        }
    }

    debug!(terms = index.len(), "index exported to term store");
    Ok(())
}

/// Load the posting lists of just `terms` from `store`. Terms the store does
/// not know are left out of the returned index.
pub fn load_terms<S: AsRef<str>>(store: &dyn TermStore, terms: &[S]) -> Result<InvertedIndex> {
    let mut index = InvertedIndex::new();
    for term in terms {
        let term = term.as_ref();
        match store.get(term)? {
            Some(value) => {
                let documents: Vec<String> = serde_json::from_str(&value)?;
                index.insert_postings(term.to_string(), documents);
            }
            None => debug!(term, "term not in store"),
        }
    }
    Ok(index)
}

/// In-process [`TermStore`]
#[derive(Debug, Default)]
pub struct MemoryTermStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryTermStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl TermStore for MemoryTermStore {
    fn put(&self, term: &str, postings_json: &str) -> Result<()> {
        self.entries
            .write()
            .insert(term.to_string(), postings_json.to_string());
        Ok(())
    }

    fn get(&self, term: &str) -> Result<Option<String>> {
        Ok(self.entries.read().get(term).cloned())
    }

    fn clear(&self) -> Result<()> {
        self.entries.write().clear();
        Ok(())
    }
}

use std::collections::HashSet;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use crossbeam::channel::{self, select};
use tracing::{debug, warn};

use crate::config::IndexSettings;
use crate::error::{InkdexError, Result};
use crate::tokenizer::Tokenizer;

use super::chunk::{plan_chunks, Chunk};
use super::scanner::{ChunkScanner, ScanExit};
use super::source::{ChunkSource, FileSource};

/// The distinct terms of one document, ready to merge into the global index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentTerms {
    pub document_id: String,
    pub terms: HashSet<String>,
}

impl DocumentTerms {
    /// Fold an ordered term sequence into the per-document map; repeated
    /// terms collapse to one entry.
    pub fn from_terms(document_id: impl Into<String>, terms: Vec<String>) -> Self {
        Self {
            document_id: document_id.into(),
            terms: terms.into_iter().collect(),
        }
    }

    /// `(term, document_id)` pairs
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.terms
            .iter()
            .map(move |term| (term.as_str(), self.document_id.as_str()))
    }
}

/// Scans one document's chunks concurrently on a small pool of threads
#[derive(Debug, Clone)]
pub struct FileIndexer {
    chunk_size: u64,
    scan_threads: usize,
    tokenizer: Tokenizer,
}

impl FileIndexer {
    pub fn new(settings: &IndexSettings, tokenizer: Tokenizer) -> Self {
        Self {
            chunk_size: settings.chunk_size,
            scan_threads: settings.scan_threads.max(1),
            tokenizer,
        }
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Scan a file on disk and fold it into its per-document term set
    pub fn index_path(&self, path: &Path) -> Result<DocumentTerms> {
        self.index_document(Arc::new(FileSource::new(path)))
    }

    /// Scan a document and fold it into its per-document term set
    pub fn index_document(&self, source: Arc<dyn ChunkSource>) -> Result<DocumentTerms> {
        let document_id = source.id().to_string();
        let terms = self.scan_document(source)?;
        Ok(DocumentTerms::from_terms(document_id, terms))
    }

    /// Scan every chunk of a document concurrently and collect its terms.
    ///
    /// Returns either every term the chunks produced or the first error any
    /// chunk hit; never both. The first error cancels the remaining chunks.
    /// Term order across chunks is not deterministic.
    pub fn scan_document(&self, source: Arc<dyn ChunkSource>) -> Result<Vec<String>> {
        let document = source.id().to_string();
        let len = source
            .byte_len()
            .map_err(|e| InkdexError::document_scan(&document, e))?;
        let chunks = plan_chunks(len, self.chunk_size);
        let capacity = chunks.len();
        let threads = self.scan_threads.min(capacity);

        debug!(document = %document, bytes = len, chunks = capacity, threads, "scanning document");

        let (chunk_tx, chunk_rx) = channel::bounded::<Chunk>(capacity);
        for chunk in chunks {
            // Sized to the chunk count and `chunk_rx` is alive; never fails.
            let _ = chunk_tx.send(chunk);
        }
        drop(chunk_tx);

        let (term_tx, term_rx) = channel::bounded::<String>(capacity);
        let (err_tx, err_rx) = channel::bounded::<io::Error>(capacity);
        let cancel = Arc::new(AtomicBool::new(false));

        let mut workers = Vec::with_capacity(threads);
        for worker in 0..threads {
            let chunks = chunk_rx.clone();
            let source = source.clone();
            let tokenizer = self.tokenizer.clone();
            let cancel = cancel.clone();
            let terms = term_tx.clone();
            let errors = err_tx.clone();
            let spawned = thread::Builder::new()
                .name(format!("inkdex-scan-{}", worker))
                .spawn(move || {
                    for chunk in chunks.iter() {
                        let scanner =
                            ChunkScanner::new(chunk, source.clone(), tokenizer.clone(), cancel.clone());
                        match scanner.run(&terms, &errors) {
                            Some(ScanExit::LimitReached) | Some(ScanExit::EndOfDocument) => {}
                            _ => break,
                        }
                    }
                });

            match spawned {
                Ok(handle) => workers.push(handle),
                Err(e) if workers.is_empty() => {
                    return Err(InkdexError::document_scan(&document, e));
                }
                Err(e) => {
                    // Queued chunks are picked up by the threads already running.
                    warn!(document = %document, error = %e, "scanning with fewer threads");
                    break;
                }
            }
        }

        // Both channels close once the last scanner thread exits.
        drop(term_tx);
        drop(err_tx);

        let mut terms = Vec::new();
        loop {
            select! {
                recv(term_rx) -> msg => match msg {
                    Ok(term) => terms.push(term),
                    Err(_) => {
                        // Every scanner has exited; a failure would already be queued.
                        return match err_rx.recv() {
                            Ok(err) => Err(InkdexError::document_scan(&document, err)),
                            Err(_) => join_scanners(&document, workers).map(|_| terms),
                        };
                    }
                },
                recv(err_rx) -> msg => match msg {
                    Ok(err) => {
                        cancel.store(true, Ordering::Relaxed);
                        warn!(document = %document, error = %err, "cancelling document scan");
                        return Err(InkdexError::document_scan(&document, err));
                    }
                    Err(_) => {
                        terms.extend(term_rx.iter());
                        return join_scanners(&document, workers).map(|_| terms);
                    }
                },
            }
        }
    }
}

/// A scanner thread that panicked took its chunk's terms with it.
fn join_scanners(document: &str, workers: Vec<thread::JoinHandle<()>>) -> Result<()> {
    let mut panicked = false;
    for worker in workers {
        panicked |= worker.join().is_err();
    }
    if panicked {
        return Err(InkdexError::document_scan(
            document,
            io::Error::new(io::ErrorKind::Other, "chunk scanner panicked"),
        ));
    }
    Ok(())
}

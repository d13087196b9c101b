use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam::channel;
use tracing::{debug, info, warn};

use crate::config::IndexSettings;
use crate::error::{InkdexError, Result};
use crate::scan::{ChunkSource, DocumentTerms, FileIndexer, FileSource};
use crate::tokenizer::Tokenizer;

use super::inverted::InvertedIndex;

/// Outcome of one build pass
#[derive(Debug)]
pub struct BuildReport {
    pub index: InvertedIndex,
    /// Documents merged into the index
    pub documents_indexed: usize,
    /// Documents skipped because their scan failed, with the reason
    pub failed: Vec<(String, String)>,
    pub elapsed: Duration,
}

impl BuildReport {
    pub fn documents_failed(&self) -> usize {
        self.failed.len()
    }
}

type DocumentOutcome = std::result::Result<DocumentTerms, (String, InkdexError)>;

/// Builds the global inverted index from a set of documents.
///
/// Documents are scanned by a fixed pool of `worker_threads` threads; the
/// thread that calls [`IndexAggregator::build`] is the only one that ever
/// touches the index being built.
#[derive(Debug, Clone)]
pub struct IndexAggregator {
    indexer: FileIndexer,
    channel_capacity: usize,
    worker_threads: usize,
}

impl IndexAggregator {
    pub fn new(settings: &IndexSettings) -> Result<Self> {
        settings.validate()?;
        let tokenizer = Tokenizer::new(&settings.tokenizer_config)?;
        Ok(Self::with_tokenizer(settings, tokenizer))
    }

    /// Use a caller-supplied tokenizer; queries must use the same one.
    pub fn with_tokenizer(settings: &IndexSettings, tokenizer: Tokenizer) -> Self {
        Self {
            indexer: FileIndexer::new(settings, tokenizer),
            channel_capacity: settings.file_channel_capacity.max(1),
            worker_threads: settings.worker_threads.max(1),
        }
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        self.indexer.tokenizer()
    }

    /// Build an index from files on disk
    pub fn build(&self, paths: &[PathBuf]) -> BuildReport {
        let sources = paths
            .iter()
            .map(|path| Arc::new(FileSource::new(path)) as Arc<dyn ChunkSource>)
            .collect();
        self.build_from_sources(sources)
    }

    /// Build an index from arbitrary document sources.
    ///
    /// A document whose scan fails is logged and left out; it never aborts
    /// the build.
    pub fn build_from_sources(&self, sources: Vec<Arc<dyn ChunkSource>>) -> BuildReport {
        let start = Instant::now();
        let total = sources.len();
        let threads = self.worker_threads.min(total);

        let (job_tx, job_rx) = channel::unbounded::<Arc<dyn ChunkSource>>();
        for source in sources {
            // `job_rx` is alive; never fails.
            let _ = job_tx.send(source);
        }
        drop(job_tx);

        let (tx, rx) = channel::bounded::<DocumentOutcome>(self.channel_capacity);

        let mut workers = Vec::with_capacity(threads);
        let mut spawn_error = None;
        for worker in 0..threads {
            let jobs = job_rx.clone();
            let indexer = self.indexer.clone();
            let sender = tx.clone();
            let spawned = thread::Builder::new()
                .name(format!("inkdex-document-{}", worker))
                .spawn(move || {
                    for source in jobs.iter() {
                        if sender.send(index_one(&indexer, source)).is_err() {
                            break;
                        }
                    }
                });

            match spawned {
                Ok(handle) => workers.push(handle),
                Err(e) => {
                    warn!(worker, error = %e, "could not start document worker");
                    spawn_error = Some(e);
                    break;
                }
            }
        }

        // The channel closes once the last worker exits.
        drop(tx);

        let mut failed = Vec::new();
        if workers.is_empty() {
            if let Some(e) = spawn_error {
                for source in job_rx.try_iter() {
                    let document = source.id().to_string();
                    let err = InkdexError::document_scan(
                        &document,
                        io::Error::new(e.kind(), e.to_string()),
                    );
                    warn!(document = %document, error = %err, "skipping document");
                    failed.push((document, err.to_string()));
                }
            }
        }

        let mut index = InvertedIndex::new();
        let mut documents_indexed = 0;

        for outcome in rx {
            match outcome {
                Ok(doc) => {
                    debug!(
                        document = %doc.document_id,
                        terms = doc.terms.len(),
                        "merging document"
                    );
                    index.merge_document(&doc);
                    documents_indexed += 1;
                }
                Err((document, err)) => {
                    warn!(document = %document, error = %err, "skipping document");
                    failed.push((document, err.to_string()));
                }
            }
        }

        for worker in workers {
            if worker.join().is_err() {
                warn!("document worker panicked");
            }
        }

        let elapsed = start.elapsed();
        info!(
            documents = total,
            indexed = documents_indexed,
            failed = failed.len(),
            terms = index.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            "index build finished"
        );

        BuildReport {
            index,
            documents_indexed,
            failed,
            elapsed,
        }
    }
}

/// Index one document. A panic inside the scan is confined to that document.
fn index_one(indexer: &FileIndexer, source: Arc<dyn ChunkSource>) -> DocumentOutcome {
    let document = source.id().to_string();
    match panic::catch_unwind(AssertUnwindSafe(|| indexer.index_document(source))) {
        Ok(outcome) => outcome.map_err(|e| (document, e)),
        Err(_) => {
            let err = InkdexError::document_scan(
                &document,
                io::Error::new(io::ErrorKind::Other, "document indexer panicked"),
            );
            Err((document, err))
        }
    }
}

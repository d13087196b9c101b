use std::io::{self, BufRead};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crossbeam::channel::Sender;
use tracing::debug;

use crate::tokenizer::Tokenizer;

use super::chunk::Chunk;
use super::source::ChunkSource;

/// Segment delimiter used when walking a chunk
pub const DELIMITER: u8 = b' ';

/// Why a scanner stopped without an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanExit {
    /// Consumed more than `limit` bytes
    LimitReached,
    /// Hit the end of the document
    EndOfDocument,
    /// A sibling failed and the document scan was cancelled
    Cancelled,
    /// The term receiver went away
    SinkClosed,
}

/// Reads and tokenizes one chunk of a document
pub struct ChunkScanner {
    chunk: Chunk,
    source: Arc<dyn ChunkSource>,
    tokenizer: Tokenizer,
    cancel: Arc<AtomicBool>,
}

impl ChunkScanner {
    pub fn new(
        chunk: Chunk,
        source: Arc<dyn ChunkSource>,
        tokenizer: Tokenizer,
        cancel: Arc<AtomicBool>,
    ) -> Self {
        Self {
            chunk,
            source,
            tokenizer,
            cancel,
        }
    }

    /// Scan the chunk, sending terms to `terms`. An I/O failure is sent to
    /// `errors` once and ends the scan.
    pub fn run(self, terms: &Sender<String>, errors: &Sender<io::Error>) -> Option<ScanExit> {
        match self.scan(terms) {
            Ok(exit) => {
                debug!(
                    document = self.source.id(),
                    chunk = self.chunk.index,
                    ?exit,
                    "chunk scan finished"
                );
                Some(exit)
            }
            Err(err) => {
                debug!(
                    document = self.source.id(),
                    chunk = self.chunk.index,
                    error = %err,
                    "chunk scan failed"
                );
                // Sized to the chunk count; never blocks.
                let _ = errors.send(err);
                None
            }
        }
    }

    fn scan(&self, terms: &Sender<String>) -> io::Result<ScanExit> {
        let mut reader = self.source.open_at(self.chunk.offset)?;
        let mut segment = Vec::new();

        // Bytes are counted from `offset`, head included, so a chunk stops at
        // the first segment end at or past the next chunk's offset. That is
        // exactly where the next chunk resumes after skipping its own head.
        let mut consumed: u64 = 0;

        // The head of a non-first chunk up to the first space belongs to the
        // previous chunk's last segment.
        if !self.chunk.is_first() {
            consumed += reader.read_until(DELIMITER, &mut segment)? as u64;
            if segment.last() != Some(&DELIMITER) {
                return Ok(ScanExit::EndOfDocument);
            }
        }

        loop {
            if self.cancel.load(Ordering::Relaxed) {
                return Ok(ScanExit::Cancelled);
            }
            if consumed > self.chunk.limit {
                return Ok(ScanExit::LimitReached);
            }

            segment.clear();
            let read = reader.read_until(DELIMITER, &mut segment)?;
            if read == 0 {
                return Ok(ScanExit::EndOfDocument);
            }
            consumed += read as u64;

            let text = String::from_utf8_lossy(&segment);
            for term in self.tokenizer.terms(&text) {
                if terms.send(term).is_err() {
                    return Ok(ScanExit::SinkClosed);
                }
            }

            // A segment without a trailing delimiter is the document's tail.
            if segment.last() != Some(&DELIMITER) {
                return Ok(ScanExit::EndOfDocument);
            }
        }
    }
}

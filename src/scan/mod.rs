//! Chunked, concurrent document scanning.
//!
//! A document is cut into fixed-size byte ranges by [`plan_chunks`]; one
//! [`ChunkScanner`] thread per range reads and tokenizes it through its own
//! read handle, and the [`FileIndexer`] fans the terms back in.

mod chunk;
mod file;
mod scanner;
mod source;

pub use chunk::{plan_chunks, Chunk};
pub use file::{DocumentTerms, FileIndexer};
pub use scanner::{ChunkScanner, ScanExit, DELIMITER};
pub use source::{ChunkSource, FileSource, MemorySource};

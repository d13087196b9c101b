//! Inverted index assembly.
//!
//! One [`FileIndexer`](crate::scan::FileIndexer) thread per document feeds a
//! single consumer that owns the [`InvertedIndex`] while it is being built.

mod aggregator;
mod discovery;
mod inverted;

pub use aggregator::{BuildReport, IndexAggregator};
pub use discovery::discover_documents;
pub use inverted::InvertedIndex;

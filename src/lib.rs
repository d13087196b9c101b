pub mod api;
pub mod config;
pub mod error;
pub mod index;
pub mod metrics;
pub mod persistence;
pub mod query;
pub mod scan;
pub mod tokenizer;

pub use api::{create_router, AppState};
pub use config::{IndexSettings, ServerConfig, TokenizerConfig};
pub use error::{InkdexError, Result};
pub use index::{discover_documents, BuildReport, IndexAggregator, InvertedIndex};
pub use metrics::IndexMetrics;
pub use query::{QueryEngine, ScoredResult};
pub use tokenizer::{Normalizer, Tokenizer};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

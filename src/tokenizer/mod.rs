//! Text handling shared by the index build and query paths.
//!
//! Both sides go through the same [`Tokenizer`], so a term produced while
//! scanning a document is byte-for-byte the term produced for a query word.

mod normalizer;
#[allow(clippy::module_inception)]
mod tokenizer;

pub use normalizer::{IdentityNormalizer, Normalizer, StemmingNormalizer};
pub use tokenizer::{split_tokens, Tokenizer};

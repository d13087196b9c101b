//! Free-text query evaluation against a finished [`InvertedIndex`](crate::index::InvertedIndex).
//!
//! A document's score is the number of query terms whose posting list
//! contains it. In-document frequency plays no part.

pub mod engine;

pub use engine::{QueryEngine, ScoredResult};

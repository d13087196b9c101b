//! Index artifact persistence: a single JSON object on disk, or one
//! key-value pair per term in a [`TermStore`].

mod json_file;
mod term_store;

pub use json_file::{load_json, save_json};
pub use term_store::{export_to_store, load_terms, MemoryTermStore, TermStore};

use std::collections::HashSet;

use rust_stemmers::{Algorithm, Stemmer};
use stop_words::{get, LANGUAGE};

use crate::config::TokenizerConfig;
use crate::error::{InkdexError, Result};

/// Maps a raw token to its index term, or `None` when the token should be
/// dropped (stop word, empty after stemming).
///
/// Implementations must be pure: the same input always yields the same term,
/// on every thread.
pub trait Normalizer: Send + Sync {
    fn normalize(&self, word: &str) -> Option<String>;
}

impl<F> Normalizer for F
where
    F: Fn(&str) -> Option<String> + Send + Sync,
{
    fn normalize(&self, word: &str) -> Option<String> {
        self(word)
    }
}

/// Passes tokens through unchanged; only empty tokens are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityNormalizer;

impl Normalizer for IdentityNormalizer {
    fn normalize(&self, word: &str) -> Option<String> {
        if word.is_empty() {
            None
        } else {
            Some(word.to_string())
        }
    }
}

/// Lowercasing, stop-word removal and Snowball stemming
pub struct StemmingNormalizer {
    stemmer: Option<Stemmer>,
    stopwords: HashSet<String>,
}

impl StemmingNormalizer {
    /// Create a normalizer from configuration
    pub fn new(config: &TokenizerConfig) -> Result<Self> {
        config.validate()?;
        let (algorithm, language) = resolve_language(&config.language)?;

        let stemmer = if config.stem {
            Some(Stemmer::create(algorithm))
        } else {
            None
        };

        let stopwords = if config.remove_stopwords {
            get(language)
                .into_iter()
                .map(|s| s.to_lowercase())
                .collect()
        } else {
            HashSet::new()
        };

        Ok(Self { stemmer, stopwords })
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(&word.to_lowercase())
    }
}

impl Normalizer for StemmingNormalizer {
    fn normalize(&self, word: &str) -> Option<String> {
        let token = word.to_lowercase();
        if token.is_empty() || self.stopwords.contains(&token) {
            return None;
        }

        let term = match &self.stemmer {
            Some(stemmer) => stemmer.stem(&token).into_owned(),
            None => token,
        };

        if term.is_empty() {
            None
        } else {
            Some(term)
        }
    }
}

fn resolve_language(language: &str) -> Result<(Algorithm, LANGUAGE)> {
    match language.to_lowercase().as_str() {
        "english" => Ok((Algorithm::English, LANGUAGE::English)),
        "french" => Ok((Algorithm::French, LANGUAGE::French)),
        "german" => Ok((Algorithm::German, LANGUAGE::German)),
        "spanish" => Ok((Algorithm::Spanish, LANGUAGE::Spanish)),
        "italian" => Ok((Algorithm::Italian, LANGUAGE::Italian)),
        "portuguese" => Ok((Algorithm::Portuguese, LANGUAGE::Portuguese)),
        "russian" => Ok((Algorithm::Russian, LANGUAGE::Russian)),
        other => Err(InkdexError::InvalidConfig(format!(
            "unsupported language: {}",
            other
        ))),
    }
}

use std::sync::Arc;

use unicode_general_category::{get_general_category, GeneralCategory};

use crate::config::TokenizerConfig;
use crate::error::Result;

use super::normalizer::{Normalizer, StemmingNormalizer};

/// Split text into tokens: maximal runs of Unicode letters (General
/// Category L) and the apostrophe. Every other character is a delimiter.
pub fn split_tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !is_token_char(c))
        .filter(|token| !token.is_empty())
}

fn is_token_char(c: char) -> bool {
    c == '\''
        || matches!(
            get_general_category(c),
            GeneralCategory::UppercaseLetter
                | GeneralCategory::LowercaseLetter
                | GeneralCategory::TitlecaseLetter
                | GeneralCategory::ModifierLetter
                | GeneralCategory::OtherLetter
        )
}

/// Token splitting plus the shared normalization contract.
///
/// Cheap to clone; every scan worker and every query handler holds one.
#[derive(Clone)]
pub struct Tokenizer {
    normalizer: Arc<dyn Normalizer>,
}

impl Tokenizer {
    /// Create a tokenizer backed by a [`StemmingNormalizer`]
    pub fn new(config: &TokenizerConfig) -> Result<Self> {
        Ok(Self::with_normalizer(Arc::new(StemmingNormalizer::new(config)?)))
    }

    /// Create a tokenizer around any normalizer
    pub fn with_normalizer(normalizer: Arc<dyn Normalizer>) -> Self {
        Self { normalizer }
    }

    pub fn normalize(&self, word: &str) -> Option<String> {
        self.normalizer.normalize(word)
    }

    /// Tokenize document text into terms, in order, duplicates kept
    pub fn terms(&self, text: &str) -> Vec<String> {
        split_tokens(text)
            .filter_map(|token| self.normalize(token))
            .collect()
    }

    /// Turn a free-text query into terms.
    ///
    /// The query is lowercased and split on whitespace; each raw word goes
    /// through the normalizer as-is. Duplicates are kept.
    pub fn query_terms(&self, query: &str) -> Vec<String> {
        query
            .to_lowercase()
            .split_whitespace()
            .filter_map(|word| self.normalize(word))
            .collect()
    }
}

impl std::fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tokenizer").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::IdentityNormalizer;

    fn identity() -> Tokenizer {
        Tokenizer::with_normalizer(Arc::new(IdentityNormalizer))
    }

    #[test]
    fn test_split_on_non_letters() {
        let tokens: Vec<&str> = split_tokens("Hello, world!\nfoo-bar 42baz").collect();
        assert_eq!(tokens, vec!["Hello", "world", "foo", "bar", "baz"]);
    }

    #[test]
    fn test_split_keeps_apostrophe() {
        let tokens: Vec<&str> = split_tokens("don't stop the rock'n'roll").collect();
        assert_eq!(tokens, vec!["don't", "stop", "the", "rock'n'roll"]);
    }

    #[test]
    fn test_split_unicode_letters() {
        let tokens: Vec<&str> = split_tokens("Привет, мир! café—naïve").collect();
        assert_eq!(tokens, vec!["Привет", "мир", "café", "naïve"]);
    }

    #[test]
    fn test_split_excludes_letter_numbers_and_marks() {
        // U+216B ROMAN NUMERAL TWELVE is Nl; U+0301 COMBINING ACUTE is Mn.
        let tokens: Vec<&str> = split_tokens("chapter \u{216B} cafe\u{0301}s ǅemal").collect();
        assert_eq!(tokens, vec!["chapter", "cafe", "s", "ǅemal"]);
    }

    #[test]
    fn test_split_empty_and_delimiters_only() {
        assert_eq!(split_tokens("").count(), 0);
        assert_eq!(split_tokens(" \n\t123 ,.!").count(), 0);
    }

    #[test]
    fn test_terms_preserve_order_and_duplicates() {
        let terms = identity().terms("cat dog cat");
        assert_eq!(terms, vec!["cat", "dog", "cat"]);
    }

    #[test]
    fn test_terms_with_stemming() {
        let tokenizer = Tokenizer::new(&TokenizerConfig::default()).unwrap();
        let terms = tokenizer.terms("Lanterns of the Harbors ");
        assert_eq!(terms, vec!["lantern", "harbor"]);
    }

    #[test]
    fn test_query_terms_lowercase_and_drop_stopwords() {
        let tokenizer = Tokenizer::new(&TokenizerConfig::default()).unwrap();
        assert_eq!(
            tokenizer.query_terms("Lantern   HARBOR"),
            vec!["lantern", "harbor"]
        );
        assert!(tokenizer.query_terms("the and of").is_empty());
        assert!(tokenizer.query_terms("   ").is_empty());
    }

    #[test]
    fn test_query_terms_keep_duplicates() {
        assert_eq!(identity().query_terms("dog Dog"), vec!["dog", "dog"]);
    }
}

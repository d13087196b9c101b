use serde::{Deserialize, Serialize};

use crate::error::{InkdexError, Result};

/// Default byte length of one scan chunk (1 MiB)
pub const DEFAULT_CHUNK_SIZE: u64 = 1024 * 1024;

/// Default capacity of the channel carrying per-document maps to the aggregator
pub const DEFAULT_FILE_CHANNEL_CAPACITY: usize = 1000;

/// Languages understood by both the stemmer and the stop-word list
pub const SUPPORTED_LANGUAGES: &[&str] = &[
    "english",
    "french",
    "german",
    "spanish",
    "italian",
    "portuguese",
    "russian",
];

/// Index build settings
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IndexSettings {
    pub chunk_size: u64,
    pub file_channel_capacity: usize,
    /// Documents scanned at the same time
    pub worker_threads: usize,
    /// Chunk scanners running at the same time within one document
    pub scan_threads: usize,
    pub tokenizer_config: TokenizerConfig,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            file_channel_capacity: DEFAULT_FILE_CHANNEL_CAPACITY,
            worker_threads: num_cpus::get(),
            scan_threads: num_cpus::get(),
            tokenizer_config: TokenizerConfig::default(),
        }
    }
}

impl IndexSettings {
    pub fn with_chunk_size(mut self, chunk_size: u64) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_worker_threads(mut self, threads: usize) -> Self {
        self.worker_threads = threads;
        self
    }

    pub fn with_scan_threads(mut self, threads: usize) -> Self {
        self.scan_threads = threads;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(InkdexError::InvalidConfig(
                "chunk_size must be greater than zero".to_string(),
            ));
        }
        if self.file_channel_capacity == 0 {
            return Err(InkdexError::InvalidConfig(
                "file_channel_capacity must be greater than zero".to_string(),
            ));
        }
        if self.worker_threads == 0 || self.scan_threads == 0 {
            return Err(InkdexError::InvalidConfig(
                "worker_threads and scan_threads must be greater than zero".to_string(),
            ));
        }
        self.tokenizer_config.validate()
    }
}

/// Normalizer configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenizerConfig {
    pub remove_stopwords: bool,
    pub stem: bool,
    pub language: String,
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            remove_stopwords: true,
            stem: true,
            language: "english".to_string(),
        }
    }
}

impl TokenizerConfig {
    pub fn validate(&self) -> Result<()> {
        let language = self.language.to_lowercase();
        if SUPPORTED_LANGUAGES.contains(&language.as_str()) {
            Ok(())
        } else {
            Err(InkdexError::InvalidConfig(format!(
                "unsupported language: {}",
                self.language
            )))
        }
    }
}

/// Process-level settings for the search server
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub listen: String,
    pub log_level: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "localhost:8888".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl ServerConfig {
    pub const LISTEN_ENV: &'static str = "INKDEX_LISTEN";
    pub const LOG_LEVEL_ENV: &'static str = "INKDEX_LOG_LEVEL";

    /// Load from the process environment, falling back to defaults for
    /// unset or empty variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let pick = |key: &str, fallback: String| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or(fallback)
        };

        Self {
            listen: pick(Self::LISTEN_ENV, defaults.listen),
            log_level: pick(Self::LOG_LEVEL_ENV, defaults.log_level),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_configs() {
        let settings = IndexSettings::default();
        assert_eq!(settings.chunk_size, 1024 * 1024);
        assert_eq!(settings.file_channel_capacity, 1000);
        assert!(settings.worker_threads >= 1);
        assert_eq!(settings.worker_threads, settings.scan_threads);
        assert!(settings.validate().is_ok());

        let tokenizer_config = TokenizerConfig::default();
        assert!(tokenizer_config.stem);
        assert!(tokenizer_config.remove_stopwords);
    }

    #[test]
    fn test_invalid_settings() {
        assert!(IndexSettings::default().with_chunk_size(0).validate().is_err());
        assert!(IndexSettings::default().with_worker_threads(0).validate().is_err());
        assert!(IndexSettings::default().with_scan_threads(0).validate().is_err());

        let mut settings = IndexSettings::default();
        settings.tokenizer_config.language = "klingon".to_string();
        assert!(matches!(
            settings.validate(),
            Err(InkdexError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_language_is_case_insensitive() {
        let config = TokenizerConfig {
            language: "German".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_server_config_from_lookup() {
        let env: HashMap<&str, &str> = [("INKDEX_LISTEN", "0.0.0.0:9000"), ("INKDEX_LOG_LEVEL", "")]
            .into_iter()
            .collect();
        let config = ServerConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.listen, "0.0.0.0:9000");
        assert_eq!(config.log_level, "info");
    }
}

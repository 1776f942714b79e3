//! Error types for trie construction and configuration loading.

use thiserror::Error;

/// Result type alias using `TrieError`
pub type Result<T> = std::result::Result<T, TrieError>;

/// Errors that can occur while building a policy trie
#[derive(Error, Debug)]
pub enum TrieError {
    /// Growing a node's children sequence failed
    #[error("allocation failed while inserting word: {word}")]
    Alloc { word: String },

    /// The word cannot be represented in the trie
    #[error("invalid word {word:?}: {reason}")]
    InvalidWord { word: String, reason: &'static str },

    /// Configuration file failed to parse
    #[error("config error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for TrieError {
    fn from(err: toml::de::Error) -> Self {
        TrieError::Config(err.to_string())
    }
}

//! Command policy: a long-lived trie root loaded from configuration.

use crate::config::Config;
use crate::error::Result;
use crate::trie::TrieNode;
use crate::wordset::WordSet;

/// Outcome of evaluating a single candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    pub matched: bool,
    pub reason: String,
}

impl MatchResult {
    pub fn as_str(&self) -> &'static str {
        if self.matched { "allow" } else { "deny" }
    }
}

/// Owns the root sentinel of a policy trie.
///
/// The root lives as long as the policy; `reload` swaps its contents in
/// place rather than building a new root.
#[derive(Debug, Default)]
pub struct CommandPolicy {
    root: TrieNode,
}

impl CommandPolicy {
    /// Policy with no words. Every candidate is rejected.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_word_set(words: &WordSet) -> Result<Self> {
        let mut policy = Self::new();
        policy.root.insert_batch(words)?;
        Ok(policy)
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::from_word_set(&config.word_set())
    }

    /// Replace the loaded words with `words`, keeping the same root.
    ///
    /// On failure the policy holds the entries inserted before the failing one.
    pub fn reload(&mut self, words: &WordSet) -> Result<()> {
        let released = self.root.destroy_children();
        log::info!(
            "reloading policy: released {released} node(s), inserting {} word(s)",
            words.len()
        );
        self.root.insert_batch(words)
    }

    pub fn root(&self) -> &TrieNode {
        &self.root
    }

    /// Evaluate a candidate against the loaded words.
    pub fn evaluate(&self, candidate: &str) -> MatchResult {
        if self.root.match_word(candidate) {
            MatchResult {
                matched: true,
                reason: format!("allowed: {candidate}"),
            }
        } else {
            MatchResult {
                matched: false,
                reason: format!("not enabled: {candidate}"),
            }
        }
    }

    pub fn is_allowed(&self, candidate: &str) -> bool {
        self.root.match_word(candidate)
    }

    /// Render the loaded tree for debugging.
    pub fn dump(&self) -> Vec<String> {
        self.root.dump()
    }
}

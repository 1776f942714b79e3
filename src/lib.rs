//! policy-trie: a policy-tagged prefix tree for gating command keywords.
//!
//! A set of words (for example SQL statement keywords) is loaded once, each
//! with an enable flag, and candidates are then matched against it. A
//! candidate is allowed only if it is an inserted word and every node on its
//! path through the tree is enabled.
//!
//! # Architecture
//!
//! - **[`trie`]** — The trie engine: insertion with OR-merged enable flags, path-gated matching, destruction, dump.
//! - **[`wordset`]** — Ordered (word, enabled) batches fed to the engine.
//! - **[`policy`]** — Long-lived policy root built from configuration, with in-place reload.
//! - **[`config`]** — Configuration loading: embedded defaults + user overlay merge.
//! - **[`logging`]** — Logger setup and the match record log.
//! - **[`error`]** — Error types.

/// Error types shared by the engine and configuration.
pub mod error;
/// Configuration types, loading, and overlay merge logic.
pub mod config;
/// File-based match logging and logger initialisation.
pub mod logging;
/// Policy root owned across reloads.
pub mod policy;
/// Trie engine and its debug renderer.
pub mod trie;
/// Batch insertion input.
pub mod wordset;

pub use error::{Result, TrieError};
pub use policy::{CommandPolicy, MatchResult};
pub use trie::{TrieNode, destroy_tree, dump_tree};
pub use wordset::{WordEntry, WordSet};

/// Build a policy from the default config and evaluate a candidate.
///
/// This is the main entry point for tests and simple usage.
/// For CLI usage with a user config, build the policy directly.
pub fn evaluate(candidate: &str) -> MatchResult {
    let config = config::Config::default_config();
    match CommandPolicy::from_config(&config) {
        Ok(policy) => policy.evaluate(candidate),
        Err(e) => MatchResult {
            matched: false,
            reason: format!("policy failed to load: {e}"),
        },
    }
}

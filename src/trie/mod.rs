//! Policy-tagged prefix tree.
//!
//! Every node carries two flags: `word_end` marks that an inserted word
//! terminates at the node, and `enabled` marks that at least one word
//! inserted with `enabled = true` passes through it. Both flags only ever
//! go from `false` to `true`. A candidate matches only when every node on
//! its path is enabled and the final node is a word end.
//!
//! Depth is bounded only by word length, so every walk over the tree uses
//! an explicit stack or cursor instead of recursion.

mod dump;

pub use dump::dump_tree;

use std::collections::TryReserveError;

use crate::error::{Result, TrieError};
use crate::wordset::WordSet;

/// Character carried by a root node. Never a valid word character.
pub const ROOT_VALUE: char = '\0';

/// One character position in the trie.
///
/// Children are owned exclusively by their parent and kept strictly
/// ascending by `value`, which is what `find_child` binary-searches on.
#[derive(Debug, Default)]
pub struct TrieNode {
    value: char,
    children: Vec<TrieNode>,
    word_end: bool,
    enabled: bool,
}

impl TrieNode {
    /// Create an empty root node.
    pub fn new() -> Self {
        Self::default()
    }

    fn leaf(value: char, enabled: bool) -> Self {
        Self {
            value,
            children: Vec::new(),
            word_end: false,
            enabled,
        }
    }

    /// The character this node matches. `ROOT_VALUE` for a root.
    pub fn value(&self) -> char {
        self.value
    }

    /// Children, ascending by character.
    pub fn children(&self) -> &[TrieNode] {
        &self.children
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn is_word_end(&self) -> bool {
        self.word_end
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// True if the node has no children.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            count += 1;
            pending.extend(node.children.iter());
        }
        count
    }

    fn search(&self, c: char) -> std::result::Result<usize, usize> {
        self.children.binary_search_by(|child| child.value.cmp(&c))
    }

    /// Look up the direct child matching `c` exactly.
    pub fn find_child(&self, c: char) -> Option<&TrieNode> {
        self.search(c).ok().and_then(|idx| self.children.get(idx))
    }

    /// Insert a single word below this node.
    ///
    /// Existing nodes along the path have `enabled` OR-merged with the
    /// incoming flag; new nodes take it as is. If growing a children
    /// sequence fails, nodes created for the earlier characters of the word
    /// stay in the tree.
    pub fn insert_word(&mut self, word: &str, enabled: bool) -> Result<()> {
        validate_word(word)?;

        let mut node = self;
        for c in word.chars() {
            let idx = match node.search(c) {
                Ok(idx) => {
                    node.children[idx].enabled |= enabled;
                    idx
                }
                Err(pos) => {
                    node.children
                        .try_reserve_exact(1)
                        .map_err(|e| alloc_failed(node.value, word, e))?;
                    node.children.insert(pos, TrieNode::leaf(c, enabled));
                    pos
                }
            };
            node = &mut node.children[idx];
        }
        node.word_end = true;
        Ok(())
    }

    /// Insert every entry of `words` in order.
    ///
    /// Stops at the first failing entry. Entries inserted before it remain.
    pub fn insert_batch(&mut self, words: &WordSet) -> Result<()> {
        for entry in words.iter() {
            if let Err(e) = self.insert_word(&entry.word, entry.enabled) {
                log::warn!(
                    "set word[{}][{}] failed: {e}",
                    u8::from(entry.enabled),
                    entry.word
                );
                return Err(e);
            }
        }
        log::debug!("inserted {} word(s)", words.len());
        Ok(())
    }

    /// Test whether `candidate` is an inserted word reachable through
    /// enabled nodes only.
    pub fn match_word(&self, candidate: &str) -> bool {
        let mut node = self;
        for c in candidate.chars() {
            match node.find_child(c) {
                Some(child) if child.enabled => node = child,
                _ => return false,
            }
        }
        node.word_end && node.enabled
    }

    /// Destroy every descendant, keeping this node. Returns the number of
    /// nodes released.
    pub fn destroy_children(&mut self) -> usize {
        let released = release_all(std::mem::take(&mut self.children));
        log::debug!("released {released} node(s) below {:?}", self.value);
        released
    }

    /// Check that every children sequence in this subtree is strictly
    /// ascending.
    pub fn is_sorted(&self) -> bool {
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            if !node.children.windows(2).all(|pair| pair[0].value < pair[1].value) {
                return false;
            }
            pending.extend(node.children.iter());
        }
        true
    }
}

impl Drop for TrieNode {
    fn drop(&mut self) {
        release_all(std::mem::take(&mut self.children));
    }
}

/// Tear down detached subtrees children-first, returning how many nodes
/// were released.
///
/// Every node is emptied of its children before it is queued, so each drop
/// at the end is shallow. Dropping in reverse discovery order releases every
/// child before its parent.
fn release_all(roots: Vec<TrieNode>) -> usize {
    let mut pending = roots;
    let mut order = Vec::new();
    while let Some(mut node) = pending.pop() {
        pending.append(&mut node.children);
        order.push(node);
    }
    let released = order.len();
    while let Some(node) = order.pop() {
        drop(node);
    }
    released
}

/// Destroy a whole tree, root included, leaving `root` as `None`.
///
/// Returns the number of nodes released; `0` for an already empty tree.
pub fn destroy_tree(root: &mut Option<Box<TrieNode>>) -> usize {
    match root.take() {
        Some(mut node) => {
            let released = release_all(std::mem::take(&mut node.children)) + 1;
            log::debug!("released {released} node(s) including root");
            released
        }
        None => 0,
    }
}

fn alloc_failed(parent: char, word: &str, err: TryReserveError) -> TrieError {
    log::error!("growing children of {parent:?} by one slot failed while inserting {word:?}: {err}");
    TrieError::Alloc {
        word: word.to_string(),
    }
}

fn validate_word(word: &str) -> Result<()> {
    if word.is_empty() {
        return Err(TrieError::InvalidWord {
            word: word.to_string(),
            reason: "word is empty",
        });
    }
    if word.contains(ROOT_VALUE) {
        return Err(TrieError::InvalidWord {
            word: word.to_string(),
            reason: "word contains a NUL character",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(words: &[(&str, bool)]) -> TrieNode {
        let mut root = TrieNode::new();
        for (word, enabled) in words {
            root.insert_word(word, *enabled).unwrap();
        }
        root
    }

    /// Follow `path` from `node` without checking enable flags.
    fn walk<'a>(node: &'a TrieNode, path: &str) -> &'a TrieNode {
        path.chars().fold(node, |n, c| n.find_child(c).unwrap())
    }

    #[test]
    fn new_root_is_empty() {
        let root = TrieNode::new();
        assert_eq!(root.value(), ROOT_VALUE);
        assert!(root.is_empty());
        assert!(!root.is_enabled());
        assert!(!root.is_word_end());
        assert_eq!(root.node_count(), 1);
    }

    #[test]
    fn insert_creates_one_node_per_char() {
        let root = build(&[("haha", true)]);
        assert_eq!(root.child_count(), 1);
        assert_eq!(root.node_count(), 5);
        let end = walk(&root, "haha");
        assert!(end.is_word_end());
        assert!(end.is_enabled());
        assert!(!walk(&root, "hah").is_word_end());
    }

    #[test]
    fn shared_prefix_reuses_nodes() {
        let root = build(&[("haha", true), ("hehe", false)]);
        assert_eq!(root.child_count(), 1);
        assert_eq!(walk(&root, "h").child_count(), 2);
        assert_eq!(root.node_count(), 8);
    }

    #[test]
    fn children_stay_sorted() {
        let root = build(&[
            ("zeta", true),
            ("alpha", false),
            ("mu", true),
            ("beta", true),
            ("alps", false),
            ("b", true),
            ("Zulu", true),
        ]);
        assert!(root.is_sorted());
        let values: Vec<char> = root.children().iter().map(TrieNode::value).collect();
        assert_eq!(values, vec!['Z', 'a', 'b', 'm', 'z']);
    }

    #[test]
    fn reinsert_adds_no_nodes() {
        let mut root = build(&[("select", true)]);
        let before = root.node_count();
        root.insert_word("select", false).unwrap();
        assert_eq!(root.node_count(), before);
        assert!(root.match_word("select"));
    }

    #[test]
    fn or_merge_disabled_then_enabled() {
        let root = build(&[("drop", false), ("drop", true)]);
        for prefix in ["d", "dr", "dro", "drop"] {
            assert!(walk(&root, prefix).is_enabled(), "prefix {prefix}");
        }
    }

    #[test]
    fn or_merge_enabled_then_disabled() {
        let root = build(&[("drop", true), ("drop", false)]);
        for prefix in ["d", "dr", "dro", "drop"] {
            assert!(walk(&root, prefix).is_enabled(), "prefix {prefix}");
        }
        assert!(root.match_word("drop"));
    }

    #[test]
    fn longer_enabled_word_enables_shorter_prefix_word() {
        // "ab" is disabled on its own, but "abc" passes through and enables it.
        let root = build(&[("ab", false), ("abc", true)]);
        assert!(root.match_word("ab"));
        assert!(root.match_word("abc"));
    }

    #[test]
    fn disabled_node_gates_path() {
        let root = build(&[("de", false), ("dex", true)]);
        // "dex" enabled its whole path, so nothing is gated here.
        assert!(root.match_word("dex"));

        let root = build(&[("abc", false)]);
        assert!(!root.match_word("abc"));
    }

    #[test]
    fn disabled_ancestor_blocks_match_even_with_word_end() {
        let mut root = build(&[("xy", false)]);
        // Force an enabled terminal beneath a disabled ancestor.
        let x = &mut root.children[0];
        x.children[0].enabled = true;
        assert!(!x.enabled);
        assert!(!root.match_word("xy"));
    }

    #[test]
    fn match_requires_word_end() {
        let root = build(&[("haha", true)]);
        assert!(root.match_word("haha"));
        assert!(!root.match_word("hah"));
        assert!(!root.match_word("h"));
        assert!(!root.match_word("hahah"));
    }

    #[test]
    fn match_is_case_sensitive() {
        let root = build(&[("select", true)]);
        assert!(!root.match_word("SELECT"));
        assert!(!root.match_word("Select"));
    }

    #[test]
    fn empty_candidate_never_matches() {
        let root = build(&[("a", true)]);
        assert!(!root.match_word(""));
    }

    #[test]
    fn find_child_misses() {
        let root = build(&[("haha", true), ("dada", false)]);
        assert!(root.find_child('h').is_some());
        assert!(root.find_child('d').is_some());
        assert!(root.find_child('a').is_none());
        assert!(root.find_child('z').is_none());
        assert!(TrieNode::new().find_child('h').is_none());
    }

    #[test]
    fn non_ascii_words() {
        let root = build(&[("选择", true), ("删除", false)]);
        assert!(root.match_word("选择"));
        assert!(!root.match_word("删除"));
        assert!(root.is_sorted());
    }

    #[test]
    fn empty_word_rejected() {
        let mut root = TrieNode::new();
        let err = root.insert_word("", true).unwrap_err();
        assert!(matches!(err, TrieError::InvalidWord { .. }));
        assert!(!root.is_word_end());
    }

    #[test]
    fn nul_word_rejected_without_side_effects() {
        let mut root = TrieNode::new();
        let err = root.insert_word("ab\0c", true).unwrap_err();
        assert!(matches!(err, TrieError::InvalidWord { .. }));
        assert!(root.is_empty());
    }

    #[test]
    fn insert_batch_stops_at_first_failure() {
        let mut root = TrieNode::new();
        let words = WordSet::from_pairs([("select", true), ("", true), ("insert", true)]);
        assert!(root.insert_batch(&words).is_err());
        assert!(root.match_word("select"));
        assert!(!root.match_word("insert"));
    }

    #[test]
    fn insert_batch_in_order() {
        let mut root = TrieNode::new();
        let words = WordSet::from_pairs([("show", true), ("shutdown", false)]);
        root.insert_batch(&words).unwrap();
        assert!(root.match_word("show"));
        assert!(!root.match_word("shutdown"));
    }

    #[test]
    fn destroy_children_keeps_root() {
        let mut root = build(&[("haha", true), ("dada", false)]);
        assert_eq!(root.destroy_children(), 8);
        assert_eq!(root.child_count(), 0);
        assert!(root.is_empty());
        assert!(!root.match_word("haha"));
        // The root is reusable afterwards.
        root.insert_word("haha", true).unwrap();
        assert!(root.match_word("haha"));
    }

    #[test]
    fn destroy_children_on_leaf_is_noop() {
        let mut root = TrieNode::new();
        assert_eq!(root.destroy_children(), 0);
    }

    #[test]
    fn destroy_tree_clears_reference() {
        let mut root = Some(Box::new(build(&[("haha", true)])));
        assert_eq!(destroy_tree(&mut root), 5);
        assert!(root.is_none());
        assert_eq!(destroy_tree(&mut root), 0);
        assert!(root.is_none());
    }

    #[test]
    fn very_long_word() {
        let word = "a".repeat(100_000);
        let mut root = TrieNode::new();
        root.insert_word(&word, true).unwrap();
        root.insert_word(&word[..50_000], false).unwrap();
        assert_eq!(root.node_count(), 100_001);
        assert!(root.is_sorted());
        assert!(root.match_word(&word));
        assert!(root.match_word(&word[..50_000]));
        assert!(!root.match_word(&word[..50_001]));
        assert_eq!(root.destroy_children(), 100_000);
        assert!(root.is_empty());
    }

    #[test]
    fn very_long_word_destroy_tree_and_drop() {
        let word = "ab".repeat(50_000);
        let mut root = Some(Box::new(TrieNode::new()));
        if let Some(node) = root.as_mut() {
            node.insert_word(&word, true).unwrap();
        }
        assert_eq!(destroy_tree(&mut root), 100_001);
        assert!(root.is_none());

        // Implicit drop of a deep tree must not recurse either.
        let mut dropped = TrieNode::new();
        dropped.insert_word(&word, false).unwrap();
        drop(dropped);
    }

    #[test]
    fn alloc_failure_maps_to_alloc_error() {
        let err = Vec::<u8>::new().try_reserve_exact(usize::MAX).unwrap_err();
        let mapped = alloc_failed('s', "select", err);
        assert!(matches!(&mapped, TrieError::Alloc { word } if word == "select"));
        assert_eq!(
            mapped.to_string(),
            "allocation failed while inserting word: select"
        );
    }
}

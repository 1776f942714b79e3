//! Human-readable rendering of a trie as an ASCII tree.
//!
//! Output is for debugging only and makes no stability promises.

use std::rc::Rc;

use super::{ROOT_VALUE, TrieNode};

const BRANCH: &str = "|---";
const WORD_MARK: &str = " [word]";

/// Render the tree rooted at `node`, one line per node in pre-order, and
/// emit each line at debug level.
///
/// A `None` root logs a notice at info level and renders nothing.
pub fn dump_tree(node: Option<&TrieNode>) -> Vec<String> {
    let Some(node) = node else {
        log::info!("This is a empty trie");
        return Vec::new();
    };

    let mut lines = Vec::with_capacity(node.node_count());
    render(node, &mut lines);
    for line in &lines {
        log::debug!("{line}");
    }
    lines
}

impl TrieNode {
    /// Shorthand for [`dump_tree`] on a node that is known to exist.
    pub fn dump(&self) -> Vec<String> {
        dump_tree(Some(self))
    }
}

fn render(root: &TrieNode, lines: &mut Vec<String>) {
    // (node, prefix it is drawn with, whether a sibling follows it)
    let mut pending: Vec<(&TrieNode, Rc<str>, bool)> = vec![(root, Rc::from(""), false)];
    while let Some((node, prefix, has_next)) = pending.pop() {
        let mut line = if node.value == ROOT_VALUE {
            "ROOT".to_string()
        } else {
            format!("{prefix}{} [{}]", node.value, u8::from(node.enabled))
        };
        if node.word_end {
            line.push_str(WORD_MARK);
        }
        lines.push(line);

        let next_prefix: Rc<str> = Rc::from(child_prefix(&prefix, has_next));
        let last = node.children.len().saturating_sub(1);
        // Reversed so the first child is popped first.
        for (i, child) in node.children.iter().enumerate().rev() {
            pending.push((child, Rc::clone(&next_prefix), i < last));
        }
    }
}

/// Prefix for the children of a node drawn with `prefix`. The branch arm of
/// the parent turns into padding, and its vertical bar survives only while
/// the parent still has siblings below it.
fn child_prefix(prefix: &str, has_next: bool) -> String {
    let Some(indent) = prefix.strip_suffix(BRANCH) else {
        return BRANCH.to_string();
    };
    let mut out = String::with_capacity(prefix.len() + BRANCH.len());
    out.push_str(indent);
    out.push(if has_next { '|' } else { ' ' });
    out.push_str("   ");
    out.push_str(BRANCH);
    out
}

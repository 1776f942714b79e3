//! Batch insertion input: an ordered list of (word, enabled) pairs.

use serde::{Deserialize, Serialize};

/// A single configured word and its policy flag.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct WordEntry {
    pub word: String,
    #[serde(default)]
    pub enabled: bool,
}

impl WordEntry {
    pub fn new(word: impl Into<String>, enabled: bool) -> Self {
        Self {
            word: word.into(),
            enabled,
        }
    }
}

/// Ordered collection of word entries. Insertion follows this order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct WordSet {
    entries: Vec<WordEntry>,
}

impl WordSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<I, W>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (W, bool)>,
        W: Into<String>,
    {
        pairs
            .into_iter()
            .map(|(word, enabled)| WordEntry::new(word, enabled))
            .collect()
    }

    pub fn push(&mut self, word: impl Into<String>, enabled: bool) {
        self.entries.push(WordEntry::new(word, enabled));
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WordEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<WordEntry> for WordSet {
    fn from_iter<T: IntoIterator<Item = WordEntry>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a WordSet {
    type Item = &'a WordEntry;
    type IntoIter = std::slice::Iter<'a, WordEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

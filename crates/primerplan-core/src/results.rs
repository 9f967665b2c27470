use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies one exported pair: 1-based fragment number, 0-based pair index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PairKey {
    pub fragment: usize,
    pub pair: usize,
}

impl PairKey {
    pub fn new(fragment: usize, pair: usize) -> Self {
        Self { fragment, pair }
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "F_{}_P_{}", self.fragment, self.pair)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultEntry {
    pub key: PairKey,
    pub forward: String,
    pub reverse: String,
}

/// Append-only, insertion-ordered primer pairs of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultCollection {
    entries: Vec<ResultEntry>,
}

impl ResultCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pair. A key that is already present is replaced in place.
    pub fn push(&mut self, key: PairKey, forward: impl Into<String>, reverse: impl Into<String>) {
        let entry = ResultEntry {
            key,
            forward: forward.into(),
            reverse: reverse.into(),
        };
        match self.entries.iter_mut().find(|e| e.key == key) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
    }

    pub fn get(&self, key: PairKey) -> Option<&ResultEntry> {
        self.entries.iter().find(|e| e.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResultEntry> {
        self.entries.iter()
    }

    /// Entries belonging to fragment `number`.
    pub fn for_fragment(&self, number: usize) -> impl Iterator<Item = &ResultEntry> {
        self.entries.iter().filter(move |e| e.key.fragment == number)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a ResultCollection {
    type Item = &'a ResultEntry;
    type IntoIter = std::slice::Iter<'a, ResultEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

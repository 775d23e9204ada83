// src/paging/favorites_diff.rs

use std::collections::HashSet;
use std::hash::Hash;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffResult<K> {
    pub added: Vec<K>,
    pub removed: Vec<K>,
}

impl<K> DiffResult<K> {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Added/removed keys between successive favorites snapshots.
///
/// Keeps the previous snapshot between calls; the first call against the
/// empty initial state reports every key as added.
#[derive(Debug, Clone)]
pub struct FavoritesDiff<K> {
    retained: HashSet<K>,
    order: Vec<K>,
}

impl<K: Eq + Hash + Clone> FavoritesDiff<K> {
    pub fn new() -> Self {
        Self {
            retained: HashSet::new(),
            order: Vec::new(),
        }
    }

    /// `added` follows `snapshot` order, `removed` the previous snapshot's.
    pub fn compare(&mut self, snapshot: &[K]) -> DiffResult<K> {
        let mut next = HashSet::with_capacity(snapshot.len());
        let mut order = Vec::with_capacity(snapshot.len());
        let mut added = Vec::new();

        for key in snapshot {
            if !next.insert(key.clone()) {
                continue;
            }
            order.push(key.clone());
            if !self.retained.contains(key) {
                added.push(key.clone());
            }
        }

        let removed = self
            .order
            .iter()
            .filter(|key| !next.contains(*key))
            .cloned()
            .collect();

        self.retained = next;
        self.order = order;

        DiffResult { added, removed }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl<K: Eq + Hash + Clone> Default for FavoritesDiff<K> {
    fn default() -> Self {
        Self::new()
    }
}

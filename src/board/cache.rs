//! Bounded move cache.
//!
//! Keyed by position digest, session digest and legality flag; invalidated
//! wholesale on any mutation. Private to the engine, not a contract.

use super::types::MoveList;

const CACHE_CAPACITY: usize = 64;

#[derive(Debug, Default)]
pub(crate) struct MoveCache {
    // Most recently used last.
    entries: Vec<(u64, MoveList)>,
}

impl MoveCache {
    pub(crate) fn new() -> Self {
        MoveCache {
            entries: Vec::new(),
        }
    }

    pub(crate) fn get(&mut self, key: u64) -> Option<MoveList> {
        let pos = self.entries.iter().position(|(k, _)| *k == key)?;
        let entry = self.entries.remove(pos);
        let list = entry.1.clone();
        self.entries.push(entry);
        Some(list)
    }

    pub(crate) fn put(&mut self, key: u64, moves: MoveList) {
        if let Some(pos) = self.entries.iter().position(|(k, _)| *k == key) {
            self.entries.remove(pos);
        }
        if self.entries.len() >= CACHE_CAPACITY {
            self.entries.remove(0);
        }
        self.entries.push((key, moves));
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

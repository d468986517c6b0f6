//! Successor table of a chord node.
use std::collections::HashSet;
use std::collections::VecDeque;

use serde::Deserialize;
use serde::Serialize;

use crate::dht::Id;
use crate::dht::InternalPointer;
use crate::dht::Pointer;
use crate::error::Error;
use crate::error::Result;

/// An ordered list of successors, primary first.
/// It's necessary to have multiple successors to prevent a single point of failure.
/// When nothing else is known the list is `[base]`. It only becomes empty when every
/// successor failed, which marks the node as dead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessorTable {
    base: InternalPointer,
    limit: usize,
    entries: VecDeque<Pointer>,
}

impl SuccessorTable {
    /// Create a table holding only `base`. A `limit` of zero is raised to one.
    pub fn new(base: InternalPointer, limit: usize) -> Self {
        Self {
            base,
            limit: limit.max(1),
            entries: VecDeque::from([Pointer::Internal(base)]),
        }
    }

    /// Replace the list with `successor` followed by `rest`.
    ///
    /// Duplicates are dropped (first occurrence wins). Entries after the local node are
    /// dropped too, as the list has wrapped around the ring by then.
    pub fn update(&mut self, successor: Pointer, rest: impl IntoIterator<Item = Pointer>) {
        let list = std::iter::once(successor).chain(rest);
        self.entries = self.normalize(list);
        tracing::debug!("successor table updated: {:?}", self.ids());
    }

    /// Put `successor` in front and keep only those existing entries lying after it,
    /// up to and including the local node, in clockwise order.
    pub fn update_trim(&mut self, successor: Pointer) {
        let (start, base) = (successor.id(), self.base.id);
        let mut kept: Vec<Pointer> = self
            .entries
            .iter()
            .filter(|p| p.id().is_within(start, false, base, true))
            .cloned()
            .collect();
        kept.sort_by_key(|p| p.id().bias(start));
        let list = std::iter::once(successor).chain(kept);
        self.entries = self.normalize(list);
        tracing::debug!("successor table trimmed: {:?}", self.ids());
    }

    fn normalize(&self, list: impl Iterator<Item = Pointer>) -> VecDeque<Pointer> {
        let mut seen = HashSet::new();
        let mut entries = VecDeque::new();
        for p in list {
            if entries.len() >= self.limit {
                break;
            }
            if !seen.insert(p.id()) {
                continue;
            }
            if p.id() == self.base.id {
                entries.push_back(Pointer::Internal(self.base));
                break;
            }
            entries.push_back(p);
        }
        entries
    }

    /// Drop the head, which failed, and return it.
    pub fn move_to_next_successor(&mut self) -> Result<Pointer> {
        let dropped = self
            .entries
            .pop_front()
            .ok_or(Error::SuccessorTableExhausted)?;
        tracing::info!("drop successor {}, next: {:?}", dropped, self.get_successor());
        Ok(dropped)
    }

    /// Drop a node that is not the head. Returns whether it was present.
    pub fn remove_behind_head(&mut self, id: Id) -> bool {
        let before = self.entries.len();
        let mut index = 0;
        self.entries.retain(|p| {
            let keep = index == 0 || p.id() != id;
            index += 1;
            keep
        });
        before != self.entries.len()
    }

    /// The current successor, or `None` when exhausted.
    pub fn get_successor(&self) -> Option<&Pointer> {
        self.entries.front()
    }

    /// Check if every successor failed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Count of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Capacity.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// All entries, primary first.
    pub fn dump(&self) -> Vec<Pointer> {
        self.entries.iter().cloned().collect()
    }

    fn ids(&self) -> Vec<u64> {
        self.entries.iter().map(|p| p.id().value()).collect()
    }
}

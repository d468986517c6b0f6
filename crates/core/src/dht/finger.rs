//! Finger table of a chord node.
//!
//! Entry `i` is the shortcut for `base + 2^i`: the first node known at or after that id.
//! Entry `0` is therefore the routing successor. Unset entries hold `base`.

use serde::Deserialize;
use serde::Serialize;

use crate::dht::ExternalPointer;
use crate::dht::Id;
use crate::dht::InternalPointer;
use crate::dht::Pointer;
use crate::error::Error;
use crate::error::Result;

/// Result of [FingerTable::route].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FingerRoute {
    /// The id is the local node itself.
    SelfNode,
    /// The id lies in `(base, successor]`, the successor owns it.
    Found(Pointer),
    /// The furthest known node still preceding the id.
    ClosestPredecessor(Pointer),
}

/// Finger table of Chord DHT.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FingerTable {
    base: InternalPointer,
    entries: Vec<Pointer>,
}

impl FingerTable {
    /// Create a finger table with every entry set to `base`.
    pub fn new(base: InternalPointer) -> Self {
        let size = base.id.bits() as usize;
        Self {
            base,
            entries: vec![Pointer::Internal(base); size],
        }
    }

    /// The owner of this table.
    pub fn base(&self) -> InternalPointer {
        self.base
    }

    /// Number of entries, which is the bit length of the ring.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// A table always has at least one entry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// `base + 2^i`.
    pub fn expected_id(&self, i: usize) -> Result<Id> {
        self.check_index(i)?;
        self.base.id.add_pow2(i as u8)
    }

    /// getter, `base` when the entry was never set.
    pub fn get(&self, i: usize) -> Result<&Pointer> {
        self.check_index(i)?;
        Ok(&self.entries[i])
    }

    /// Entry 0.
    pub fn successor(&self) -> &Pointer {
        &self.entries[0]
    }

    /// All entries, lowest index first.
    pub fn dump(&self) -> Vec<Pointer> {
        self.entries.clone()
    }

    fn check_index(&self, i: usize) -> Result<()> {
        if i >= self.entries.len() {
            return Err(Error::FingerIndexOutOfRange(i, self.entries.len()));
        }
        Ok(())
    }

    /// Record a discovered remote node.
    ///
    /// Entry `i` is replaced when `expected_id(i)` lies in `(entry.id, pointer.id]`, that is when
    /// the new node is a closer successor of `expected_id(i)` than the recorded one, or when the
    /// recorded one does not even reach `expected_id(i)`. With `force_previous`, a recorded entry
    /// is never advanced past: the new node must also lie in `(base, entry.id]`.
    ///
    /// Returns whether any entry changed.
    pub fn put(&mut self, pointer: ExternalPointer, force_previous: bool) -> Result<bool> {
        if pointer.id == self.base.id {
            return Err(Error::PointToSelf);
        }
        self.base.id.ensure_same_ring(&pointer.id)?;

        let base = self.base.id;
        let mut changed = false;
        for i in 0..self.entries.len() {
            let expected = self.expected_id(i)?;
            let current = &self.entries[i];
            let cur_id = current.id();

            if cur_id == pointer.id {
                // Same node, keep the latest address.
                if let Pointer::External(p) = current {
                    if p.address != pointer.address {
                        self.entries[i] = Pointer::External(pointer.clone());
                        changed = true;
                    }
                }
                continue;
            }
            if !expected.is_within(cur_id, false, pointer.id, true) {
                continue;
            }
            if force_previous && cur_id != base && !pointer.id.is_within(base, false, cur_id, true)
            {
                continue;
            }
            tracing::debug!("set finger table index: {} id: {}", i, pointer.id);
            self.entries[i] = Pointer::External(pointer.clone());
            changed = true;
        }
        Ok(changed)
    }

    /// Remove a node. Each entry holding it falls back to the nearest other entry above it,
    /// or to `base` if there is none. Returns the count of entries changed.
    pub fn remove(&mut self, id: Id) -> usize {
        if id == self.base.id {
            return 0;
        }
        self.reset_downward(|entry| entry == id)
    }

    /// Reset entries lying in `(base, id)` to the nearest surviving entry at a higher index,
    /// or `base`. Returns the count of entries changed.
    pub fn clear_before(&mut self, id: Id) -> usize {
        let base = self.base.id;
        self.reset_downward(|entry| entry.is_within(base, false, id, false))
    }

    /// Reset entries lying in `(id, base)` to the nearest surviving entry at a lower index,
    /// or `base`. Returns the count of entries changed.
    pub fn clear_after(&mut self, id: Id) -> usize {
        let base = self.base.id;
        let mut count = 0;
        let mut prev = Pointer::Internal(self.base);
        for entry in self.entries.iter_mut() {
            let eid = entry.id();
            if eid != base && eid.is_within(id, false, base, false) {
                *entry = prev.clone();
                count += 1;
            } else {
                prev = entry.clone();
            }
        }
        count
    }

    fn reset_downward(&mut self, matches: impl Fn(Id) -> bool) -> usize {
        let base = self.base.id;
        let mut count = 0;
        let mut next = Pointer::Internal(self.base);
        for entry in self.entries.iter_mut().rev() {
            let eid = entry.id();
            if eid != base && matches(eid) {
                *entry = next.clone();
                count += 1;
            } else {
                next = entry.clone();
            }
        }
        count
    }

    /// Scan from the highest index down for the first entry in `(base, id)`, else `base`.
    pub fn find_closest_preceding(&self, id: Id) -> Pointer {
        let base = self.base.id;
        self.entries
            .iter()
            .rev()
            .find(|entry| entry.id().is_within(base, false, id, false))
            .cloned()
            .unwrap_or(Pointer::Internal(self.base))
    }

    /// Routing decision for `id`, used to answer lookups.
    pub fn route(&self, id: Id) -> FingerRoute {
        let base = self.base.id;
        if id == base {
            return FingerRoute::SelfNode;
        }
        let successor = self.successor();
        if id.is_within(base, false, successor.id(), true) {
            return FingerRoute::Found(successor.clone());
        }
        FingerRoute::ClosestPredecessor(self.find_closest_preceding(id))
    }
}

//! Per-node chord state.

use crate::dht::ExternalPointer;
use crate::dht::FingerTable;
use crate::dht::Id;
use crate::dht::InternalPointer;
use crate::dht::Pointer;
use crate::dht::SuccessorTable;
use crate::error::Result;

/// Everything a node knows about the ring.
///
/// The finger table's entry 0 and the successor table's head are kept in step:
/// whichever side learns a new successor first propagates it to the other.
#[derive(Debug, Clone)]
pub struct ChordState {
    base: InternalPointer,
    finger_table: FingerTable,
    successor_table: SuccessorTable,
    predecessor: Option<ExternalPointer>,
}

impl ChordState {
    /// A lonely node: every finger and the only successor are the node itself.
    pub fn new(id: Id, successor_table_size: usize) -> Self {
        let base = InternalPointer::new(id);
        Self {
            base,
            finger_table: FingerTable::new(base),
            successor_table: SuccessorTable::new(base, successor_table_size),
            predecessor: None,
        }
    }

    /// Id of the local node.
    pub fn id(&self) -> Id {
        self.base.id
    }

    /// Pointer to the local node.
    pub fn base(&self) -> InternalPointer {
        self.base
    }

    /// getter
    pub fn finger_table(&self) -> &FingerTable {
        &self.finger_table
    }

    /// getter
    pub fn successor_table(&self) -> &SuccessorTable {
        &self.successor_table
    }

    /// getter
    pub fn predecessor(&self) -> Option<&ExternalPointer> {
        self.predecessor.as_ref()
    }

    /// Head of the successor table, `None` once the node is dead.
    pub fn successor(&self) -> Option<&Pointer> {
        self.successor_table.get_successor()
    }

    /// A node is dead when its successor table is exhausted.
    pub fn is_dead(&self) -> bool {
        self.successor_table.is_empty()
    }

    /// Put a discovered node into the finger table. When this changes the routing
    /// successor, the successor table follows.
    pub fn put_finger(&mut self, pointer: ExternalPointer, force_previous: bool) -> Result<bool> {
        let before = self.finger_table.successor().clone();
        let changed = self.finger_table.put(pointer, force_previous)?;
        let after = self.finger_table.successor();
        if changed && after.is_external() && before != *after {
            self.successor_table.update_trim(after.clone());
        }
        Ok(changed)
    }

    /// Adopt `successor` and the list reported after it.
    pub fn set_successor(&mut self, successor: Pointer, rest: Vec<Pointer>) -> Result<()> {
        tracing::info!("node {} set successor {}", self.base.id, successor);
        self.successor_table.update(successor.clone(), rest);
        match successor {
            Pointer::External(p) => {
                self.finger_table.clear_before(p.id);
                self.finger_table.put(p, false)?;
            }
            Pointer::Internal(_) => {
                self.finger_table.clear_after(self.base.id);
            }
        }
        Ok(())
    }

    /// Trim the successor table to the finger table's successor.
    pub fn trim_successors(&mut self) {
        let successor = self.finger_table.successor().clone();
        self.successor_table.update_trim(successor);
    }

    /// Drop the failed successor and fall back to the next one. Returns the dropped pointer.
    pub fn move_to_next_successor(&mut self) -> Result<Pointer> {
        let dropped = self.successor_table.move_to_next_successor()?;
        match self.successor_table.get_successor().cloned() {
            Some(Pointer::External(next)) => {
                self.finger_table.clear_before(next.id);
                self.finger_table.put(next, false)?;
            }
            Some(Pointer::Internal(_)) | None => {
                self.finger_table.clear_after(self.base.id);
            }
        }
        if self.is_dead() {
            tracing::warn!("node {} is dead, successor table exhausted", self.base.id);
        }
        Ok(dropped)
    }

    /// Handle a node claiming to be our predecessor. Returns the resulting predecessor.
    pub fn notify(&mut self, candidate: ExternalPointer) -> Option<&ExternalPointer> {
        let id = self.base.id;
        if candidate.id != id {
            let accept = match &self.predecessor {
                None => true,
                Some(pred) => candidate.id.is_within(pred.id, false, id, false),
            };
            if accept {
                tracing::debug!("node {} accepts predecessor {}", id, candidate.id);
                self.predecessor = Some(candidate);
            }
        }
        self.predecessor.as_ref()
    }

    /// Clear the predecessor if it is still `pointer`. Returns whether it was cleared.
    pub fn clear_predecessor_if(&mut self, pointer: &ExternalPointer) -> bool {
        match &self.predecessor {
            Some(pred) if pred.id == pointer.id && pred.address == pointer.address => {
                tracing::info!("node {} clears predecessor {}", self.base.id, pointer.id);
                self.predecessor = None;
                true
            }
            _ => false,
        }
    }

    /// Forget an unreachable node everywhere.
    pub fn remove_node(&mut self, id: Id) -> Result<()> {
        if id == self.base.id {
            return Ok(());
        }
        self.finger_table.remove(id);
        if self.predecessor.as_ref().map(|p| p.id) == Some(id) {
            self.predecessor = None;
        }
        self.successor_table.remove_behind_head(id);
        if self.successor().map(|p| p.id()) == Some(id) {
            self.move_to_next_successor()?;
        }
        Ok(())
    }
}

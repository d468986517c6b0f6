//! References to ring nodes.

use serde::Deserialize;
use serde::Serialize;

use crate::dht::Id;

/// Opaque network address of a node, understood only by the transport.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Wrap an address.
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    /// Borrow the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Address {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Address {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// The local node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InternalPointer {
    /// Id of the local node.
    pub id: Id,
}

impl InternalPointer {
    /// Create a pointer to the local node.
    pub fn new(id: Id) -> Self {
        Self { id }
    }
}

/// A remote node.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExternalPointer {
    /// Id of the remote node.
    pub id: Id,
    /// Where the remote node listens.
    pub address: Address,
}

impl ExternalPointer {
    /// Create a pointer to a remote node.
    pub fn new(id: Id, address: Address) -> Self {
        Self { id, address }
    }
}

impl PartialEq for ExternalPointer {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ExternalPointer {}

/// A node reference. Equality and ordering only look at the id.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Pointer {
    /// The local node.
    Internal(InternalPointer),
    /// A remote node.
    External(ExternalPointer),
}

impl Pointer {
    /// Id of the referenced node.
    pub fn id(&self) -> Id {
        match self {
            Pointer::Internal(p) => p.id,
            Pointer::External(p) => p.id,
        }
    }

    /// Address of a remote node, `None` for the local node.
    pub fn address(&self) -> Option<&Address> {
        match self {
            Pointer::Internal(_) => None,
            Pointer::External(p) => Some(&p.address),
        }
    }

    /// Check if the pointer refers to a remote node.
    pub fn is_external(&self) -> bool {
        matches!(self, Pointer::External(_))
    }

    /// Resolve an `(id, address)` pair reported by the node at `responder`.
    ///
    /// A missing address stands for the responder itself. An id equal to `self_id`
    /// is the local node, whatever address was reported for it.
    pub fn resolve(self_id: Id, id: Id, address: Option<Address>, responder: &Address) -> Self {
        if id == self_id {
            return Pointer::Internal(InternalPointer::new(id));
        }
        Pointer::External(ExternalPointer::new(
            id,
            address.unwrap_or_else(|| responder.clone()),
        ))
    }

    /// Encode as the `(id, address)` pair carried in responses. The local node has no address.
    pub fn to_entry(&self) -> (Id, Option<Address>) {
        (self.id(), self.address().cloned())
    }
}

impl From<InternalPointer> for Pointer {
    fn from(p: InternalPointer) -> Self {
        Pointer::Internal(p)
    }
}

impl From<ExternalPointer> for Pointer {
    fn from(p: ExternalPointer) -> Self {
        Pointer::External(p)
    }
}

impl PartialEq for Pointer {
    fn eq(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}

impl Eq for Pointer {}

impl PartialOrd for Pointer {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pointer {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id().cmp(&other.id())
    }
}

impl std::hash::Hash for Pointer {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id().hash(state)
    }
}

impl std::fmt::Display for Pointer {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Pointer::Internal(p) => write!(f, "{}(self)", p.id),
            Pointer::External(p) => write!(f, "{}@{}", p.id, p.address),
        }
    }
}

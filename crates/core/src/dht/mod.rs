#![warn(missing_docs)]
//! Implementation of the chord ring,
//! ref: <https://pdos.csail.mit.edu/papers/ton:chord/paper-ton.pdf>
//! With high probability, the number of nodes that must be contacted to find a successor in an N-node network is O(log N).

/// Finger table of a node
pub mod finger;
pub mod id;
pub mod pointer;
pub mod state;
pub mod successor;

pub use finger::FingerRoute;
pub use finger::FingerTable;
pub use id::BiasId;
pub use id::Id;
pub use id::SortRing;
pub use pointer::Address;
pub use pointer::ExternalPointer;
pub use pointer::InternalPointer;
pub use pointer::Pointer;
pub use state::ChordState;
pub use successor::SuccessorTable;

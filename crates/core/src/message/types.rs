#![warn(missing_docs)]
//! This module defines the messages exchanged between chord nodes.
//! Every request has exactly one matching response. Pointers travel as an id plus an
//! optional address, where a missing address stands for the responding node itself.

use serde::Deserialize;
use serde::Serialize;

use crate::dht::Address;
use crate::dht::Id;

/// Ask a node for its id.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct GetId;

/// Response of [GetId].
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct GetIdResponse {
    /// id of the responder
    pub id: Id,
}

/// Ask a node for its predecessor.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct GetPredecessor;

/// Response of [GetPredecessor], both fields are `None` when no predecessor is recorded.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct GetPredecessorResponse {
    /// id of the predecessor
    pub id: Option<Id>,
    /// address of the predecessor
    pub address: Option<Address>,
}

/// Ask a node for its successor list.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct GetSuccessor;

/// Response of [GetSuccessor].
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct GetSuccessorResponse {
    /// successor list of the responder, primary first
    pub entries: Vec<(Id, Option<Address>)>,
}

/// Ask a node for the closest node it knows preceding `id`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct GetClosestPrecedingFinger {
    /// target of the search
    pub id: Id,
}

/// Response of [GetClosestPrecedingFinger].
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct GetClosestPrecedingFingerResponse {
    /// id of the reported node
    pub id: Id,
    /// address of the reported node
    pub address: Option<Address>,
}

/// Ask a node for the successor of `id`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct FindSuccessor {
    /// target of the search
    pub id: Id,
}

/// Response of [FindSuccessor].
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct FindSuccessorResponse {
    /// id of the reported node
    pub id: Id,
    /// address of the reported node
    pub address: Option<Address>,
}

/// Propose the sender, with id `id`, as predecessor of the receiver.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Notify {
    /// id of the sender
    pub id: Id,
}

/// Response of [Notify]: the predecessor of the receiver after handling it.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct NotifyResponse {
    /// id of the predecessor
    pub id: Option<Id>,
    /// address of the predecessor
    pub address: Option<Address>,
}

/// Ask the receiver to consider the sender, with id `router_id`, for its finger `index`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct UpdateFingerTable {
    /// id of the sender
    pub router_id: Id,
    /// finger index that should point to the sender
    pub index: u8,
}

/// Response of [UpdateFingerTable].
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct UpdateFingerTableResponse;

/// A request to a chord node.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Request {
    /// see [GetId]
    GetId(GetId),
    /// see [GetPredecessor]
    GetPredecessor(GetPredecessor),
    /// see [GetSuccessor]
    GetSuccessor(GetSuccessor),
    /// see [GetClosestPrecedingFinger]
    GetClosestPrecedingFinger(GetClosestPrecedingFinger),
    /// see [FindSuccessor]
    FindSuccessor(FindSuccessor),
    /// see [Notify]
    Notify(Notify),
    /// see [UpdateFingerTable]
    UpdateFingerTable(UpdateFingerTable),
}

/// The answer of a chord node, one variant per [Request] variant.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Response {
    /// see [GetIdResponse]
    GetId(GetIdResponse),
    /// see [GetPredecessorResponse]
    GetPredecessor(GetPredecessorResponse),
    /// see [GetSuccessorResponse]
    GetSuccessor(GetSuccessorResponse),
    /// see [GetClosestPrecedingFingerResponse]
    GetClosestPrecedingFinger(GetClosestPrecedingFingerResponse),
    /// see [FindSuccessorResponse]
    FindSuccessor(FindSuccessorResponse),
    /// see [NotifyResponse]
    Notify(NotifyResponse),
    /// see [UpdateFingerTableResponse]
    UpdateFingerTable(UpdateFingerTableResponse),
}

impl std::fmt::Display for Request {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

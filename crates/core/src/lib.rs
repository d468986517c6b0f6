//! ringchord-core
//! ===============
//!
//! Structured overlay of ringchord nodes, following the Chord design.
//!
//! Every node owns a [ChordState](dht::ChordState): a finger table of `m` routing shortcuts,
//! a short successor list and a predecessor link. Nodes talk to each other only through
//! the request/response [transport](ringchord_transport) and the messages defined in [message].
//! The [protocol] module contains the tasks keeping the ring consistent while nodes join,
//! leave or fail.
#![warn(missing_docs)]

pub mod config;
pub mod consts;
pub mod dht;
pub mod error;
pub mod inspect;
pub mod message;
pub mod protocol;
pub mod rpc;

#[cfg(test)]
mod tests;

pub use ringchord_transport as transport;

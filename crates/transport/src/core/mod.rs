//! The main concepts of this mod are:
//!
//! The [TransportInterface](transport::TransportInterface) trait should be
//! implemented by every way of moving requests between nodes. It registers
//! endpoints and delivers a request to a remote endpoint, returning exactly one
//! result per request. See the [transport] module.
//!
//! The [TransportCallback](callback::TransportCallback) trait is used to let user
//! answer the requests arriving at an endpoint. See the [callback] module.

pub mod callback;
pub mod transport;

//! This module defines the [TransportInterface] trait and the envelope moved
//! between endpoints.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Deserialize;
use serde::Serialize;

use crate::core::callback::BoxedTransportCallback;
use crate::error::Result;

/// The envelope carried between two endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransportMessage {
    /// A request from the endpoint `from`.
    Request {
        /// Address of the requesting endpoint.
        from: String,
        /// Opaque request body.
        payload: Bytes,
    },
    /// The answer to a request.
    Response(Bytes),
}

/// A shared handle to a transport implementation.
pub type SharedTransport = Arc<dyn TransportInterface>;

/// This trait specifies how a node registers its endpoint and how it sends a
/// request to another endpoint.
#[async_trait]
pub trait TransportInterface: Send + Sync {
    /// Register `callback` to answer requests addressed to `address`.
    async fn listen(&self, address: &str, callback: BoxedTransportCallback) -> Result<()>;

    /// Unregister the endpoint of `address`. Later requests to it fail.
    async fn close(&self, address: &str) -> Result<()>;

    /// Send `payload` from `from` to `to`, waiting at most `timeout` for the
    /// answer. Exactly one result is returned per call.
    async fn request(&self, from: &str, to: &str, payload: Bytes, timeout: Duration)
        -> Result<Bytes>;

    /// Addresses of all registered endpoints.
    fn addresses(&self) -> Vec<String>;
}

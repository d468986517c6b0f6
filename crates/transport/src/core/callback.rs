//! This module defines the [TransportCallback] trait.

use async_trait::async_trait;
use bytes::Bytes;

/// The error type returned by a callback. It is reported back to the
/// requester as [Error::Callback](crate::error::Error::Callback).
pub type CallbackError = Box<dyn std::error::Error + Send + Sync>;

/// A boxed [TransportCallback] that can be registered on an endpoint.
pub type BoxedTransportCallback = Box<dyn TransportCallback>;

/// Any object that implements this trait can be registered on an endpoint
/// by [TransportInterface::listen](super::transport::TransportInterface::listen).
#[async_trait]
pub trait TransportCallback: Send + Sync {
    /// This method is invoked for every request arriving at the endpoint.
    /// `from` is the address of the requesting endpoint. The returned bytes are
    /// delivered to the requester as the response.
    async fn on_request(&self, from: &str, payload: &Bytes) -> Result<Bytes, CallbackError>;
}

//! This module contains the [InnerTransportCallback] struct.

use bytes::Bytes;

use crate::core::callback::BoxedTransportCallback;
use crate::core::transport::TransportMessage;
use crate::error::Error;
use crate::error::Result;

/// [InnerTransportCallback] wraps the [BoxedTransportCallback] with inner handling for a specific endpoint.
pub struct InnerTransportCallback {
    /// The address of the endpoint to which the current callback is assigned.
    pub address: String,
    callback: BoxedTransportCallback,
}

impl InnerTransportCallback {
    /// Create a new [InnerTransportCallback].
    pub fn new(address: &str, callback: BoxedTransportCallback) -> Self {
        Self {
            address: address.to_string(),
            callback,
        }
    }

    /// This method is invoked on an encoded [TransportMessage] arriving at the endpoint.
    /// It returns the encoded response envelope.
    pub async fn on_message(&self, msg: &Bytes) -> Result<Bytes> {
        let msg: TransportMessage = bincode::deserialize(msg).map_err(|e| {
            tracing::error!("Deserialize TransportMessage failed: {e:?}");
            e
        })?;
        let response = self.handle_message(msg).await?;
        Ok(bincode::serialize(&response).map(Bytes::from)?)
    }

    async fn handle_message(&self, msg: TransportMessage) -> Result<TransportMessage> {
        match msg {
            TransportMessage::Request { from, payload } => self
                .callback
                .on_request(&from, &payload)
                .await
                .map(TransportMessage::Response)
                .map_err(|e| {
                    tracing::error!("Callback on_request of {} failed: {e:?}", self.address);
                    Error::Callback(self.address.clone(), e.to_string())
                }),
            TransportMessage::Response(_) => Err(Error::UnexpectedMessage(self.address.clone())),
        }
    }
}

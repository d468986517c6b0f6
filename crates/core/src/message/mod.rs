//! Messages of the chord protocol and their encoding.
//!
//! Messages are carried over the transport as bincode bytes, so the transport never needs
//! to know their types.
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

pub mod types;
pub use types::*;

/// Encode a message into bytes for the transport.
pub fn encode<T: Serialize>(msg: &T) -> Result<Bytes> {
    Ok(bincode::serialize(msg).map(Bytes::from)?)
}

/// Decode a message received from the transport.
pub fn decode<T: DeserializeOwned>(data: &[u8]) -> Result<T> {
    bincode::deserialize(data).map_err(|e| {
        tracing::error!("Decode message failed: {e:?}");
        e.into()
    })
}

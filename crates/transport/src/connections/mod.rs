//! Implementations of [TransportInterface](crate::core::transport::TransportInterface).
//! Provide a `MemoryTransport` for testing and local simulation.

#[cfg(feature = "memory")]
mod memory;

#[cfg(feature = "memory")]
pub use crate::connections::memory::MemoryTransport;

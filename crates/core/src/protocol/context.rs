//! The handle every chord task runs with.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use ringchord_transport::core::transport::SharedTransport;
use tokio_util::sync::CancellationToken;

use crate::config::ChordConfig;
use crate::dht::Address;
use crate::dht::ChordState;
use crate::dht::Id;
use crate::dht::InternalPointer;
use crate::error::Error;
use crate::error::Result;
use crate::inspect::ChordInspect;
use crate::rpc::ChordRpc;

/// Bundles the state of one node with what its tasks need to reach other nodes.
///
/// Cloning is cheap and every clone shares the same state and shutdown signal.
/// The state lock is only ever taken between two suspension points; no guard is held
/// across an `.await`.
#[derive(Clone)]
pub struct ChordContext {
    /// State of the node.
    pub state: Arc<Mutex<ChordState>>,
    /// Id of the node.
    pub self_id: Id,
    /// Node to join through, `None` for the first node of a ring.
    pub bootstrap: Option<Address>,
    /// Request client, bound to the node address.
    pub rpc: ChordRpc,
    /// Tunables.
    pub config: ChordConfig,
    /// Cancelled when the node leaves.
    pub shutdown: CancellationToken,
}

impl ChordContext {
    /// Create the context of a lonely node listening on `address`.
    pub fn new(
        self_id: Id,
        address: Address,
        transport: SharedTransport,
        config: ChordConfig,
    ) -> Result<Self> {
        if self_id.bits() != config.bits {
            return Err(Error::BitLengthMismatch(config.bits, self_id.bits()));
        }
        let state = ChordState::new(self_id, config.successor_table_size);
        Ok(Self {
            state: Arc::new(Mutex::new(state)),
            self_id,
            bootstrap: None,
            rpc: ChordRpc::new(transport, address, config.request_timeout()),
            config,
            shutdown: CancellationToken::new(),
        })
    }

    /// Join the ring through `bootstrap`.
    pub fn with_bootstrap(mut self, bootstrap: Address) -> Self {
        self.bootstrap = Some(bootstrap);
        self
    }

    /// Address of the node.
    pub fn address(&self) -> &Address {
        self.rpc.address()
    }

    /// Pointer to the node itself.
    pub fn base(&self) -> InternalPointer {
        InternalPointer::new(self.self_id)
    }

    /// Lock and return MutexGuard of the chord state.
    pub fn lock_state(&self) -> Result<MutexGuard<ChordState>> {
        self.state.lock().map_err(|_| Error::StateLock)
    }

    /// Check if the node has run out of successors.
    pub fn is_dead(&self) -> Result<bool> {
        Ok(self.lock_state()?.is_dead())
    }

    /// Check if the node has left.
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    /// Snapshot of the state, for diagnostics.
    pub fn inspect(&self) -> Result<ChordInspect> {
        let state = self.lock_state()?;
        Ok(ChordInspect::inspect(&state, self.address()))
    }
}

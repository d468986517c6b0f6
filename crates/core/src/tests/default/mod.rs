use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use ringchord_transport::connections::MemoryTransport;
use ringchord_transport::core::callback::BoxedTransportCallback;
use ringchord_transport::core::transport::SharedTransport;
use ringchord_transport::core::transport::TransportInterface;

use crate::config::ChordConfig;
use crate::dht::Address;
use crate::dht::ExternalPointer;
use crate::dht::Id;
use crate::message::decode;
use crate::message::Request;
use crate::protocol::fix_finger_table;
use crate::protocol::stabilize;
use crate::protocol::start_join;
use crate::protocol::start_responder;
use crate::protocol::ChordContext;

mod test_check_predecessor;
mod test_departure;
mod test_join;
mod test_maintainer;
mod test_route;
mod test_stabilization;

pub fn id(v: u64, bits: u8) -> Id {
    Id::new(v, bits).unwrap()
}

pub fn addr(v: u64) -> Address {
    format!("node-{v}").into()
}

pub fn ext(v: u64, bits: u8) -> ExternalPointer {
    ExternalPointer::new(id(v, bits), addr(v))
}

pub fn config(bits: u8) -> ChordConfig {
    ChordConfig::default()
        .bits(bits)
        .request_timeout_ms(200)
        .stabilize_interval_ms(20)
        .fix_finger_interval_ms(30)
        .check_predecessor_interval_ms(30)
}

/// A node listening on `node-{v}`.
pub async fn prepare_node(transport: SharedTransport, v: u64, bits: u8) -> ChordContext {
    let ctx = ChordContext::new(id(v, bits), addr(v), transport, config(bits)).unwrap();
    start_responder(&ctx).await.unwrap();
    ctx
}

pub fn put(ctx: &ChordContext, v: u64) {
    let bits = ctx.self_id.bits();
    ctx.lock_state().unwrap().put_finger(ext(v, bits), false).unwrap();
}

pub fn finger_ids(ctx: &ChordContext) -> Vec<u64> {
    let state = ctx.lock_state().unwrap();
    state
        .finger_table()
        .dump()
        .iter()
        .map(|p| p.id().value())
        .collect()
}

pub fn successor_ids(ctx: &ChordContext) -> Vec<u64> {
    let state = ctx.lock_state().unwrap();
    state
        .successor_table()
        .dump()
        .iter()
        .map(|p| p.id().value())
        .collect()
}

pub fn successor_id(ctx: &ChordContext) -> Option<u64> {
    let state = ctx.lock_state().unwrap();
    state.successor().map(|p| p.id().value())
}

pub fn predecessor_id(ctx: &ChordContext) -> Option<u64> {
    let state = ctx.lock_state().unwrap();
    state.predecessor().map(|p| p.id.value())
}

/// Run stabilize on every node, in order, `rounds` times.
pub async fn stabilize_all(nodes: &[ChordContext], rounds: usize) {
    for _ in 0..rounds {
        for node in nodes {
            stabilize(node).await.unwrap();
        }
    }
}

/// Run fix finger table on every node, in order, `rounds` times.
pub async fn fix_all(nodes: &[ChordContext], rounds: usize) {
    for _ in 0..rounds {
        for node in nodes {
            let report = fix_finger_table(node).await.unwrap();
            assert_eq!(report.failed, 0);
        }
    }
}

/// Nodes joining one by one through the first of `values`, stabilized after every join.
pub async fn build_ring(transport: SharedTransport, values: &[u64], bits: u8) -> Vec<ChordContext> {
    let mut nodes: Vec<ChordContext> = vec![];
    for &v in values {
        let mut node = prepare_node(transport.clone(), v, bits).await;
        if let Some(first) = nodes.first() {
            node = node.with_bootstrap(first.address().clone());
        }
        start_join(&node).await.unwrap();
        nodes.push(node);
        stabilize_all(&nodes, 3).await;
    }
    nodes
}

/// First member of `ring` at or after `x`, walking clockwise.
pub fn true_successor(ring: &[u64], x: u64, bits: u8) -> u64 {
    let size = 1u64 << bits;
    (0..size)
        .map(|d| (x + d) % size)
        .find(|v| ring.contains(v))
        .unwrap()
}

/// Memory transport that counts the `Notify` requests passing through.
#[derive(Default)]
pub struct RecordingTransport {
    inner: MemoryTransport,
    notifies: AtomicUsize,
}

impl RecordingTransport {
    pub fn notifies(&self) -> usize {
        self.notifies.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransportInterface for RecordingTransport {
    async fn listen(
        &self,
        address: &str,
        callback: BoxedTransportCallback,
    ) -> ringchord_transport::error::Result<()> {
        self.inner.listen(address, callback).await
    }

    async fn close(&self, address: &str) -> ringchord_transport::error::Result<()> {
        self.inner.close(address).await
    }

    async fn request(
        &self,
        from: &str,
        to: &str,
        payload: Bytes,
        timeout: Duration,
    ) -> ringchord_transport::error::Result<Bytes> {
        if let Ok(Request::Notify(_)) = decode::<Request>(&payload) {
            self.notifies.fetch_add(1, Ordering::SeqCst);
        }
        self.inner.request(from, to, payload, timeout).await
    }

    fn addresses(&self) -> Vec<String> {
        self.inner.addresses()
    }
}

pub fn memory_transport() -> SharedTransport {
    Arc::new(MemoryTransport::new())
}

//! A ring of simulated nodes sharing one in-memory transport.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use ringchord_core::dht::Id;
use ringchord_core::dht::SortRing;
use ringchord_core::inspect::ChordInspect;
use ringchord_core::protocol::leave;
use ringchord_core::protocol::start_check_predecessor;
use ringchord_core::protocol::start_fix_finger_table;
use ringchord_core::protocol::start_join;
use ringchord_core::protocol::start_responder;
use ringchord_core::protocol::start_stabilize;
use ringchord_core::protocol::ChordContext;
use ringchord_transport::connections::MemoryTransport;
use ringchord_transport::core::transport::SharedTransport;
use tokio::task::JoinHandle;

use crate::config::Config;
use crate::error::Error;
use crate::error::Result;

/// Ids of the simulated nodes: `seed_ids` when given, otherwise `nodes` ids spread evenly
/// over the ring.
pub fn node_ids(config: &Config) -> Result<Vec<Id>> {
    let bits = config.chord.bits;
    let values: Vec<u64> = if config.seed_ids.is_empty() {
        let size = 1u128 << bits;
        if config.nodes as u128 > size {
            return Err(Error::TooManyNodes(bits, config.nodes));
        }
        (0..config.nodes as u128)
            .map(|i| (i * size / config.nodes as u128) as u64)
            .collect()
    } else {
        let mut seen = BTreeSet::new();
        for &v in &config.seed_ids {
            if !seen.insert(v) {
                return Err(Error::DuplicatedSeedId(v));
            }
        }
        config.seed_ids.clone()
    };
    values
        .into_iter()
        .map(|v| Id::new(v, bits).map_err(Error::from))
        .collect()
}

/// Running ring.
pub struct Simulation {
    nodes: Vec<ChordContext>,
    tasks: Vec<JoinHandle<()>>,
}

impl Simulation {
    /// Start every node: the first one creates the ring, the others join through it one by
    /// one. Each node runs its three maintenance loops.
    pub async fn start(config: &Config) -> Result<Self> {
        let transport = match config.transport_delay_ms {
            Some((min, max)) => MemoryTransport::new().with_random_delay(min, max),
            None => MemoryTransport::new(),
        };
        let transport: SharedTransport = Arc::new(transport);

        let mut nodes: Vec<ChordContext> = vec![];
        let mut tasks = vec![];
        for id in node_ids(config)? {
            let address = format!("sim-{}", id).into();
            let mut ctx = ChordContext::new(id, address, transport.clone(), config.chord.clone())?;
            if let Some(first) = nodes.first() {
                ctx = ctx.with_bootstrap(first.address().clone());
            }
            start_responder(&ctx).await?;
            start_join(&ctx)
                .await
                .map_err(|e| Error::JoinError(id.value(), e))?;

            tasks.push(tokio::spawn(start_stabilize(ctx.clone())));
            tasks.push(tokio::spawn(start_fix_finger_table(ctx.clone())));
            tasks.push(tokio::spawn(start_check_predecessor(ctx.clone())));
            nodes.push(ctx);
        }
        tracing::info!("simulation started with {} nodes", nodes.len());
        Ok(Self { nodes, tasks })
    }

    /// The running nodes, in joining order.
    pub fn nodes(&self) -> &[ChordContext] {
        &self.nodes
    }

    /// Snapshot every node.
    pub fn inspect(&self) -> Result<Vec<ChordInspect>> {
        self.nodes
            .iter()
            .map(|n| n.inspect().map_err(Error::from))
            .collect()
    }

    /// Check if every node's successor is the next node clockwise and its predecessor the
    /// previous one.
    pub fn is_consistent(&self) -> Result<bool> {
        let mut ring: Vec<Id> = self.nodes.iter().map(|n| n.self_id).collect();
        let Some(&start) = ring.first() else {
            return Ok(true);
        };
        ring.sort(start);
        let n = ring.len();
        for (i, id) in ring.iter().enumerate() {
            let Some(node) = self.nodes.iter().find(|n| n.self_id == *id) else {
                return Ok(false);
            };
            let snapshot = node.inspect()?;
            let successor = ring[(i + 1) % n].value();
            let expected_predecessor = (n > 1).then(|| ring[(i + n - 1) % n].to_string());
            if snapshot.successor_ids().first() != Some(&successor)
                || snapshot.predecessor != expected_predecessor
            {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Wait for `duration`, or until the ring is consistent when `until_consistent` is set.
    pub async fn run(&self, duration: Duration, until_consistent: bool) -> Result<bool> {
        let step = self
            .nodes
            .first()
            .map(|n| n.config.stabilize_interval())
            .unwrap_or(Duration::from_millis(100));
        let deadline = tokio::time::Instant::now() + duration;
        loop {
            if until_consistent && self.is_consistent()? {
                return Ok(true);
            }
            if tokio::time::Instant::now() >= deadline {
                return self.is_consistent();
            }
            tokio::time::sleep(step).await;
        }
    }

    /// Make every node leave and wait for their maintenance loops.
    pub async fn shutdown(self) -> Result<()> {
        for node in &self.nodes {
            leave(node).await?;
        }
        for res in join_all(self.tasks).await {
            if let Err(e) = res {
                tracing::error!("maintenance task failed: {}", e);
            }
        }
        Ok(())
    }
}

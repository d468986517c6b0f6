//! Periodic drivers of the maintenance protocols.

use std::time::Duration;

use futures::future::FutureExt;
use futures::pin_mut;
use futures::select;
use futures_timer::Delay;

use crate::error::Result;
use crate::protocol::check_predecessor::check_predecessor;
use crate::protocol::fix_finger::fix_finger_table;
use crate::protocol::stabilize::stabilize;
use crate::protocol::ChordContext;

/// A maintenance protocol run by the maintainer loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaintenanceTask {
    /// see [stabilize]
    Stabilize,
    /// see [fix_finger_table]
    FixFingerTable,
    /// see [check_predecessor]
    CheckPredecessor,
}

impl std::fmt::Display for MaintenanceTask {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            MaintenanceTask::Stabilize => write!(f, "stabilize"),
            MaintenanceTask::FixFingerTable => write!(f, "fix finger table"),
            MaintenanceTask::CheckPredecessor => write!(f, "check predecessor"),
        }
    }
}

impl MaintenanceTask {
    /// Period between two runs.
    pub fn interval(&self, ctx: &ChordContext) -> Duration {
        match self {
            MaintenanceTask::Stabilize => ctx.config.stabilize_interval(),
            MaintenanceTask::FixFingerTable => ctx.config.fix_finger_interval(),
            MaintenanceTask::CheckPredecessor => ctx.config.check_predecessor_interval(),
        }
    }

    /// Run the task once.
    pub async fn run_once(&self, ctx: &ChordContext) -> Result<()> {
        match self {
            MaintenanceTask::Stabilize => stabilize(ctx).await,
            MaintenanceTask::FixFingerTable => fix_finger_table(ctx).await.map(|_| ()),
            MaintenanceTask::CheckPredecessor => check_predecessor(ctx).await.map(|_| ()),
        }
    }

    /// Run the task in a loop until the node leaves or dies. A failed cycle is logged and
    /// retried at the next one.
    pub async fn wait(self, ctx: ChordContext) {
        let interval = self.interval(&ctx);
        loop {
            if ctx.is_shutdown() {
                break;
            }
            match ctx.is_dead() {
                Ok(false) => {}
                Ok(true) => {
                    tracing::warn!("node {} is dead, stop {}", ctx.self_id, self);
                    break;
                }
                Err(e) => {
                    tracing::error!("node {} stop {}: {:?}", ctx.self_id, self, e);
                    break;
                }
            }

            self.run_once(&ctx)
                .await
                .unwrap_or_else(|e| tracing::error!("failed to {} {:?}", self, e));

            let timeout = Delay::new(interval).fuse();
            let cancelled = ctx.shutdown.cancelled().fuse();
            pin_mut!(timeout, cancelled);
            select! {
                _ = timeout => {},
                _ = cancelled => break,
            }
        }
        tracing::debug!("node {} {} loop exits", ctx.self_id, self);
    }
}

/// Run stabilize periodically.
pub async fn start_stabilize(ctx: ChordContext) {
    MaintenanceTask::Stabilize.wait(ctx).await
}

/// Run fix finger table periodically.
pub async fn start_fix_finger_table(ctx: ChordContext) {
    MaintenanceTask::FixFingerTable.wait(ctx).await
}

/// Run check predecessor periodically.
pub async fn start_check_predecessor(ctx: ChordContext) {
    MaintenanceTask::CheckPredecessor.wait(ctx).await
}

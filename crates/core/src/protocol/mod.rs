//! Chord protocols.
//!
//! Every protocol is an async function over a [ChordContext]. A request to another node is a
//! suspension point; between two of them a task holds the state lock and nothing else runs on
//! that state, so tasks of the same node only interleave at requests.

pub mod check_predecessor;
pub mod context;
pub mod fix_finger;
pub mod join;
pub mod maintainer;
pub mod responder;
pub mod route;
pub mod stabilize;
pub mod update_others;

pub use check_predecessor::check_predecessor;
pub use context::ChordContext;
pub use fix_finger::fix_finger_table;
pub use fix_finger::FixFingerReport;
pub use join::join;
pub use maintainer::start_check_predecessor;
pub use maintainer::start_fix_finger_table;
pub use maintainer::start_stabilize;
pub use maintainer::MaintenanceTask;
pub use responder::ChordResponder;
pub use route::route_to_predecessor;
pub use route::route_to_successor;
pub use route::RouteOutcome;
pub use stabilize::stabilize;
pub use update_others::update_others;

use crate::error::Result;

/// Register the responder of the node on its address.
pub async fn start_responder(ctx: &ChordContext) -> Result<()> {
    let callback = Box::new(ChordResponder::new(ctx.clone()));
    ctx.rpc.transport().listen(ctx.address().as_str(), callback).await?;
    tracing::info!("node {} listening on {}", ctx.self_id, ctx.address());
    Ok(())
}

/// Join the ring, then tell the nodes which should now point at this one.
pub async fn start_join(ctx: &ChordContext) -> Result<()> {
    join(ctx).await?;
    if ctx.bootstrap.is_some() {
        let updated = update_others(ctx).await?;
        tracing::debug!("node {} updated {} other nodes", ctx.self_id, updated);
    }
    Ok(())
}

/// Stop every maintenance loop of the node and close its endpoint.
pub async fn leave(ctx: &ChordContext) -> Result<()> {
    ctx.shutdown.cancel();
    ctx.rpc.transport().close(ctx.address().as_str()).await?;
    tracing::info!("node {} left", ctx.self_id);
    Ok(())
}

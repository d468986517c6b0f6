//! Join a ring through a bootstrap node.

use crate::dht::Address;
use crate::dht::ExternalPointer;
use crate::dht::Pointer;
use crate::error::Error;
use crate::error::Result;
use crate::protocol::route::route_to_successor;
use crate::protocol::ChordContext;

/// Fill the finger table by routing every finger target through the bootstrap node.
///
/// Without a bootstrap the node is the first member of its ring and its state stays as is.
pub async fn join(ctx: &ChordContext) -> Result<()> {
    let Some(bootstrap) = ctx.bootstrap.clone() else {
        tracing::info!("node {} starts a new ring", ctx.self_id);
        return Ok(());
    };
    join_via(ctx, &bootstrap).await.map_err(|e| match e {
        Error::BootstrapIsSelf => e,
        e => Error::JoinFailed(format!("via {}: {}", bootstrap, e)),
    })
}

async fn join_via(ctx: &ChordContext, bootstrap: &Address) -> Result<()> {
    let bootstrap_id = ctx.rpc.get_id(bootstrap).await?;
    ctx.self_id.ensure_same_ring(&bootstrap_id)?;
    if bootstrap_id == ctx.self_id {
        return Err(Error::BootstrapIsSelf);
    }
    let start = Pointer::External(ExternalPointer::new(bootstrap_id, bootstrap.clone()));

    for i in 0..ctx.self_id.bits() {
        let expected = ctx.self_id.add_pow2(i)?;
        match route_to_successor(ctx, start.clone(), expected).await {
            Ok(outcome) => {
                if let Pointer::External(p) = outcome.pointer {
                    tracing::debug!("JOIN finger {} of {} is {}", i, ctx.self_id, p.id);
                    ctx.lock_state()?.put_finger(p, false)?;
                }
            }
            Err(Error::RouteFailedSelf) => {
                tracing::debug!("JOIN finger {} of {} is the node itself", i, ctx.self_id);
            }
            Err(e) => return Err(e),
        }
    }

    let mut state = ctx.lock_state()?;
    state.trim_successors();
    tracing::info!(
        "node {} joined via {}, successor {}",
        ctx.self_id,
        bootstrap_id,
        state.finger_table().successor()
    );
    Ok(())
}

//! Stabilize: check that the successor's predecessor is still the local node.

use crate::dht::Address;
use crate::dht::ExternalPointer;
use crate::dht::Id;
use crate::dht::Pointer;
use crate::error::Error;
use crate::error::Result;
use crate::protocol::ChordContext;

/// Run one stabilize cycle.
///
/// Asks the successor for its predecessor `x`. When `x` lies strictly between the local node
/// and the successor, `x` becomes the new successor. The chosen successor is notified,
/// unless it already records the local node as predecessor, and the successor list is
/// refreshed from it. Requests are sent before any state is changed.
pub async fn stabilize(ctx: &ChordContext) -> Result<()> {
    let successor = {
        let state = ctx.lock_state()?;
        state.successor().cloned().ok_or(Error::NodeDead)?
    };

    match successor {
        Pointer::Internal(_) => {
            // Alone on the ring: whoever notified us is our successor too.
            let mut state = ctx.lock_state()?;
            if let Some(pred) = state.predecessor().cloned() {
                tracing::info!("STABILIZATION {} leaves solitude for {}", ctx.self_id, pred.id);
                let rest = vec![Pointer::Internal(ctx.base())];
                state.set_successor(Pointer::External(pred), rest)?;
            }
            Ok(())
        }
        Pointer::External(successor) => stabilize_with(ctx, successor).await,
    }
}

async fn stabilize_with(ctx: &ChordContext, successor: ExternalPointer) -> Result<()> {
    let reported = match ctx.rpc.get_predecessor(&successor.address).await {
        Ok(reported) => reported
            .map(|(id, address)| Pointer::resolve(ctx.self_id, id, address, &successor.address)),
        Err(e) => return Err(drop_successor(ctx, &successor, e)),
    };

    let (target, notify) = match reported {
        Some(Pointer::External(x)) if x.id.is_within(ctx.self_id, false, successor.id, false) => {
            tracing::debug!("STABILIZATION {} found closer successor {}", ctx.self_id, x.id);
            (x, true)
        }
        Some(Pointer::Internal(_)) => (successor.clone(), false),
        _ => (successor.clone(), true),
    };
    let is_current = target.id == successor.id;

    let refreshed = refresh(ctx, &target, notify).await;
    let rest = match refreshed {
        Ok(rest) => rest,
        Err(e) if is_current => return Err(drop_successor(ctx, &successor, e)),
        Err(e) => {
            return Err(Error::StabilizeFailed(format!(
                "candidate {} unreachable: {}",
                target.id, e
            )))
        }
    };

    let mut state = ctx.lock_state()?;
    state.set_successor(Pointer::External(target), rest)?;
    Ok(())
}

/// Notify `target` if asked to, then fetch its successor list.
async fn refresh(ctx: &ChordContext, target: &ExternalPointer, notify: bool) -> Result<Vec<Pointer>> {
    if notify {
        let pred = ctx.rpc.notify(&target.address, ctx.self_id).await?;
        tracing::debug!(
            "STABILIZATION notified {}, its predecessor is now {:?}",
            target.id,
            pred.map(|(id, _)| id.value())
        );
    }
    let entries = ctx.rpc.get_successor(&target.address).await?;
    Ok(to_pointers(ctx.self_id, entries, &target.address))
}

fn to_pointers(self_id: Id, entries: Vec<(Id, Option<Address>)>, responder: &Address) -> Vec<Pointer> {
    entries
        .into_iter()
        .filter(|(id, _)| id.bits() == self_id.bits())
        .map(|(id, address)| Pointer::resolve(self_id, id, address, responder))
        .collect()
}

/// The successor did not answer: fall back to the next one.
fn drop_successor(ctx: &ChordContext, successor: &ExternalPointer, e: Error) -> Error {
    tracing::warn!(
        "STABILIZATION successor {} of {} unreachable: {}",
        successor.id,
        ctx.self_id,
        e
    );
    match ctx.lock_state() {
        Ok(mut state) => {
            if state.successor().map(|p| p.id()) == Some(successor.id) {
                if let Err(e) = state.move_to_next_successor() {
                    tracing::error!("STABILIZATION failed to move to next successor: {}", e);
                }
            }
        }
        Err(e) => return e,
    }
    Error::StabilizeFailed(format!("successor {} unreachable: {}", successor.id, e))
}

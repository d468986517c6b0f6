//! Iterative routing search.
//!
//! The search walks the ring towards a target id. At the local node it reads the finger
//! table directly; at a remote node it asks `GetClosestPrecedingFinger`. Every hop must move
//! strictly closer to the target, so the search either converges or fails with a named error.

use std::collections::BTreeSet;

use crate::dht::Address;
use crate::dht::ExternalPointer;
use crate::dht::Id;
use crate::dht::Pointer;
use crate::error::Error;
use crate::error::Result;
use crate::protocol::ChordContext;

/// Result of a routing search.
#[derive(Debug, Clone)]
pub struct RouteOutcome {
    /// The node found.
    pub pointer: Pointer,
    /// Every remote node contacted on the way.
    pub contacted: BTreeSet<Address>,
}

/// Decide the next hop at the local node: `None` when the local node is the predecessor.
fn local_hop(ctx: &ChordContext, target: Id) -> Result<Option<Pointer>> {
    let state = ctx.lock_state()?;
    let successor = state.finger_table().successor().id();
    if target.is_within(ctx.self_id, false, successor, true) {
        return Ok(None);
    }
    match state.finger_table().find_closest_preceding(target) {
        Pointer::Internal(_) => Ok(None),
        next => Ok(Some(next)),
    }
}

/// A hop did not answer. A node lost by the transport is forgotten, so later searches
/// stop going through it.
fn unreachable(ctx: &ChordContext, remote: &ExternalPointer, e: Error) -> Error {
    if let Error::Transport(_) = e {
        tracing::info!("route: forget unreachable node {}", remote.id);
        let removed = ctx
            .lock_state()
            .and_then(|mut state| state.remove_node(remote.id));
        if let Err(e) = removed {
            return e;
        }
    }
    Error::RouteFailed(format!("{} unreachable: {}", remote.address, e))
}

/// Search the predecessor of `target`, starting at `start`.
pub async fn route_to_predecessor(
    ctx: &ChordContext,
    start: Pointer,
    target: Id,
) -> Result<RouteOutcome> {
    let mut contacted = BTreeSet::new();
    let mut current = start;
    loop {
        if let Pointer::Internal(_) = current {
            match local_hop(ctx, target)? {
                None => {
                    return Ok(RouteOutcome {
                        pointer: Pointer::Internal(ctx.base()),
                        contacted,
                    })
                }
                Some(next) => {
                    tracing::debug!("route {}: local hop to {}", target, next);
                    current = next;
                }
            }
        }
        let Pointer::External(remote) = current.clone() else {
            continue;
        };

        contacted.insert(remote.address.clone());
        let (id, address) = match ctx
            .rpc
            .get_closest_preceding_finger(&remote.address, target)
            .await
        {
            Ok(reply) => reply,
            Err(e) => return Err(unreachable(ctx, &remote, e)),
        };
        let reply = Pointer::resolve(ctx.self_id, id, address, &remote.address);
        tracing::debug!("route {}: {} reports {}", target, remote.id, reply);

        if reply.id() == remote.id {
            return Ok(RouteOutcome {
                pointer: current,
                contacted,
            });
        }
        if !reply.id().is_within(remote.id, false, target, false) {
            return Err(Error::RouteFailedBackward(format!(
                "{} reported {} for target {}",
                remote.id,
                reply.id(),
                target
            )));
        }
        current = reply;
    }
}

/// Search the successor of `target`, starting at `start`: the predecessor search plus one
/// hop asking the predecessor for its successor.
pub async fn route_to_successor(
    ctx: &ChordContext,
    start: Pointer,
    target: Id,
) -> Result<RouteOutcome> {
    let RouteOutcome {
        pointer: predecessor,
        mut contacted,
    } = route_to_predecessor(ctx, start, target).await?;

    let successor = match predecessor {
        Pointer::Internal(_) => ctx.lock_state()?.finger_table().successor().clone(),
        Pointer::External(pred) => {
            contacted.insert(pred.address.clone());
            let (id, address) = match ctx.rpc.find_successor(&pred.address, target).await {
                Ok(reply) => reply,
                Err(e) => return Err(unreachable(ctx, &pred, e)),
            };
            let successor = Pointer::resolve(ctx.self_id, id, address, &pred.address);
            if !target.is_within(pred.id, false, successor.id(), true) {
                return Err(Error::RouteFailed(format!(
                    "{} reported successor {} not owning {}",
                    pred.id,
                    successor.id(),
                    target
                )));
            }
            successor
        }
    };

    if let Pointer::Internal(_) = successor {
        return Err(Error::RouteFailedSelf);
    }
    Ok(RouteOutcome {
        pointer: successor,
        contacted,
    })
}
